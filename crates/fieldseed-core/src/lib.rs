pub mod config;
pub mod error;
pub mod generate;
pub mod graph;
pub mod lock;
pub mod schema;
pub mod store;

// Re-export key types for convenience
pub use error::{FieldSeedError, Result};
pub use generate::assembler::{assemble_full, GeneratedData};
pub use generate::incremental::extend_dataset;
pub use generate::plan::{GenerationMode, GenerationPlan, RowCounts};
pub use schema::types::{Record, Table, TableName};
pub use store::{CsvTableStore, MemoryTableStore, TableStore, WriteMode};
