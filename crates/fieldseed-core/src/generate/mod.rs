pub mod assembler;
pub mod entities;
pub mod foreign_key;
pub mod incremental;
pub mod plan;
pub mod random;
pub mod value;
