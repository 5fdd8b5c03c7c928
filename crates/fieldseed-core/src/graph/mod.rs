//! # Table Dependency Graph
//!
//! The foreign keys declared on `TableName` form a DAG with edges pointing
//! from child to parent. The assembler and the extender check their fixed
//! generation order against it, and the CLI renders it.

pub mod dag;
pub mod topo;
pub mod visualize;
