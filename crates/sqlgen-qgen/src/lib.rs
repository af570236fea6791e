//! Query file code generator for sqlgen.
//!
//! Walks a directory of `.sql` files, compiles their named parameters into
//! positional placeholders and generates Rust accessors grouped by namespace.

// Error types
mod error;
pub use error::{DiscoveryError, Error, SinkError, SourceFile, SqlError};

// Re-export the compiler so callers only need one crate
pub use sqlgen_params::{CompiledSql, Compiler, Dialect, Param, ParamPolicy};

// File discovery and naming
mod discover;
pub use discover::{QueryDescriptor, discover};

mod naming;
pub use naming::QueryName;

// Query records and grouping
mod query;
pub use query::QueryFile;

mod catalog;
pub use catalog::{Catalog, Options, collect};

// Rust code generation
mod rustgen;
pub use rustgen::{GeneratedCode, generate_rust_code};

// Output
mod sink;
pub use sink::{Sink, parse_mode};
