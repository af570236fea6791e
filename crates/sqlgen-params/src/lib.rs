//! Named-parameter SQL compilation.
//!
//! Scan hand-written SQL for `:name` bind parameters, then rewrite them into
//! the positional placeholders a driver expects (`$1`, `?`, `@p1`, `:1`).

mod compile;
pub use compile::*;

mod dialect;
pub use dialect::*;

mod error;
pub use error::*;

mod scan;
pub use scan::*;

/// Result of compiling SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSql {
    /// The SQL string with positional placeholders.
    pub sql: String,

    /// Parameters sorted by index (maps to $1, $2, etc.).
    pub params: Vec<Param>,
}

impl CompiledSql {
    /// First index assigned to `name`, if the query references it.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.params.iter().find(|p| p.name == name).map(|p| p.index)
    }
}

/// A named bind parameter and the position it was assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Name as written in the source, without the sigil.
    pub name: String,

    /// 1-based positional index.
    pub index: usize,
}

/// A byte range in the scanned SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first byte.
    pub offset: usize,

    /// Length in bytes.
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Byte offset one past the last byte.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.end()
    }
}
