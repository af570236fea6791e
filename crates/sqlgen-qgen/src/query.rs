//! Query records: one discovered file plus its compiled SQL.

use std::sync::Arc;

use camino::Utf8PathBuf;
use sqlgen_params::{Compiler, Param};
use tracing::debug;

use crate::{DiscoveryError, Error, QueryDescriptor, SourceFile, SqlError};

/// A compiled query file. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFile {
    /// Canonical absolute path.
    pub path: Utf8PathBuf,

    /// Path relative to the discovery root.
    pub relative_path: Utf8PathBuf,

    /// Grouping key (`Users`).
    pub namespace: String,

    /// Accessor name within the namespace (`FindById`).
    pub accessor: String,

    /// Run-wide unique key (`UsersFindById`).
    pub key: String,

    /// File content as written.
    pub raw_sql: String,

    /// SQL with positional placeholders.
    pub sql: String,

    /// Parameters sorted by index.
    pub params: Vec<Param>,
}

impl QueryFile {
    /// Read a discovered file and compile it.
    pub fn build(descriptor: QueryDescriptor, compiler: &Compiler) -> Result<Self, Error> {
        let raw_sql = std::fs::read_to_string(&descriptor.absolute_path).map_err(|source| {
            DiscoveryError::Read {
                path: descriptor.absolute_path.clone(),
                source,
            }
        })?;
        Self::from_source(descriptor, raw_sql, compiler)
    }

    /// Compile already-loaded content for a discovered file.
    pub fn from_source(
        descriptor: QueryDescriptor,
        raw_sql: String,
        compiler: &Compiler,
    ) -> Result<Self, Error> {
        let compiled = match compiler.compile(&raw_sql) {
            Ok(compiled) => compiled,
            Err(error) => {
                return Err(SqlError {
                    source: Arc::new(SourceFile {
                        source: raw_sql,
                        source_path: descriptor.relative_path,
                    }),
                    error,
                }
                .into());
            }
        };

        debug!(
            path = %descriptor.relative_path,
            params = compiled.params.len(),
            "compiled query"
        );

        let QueryDescriptor {
            absolute_path,
            relative_path,
            name,
        } = descriptor;

        Ok(Self {
            path: absolute_path,
            relative_path,
            namespace: name.namespace,
            accessor: name.accessor,
            key: name.key,
            raw_sql,
            sql: compiled.sql,
            params: compiled.params,
        })
    }

    /// First index bound to `name`.
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().find(|p| p.name == name).map(|p| p.index)
    }
}
