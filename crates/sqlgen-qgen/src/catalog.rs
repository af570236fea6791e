//! A generation run: discover, compile, and group by namespace.

use camino::Utf8Path;
use indexmap::IndexMap;
use sqlgen_params::{Compiler, Dialect, ParamPolicy};
use tracing::info;

use crate::{DiscoveryError, Error, QueryFile, discover};

/// Settings for one run. Fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Placeholder dialect for every query.
    pub dialect: Dialect,

    /// Parameter policy; `None` uses the dialect's default.
    pub policy: Option<ParamPolicy>,

    /// Query file extension, without the dot.
    pub suffix: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            policy: None,
            suffix: "sql".to_string(),
        }
    }
}

impl Options {
    pub fn compiler(&self) -> Compiler {
        let compiler = Compiler::new(self.dialect);
        match self.policy {
            Some(policy) => compiler.with_policy(policy),
            None => compiler,
        }
    }
}

/// Every compiled query of a run, grouped by namespace in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Namespace key to its queries.
    pub groups: IndexMap<String, Vec<QueryFile>>,
}

impl Catalog {
    /// Queries of one namespace.
    pub fn get(&self, namespace: &str) -> Option<&[QueryFile]> {
        self.groups.get(namespace).map(Vec::as_slice)
    }

    /// All queries, namespace by namespace.
    pub fn queries(&self) -> impl Iterator<Item = &QueryFile> {
        self.groups.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Add a query to its namespace, rejecting a second query with the same accessor.
    fn insert(&mut self, query: QueryFile) -> Result<(), DiscoveryError> {
        let group = self.groups.entry(query.namespace.clone()).or_default();
        if let Some(existing) = group.iter().find(|q| q.accessor == query.accessor) {
            return Err(DiscoveryError::DuplicateAccessor {
                path: query.relative_path,
                other: existing.relative_path.clone(),
                namespace: query.namespace,
                accessor: query.accessor,
            });
        }
        group.push(query);
        Ok(())
    }
}

/// Discover and compile every query file under `root`.
///
/// Fails on the first problem; a partial catalog is never returned.
pub fn collect(root: &Utf8Path, options: &Options) -> Result<Catalog, Error> {
    let compiler = options.compiler();
    let descriptors = discover(root, &options.suffix)?;

    let mut catalog = Catalog::default();

    for descriptor in descriptors {
        let query = QueryFile::build(descriptor, &compiler)?;
        catalog.insert(query)?;
    }

    info!(
        queries = catalog.len(),
        namespaces = catalog.groups.len(),
        dialect = %compiler.dialect(),
        policy = %compiler.policy(),
        "compiled query catalog"
    );
    Ok(catalog)
}
