//! Recursive discovery of query files.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::{DiscoveryError, QueryName};

/// One query file found under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    /// Canonical absolute path.
    pub absolute_path: Utf8PathBuf,

    /// Path relative to the root, suffix included.
    pub relative_path: Utf8PathBuf,

    /// Names derived from `relative_path`.
    pub name: QueryName,
}

/// Find every file ending in `.{suffix}` below `root`.
///
/// Entries are visited in file-name order so that the result (and therefore
/// the generated code) does not depend on the filesystem's listing order.
/// Symlinks are not followed.
pub fn discover(root: &Utf8Path, suffix: &str) -> Result<Vec<QueryDescriptor>, DiscoveryError> {
    let suffix = suffix.trim_start_matches('.');
    let root = root
        .canonicalize_utf8()
        .map_err(|source| DiscoveryError::Root {
            path: root.to_owned(),
            source,
        })?;
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory { path: root });
    }

    debug!(%root, suffix, "discovering query files");

    let mut found = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            path: root.clone(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let absolute_path = Utf8PathBuf::from_path_buf(entry.into_path())
            .map_err(|path| DiscoveryError::NonUtf8Path { path })?;
        if absolute_path.extension() != Some(suffix) {
            trace!(path = %absolute_path, "skipping non-query file");
            continue;
        }

        let relative_path = absolute_path
            .strip_prefix(&root)
            .expect("walkdir entries live under the root")
            .to_owned();
        let name = QueryName::from_relative(&relative_path, suffix)?;

        found.push(QueryDescriptor {
            absolute_path,
            relative_path,
            name,
        });
    }

    debug!(count = found.len(), "discovered query files");
    Ok(found)
}
