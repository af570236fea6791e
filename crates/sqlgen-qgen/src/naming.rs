//! Deriving namespace and accessor names from a query file's relative path.
//!
//! `users/find_by_id.sql` becomes namespace `Users`, accessor `FindById`.
//! Deeper paths fold every segment after the first into the accessor, so
//! `users/admin/list.sql` becomes `Users` / `AdminList`.

use camino::Utf8Path;
use heck::ToUpperCamelCase;

use crate::DiscoveryError;

/// Identifiers derived from one query file's location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryName {
    /// First path segment, UpperCamelCase.
    pub namespace: String,

    /// Remaining segments (suffix stripped), UpperCamelCase.
    pub accessor: String,

    /// Every segment joined, unique across the run (`UsersFindById`).
    pub key: String,
}

impl QueryName {
    /// Derive names from a path relative to the discovery root.
    pub fn from_relative(relative: &Utf8Path, suffix: &str) -> Result<Self, DiscoveryError> {
        let mut segments: Vec<&str> = relative
            .parent()
            .into_iter()
            .flat_map(|parent| parent.iter())
            .collect();
        if let Some(stem) = relative.file_stem() {
            segments.push(stem);
        }

        if segments.len() < 2 {
            return Err(DiscoveryError::Shallow {
                path: relative.to_owned(),
                suffix: suffix.to_string(),
            });
        }

        let idents = segments
            .iter()
            .map(|segment| {
                let ident = segment.to_upper_camel_case();
                if is_valid_ident(&ident) {
                    Ok(ident)
                } else {
                    Err(DiscoveryError::InvalidIdentifier {
                        path: relative.to_owned(),
                        segment: segment.to_string(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            namespace: idents[0].clone(),
            accessor: idents[1..].concat(),
            key: idents.concat(),
        })
    }
}

/// Non-empty, starts with a letter, only ASCII alphanumerics, and not `Self`.
fn is_valid_ident(ident: &str) -> bool {
    let mut chars = ident.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
        && ident != "Self"
}
