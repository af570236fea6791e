//! Where generated code ends up.

use std::fs::OpenOptions;
use std::io::{self, Write};

use camino::Utf8PathBuf;
use tracing::debug;

use crate::SinkError;

/// Output destination, written exactly once at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    File {
        path: Utf8PathBuf,
        /// Permission bits used if the file has to be created.
        mode: u32,
    },
}

impl Sink {
    /// Interpret the `--out` / `--perms` pair. `-` and `stdout` mean standard
    /// output, in which case the permissions are not looked at.
    pub fn from_args(out: &str, perms: &str) -> Result<Self, SinkError> {
        if out == "-" || out == "stdout" {
            return Ok(Sink::Stdout);
        }
        Ok(Sink::File {
            path: Utf8PathBuf::from(out),
            mode: parse_mode(perms)?,
        })
    }

    /// Write `contents` in one go. Files are created if missing and truncated
    /// otherwise; the handle is closed before returning, on every path.
    pub fn write(&self, contents: &str) -> Result<(), SinkError> {
        match self {
            Sink::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(contents.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|source| SinkError::Write {
                        target: "standard output".to_string(),
                        source,
                    })
            }
            Sink::File { path, mode } => {
                let mut options = OpenOptions::new();
                options.write(true).create(true).truncate(true);
                #[cfg(unix)]
                {
                    use std::os::unix::fs::OpenOptionsExt;
                    options.mode(*mode);
                }
                #[cfg(not(unix))]
                let _ = mode;

                let mut file = options.open(path).map_err(|source| SinkError::Open {
                    path: path.clone(),
                    source,
                })?;
                file.write_all(contents.as_bytes())
                    .and_then(|()| file.flush())
                    .map_err(|source| SinkError::Write {
                        target: path.to_string(),
                        source,
                    })?;

                debug!(%path, bytes = contents.len(), "wrote generated code");
                Ok(())
            }
        }
    }
}

/// Parse an octal permission string such as `0644`, `644` or `0o600`.
pub fn parse_mode(perms: &str) -> Result<u32, SinkError> {
    let digits = perms.strip_prefix("0o").unwrap_or(perms);
    u32::from_str_radix(digits, 8)
        .ok()
        .filter(|mode| !digits.is_empty() && *mode <= 0o7777)
        .ok_or_else(|| SinkError::InvalidPermissions(perms.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("0644").unwrap(), 0o644);
        assert_eq!(parse_mode("600").unwrap(), 0o600);
        assert_eq!(parse_mode("0o755").unwrap(), 0o755);
    }

    #[test]
    fn test_parse_mode_rejects_garbage() {
        for bad in ["", "rw-r--r--", "0999", "-644", "77777"] {
            let err = parse_mode(bad).unwrap_err();
            assert!(
                matches!(err, SinkError::InvalidPermissions(ref s) if s == bad),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn test_stdout_ignores_perms() {
        assert_eq!(Sink::from_args("-", "nonsense").unwrap(), Sink::Stdout);
        assert_eq!(Sink::from_args("stdout", "").unwrap(), Sink::Stdout);
    }

    #[test]
    fn test_file_requires_valid_perms() {
        assert!(matches!(
            Sink::from_args("out.rs", "abc"),
            Err(SinkError::InvalidPermissions(_))
        ));
    }

    #[test]
    fn test_write_creates_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("queries.rs")).unwrap();
        std::fs::write(&path, "stale content that is longer than the new one").unwrap();

        let sink = Sink::File {
            path: path.clone(),
            mode: 0o644,
        };
        sink.write("fresh").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_applies_mode_on_create() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("queries.rs")).unwrap();
        Sink::File {
            path: path.clone(),
            mode: 0o600,
        }
        .write("x")
        .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_open_failure_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("missing/queries.rs")).unwrap();
        let err = Sink::File {
            path: path.clone(),
            mode: 0o644,
        }
        .write("x")
        .unwrap_err();
        assert!(matches!(err, SinkError::Open { .. }));
        assert!(err.to_string().contains(path.as_str()));
    }
}
