//! Command-line configuration for sqlgen.
//!
//! Every flag can also be set through a `SQLGEN_*` environment variable;
//! flags win over the environment.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, ValueEnum};
use sqlgen_qgen::{Dialect, Error, Options, ParamPolicy};
use tracing_subscriber::EnvFilter;

/// Compile directories of named-parameter SQL into Rust query accessors.
#[derive(Parser, Debug)]
#[command(name = "sqlgen", version)]
pub struct Cli {
    /// Root directory to search recursively for query files
    #[arg(long, default_value = ".", env = "SQLGEN_ROOT")]
    pub root: Utf8PathBuf,

    /// Output for generated Rust: a file path, or `stdout` / `-`
    #[arg(long, default_value = "stdout", env = "SQLGEN_OUT")]
    pub out: String,

    /// Permissions for a newly created output file, in octal
    #[arg(long, default_value = "0644", env = "SQLGEN_PERMS")]
    pub perms: String,

    /// Placeholder dialect: dollar, question, atp or colon
    #[arg(long, default_value = "dollar", env = "SQLGEN_DIALECT")]
    pub dialect: String,

    /// Whether repeated names share a slot (default depends on the dialect)
    #[arg(long, value_enum, env = "SQLGEN_POLICY")]
    pub policy: Option<PolicyArg>,

    /// Extension of query files
    #[arg(long, default_value = "sql", env = "SQLGEN_SUFFIX")]
    pub suffix: String,

    /// Log more (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides this.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Command-line spelling of [`ParamPolicy`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    /// One slot per distinct name
    Collapse,
    /// One slot per reference
    PerOccurrence,
}

impl From<PolicyArg> for ParamPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Collapse => ParamPolicy::Collapse,
            PolicyArg::PerOccurrence => ParamPolicy::PerOccurrence,
        }
    }
}

impl Cli {
    /// Resolve run options. Fails on an unknown dialect before anything is read.
    pub fn options(&self) -> Result<Options, Error> {
        let dialect: Dialect = self.dialect.parse()?;
        Ok(Options {
            dialect,
            policy: self.policy.map(Into::into),
            suffix: self.suffix.clone(),
        })
    }

    pub fn env_filter(&self) -> EnvFilter {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("sqlgen={level}")))
    }
}
