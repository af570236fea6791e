//! Placeholder dialects.

use std::fmt;
use std::str::FromStr;

use crate::UnsupportedDialectError;

/// How positional placeholders are rendered for a target driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// `$1`, `$2`, ... (PostgreSQL)
    #[default]
    Dollar,
    /// `?` for every slot (MySQL, SQLite)
    QuestionMark,
    /// `@p1`, `@p2`, ... (SQL Server)
    AtP,
    /// `:1`, `:2`, ... (Oracle)
    Colon,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Dollar,
        Dialect::QuestionMark,
        Dialect::AtP,
        Dialect::Colon,
    ];

    /// Canonical name, accepted back by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Dollar => "dollar",
            Dialect::QuestionMark => "question",
            Dialect::AtP => "atp",
            Dialect::Colon => "colon",
        }
    }

    /// The parameter policy a driver for this dialect expects.
    ///
    /// Unnumbered placeholders bind strictly in textual order, so every
    /// reference needs its own slot.
    pub fn default_policy(self) -> ParamPolicy {
        match self {
            Dialect::QuestionMark => ParamPolicy::PerOccurrence,
            Dialect::Dollar | Dialect::AtP | Dialect::Colon => ParamPolicy::Collapse,
        }
    }

    /// Placeholder for a 1-based index.
    pub fn placeholder(self, index: usize) -> Placeholder {
        Placeholder {
            dialect: self,
            index,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = UnsupportedDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dollar" | "postgres" | "postgresql" => Ok(Dialect::Dollar),
            "question" | "qmark" | "mysql" | "sqlite" => Ok(Dialect::QuestionMark),
            "atp" | "mssql" | "sqlserver" => Ok(Dialect::AtP),
            "colon" | "oracle" => Ok(Dialect::Colon),
            _ => Err(UnsupportedDialectError {
                name: s.to_string(),
            }),
        }
    }
}

/// A rendered positional placeholder.
///
/// # Example
/// ```
/// use sqlgen_params::Dialect;
/// assert_eq!(Dialect::Dollar.placeholder(3).to_string(), "$3");
/// assert_eq!(Dialect::QuestionMark.placeholder(3).to_string(), "?");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    dialect: Dialect,
    index: usize,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.index;
        match self.dialect {
            Dialect::Dollar => write!(f, "${index}"),
            Dialect::QuestionMark => write!(f, "?"),
            Dialect::AtP => write!(f, "@p{index}"),
            Dialect::Colon => write!(f, ":{index}"),
        }
    }
}

/// Whether repeated references to one name share a positional slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamPolicy {
    /// One index per distinct name; repeats reuse it.
    Collapse,
    /// One index per reference, even for a repeated name.
    PerOccurrence,
}

impl fmt::Display for ParamPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamPolicy::Collapse => f.write_str("collapse"),
            ParamPolicy::PerOccurrence => f.write_str("per-occurrence"),
        }
    }
}
