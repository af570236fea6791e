use std::fmt;

use thiserror::Error;

use crate::Span;

/// The kind of region that was still open when the input ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unterminated {
    /// `'...'`
    StringLiteral,
    /// `"..."`
    QuotedIdentifier,
    /// `/* ... */`
    BlockComment,
    /// `$tag$ ... $tag$`
    DollarQuote,
}

impl fmt::Display for Unterminated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            Unterminated::StringLiteral => "string literal",
            Unterminated::QuotedIdentifier => "quoted identifier",
            Unterminated::BlockComment => "block comment",
            Unterminated::DollarQuote => "dollar-quoted string",
        };
        f.write_str(what)
    }
}

/// Quoting or comment state could not be resolved by the end of the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unterminated {kind} starting at byte {}", .span.offset)]
pub struct MalformedInputError {
    /// What was left open.
    pub kind: Unterminated,

    /// From the opening delimiter to the end of the input.
    pub span: Span,
}

/// A dialect name that does not match any known placeholder style.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported dialect '{name}' (expected one of: dollar, question, atp, colon)")]
pub struct UnsupportedDialectError {
    /// The name that was asked for.
    pub name: String,
}
