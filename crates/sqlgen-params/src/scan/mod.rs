//! Lexical scan for named parameters.
//!
//! The scanner only knows enough SQL to avoid false positives: it tracks
//! string literals, quoted identifiers, comments and dollar-quoted bodies, and
//! reports every `:name` outside of them. Everything else is opaque text.

use crate::{MalformedInputError, Span, Unterminated};

/// One reference to a named parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamRef<'a> {
    /// Name without the leading colon.
    pub name: &'a str,

    /// Span of the whole marker, colon included.
    pub span: Span,
}

/// Iterator over the parameter references in a SQL string, left to right.
///
/// Yields at most one error, after which it is exhausted.
pub struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            done: false,
        }
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn follows_ident(&self) -> bool {
        self.pos > 0 && is_ident_byte(self.bytes[self.pos - 1])
    }

    fn unterminated(&self, kind: Unterminated, start: usize) -> MalformedInputError {
        MalformedInputError {
            kind,
            span: Span::new(start, self.bytes.len() - start),
        }
    }

    /// Skip a `'...'` or `"..."` region. A doubled quote is an escaped quote.
    fn skip_quoted(&mut self, quote: u8, kind: Unterminated) -> Result<(), MalformedInputError> {
        let start = self.pos;
        self.pos += 1;
        self.skip_quoted_body(quote, kind, start, false)
    }

    /// Skip a PostgreSQL `E'...'` escape string, where a backslash also
    /// escapes the next byte.
    fn skip_escape_string(&mut self) -> Result<(), MalformedInputError> {
        let start = self.pos;
        self.pos += 2;
        self.skip_quoted_body(b'\'', Unterminated::StringLiteral, start, true)
    }

    fn skip_quoted_body(
        &mut self,
        quote: u8,
        kind: Unterminated,
        start: usize,
        backslash: bool,
    ) -> Result<(), MalformedInputError> {
        loop {
            match self.peek(0) {
                None => return Err(self.unterminated(kind, start)),
                Some(b'\\') if backslash => {
                    if self.peek(1).is_none() {
                        return Err(self.unterminated(kind, start));
                    }
                    self.pos += 2;
                }
                Some(b) if b == quote => {
                    if self.peek(1) == Some(quote) {
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                        return Ok(());
                    }
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        match self.bytes[self.pos..].iter().position(|&b| b == b'\n') {
            Some(n) => self.pos += n + 1,
            None => self.pos = self.bytes.len(),
        }
    }

    /// Block comments nest, as in PostgreSQL.
    fn skip_block_comment(&mut self) -> Result<(), MalformedInputError> {
        let start = self.pos;
        self.pos += 2;
        let mut depth = 1usize;
        while depth > 0 {
            match (self.peek(0), self.peek(1)) {
                (None, _) => return Err(self.unterminated(Unterminated::BlockComment, start)),
                (Some(b'*'), Some(b'/')) => {
                    depth -= 1;
                    self.pos += 2;
                }
                (Some(b'/'), Some(b'*')) => {
                    depth += 1;
                    self.pos += 2;
                }
                _ => self.pos += 1,
            }
        }
        Ok(())
    }

    /// Length of the `$tag$` delimiter opening at the current `$`, if any.
    ///
    /// The tag is empty or an identifier that does not start with a digit, so
    /// positional placeholders like `$1` never open a dollar quote.
    fn dollar_tag_len(&self) -> Option<usize> {
        if self.follows_ident() {
            return None;
        }
        let rest = &self.bytes[self.pos + 1..];
        match rest.first() {
            Some(b'$') => return Some(2),
            Some(&b) if is_ident_start(b) => {}
            _ => return None,
        }
        let n = ident_len(rest);
        (rest.get(n) == Some(&b'$')).then_some(n + 2)
    }

    fn skip_dollar_quoted(&mut self, tag_len: usize) -> Result<(), MalformedInputError> {
        let start = self.pos;
        let tag = &self.bytes[start..start + tag_len];
        let body = start + tag_len;
        match self.bytes[body..]
            .windows(tag_len)
            .position(|window| window == tag)
        {
            Some(n) => {
                self.pos = body + n + tag_len;
                Ok(())
            }
            None => Err(self.unterminated(Unterminated::DollarQuote, start)),
        }
    }

    /// Parameter marker at the current `:`, if one starts here.
    fn param_at(&self) -> Option<ParamRef<'a>> {
        if self.pos > 0 {
            let prev = self.bytes[self.pos - 1];
            if prev == b':' || is_ident_byte(prev) {
                return None;
            }
        }
        let rest = &self.bytes[self.pos + 1..];
        if !rest.first().is_some_and(|&b| is_ident_start(b)) {
            return None;
        }
        let start = self.pos;
        let end = start + 1 + ident_len(rest);
        Some(ParamRef {
            name: &self.src[start + 1..end],
            span: Span::new(start, end - start),
        })
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<ParamRef<'a>, MalformedInputError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        while let Some(b) = self.peek(0) {
            let step = match b {
                b'\'' => self.skip_quoted(b'\'', Unterminated::StringLiteral),
                b'"' => self.skip_quoted(b'"', Unterminated::QuotedIdentifier),
                b'E' | b'e' if self.peek(1) == Some(b'\'') && !self.follows_ident() => {
                    self.skip_escape_string()
                }
                b'-' if self.peek(1) == Some(b'-') => {
                    self.skip_line_comment();
                    Ok(())
                }
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment(),
                b'$' => match self.dollar_tag_len() {
                    Some(len) => self.skip_dollar_quoted(len),
                    None => {
                        self.pos += 1;
                        Ok(())
                    }
                },
                // `::` is a type cast
                b':' if self.peek(1) == Some(b':') => {
                    self.pos += 2;
                    Ok(())
                }
                b':' => {
                    if let Some(param) = self.param_at() {
                        self.pos = param.span.end();
                        return Some(Ok(param));
                    }
                    self.pos += 1;
                    Ok(())
                }
                _ => {
                    self.pos += 1;
                    Ok(())
                }
            };

            if let Err(err) = step {
                self.done = true;
                return Some(Err(err));
            }
        }

        self.done = true;
        None
    }
}

/// Collect every parameter reference, failing on malformed input.
pub fn scan(src: &str) -> Result<Vec<ParamRef<'_>>, MalformedInputError> {
    Scanner::new(src).collect()
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn ident_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|&&b| is_ident_byte(b)).count()
}
