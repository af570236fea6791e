//! Rewrite named parameters into positional placeholders.

use std::collections::HashMap;
use std::fmt::Write;

use crate::{CompiledSql, Dialect, MalformedInputError, Param, ParamPolicy, Scanner};

/// Mutable parameter tracking state.
struct ParamState<'a> {
    policy: ParamPolicy,
    /// Named parameters mapped to their assigned positional index.
    assigned: HashMap<&'a str, usize>,
    /// Parameter table, in index order.
    params: Vec<Param>,
    /// Next parameter index to assign (starts at 1 for `$1`).
    next_param_idx: usize,
}

impl<'a> ParamState<'a> {
    fn new(policy: ParamPolicy) -> Self {
        Self {
            policy,
            assigned: HashMap::new(),
            params: Vec::new(),
            next_param_idx: 1,
        }
    }

    /// Index for one reference to `name`, assigning a new one if the policy asks for it.
    fn index_for(&mut self, name: &'a str) -> usize {
        match self.policy {
            ParamPolicy::Collapse => match self.assigned.get(name) {
                Some(&idx) => idx,
                None => {
                    let idx = self.push(name);
                    self.assigned.insert(name, idx);
                    idx
                }
            },
            ParamPolicy::PerOccurrence => self.push(name),
        }
    }

    fn push(&mut self, name: &str) -> usize {
        let idx = self.next_param_idx;
        self.next_param_idx += 1;
        self.params.push(Param {
            name: name.to_string(),
            index: idx,
        });
        idx
    }
}

/// Compiles named-parameter SQL for one dialect and policy.
///
/// # Example
/// ```
/// use sqlgen_params::{Compiler, Dialect};
///
/// let compiled = Compiler::new(Dialect::Dollar)
///     .compile("SELECT * FROM users WHERE id = :id")
///     .unwrap();
/// assert_eq!(compiled.sql, "SELECT * FROM users WHERE id = $1");
/// assert_eq!(compiled.index_of("id"), Some(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compiler {
    dialect: Dialect,
    policy: ParamPolicy,
}

impl Compiler {
    /// A compiler using the dialect's default policy.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            policy: dialect.default_policy(),
        }
    }

    /// Override the parameter policy.
    pub fn with_policy(mut self, policy: ParamPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn policy(&self) -> ParamPolicy {
        self.policy
    }

    /// Rewrite every `:name` outside quotes and comments, copying all other
    /// bytes verbatim.
    pub fn compile(&self, sql: &str) -> Result<CompiledSql, MalformedInputError> {
        let mut state = ParamState::new(self.policy);
        let mut out = String::with_capacity(sql.len());
        let mut copied = 0;

        for param in Scanner::new(sql) {
            let param = param?;
            out.push_str(&sql[copied..param.span.offset]);
            let idx = state.index_for(param.name);
            // Writing to a String cannot fail.
            let _ = write!(out, "{}", self.dialect.placeholder(idx));
            copied = param.span.end();
        }
        out.push_str(&sql[copied..]);

        Ok(CompiledSql {
            sql: out,
            params: state.params,
        })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}
