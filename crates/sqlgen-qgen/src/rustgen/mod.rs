//! Rust code generation from compiled query files using the `codegen` crate.

use codegen::{Block, Function, Impl, Scope, Struct};
use heck::ToSnakeCase;

use crate::{Catalog, Options, QueryFile};

// Accessor structs live next to these in the module and may be named
// `Option`, `Some` or `None`, so the prelude names are never used unqualified.
const OPTION: &str = "::core::option::Option";

/// Generated Rust code for a whole catalog.
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    /// Full Rust source code.
    pub code: String,
}

/// Generate one module per namespace, with one accessor struct per query.
///
/// Output depends only on the catalog and options, so identical input always
/// yields byte-identical code.
pub fn generate_rust_code(catalog: &Catalog, options: &Options) -> GeneratedCode {
    let mut scope = Scope::new();

    // Add file header as raw code
    let compiler = options.compiler();
    scope.raw(&format!(
        "// Generated by sqlgen. Do not edit.\n// dialect: {}, parameters: {}",
        compiler.dialect(),
        compiler.policy()
    ));

    for (namespace, queries) in &catalog.groups {
        let module = scope.new_module(&module_name(namespace));
        module.vis("pub");

        for query in queries {
            generate_query_code(query, module.scope());
        }
    }

    GeneratedCode {
        code: scope.to_string(),
    }
}

fn generate_query_code(query: &QueryFile, scope: &mut Scope) {
    let mut st = Struct::new(&query.accessor);
    st.vis("pub");
    st.doc(&format!("`{}`", query.relative_path));
    st.derive("Debug");
    st.derive("Clone");
    st.derive("Copy");
    scope.push_struct(st);

    let mut imp = Impl::new(query.accessor.as_str());

    let mut sql = Function::new("sql");
    sql.doc("SQL with positional placeholders, ready to hand to the driver.");
    sql.vis("pub");
    sql.ret("&'static str");
    sql.line(rust_str(&query.sql));
    imp.push_fn(sql);

    let mut raw_sql = Function::new("raw_sql");
    raw_sql.doc("SQL as written, with named parameters.");
    raw_sql.vis("pub");
    raw_sql.ret("&'static str");
    raw_sql.line(rust_str(&query.raw_sql));
    imp.push_fn(raw_sql);

    imp.push_fn(generate_params_fn(query));
    imp.push_fn(generate_param_index_fn(query));

    scope.push_impl(imp);
}

/// `params()`: the full parameter table, sorted by index.
fn generate_params_fn(query: &QueryFile) -> Function {
    let mut func = Function::new("params");
    func.doc("Parameter names and their 1-based positions, sorted by position.");
    func.vis("pub");
    func.ret("&'static [(&'static str, usize)]");

    let entries: Vec<String> = query
        .params
        .iter()
        .map(|p| format!("({}, {})", rust_str(&p.name), p.index))
        .collect();
    func.line(format!("&[{}]", entries.join(", ")));
    func
}

/// `param_index(name)`: the first position bound to a name.
fn generate_param_index_fn(query: &QueryFile) -> Function {
    let mut func = Function::new("param_index");
    func.doc("Position to bind `name` at, or `None` if the query does not use it.");
    func.vis("pub");
    func.ret(format!("{OPTION}<usize>"));

    if query.params.is_empty() {
        func.arg("_name", "&str");
        func.line(format!("{OPTION}::None"));
        return func;
    }

    func.arg("name", "&str");
    let mut block = Block::new("match name");
    let mut seen: Vec<&str> = Vec::new();
    for param in &query.params {
        // One-slot-per-occurrence tables repeat names; the first slot wins.
        if seen.contains(&param.name.as_str()) {
            continue;
        }
        seen.push(&param.name);
        block.line(format!(
            "{} => {OPTION}::Some({}),",
            rust_str(&param.name),
            param.index
        ));
    }
    block.line(format!("_ => {OPTION}::None,"));
    func.push_block(block);
    func
}

/// Module identifier for a namespace key: `OrderItems` becomes `order_items`.
fn module_name(namespace: &str) -> String {
    let name = namespace.to_snake_case();
    if is_keyword(&name) {
        format!("{name}_")
    } else {
        name
    }
}

fn is_keyword(ident: &str) -> bool {
    const KEYWORDS: &[&str] = &[
        "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
        "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen",
        "if", "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override",
        "priv", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true",
        "try", "type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while",
        "yield",
    ];
    KEYWORDS.contains(&ident)
}

/// A Rust string literal for arbitrary text.
fn rust_str(s: &str) -> String {
    format!("{s:?}")
}

#[cfg(test)]
mod tests;
