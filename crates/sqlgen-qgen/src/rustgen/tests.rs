use super::*;
use crate::{QueryDescriptor, QueryName};
use camino::{Utf8Path, Utf8PathBuf};
use sqlgen_params::{Dialect, ParamPolicy};

fn query(relative: &str, sql: &str, options: &Options) -> QueryFile {
    let relative_path = Utf8PathBuf::from(relative);
    let descriptor = QueryDescriptor {
        absolute_path: Utf8Path::new("/queries").join(&relative_path),
        name: QueryName::from_relative(&relative_path, "sql").unwrap(),
        relative_path,
    };
    QueryFile::from_source(descriptor, sql.to_string(), &options.compiler()).unwrap()
}

fn catalog(files: &[(&str, &str)], options: &Options) -> Catalog {
    let mut catalog = Catalog::default();
    for (relative, sql) in files {
        let q = query(relative, sql, options);
        catalog.groups.entry(q.namespace.clone()).or_default().push(q);
    }
    catalog
}

#[test]
fn test_generate_single_query() {
    let options = Options::default();
    let catalog = catalog(
        &[("users/find_by_id.sql", "SELECT * FROM users WHERE id = :id")],
        &options,
    );
    let code = generate_rust_code(&catalog, &options);

    insta::assert_snapshot!(code.code, @r#"
    // Generated by sqlgen. Do not edit.
    // dialect: dollar, parameters: collapse

    pub mod users {
        /// `users/find_by_id.sql`
        #[derive(Debug, Clone, Copy)]
        pub struct FindById;

        impl FindById {
            /// SQL with positional placeholders, ready to hand to the driver.
            pub fn sql() -> &'static str {
                "SELECT * FROM users WHERE id = $1"
            }

            /// SQL as written, with named parameters.
            pub fn raw_sql() -> &'static str {
                "SELECT * FROM users WHERE id = :id"
            }

            /// Parameter names and their 1-based positions, sorted by position.
            pub fn params() -> &'static [(&'static str, usize)] {
                &[("id", 1)]
            }

            /// Position to bind `name` at, or `None` if the query does not use it.
            pub fn param_index(name: &str) -> ::core::option::Option<usize> {
                match name {
                    "id" => ::core::option::Option::Some(1),
                    _ => ::core::option::Option::None,
                }
            }
        }
    }
    "#);
}

#[test]
fn test_prelude_named_accessors_do_not_shadow_option() {
    let options = Options::default();
    let catalog = catalog(
        &[
            ("users/option.sql", "SELECT :a"),
            ("users/some.sql", "SELECT :b"),
            ("users/none.sql", "SELECT 1"),
        ],
        &options,
    );
    let code = generate_rust_code(&catalog, &options).code;

    assert!(code.contains("pub struct Option;"));
    assert!(code.contains("pub struct Some;"));
    assert!(code.contains("pub struct None;"));
    assert!(!code.contains("-> Option<"));
    assert!(!code.contains(" Some("));
    assert!(!code.contains("=> None"));
    assert!(code.contains("\"a\" => ::core::option::Option::Some(1),"));
    assert!(code.contains("::core::option::Option::None"));
}

#[test]
fn test_queries_share_namespace_module_in_order() {
    let options = Options::default();
    let catalog = catalog(
        &[
            ("users/find_by_id.sql", "SELECT * FROM users WHERE id = :id"),
            ("users/all.sql", "SELECT * FROM users"),
        ],
        &options,
    );
    let code = generate_rust_code(&catalog, &options).code;

    assert_eq!(code.matches("pub mod users {").count(), 1);
    let find = code.find("pub struct FindById;").unwrap();
    let all = code.find("pub struct All;").unwrap();
    assert!(find < all, "accessors must keep discovery order");
}

#[test]
fn test_one_module_per_namespace_in_group_order() {
    let options = Options::default();
    let catalog = catalog(
        &[
            ("users/all.sql", "SELECT 1"),
            ("order-items/for_order.sql", "SELECT 2 WHERE order_id = :order_id"),
        ],
        &options,
    );
    let code = generate_rust_code(&catalog, &options).code;

    let users = code.find("pub mod users {").unwrap();
    let items = code.find("pub mod order_items {").unwrap();
    assert!(users < items);
}

#[test]
fn test_query_without_params() {
    let options = Options::default();
    let catalog = catalog(&[("users/all.sql", "SELECT * FROM users")], &options);
    let code = generate_rust_code(&catalog, &options).code;

    assert!(code.contains("&[]"));
    assert!(code.contains("pub fn param_index(_name: &str) -> ::core::option::Option<usize> {"));
}

#[test]
fn test_question_mark_repeats_keep_first_slot() {
    let options = Options {
        dialect: Dialect::QuestionMark,
        ..Options::default()
    };
    let catalog = catalog(
        &[("users/search.sql", "SELECT * FROM users WHERE a = :q OR b = :q")],
        &options,
    );
    let code = generate_rust_code(&catalog, &options).code;

    assert!(code.contains("// dialect: question, parameters: per-occurrence"));
    assert!(code.contains("\"SELECT * FROM users WHERE a = ? OR b = ?\""));
    assert!(code.contains("&[(\"q\", 1), (\"q\", 2)]"));
    assert_eq!(code.matches("\"q\" => ::core::option::Option::Some(").count(), 1);
}

#[test]
fn test_policy_override_in_header() {
    let options = Options {
        dialect: Dialect::QuestionMark,
        policy: Some(ParamPolicy::Collapse),
        ..Options::default()
    };
    let code = generate_rust_code(&Catalog::default(), &options).code;
    assert!(code.contains("// dialect: question, parameters: collapse"));
}

#[test]
fn test_sql_is_escaped_as_rust_string() {
    let options = Options::default();
    let sql = "SELECT \"name\"\nFROM t -- it's \\ fine\nWHERE x = :x";
    let catalog = catalog(&[("things/odd.sql", sql)], &options);
    let code = generate_rust_code(&catalog, &options).code;

    assert!(code.contains(r#""SELECT \"name\"\nFROM t -- it's \\ fine\nWHERE x = $1""#));
}

#[test]
fn test_keyword_namespace_gets_suffix() {
    let options = Options::default();
    let catalog = catalog(&[("type/all.sql", "SELECT 1")], &options);
    let code = generate_rust_code(&catalog, &options).code;
    assert!(code.contains("pub mod type_ {"));
}

#[test]
fn test_output_is_stable() {
    let options = Options::default();
    let files = [
        ("users/find_by_id.sql", "SELECT * FROM users WHERE id = :id"),
        ("posts/by_author.sql", "SELECT * FROM posts WHERE author = :author LIMIT :n"),
    ];
    let first = generate_rust_code(&catalog(&files, &options), &options).code;
    let second = generate_rust_code(&catalog(&files, &options), &options).code;
    assert_eq!(first, second);
}

#[test]
fn test_module_name() {
    assert_eq!(module_name("Users"), "users");
    assert_eq!(module_name("OrderItems"), "order_items");
    assert_eq!(module_name("Match"), "match_");
}
