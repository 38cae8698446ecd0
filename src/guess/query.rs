//! Import queries
//!
//! One tree-sitter query per grammar family. Only the `@import` capture
//! carries data; every other capture exists to feed a predicate.

use crate::guess::language::SourceLanguage;
use std::sync::LazyLock;
use tree_sitter::{Query, QueryError};

/// Name of the capture holding the import source string
pub const IMPORT_CAPTURE: &str = "import";

/// Identifier a call must use to count as a CommonJS import
pub const DYNAMIC_IMPORT_IDENT: &str = "require";

/// Declarative forms shared by the JavaScript and TypeScript grammars
pub const STATIC_IMPORTS_QUERY: &str = r#"
(import_statement
  source: (string) @import)

(export_statement
  source: (string) @import)
"#;

/// `require("x")` and `import("x")` with a single string argument
///
/// The `import` keyword branch has no `@function` capture, so the
/// predicate only constrains plain identifier calls.
pub fn dynamic_imports_query() -> String {
    format!(
        r#"
((call_expression
   function: [(identifier) @function
              (import)]
   arguments: (arguments . (string) @import .))
 (#eq? @function "{DYNAMIC_IMPORT_IDENT}"))
"#
    )
}

/// TypeScript adds `import foo = require("foo")`
pub const TYPESCRIPT_EXTRA_IMPORTS_QUERY: &str = r#"
(import_require_clause
  (string) @import)
"#;

static JAVASCRIPT_QUERY: LazyLock<Result<Query, QueryError>> =
    LazyLock::new(|| compile(SourceLanguage::JavaScript));
static TYPESCRIPT_QUERY: LazyLock<Result<Query, QueryError>> =
    LazyLock::new(|| compile(SourceLanguage::TypeScript));
static TSX_QUERY: LazyLock<Result<Query, QueryError>> =
    LazyLock::new(|| compile(SourceLanguage::Tsx));

/// Full query source for a language
pub fn query_source(language: SourceLanguage) -> String {
    match language {
        SourceLanguage::JavaScript => {
            format!("{STATIC_IMPORTS_QUERY}{}", dynamic_imports_query())
        }
        SourceLanguage::TypeScript | SourceLanguage::Tsx => format!(
            "{STATIC_IMPORTS_QUERY}{}{TYPESCRIPT_EXTRA_IMPORTS_QUERY}",
            dynamic_imports_query()
        ),
    }
}

fn compile(language: SourceLanguage) -> Result<Query, QueryError> {
    Query::new(&language.tree_sitter_language(), &query_source(language))
}

/// Get the compiled import query for a language
///
/// Compiled once per process on first use. An error here means the query
/// text does not match the grammar, which no input file can fix.
pub fn imports_query(language: SourceLanguage) -> Result<&'static Query, &'static QueryError> {
    let compiled = match language {
        SourceLanguage::JavaScript => &*JAVASCRIPT_QUERY,
        SourceLanguage::TypeScript => &*TYPESCRIPT_QUERY,
        SourceLanguage::Tsx => &*TSX_QUERY,
    };
    compiled.as_ref()
}
