//! # cash
//!
//! Compiles cash templates into HTML.
//!
//! A template is HTML carrying `$`-directives and `{$expr}` placeholders:
//! - **`$head { ... }`**: document title and meta tags, returned separately
//! - **`$route "/path"`**: routing metadata, removed from the output
//! - **`$action "name"`** on a `<form>`: rewritten into a POST to the action endpoint
//! - **`$if="expr"`**: keeps an element only when `expr` is truthy
//! - **`$for="$item in expr"`**: repeats an element for every item
//! - **`{$expr}`**: replaced by the escaped value of `expr`
//!
//! ```
//! use serde_json::json;
//!
//! let result = cash::compile(
//!     r#"$head { title: "Todos" }<li $for="$t in todos">{$t}</li>"#,
//!     &json!({ "todos": ["write", "test"] }),
//! );
//! assert_eq!(result.html, "<li>write</li><li>test</li>");
//! assert_eq!(result.head.title.as_deref(), Some("Todos"));
//! ```
//!
//! ## Design Principle
//!
//! Compilation is a pure function of the source, the data context and the
//! compiler's options. It never fails: a directive that cannot be evaluated
//! falls back to a safe default and the reason is reported through `log`.

// Re-export foundation crates
pub use cash_expr as expr;
pub use cash_markup as markup;

// Re-export the compiler
pub use cash_compiler::{
    CompileError, CompileOptions, CompileResult, Compiler, Head, compile, declared_route,
    declared_routes, escape_html,
};
pub use cash_expr::{ExprError, ExprFunction, FunctionRegistry};
