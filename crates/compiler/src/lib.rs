//! Compiles cash templates: HTML annotated with `$`-directives and
//! `{$expr}` placeholders, rendered against a JSON data context.
//!
//! Compilation runs a fixed sequence of passes. The `$head` block and
//! `$route` declarations are removed from the source text, which is then
//! parsed into an element tree; `$action` forms are rewritten, `$for` loops
//! and `$if` conditionals are expanded, and placeholders are substituted
//! before the tree is serialized again.

pub mod actions;
pub mod compiler;
pub mod conditionals;
pub mod context;
pub mod error;
pub mod escape;
pub mod head;
pub mod interpolate;
pub mod loops;
pub mod options;
pub mod render;
pub mod routes;

pub use compiler::{CompileResult, Compiler, compile};
pub use context::Context;
pub use error::CompileError;
pub use escape::{escape_html, escape_text};
pub use head::{Head, extract_head};
pub use loops::LoopDirective;
pub use options::CompileOptions;
pub use render::Renderer;
pub use routes::{declared_route, declared_routes, strip_routes};
