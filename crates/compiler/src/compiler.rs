use crate::actions::rewrite_actions;
use crate::context::Context;
use crate::head::{Head, extract_head};
use crate::options::CompileOptions;
use crate::render::Renderer;
use crate::routes::strip_routes;
use cash_expr::FunctionRegistry;
use cash_markup::{Document, render_nodes};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

static DEFAULT_COMPILER: Lazy<Compiler> = Lazy::new(Compiler::default);

/// The output of one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResult {
    /// The rendered body markup.
    pub html: String,
    pub head: Head,
}

impl CompileResult {
    /// Wraps the body and head in a complete HTML document.
    pub fn to_document(&self) -> String {
        format!(
            "<!doctype html><html><head>{}</head><body>{}</body></html>",
            self.head.to_html(),
            self.html
        )
    }
}

/// Compiles templates against data contexts.
///
/// A `Compiler` holds no per-call state and can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
    functions: FunctionRegistry,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            functions: FunctionRegistry::default(),
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Functions callable from template expressions. Starts with the built-ins.
    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    /// Renders `source` against `context`.
    ///
    /// Compilation always succeeds. Directives that fail to evaluate fall back
    /// (a condition to false, a loop to no items, a placeholder to empty text)
    /// and markup the compiler cannot match is emitted as written. A context
    /// that is not an object is treated as empty.
    pub fn compile(&self, source: &str, context: &Value) -> CompileResult {
        let empty = Map::new();
        let bindings = match context {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                log::warn!("Ignoring non-object context: {}", other);
                &empty
            }
        };

        let (head, source) = extract_head(source);
        let source = strip_routes(&source);

        let document = Document::parse(&source);
        for problem in &document.problems {
            log::warn!("{}", problem);
        }

        let mut nodes = document.nodes;
        rewrite_actions(&mut nodes, &self.options);

        let renderer = Renderer::new(&self.functions);
        let nodes = renderer.render(nodes, &Context::new(bindings));

        CompileResult {
            html: render_nodes(&nodes),
            head,
        }
    }
}

/// Compiles `source` with the default options and built-in functions.
pub fn compile(source: &str, context: &Value) -> CompileResult {
    DEFAULT_COMPILER.compile(source, context)
}
