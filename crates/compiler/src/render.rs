use crate::context::Context;
use crate::error::CompileError;
use cash_expr::{EvaluationContext, FunctionRegistry, evaluate_str, strip_sigils};
use cash_markup::{Node, render_nodes};
use serde_json::Value;

/// Runs the context-dependent passes (loops, conditionals, interpolation)
/// over an element tree.
pub struct Renderer<'c> {
    functions: &'c FunctionRegistry,
}

impl<'c> Renderer<'c> {
    pub fn new(functions: &'c FunctionRegistry) -> Self {
        Self { functions }
    }

    /// Evaluates a directive expression after stripping its `$` sigils.
    pub fn evaluate(&self, source: &str, ctx: &Context) -> Result<Value, CompileError> {
        let source = strip_sigils(source);
        let e_ctx = EvaluationContext::new(ctx, self.functions);
        Ok(evaluate_str(&source, &e_ctx)?)
    }

    /// The full pass sequence for one scope: loops, then conditionals, then
    /// interpolation.
    pub fn render(&self, nodes: Vec<Node>, ctx: &Context) -> Vec<Node> {
        let nodes = self.expand_loops(nodes, ctx);
        let mut nodes = self.expand_conditionals(nodes, ctx);
        self.interpolate(&mut nodes, ctx);
        nodes
    }

    pub fn render_to_string(&self, nodes: Vec<Node>, ctx: &Context) -> String {
        render_nodes(&self.render(nodes, ctx))
    }
}
