use cash::{CompileResult, compile};
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Compiles `source` against `data` with the default compiler.
pub fn render(source: &str, data: Value) -> CompileResult {
    init_logger();
    compile(source, &data)
}

/// Compiles and returns only the body markup.
pub fn render_html(source: &str, data: Value) -> String {
    render(source, data).html
}
