use serde::{Deserialize, Serialize};

/// Settings for a [`Compiler`](crate::Compiler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Prepended to the name of a `$action` directive to form the form's `action` URL.
    pub action_prefix: String,
    /// The `method` attribute given to rewritten forms.
    pub action_method: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            action_prefix: "/__action/".to_string(),
            action_method: "post".to_string(),
        }
    }
}
