//! Directive expressions mark context bindings with a `$` sigil
//! (`$user.name`). The evaluator works on plain free variables, so the
//! sigil is removed from every identifier before parsing.
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static SIGIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("valid sigil regex"));

/// Rewrites every `$identifier` occurrence to `identifier`.
pub fn strip_sigils(source: &str) -> Cow<'_, str> {
    SIGIL_RE.replace_all(source, "${1}")
}
