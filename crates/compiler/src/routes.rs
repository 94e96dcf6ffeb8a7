//! `$route "<path>"` declarations. They only carry routing metadata for the
//! server that maps URL paths to templates and never render.
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static ROUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\$route\s+(?:"([^"]*)"|'([^']*)')\s*"#).expect("valid route regex")
});

/// Removes every route declaration, along with the whitespace that follows it.
pub fn strip_routes(source: &str) -> Cow<'_, str> {
    ROUTE_RE.replace_all(source, "")
}

/// All declared route paths, in source order.
pub fn declared_routes(source: &str) -> Vec<String> {
    ROUTE_RE
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The first declared route path, if any.
pub fn declared_route(source: &str) -> Option<String> {
    declared_routes(source).into_iter().next()
}
