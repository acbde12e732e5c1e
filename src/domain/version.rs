//! Version-suffix naming for saved sub-projects.
//!
//! Sub-projects sharing a stripped base name under one parent project form a
//! lineage; re-saving a literal name that already exists in its lineage gets
//! a `" (Version N)"` suffix.

use std::sync::OnceLock;

use regex::Regex;

static VERSION_SUFFIX: OnceLock<Regex> = OnceLock::new();

fn version_suffix() -> &'static Regex {
    VERSION_SUFFIX.get_or_init(|| Regex::new(r"^(?P<base>.*) \(Version \d+\)$").unwrap())
}

/// Strip a trailing `" (Version N)"` suffix, if present.
pub fn base_name(name: &str) -> &str {
    match version_suffix().captures(name) {
        Some(caps) => caps.name("base").map(|m| m.as_str()).unwrap_or(name),
        None => name,
    }
}

/// Resolve the stored name for a new save.
///
/// `existing` is every sub-project name already saved under the same parent
/// project. If the literal `requested` name already exists in its lineage,
/// the stored name becomes `"{base} (Version {lineage_size + 1})"`; otherwise
/// the literal name is stored unchanged.
pub fn resolve_name(requested: &str, existing: &[String]) -> String {
    let base = base_name(requested);
    let lineage_size = existing.iter().filter(|n| base_name(n) == base).count();
    let literal_taken = existing.iter().any(|n| n == requested);

    if literal_taken {
        format!("{} (Version {})", base, lineage_size + 1)
    } else {
        requested.to_string()
    }
}
