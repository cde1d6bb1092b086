//! Matching of hierarchical paths against key prefixes.
//!
//! A prefix `p` matches a path equal to `p` or starting with `p/`, so `/a`
//! matches `/a` and `/a/b` but not `/ab`. A single trailing `/` on the
//! prefix is ignored and an empty prefix matches every path.

/// Drops a single trailing `/`.
pub(crate) fn normalize(prefix: &str) -> &str {
    prefix.strip_suffix('/').unwrap_or(prefix)
}

/// Returns the remainder of `path` after `prefix`: empty for an exact
/// match, otherwise starting with `/`.
pub(crate) fn strip<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix = normalize(prefix);
    let rest = path.strip_prefix(prefix)?;
    if prefix.is_empty() || rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Returns true if `path` lies under `prefix`.
pub(crate) fn matches(path: &str, prefix: &str) -> bool {
    strip(path, prefix).is_some()
}

/// Rewrites a path under `from` to the same place under `to`.
pub(crate) fn retarget(path: &str, from: &str, to: &str) -> Option<String> {
    let rest = strip(path, from)?;
    let to = normalize(to);
    let mut target = String::with_capacity(to.len() + rest.len());
    target.push_str(to);
    target.push_str(rest);
    Some(target)
}
