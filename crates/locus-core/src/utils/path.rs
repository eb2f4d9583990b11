//! Route path utilities.
//!
//! Client-side locations arrive as full strings (`/compare?city=oslo#top`).
//! Matching only ever looks at the path component.

/// Reduce a location to the path used for route matching.
///
/// Drops any query string and fragment, guarantees a leading `/`, and strips
/// trailing `/` from non-root paths.
pub fn normalize_route_path(location: &str) -> String {
    let end = location
        .find(|c| c == '?' || c == '#')
        .unwrap_or(location.len());
    let path = location[..end].trim();

    let trimmed = path.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Join a child route path onto its parent.
///
/// Absolute child paths (leading `/`) stand on their own; relative ones are
/// appended to the parent. An empty child is the parent itself.
pub fn join_route_path(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return normalize_route_path(child);
    }
    if child.is_empty() {
        return normalize_route_path(parent);
    }

    let parent = parent.trim_end_matches('/');
    normalize_route_path(&format!("{}/{}", parent, child))
}
