//! URI fragment joining.

/// Join a URI base with a segment, normalizing slashes.
///
/// The join never produces doubled slashes, preserves a single leading
/// slash on an absolute root, and is associative under normalization:
/// `join_uri(&join_uri(a, b), c)` equals `join_uri(a, &join_uri(b, c))`.
pub fn join_uri(base: &str, segment: &str) -> String {
    let seg = segment.trim_matches('/');
    if base.is_empty() {
        return if segment.starts_with('/') {
            format!("/{}", seg)
        } else {
            seg.to_string()
        };
    }

    let trimmed = base.trim_end_matches('/');
    if seg.is_empty() {
        // Keep a lone "/" root intact.
        if trimmed.is_empty() {
            return "/".to_string();
        }
        return trimmed.to_string();
    }

    format!("{}/{}", trimmed, seg)
}
