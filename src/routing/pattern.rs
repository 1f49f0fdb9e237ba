//! Pattern and path splitting.
//!
//! # Responsibilities
//! - Split `/`-delimited patterns into non-empty parts
//! - Classify each part as literal, named parameter or wildcard
//!
//! # Design Decisions
//! - Empty segments are dropped, so `""`, `"/"` and `"//"` all yield zero parts
//! - Pattern splitting stops after the first wildcard part; everything after
//!   it is unreachable and ignored

/// Shape of a single pattern segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Matches the identical path segment.
    Static,
    /// `:name`, matches exactly one path segment.
    Param,
    /// `*name`, matches every remaining path segment.
    Wildcard,
}

impl SegmentKind {
    /// Classify a segment by its leading byte.
    pub fn of(segment: &str) -> Self {
        match segment.as_bytes().first() {
            Some(b':') => SegmentKind::Param,
            Some(b'*') => SegmentKind::Wildcard,
            _ => SegmentKind::Static,
        }
    }

    /// True for `:` and `*` segments.
    pub fn is_wild(self) -> bool {
        self != SegmentKind::Static
    }
}

/// Split a route pattern into parts, stopping after the first wildcard.
pub fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for part in pattern.split('/').filter(|p| !p.is_empty()) {
        parts.push(part);
        if SegmentKind::of(part) == SegmentKind::Wildcard {
            break;
        }
    }
    parts
}

/// Split a request path into parts. No truncation: wildcard capture needs the tail.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|p| !p.is_empty()).collect()
}

/// Join a group prefix and a relative path the way static mounts expect:
/// exactly one `/` between them.
pub fn join_paths(prefix: &str, relative: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let relative = relative.trim_start_matches('/');
    if relative.is_empty() {
        if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix.to_string()
        }
    } else {
        format!("{}/{}", prefix, relative)
    }
}
