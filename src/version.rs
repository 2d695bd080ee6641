//! Version string handling.
//!
//! Versions are conventionally `vMAJOR.MINOR` but freeform tags do occur, so
//! comparison is numeric-aware per dot-separated segment (`v1.10` orders after
//! `v1.9`) with a string fallback for non-numeric segments.

use std::cmp::Ordering;

/// Normalize a version identifier: trim whitespace, prefix `v` if absent.
pub fn normalize(version: &str) -> String {
    let trimmed = version.trim();
    if trimmed.starts_with('v') || trimmed.starts_with('V') {
        format!("v{}", &trimmed[1..])
    } else {
        format!("v{}", trimmed)
    }
}

/// One dot-separated segment, parsed numerically when possible.
enum Segment<'a> {
    Num(u64),
    Text(&'a str),
}

fn segments(version: &str) -> impl Iterator<Item = Segment<'_>> {
    version
        .trim_start_matches(['v', 'V'])
        .split('.')
        .map(|s| match s.parse::<u64>() {
            Ok(n) => Segment::Num(n),
            Err(_) => Segment::Text(s),
        })
}

/// Numeric-aware version comparison.
///
/// Segments are compared pairwise; a missing segment compares as zero, so
/// `v1` == `v1.0`. Mixed numeric/text segments order numbers first.
pub fn compare(a: &str, b: &str) -> Ordering {
    let mut left = segments(a);
    let mut right = segments(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (l, r) => {
                let l = l.unwrap_or(Segment::Num(0));
                let r = r.unwrap_or(Segment::Num(0));
                let ord = match (l, r) {
                    (Segment::Num(x), Segment::Num(y)) => x.cmp(&y),
                    (Segment::Text(x), Segment::Text(y)) => x.cmp(y),
                    (Segment::Num(_), Segment::Text(_)) => Ordering::Less,
                    (Segment::Text(_), Segment::Num(_)) => Ordering::Greater,
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Whether `reported` is older than `latest`.
pub fn is_older(reported: &str, latest: &str) -> bool {
    compare(reported, latest) == Ordering::Less
}

/// Increment the last numeric segment: `v1.9` -> `v1.10`, `v2` -> `v3`.
///
/// Used to prefill the next upload's version field. A version with no
/// numeric segment gets `.1` appended.
pub fn bump(version: &str) -> String {
    let normalized = normalize(version);
    let body = &normalized[1..];
    let mut parts: Vec<String> = body.split('.').map(String::from).collect();

    for part in parts.iter_mut().rev() {
        if let Ok(n) = part.parse::<u64>() {
            *part = (n + 1).to_string();
            return format!("v{}", parts.join("."));
        }
    }

    format!("v{}.1", body)
}
