//! Deterministic ordering helpers.
//!
//! Verdict messages list violated patterns. The order is fixed here so the
//! same scan result always produces the same message, whatever map type
//! the counts came from.

/// Patterns with a positive count, sorted by pattern text.
pub fn sorted_violations<'a, I>(counts: I) -> Vec<(&'a str, u64)>
where
    I: IntoIterator<Item = (&'a String, &'a u64)>,
{
    let mut violations: Vec<(&str, u64)> = counts
        .into_iter()
        .filter(|(_, count)| **count > 0)
        .map(|(pattern, count)| (pattern.as_str(), *count))
        .collect();
    violations.sort_by(|a, b| a.0.cmp(b.0));
    violations
}
