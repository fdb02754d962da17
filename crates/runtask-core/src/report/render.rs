use crate::rules::MatchCounts;
use crate::util::deterministic::sorted_violations;

/// Message sent with a passing verdict.
pub const PASSED_MESSAGE: &str = "Configured patterns not found";

/// Render the failure report, one `Pattern: P, Matches: N` line per violated
/// pattern in pattern order. `None` when nothing matched.
pub fn render_violations(counts: &MatchCounts) -> Option<String> {
    let violations = sorted_violations(counts);
    if violations.is_empty() {
        return None;
    }

    let mut out = String::new();
    for (pattern, count) in violations {
        out.push_str(&format!("Pattern: {pattern}, Matches: {count}\n"));
    }
    Some(out)
}
