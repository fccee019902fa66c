//! Status line formatting.

use super::types::{PrState, PullRequest};

const OPEN_MARKER: &str = "🟢";
const MERGED_MARKER: &str = "🟣";
const CLOSED_MARKER: &str = "🔴";

const SEGMENT_SEPARATOR: &str = " · ";

/// Render a pull request as a single compact status line.
///
/// Segment order is fixed: state marker with the PR number, then at most
/// one checks segment, then the unresolved-comments count, then the URL.
/// Among the check buckets a failure dominates a pending count, which in
/// turn dominates an all-passed summary.
pub fn format_status(pr: &PullRequest) -> String {
    let marker = match pr.state {
        PrState::Open => OPEN_MARKER,
        PrState::Merged => MERGED_MARKER,
        PrState::Closed => CLOSED_MARKER,
    };

    let mut segments = vec![format!("{} PR #{}", marker, pr.number)];

    let checks = &pr.checks;
    if checks.total > 0 {
        if checks.fail > 0 {
            segments.push(format!("❌ {}/{} checks failed", checks.fail, checks.total));
        } else if checks.pending > 0 {
            segments.push(format!(
                "⏳ {}/{} checks pending",
                checks.pending, checks.total
            ));
        } else {
            segments.push(format!("✅ {} checks passed", checks.total));
        }
    }

    if pr.unresolved_threads > 0 {
        segments.push(format!("💬 {} unresolved", pr.unresolved_threads));
    }

    segments.push(pr.url.clone());
    segments.join(SEGMENT_SEPARATOR)
}
