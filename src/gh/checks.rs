//! Check rollup and review-thread aggregation.
//!
//! The status-check rollup gh returns mixes check runs and commit statuses:
//! check runs carry `name`/`status`/`conclusion`, commit statuses carry
//! `context`/`state`. Both shapes are folded into one tally here.

use serde_json::Value;

use super::types::{CheckTally, ReviewThread};

const PASS_CONCLUSIONS: &[&str] = &["success", "neutral", "skipped"];
const FAIL_CONCLUSIONS: &[&str] = &["failure", "timed_out", "cancelled", "action_required"];
const PENDING_STATUSES: &[&str] = &["in_progress", "queued", "pending", "waiting"];

/// Tally a raw status-check rollup into pass/fail/pending buckets.
///
/// Records with no name, no conclusion, and no status carry no signal and
/// are skipped without counting. Everything else is counted exactly once:
/// a recognized conclusion wins outright; otherwise the status decides,
/// with unknown values treated as still in flight.
pub fn aggregate_checks(raw: &[Value]) -> CheckTally {
    let mut tally = CheckTally::default();

    for record in raw {
        let name = text_field(record, "name").or_else(|| text_field(record, "context"));
        let conclusion = text_field(record, "conclusion").or_else(|| text_field(record, "state"));
        let status = text_field(record, "status");

        if name.is_none() && conclusion.is_none() && status.is_none() {
            continue;
        }

        tally.total += 1;

        let conclusion = conclusion.map(|c| c.to_ascii_lowercase());
        let status = status.map(|s| s.to_ascii_lowercase());

        match conclusion.as_deref() {
            Some(c) if PASS_CONCLUSIONS.contains(&c) => tally.pass += 1,
            Some(c) if FAIL_CONCLUSIONS.contains(&c) => tally.fail += 1,
            _ => match status.as_deref() {
                Some(s) if PENDING_STATUSES.contains(&s) => tally.pending += 1,
                // A completed run whose conclusion we do not recognize
                // already finished, so it counts as a pass.
                Some("completed") => tally.pass += 1,
                _ => tally.pending += 1,
            },
        }
    }

    tally
}

/// Count review threads no reviewer has resolved yet.
pub fn count_unresolved(threads: &[ReviewThread]) -> u32 {
    threads.iter().filter(|t| !t.is_resolved).count() as u32
}

/// Non-empty string field, if present. Empty strings carry no signal.
fn text_field(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
