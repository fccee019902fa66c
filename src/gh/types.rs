//! Core types for pull-request status reporting.

use serde::Serialize;

/// CI check results for a pull request, tallied into buckets.
///
/// Every counted record lands in exactly one bucket, so
/// `pass + fail + pending == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckTally {
    /// Number of checks that carried a real signal
    pub total: u32,
    /// Checks that concluded successfully (or were skipped/neutral)
    pub pass: u32,
    /// Checks that failed, timed out, or were cancelled
    pub fail: u32,
    /// Checks still running, queued, or in an unrecognized state
    pub pending: u32,
}

/// Lifecycle state of a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrState {
    Open,
    Merged,
    Closed,
}

impl PrState {
    /// Parse a backend state string, case-insensitively.
    ///
    /// Anything outside the three known states means the record is
    /// malformed, so there is no lenient fallback.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "OPEN" => Some(PrState::Open),
            "MERGED" => Some(PrState::Merged),
            "CLOSED" => Some(PrState::Closed),
            _ => None,
        }
    }
}

/// Snapshot of a pull request at query time
///
/// Never mutated; each poll produces a fresh value or nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullRequest {
    /// PR number
    pub number: u32,
    /// PR title
    pub title: String,
    /// PR URL
    pub url: String,
    /// Open, merged, or closed
    pub state: PrState,
    /// Tallied CI check results
    pub checks: CheckTally,
    /// Count of unresolved review threads
    pub unresolved_threads: u32,
}

/// Identifies the GitHub repository backing a working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    /// Repository owner (user or organization login)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoCoordinates {
    /// The `owner/name` form gh commands take via `--repo`.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// A review thread, reduced to the one field status reporting needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewThread {
    /// Whether a reviewer has resolved the thread
    pub is_resolved: bool,
}

/// Pull request as returned by the backend, before check aggregation
#[derive(Debug, Clone)]
pub struct RawPullRequest {
    pub number: u32,
    pub title: String,
    pub url: String,
    pub state: PrState,
    /// Raw status-check rollup records, heterogeneous by design
    pub checks: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pr_state_parse_known_values() {
        assert_eq!(PrState::parse("OPEN"), Some(PrState::Open));
        assert_eq!(PrState::parse("MERGED"), Some(PrState::Merged));
        assert_eq!(PrState::parse("CLOSED"), Some(PrState::Closed));
    }

    #[test]
    fn test_pr_state_parse_is_case_insensitive() {
        assert_eq!(PrState::parse("open"), Some(PrState::Open));
        assert_eq!(PrState::parse("Merged"), Some(PrState::Merged));
    }

    #[test]
    fn test_pr_state_parse_rejects_unknown() {
        assert_eq!(PrState::parse("DRAFT"), None);
        assert_eq!(PrState::parse(""), None);
    }

    #[test]
    fn test_repo_coordinates_slug() {
        let repo = RepoCoordinates {
            owner: "louisboilard".to_string(),
            name: "prstatus".to_string(),
        };
        assert_eq!(repo.slug(), "louisboilard/prstatus");
    }

    #[test]
    fn test_check_tally_default_is_empty() {
        let tally = CheckTally::default();
        assert_eq!(tally.total, 0);
        assert_eq!(tally.pass + tally.fail + tally.pending, 0);
    }

    #[test]
    fn test_pull_request_serializes_state_uppercase() {
        let pr = PullRequest {
            number: 7,
            title: "Add retries".to_string(),
            url: "https://github.com/o/r/pull/7".to_string(),
            state: PrState::Open,
            checks: CheckTally::default(),
            unresolved_threads: 0,
        };
        let json = serde_json::to_string(&pr).unwrap();
        assert!(json.contains("\"state\":\"OPEN\""));
    }
}
