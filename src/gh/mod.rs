//! GitHub CLI integration for pull-request status.
//!
//! This module turns `gh` output into a compact status line: query the
//! pull request backing a branch (or an explicit number), tally its check
//! rollup, count unresolved review threads, and render the result.
//!
//! # Modules
//!
//! - [`types`] - Core types for status reporting
//! - [`query`] - Backend trait and gh-backed queries
//! - [`checks`] - Check rollup and review-thread aggregation
//! - [`format`] - Status line formatting

mod checks;
mod format;
mod query;
mod types;

pub use checks::{aggregate_checks, count_unresolved};
pub use format::format_status;
pub use query::{is_gh_installed, query_by_branch, query_by_number, GhCli, StatusBackend};
pub use types::{CheckTally, PrState, PullRequest, RawPullRequest, RepoCoordinates, ReviewThread};
