pub mod error;
pub mod exec;
pub mod gh;
pub mod git;
pub mod output;
pub mod selector;
pub mod service;

pub use error::{PrStatusError, Result};
pub use gh::{
    aggregate_checks, count_unresolved, format_status, is_gh_installed, query_by_branch,
    query_by_number, CheckTally, GhCli, PrState, PullRequest, RepoCoordinates, ReviewThread,
    StatusBackend,
};
pub use git::DETACHED_HEAD;
pub use selector::{parse_pr_url, InputOutcome, PinnedRef, SelectionState, Selector};
pub use service::{HostEvent, InputOrigin, StatusService, StatusSink, STATUS_KEY};
