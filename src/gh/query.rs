//! Pull-request status queries via the GitHub CLI.
//!
//! Every operation here is silent on failure: no auth, no network, a
//! malformed response, or a timeout all come back as `None` and the next
//! poll gets another chance. Nothing at this layer ever reaches the user.

use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use serde_json::Value;

use crate::exec::{run_with_timeout, QUERY_TIMEOUT};
use crate::git;

use super::checks::{aggregate_checks, count_unresolved};
use super::types::{PullRequest, PrState, RawPullRequest, RepoCoordinates, ReviewThread};

/// Fields requested from `gh pr view`
const PR_VIEW_FIELDS: &str = "number,title,url,state,statusCheckRollup";

/// Check if the GitHub CLI (gh) is installed and available in PATH
pub fn is_gh_installed() -> bool {
    let mut cmd = Command::new("gh");
    cmd.arg("--version");
    run_with_timeout(cmd, QUERY_TIMEOUT)
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Backend contracts consumed by the status core.
///
/// Implementations must fail silently: any error is an absent value.
pub trait StatusBackend {
    /// Current branch name for the working directory, detached-head
    /// sentinel included.
    fn resolve_branch(&self, dir: &Path) -> Option<String>;

    /// Owner/name of the repository backing the working directory.
    fn resolve_repo(&self, dir: &Path) -> Option<RepoCoordinates>;

    /// The pull request associated with the working directory's current
    /// branch, if one exists.
    fn pr_for_branch(&self, dir: &Path) -> Option<RawPullRequest>;

    /// A pull request looked up by explicit `owner/name` and number.
    fn pr_by_number(&self, repo: &str, number: u32) -> Option<RawPullRequest>;

    /// Up to 100 review threads for the given pull request.
    fn review_threads(&self, repo: &str, number: u32) -> Option<Vec<ReviewThread>>;
}

/// Query the pull request for the directory's current branch.
///
/// When repository coordinates are known, the unresolved-thread count is
/// fetched as well; if that secondary query fails the count degrades to 0
/// rather than discarding the whole result.
pub fn query_by_branch(
    backend: &dyn StatusBackend,
    dir: &Path,
    repo: Option<&RepoCoordinates>,
) -> Option<PullRequest> {
    let raw = backend.pr_for_branch(dir)?;

    let unresolved_threads = repo
        .and_then(|coords| backend.review_threads(&coords.slug(), raw.number))
        .map(|threads| count_unresolved(&threads))
        .unwrap_or(0);

    Some(assemble(raw, unresolved_threads))
}

/// Query a pull request by explicit repository and number.
pub fn query_by_number(backend: &dyn StatusBackend, repo: &str, number: u32) -> Option<PullRequest> {
    let raw = backend.pr_by_number(repo, number)?;

    let unresolved_threads = backend
        .review_threads(repo, raw.number)
        .map(|threads| count_unresolved(&threads))
        .unwrap_or(0);

    Some(assemble(raw, unresolved_threads))
}

fn assemble(raw: RawPullRequest, unresolved_threads: u32) -> PullRequest {
    PullRequest {
        number: raw.number,
        title: raw.title,
        url: raw.url,
        state: raw.state,
        checks: aggregate_checks(&raw.checks),
        unresolved_threads,
    }
}

/// Real backend that shells out to the `gh` and `git` CLIs.
#[derive(Debug, Default)]
pub struct GhCli;

impl GhCli {
    fn run_gh(args: &[&str], dir: Option<&Path>) -> Option<String> {
        let mut cmd = Command::new("gh");
        cmd.args(args);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        let output = run_with_timeout(cmd, QUERY_TIMEOUT)?;
        if !output.status.success() {
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            return None;
        }

        Some(stdout)
    }
}

impl StatusBackend for GhCli {
    fn resolve_branch(&self, dir: &Path) -> Option<String> {
        git::resolve_branch(dir)
    }

    fn resolve_repo(&self, dir: &Path) -> Option<RepoCoordinates> {
        let stdout = Self::run_gh(&["repo", "view", "--json", "owner,name"], Some(dir))?;
        parse_repo_coordinates(&stdout)
    }

    fn pr_for_branch(&self, dir: &Path) -> Option<RawPullRequest> {
        let stdout = Self::run_gh(&["pr", "view", "--json", PR_VIEW_FIELDS], Some(dir))?;
        parse_pr_view(&stdout)
    }

    fn pr_by_number(&self, repo: &str, number: u32) -> Option<RawPullRequest> {
        let number = number.to_string();
        let stdout = Self::run_gh(
            &["pr", "view", &number, "--repo", repo, "--json", PR_VIEW_FIELDS],
            None,
        )?;
        parse_pr_view(&stdout)
    }

    fn review_threads(&self, repo: &str, number: u32) -> Option<Vec<ReviewThread>> {
        let (owner, name) = repo.split_once('/')?;

        let query = r#"
            query($owner: String!, $repo: String!, $pr: Int!) {
                repository(owner: $owner, name: $repo) {
                    pullRequest(number: $pr) {
                        reviewThreads(first: 100) {
                            nodes {
                                isResolved
                            }
                        }
                    }
                }
            }
        "#;

        let stdout = Self::run_gh(
            &[
                "api",
                "graphql",
                "-f",
                &format!("query={}", query),
                "-f",
                &format!("owner={}", owner),
                "-f",
                &format!("repo={}", name),
                "-F",
                &format!("pr={}", number),
            ],
            None,
        )?;

        parse_review_threads(&stdout)
    }
}

/// Parse `gh repo view --json owner,name` output.
///
/// The owner arrives as an object carrying the login.
fn parse_repo_coordinates(raw: &str) -> Option<RepoCoordinates> {
    let parsed: Value = serde_json::from_str(raw).ok()?;

    let owner = parsed
        .pointer("/owner/login")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())?
        .to_string();
    let name = parsed
        .get("name")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())?
        .to_string();

    Some(RepoCoordinates { owner, name })
}

/// Parse `gh pr view --json` output into a raw pull request.
///
/// Number, url, and a recognizable state are required; a missing rollup is
/// an empty one.
fn parse_pr_view(raw: &str) -> Option<RawPullRequest> {
    let parsed: Value = serde_json::from_str(raw).ok()?;

    let number = parsed.get("number").and_then(|v| v.as_u64())?;
    if number == 0 {
        return None;
    }

    let url = parsed
        .get("url")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())?
        .to_string();
    let state = PrState::parse(parsed.get("state").and_then(|v| v.as_str())?)?;
    let title = parsed
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let checks = parsed
        .get("statusCheckRollup")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    Some(RawPullRequest {
        number: number as u32,
        title,
        url,
        state,
        checks,
    })
}

// GraphQL response structures, nullable at every level gh can null out.
#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
}

#[derive(Deserialize)]
struct GraphQlData {
    repository: Option<RepositoryData>,
}

#[derive(Deserialize)]
struct RepositoryData {
    #[serde(rename = "pullRequest")]
    pull_request: Option<PullRequestData>,
}

#[derive(Deserialize)]
struct PullRequestData {
    #[serde(rename = "reviewThreads")]
    review_threads: ReviewThreadsConnection,
}

#[derive(Deserialize)]
struct ReviewThreadsConnection {
    nodes: Vec<ReviewThreadNode>,
}

#[derive(Deserialize)]
struct ReviewThreadNode {
    #[serde(rename = "isResolved")]
    is_resolved: bool,
}

fn parse_review_threads(raw: &str) -> Option<Vec<ReviewThread>> {
    let response: GraphQlResponse = serde_json::from_str(raw).ok()?;

    let nodes = response
        .data?
        .repository?
        .pull_request?
        .review_threads
        .nodes;

    Some(
        nodes
            .into_iter()
            .map(|n| ReviewThread {
                is_resolved: n.is_resolved,
            })
            .collect(),
    )
}
