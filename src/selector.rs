//! Active pull-request selection.
//!
//! Across polls and input events exactly one pull request is "active" for
//! a session: normally the one tied to the checked-out branch, sometimes
//! one pinned by a URL the user pasted. The selector owns that decision
//! and all the per-session state behind it.

use std::path::Path;

use regex::Regex;

use crate::gh::{
    format_status, query_by_branch, query_by_number, PrState, PullRequest, RepoCoordinates,
    StatusBackend,
};
use crate::git::DETACHED_HEAD;

const PR_URL_PATTERN: &str = r"https://[^/\s]+/([^/\s]+)/([^/\s]+)/pull/(\d+)";

/// Explicit override of the active pull request, parsed from user text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedRef {
    /// Repository in `owner/name` form
    pub repo: String,
    /// PR number
    pub number: u32,
}

/// Extract a pull-request reference from free text.
///
/// Matches `https://<host>/<owner>/<repo>/pull/<digits>` anywhere inside
/// the text; surrounding prose is ignored. Issue links and other paths do
/// not match.
pub fn parse_pr_url(text: &str) -> Option<PinnedRef> {
    let re = Regex::new(PR_URL_PATTERN).unwrap();
    let caps = re.captures(text)?;

    let number: u32 = caps[3].parse().ok()?;
    if number == 0 {
        return None;
    }

    Some(PinnedRef {
        repo: format!("{}/{}", &caps[1], &caps[2]),
        number,
    })
}

/// Per-session selection state
///
/// Mutated only by selection transitions; reset wholesale on session
/// switch.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Branch seen on the previous poll
    pub last_branch: Option<String>,
    /// Pull request currently displayed
    pub last_pr: Option<PullRequest>,
    /// Explicit override, if any
    pub pinned: Option<PinnedRef>,
}

/// Outcome of scanning one input event
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    /// No pull-request URL in the text, or the mention was deliberately
    /// ignored
    Ignored,
    /// A new pin was set; carries the new display line (`None` when the
    /// pinned query failed)
    Pinned(Option<String>),
}

/// Decides which pull request a session displays.
///
/// One instance per session. Driven from outside by poll ticks and input
/// events; never spawns work of its own.
pub struct Selector {
    state: SelectionState,
    cached_repo: Option<RepoCoordinates>,
}

impl Selector {
    pub fn new() -> Self {
        Self {
            state: SelectionState::default(),
            cached_repo: None,
        }
    }

    /// Current selection state, for hosts that want to inspect it.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Drop all per-session state, including the repository-coordinates
    /// cache. Called on session switch; the caller follows up with a tick.
    pub fn reset(&mut self) {
        self.state = SelectionState::default();
        self.cached_repo = None;
    }

    /// Run one poll: decide the active pull request and return its status
    /// line, or `None` when nothing should be displayed.
    pub fn tick(&mut self, backend: &dyn StatusBackend, dir: &Path) -> Option<String> {
        let branch = backend.resolve_branch(dir);

        // A branch change invalidates whatever was displayed for the old
        // branch. The pin, if any, survives.
        if branch != self.state.last_branch {
            self.state.last_pr = None;
            self.state.last_branch = branch.clone();
        }

        if let Some(pin) = self.state.pinned.clone() {
            return self.tick_pinned(backend, dir, &branch, &pin);
        }

        let Some(branch) = branch else {
            self.state.last_pr = None;
            return None;
        };
        if branch == DETACHED_HEAD {
            self.state.last_pr = None;
            return None;
        }

        let repo = self.repo_coordinates(backend, dir);
        match query_by_branch(backend, dir, repo.as_ref()) {
            Some(pr) => Some(self.display(pr)),
            None => {
                self.state.last_pr = None;
                None
            }
        }
    }

    /// Poll while pinned: the pin holds unless the branch has grown its
    /// own open pull request, which reclaims priority.
    fn tick_pinned(
        &mut self,
        backend: &dyn StatusBackend,
        dir: &Path,
        branch: &Option<String>,
        pin: &PinnedRef,
    ) -> Option<String> {
        let Some(pinned_pr) = query_by_number(backend, &pin.repo, pin.number) else {
            // Transient failure: show nothing this tick, keep the pin so
            // the next poll can recover.
            self.state.last_pr = None;
            return None;
        };

        if branch_is_usable(branch) {
            let repo = self.repo_coordinates(backend, dir);
            if let Some(branch_pr) = query_by_branch(backend, dir, repo.as_ref()) {
                if branch_pr.state == PrState::Open {
                    self.state.pinned = None;
                    return Some(self.display(branch_pr));
                }
            }
        }

        Some(self.display(pinned_pr))
    }

    /// Scan input text for a pull-request URL and maybe re-pin.
    ///
    /// A mention of the pin already in place is ignored, as is any mention
    /// while the branch's own open pull request is selected: an incidental
    /// link must not hijack an in-progress branch's display.
    pub fn handle_input(&mut self, backend: &dyn StatusBackend, text: &str) -> InputOutcome {
        let Some(reference) = parse_pr_url(text) else {
            return InputOutcome::Ignored;
        };

        if self.state.pinned.as_ref() == Some(&reference) {
            return InputOutcome::Ignored;
        }

        let branch_pr_open = self.state.pinned.is_none()
            && self
                .state
                .last_pr
                .as_ref()
                .is_some_and(|pr| pr.state == PrState::Open);
        if branch_pr_open {
            return InputOutcome::Ignored;
        }

        self.state.pinned = Some(reference.clone());
        match query_by_number(backend, &reference.repo, reference.number) {
            Some(pr) => {
                let line = self.display(pr);
                InputOutcome::Pinned(Some(line))
            }
            None => {
                self.state.last_pr = None;
                InputOutcome::Pinned(None)
            }
        }
    }

    fn display(&mut self, pr: PullRequest) -> String {
        let line = format_status(&pr);
        self.state.last_pr = Some(pr);
        line
    }

    /// Repository coordinates, looked up once per session.
    fn repo_coordinates(
        &mut self,
        backend: &dyn StatusBackend,
        dir: &Path,
    ) -> Option<RepoCoordinates> {
        if self.cached_repo.is_none() {
            self.cached_repo = backend.resolve_repo(dir);
        }
        self.cached_repo.clone()
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new()
    }
}

fn branch_is_usable(branch: &Option<String>) -> bool {
    matches!(branch.as_deref(), Some(b) if b != DETACHED_HEAD)
}
