//! Host event boundary.
//!
//! The host owns the status-bar slot and the polling timer; this module
//! owns everything in between. Events come in, formatted lines (or a
//! clear) go out through the sink. One service instance serves one host
//! session at a time.

use std::path::PathBuf;

use crate::gh::StatusBackend;
use crate::selector::{InputOutcome, Selector};

/// Stable key identifying this tool's slot in the host status bar.
pub const STATUS_KEY: &str = "pr-status";

/// Receives status updates. Passing `None` clears the displayed status.
pub trait StatusSink {
    fn set_status(&mut self, key: &str, value: Option<String>);
}

/// Where an input event originated.
///
/// Hosts echo internally generated text back through the same input
/// channel; only genuine user input is scanned for pull-request URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOrigin {
    User,
    Synthesized,
}

/// Lifecycle and input events delivered by the host
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A session began in the given working directory
    SessionStart { dir: PathBuf },
    /// The session moved to a different working directory
    SessionSwitch { dir: PathBuf },
    /// The session ended; stop polling and clear the slot
    SessionShutdown,
    /// Periodic poll from the host's timer
    PollTick,
    /// Free text the user (or the host itself) entered
    Input { text: String, origin: InputOrigin },
    /// Expanded prompt text from the pre-agent-start hook; scanned the
    /// same way as user input
    PromptExpanded { text: String },
}

/// Translates host events into selector operations and sink updates.
pub struct StatusService<B: StatusBackend> {
    backend: B,
    selector: Selector,
    dir: Option<PathBuf>,
    polling: bool,
}

impl<B: StatusBackend> StatusService<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            selector: Selector::new(),
            dir: None,
            polling: false,
        }
    }

    /// Handle one host event, pushing any display change into the sink.
    pub fn handle_event(&mut self, event: HostEvent, sink: &mut dyn StatusSink) {
        match event {
            HostEvent::SessionStart { dir } | HostEvent::SessionSwitch { dir } => {
                self.selector.reset();
                self.dir = Some(dir);
                self.polling = true;
                self.poll(sink);
            }
            HostEvent::SessionShutdown => {
                self.selector.reset();
                self.dir = None;
                self.polling = false;
                sink.set_status(STATUS_KEY, None);
            }
            HostEvent::PollTick => {
                if self.polling {
                    self.poll(sink);
                }
            }
            HostEvent::Input { origin, .. } if origin == InputOrigin::Synthesized => {}
            HostEvent::Input { text, .. } | HostEvent::PromptExpanded { text } => {
                match self.selector.handle_input(&self.backend, &text) {
                    InputOutcome::Ignored => {}
                    InputOutcome::Pinned(line) => sink.set_status(STATUS_KEY, line),
                }
            }
        }
    }

    fn poll(&mut self, sink: &mut dyn StatusSink) {
        let Some(dir) = self.dir.clone() else {
            return;
        };
        let line = self.selector.tick(&self.backend, &dir);
        sink.set_status(STATUS_KEY, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gh::{PrState, RawPullRequest, RepoCoordinates, ReviewThread};
    use std::path::Path;

    #[derive(Default)]
    struct FakeBackend {
        branch: Option<String>,
        branch_pr: Option<RawPullRequest>,
        numbered_pr: Option<RawPullRequest>,
    }

    impl StatusBackend for FakeBackend {
        fn resolve_branch(&self, _dir: &Path) -> Option<String> {
            self.branch.clone()
        }

        fn resolve_repo(&self, _dir: &Path) -> Option<RepoCoordinates> {
            Some(RepoCoordinates {
                owner: "owner".to_string(),
                name: "repo".to_string(),
            })
        }

        fn pr_for_branch(&self, _dir: &Path) -> Option<RawPullRequest> {
            self.branch_pr.clone()
        }

        fn pr_by_number(&self, _repo: &str, _number: u32) -> Option<RawPullRequest> {
            self.numbered_pr.clone()
        }

        fn review_threads(&self, _repo: &str, _number: u32) -> Option<Vec<ReviewThread>> {
            Some(Vec::new())
        }
    }

    /// Records every update pushed through the sink.
    #[derive(Default)]
    struct RecordingSink {
        updates: Vec<(String, Option<String>)>,
    }

    impl StatusSink for RecordingSink {
        fn set_status(&mut self, key: &str, value: Option<String>) {
            self.updates.push((key.to_string(), value));
        }
    }

    impl RecordingSink {
        fn last(&self) -> Option<&Option<String>> {
            self.updates.last().map(|(_, v)| v)
        }
    }

    fn raw(number: u32, state: PrState) -> RawPullRequest {
        RawPullRequest {
            number,
            title: String::new(),
            url: format!("https://github.com/owner/repo/pull/{}", number),
            state,
            checks: Vec::new(),
        }
    }

    fn backend_with_branch_pr() -> FakeBackend {
        FakeBackend {
            branch: Some("feature/retries".to_string()),
            branch_pr: Some(raw(42, PrState::Open)),
            numbered_pr: None,
        }
    }

    #[test]
    fn test_session_start_polls_immediately() {
        let mut service = StatusService::new(backend_with_branch_pr());
        let mut sink = RecordingSink::default();

        service.handle_event(
            HostEvent::SessionStart {
                dir: PathBuf::from("/work/repo"),
            },
            &mut sink,
        );

        let line = sink.last().unwrap().as_ref().unwrap();
        assert!(line.contains("PR #42"));
        assert_eq!(sink.updates[0].0, STATUS_KEY);
    }

    #[test]
    fn test_poll_tick_before_session_start_does_nothing() {
        let mut service = StatusService::new(backend_with_branch_pr());
        let mut sink = RecordingSink::default();

        service.handle_event(HostEvent::PollTick, &mut sink);
        assert!(sink.updates.is_empty());
    }

    #[test]
    fn test_shutdown_clears_slot_and_stops_polling() {
        let mut service = StatusService::new(backend_with_branch_pr());
        let mut sink = RecordingSink::default();

        service.handle_event(
            HostEvent::SessionStart {
                dir: PathBuf::from("/work/repo"),
            },
            &mut sink,
        );
        service.handle_event(HostEvent::SessionShutdown, &mut sink);
        assert_eq!(sink.last(), Some(&None));

        let updates_after_shutdown = sink.updates.len();
        service.handle_event(HostEvent::PollTick, &mut sink);
        assert_eq!(sink.updates.len(), updates_after_shutdown);
    }

    #[test]
    fn test_session_switch_repolls_new_directory() {
        let mut service = StatusService::new(backend_with_branch_pr());
        let mut sink = RecordingSink::default();

        service.handle_event(
            HostEvent::SessionStart {
                dir: PathBuf::from("/work/one"),
            },
            &mut sink,
        );
        service.handle_event(
            HostEvent::SessionSwitch {
                dir: PathBuf::from("/work/two"),
            },
            &mut sink,
        );

        assert_eq!(sink.updates.len(), 2);
        assert!(sink.last().unwrap().is_some());
    }

    #[test]
    fn test_synthesized_input_is_ignored() {
        let mut backend = backend_with_branch_pr();
        backend.branch_pr = None;
        backend.numbered_pr = Some(raw(7, PrState::Open));

        let mut service = StatusService::new(backend);
        let mut sink = RecordingSink::default();

        service.handle_event(
            HostEvent::SessionStart {
                dir: PathBuf::from("/work/repo"),
            },
            &mut sink,
        );
        let before = sink.updates.len();

        service.handle_event(
            HostEvent::Input {
                text: "https://github.com/other/repo/pull/7".to_string(),
                origin: InputOrigin::Synthesized,
            },
            &mut sink,
        );
        assert_eq!(sink.updates.len(), before);
    }

    #[test]
    fn test_user_input_with_url_pins_and_updates() {
        let mut backend = backend_with_branch_pr();
        backend.branch_pr = None;
        backend.numbered_pr = Some(raw(7, PrState::Open));

        let mut service = StatusService::new(backend);
        let mut sink = RecordingSink::default();

        service.handle_event(
            HostEvent::SessionStart {
                dir: PathBuf::from("/work/repo"),
            },
            &mut sink,
        );
        service.handle_event(
            HostEvent::Input {
                text: "check https://github.com/other/repo/pull/7".to_string(),
                origin: InputOrigin::User,
            },
            &mut sink,
        );

        let line = sink.last().unwrap().as_ref().unwrap();
        assert!(line.contains("PR #7"));
    }

    #[test]
    fn test_prompt_expansion_gets_same_scan_as_input() {
        let mut backend = backend_with_branch_pr();
        backend.branch_pr = None;
        backend.numbered_pr = Some(raw(7, PrState::Open));

        let mut service = StatusService::new(backend);
        let mut sink = RecordingSink::default();

        service.handle_event(
            HostEvent::SessionStart {
                dir: PathBuf::from("/work/repo"),
            },
            &mut sink,
        );
        service.handle_event(
            HostEvent::PromptExpanded {
                text: "expanded: https://github.com/other/repo/pull/7".to_string(),
            },
            &mut sink,
        );

        let line = sink.last().unwrap().as_ref().unwrap();
        assert!(line.contains("PR #7"));
    }

    #[test]
    fn test_input_without_url_changes_nothing() {
        let mut service = StatusService::new(backend_with_branch_pr());
        let mut sink = RecordingSink::default();

        service.handle_event(
            HostEvent::SessionStart {
                dir: PathBuf::from("/work/repo"),
            },
            &mut sink,
        );
        let before = sink.updates.len();

        service.handle_event(
            HostEvent::Input {
                text: "just some typing".to_string(),
                origin: InputOrigin::User,
            },
            &mut sink,
        );
        assert_eq!(sink.updates.len(), before);
    }
}
