//! prstatus CLI entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command
//! handler. The binary doubles as a minimal host for the status core:
//! `status` is a single poll, `watch` is the polling lifecycle.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use prstatus::error::{PrStatusError, Result};
use prstatus::output::{self, DIM, RED, RESET};
use prstatus::{
    format_status, git, is_gh_installed, parse_pr_url, query_by_number, GhCli, HostEvent,
    Selector, StatusService, StatusSink,
};

const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

#[derive(Parser)]
#[command(name = "prstatus")]
#[command(
    version,
    about = "Pull-request status line for the branch checked out in a working directory",
    after_help = "EXAMPLES:
    # One-shot status for the current branch's PR
    prstatus
    prstatus status --json

    # Keep polling, reprint on change
    prstatus watch --interval 15

    # Show the PR a piece of text refers to
    prstatus scan \"please review https://github.com/owner/repo/pull/42\"

    # Run against another checkout
    prstatus -C ~/src/other-repo"
)]
struct Cli {
    /// Working directory to report on (defaults to the current directory)
    #[arg(short = 'C', long = "dir", global = true, value_name = "DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the status line for the current branch's pull request
    Status {
        /// Emit the pull-request snapshot as JSON instead of the formatted line
        #[arg(long)]
        json: bool,
    },

    /// Poll on an interval, reprinting the status line when it changes
    Watch {
        /// Seconds between polls
        #[arg(short, long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
        interval: u64,
    },

    /// Scan text for a pull-request URL and print that PR's status
    Scan {
        /// Text that may contain a pull-request URL
        text: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{RED}Error:{RESET} {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(*shell, &mut Cli::command(), "prstatus", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Scan { text }) => scan_command(text),
        Some(Commands::Watch { interval }) => {
            let interval = (*interval).max(1);
            let dir = working_dir(&cli)?;
            watch_command(&dir, interval)
        }
        Some(Commands::Status { json }) => {
            let json = *json;
            let dir = working_dir(&cli)?;
            status_command(&dir, json)
        }
        None => {
            let dir = working_dir(&cli)?;
            status_command(&dir, false)
        }
    }
}

/// Resolve and validate the working directory for repo-scoped commands
fn working_dir(cli: &Cli) -> Result<PathBuf> {
    let dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    if !git::is_git_repo(&dir) {
        return Err(PrStatusError::NotARepository(dir));
    }
    if !is_gh_installed() {
        return Err(PrStatusError::GhNotInstalled);
    }

    Ok(dir)
}

/// One poll: print the active pull request's status line, or note its absence
fn status_command(dir: &Path, json: bool) -> Result<()> {
    let backend = GhCli;
    let mut selector = Selector::new();
    let line = selector.tick(&backend, dir);

    if json {
        match selector.state().last_pr.as_ref() {
            Some(pr) => println!("{}", serde_json::to_string_pretty(pr)?),
            None => output::print_no_status(),
        }
        return Ok(());
    }

    match line {
        Some(line) => output::print_status_line(&line),
        None => output::print_no_status(),
    }

    Ok(())
}

/// Print-on-change sink for watch mode
#[derive(Default)]
struct PrintSink {
    last: Option<Option<String>>,
}

impl StatusSink for PrintSink {
    fn set_status(&mut self, _key: &str, value: Option<String>) {
        if self.last.as_ref() == Some(&value) {
            return;
        }
        output::print_watch_update(value.as_deref());
        self.last = Some(value);
    }
}

/// Minimal host: session start, then a poll tick per interval until Ctrl-C
fn watch_command(dir: &Path, interval: u64) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
        .map_err(|e| PrStatusError::Signal(e.to_string()))?;

    let mut service = StatusService::new(GhCli);
    let mut sink = PrintSink::default();

    output::print_watch_started(interval);
    service.handle_event(
        HostEvent::SessionStart {
            dir: dir.to_path_buf(),
        },
        &mut sink,
    );

    'poll: while running.load(Ordering::SeqCst) {
        // Sleep in short slices so Ctrl-C is picked up promptly.
        for _ in 0..interval.saturating_mul(10) {
            if !running.load(Ordering::SeqCst) {
                break 'poll;
            }
            thread::sleep(Duration::from_millis(100));
        }
        service.handle_event(HostEvent::PollTick, &mut sink);
    }

    println!("{DIM}watch stopped{RESET}");
    Ok(())
}

/// Run the input-scan path once: pin whatever PR the text references
fn scan_command(text: &str) -> Result<()> {
    let Some(reference) = parse_pr_url(text) else {
        eprintln!("{DIM}no pull-request URL in input{RESET}");
        return Ok(());
    };

    let backend = GhCli;
    match query_by_number(&backend, &reference.repo, reference.number) {
        Some(pr) => output::print_status_line(&format_status(&pr)),
        None => eprintln!(
            "{DIM}could not fetch {}#{}{RESET}",
            reference.repo, reference.number
        ),
    }

    Ok(())
}
