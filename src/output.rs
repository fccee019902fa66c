//! Terminal output helpers for the CLI.

use chrono::Local;
use terminal_size::{terminal_size, Width};

// ANSI color codes
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const RED: &str = "\x1b[31m";
pub const GRAY: &str = "\x1b[90m";

const DEFAULT_TERMINAL_WIDTH: usize = 80;

/// Get the current terminal width, with a sane fallback
fn get_terminal_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH)
}

/// Truncate a line to the given width, appending an ellipsis when cut
pub fn truncate_to_width(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }

    let kept: String = line.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Print a status line, truncated to the terminal width
pub fn print_status_line(line: &str) {
    println!("{}", truncate_to_width(line, get_terminal_width()));
}

/// Note that there is nothing to display, without polluting stdout
pub fn print_no_status() {
    eprintln!("{DIM}no open pull request for this branch{RESET}");
}

/// Print one watch-mode update, timestamped
pub fn print_watch_update(line: Option<&str>) {
    let timestamp = Local::now().format("%H:%M:%S");
    match line {
        Some(line) => {
            let prefix_width = 11; // "[HH:MM:SS] "
            let width = get_terminal_width().saturating_sub(prefix_width);
            println!(
                "{GRAY}[{}]{RESET} {}",
                timestamp,
                truncate_to_width(line, width)
            );
        }
        None => println!("{GRAY}[{}] (no pull request){RESET}", timestamp),
    }
}

/// Announce the start of a watch loop
pub fn print_watch_started(interval_secs: u64) {
    println!(
        "{CYAN}Watching pull-request status{RESET} {GRAY}(every {}s, Ctrl-C to stop){RESET}",
        interval_secs
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_line_unchanged() {
        assert_eq!(truncate_to_width("hello", 80), "hello");
    }

    #[test]
    fn test_truncate_exact_width_unchanged() {
        assert_eq!(truncate_to_width("abcde", 5), "abcde");
    }

    #[test]
    fn test_truncate_long_line_gets_ellipsis() {
        let truncated = truncate_to_width("abcdefghij", 6);
        assert_eq!(truncated, "abcde…");
        assert_eq!(truncated.chars().count(), 6);
    }

    #[test]
    fn test_truncate_handles_multibyte_chars() {
        let line = "🟢 PR #42 · ✅ 4 checks passed";
        let truncated = truncate_to_width(line, 10);
        assert_eq!(truncated.chars().count(), 10);
        assert!(truncated.ends_with('…'));
    }
}
