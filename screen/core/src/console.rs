//! Log Console
//!
//! Print-to-console pass-through for the log service. Each command appends
//! its message as one line; a `CLEAR` action empties the console first.

use std::collections::VecDeque;

use crate::command::{Action, Command};

/// Line terminator appended after every printed message
pub const LINE_ENDING: &str = "\r\n";

/// Bounded text console
#[derive(Debug, Clone)]
pub struct LogConsole {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl LogConsole {
    /// Create a console keeping at most `max_lines` lines (at least one)
    #[must_use]
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    /// Apply a log command
    pub fn print(&mut self, command: &Command) {
        if command.action() == Some(Action::Clear) {
            self.lines.clear();
        }

        let message = command.message.clone().unwrap_or_default();
        tracing::info!(
            target: "screen_core::console",
            service = %command.service,
            "{message}"
        );

        self.lines.push_back(message);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    /// Console text, each line terminated by [`LINE_ENDING`]
    #[must_use]
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .fold(String::new(), |mut text, line| {
                text.push_str(line);
                text.push_str(LINE_ENDING);
                text
            })
    }

    /// Retained lines, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Number of retained lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the console is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
