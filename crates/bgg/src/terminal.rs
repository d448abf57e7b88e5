use bgg_search::{DisplayEntry, DisplaySurface};
use colored::Colorize;
use std::io::Write;

/// Prints each render as a numbered list.
pub struct TerminalSurface<W: Write> {
    out: W,
    busy: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, busy: false }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            log::warn!("Failed to write results: {e}");
        }
    }
}

/// Display text for one entry: `  1. Name (year)  game/13`
pub fn format_entry(index: usize, entry: &DisplayEntry) -> String {
    format!(
        "{:>3}. {}  {}",
        index + 1,
        entry.label,
        entry.href.dimmed()
    )
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn clear(&mut self) {
        self.line(&"(cleared)".dimmed().to_string());
    }

    fn set_busy(&mut self, busy: bool) {
        if busy && !self.busy {
            self.line(&"searching...".dimmed().to_string());
        }
        self.busy = busy;
    }

    fn show(&mut self, entries: Vec<DisplayEntry>) {
        if entries.is_empty() {
            self.line(&"No matches".yellow().to_string());
            return;
        }
        for (i, entry) in entries.iter().enumerate() {
            let text = format_entry(i, entry);
            self.line(&text);
        }
    }
}
