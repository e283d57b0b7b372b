//! Spinners for waits with no meaningful progress fraction.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::output::OutputContext;

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "];

/// A spinner that only exists when the terminal can show it.
///
/// Dropping it without finishing leaves the line as-is.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// Start a spinner, or a silent stand-in when progress is hidden.
    #[must_use]
    pub fn start(ctx: &OutputContext, message: &str) -> Self {
        if !ctx.show_progress() {
            return Self { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
            bar.set_style(style.tick_strings(FRAMES));
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar: Some(bar) }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    /// Replace the spinner with a check mark and `message`.
    pub fn finish_ok(self, message: &str) {
        if let Some(bar) = self.bar {
            if let Ok(style) = ProgressStyle::default_spinner().template("  ✓ {msg}") {
                bar.set_style(style);
            }
            bar.finish_with_message(message.to_string());
        }
    }

    /// Remove the spinner line.
    pub fn clear(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
