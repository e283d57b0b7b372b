//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` so application services can emit progress events
//! without depending on any presentation type directly. In JSON mode every
//! line goes to stderr so stdout carries only the JSON document.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"`
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ! {message}"`
/// - `log()` prints `"    │ {line}"` dimmed
///
/// Everything is suppressed when `ctx.quiet`, except warnings.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    to_stderr: bool,
}

impl<'a> TerminalReporter<'a> {
    /// Reporter writing to stdout.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            to_stderr: false,
        }
    }

    /// Reporter writing to stderr, for JSON mode.
    #[must_use]
    pub fn stderr(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            to_stderr: true,
        }
    }

    fn emit(&self, line: &str) {
        if self.to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            self.emit(&format!("  {} {message}", "→".style(self.ctx.styles.marker)));
        }
    }

    fn success(&self, message: &str) {
        if !self.ctx.quiet {
            self.emit(&format!("  {} {message}", "✓".style(self.ctx.styles.ok)));
        }
    }

    fn warn(&self, message: &str) {
        self.emit(&format!("  {} {message}", "!".style(self.ctx.styles.caution)));
    }

    fn log(&self, line: &str) {
        if !self.ctx.quiet {
            self.emit(&format!("    {} {}", "│".style(self.ctx.styles.muted), line));
        }
    }
}
