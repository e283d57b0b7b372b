//! Terminal and JSON output.

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Width of the key column in `key  value` listings.
const FIELD_WIDTH: usize = 11;

/// Terminal capabilities and the user's output preferences.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a terminal.
    pub is_tty: bool,
    /// `--quiet`: only warnings and errors are printed.
    pub quiet: bool,
}

impl OutputContext {
    /// Colours are used only on a terminal, without `--no-color` or `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let colored = is_tty && !no_color && std::env::var_os("NO_COLOR").is_none();
        Self {
            styles: if colored {
                Styles::colored()
            } else {
                Styles::default()
            },
            is_tty,
            quiet,
        }
    }

    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print an aligned `key  value` line.
    pub fn field(&self, key: &str, value: impl std::fmt::Display) {
        if !self.quiet {
            println!(
                "  {}  {value}",
                format!("{key:<FIELD_WIDTH$}").style(self.styles.muted)
            );
        }
    }

    /// Print an informational line.
    pub fn notice(&self, msg: &str) {
        if !self.quiet {
            println!("  {msg}");
        }
    }

    /// Print a warning. Shown even when quiet.
    pub fn caution(&self, msg: &str) {
        println!("  {} {msg}", "!".style(self.styles.caution));
    }

    /// Print an error line to stderr.
    pub fn problem(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.failure));
    }
}

/// Renderer for the active output mode.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}
