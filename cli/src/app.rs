//! Per-invocation context handed to every command handler.
//!
//! Built once from the global flags; commands borrow it for output, prompts,
//! and configuration loading.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::cli::GlobalFlags;
use crate::domain::GuestboxConfig;
use crate::infra::config::YamlConfigStore;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// Environment variable that answers every confirmation prompt with its default.
pub const ASSUME_YES_ENV: &str = "GUESTBOX_YES";

pub struct AppContext {
    pub output: OutputContext,
    pub config_store: YamlConfigStore,
    json: bool,
    /// Prompts are skipped under CI or with `GUESTBOX_YES`.
    assume_yes: bool,
}

impl AppContext {
    #[must_use]
    pub fn new(flags: &GlobalFlags) -> Self {
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            config_store: YamlConfigStore::new(flags.config.clone()),
            json: flags.json,
            assume_yes: std::env::var_os("CI").is_some()
                || std::env::var_os(ASSUME_YES_ENV).is_some(),
        }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Renderer for command results.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        if self.json {
            Renderer::Json(JsonRenderer)
        } else {
            Renderer::Human(HumanRenderer::new(&self.output))
        }
    }

    /// Progress sink for services. In JSON mode it writes to stderr so stdout
    /// holds a single document.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        if self.json {
            TerminalReporter::stderr(&self.output)
        } else {
            TerminalReporter::new(&self.output)
        }
    }

    /// Load and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing configuration file is unreadable or invalid.
    pub fn load_config(&self) -> Result<GuestboxConfig> {
        self.config_store.load()
    }

    /// Ask a yes/no question, answering `default` when prompts are disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (no TTY, for example).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.assume_yes {
            return Ok(default);
        }
        Ok(dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }
}
