//! Command implementations

pub mod config;
pub mod create;
pub mod destroy;
pub mod doctor;
pub mod logs;
pub mod open;
pub mod pull;
pub mod start;
pub mod status;
pub mod stop;
pub mod version;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use guestbox_common::Workspace;

use crate::app::AppContext;
use crate::application::services::WorkspaceLifecycle;
use crate::domain::GuestboxConfig;
use crate::infra::browser::SystemUrlOpener;
use crate::infra::docker::BollardRuntime;
use crate::infra::network::HostPortProbe;
use crate::infra::ssh::Ssh2Shell;
use crate::infra::workspace_file::{WORKSPACE_ENV, load_workspace};

/// Workspace selection shared by every workspace command.
#[derive(Args)]
pub struct WorkspaceArgs {
    /// Workspace description (JSON) written by the orchestrator
    #[arg(long, short = 'w', env = WORKSPACE_ENV)]
    pub workspace: PathBuf,
}

impl WorkspaceArgs {
    /// Read the workspace file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or invalid.
    pub fn load(&self) -> Result<Workspace> {
        load_workspace(&self.workspace)
    }
}

/// Production adapters plus the configuration they were built from.
pub struct Provider {
    pub config: GuestboxConfig,
    pub runtime: BollardRuntime,
    pub shell: Ssh2Shell,
    pub probe: HostPortProbe,
    pub opener: SystemUrlOpener,
}

impl Provider {
    /// Load the configuration and connect the runtime client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or no runtime client
    /// can be built.
    pub async fn connect(app: &AppContext) -> Result<Self> {
        let config = app.load_config()?;
        let runtime = BollardRuntime::connect(&config.target).await?;
        Ok(Self {
            config,
            runtime,
            shell: Ssh2Shell,
            probe: HostPortProbe,
            opener: SystemUrlOpener,
        })
    }

    #[must_use]
    pub fn lifecycle(
        &self,
    ) -> WorkspaceLifecycle<'_, BollardRuntime, Ssh2Shell, HostPortProbe, SystemUrlOpener> {
        WorkspaceLifecycle::new(
            &self.runtime,
            &self.shell,
            &self.probe,
            &self.opener,
            &self.config,
        )
    }
}
