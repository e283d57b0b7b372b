//! Human-readable terminal renderer.

use std::path::Path;

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize as _;

use crate::application::services::{RequirementStatus, WorkspaceState, WorkspaceStatus};
use crate::domain::GuestboxConfig;
use crate::output::OutputContext;

/// Renders service results as human-readable terminal output.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version.
    pub fn render_version(&self, version: &str) {
        println!("guestbox {version}");
    }

    /// Render a workspace status snapshot.
    pub fn render_status(&self, status: &WorkspaceStatus) {
        self.ctx.field("Workspace:", &status.workspace_id);
        self.ctx.field("Container:", &status.container);
        self.ctx.field(
            "State:",
            state_display(status.state).style(self.ctx.styles.state(status.state)),
        );
        if let Some(port) = status.ssh_port {
            self.ctx.field("SSH port:", port);
        }
        if let Some(url) = &status.ui_url {
            self.ctx.field("Desktop:", url);
        }
        if let Some(started) = status.started_at {
            self.ctx.field("Uptime:", format_uptime(started, Utc::now()));
        }
        if let Some(error) = &status.error {
            self.ctx.problem(error);
        }
    }

    /// Render requirement checks. Returns `true` when all are met.
    pub fn render_requirements(&self, results: &[RequirementStatus]) -> bool {
        println!();
        println!("  {}", "Host requirements".style(self.ctx.styles.heading));
        println!();
        for result in results {
            self.print_check(result.met, &result.name);
            if !result.met {
                println!("      {}", result.reason.style(self.ctx.styles.muted));
            }
        }
        println!();
        let all_met = results.iter().all(|r| r.met);
        if all_met {
            println!(
                "  {} Everything looks good!",
                "\u{2713}".style(self.ctx.styles.ok)
            );
        } else {
            let unmet = results.iter().filter(|r| !r.met).count();
            println!(
                "  {} Found {unmet} issue(s).",
                "\u{2717}".style(self.ctx.styles.failure)
            );
        }
        all_met
    }

    /// Render the effective configuration.
    pub fn render_config(&self, config: &GuestboxConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.heading)
        );
        println!();
        let target = config
            .target
            .docker_host
            .as_deref()
            .unwrap_or(&config.target.sock_path);
        println!("  {:<22} {target}", "runtime:");
        println!(
            "  {:<22} {}",
            "remote host:",
            config.target.remote_hostname.as_deref().unwrap_or("(local)")
        );
        println!("  {:<22} {}", "guest image:", config.guest.image);
        println!("  {:<22} {}", "guest user:", config.guest.username);
        println!(
            "  {:<22} {}s",
            "boot poll interval:", config.timing.boot_poll_interval_secs
        );
        println!(
            "  {:<22} {}",
            "boot timeout:",
            config
                .timing
                .boot_timeout_secs
                .map_or_else(|| "none".to_string(), |s| format!("{s}s"))
        );
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.heading));
        for var in ["GUESTBOX_CONFIG", "GUESTBOX_WORKSPACE", "GUESTBOX_LOG", "NO_COLOR"] {
            println!(
                "    {:<20} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }

    fn print_check(&self, ok: bool, msg: &str) {
        if ok {
            println!("    {} {msg}", "\u{2713}".style(self.ctx.styles.ok));
        } else {
            println!("    {} {msg}", "\u{2717}".style(self.ctx.styles.failure));
        }
    }
}

// ── Display helpers ──────────────────────────────────────────────────────────

#[must_use]
pub fn state_display(state: WorkspaceState) -> &'static str {
    match state {
        WorkspaceState::Absent => "absent",
        WorkspaceState::Running => "running",
        WorkspaceState::Stopped => "stopped",
        WorkspaceState::Crashed => "crashed",
    }
}

/// Format the time since `started` as "Xh Ym" or "Xm".
#[must_use]
pub fn format_uptime(started: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes_total = (now - started).num_minutes().max(0);
    let hours = minutes_total / 60;
    let minutes = minutes_total % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
