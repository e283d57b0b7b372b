//! Port fakes built on the public API only.
//!
//! Each fake logs calls into a shared journal so tests can assert on the
//! order of runtime and guest interactions.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use anyhow::Result;
use guestbox_cli::application::ports::{
    CommandOutput, ContainerRuntime, PortProbe, ProgressReporter, Removal, RemoteSession,
    RemoteShell, UrlOpener,
};
use guestbox_cli::domain::{ContainerInspection, ContainerSpec, SshEndpoint};
use guestbox_common::{Repository, TargetConfigRef, Workspace};

pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn workspace(id: &str) -> Workspace {
    Workspace {
        id: id.to_string(),
        target_id: "local".to_string(),
        name: format!("{id}-name"),
        repository: Repository {
            url: "https://git.example.com/app.git".to_string(),
            branch: Some("main".to_string()),
        },
        env_vars: BTreeMap::from([("EDITOR".to_string(), "vim".to_string())]),
        target_config: TargetConfigRef::default(),
    }
}

pub fn inspection(status: &str, running: bool) -> ContainerInspection {
    ContainerInspection {
        id: "c0ffee".to_string(),
        status: status.to_string(),
        running,
        started_at: running.then(|| "2026-10-01T08:00:00.000000000Z".to_string()),
        host_ports: if running {
            [(22, 10022), (8006, 8007)].into_iter().collect()
        } else {
            BTreeMap::new()
        },
        ..ContainerInspection::default()
    }
}

// ── Runtime ───────────────────────────────────────────────────────────────────

/// Runtime whose inspections replay a script; the last entry sticks.
pub struct ScriptedRuntime {
    pub journal: Journal,
    script: RefCell<VecDeque<Option<ContainerInspection>>>,
    pub specs: RefCell<Vec<ContainerSpec>>,
}

impl ScriptedRuntime {
    pub fn new(journal: &Journal, script: Vec<Option<ContainerInspection>>) -> Self {
        Self {
            journal: Rc::clone(journal),
            script: RefCell::new(script.into()),
            specs: RefCell::new(Vec::new()),
        }
    }

    fn note(&self, entry: String) {
        self.journal.borrow_mut().push(entry);
    }
}

impl ContainerRuntime for ScriptedRuntime {
    async fn ping(&self) -> Result<String> {
        Ok("27.3.1".to_string())
    }

    async fn create(&self, spec: &ContainerSpec) -> Result<String> {
        self.note(format!("runtime.create {}", spec.name));
        self.specs.borrow_mut().push(spec.clone());
        Ok("c0ffee".to_string())
    }

    async fn start(&self, container: &str) -> Result<()> {
        self.note(format!("runtime.start {container}"));
        Ok(())
    }

    async fn stop(&self, container: &str, _timeout_secs: i64) -> Result<()> {
        self.note(format!("runtime.stop {container}"));
        Ok(())
    }

    async fn kill(&self, container: &str) -> Result<()> {
        self.note(format!("runtime.kill {container}"));
        Ok(())
    }

    async fn inspect(&self, _container: &str) -> Result<Option<ContainerInspection>> {
        let mut script = self.script.borrow_mut();
        let next = if script.len() > 1 {
            script.pop_front().flatten()
        } else {
            script.front().cloned().flatten()
        };
        Ok(next)
    }

    async fn remove_container(&self, container: &str) -> Result<Removal> {
        self.note(format!("runtime.remove_container {container}"));
        Ok(Removal::Removed)
    }

    async fn remove_volume(&self, volume: &str) -> Result<Removal> {
        self.note(format!("runtime.remove_volume {volume}"));
        Ok(Removal::Removed)
    }

    async fn find_by_labels(&self, _filters: &[String]) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn pull_image(&self, image: &str, _reporter: &dyn ProgressReporter) -> Result<()> {
        self.note(format!("runtime.pull {image}"));
        Ok(())
    }

    async fn logs(
        &self,
        _container: &str,
        _follow: bool,
        _reporter: &dyn ProgressReporter,
    ) -> Result<()> {
        Ok(())
    }
}

// ── Guest shell ───────────────────────────────────────────────────────────────

/// Guest that refuses the first `refusals` dials, then accepts.
pub struct BootingGuest {
    pub journal: Journal,
    refusals: RefCell<u32>,
}

impl BootingGuest {
    pub fn new(journal: &Journal, refusals: u32) -> Self {
        Self {
            journal: Rc::clone(journal),
            refusals: RefCell::new(refusals),
        }
    }
}

pub struct GuestSession {
    journal: Journal,
}

impl RemoteShell for BootingGuest {
    type Session = GuestSession;

    async fn connect(&self, endpoint: &SshEndpoint) -> Result<GuestSession> {
        let mut refusals = self.refusals.borrow_mut();
        if *refusals > 0 {
            *refusals -= 1;
            anyhow::bail!("connection refused ({}:{})", endpoint.host, endpoint.port);
        }
        self.journal
            .borrow_mut()
            .push(format!("guest.connect {}:{}", endpoint.host, endpoint.port));
        Ok(GuestSession {
            journal: Rc::clone(&self.journal),
        })
    }
}

impl RemoteSession for GuestSession {
    async fn exec(&self, command: &str) -> Result<CommandOutput> {
        self.journal.borrow_mut().push(format!("guest.exec {command}"));
        Ok(CommandOutput::default())
    }
}

// ── Host ──────────────────────────────────────────────────────────────────────

pub struct OpenHost;

impl PortProbe for OpenHost {
    fn is_available(&self, _port: u16) -> bool {
        true
    }

    fn ephemeral_port(&self) -> Result<u16> {
        Ok(41234)
    }
}

/// Viewer that records every URL it was asked to open.
#[derive(Default)]
pub struct RecordingViewer {
    pub opened: RefCell<Vec<String>>,
}

impl UrlOpener for RecordingViewer {
    fn open(&self, url: &str) -> Result<()> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

/// Reporter that discards everything.
pub struct Silent;

impl ProgressReporter for Silent {
    fn step(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn log(&self, _line: &str) {}
}
