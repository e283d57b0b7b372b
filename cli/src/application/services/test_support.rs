//! Shared fakes for application service tests.
//!
//! Fakes record every call so tests can assert on side effects, and replay
//! scripted answers where the last scripted answer repeats forever.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::Result;

use crate::application::ports::{
    CommandOutput, ContainerRuntime, PortProbe, ProgressReporter, Removal, RemoteSession,
    RemoteShell, UrlOpener,
};
use crate::domain::{ContainerInspection, ContainerSpec, SshEndpoint};

/// Pop the next scripted answer, keeping the last one in place.
fn next_scripted<T: Clone>(queue: &RefCell<VecDeque<T>>, fallback: T) -> T {
    let mut queue = queue.borrow_mut();
    if queue.len() > 1 {
        queue.pop_front().unwrap_or(fallback)
    } else {
        queue.front().cloned().unwrap_or(fallback)
    }
}

pub fn running() -> ContainerInspection {
    ContainerInspection {
        id: "cid".to_string(),
        status: "running".to_string(),
        running: true,
        host_ports: [(22, 10022), (8006, 8006)].into_iter().collect(),
        ..ContainerInspection::default()
    }
}

pub fn created() -> ContainerInspection {
    ContainerInspection {
        id: "cid".to_string(),
        status: "created".to_string(),
        ..ContainerInspection::default()
    }
}

pub fn exited(exit_code: i64) -> ContainerInspection {
    ContainerInspection {
        id: "cid".to_string(),
        status: "exited".to_string(),
        exit_code,
        ..ContainerInspection::default()
    }
}

// ── Container runtime ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeRuntime {
    pub calls: RefCell<Vec<String>>,
    pub inspections: RefCell<VecDeque<Option<ContainerInspection>>>,
    pub labelled: Vec<String>,
    pub fail_create: bool,
    pub fail_start: bool,
    pub fail_kill: bool,
    pub fail_volume_removal: bool,
    pub created: RefCell<Option<ContainerSpec>>,
    pub removed: Cell<bool>,
}

impl FakeRuntime {
    pub fn with_inspections(inspections: Vec<Option<ContainerInspection>>) -> Self {
        Self {
            inspections: RefCell::new(inspections.into()),
            ..Self::default()
        }
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl ContainerRuntime for FakeRuntime {
    async fn ping(&self) -> Result<String> {
        self.record("ping".to_string());
        Ok("27.0.0".to_string())
    }

    async fn create(&self, spec: &ContainerSpec) -> Result<String> {
        self.record(format!("create:{}", spec.name));
        if self.fail_create {
            anyhow::bail!("Conflict. The container name is already in use");
        }
        *self.created.borrow_mut() = Some(spec.clone());
        Ok("cid".to_string())
    }

    async fn start(&self, container: &str) -> Result<()> {
        self.record(format!("start:{container}"));
        if self.fail_start {
            anyhow::bail!("cannot start: /dev/kvm missing");
        }
        Ok(())
    }

    async fn stop(&self, container: &str, timeout_secs: i64) -> Result<()> {
        self.record(format!("stop:{container}:{timeout_secs}"));
        Ok(())
    }

    async fn kill(&self, container: &str) -> Result<()> {
        self.record(format!("kill:{container}"));
        if self.fail_kill {
            anyhow::bail!("kill failed");
        }
        Ok(())
    }

    async fn inspect(&self, container: &str) -> Result<Option<ContainerInspection>> {
        self.record(format!("inspect:{container}"));
        Ok(next_scripted(&self.inspections, None))
    }

    async fn remove_container(&self, container: &str) -> Result<Removal> {
        self.record(format!("remove_container:{container}"));
        if self.removed.replace(true) {
            Ok(Removal::AlreadyAbsent)
        } else {
            Ok(Removal::Removed)
        }
    }

    async fn remove_volume(&self, volume: &str) -> Result<Removal> {
        self.record(format!("remove_volume:{volume}"));
        if self.fail_volume_removal {
            anyhow::bail!("volume is in use");
        }
        Ok(Removal::AlreadyAbsent)
    }

    async fn find_by_labels(&self, filters: &[String]) -> Result<Vec<String>> {
        self.record(format!("find:{}", filters.join(",")));
        Ok(self.labelled.clone())
    }

    async fn pull_image(&self, image: &str, reporter: &dyn ProgressReporter) -> Result<()> {
        self.record(format!("pull:{image}"));
        reporter.log("Pull complete");
        Ok(())
    }

    async fn logs(
        &self,
        container: &str,
        _follow: bool,
        reporter: &dyn ProgressReporter,
    ) -> Result<()> {
        self.record(format!("logs:{container}"));
        reporter.log("booting");
        Ok(())
    }
}

// ── Remote shell ──────────────────────────────────────────────────────────────

/// Scripted shell: `connects` answers each dial, `failing` lists commands
/// that exit non-zero.
#[derive(Default)]
pub struct FakeShell {
    pub connects: RefCell<VecDeque<bool>>,
    pub attempts: Cell<u32>,
    pub failing: Vec<String>,
    pub executed: Rc<RefCell<Vec<String>>>,
    pub closed: Rc<Cell<u32>>,
}

impl FakeShell {
    pub fn reachable() -> Self {
        Self::scripted(vec![true])
    }

    pub fn unreachable() -> Self {
        Self::scripted(vec![false])
    }

    pub fn scripted(connects: Vec<bool>) -> Self {
        Self {
            connects: RefCell::new(connects.into()),
            ..Self::default()
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }
}

pub struct FakeSession {
    failing: Vec<String>,
    executed: Rc<RefCell<Vec<String>>>,
    closed: Rc<Cell<u32>>,
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.closed.set(self.closed.get() + 1);
    }
}

impl RemoteShell for FakeShell {
    type Session = FakeSession;

    async fn connect(&self, _endpoint: &SshEndpoint) -> Result<FakeSession> {
        self.attempts.set(self.attempts.get() + 1);
        if !next_scripted(&self.connects, true) {
            anyhow::bail!("connection refused");
        }
        Ok(FakeSession {
            failing: self.failing.clone(),
            executed: Rc::clone(&self.executed),
            closed: Rc::clone(&self.closed),
        })
    }
}

impl RemoteSession for FakeSession {
    async fn exec(&self, command: &str) -> Result<CommandOutput> {
        self.executed.borrow_mut().push(command.to_string());
        if self.failing.iter().any(|f| f == command) {
            return Ok(CommandOutput {
                status: 1,
                stdout: String::new(),
                stderr: "Access is denied.".to_string(),
            });
        }
        Ok(CommandOutput {
            status: 0,
            stdout: "SUCCESS: Specified value was saved.".to_string(),
            stderr: String::new(),
        })
    }
}

// ── Port probe ────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeProbe {
    pub occupied: Vec<u16>,
    pub ephemeral: Option<u16>,
}

impl FakeProbe {
    pub fn occupied(ports: &[u16]) -> Self {
        Self {
            occupied: ports.to_vec(),
            ephemeral: Some(45000),
        }
    }
}

impl PortProbe for FakeProbe {
    fn is_available(&self, port: u16) -> bool {
        !self.occupied.contains(&port)
    }

    fn ephemeral_port(&self) -> Result<u16> {
        self.ephemeral
            .ok_or_else(|| anyhow::anyhow!("no ephemeral ports left"))
    }
}

// ── Viewer and reporter ───────────────────────────────────────────────────────

/// Viewer that is never available.
pub struct NoViewer;

impl UrlOpener for NoViewer {
    fn open(&self, _url: &str) -> Result<()> {
        anyhow::bail!("unsupported platform")
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub lines: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l.contains(needle))
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.lines.borrow_mut().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.lines.borrow_mut().push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.lines.borrow_mut().push(format!("warn: {message}"));
    }
    fn log(&self, line: &str) {
        self.lines.borrow_mut().push(format!("log: {line}"));
    }
}
