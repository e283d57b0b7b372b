//! Workspace lifecycle journeys through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use guestbox_cli::application::services::{
    StartOutcome, StopOutcome, WorkspaceLifecycle, WorkspaceState,
};
use guestbox_cli::domain::GuestboxConfig;
use guestbox_common::TOOLBOX_HOST_PORT_LABEL;

use crate::mocks::{
    BootingGuest, Journal, OpenHost, RecordingViewer, ScriptedRuntime, Silent, inspection,
    workspace,
};

fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

#[tokio::test(start_paused = true)]
async fn create_boots_guest_before_configuring_it() {
    let log = journal();
    let runtime = ScriptedRuntime::new(
        &log,
        vec![Some(inspection("created", false)), Some(inspection("running", true))],
    );
    let guest = BootingGuest::new(&log, 2);
    let viewer = RecordingViewer::default();
    let config = GuestboxConfig::default();
    let lifecycle = WorkspaceLifecycle::new(&runtime, &guest, &OpenHost, &viewer, &config);

    let outcome = lifecycle.create(&workspace("ws1"), &Silent).await.unwrap();

    assert_eq!(outcome.failed_commands, 0);
    assert_eq!(outcome.ports.toolbox, Some(41234));
    assert_eq!(*viewer.opened.borrow(), vec!["http://localhost:8006".to_string()]);
    let spec = &runtime.specs.borrow()[0];
    assert_eq!(spec.name, "local-ws1");
    assert_eq!(
        spec.labels.get(TOOLBOX_HOST_PORT_LABEL).map(String::as_str),
        Some("41234")
    );

    let log = log.borrow();
    assert_eq!(log[0], "runtime.create local-ws1");
    assert_eq!(log[1], "runtime.start local-ws1");
    assert_eq!(log[2], "guest.connect localhost:10022");
    let execs: Vec<&String> = log.iter().filter(|l| l.starts_with("guest.exec")).collect();
    assert_eq!(execs.len(), 3);
    assert_eq!(execs[0], "guest.exec setx EDITOR \"vim\"");
}

#[tokio::test(start_paused = true)]
async fn start_uses_ports_published_by_the_runtime() {
    let log = journal();
    let runtime = ScriptedRuntime::new(
        &log,
        vec![Some(inspection("exited", false)), Some(inspection("running", true))],
    );
    let guest = BootingGuest::new(&log, 1);
    let viewer = RecordingViewer::default();
    let config = GuestboxConfig::default();
    let lifecycle = WorkspaceLifecycle::new(&runtime, &guest, &OpenHost, &viewer, &config);

    let outcome = lifecycle.start(&workspace("ws1"), &Silent).await.unwrap();

    assert_eq!(
        outcome,
        StartOutcome::Started {
            ui_url: Some("http://localhost:8007".to_string())
        }
    );
    assert_eq!(
        *log.borrow(),
        vec![
            "runtime.start local-ws1".to_string(),
            "guest.connect localhost:10022".to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn stop_prefers_guest_shutdown_over_kill() {
    let log = journal();
    let runtime = ScriptedRuntime::new(&log, vec![Some(inspection("running", true))]);
    let guest = BootingGuest::new(&log, 0);
    let viewer = RecordingViewer::default();
    let config = GuestboxConfig::default();
    let lifecycle = WorkspaceLifecycle::new(&runtime, &guest, &OpenHost, &viewer, &config);

    let outcome = lifecycle.stop(&workspace("ws1"), &Silent).await.unwrap();

    assert_eq!(outcome, StopOutcome::GuestShutdown);
    assert!(log.borrow().contains(&"guest.exec sudo shutdown -h now".to_string()));
    assert!(!log.borrow().iter().any(|l| l.starts_with("runtime.kill")));
}

#[tokio::test(start_paused = true)]
async fn destroyed_workspace_reports_absent() {
    let log = journal();
    let runtime = ScriptedRuntime::new(&log, vec![None]);
    let guest = BootingGuest::new(&log, 0);
    let viewer = RecordingViewer::default();
    let config = GuestboxConfig::default();
    let lifecycle = WorkspaceLifecycle::new(&runtime, &guest, &OpenHost, &viewer, &config);

    lifecycle.destroy(&workspace("ws1"), &Silent).await.unwrap();
    let status = lifecycle.status(&workspace("ws1")).await.unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "runtime.remove_container local-ws1".to_string(),
            "runtime.remove_volume local-ws1".to_string(),
        ]
    );
    assert_eq!(status.state, WorkspaceState::Absent);
    assert_eq!(status.container, "local-ws1");
    assert!(status.ui_url.is_none());
}

#[tokio::test(start_paused = true)]
async fn status_of_running_workspace_serializes_ports() {
    let log = journal();
    let runtime = ScriptedRuntime::new(&log, vec![Some(inspection("running", true))]);
    let guest = BootingGuest::new(&log, 0);
    let viewer = RecordingViewer::default();
    let config = GuestboxConfig::default();
    let lifecycle = WorkspaceLifecycle::new(&runtime, &guest, &OpenHost, &viewer, &config);

    let status = lifecycle.status(&workspace("ws1")).await.unwrap();
    let json = serde_json::to_value(&status).unwrap();

    assert_eq!(json["state"], "running");
    assert_eq!(json["ssh_port"], 10022);
    assert_eq!(json["ui_url"], "http://localhost:8007");
    assert!(json.get("error").is_none());
}
