//! Property-based tests for naming, labels, and port scanning.

use std::collections::BTreeSet;

use proptest::prelude::*;

use guestbox_cli::application::ports::PortProbe;
use guestbox_cli::application::services::port_allocator::find_free_port;
use guestbox_cli::domain::workspace::{container_labels, label_filters, validate_container_name};
use guestbox_cli::domain::{container_name, volume_name};
use guestbox_common::{TARGET_ID_LABEL, TOOLBOX_HOST_PORT_LABEL, WORKSPACE_ID_LABEL};

use crate::mocks::workspace;

struct Occupied(BTreeSet<u16>);

impl PortProbe for Occupied {
    fn is_available(&self, port: u16) -> bool {
        !self.0.contains(&port)
    }

    fn ephemeral_port(&self) -> anyhow::Result<u16> {
        anyhow::bail!("not used")
    }
}

proptest! {
    /// Container and volume names are `<target>-<workspace>` and accepted by the runtime.
    #[test]
    fn prop_container_name_joins_ids(
        target in "[a-z0-9][a-z0-9_.-]{0,15}",
        id in "[a-zA-Z0-9_.-]{1,24}",
    ) {
        let mut ws = workspace(&id);
        ws.target_id = target.clone();
        let name = container_name(&ws);
        prop_assert_eq!(&name, &format!("{target}-{id}"));
        prop_assert_eq!(volume_name(&ws), name.clone());
        prop_assert!(validate_container_name(&name).is_ok(), "rejected {}", name);
    }

    /// Ids containing characters the runtime rejects never produce a valid name.
    #[test]
    fn prop_invalid_characters_rejected(id in "[a-z]{1,8}[ /:@]{1,3}[a-z]{0,8}") {
        let ws = workspace(&id);
        prop_assert!(validate_container_name(&container_name(&ws)).is_err());
    }

    /// Label filters always select on the identity labels set at create time.
    #[test]
    fn prop_filters_match_labels(id in "[a-z0-9]{1,16}", toolbox in proptest::option::of(1024u16..=65535)) {
        let ws = workspace(&id);
        let labels = container_labels(&ws, toolbox);
        for filter in label_filters(&ws) {
            let (key, value) = filter.split_once('=').unwrap();
            prop_assert_eq!(labels.get(key).map(String::as_str), Some(value));
        }
        prop_assert_eq!(labels.get(WORKSPACE_ID_LABEL), Some(&id));
        prop_assert!(labels.contains_key(TARGET_ID_LABEL));
        prop_assert_eq!(labels.contains_key(TOOLBOX_HOST_PORT_LABEL), toolbox.is_some());
    }

    /// The scan returns the lowest free port in its window or fails.
    #[test]
    fn prop_find_free_port_returns_lowest_free(
        start in 8000u16..9000,
        limit in 1u16..50,
        taken in proptest::collection::btree_set(8000u16..9050, 0..60),
    ) {
        let probe = Occupied(taken.clone());
        let expected = (start..start + limit).find(|p| !taken.contains(p));
        match find_free_port(&probe, start, limit) {
            Ok(port) => prop_assert_eq!(Some(port), expected),
            Err(_) => prop_assert!(expected.is_none()),
        }
    }
}

#[test]
fn scan_near_top_of_range_does_not_overflow() {
    let probe = Occupied([65534, 65535].into_iter().collect());
    assert!(find_free_port(&probe, 65534, 100).is_err());
}
