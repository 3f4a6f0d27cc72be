//! Facade query coverage: transition enumeration order, target filtering,
//! recursive action/guard/service collection, kind filters, named delays,
//! and options lookups.

use statelift::{DeclarationKind, ExtractOptions, ParseSession, TransitionKind};

const KITCHEN_SINK: &str = include_str!("../fixtures/kitchen_sink.ts");

fn session(source: &str) -> ParseSession {
    crate::init_tracing();
    ParseSession::new(source, ExtractOptions::default()).expect("session builds")
}

#[test]
fn test_transitions_enumerate_in_slot_order() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let machine = &result.machines[0];

    let loading: Vec<TransitionKind> = machine
        .transitions()
        .into_iter()
        .filter(|t| t.from_path == ["loading"])
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        loading,
        [
            TransitionKind::On {
                event: "CANCEL".to_string()
            },
            TransitionKind::After {
                delay: "10000".to_string()
            },
            TransitionKind::After {
                delay: "SLOW_WARNING".to_string()
            },
            TransitionKind::InvokeOnDone,
            TransitionKind::InvokeOnError,
        ]
    );
}

#[test]
fn test_transition_count_is_conserved() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let machine = &result.machines[0];

    let transitions = machine.transitions();
    assert_eq!(transitions.len(), 9);

    // Exactly one transition (the SLOW_WARNING delay) has no target.
    let targets = machine.transition_targets();
    assert_eq!(targets.len(), 8);
    let targetless = transitions
        .iter()
        .filter(|t| t.transition.target.is_none())
        .count();
    assert_eq!(transitions.len(), targets.len() + targetless);
}

#[test]
fn test_transition_targets_carry_origin_paths() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let machine = &result.machines[0];

    let from_failure: Vec<String> = machine
        .transition_targets()
        .into_iter()
        .filter(|t| t.from_path == ["failure"])
        .map(|t| t.target[0].value.clone())
        .collect();
    // RETRY first (on), then the always transition.
    assert_eq!(from_failure, ["loading", "idle"]);
}

#[test]
fn test_all_actions_descends_into_choose() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let machine = &result.machines[0];

    let actions = machine.all_actions(None);
    assert_eq!(actions.len(), 11);

    let named: Vec<String> = machine
        .all_actions(Some(&[DeclarationKind::Named]))
        .into_iter()
        .map(|entry| {
            assert_eq!(entry.action.kind, DeclarationKind::Named);
            entry.action.name.clone()
        })
        .collect();
    assert_eq!(named.len(), 7);
    for expected in [
        "recordStart",
        "resetUi",
        "logRequest",
        "warnSlow",
        "recordError",
        "wow",
        "cool",
    ] {
        assert!(
            named.iter().any(|name| name == expected),
            "missing action {expected}"
        );
    }

    // The choose branch actions are tagged with the state they fire from.
    let wow = machine
        .all_actions(None)
        .into_iter()
        .find(|entry| entry.action.name == "wow")
        .unwrap();
    assert_eq!(wow.state_path, ["failure"]);
}

#[test]
fn test_all_actions_kind_filter() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let machine = &result.machines[0];

    let inline = machine.all_actions(Some(&[DeclarationKind::Inline]));
    // Two assigns, the notifyDone alias, and the choose helper itself.
    assert_eq!(inline.len(), 4);
    assert!(machine
        .all_actions(Some(&[DeclarationKind::Unknown]))
        .is_empty());
}

#[test]
fn test_all_guards_include_choose_branch_conds() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let machine = &result.machines[0];

    let guards = machine.all_guards(None);
    assert_eq!(guards.len(), 3);

    let named: Vec<String> = machine
        .all_guards(Some(&[DeclarationKind::Named]))
        .into_iter()
        .map(|entry| entry.guard.name.clone())
        .collect();
    assert!(named.contains(&"hasUrl".to_string()));
    assert!(named.contains(&"shouldLog".to_string()));

    let inline = machine.all_guards(Some(&[DeclarationKind::Inline]));
    assert_eq!(inline.len(), 1);
    assert_eq!(inline[0].state_path, ["failure"]);
}

#[test]
fn test_all_services() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let machine = &result.machines[0];

    let services = machine.all_services(None);
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].src.value, "fetchData");
    assert_eq!(services[0].src.kind, DeclarationKind::Named);
    assert_eq!(services[0].state_path, ["loading"]);
    assert_eq!(services[0].invoke.id.as_ref().unwrap().value, "loadData");
}

#[test]
fn test_named_delays_exclude_literal_durations() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let machine = &result.machines[0];

    let delays = machine.named_delays();
    assert_eq!(delays.len(), 1);
    let slow = &delays["SLOW_WARNING"];
    assert_eq!(slow.len(), 1);
    assert_eq!(slow[0].state_path, ["loading"]);
}

#[test]
fn test_implementation_lookups() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let machine = &result.machines[0];

    assert!(machine.action_implementation("logRequest").is_some());
    assert!(machine.action_implementation("missing").is_none());
    assert!(machine.guard_implementation("hasUrl").is_some());
    let fetch_data = machine.service_implementation("fetchData").unwrap();
    assert_eq!(fetch_data.kind(), "arrow_function");
}

#[test]
fn test_guard_only_transition_is_enumerated() {
    let session = session(
        r#"
        const m = createMachine({
          on: { CHECK: { cond: "stillValid", actions: "recheck" } },
        });
        "#,
    );
    let result = session.extract();
    let machine = &result.machines[0];
    assert_eq!(machine.transitions().len(), 1);
    assert!(machine.transition_targets().is_empty());
    assert_eq!(machine.all_guards(None).len(), 1);
}
