//! End-to-end extraction over the kitchen-sink fixture: machine discovery,
//! the flattened state tree, and diagnostic degradation on malformed input.

use statelift::{ExtractOptions, ParseSession};

const KITCHEN_SINK: &str = include_str!("../fixtures/kitchen_sink.ts");

fn session(source: &str) -> ParseSession {
    crate::init_tracing();
    ParseSession::new(source, ExtractOptions::default()).expect("session builds")
}

#[test]
fn test_fixture_yields_one_machine() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    assert_eq!(result.machines.len(), 1);
    assert!(result.unparseable.is_empty());

    let machine = &result.machines[0];
    assert_eq!(machine.callee_name(), "createMachine");
    assert_eq!(machine.machine_variable_name(), Some("fetchMachine"));
}

#[test]
fn test_state_paths_are_unique_and_complete() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let machine = &result.machines[0];

    let mut paths: Vec<Vec<String>> = machine
        .all_state_nodes()
        .into_iter()
        .map(|entry| entry.path)
        .collect();
    assert_eq!(
        paths,
        [
            vec![],
            vec!["idle".to_string()],
            vec!["loading".to_string()],
            vec!["success".to_string()],
            vec!["failure".to_string()],
        ]
    );
    let before = paths.len();
    paths.dedup();
    assert_eq!(paths.len(), before);
}

#[test]
fn test_state_lookup_by_path() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let machine = &result.machines[0];

    let loading = machine.state_node_by_path(&["loading"]).unwrap();
    let invoke = loading.node.invoke.as_ref().unwrap();
    assert_eq!(invoke[0].id.as_ref().unwrap().value, "loadData");

    let success = machine.state_node_by_path(&["success"]).unwrap();
    assert_eq!(success.node.state_type.as_ref().unwrap().value, "final");

    assert!(machine.state_node_by_path(&["missing"]).is_none());
    // Path comparison is exact, not prefix-based.
    assert!(machine.state_node_by_path(&["loading", "idle"]).is_none());
}

#[test]
fn test_root_state_is_the_empty_path() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let machine = &result.machines[0];

    let root = machine.state_node_by_path(&[]).unwrap();
    assert_eq!(root.node.id.as_ref().unwrap().value, "fetch");
    assert_eq!(root.node.initial.as_ref().unwrap().value, "idle");
}

#[test]
fn test_nested_states_get_nested_paths() {
    let session = session(
        r#"
        const m = createMachine({
          states: {
            outer: { states: { inner: { states: { deepest: {} } } } },
          },
        });
        "#,
    );
    let result = session.extract();
    let machine = &result.machines[0];
    assert!(machine
        .state_node_by_path(&["outer", "inner", "deepest"])
        .is_some());
}

#[test]
fn test_multiple_machines_in_source_order() {
    let session = session(
        r#"
        const one = createMachine({ id: "one" });
        const two = Machine({ id: "two" });
        const three = createMachine({ id: "three" });
        "#,
    );
    let result = session.extract();
    let ids: Vec<_> = result
        .machines
        .iter()
        .map(|m| m.definition().unwrap().id.as_ref().unwrap().value.clone())
        .collect();
    assert_eq!(ids, ["one", "two", "three"]);
}

#[test]
fn test_unparseable_structural_slot_degrades() {
    let session = session(
        r#"
        const m = createMachine({
          initial: "a",
          states: computeStates(),
        });
        "#,
    );
    let result = session.extract();
    assert_eq!(result.machines.len(), 1);
    // The machine survives; the bad slot is reported, not fatal.
    let machine = &result.machines[0];
    assert_eq!(machine.all_state_nodes().len(), 1);
    assert_eq!(result.unparseable.len(), 1);
    assert_eq!(result.unparseable[0].node.kind(), "call_expression");
}

#[test]
fn test_machine_without_object_argument_keeps_call() {
    let session = session("const m = createMachine(buildConfig());");
    let result = session.extract();
    assert_eq!(result.machines.len(), 1);
    assert!(result.machines[0].definition().is_none());
    assert!(result.machines[0].to_config().is_none());
}

#[test]
fn test_file_without_constructors_extracts_nothing() {
    let session = session("export const add = (a: number, b: number) => a + b;");
    let result = session.extract();
    assert!(result.machines.is_empty());
    assert!(result.comments.is_empty());
}
