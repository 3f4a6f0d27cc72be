//! Cross-file resolution through a module resolver: imported identifiers
//! referenced from machine slots resolve into the imported module's tree.

use statelift::{ExtractOptions, ParseSession};

#[test]
fn test_imported_states_object_resolves() {
    crate::init_tracing();
    let options = ExtractOptions::default().with_resolver(|specifier: &str| {
        (specifier == "./states").then(|| {
            r#"
            export const sharedStates = {
              waiting: { on: { GO: "done" } },
              done: { type: "final" },
            };
            "#
            .to_string()
        })
    });
    let session = ParseSession::new(
        r#"
        import { sharedStates } from "./states";
        const m = createMachine({ initial: "waiting", states: sharedStates });
        "#,
        options,
    )
    .unwrap();

    let result = session.extract();
    let machine = &result.machines[0];
    assert_eq!(machine.all_state_nodes().len(), 3);

    let waiting = machine.state_node_by_path(&["waiting"]).unwrap();
    let on = waiting.node.on.as_ref().unwrap();
    let go = &on.get("GO").unwrap().value[0];
    assert_eq!(go.target.as_ref().unwrap()[0].value, "done");
}

#[test]
fn test_imported_spread_keeps_module_context() {
    crate::init_tracing();
    let options = ExtractOptions::default().with_resolver(|specifier: &str| {
        (specifier == "./shared").then(|| {
            r#"
            export const sharedStates = {
              waiting: { on: { GO: "done" } },
            };
            "#
            .to_string()
        })
    });
    let session = ParseSession::new(
        r#"
        import { sharedStates } from "./shared";
        const m = createMachine({
          initial: "waiting",
          states: { ...sharedStates, done: { type: "final" } },
        });
        "#,
        options,
    )
    .unwrap();

    let result = session.extract();
    let machine = &result.machines[0];
    assert_eq!(machine.all_state_nodes().len(), 3);

    // Spliced state values live in the imported module's text; their inner
    // slots must parse against that module, not the importing file.
    let waiting = machine.state_node_by_path(&["waiting"]).unwrap();
    let on = waiting.node.on.as_ref().unwrap();
    let go = &on.get("GO").unwrap().value[0];
    assert_eq!(go.target.as_ref().unwrap()[0].value, "done");

    let done = machine.state_node_by_path(&["done"]).unwrap();
    assert_eq!(done.node.state_type.as_ref().unwrap().value, "final");
}

#[test]
fn test_import_alias_resolves_under_local_name() {
    crate::init_tracing();
    let options = ExtractOptions::default().with_resolver(|_: &str| {
        Some(r#"export const config = { initial: "only", states: { only: {} } };"#.to_string())
    });
    let session = ParseSession::new(
        r#"
        import { config as machineConfig } from "./shared";
        const m = createMachine(machineConfig);
        "#,
        options,
    )
    .unwrap();

    let result = session.extract();
    let machine = &result.machines[0];
    let definition = machine.definition().unwrap();
    assert_eq!(definition.initial.as_ref().unwrap().value, "only");
    assert!(machine.state_node_by_path(&["only"]).is_some());
}

#[test]
fn test_unresolved_import_degrades_to_absence() {
    crate::init_tracing();
    let session = ParseSession::new(
        r#"
        import { sharedStates } from "./missing";
        const m = createMachine({ initial: "a", states: sharedStates });
        "#,
        ExtractOptions::default(),
    )
    .unwrap();

    let result = session.extract();
    let machine = &result.machines[0];
    assert_eq!(machine.all_state_nodes().len(), 1);
    assert_eq!(
        machine.definition().unwrap().initial.as_ref().unwrap().value,
        "a"
    );
}

#[test]
fn test_imported_scalar_resolves() {
    crate::init_tracing();
    let options = ExtractOptions::default().with_resolver(|specifier: &str| {
        (specifier == "./constants").then(|| r#"export const FIRST = "ready";"#.to_string())
    });
    let session = ParseSession::new(
        r#"
        import { FIRST } from "./constants";
        const m = createMachine({ initial: FIRST, states: { ready: {} } });
        "#,
        options,
    )
    .unwrap();

    let result = session.extract();
    let definition = result.machines[0].definition().unwrap();
    assert_eq!(definition.initial.as_ref().unwrap().value, "ready");
}
