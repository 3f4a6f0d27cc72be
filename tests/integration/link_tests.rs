//! Spawn linking: `spawn(identifier)` inside one machine's definition links
//! that machine (parent) to the machine bound to the identifier (source).

use statelift::{ExtractOptions, MachineLink, ParseSession};

const ACTORS: &str = include_str!("../fixtures/actors.ts");

fn session(source: &str) -> ParseSession {
    crate::init_tracing();
    ParseSession::new(source, ExtractOptions::default()).expect("session builds")
}

#[test]
fn test_child_links_to_spawning_parent() {
    let session = session(ACTORS);
    let result = session.extract();
    assert_eq!(result.machines.len(), 2);
    assert_eq!(
        result.machines[0].machine_variable_name(),
        Some("childMachine")
    );
    assert_eq!(
        result.links,
        [MachineLink {
            source_index: 0,
            parent_index: 1,
        }]
    );
}

#[test]
fn test_spawn_before_declaration_still_links() {
    // The link pass runs after the whole file is traversed, so lexical
    // order between parent and child does not matter.
    let session = session(
        r#"
        const parent = createMachine({
          entry: assign({ ref: () => spawn(child) }),
        });
        const child = createMachine({ id: "child" });
        "#,
    );
    let result = session.extract();
    assert_eq!(
        result.links,
        [MachineLink {
            source_index: 1,
            parent_index: 0,
        }]
    );
}

#[test]
fn test_multiple_spawns_produce_multiple_links() {
    let session = session(
        r#"
        const a = createMachine({ id: "a" });
        const b = createMachine({ id: "b" });
        const parent = createMachine({
          entry: assign({
            refs: () => [spawn(a), spawn(b)],
          }),
        });
        "#,
    );
    let result = session.extract();
    assert_eq!(
        result.links,
        [
            MachineLink {
                source_index: 0,
                parent_index: 2,
            },
            MachineLink {
                source_index: 1,
                parent_index: 2,
            },
        ]
    );
}

#[test]
fn test_spawn_of_non_machine_identifier_links_nothing() {
    let session = session(
        r#"
        const parent = createMachine({
          entry: assign({ ref: () => spawn(somethingElse) }),
        });
        "#,
    );
    let result = session.extract();
    assert!(result.links.is_empty());
}

#[test]
fn test_spawn_outside_every_definition_links_nothing() {
    let session = session(
        r#"
        const machine = createMachine({ id: "m" });
        const ref = spawn(machine);
        "#,
    );
    let result = session.extract();
    assert!(result.links.is_empty());
}

#[test]
fn test_spawn_with_call_argument_is_ignored() {
    let session = session(
        r#"
        const machine = createMachine({ id: "m" });
        const parent = createMachine({
          entry: assign({ ref: () => spawn(makeMachine()) }),
        });
        "#,
    );
    let result = session.extract();
    assert!(result.links.is_empty());
}
