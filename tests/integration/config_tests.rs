//! `to_config` projection: shape, inline markers, and idempotence when the
//! projected config is fed back through extraction.

use serde_json::json;
use statelift::{ExtractOptions, ParseSession, INLINE_IMPLEMENTATION_TYPE};

const KITCHEN_SINK: &str = include_str!("../fixtures/kitchen_sink.ts");

fn session(source: &str) -> ParseSession {
    crate::init_tracing();
    ParseSession::new(source, ExtractOptions::default()).expect("session builds")
}

#[test]
fn test_minimal_machine_config() {
    let session = session(r#"const m = createMachine({ initial: "idle", states: { idle: {} } });"#);
    let result = session.extract();
    let config = result.machines[0].to_config().unwrap();
    assert_eq!(
        config,
        json!({ "initial": "idle", "states": { "idle": {} } })
    );
}

#[test]
fn test_kitchen_sink_config_shape() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let config = result.machines[0].to_config().unwrap();

    assert_eq!(config["id"], "fetch");
    assert_eq!(config["initial"], "idle");
    // Action slots always project as name arrays.
    assert_eq!(config["entry"], json!(["recordStart"]));
    assert_eq!(
        config["states"]["idle"]["entry"],
        json!([INLINE_IMPLEMENTATION_TYPE, "resetUi"])
    );
    assert_eq!(
        config["states"]["idle"]["on"]["FETCH"],
        json!([{ "target": "loading", "cond": "hasUrl", "actions": ["logRequest"] }])
    );
    assert_eq!(
        config["states"]["loading"]["after"]["10000"],
        json!([{ "target": "failure" }])
    );
    assert_eq!(config["states"]["success"]["type"], "final");
    // Context and schema are never projected.
    assert!(config.get("context").is_none());
}

#[test]
fn test_named_invoke_src_projects_by_name() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let config = result.machines[0].to_config().unwrap();

    let invoke = &config["states"]["loading"]["invoke"][0];
    assert_eq!(invoke["id"], "loadData");
    assert_eq!(invoke["src"], "fetchData");
    assert_eq!(invoke["onDone"][0]["target"], "success");
    assert_eq!(invoke["onError"][0]["target"], "failure");
}

#[test]
fn test_inline_invoke_src_projects_as_marker() {
    let session = session(
        r#"
        const m = createMachine({
          invoke: { src: async () => fetchThing() },
        });
        "#,
    );
    let result = session.extract();
    let config = result.machines[0].to_config().unwrap();
    assert_eq!(config["invoke"][0]["src"], INLINE_IMPLEMENTATION_TYPE);
}

#[test]
fn test_identifier_invoke_src_keeps_text() {
    let session = session(
        r#"
        const m = createMachine({
          invoke: { src: loaderService },
        });
        "#,
    );
    let result = session.extract();
    let config = result.machines[0].to_config().unwrap();
    assert_eq!(config["invoke"][0]["src"], "loaderService");
}

#[test]
fn test_array_valued_target_stays_an_array() {
    let session = session(
        r#"
        const m = createMachine({
          on: { SPLIT: { target: ["a", "b"] } },
        });
        "#,
    );
    let result = session.extract();
    let config = result.machines[0].to_config().unwrap();
    assert_eq!(config["on"]["SPLIT"][0]["target"], json!(["a", "b"]));
}

#[test]
fn test_projection_round_trips() {
    let session = session(KITCHEN_SINK);
    let result = session.extract();
    let first = result.machines[0].to_config().unwrap();

    // The projected config is itself a valid machine definition: extracting
    // it again must project to the identical value.
    let source = format!(
        "const m = createMachine({});",
        serde_json::to_string_pretty(&first).unwrap()
    );
    let session = ParseSession::new(&source, ExtractOptions::default()).unwrap();
    let result = session.extract();
    let second = result.machines[0].to_config().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_meta_projects_description_only() {
    let session = session(
        r#"
        const m = createMachine({
          meta: { description: "top level", layout: { x: 1 } },
          description: `outer`,
        });
        "#,
    );
    let result = session.extract();
    let config = result.machines[0].to_config().unwrap();
    assert_eq!(config["meta"], json!({ "description": "top level" }));
    assert_eq!(config["description"], "outer");
}
