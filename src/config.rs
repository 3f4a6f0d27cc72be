//! Declarative projection of a recovered state tree.
//!
//! `to_config` flattens the recovered tree back into a plain nested config
//! object (state names, transition targets, guard and action *names*)
//! suitable for structural comparison against a reference configuration and
//! for re-serialization. Implementations that exist only as inline code
//! render as the [`INLINE_IMPLEMENTATION_TYPE`] marker.
//!
//! `tsTypes`/`schema`/`context`/`data` are never projected; they carry
//! type-level or runtime-value information with no declarative shape.

use serde_json::{json, Map, Value};

use crate::grammar::actions::ActionNode;
use crate::grammar::guards::GuardNode;
use crate::grammar::invoke::InvokeNode;
use crate::grammar::state_node::StateNode;
use crate::grammar::transitions::TransitionNode;
use crate::grammar::DeclarationKind;

/// Marker standing in for implementations that exist only as inline code.
pub const INLINE_IMPLEMENTATION_TYPE: &str = "anonymous";

/// Project a recovered state node (and its children) into a plain config
/// object. Key and state order follow declaration order.
pub fn to_config(state: &StateNode) -> Value {
    let mut config = Map::new();

    if let Some(id) = &state.id {
        config.insert("id".to_string(), json!(id.value));
    }
    if let Some(initial) = &state.initial {
        config.insert("initial".to_string(), json!(initial.value));
    }
    if let Some(state_type) = &state.state_type {
        config.insert("type".to_string(), json!(state_type.value));
    }
    if let Some(delimiter) = &state.delimiter {
        config.insert("delimiter".to_string(), json!(delimiter.value));
    }
    if let Some(history) = &state.history {
        config.insert("history".to_string(), json!(history.value));
    }
    if let Some(description) = &state.description {
        config.insert("description".to_string(), json!(description.value));
    }
    if let Some(tags) = &state.tags {
        let values: Vec<Value> = tags.iter().map(|tag| json!(tag.value)).collect();
        config.insert("tags".to_string(), Value::Array(values));
    }
    if let Some(meta) = &state.meta {
        if let Some(description) = &meta.description {
            config.insert("meta".to_string(), json!({ "description": description.value }));
        }
    }

    for (key, actions) in [
        ("entry", &state.entry),
        ("exit", &state.exit),
        ("onEntry", &state.on_entry),
        ("onExit", &state.on_exit),
    ] {
        if let Some(actions) = actions {
            config.insert(key.to_string(), action_names(actions));
        }
    }

    if let Some(on) = &state.on {
        let mut map = Map::new();
        for entry in &on.entries {
            map.insert(entry.key.clone(), transitions_value(&entry.value));
        }
        config.insert("on".to_string(), Value::Object(map));
    }
    if let Some(after) = &state.after {
        let mut map = Map::new();
        for entry in &after.entries {
            map.insert(entry.key.clone(), transitions_value(&entry.value));
        }
        config.insert("after".to_string(), Value::Object(map));
    }
    if let Some(always) = &state.always {
        config.insert("always".to_string(), transitions_value(always));
    }
    if let Some(on_done) = &state.on_done {
        config.insert("onDone".to_string(), transitions_value(on_done));
    }

    if let Some(invoke) = &state.invoke {
        let entries: Vec<Value> = invoke.iter().map(invoke_value).collect();
        config.insert("invoke".to_string(), Value::Array(entries));
    }

    if let Some(states) = &state.states {
        let mut map = Map::new();
        for entry in &states.entries {
            map.insert(entry.key.clone(), to_config(&entry.value));
        }
        config.insert("states".to_string(), Value::Object(map));
    }

    Value::Object(config)
}

fn action_names(actions: &[ActionNode]) -> Value {
    Value::Array(actions.iter().map(action_name).collect())
}

fn action_name(action: &ActionNode) -> Value {
    if action.name.is_empty() {
        json!(INLINE_IMPLEMENTATION_TYPE)
    } else {
        json!(action.name)
    }
}

fn guard_name(guard: &GuardNode) -> Value {
    if guard.name.is_empty() {
        json!(INLINE_IMPLEMENTATION_TYPE)
    } else {
        json!(guard.name)
    }
}

/// Transition lists always serialize as arrays, even for a single
/// transition, so consumers never branch on single-or-array.
fn transitions_value(transitions: &[TransitionNode]) -> Value {
    Value::Array(transitions.iter().map(transition_value).collect())
}

fn transition_value(transition: &TransitionNode) -> Value {
    let mut value = Map::new();
    if let Some(target) = &transition.target {
        match target.as_slice() {
            [single] => {
                value.insert("target".to_string(), json!(single.value));
            }
            many => {
                let targets: Vec<Value> = many.iter().map(|t| json!(t.value)).collect();
                value.insert("target".to_string(), Value::Array(targets));
            }
        }
    }
    if let Some(cond) = &transition.cond {
        value.insert("cond".to_string(), guard_name(cond));
    }
    if let Some(actions) = &transition.actions {
        value.insert("actions".to_string(), action_names(actions));
    }
    Value::Object(value)
}

fn invoke_value(invoke: &InvokeNode) -> Value {
    let mut value = Map::new();
    if let Some(id) = &invoke.id {
        value.insert("id".to_string(), json!(id.value));
    }
    let src = match &invoke.src {
        Some(src) if src.kind == DeclarationKind::Named => json!(src.value),
        Some(src) if src.kind == DeclarationKind::Identifier => json!(src.value),
        _ => json!(INLINE_IMPLEMENTATION_TYPE),
    };
    value.insert("src".to_string(), src);
    if let Some(on_done) = &invoke.on_done {
        value.insert("onDone".to_string(), transitions_value(on_done));
    }
    if let Some(on_error) = &invoke.on_error {
        value.insert("onError".to_string(), transitions_value(on_error));
    }
    if let Some(auto_forward) = &invoke.auto_forward {
        value.insert("autoForward".to_string(), json!(auto_forward.value));
    }
    Value::Object(value)
}
