//! Recognizers for the well-known action helper calls.
//!
//! Each helper (`assign`, `send`, `choose`, ...) is matched as a call by
//! callee name through a static keyword map and produces a normalized,
//! runtime-equivalent `action_value`, the same shape the state-machine
//! runtime would build for that helper. All helper actions are declaration
//! kind `Inline` with an empty name.

use phf::phf_map;
use serde_json::{json, Map, Value};
use tree_sitter::Node;

use crate::config::INLINE_IMPLEMENTATION_TYPE;
use crate::extract::combinators::{
    call_arguments, callee_name, maybe_array_of, object_with_known_keys,
};
use crate::extract::references::resolvable;
use crate::extract::scalars::{number_literal, string_literal, TextValue};
use crate::extract::{union, unwrap_wrappers, ExtractCtx, Extractor};

use super::actions::{basic_action, ActionNode, ChooseBranch};
use super::guards::guard;
use super::DeclarationKind;

/// The recognized helper forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Helper {
    Choose,
    Assign,
    Send,
    ForwardTo,
    After,
    Cancel,
    Done,
    Escalate,
    Log,
    Pure,
    Raise,
    Respond,
    SendParent,
    SendUpdate,
    Start,
    Stop,
}

/// Callee name → helper dispatch, O(1) at match time.
static HELPERS: phf::Map<&'static str, Helper> = phf_map! {
    "choose" => Helper::Choose,
    "assign" => Helper::Assign,
    "send" => Helper::Send,
    "forwardTo" => Helper::ForwardTo,
    "after" => Helper::After,
    "cancel" => Helper::Cancel,
    "done" => Helper::Done,
    "escalate" => Helper::Escalate,
    "log" => Helper::Log,
    "pure" => Helper::Pure,
    "raise" => Helper::Raise,
    "respond" => Helper::Respond,
    "sendParent" => Helper::SendParent,
    "sendUpdate" => Helper::SendUpdate,
    "start" => Helper::Start,
    "stop" => Helper::Stop,
};

/// The named-helper alternative of the action union.
pub fn named_action<'t>() -> Extractor<'t, ActionNode<'t>> {
    Extractor::new(
        |node, ctx| {
            let node = unwrap_wrappers(node);
            node.kind() == "call_expression"
                && callee_name(node, ctx).is_some_and(|name| HELPERS.contains_key(name))
        },
        |node, ctx| {
            let node = unwrap_wrappers(node);
            let helper = *HELPERS.get(callee_name(node, ctx)?)?;
            Some(parse_helper(helper, node, ctx))
        },
    )
}

fn parse_helper<'t>(helper: Helper, call: Node<'t>, ctx: &ExtractCtx<'t>) -> ActionNode<'t> {
    let mut choose_branches = None;
    let action_value = match helper {
        Helper::Choose => {
            let branches = parse_choose_branches(call, ctx);
            let value = choose_value(&branches);
            choose_branches = Some(branches);
            value
        }
        Helper::Assign => json!({ "type": "xstate.assign" }),
        Helper::Send => send_value(call, ctx),
        Helper::ForwardTo => {
            let mut value = Map::new();
            value.insert("type".to_string(), json!("xstate.send"));
            if let Some(target) = first_string_argument(call, ctx) {
                value.insert("to".to_string(), json!(target.value));
            }
            Value::Object(value)
        }
        Helper::After => {
            let delay = first_delay_argument(call, ctx).unwrap_or_default();
            json!(format!("xstate.after({delay})"))
        }
        Helper::Cancel => {
            let mut value = Map::new();
            value.insert("type".to_string(), json!("xstate.cancel"));
            if let Some(send_id) = first_string_argument(call, ctx) {
                value.insert("sendId".to_string(), json!(send_id.value));
            }
            Value::Object(value)
        }
        Helper::Done => {
            let id = first_string_argument(call, ctx)
                .map(|text| text.value)
                .unwrap_or_default();
            json!(format!("done.state.{id}"))
        }
        Helper::Escalate | Helper::SendParent => {
            json!({ "type": "xstate.send", "to": "#_parent" })
        }
        Helper::Log => json!({ "type": "xstate.log" }),
        Helper::Pure => json!({ "type": "xstate.pure" }),
        Helper::Raise => json!({ "type": "xstate.raise" }),
        Helper::Respond => json!({ "type": "xstate.send" }),
        Helper::SendUpdate => {
            json!({ "type": "xstate.send", "to": "#_parent", "event": "xstate.update" })
        }
        Helper::Start => json!({ "type": "xstate.start" }),
        Helper::Stop => json!({ "type": "xstate.stop" }),
    };

    ActionNode {
        node: call,
        name: String::new(),
        kind: DeclarationKind::Inline,
        action_value,
        choose_branches,
        purity: None,
    }
}

/// `choose([{ cond?, actions? }, ...])`. Branch order is preserved; the
/// runtime evaluates branches first-match-wins.
fn parse_choose_branches<'t>(call: Node<'t>, ctx: &ExtractCtx<'t>) -> Vec<ChooseBranch<'t>> {
    let branch = object_with_known_keys(
        |node| ChooseBranch {
            node,
            cond: None,
            actions: Vec::new(),
        },
        |record: &mut ChooseBranch<'t>, prop, ctx| match prop.key.as_str() {
            "cond" => record.cond = guard().parse(prop.value, ctx),
            "actions" => {
                if let Some(actions) = maybe_array_of(basic_action()).parse(prop.value, ctx) {
                    record.actions = actions;
                }
            }
            _ => {}
        },
    );

    call_arguments(call)
        .first()
        .and_then(|&arg| maybe_array_of(branch).parse(arg, ctx))
        .unwrap_or_default()
}

fn choose_value(branches: &[ChooseBranch]) -> Value {
    let conds: Vec<Value> = branches
        .iter()
        .map(|branch| {
            let mut entry = Map::new();
            if let Some(cond) = &branch.cond {
                entry.insert("cond".to_string(), json!(descriptor_name(&cond.name)));
            }
            let names: Vec<Value> = branch
                .actions
                .iter()
                .map(|action| json!(descriptor_name(&action.name)))
                .collect();
            // A single action stays scalar, matching the runtime's accepted
            // single-or-array shape.
            let actions = match names.len() {
                1 => names.into_iter().next().unwrap_or_default(),
                _ => Value::Array(names),
            };
            entry.insert("actions".to_string(), actions);
            Value::Object(entry)
        })
        .collect();
    json!({ "type": "xstate.choose", "conds": conds })
}

fn descriptor_name(name: &str) -> &str {
    if name.is_empty() {
        INLINE_IMPLEMENTATION_TYPE
    } else {
        name
    }
}

/// `send(event, { to?, delay?, id? })`. Only statically-known options are
/// carried into the normalized value.
fn send_value<'t>(call: Node<'t>, ctx: &ExtractCtx<'t>) -> Value {
    #[derive(Default)]
    struct SendOptions {
        to: Option<Value>,
        delay: Option<Value>,
        id: Option<Value>,
    }

    let options_extractor = object_with_known_keys(
        |_| SendOptions::default(),
        |record: &mut SendOptions, prop, ctx| match prop.key.as_str() {
            "to" => {
                record.to = resolvable(string_literal())
                    .parse(prop.value, ctx)
                    .map(|text| json!(text.value));
            }
            "delay" => record.delay = delay_literal().parse(prop.value, ctx),
            "id" => {
                record.id = resolvable(string_literal())
                    .parse(prop.value, ctx)
                    .map(|text| json!(text.value));
            }
            _ => {}
        },
    );

    let options = call_arguments(call)
        .get(1)
        .and_then(|&arg| options_extractor.parse(arg, ctx))
        .unwrap_or_default();

    let mut value = Map::new();
    value.insert("type".to_string(), json!("xstate.send"));
    if let Some(to) = options.to {
        value.insert("to".to_string(), to);
    }
    if let Some(delay) = options.delay {
        value.insert("delay".to_string(), delay);
    }
    if let Some(id) = options.id {
        value.insert("id".to_string(), id);
    }
    Value::Object(value)
}

/// Delay values may be named (string) or literal milliseconds (number).
fn delay_literal<'t>() -> Extractor<'t, Value> {
    union(vec![
        resolvable(string_literal()).map(|text, _| json!(text.value)),
        resolvable(number_literal()).map(|number, _| number_to_json(number.value)),
    ])
}

fn first_string_argument<'t>(call: Node<'t>, ctx: &ExtractCtx<'t>) -> Option<TextValue<'t>> {
    call_arguments(call)
        .first()
        .and_then(|&arg| resolvable(string_literal()).parse(arg, ctx))
}

/// First argument rendered as delay text: string value verbatim, numbers
/// without a trailing `.0`.
fn first_delay_argument<'t>(call: Node<'t>, ctx: &ExtractCtx<'t>) -> Option<String> {
    let arg = *call_arguments(call).first()?;
    if let Some(text) = resolvable(string_literal()).parse(arg, ctx) {
        return Some(text.value);
    }
    resolvable(number_literal())
        .parse(arg, ctx)
        .map(|number| format_number(number.value))
}

fn number_to_json(value: f64) -> Value {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
