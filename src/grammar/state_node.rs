//! The recursive state-node schema.
//!
//! One extractor describes one state-configuration object literal; the
//! `states` slot maps each key back through the same extractor. The value
//! extractors are built inside the assignment closure at parse time, which
//! keeps the self-reference well-founded without an eager infinite grammar.
//!
//! Structural slots (`states`, `on`, `after`, `invoke`) carry the
//! unparseable fallback: a value the grammar cannot match at all (say, a
//! function call where an object was expected) is reported as a diagnostic
//! while the surrounding machine parse continues with that key absent.

use tree_sitter::Node;

use crate::extract::combinators::{maybe_array_of, object_of, object_with_known_keys, ObjectOf};
use crate::extract::references::resolvable;
use crate::extract::scalars::{
    any_node, boolean_literal, string_literal, string_or_template, unparseable, BoolValue,
    TextValue,
};
use crate::extract::{union, Extractor};

use super::actions::{action_list, ActionNode};
use super::invoke::{invoke_list, InvokeNode};
use super::transitions::{transition_list, TransitionNode};

/// `meta: { description }`; only the description is interpreted.
#[derive(Debug, Clone)]
pub struct StateMeta<'t> {
    pub node: Node<'t>,
    pub description: Option<TextValue<'t>>,
}

/// One recovered state node. Every slot is absence-tolerant; a node with no
/// `states` key has no children.
#[derive(Debug, Clone)]
pub struct StateNode<'t> {
    pub node: Node<'t>,
    pub id: Option<TextValue<'t>>,
    pub initial: Option<TextValue<'t>>,
    pub state_type: Option<TextValue<'t>>,
    pub delimiter: Option<TextValue<'t>>,
    pub history: Option<TextValue<'t>>,
    pub description: Option<TextValue<'t>>,
    pub tags: Option<Vec<TextValue<'t>>>,
    pub entry: Option<Vec<ActionNode<'t>>>,
    pub exit: Option<Vec<ActionNode<'t>>>,
    pub on_entry: Option<Vec<ActionNode<'t>>>,
    pub on_exit: Option<Vec<ActionNode<'t>>>,
    pub invoke: Option<Vec<InvokeNode<'t>>>,
    pub always: Option<Vec<TransitionNode<'t>>>,
    pub on_done: Option<Vec<TransitionNode<'t>>>,
    /// Event name → transitions, in declaration order.
    pub on: Option<ObjectOf<'t, Vec<TransitionNode<'t>>>>,
    /// Delay key (named delay or literal milliseconds) → transitions.
    pub after: Option<ObjectOf<'t, Vec<TransitionNode<'t>>>>,
    /// Child state name → state node, in declaration order.
    pub states: Option<ObjectOf<'t, StateNode<'t>>>,
    pub meta: Option<StateMeta<'t>>,
    /// Captured without deep interpretation.
    pub ts_types: Option<Node<'t>>,
    pub schema: Option<Node<'t>>,
    pub context: Option<Node<'t>>,
    pub data: Option<Node<'t>>,
    pub preserve_action_order: Option<BoolValue<'t>>,
}

impl<'t> StateNode<'t> {
    fn empty(node: Node<'t>) -> Self {
        StateNode {
            node,
            id: None,
            initial: None,
            state_type: None,
            delimiter: None,
            history: None,
            description: None,
            tags: None,
            entry: None,
            exit: None,
            on_entry: None,
            on_exit: None,
            invoke: None,
            always: None,
            on_done: None,
            on: None,
            after: None,
            states: None,
            meta: None,
            ts_types: None,
            schema: None,
            context: None,
            data: None,
            preserve_action_order: None,
        }
    }
}

fn state_meta<'t>() -> Extractor<'t, StateMeta<'t>> {
    object_with_known_keys(
        |node| StateMeta {
            node,
            description: None,
        },
        |record: &mut StateMeta<'t>, prop, ctx| {
            if prop.key == "description" {
                record.description = resolvable(string_or_template()).parse(prop.value, ctx);
            }
        },
    )
}

/// The state-node extractor. Unknown keys are skipped without error
/// (forward compatibility with configuration keys this grammar predates).
pub fn state_node<'t>() -> Extractor<'t, StateNode<'t>> {
    object_with_known_keys(StateNode::empty, assign_slot)
}

fn assign_slot<'t>(
    record: &mut StateNode<'t>,
    prop: &crate::extract::combinators::ObjectProp<'t>,
    ctx: &crate::extract::ExtractCtx<'t>,
) {
    let value = prop.value;
    match prop.key.as_str() {
        "id" => record.id = resolvable(string_literal()).parse(value, ctx),
        "initial" => record.initial = resolvable(string_literal()).parse(value, ctx),
        "type" => record.state_type = resolvable(string_literal()).parse(value, ctx),
        "delimiter" => record.delimiter = resolvable(string_literal()).parse(value, ctx),
        // String-valued history only; `history: true` degrades to absence.
        "history" => record.history = resolvable(string_literal()).parse(value, ctx),
        "description" => record.description = resolvable(string_or_template()).parse(value, ctx),
        "tags" => record.tags = maybe_array_of(resolvable(string_literal())).parse(value, ctx),
        "entry" => record.entry = action_list().parse(value, ctx),
        "exit" => record.exit = action_list().parse(value, ctx),
        "onEntry" => record.on_entry = action_list().parse(value, ctx),
        "onExit" => record.on_exit = action_list().parse(value, ctx),
        "invoke" => record.invoke = union(vec![invoke_list(), unparseable()]).parse(value, ctx),
        "always" => record.always = transition_list().parse(value, ctx),
        "onDone" => record.on_done = transition_list().parse(value, ctx),
        "on" => {
            record.on = union(vec![object_of(transition_list()), unparseable()]).parse(value, ctx)
        }
        "after" => {
            record.after =
                union(vec![object_of(transition_list()), unparseable()]).parse(value, ctx)
        }
        "states" => {
            record.states = union(vec![object_of(state_node()), unparseable()]).parse(value, ctx)
        }
        "meta" => record.meta = state_meta().parse(value, ctx),
        "tsTypes" => record.ts_types = any_node().parse(value, ctx),
        "schema" => record.schema = any_node().parse(value, ctx),
        "context" => record.context = any_node().parse(value, ctx),
        "data" => record.data = any_node().parse(value, ctx),
        "preserveActionOrder" => {
            record.preserve_action_order = resolvable(boolean_literal()).parse(value, ctx)
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::*;
    use crate::extract::ExtractCtx;

    fn parse_state<'t>(session: &'t crate::session::ParseSession) -> StateNode<'t> {
        let ctx = ExtractCtx::new(session.main_file().unwrap(), session);
        let node = first_of_kind(session, "object");
        state_node().parse(node, &ctx).unwrap()
    }

    #[test]
    fn test_minimal_state_node() {
        let session = session(r#"const s = { initial: "idle", states: { idle: {} } };"#);
        let state = parse_state(&session);
        assert_eq!(state.initial.unwrap().value, "idle");
        let states = state.states.unwrap();
        assert_eq!(states.entries.len(), 1);
        assert_eq!(states.entries[0].key, "idle");
    }

    #[test]
    fn test_nested_states_recurse() {
        let session = session(
            r#"
            const s = {
              states: {
                a: { states: { deep: { entry: "arrived" } } },
              },
            };
            "#,
        );
        let state = parse_state(&session);
        let a = &state.states.unwrap().entries[0].value;
        let deep = &a.states.as_ref().unwrap().entries[0].value;
        assert_eq!(deep.entry.as_ref().unwrap()[0].name, "arrived");
    }

    #[test]
    fn test_unknown_keys_are_skipped() {
        let session = session(r#"const s = { initial: "a", someFutureKey: 12, states: {} };"#);
        let state = parse_state(&session);
        assert_eq!(state.initial.unwrap().value, "a");
    }

    #[test]
    fn test_unresolvable_slot_is_absent() {
        let session = session(r#"const s = { initial: computeInitial() };"#);
        let state = parse_state(&session);
        assert!(state.initial.is_none());
    }

    #[test]
    fn test_states_as_call_reports_unparseable() {
        let session = session(r#"const s = { states: buildStates() };"#);
        let ctx = ExtractCtx::new(session.main_file().unwrap(), &session);
        let node = first_of_kind(&session, "object");
        let state = state_node().parse(node, &ctx).unwrap();
        assert!(state.states.is_none());
        assert_eq!(ctx.take_unparseable().len(), 1);
    }

    #[test]
    fn test_history_boolean_degrades_to_absence() {
        let session = session("const s = { history: true };");
        let state = parse_state(&session);
        assert!(state.history.is_none());
    }

    #[test]
    fn test_after_map_keys() {
        let session = session(
            r#"
            const s = {
              after: {
                500: { target: "timedOut" },
                DELAY_NAME: "waiting",
              },
            };
            "#,
        );
        let state = parse_state(&session);
        let after = state.after.unwrap();
        assert_eq!(after.entries.len(), 2);
        assert_eq!(after.entries[0].key, "500");
        assert_eq!(after.entries[1].key, "DELAY_NAME");
    }

    #[test]
    fn test_schema_and_context_captured_opaquely() {
        let session = session(
            r#"const s = { schema: {} as Schema, context: { count: 0 }, initial: "a" };"#,
        );
        let state = parse_state(&session);
        assert!(state.schema.is_some());
        assert!(state.context.is_some());
    }
}
