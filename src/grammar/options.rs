//! The machine options literal (second constructor argument).
//!
//! Implementation maps are captured verbatim as nodes: a named action's
//! implementation may be a function, a helper call, or anything else, and
//! interpreting it is the caller's business. Method shorthand
//! (`guards: { isReady() {...} }`) is captured like any other entry.

use tree_sitter::Node;

use crate::extract::combinators::{object_of, object_with_known_keys, ObjectOf};
use crate::extract::references::resolvable;
use crate::extract::scalars::{any_node, boolean_literal, BoolValue};
use crate::extract::Extractor;

/// The recovered options literal.
#[derive(Debug, Clone)]
pub struct MachineOptions<'t> {
    pub node: Node<'t>,
    pub actions: Option<ObjectOf<'t, Node<'t>>>,
    pub services: Option<ObjectOf<'t, Node<'t>>>,
    pub guards: Option<ObjectOf<'t, Node<'t>>>,
    pub dev_tools: Option<BoolValue<'t>>,
}

/// Options extractor: known keys `actions`/`services`/`guards`/`devTools`.
pub fn machine_options<'t>() -> Extractor<'t, MachineOptions<'t>> {
    object_with_known_keys(
        |node| MachineOptions {
            node,
            actions: None,
            services: None,
            guards: None,
            dev_tools: None,
        },
        |record: &mut MachineOptions<'t>, prop, ctx| match prop.key.as_str() {
            "actions" => record.actions = object_of(any_node()).parse(prop.value, ctx),
            "services" => record.services = object_of(any_node()).parse(prop.value, ctx),
            "guards" => record.guards = object_of(any_node()).parse(prop.value, ctx),
            "devTools" => record.dev_tools = resolvable(boolean_literal()).parse(prop.value, ctx),
            _ => {}
        },
    )
}
