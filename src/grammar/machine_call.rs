//! The machine-constructor call recognizer.
//!
//! Matches `createMachine(...)` / `Machine(...)` with a bare-identifier or
//! member-access callee, parses argument 0 through the state-node grammar
//! and argument 1 through the options grammar, and records the enclosing
//! variable declarator's binding name when the call initializes one; the
//! spawn-linking pass cross-references machines by that name.

use tree_sitter::Node;

use crate::extract::combinators::{call_arguments, callee_name};
use crate::extract::{unwrap_wrappers, ExtractCtx};
use crate::session::MACHINE_CONSTRUCTORS;

use super::options::{machine_options, MachineOptions};
use super::state_node::{state_node, StateNode};

/// One matched constructor call with its parsed arguments.
#[derive(Debug, Clone)]
pub struct MachineCall<'t> {
    pub node: Node<'t>,
    pub callee: Node<'t>,
    pub callee_name: String,
    pub definition: Option<StateNode<'t>>,
    pub options: Option<MachineOptions<'t>>,
    /// `const name = createMachine(...)` binding, when present.
    pub machine_variable_name: Option<String>,
}

/// Try to match a call expression as a machine constructor.
pub fn parse_machine_call<'t>(node: Node<'t>, ctx: &ExtractCtx<'t>) -> Option<MachineCall<'t>> {
    let node = unwrap_wrappers(node);
    if node.kind() != "call_expression" {
        return None;
    }
    let name = callee_name(node, ctx)?;
    if !MACHINE_CONSTRUCTORS.contains(&name) {
        return None;
    }
    let callee = unwrap_wrappers(node.child_by_field_name("function")?);

    let args = call_arguments(node);
    let definition = args.first().and_then(|&arg| state_node().parse(arg, ctx));
    let options = args.get(1).and_then(|&arg| machine_options().parse(arg, ctx));

    Some(MachineCall {
        node,
        callee,
        callee_name: name.to_string(),
        definition,
        options,
        machine_variable_name: binding_name(node, ctx),
    })
}

/// Name of the variable declarator this call initializes, looking through
/// the transparent expression wrappers.
fn binding_name<'t>(call: Node<'t>, ctx: &ExtractCtx<'t>) -> Option<String> {
    let mut current = call;
    loop {
        let parent = current.parent()?;
        match parent.kind() {
            "as_expression" | "satisfies_expression" | "parenthesized_expression"
            | "non_null_expression" => current = parent,
            "variable_declarator" => {
                let name = parent.child_by_field_name("name")?;
                return (name.kind() == "identifier").then(|| ctx.text(name).to_string());
            }
            _ => return None,
        }
    }
}
