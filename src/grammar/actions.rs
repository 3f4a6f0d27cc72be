//! Action extraction: the union over every way an action can be written.
//!
//! Priority order is load-bearing:
//! 1. recognized named-helper calls (`assign`, `send`, `choose`, ...);
//! 2. inline function expressions (directly or through an identifier alias),
//!    with a purity flag for safe standalone re-execution;
//! 3. string literals naming an implementation;
//! 4. bare identifiers, captured but not chased;
//! 5. a catch-all for everything else.
//!
//! `choose` branches carry their own guard and a list of *basic* actions;
//! choose-inside-choose is deliberately not recognized.

use serde_json::{json, Value};
use tree_sitter::Node;

use crate::config::INLINE_IMPLEMENTATION_TYPE;
use crate::extract::combinators::maybe_array_of;
use crate::extract::purity::{purity_report, PurityReport};
use crate::extract::scalars::{any_node, string_literal};
use crate::extract::{is_function_expression, union, unwrap_wrappers, ExtractCtx, Extractor};

use super::guards::GuardNode;
use super::DeclarationKind;

/// One recovered action.
#[derive(Debug, Clone)]
pub struct ActionNode<'t> {
    pub node: Node<'t>,
    /// Empty for inline, helper-call, and unknown actions.
    pub name: String,
    pub kind: DeclarationKind,
    /// Normalized runtime-equivalent representation: a reconstructed object
    /// for the well-known helper forms, otherwise a name-only placeholder.
    pub action_value: Value,
    /// Guard-conditioned branches of a `choose(...)` helper.
    pub choose_branches: Option<Vec<ChooseBranch<'t>>>,
    /// Present for inline function actions.
    pub purity: Option<PurityReport<'t>>,
}

/// One branch of a `choose` helper; order is semantically significant
/// (first matching branch wins at evaluation time).
#[derive(Debug, Clone)]
pub struct ChooseBranch<'t> {
    pub node: Node<'t>,
    pub cond: Option<GuardNode<'t>>,
    pub actions: Vec<ActionNode<'t>>,
}

fn action_as_function<'t>() -> Extractor<'t, ActionNode<'t>> {
    Extractor::new(
        |node, _| is_function_expression(unwrap_wrappers(node)),
        |node, ctx| {
            let node = unwrap_wrappers(node);
            Some(inline_function_action(node, ctx))
        },
    )
}

fn inline_function_action<'t>(node: Node<'t>, ctx: &ExtractCtx<'t>) -> ActionNode<'t> {
    ActionNode {
        node,
        name: String::new(),
        kind: DeclarationKind::Inline,
        action_value: json!(INLINE_IMPLEMENTATION_TYPE),
        choose_branches: None,
        purity: purity_report(node, ctx),
    }
}

fn action_as_string<'t>() -> Extractor<'t, ActionNode<'t>> {
    string_literal().map(|text, _| ActionNode {
        node: text.node,
        action_value: json!(text.value),
        name: text.value,
        kind: DeclarationKind::Named,
        choose_branches: None,
        purity: None,
    })
}

/// Bare identifier: resolve one hop; an alias of a function or string takes
/// that form, otherwise the identifier is captured unresolved.
fn action_as_identifier<'t>() -> Extractor<'t, ActionNode<'t>> {
    Extractor::new(
        |node, _| {
            matches!(
                unwrap_wrappers(node).kind(),
                "identifier" | "shorthand_property_identifier"
            )
        },
        |node, ctx| {
            let node = unwrap_wrappers(node);
            let name = ctx.text(node).to_string();
            if let Some(resolved) = resolve_aliased(node, ctx) {
                return Some(resolved);
            }
            Some(ActionNode {
                node,
                action_value: json!(name),
                name,
                kind: DeclarationKind::Identifier,
                choose_branches: None,
                purity: None,
            })
        },
    )
}

fn resolve_aliased<'t>(identifier: Node<'t>, ctx: &ExtractCtx<'t>) -> Option<ActionNode<'t>> {
    let (value, value_ctx) =
        crate::extract::references::resolve_declarator(ctx.text(identifier), ctx)?;
    let value = unwrap_wrappers(value);
    if is_function_expression(value) {
        return Some(inline_function_action(value, &value_ctx));
    }
    string_literal().parse(value, &value_ctx).map(|text| ActionNode {
        node: text.node,
        action_value: json!(text.value),
        name: text.value,
        kind: DeclarationKind::Named,
        choose_branches: None,
        purity: None,
    })
}

fn action_as_node<'t>() -> Extractor<'t, ActionNode<'t>> {
    any_node().map(|node, _| ActionNode {
        node,
        name: String::new(),
        kind: DeclarationKind::Unknown,
        action_value: json!(INLINE_IMPLEMENTATION_TYPE),
        choose_branches: None,
        purity: None,
    })
}

/// Alternatives 2-5: everything except the named helper calls. This is the
/// action grammar inside `choose` branches.
pub fn basic_action<'t>() -> Extractor<'t, ActionNode<'t>> {
    union(vec![
        action_as_function(),
        action_as_string(),
        action_as_identifier(),
        action_as_node(),
    ])
}

/// The full action union.
pub fn action<'t>() -> Extractor<'t, ActionNode<'t>> {
    union(vec![super::named_actions::named_action(), basic_action()])
}

/// Single-or-array action slot (`entry`, `exit`, transition `actions`).
pub fn action_list<'t>() -> Extractor<'t, Vec<ActionNode<'t>>> {
    maybe_array_of(action())
}
