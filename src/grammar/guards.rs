//! Guard (`cond`) extraction.
//!
//! Guards use the same four-way declaration-kind scheme as actions: a string
//! literal names an implementation, a function expression is inline (with
//! its purity recorded), a bare identifier is captured unresolved, and
//! anything else is unknown.

use tree_sitter::Node;

use crate::extract::purity::{purity_report, PurityReport};
use crate::extract::scalars::string_literal;
use crate::extract::{is_function_expression, union, unwrap_wrappers, ExtractCtx, Extractor};

use super::DeclarationKind;

/// One recovered guard.
#[derive(Debug, Clone)]
pub struct GuardNode<'t> {
    pub node: Node<'t>,
    /// Empty for inline and unknown guards.
    pub name: String,
    pub kind: DeclarationKind,
    /// Present for inline function guards.
    pub purity: Option<PurityReport<'t>>,
}

fn guard_as_function<'t>() -> Extractor<'t, GuardNode<'t>> {
    Extractor::new(
        |node, _| is_function_expression(unwrap_wrappers(node)),
        |node, ctx| {
            let node = unwrap_wrappers(node);
            Some(GuardNode {
                node,
                name: String::new(),
                kind: DeclarationKind::Inline,
                purity: purity_report(node, ctx),
            })
        },
    )
}

fn guard_as_string<'t>() -> Extractor<'t, GuardNode<'t>> {
    string_literal().map(|text, _| GuardNode {
        node: text.node,
        name: text.value,
        kind: DeclarationKind::Named,
        purity: None,
    })
}

/// Bare identifier: resolve one hop through the file's declarators. An
/// alias of a function or string takes that form's kind; anything else is
/// captured as an unresolved identifier, name kept, not chased further.
fn guard_as_identifier<'t>() -> Extractor<'t, GuardNode<'t>> {
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
            Some(GuardNode {
                node,
                name,
                kind: DeclarationKind::Identifier,
                purity: None,
            })
        },
    )
}

fn resolve_aliased<'t>(identifier: Node<'t>, ctx: &ExtractCtx<'t>) -> Option<GuardNode<'t>> {
    let (value, value_ctx) =
        crate::extract::references::resolve_declarator(ctx.text(identifier), ctx)?;
    let value = unwrap_wrappers(value);
    if is_function_expression(value) {
        return Some(GuardNode {
            node: value,
            name: String::new(),
            kind: DeclarationKind::Inline,
            purity: purity_report(value, &value_ctx),
        });
    }
    string_literal().parse(value, &value_ctx).map(|text| GuardNode {
        node: text.node,
        name: text.value,
        kind: DeclarationKind::Named,
        purity: None,
    })
}

fn guard_as_node<'t>() -> Extractor<'t, GuardNode<'t>> {
    crate::extract::scalars::any_node().map(|node, _| GuardNode {
        node,
        name: String::new(),
        kind: DeclarationKind::Unknown,
        purity: None,
    })
}

/// The full guard union, in priority order.
pub fn guard<'t>() -> Extractor<'t, GuardNode<'t>> {
    union(vec![
        guard_as_function(),
        guard_as_string(),
        guard_as_identifier(),
        guard_as_node(),
    ])
}
