//! Invoked-service extraction (`invoke: { id?, src, onDone?, onError? }`).

use tree_sitter::Node;

use crate::extract::combinators::maybe_array_of;
use crate::extract::purity::{purity_report, PurityReport};
use crate::extract::references::resolvable;
use crate::extract::scalars::{any_node, boolean_literal, string_literal, BoolValue};
use crate::extract::{is_function_expression, union, unwrap_wrappers, ExtractCtx, Extractor};

use super::transitions::{transition_list, TransitionNode};
use super::DeclarationKind;

/// The service source of an invoke declaration.
#[derive(Debug, Clone)]
pub struct InvokeSrc<'t> {
    pub node: Node<'t>,
    pub kind: DeclarationKind,
    /// Service name for `Named`, identifier text for `Identifier`, the
    /// inline-implementation marker otherwise.
    pub value: String,
    /// Present for inline function sources.
    pub purity: Option<PurityReport<'t>>,
}

/// One recovered invoke declaration.
#[derive(Debug, Clone)]
pub struct InvokeNode<'t> {
    pub node: Node<'t>,
    pub id: Option<crate::extract::scalars::TextValue<'t>>,
    pub src: Option<InvokeSrc<'t>>,
    pub on_done: Option<Vec<TransitionNode<'t>>>,
    pub on_error: Option<Vec<TransitionNode<'t>>>,
    pub auto_forward: Option<BoolValue<'t>>,
    pub forward: Option<BoolValue<'t>>,
}

fn src_as_string<'t>() -> Extractor<'t, InvokeSrc<'t>> {
    string_literal().map(|text, _| InvokeSrc {
        node: text.node,
        kind: DeclarationKind::Named,
        value: text.value,
        purity: None,
    })
}

fn src_as_function<'t>() -> Extractor<'t, InvokeSrc<'t>> {
    Extractor::new(
        |node, _| is_function_expression(unwrap_wrappers(node)),
        |node, ctx| {
            let node = unwrap_wrappers(node);
            Some(InvokeSrc {
                node,
                kind: DeclarationKind::Inline,
                value: crate::config::INLINE_IMPLEMENTATION_TYPE.to_string(),
                purity: purity_report(node, ctx),
            })
        },
    )
}

/// Bare identifier: an alias of a function or string takes that form,
/// otherwise the identifier text is kept as the value.
fn src_as_identifier<'t>() -> Extractor<'t, InvokeSrc<'t>> {
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
            Some(InvokeSrc {
                node,
                kind: DeclarationKind::Identifier,
                value: name,
                purity: None,
            })
        },
    )
}

fn resolve_aliased<'t>(identifier: Node<'t>, ctx: &ExtractCtx<'t>) -> Option<InvokeSrc<'t>> {
    let (value, value_ctx) =
        crate::extract::references::resolve_declarator(ctx.text(identifier), ctx)?;
    let value = unwrap_wrappers(value);
    if is_function_expression(value) {
        return Some(InvokeSrc {
            node: value,
            kind: DeclarationKind::Inline,
            value: crate::config::INLINE_IMPLEMENTATION_TYPE.to_string(),
            purity: purity_report(value, &value_ctx),
        });
    }
    string_literal().parse(value, &value_ctx).map(|text| InvokeSrc {
        node: text.node,
        kind: DeclarationKind::Named,
        value: text.value,
        purity: None,
    })
}

fn src_as_node<'t>() -> Extractor<'t, InvokeSrc<'t>> {
    any_node().map(|node, _| InvokeSrc {
        node,
        kind: DeclarationKind::Unknown,
        value: crate::config::INLINE_IMPLEMENTATION_TYPE.to_string(),
        purity: None,
    })
}

fn invoke_src<'t>() -> Extractor<'t, InvokeSrc<'t>> {
    union(vec![
        src_as_string(),
        src_as_function(),
        src_as_identifier(),
        src_as_node(),
    ])
}

fn invoke_object<'t>() -> Extractor<'t, InvokeNode<'t>> {
    crate::extract::combinators::object_with_known_keys(
        |node| InvokeNode {
            node,
            id: None,
            src: None,
            on_done: None,
            on_error: None,
            auto_forward: None,
            forward: None,
        },
        |record: &mut InvokeNode<'t>, prop, ctx| match prop.key.as_str() {
            "id" => record.id = resolvable(string_literal()).parse(prop.value, ctx),
            "src" => record.src = invoke_src().parse(prop.value, ctx),
            "onDone" => record.on_done = transition_list().parse(prop.value, ctx),
            "onError" => record.on_error = transition_list().parse(prop.value, ctx),
            "autoForward" => {
                record.auto_forward = resolvable(boolean_literal()).parse(prop.value, ctx)
            }
            "forward" => record.forward = resolvable(boolean_literal()).parse(prop.value, ctx),
            _ => {}
        },
    )
}

/// The `invoke` slot: one config object or an array of them.
pub fn invoke_list<'t>() -> Extractor<'t, Vec<InvokeNode<'t>>> {
    maybe_array_of(invoke_object())
}
