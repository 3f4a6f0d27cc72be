//! Atomic extractors for literal values and generic node capture.

use tree_sitter::Node;

use super::{unwrap_wrappers, ExtractCtx, Extractor};

/// A string-valued literal with its originating node.
#[derive(Debug, Clone)]
pub struct TextValue<'t> {
    pub value: String,
    pub node: Node<'t>,
}

/// A numeric literal with its originating node.
#[derive(Debug, Clone)]
pub struct NumberValue<'t> {
    pub value: f64,
    pub node: Node<'t>,
}

/// A boolean literal with its originating node.
#[derive(Debug, Clone)]
pub struct BoolValue<'t> {
    pub value: bool,
    pub node: Node<'t>,
}

/// String literal → [`TextValue`].
pub fn string_literal<'t>() -> Extractor<'t, TextValue<'t>> {
    Extractor::new(
        |node, _| unwrap_wrappers(node).kind() == "string",
        |node, ctx| {
            let node = unwrap_wrappers(node);
            ctx.file.string_value(node).map(|value| TextValue { value, node })
        },
    )
}

/// Template literal → [`TextValue`] of the static fragments only.
/// Interpolated expressions are skipped, never evaluated.
pub fn template_literal<'t>() -> Extractor<'t, TextValue<'t>> {
    Extractor::new(
        |node, _| unwrap_wrappers(node).kind() == "template_string",
        |node, ctx| {
            let node = unwrap_wrappers(node);
            ctx.file.template_value(node).map(|value| TextValue { value, node })
        },
    )
}

/// String or template literal.
pub fn string_or_template<'t>() -> Extractor<'t, TextValue<'t>> {
    super::union(vec![string_literal(), template_literal()])
}

/// Number literal → [`NumberValue`].
pub fn number_literal<'t>() -> Extractor<'t, NumberValue<'t>> {
    Extractor::new(
        |node, _| unwrap_wrappers(node).kind() == "number",
        |node, ctx| {
            let node = unwrap_wrappers(node);
            ctx.file.number_value(node).map(|value| NumberValue { value, node })
        },
    )
}

/// Boolean literal → [`BoolValue`].
pub fn boolean_literal<'t>() -> Extractor<'t, BoolValue<'t>> {
    Extractor::new(
        |node, _| matches!(unwrap_wrappers(node).kind(), "true" | "false"),
        |node, ctx| {
            let node = unwrap_wrappers(node);
            ctx.file.bool_value(node).map(|value| BoolValue { value, node })
        },
    )
}

/// Matches anything and yields the node itself (catch-all capture).
pub fn any_node<'t>() -> Extractor<'t, Node<'t>> {
    Extractor::new(|_, _| true, |node, _| Some(node))
}

/// Matches anything, reports the node to the diagnostics sink, and parses
/// to nothing. Installed as the last alternative of structural slots so a
/// function call where an object was expected becomes a diagnostic instead
/// of a silent hole.
pub fn unparseable<'t, T: 't>() -> Extractor<'t, T> {
    Extractor::new(
        |_, _| true,
        |node, ctx| {
            ctx.report_unparseable(node);
            None
        },
    )
}
