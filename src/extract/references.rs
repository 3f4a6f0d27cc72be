//! Identifier and member-path resolution.
//!
//! Any value slot can be written as a reference to a declaration elsewhere
//! in the file: a bare identifier naming a variable declarator, or a dotted
//! path descending into a declared object literal. [`resolvable`] layers
//! both alternatives on top of a base extractor.
//!
//! Resolution is exactly one hop: the target extractor runs on the resolved
//! initializer directly, so aliases of aliases are never chased and cycles
//! are structurally impossible. When no local declarator exists, a named
//! import is followed one hop into the resolver-provided module instead.
//!
//! Lookups are a fresh whole-tree search each time (last declarator wins,
//! matching how later bindings shadow earlier ones at the top level). No
//! caching; file sizes keep this cheap.

use tree_sitter::Node;

use crate::source::SourceFile;

use super::combinators::object_properties;
use super::{union, unwrap_wrappers, ExtractCtx, Extractor};

/// Find the initializer of the last variable declarator named `name`
/// anywhere in `file`.
pub fn find_declarator<'t>(file: &'t SourceFile, name: &str) -> Option<Node<'t>> {
    let mut found = None;
    crate::source::walk_tree(file.root(), &mut |node| {
        if node.kind() != "variable_declarator" {
            return;
        }
        let Some(id) = node.child_by_field_name("name") else {
            return;
        };
        if id.kind() == "identifier" && file.text_of(id) == name {
            if let Some(value) = node.child_by_field_name("value") {
                found = Some(value);
            }
        }
    });
    found
}

/// Resolve an identifier to its declared value: local declarators first,
/// then the session's import bindings. The returned context reads from the
/// file the value actually lives in.
pub fn resolve_declarator<'t>(
    name: &str,
    ctx: &ExtractCtx<'t>,
) -> Option<(Node<'t>, ExtractCtx<'t>)> {
    if let Some(value) = find_declarator(ctx.file, name) {
        return Some((value, ctx.clone()));
    }
    let (value, file) = ctx.session.imported_declaration(name)?;
    Some((value, ctx.with_file(file)))
}

/// Whether a node reads as an identifier reference. Shorthand property
/// values (`{ foo }`) count: the identifier is the value.
fn is_identifier_like(node: Node) -> bool {
    matches!(
        unwrap_wrappers(node).kind(),
        "identifier" | "shorthand_property_identifier"
    )
}

/// Adds a "this identifier references a declaration elsewhere" alternative
/// to `target`. One hop: `target` runs on the initializer as-is.
pub fn identifier_reference<'t, T: 't>(target: Extractor<'t, T>) -> Extractor<'t, T> {
    Extractor::new(
        |node, _| is_identifier_like(node),
        move |node, ctx| {
            let node = unwrap_wrappers(node);
            let (value, target_ctx) = resolve_declarator(ctx.text(node), ctx)?;
            target.parse(unwrap_wrappers(value), &target_ctx)
        },
    )
}

/// Walk a dotted member expression down to the value it names inside a
/// declared object literal: resolve the root identifier, then descend the
/// path segment by segment through property enumeration (so spreads and
/// computed keys participate).
pub fn member_path_value<'t>(
    node: Node<'t>,
    ctx: &ExtractCtx<'t>,
) -> Option<(Node<'t>, ExtractCtx<'t>)> {
    let mut segments = Vec::new();
    let mut current = unwrap_wrappers(node);
    while current.kind() == "member_expression" {
        let property = current.child_by_field_name("property")?;
        if property.kind() != "property_identifier" {
            return None;
        }
        segments.push(ctx.text(property).to_string());
        current = unwrap_wrappers(current.child_by_field_name("object")?);
    }
    if current.kind() != "identifier" {
        return None;
    }

    let (mut value, mut value_ctx) = resolve_declarator(ctx.text(current), ctx)?;
    for segment in segments.iter().rev() {
        let object = unwrap_wrappers(value);
        if object.kind() != "object" {
            return None;
        }
        let prop = object_properties(object, &value_ctx)
            .into_iter()
            .find(|prop| &prop.key == segment)?;
        // A property spliced from an imported spread carries that module's
        // context; keep following it.
        value = prop.value;
        value_ctx = prop.ctx;
    }
    Some((value, value_ctx))
}

/// Adds a "this dotted path references a value inside a declared object"
/// alternative to `target`.
pub fn member_path_reference<'t, T: 't>(target: Extractor<'t, T>) -> Extractor<'t, T> {
    Extractor::new(
        |node, _| unwrap_wrappers(node).kind() == "member_expression",
        move |node, ctx| {
            let (value, value_ctx) = member_path_value(node, ctx)?;
            target.parse(unwrap_wrappers(value), &value_ctx)
        },
    )
}

/// The base extractor, or an identifier / member-path reference to a value
/// it would accept.
pub fn resolvable<'t, T: 't>(base: Extractor<'t, T>) -> Extractor<'t, T> {
    union(vec![
        base.clone(),
        identifier_reference(base.clone()),
        member_path_reference(base),
    ])
}
