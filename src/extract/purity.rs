//! Function-body purity classification.
//!
//! A function passed inline as an action or guard may later be re-executed
//! standalone, but only if its body references nothing outside its own
//! parameters. This module walks the body and classifies every identifier
//! reference as allowed (names a declared parameter) or disallowed (closure
//! capture).
//!
//! Member-access property names and static object keys are
//! `property_identifier` nodes in the grammar, so `(ctx) => { ctx.cool }`
//! reads as one allowed reference and stays pure. Shorthand object values
//! (`{ ctx }`) are real references and do count.

use tree_sitter::Node;

use super::{is_function_expression, unwrap_wrappers, ExtractCtx};

/// Classification of a function body's identifier references.
#[derive(Debug, Clone)]
pub struct PurityReport<'t> {
    pub node: Node<'t>,
    pub param_names: Vec<String>,
    pub allowed: Vec<Node<'t>>,
    pub disallowed: Vec<Node<'t>>,
}

impl PurityReport<'_> {
    /// Pure means no references escape the parameter list.
    pub fn is_pure(&self) -> bool {
        self.disallowed.is_empty()
    }
}

/// Analyze a function or arrow-function expression. Returns `None` for any
/// other node kind.
pub fn purity_report<'t>(node: Node<'t>, ctx: &ExtractCtx<'t>) -> Option<PurityReport<'t>> {
    let node = unwrap_wrappers(node);
    if !is_function_expression(node) {
        return None;
    }

    let param_names = parameter_names(node, ctx);
    let mut allowed = Vec::new();
    let mut disallowed = Vec::new();

    if let Some(body) = node.child_by_field_name("body") {
        crate::source::walk_tree(body, &mut |child| {
            if !matches!(child.kind(), "identifier" | "shorthand_property_identifier") {
                return;
            }
            let name = ctx.text(child);
            if param_names.iter().any(|param| param == name) {
                allowed.push(child);
            } else {
                disallowed.push(child);
            }
        });
    }

    Some(PurityReport {
        node,
        param_names,
        allowed,
        disallowed,
    })
}

/// Collect every name bound by the function's parameter list: plain
/// identifiers (with or without annotations and defaults) and all the
/// identifiers inside destructuring patterns.
fn parameter_names<'t>(node: Node<'t>, ctx: &ExtractCtx<'t>) -> Vec<String> {
    let mut names = Vec::new();

    // Arrow shorthand: `ctx => ...` has a single bare parameter field.
    if let Some(single) = node.child_by_field_name("parameter") {
        collect_bound_names(single, ctx, &mut names);
        return names;
    }

    let Some(params) = node.child_by_field_name("parameters") else {
        return names;
    };
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            "required_parameter" | "optional_parameter" | "rest_parameter" => {
                if let Some(pattern) = param.child_by_field_name("pattern") {
                    collect_bound_names(pattern, ctx, &mut names);
                }
            }
            "identifier" => names.push(ctx.text(param).to_string()),
            _ => {}
        }
    }
    names
}

fn collect_bound_names<'t>(pattern: Node<'t>, ctx: &ExtractCtx<'t>, names: &mut Vec<String>) {
    crate::source::walk_tree(pattern, &mut |node| {
        if matches!(
            node.kind(),
            "identifier" | "shorthand_property_identifier_pattern"
        ) {
            names.push(ctx.text(node).to_string());
        }
    });
}
