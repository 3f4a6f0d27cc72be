//! The `spawn(identifier)` recognizer.
//!
//! Only the identifier-argument form participates in machine linking: the
//! spawned name is matched against declared machine binding names after the
//! whole file has been traversed.

use tree_sitter::Node;

use crate::extract::combinators::named_call;
use crate::extract::{unwrap_wrappers, ExtractCtx, Extractor};

/// One matched spawn call.
#[derive(Debug, Clone)]
pub struct SpawnCall<'t> {
    pub node: Node<'t>,
    pub machine_name: String,
    pub identifier: Node<'t>,
}

/// Try to match a call expression as `spawn(someMachine)`.
pub fn parse_spawn_call<'t>(node: Node<'t>, ctx: &ExtractCtx<'t>) -> Option<SpawnCall<'t>> {
    let identifier = Extractor::new(
        |node, _| unwrap_wrappers(node).kind() == "identifier",
        |node, _| Some(unwrap_wrappers(node)),
    );
    let result = named_call("spawn", identifier).parse(node, ctx)?;
    let identifier = result.first?;
    Some(SpawnCall {
        node: result.node,
        machine_name: ctx.text(identifier).to_string(),
        identifier,
    })
}
