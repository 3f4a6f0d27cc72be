//! The machine-config grammar: a recursive-descent schema built from the
//! extract combinators.
//!
//! Each submodule covers one slot family of a machine configuration:
//! state nodes, transitions, actions (basic and named-helper forms), guards,
//! invoked services, the options literal, and the constructor/spawn call
//! recognizers the orchestrator drives.

pub mod actions;
pub mod guards;
pub mod invoke;
pub mod machine_call;
pub mod named_actions;
pub mod options;
pub mod spawn;
pub mod state_node;
pub mod transitions;

use serde::{Deserialize, Serialize};

/// How an action, guard, or service was written in source.
///
/// Shared by every recovered descriptor so queries can filter symmetrically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    /// A string literal naming an implementation provided elsewhere.
    Named,
    /// An inline function expression or a recognized helper call.
    Inline,
    /// A bare identifier whose declaration was not resolved.
    Identifier,
    /// Anything else the grammar could not classify.
    Unknown,
}

impl DeclarationKind {
    /// All four kinds, the default filter for `get_all_*` queries.
    pub const ALL: [DeclarationKind; 4] = [
        DeclarationKind::Named,
        DeclarationKind::Inline,
        DeclarationKind::Identifier,
        DeclarationKind::Unknown,
    ];
}
