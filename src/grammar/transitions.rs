//! Transition extraction: object form, bare-target shorthand, and the
//! single-or-array slot coercion.

use tree_sitter::Node;

use crate::extract::combinators::maybe_array_of;
use crate::extract::references::resolvable;
use crate::extract::scalars::{string_or_template, TextValue};
use crate::extract::{union, Extractor};

use super::actions::{action_list, ActionNode};
use super::guards::{guard, GuardNode};

/// One recovered transition. A transition with no resolved target is still
/// recorded so callers can detect guard/action-only transitions.
#[derive(Debug, Clone)]
pub struct TransitionNode<'t> {
    pub node: Node<'t>,
    /// One entry for a string target, several for an array-valued target.
    pub target: Option<Vec<TextValue<'t>>>,
    pub actions: Option<Vec<ActionNode<'t>>>,
    pub cond: Option<GuardNode<'t>>,
}

/// Object form: `{ target?, actions?, cond? }`.
fn transition_object<'t>() -> Extractor<'t, TransitionNode<'t>> {
    crate::extract::combinators::object_with_known_keys(
        |node| TransitionNode {
            node,
            target: None,
            actions: None,
            cond: None,
        },
        |record: &mut TransitionNode<'t>, prop, ctx| match prop.key.as_str() {
            "target" => {
                record.target = maybe_array_of(resolvable(string_or_template()))
                    .parse(prop.value, ctx)
                    .filter(|targets| !targets.is_empty());
            }
            "actions" => record.actions = action_list().parse(prop.value, ctx),
            "cond" => record.cond = guard().parse(prop.value, ctx),
            _ => {}
        },
    )
}

/// Bare string (or a reference to one) is shorthand for `{ target }`,
/// unified into the same shape as the object form.
fn transition_shorthand<'t>() -> Extractor<'t, TransitionNode<'t>> {
    resolvable(string_or_template()).map(|target, node| TransitionNode {
        node,
        target: Some(vec![target]),
        actions: None,
        cond: None,
    })
}

/// A single transition in either form.
pub fn transition<'t>() -> Extractor<'t, TransitionNode<'t>> {
    union(vec![transition_object(), transition_shorthand()])
}

/// A transition slot value: one transition or an array of them. An empty
/// array means "present but empty".
pub fn transition_list<'t>() -> Extractor<'t, Vec<TransitionNode<'t>>> {
    maybe_array_of(transition())
}
