//! Per-machine result facade.
//!
//! Wraps one matched constructor call's recovered tree and answers derived
//! queries: flattened state nodes with hierarchical paths, transitions with
//! their origin, recursive action/guard/service collection with
//! declaration-kind filtering, named-delay grouping, options lookups, the
//! comment-directive queries, and the `to_config` projection.
//!
//! Every query is a pure function over the recovered tree, computed per
//! call; nothing here mutates or caches.

use rustc_hash::FxHashMap;
use serde_json::Value;
use tree_sitter::Node;

use crate::comments::{CommentDirective, CommentRecord};
use crate::extract::scalars::TextValue;
use crate::grammar::actions::ActionNode;
use crate::grammar::guards::GuardNode;
use crate::grammar::invoke::{InvokeNode, InvokeSrc};
use crate::grammar::machine_call::MachineCall;
use crate::grammar::options::MachineOptions;
use crate::grammar::state_node::StateNode;
use crate::grammar::transitions::TransitionNode;
use crate::grammar::DeclarationKind;
use crate::source::SourceSpan;
use std::rc::Rc;

/// One state node paired with its hierarchical path (root = `[]`).
#[derive(Debug, Clone)]
pub struct StateNodeEntry<'a, 't> {
    pub path: Vec<String>,
    pub node: &'a StateNode<'t>,
}

/// Which slot a transition came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionKind {
    On { event: String },
    After { delay: String },
    OnDone,
    InvokeOnDone,
    InvokeOnError,
    Always,
}

/// One transition with its origin.
#[derive(Debug, Clone)]
pub struct TransitionEntry<'a, 't> {
    pub kind: TransitionKind,
    pub from_path: Vec<String>,
    pub transition: &'a TransitionNode<'t>,
}

/// A resolved transition target with its origin.
#[derive(Debug, Clone)]
pub struct TargetEntry<'a, 't> {
    pub target: &'a [TextValue<'t>],
    pub from_path: Vec<String>,
}

/// One collected action with the path of the state it belongs to.
#[derive(Debug, Clone)]
pub struct ActionEntry<'a, 't> {
    pub action: &'a ActionNode<'t>,
    pub state_path: Vec<String>,
}

/// One collected guard with the path of the state it belongs to.
#[derive(Debug, Clone)]
pub struct GuardEntry<'a, 't> {
    pub guard: &'a GuardNode<'t>,
    pub state_path: Vec<String>,
}

/// One collected invoked service with the path of the state it belongs to.
#[derive(Debug, Clone)]
pub struct ServiceEntry<'a, 't> {
    pub src: &'a InvokeSrc<'t>,
    pub invoke: &'a InvokeNode<'t>,
    pub state_path: Vec<String>,
}

/// One named `after` delay reference.
#[derive(Debug, Clone)]
pub struct DelayEntry<'t> {
    pub name: String,
    pub key_node: Node<'t>,
    pub state_path: Vec<String>,
}

/// The layout-directive payload attached to a machine.
#[derive(Debug, Clone)]
pub struct LayoutComment<'t> {
    pub payload: String,
    pub node: Node<'t>,
}

/// One matched machine's recovered tree and query surface.
pub struct MachineParseResult<'t> {
    call: MachineCall<'t>,
    comments: Rc<Vec<CommentRecord<'t>>>,
}

impl<'t> MachineParseResult<'t> {
    pub(crate) fn new(call: MachineCall<'t>, comments: Rc<Vec<CommentRecord<'t>>>) -> Self {
        MachineParseResult { call, comments }
    }

    /// The constructor call expression node.
    pub fn call_node(&self) -> Node<'t> {
        self.call.node
    }

    /// The callee node (`createMachine` / `xstate.createMachine`).
    pub fn callee(&self) -> Node<'t> {
        self.call.callee
    }

    /// Which constructor alias was called.
    pub fn callee_name(&self) -> &str {
        &self.call.callee_name
    }

    /// The `const name = ...` binding, when the call initializes one.
    pub fn machine_variable_name(&self) -> Option<&str> {
        self.call.machine_variable_name.as_deref()
    }

    /// The recovered root state node, absent when argument 0 was not an
    /// object the grammar could match.
    pub fn definition(&self) -> Option<&StateNode<'t>> {
        self.call.definition.as_ref()
    }

    /// The parsed options literal (argument 1).
    pub fn options(&self) -> Option<&MachineOptions<'t>> {
        self.call.options.as_ref()
    }

    /// Source span of the definition argument, used for spawn linking.
    pub fn definition_span(&self) -> Option<SourceSpan> {
        self.call.definition.as_ref().map(|def| SourceSpan::of(def.node))
    }

    /// Every state node, pre-order, tagged with its full path.
    pub fn all_state_nodes(&self) -> Vec<StateNodeEntry<'_, 't>> {
        let mut nodes = Vec::new();
        if let Some(root) = self.definition() {
            collect_state_nodes(root, Vec::new(), &mut nodes);
        }
        nodes
    }

    /// Find a state node by exact path sequence (case-sensitive).
    pub fn state_node_by_path(&self, path: &[&str]) -> Option<StateNodeEntry<'_, 't>> {
        self.all_state_nodes()
            .into_iter()
            .find(|entry| entry.path.iter().map(String::as_str).eq(path.iter().copied()))
    }

    /// Every transition in the machine, in state pre-order; per state the
    /// order is `on`, `after`, `onDone`, invoke `onDone`, invoke `onError`,
    /// `always`. Transitions without a resolved target are included.
    pub fn transitions(&self) -> Vec<TransitionEntry<'_, 't>> {
        let mut entries = Vec::new();
        for state in self.all_state_nodes() {
            if let Some(on) = &state.node.on {
                for entry in &on.entries {
                    for transition in &entry.value {
                        entries.push(TransitionEntry {
                            kind: TransitionKind::On {
                                event: entry.key.clone(),
                            },
                            from_path: state.path.clone(),
                            transition,
                        });
                    }
                }
            }
            if let Some(after) = &state.node.after {
                for entry in &after.entries {
                    for transition in &entry.value {
                        entries.push(TransitionEntry {
                            kind: TransitionKind::After {
                                delay: entry.key.clone(),
                            },
                            from_path: state.path.clone(),
                            transition,
                        });
                    }
                }
            }
            if let Some(on_done) = &state.node.on_done {
                for transition in on_done {
                    entries.push(TransitionEntry {
                        kind: TransitionKind::OnDone,
                        from_path: state.path.clone(),
                        transition,
                    });
                }
            }
            if let Some(invokes) = &state.node.invoke {
                for invoke in invokes {
                    for transition in invoke.on_done.iter().flatten() {
                        entries.push(TransitionEntry {
                            kind: TransitionKind::InvokeOnDone,
                            from_path: state.path.clone(),
                            transition,
                        });
                    }
                    for transition in invoke.on_error.iter().flatten() {
                        entries.push(TransitionEntry {
                            kind: TransitionKind::InvokeOnError,
                            from_path: state.path.clone(),
                            transition,
                        });
                    }
                }
            }
            if let Some(always) = &state.node.always {
                for transition in always {
                    entries.push(TransitionEntry {
                        kind: TransitionKind::Always,
                        from_path: state.path.clone(),
                        transition,
                    });
                }
            }
        }
        entries
    }

    /// Transitions filtered to those with a resolved, non-empty target.
    pub fn transition_targets(&self) -> Vec<TargetEntry<'_, 't>> {
        self.transitions()
            .into_iter()
            .filter_map(|entry| {
                let target = entry.transition.target.as_deref()?;
                (!target.is_empty()).then(|| TargetEntry {
                    target,
                    from_path: entry.from_path,
                })
            })
            .collect()
    }

    /// Every action in the machine, descending into `choose` branches.
    /// `kinds = None` means all four declaration kinds.
    pub fn all_actions(&self, kinds: Option<&[DeclarationKind]>) -> Vec<ActionEntry<'_, 't>> {
        let mut actions = Vec::new();
        for state in self.all_state_nodes() {
            for list in [
                &state.node.entry,
                &state.node.on_entry,
                &state.node.exit,
                &state.node.on_exit,
            ]
            .into_iter()
            .flatten()
            {
                for action in list {
                    collect_actions(action, &state.path, &mut actions);
                }
            }
        }
        for entry in self.transitions() {
            for action in entry.transition.actions.iter().flatten() {
                collect_actions(action, &entry.from_path, &mut actions);
            }
        }
        filter_by_kind(actions, kinds, |entry| entry.action.kind)
    }

    /// Every guard: transition `cond`s plus `choose` branch conditions.
    pub fn all_guards(&self, kinds: Option<&[DeclarationKind]>) -> Vec<GuardEntry<'_, 't>> {
        let mut guards = Vec::new();
        for entry in self.transitions() {
            if let Some(cond) = &entry.transition.cond {
                guards.push(GuardEntry {
                    guard: cond,
                    state_path: entry.from_path.clone(),
                });
            }
        }
        for entry in self.all_actions(None) {
            for branch in entry.action.choose_branches.iter().flatten() {
                if let Some(cond) = &branch.cond {
                    guards.push(GuardEntry {
                        guard: cond,
                        state_path: entry.state_path.clone(),
                    });
                }
            }
        }
        filter_by_kind(guards, kinds, |entry| entry.guard.kind)
    }

    /// Every invoked service source.
    pub fn all_services(&self, kinds: Option<&[DeclarationKind]>) -> Vec<ServiceEntry<'_, 't>> {
        let mut services = Vec::new();
        for state in self.all_state_nodes() {
            for invoke in state.node.invoke.iter().flatten() {
                if let Some(src) = &invoke.src {
                    services.push(ServiceEntry {
                        src,
                        invoke,
                        state_path: state.path.clone(),
                    });
                }
            }
        }
        filter_by_kind(services, kinds, |entry| entry.src.kind)
    }

    /// `after` entries whose key is an identifier-style name (a named delay
    /// reference rather than a literal duration), grouped by name.
    pub fn named_delays(&self) -> FxHashMap<String, Vec<DelayEntry<'t>>> {
        let mut delays: FxHashMap<String, Vec<DelayEntry<'t>>> = FxHashMap::default();
        for state in self.all_state_nodes() {
            for after in &state.node.after {
                for entry in &after.entries {
                    if entry.key_node.kind() != "property_identifier" {
                        continue;
                    }
                    delays.entry(entry.key.clone()).or_default().push(DelayEntry {
                        name: entry.key.clone(),
                        key_node: entry.key_node,
                        state_path: state.path.clone(),
                    });
                }
            }
        }
        delays
    }

    /// Look up a named action implementation in the options literal.
    pub fn action_implementation(&self, name: &str) -> Option<Node<'t>> {
        let actions = self.options()?.actions.as_ref()?;
        actions.get(name).map(|entry| entry.value)
    }

    /// Look up a named service implementation in the options literal.
    pub fn service_implementation(&self, name: &str) -> Option<Node<'t>> {
        let services = self.options()?.services.as_ref()?;
        services.get(name).map(|entry| entry.value)
    }

    /// Look up a named guard implementation in the options literal.
    pub fn guard_implementation(&self, name: &str) -> Option<Node<'t>> {
        let guards = self.options()?.guards.as_ref()?;
        guards.get(name).map(|entry| entry.value)
    }

    /// Project the recovered tree into a plain declarative config object.
    pub fn to_config(&self) -> Option<Value> {
        self.definition().map(crate::config::to_config)
    }

    /// Whether an ignore-marker comment ends on the line immediately above
    /// the callee.
    pub fn is_ignored(&self) -> bool {
        self.comments.iter().any(|comment| {
            comment.directive == Some(CommentDirective::IgnoreNextLine)
                && comment.precedes_line_of(self.call.callee)
        })
    }

    /// The layout payload from an adjacent layout comment, if any.
    pub fn layout_comment(&self) -> Option<LayoutComment<'t>> {
        self.comments.iter().find_map(|comment| {
            let CommentDirective::Layout(payload) = comment.directive.as_ref()? else {
                return None;
            };
            comment
                .precedes_line_of(self.call.callee)
                .then(|| LayoutComment {
                    payload: payload.clone(),
                    node: comment.node,
                })
        })
    }
}

fn collect_state_nodes<'a, 't>(
    node: &'a StateNode<'t>,
    path: Vec<String>,
    out: &mut Vec<StateNodeEntry<'a, 't>>,
) {
    out.push(StateNodeEntry {
        path: path.clone(),
        node,
    });
    if let Some(states) = &node.states {
        for entry in &states.entries {
            let mut child_path = path.clone();
            child_path.push(entry.key.clone());
            collect_state_nodes(&entry.value, child_path, out);
        }
    }
}

fn collect_actions<'a, 't>(
    action: &'a ActionNode<'t>,
    state_path: &[String],
    out: &mut Vec<ActionEntry<'a, 't>>,
) {
    out.push(ActionEntry {
        action,
        state_path: state_path.to_vec(),
    });
    for branch in action.choose_branches.iter().flatten() {
        for nested in &branch.actions {
            collect_actions(nested, state_path, out);
        }
    }
}

fn filter_by_kind<T>(
    entries: Vec<T>,
    kinds: Option<&[DeclarationKind]>,
    kind_of: impl Fn(&T) -> DeclarationKind,
) -> Vec<T> {
    match kinds {
        None => entries,
        Some(kinds) => entries
            .into_iter()
            .filter(|entry| kinds.contains(&kind_of(entry)))
            .collect(),
    }
}
