//! File-level extraction: one traversal, then linking.
//!
//! A single pre-order walk over the tree collects comment records, machine
//! constructor calls, and `spawn(identifier)` calls. A second pass links
//! spawns to machines: the spawned identifier names the *source* machine's
//! variable binding, and the innermost machine definition enclosing the
//! spawn call is the *parent*. Diagnostics reported during grammar descent
//! are drained into the result.

use std::rc::Rc;

use serde::Serialize;
use tracing::debug;

use crate::comments::CommentRecord;
use crate::extract::{ExtractCtx, UnparseableNode};
use crate::grammar::machine_call::parse_machine_call;
use crate::grammar::spawn::{parse_spawn_call, SpawnCall};
use crate::machine::MachineParseResult;
use crate::session::ParseSession;
use crate::source::{walk_tree, SourceSpan};

/// A spawn relationship between two machines in the same file, by index
/// into [`FileParseResult::machines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MachineLink {
    /// The machine being spawned.
    pub source_index: usize,
    /// The machine whose definition contains the spawn call.
    pub parent_index: usize,
}

/// Everything extracted from one file.
pub struct FileParseResult<'t> {
    /// Machines in source order.
    pub machines: Vec<MachineParseResult<'t>>,
    /// Spawn links between machines in this file.
    pub links: Vec<MachineLink>,
    /// Nodes the grammar gave up on, with the surrounding parse kept.
    pub unparseable: Vec<UnparseableNode<'t>>,
    /// Every comment in the file, shared with the per-machine results for
    /// the directive queries.
    pub comments: Rc<Vec<CommentRecord<'t>>>,
}

impl<'t> FileParseResult<'t> {
    fn empty() -> Self {
        FileParseResult {
            machines: Vec::new(),
            links: Vec::new(),
            unparseable: Vec::new(),
            comments: Rc::new(Vec::new()),
        }
    }
}

/// Extract every machine, spawn link, and comment directive in the session's
/// file. Infallible: malformed pieces degrade to absence or to entries in
/// `unparseable`.
pub fn extract_file(session: &ParseSession) -> FileParseResult<'_> {
    let Some(file) = session.main_file() else {
        return FileParseResult::empty();
    };
    let ctx = ExtractCtx::new(file, session);

    let mut comments = Vec::new();
    let mut calls = Vec::new();
    let mut spawns: Vec<SpawnCall<'_>> = Vec::new();

    walk_tree(file.root(), &mut |node| {
        if let Some(record) = CommentRecord::from_node(node, file) {
            comments.push(record);
            return;
        }
        if node.kind() != "call_expression" {
            return;
        }
        if let Some(call) = parse_machine_call(node, &ctx) {
            calls.push(call);
        } else if let Some(spawn) = parse_spawn_call(node, &ctx) {
            spawns.push(spawn);
        }
    });

    debug!(
        file = %session.file_name(),
        machines = calls.len(),
        spawns = spawns.len(),
        "file traversal complete"
    );

    let comments = Rc::new(comments);
    let machines: Vec<MachineParseResult<'_>> = calls
        .into_iter()
        .map(|call| MachineParseResult::new(call, Rc::clone(&comments)))
        .collect();

    let links = link_spawns(&machines, &spawns);

    FileParseResult {
        machines,
        links,
        unparseable: ctx.take_unparseable(),
        comments,
    }
}

/// Resolve spawn calls against the collected machines. A spawn with no
/// matching source binding, or outside every machine definition, links
/// nothing.
fn link_spawns(machines: &[MachineParseResult<'_>], spawns: &[SpawnCall<'_>]) -> Vec<MachineLink> {
    let mut links = Vec::new();
    for spawn in spawns {
        let Some(source_index) = machines
            .iter()
            .position(|machine| machine.machine_variable_name() == Some(&spawn.machine_name))
        else {
            continue;
        };
        let spawn_span = SourceSpan::of(spawn.node);
        let parent_index = machines
            .iter()
            .enumerate()
            .filter_map(|(index, machine)| {
                let span = machine.definition_span()?;
                span.contains(&spawn_span).then(|| (index, span.len()))
            })
            .min_by_key(|&(_, len)| len)
            .map(|(index, _)| index);
        if let Some(parent_index) = parent_index {
            links.push(MachineLink {
                source_index,
                parent_index,
            });
        }
    }
    links
}
