//! The parser-combinator framework the grammar is built from.
//!
//! An [`Extractor`] is a pure value with two capabilities:
//! - `matches(node, ctx)`: a cheap structural test, no side effects;
//! - `parse(node, ctx)`: the interpretation; `None` means the slot stays
//!   absent in the recovered result.
//!
//! Dispatch happens on `matches` alone: [`union`] commits to the first
//! alternative whose `matches` passes, and that alternative's `parse` result
//! is final even when it is `None`. Declaration order in a union is therefore
//! a priority order, and the grammar leans on it (named helper call before
//! generic function expression before bare identifier before catch-all).
//!
//! Extractors never mutate nodes or the context and never panic on malformed
//! domain input; unresolvable values surface as absence, optionally reported
//! through the shared diagnostics sink.

pub mod combinators;
pub mod purity;
pub mod references;
pub mod scalars;

use std::cell::RefCell;
use std::rc::Rc;

use tree_sitter::Node;

use crate::session::ParseSession;
use crate::source::{SourceFile, SourceSpan};

/// A structurally-recognized slot whose value could not be interpreted.
#[derive(Debug, Clone)]
pub struct UnparseableNode<'t> {
    pub node: Node<'t>,
    pub span: SourceSpan,
}

/// Shared sink for unparseable-node diagnostics, threaded through every
/// extractor run in a file parse.
pub type DiagnosticSink<'t> = Rc<RefCell<Vec<UnparseableNode<'t>>>>;

/// Per-run context handed to every `parse` call.
///
/// `file` is the source the current node belongs to; identifier resolution
/// swaps it via [`ExtractCtx::with_file`] when it follows an import into
/// another module, so text reads always use the right bytes.
#[derive(Clone)]
pub struct ExtractCtx<'t> {
    pub file: &'t SourceFile,
    pub session: &'t ParseSession,
    pub sink: DiagnosticSink<'t>,
}

impl<'t> ExtractCtx<'t> {
    pub fn new(file: &'t SourceFile, session: &'t ParseSession) -> Self {
        ExtractCtx {
            file,
            session,
            sink: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Derive a context that reads nodes from another file (an imported
    /// module), sharing the same session and diagnostics sink.
    pub fn with_file(&self, file: &'t SourceFile) -> Self {
        ExtractCtx {
            file,
            session: self.session,
            sink: Rc::clone(&self.sink),
        }
    }

    /// Text of a node in the current file.
    pub fn text(&self, node: Node<'t>) -> &'t str {
        self.file.text_of(node)
    }

    /// Record a node that matched a recognized slot but whose value could
    /// not be resolved.
    pub fn report_unparseable(&self, node: Node<'t>) {
        self.sink.borrow_mut().push(UnparseableNode {
            node,
            span: SourceSpan::of(node),
        });
    }

    /// Drain the collected diagnostics.
    pub fn take_unparseable(&self) -> Vec<UnparseableNode<'t>> {
        std::mem::take(&mut self.sink.borrow_mut())
    }
}

type MatchFn<'t> = dyn Fn(Node<'t>, &ExtractCtx<'t>) -> bool + 't;
type ParseFn<'t, T> = dyn Fn(Node<'t>, &ExtractCtx<'t>) -> Option<T> + 't;

/// A composable node matcher/extractor. Cheap to clone; stateless.
pub struct Extractor<'t, T: 't> {
    matches: Rc<MatchFn<'t>>,
    parse: Rc<ParseFn<'t, T>>,
}

impl<'t, T: 't> Clone for Extractor<'t, T> {
    fn clone(&self) -> Self {
        Extractor {
            matches: Rc::clone(&self.matches),
            parse: Rc::clone(&self.parse),
        }
    }
}

impl<'t, T: 't> Extractor<'t, T> {
    pub fn new(
        matches: impl Fn(Node<'t>, &ExtractCtx<'t>) -> bool + 't,
        parse: impl Fn(Node<'t>, &ExtractCtx<'t>) -> Option<T> + 't,
    ) -> Self {
        Extractor {
            matches: Rc::new(matches),
            parse: Rc::new(parse),
        }
    }

    pub fn matches(&self, node: Node<'t>, ctx: &ExtractCtx<'t>) -> bool {
        (self.matches)(node, ctx)
    }

    /// Parse a node. Returns `None` when the node does not match or when it
    /// matched superficially but failed deeper interpretation.
    pub fn parse(&self, node: Node<'t>, ctx: &ExtractCtx<'t>) -> Option<T> {
        if !self.matches(node, ctx) {
            return None;
        }
        (self.parse)(node, ctx)
    }

    /// Post-process a successful parse (`wrapResult`). The closure also gets
    /// the matched node, so shorthand forms can record their own location.
    pub fn map<U: 't>(self, f: impl Fn(T, Node<'t>) -> U + 't) -> Extractor<'t, U> {
        let inner = self.clone();
        Extractor::new(
            move |node, ctx| self.matches(node, ctx),
            move |node, ctx| inner.parse(node, ctx).map(|result| f(result, node)),
        )
    }
}

/// First-match-wins alternation. `matches` is any alternative matching;
/// `parse` runs the first matching alternative only, with no fall-through
/// on parse failure.
pub fn union<'t, T: 't>(alternatives: Vec<Extractor<'t, T>>) -> Extractor<'t, T> {
    let for_matches = alternatives.clone();
    Extractor::new(
        move |node, ctx| for_matches.iter().any(|alt| alt.matches(node, ctx)),
        move |node, ctx| {
            alternatives
                .iter()
                .find(|alt| alt.matches(node, ctx))
                .and_then(|alt| alt.parse(node, ctx))
        },
    )
}

/// Strip the transparent wrappers TypeScript puts around expressions:
/// `x as T`, `x satisfies T`, `(x)`, and `x!`.
pub fn unwrap_wrappers(node: Node) -> Node {
    let mut current = node;
    loop {
        match current.kind() {
            "as_expression" | "satisfies_expression" | "non_null_expression" => {
                match current.named_child(0) {
                    Some(inner) => current = inner,
                    None => return current,
                }
            }
            "parenthesized_expression" => match current.named_child(0) {
                Some(inner) => current = inner,
                None => return current,
            },
            _ => return current,
        }
    }
}

/// Whether a node is a function or arrow-function expression (async and
/// generator forms included).
pub fn is_function_expression(node: Node) -> bool {
    matches!(
        node.kind(),
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}
