//! Comment records and marker directives.
//!
//! Two line-position-sensitive markers are recognized:
//! - `xstate-ignore-next-line`: downstream consumers should skip the next
//!   constructed machine;
//! - `@xstate-layout <token>`: an opaque layout payload extracted verbatim
//!   and never interpreted here.
//!
//! Only adjacency activates a directive: the comment has to end on the line
//! immediately above the machine constructor's callee.

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

use crate::source::{SourceFile, SourceSpan};

/// Marker for suppressing the next machine match.
pub const IGNORE_MARKER: &str = "xstate-ignore-next-line";

/// Layout payload: everything after the tag up to the next whitespace.
static LAYOUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@xstate-layout\s+(\S+)").expect("valid layout pattern"));

/// Directive parsed out of a comment's text, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentDirective {
    /// Contains the ignore marker.
    IgnoreNextLine,
    /// Contains the layout tag; the payload is the opaque token after it.
    Layout(String),
}

/// One comment node from the file, with its parsed directive.
#[derive(Debug, Clone)]
pub struct CommentRecord<'t> {
    pub node: Node<'t>,
    pub text: String,
    pub span: SourceSpan,
    pub directive: Option<CommentDirective>,
}

impl<'t> CommentRecord<'t> {
    /// Build a record from a `comment` node. Returns `None` for other kinds.
    pub fn from_node(node: Node<'t>, file: &SourceFile) -> Option<Self> {
        if node.kind() != "comment" {
            return None;
        }
        let text = file.text_of(node).to_string();
        let directive = parse_directive(&text);
        Some(CommentRecord {
            node,
            span: SourceSpan::of(node),
            text,
            directive,
        })
    }

    /// Whether this comment ends on the line immediately above `node`.
    pub fn precedes_line_of(&self, node: Node) -> bool {
        self.node.end_position().row + 1 == node.start_position().row
    }
}

/// Classify a comment's text. The ignore marker wins over the layout tag
/// when both appear, which never happens in practice.
fn parse_directive(text: &str) -> Option<CommentDirective> {
    if text.contains(IGNORE_MARKER) {
        return Some(CommentDirective::IgnoreNextLine);
    }
    LAYOUT_RE
        .captures(text)
        .map(|caps| CommentDirective::Layout(caps[1].to_string()))
}
