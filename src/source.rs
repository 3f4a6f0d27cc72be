//! Source file handling and the tree-sitter collaborator.
//!
//! Owns the raw text and parsed tree for one file and provides the low-level
//! text helpers the extractors build on:
//! - node text slices (byte-range based, no allocation)
//! - string literal values (quote stripping plus escape decoding)
//! - template literal values (static fragments only, interpolations skipped)
//! - number and boolean literal values
//!
//! The `Dialect` picks between the TypeScript and TSX grammars. TSX is a
//! superset that also parses JSX, so it is the default; plain TypeScript is
//! available for callers that know their sources never contain JSX.

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Parser, Tree};

use crate::error::{ExtractError, Result};

/// Which tree-sitter grammar to parse with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// TypeScript grammar (`.ts`, `.js`, `.mjs`, `.cjs`). Does not accept JSX.
    Typescript,
    /// TSX grammar (`.tsx`, `.jsx`). Superset of TypeScript, JSX-aware.
    #[default]
    Tsx,
}

/// A position in the source: 1-based line, 0-based column, absolute byte
/// offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
    pub index: usize,
}

/// A half-open span of source text between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourceSpan {
    /// Build a span from any tree-sitter node.
    pub fn of(node: Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start: SourcePosition {
                line: start.row + 1,
                column: start.column,
                index: node.start_byte(),
            },
            end: SourcePosition {
                line: end.row + 1,
                column: end.column,
                index: node.end_byte(),
            },
        }
    }

    /// Whether `other` lies entirely within this span (byte offsets).
    pub fn contains(&self, other: &SourceSpan) -> bool {
        self.start.index <= other.start.index && other.end.index <= self.end.index
    }

    /// Byte length of the span.
    pub fn len(&self) -> usize {
        self.end.index.saturating_sub(self.start.index)
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One parsed source file: the text and its tree, owned together.
pub struct SourceFile {
    text: String,
    tree: Tree,
}

impl SourceFile {
    /// Parse `text` with the given dialect's grammar.
    ///
    /// Fails only when tree-sitter rejects the grammar
    /// (`ExtractError::TreeSitter`) or returns no tree (`ExtractError::Parse`).
    pub fn parse(text: impl Into<String>, dialect: Dialect, file_name: &str) -> Result<SourceFile> {
        let text = text.into();

        let lang = match dialect {
            Dialect::Tsx => &tree_sitter_typescript::LANGUAGE_TSX,
            Dialect::Typescript => &tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
        };

        let mut parser = Parser::new();
        parser
            .set_language(&(*lang).into())
            .map_err(|e| ExtractError::TreeSitter(e.to_string()))?;

        let tree = parser.parse(&text, None).ok_or_else(|| ExtractError::Parse {
            file: file_name.to_string(),
            message: "parser returned no tree".to_string(),
        })?;

        Ok(SourceFile { text, tree })
    }

    /// The root node of the file's tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// The raw source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text slice covered by a node.
    pub fn text_of(&self, node: Node) -> &str {
        self.text.get(node.start_byte()..node.end_byte()).unwrap_or("")
    }

    /// Value of a `string` literal node: concatenated fragments with escape
    /// sequences decoded. Returns `None` for any other kind.
    pub fn string_value(&self, node: Node) -> Option<String> {
        if node.kind() != "string" {
            return None;
        }
        let mut value = String::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "string_fragment" => value.push_str(self.text_of(child)),
                "escape_sequence" => value.push_str(&decode_escape(self.text_of(child))),
                _ => {}
            }
        }
        Some(value)
    }

    /// Value of a `template_string` node: the static fragments concatenated
    /// in order. `${...}` substitutions are skipped, never evaluated.
    pub fn template_value(&self, node: Node) -> Option<String> {
        if node.kind() != "template_string" {
            return None;
        }
        let mut value = String::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "string_fragment" => value.push_str(self.text_of(child)),
                "escape_sequence" => value.push_str(&decode_escape(self.text_of(child))),
                _ => {}
            }
        }
        Some(value)
    }

    /// Value of a `number` literal node.
    pub fn number_value(&self, node: Node) -> Option<f64> {
        if node.kind() != "number" {
            return None;
        }
        self.text_of(node).parse().ok()
    }

    /// Value of a `true`/`false` literal node.
    pub fn bool_value(&self, node: Node) -> Option<bool> {
        match node.kind() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

/// Decode one JS escape sequence. Single-letter escapes (`\n`, `\t`, ...)
/// map to their character; `\xNN`, `\uXXXX`, and `\u{...}` decode their hex
/// code point. Unknown escapes keep the escaped character verbatim, which
/// matches how the literal would read in source.
fn decode_escape(escape: &str) -> String {
    let Some(rest) = escape.strip_prefix('\\') else {
        return escape.to_string();
    };
    match rest.chars().next() {
        Some('n') => "\n".to_string(),
        Some('t') => "\t".to_string(),
        Some('r') => "\r".to_string(),
        Some('0') => "\0".to_string(),
        Some('x') | Some('u') => decode_code_point(rest).unwrap_or_else(|| rest.to_string()),
        Some(c) => c.to_string(),
        None => String::new(),
    }
}

/// Hex form of an escape, without the backslash: `xNN`, `uXXXX`, or
/// `u{...}`. Out-of-range code points (lone surrogates) yield `None`.
fn decode_code_point(rest: &str) -> Option<String> {
    let digits = if let Some(braced) = rest.strip_prefix("u{") {
        braced.strip_suffix('}')?
    } else if let Some(fixed) = rest.strip_prefix('u') {
        fixed
    } else {
        rest.strip_prefix('x')?
    };
    let value = u32::from_str_radix(digits, 16).ok()?;
    char::from_u32(value).map(String::from)
}

/// Pre-order walk over every node in the tree, extras (comments) included.
pub fn walk_tree<'t>(node: Node<'t>, visit: &mut impl FnMut(Node<'t>)) {
    visit(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_tree(child, visit);
    }
}
