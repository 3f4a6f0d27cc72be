//! Static extraction of XState machine configurations from TypeScript and
//! JavaScript source.
//!
//! Nothing here evaluates user code: a tree-sitter parse produces a syntax
//! tree, and a grammar of composable extractors recovers the declarative
//! shape of every `createMachine(...)` / `Machine(...)` call in it:
//! states, transitions, actions, guards, invoked services, spawn links,
//! and the comment directives next to each constructor.
//!
//! The pipeline:
//! - [`session::ParseSession`] holds per-file parse state: the tree,
//!   resolved imported modules, and the constructor pre-filter;
//! - [`extract`] is the parser-combinator framework (match/parse pairs,
//!   first-match-wins unions, object/array combinators, one-hop reference
//!   resolution);
//! - [`grammar`] is the recursive machine-config schema built from those
//!   combinators;
//! - [`parse`] is the file-level orchestrator: one traversal, then spawn
//!   linking;
//! - [`machine`] is the per-machine query facade;
//! - [`config`] is the plain-object projection of a recovered tree.
//!
//! Extraction is total over syntactically valid input: pieces the grammar
//! cannot interpret degrade to absent slots or `unparseable` diagnostics,
//! never to errors. The only fallible step is building the session.
//!
//! ```no_run
//! use statelift::{ExtractOptions, ParseSession};
//!
//! # fn main() -> statelift::Result<()> {
//! let source = r#"
//!     const toggle = createMachine({
//!       id: "toggle",
//!       initial: "inactive",
//!       states: {
//!         inactive: { on: { TOGGLE: "active" } },
//!         active: { on: { TOGGLE: "inactive" } },
//!       },
//!     });
//! "#;
//! let session = ParseSession::new(source, ExtractOptions::default())?;
//! let result = session.extract();
//! for machine in &result.machines {
//!     println!("{:#?}", machine.to_config());
//! }
//! # Ok(())
//! # }
//! ```

pub mod comments;
pub mod config;
pub mod error;
pub mod extract;
pub mod grammar;
pub mod machine;
pub mod parse;
pub mod session;
pub mod source;

pub use comments::{CommentDirective, CommentRecord, IGNORE_MARKER};
pub use config::{to_config, INLINE_IMPLEMENTATION_TYPE};
pub use error::{ExtractError, Result};
pub use extract::UnparseableNode;
pub use grammar::DeclarationKind;
pub use machine::{
    ActionEntry, DelayEntry, GuardEntry, LayoutComment, MachineParseResult, ServiceEntry,
    StateNodeEntry, TargetEntry, TransitionEntry, TransitionKind,
};
pub use parse::{FileParseResult, MachineLink};
pub use session::{ExtractOptions, ModuleResolver, ParseSession, MACHINE_CONSTRUCTORS};
pub use source::{Dialect, SourceFile, SourcePosition, SourceSpan};
