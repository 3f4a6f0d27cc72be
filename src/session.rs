//! Parse session: options, the constructor pre-filter, and import bindings.
//!
//! A session owns everything extraction borrows from: the main file's tree
//! and any imported modules the resolver produced. Building a session is the
//! only fallible step; [`ParseSession::extract`] itself cannot fail.
//!
//! The pre-filter is a static Aho-Corasick matcher over the two constructor
//! aliases. A file that mentions neither never pays for tree construction:
//! the session holds no tree and extraction returns an empty result.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};
use tree_sitter::Node;

use crate::error::Result;
use crate::extract::references::find_declarator;
use crate::parse::FileParseResult;
use crate::source::{Dialect, SourceFile};

/// The two recognized machine-constructor aliases.
pub const MACHINE_CONSTRUCTORS: [&str; 2] = ["createMachine", "Machine"];

/// Pre-filter matcher over the constructor aliases.
static CONSTRUCTOR_AC: Lazy<AhoCorasick> =
    Lazy::new(|| AhoCorasick::new(MACHINE_CONSTRUCTORS).expect("valid patterns"));

/// Resolves an imported module specifier to that module's source text.
///
/// Returning `None` leaves the import unresolved; identifiers bound by it
/// simply fail to resolve rather than erroring.
pub trait ModuleResolver {
    fn resolve(&self, specifier: &str) -> Option<String>;
}

impl<F> ModuleResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, specifier: &str) -> Option<String> {
        self(specifier)
    }
}

/// Options for building a [`ParseSession`].
pub struct ExtractOptions {
    /// Grammar to parse with. TSX by default; it also accepts plain
    /// TypeScript.
    pub dialect: Dialect,
    /// File name used in diagnostics.
    pub file_name: Option<String>,
    /// Optional cross-file resolver for named imports.
    pub resolver: Option<Box<dyn ModuleResolver>>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            dialect: Dialect::Tsx,
            file_name: None,
            resolver: None,
        }
    }
}

impl ExtractOptions {
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_resolver(mut self, resolver: impl ModuleResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }
}

/// Where a named import's binding points: which resolved module, and the
/// exported name inside it.
#[derive(Debug, Clone)]
struct ImportBinding {
    module: usize,
    exported: String,
}

/// One file's parse state: the main tree, resolved imported modules, and
/// the import-binding map. Lifetime = one file parse.
pub struct ParseSession {
    file_name: String,
    file: Option<SourceFile>,
    modules: Vec<SourceFile>,
    imports: FxHashMap<String, ImportBinding>,
}

impl ParseSession {
    /// Build a session for `text`. Skips tree construction entirely when the
    /// pre-filter finds no constructor alias in the raw text.
    pub fn new(text: impl AsRef<str>, options: ExtractOptions) -> Result<ParseSession> {
        let text = text.as_ref();
        let file_name = options
            .file_name
            .clone()
            .unwrap_or_else(|| "<unknown>".to_string());

        if !CONSTRUCTOR_AC.is_match(text) {
            debug!(file = %file_name, "no machine constructor alias in text, skipping parse");
            return Ok(ParseSession {
                file_name,
                file: None,
                modules: Vec::new(),
                imports: FxHashMap::default(),
            });
        }

        Self::parse(text, options, file_name)
    }

    /// Build a session without the constructor pre-filter, so extractor
    /// tests can parse arbitrary snippets.
    #[cfg(test)]
    pub(crate) fn new_unfiltered(text: &str, options: ExtractOptions) -> Result<ParseSession> {
        let file_name = options
            .file_name
            .clone()
            .unwrap_or_else(|| "<unknown>".to_string());
        Self::parse(text, options, file_name)
    }

    fn parse(text: &str, options: ExtractOptions, file_name: String) -> Result<ParseSession> {
        let file = SourceFile::parse(text, options.dialect, &file_name)?;

        let mut modules = Vec::new();
        let mut imports = FxHashMap::default();
        let mut module_by_specifier: FxHashMap<String, usize> = FxHashMap::default();

        for import in scan_imports(&file) {
            let Some(resolver) = options.resolver.as_deref() else {
                trace!(specifier = %import.specifier, "no resolver installed, import left unresolved");
                continue;
            };
            let module = match module_by_specifier.get(&import.specifier) {
                Some(&index) => index,
                None => {
                    let Some(module_text) = resolver.resolve(&import.specifier) else {
                        warn!(specifier = %import.specifier, "resolver returned no text for import");
                        continue;
                    };
                    let parsed =
                        SourceFile::parse(module_text, options.dialect, &import.specifier)?;
                    modules.push(parsed);
                    let index = modules.len() - 1;
                    module_by_specifier.insert(import.specifier.clone(), index);
                    index
                }
            };
            for (exported, local) in import.bindings {
                imports.insert(local, ImportBinding { module, exported });
            }
        }

        Ok(ParseSession {
            file_name,
            file: Some(file),
            modules,
            imports,
        })
    }

    /// Run extraction over the session's tree. Returns the empty result when
    /// the pre-filter skipped parsing.
    pub fn extract(&self) -> FileParseResult<'_> {
        crate::parse::extract_file(self)
    }

    /// The main file, if the pre-filter let it parse.
    pub fn main_file(&self) -> Option<&SourceFile> {
        self.file.as_ref()
    }

    /// Diagnostic file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Resolve an identifier with no local declarator through the import
    /// bindings: the exported declarator's initializer in the imported
    /// module, plus that module's file for text access.
    pub fn imported_declaration(&self, name: &str) -> Option<(Node<'_>, &SourceFile)> {
        let binding = self.imports.get(name)?;
        let file = self.modules.get(binding.module)?;
        let value = find_declarator(file, &binding.exported)?;
        Some((value, file))
    }
}

/// One `import` statement's resolvable content.
struct ScannedImport {
    specifier: String,
    /// `(exported name, local name)` pairs from the named-import clause.
    bindings: Vec<(String, String)>,
}

/// Collect named imports from the file's top-level import statements.
fn scan_imports(file: &SourceFile) -> Vec<ScannedImport> {
    let mut imports = Vec::new();
    let root = file.root();
    let mut cursor = root.walk();
    for statement in root.named_children(&mut cursor) {
        if statement.kind() != "import_statement" {
            continue;
        }
        let Some(source) = statement.child_by_field_name("source") else {
            continue;
        };
        let Some(specifier) = file.string_value(source) else {
            continue;
        };

        let mut bindings = Vec::new();
        crate::source::walk_tree(statement, &mut |node| {
            if node.kind() != "import_specifier" {
                return;
            }
            let Some(name) = node.child_by_field_name("name") else {
                return;
            };
            let exported = file.text_of(name).to_string();
            let local = node
                .child_by_field_name("alias")
                .map(|alias| file.text_of(alias).to_string())
                .unwrap_or_else(|| exported.clone());
            bindings.push((exported, local));
        });

        if !bindings.is_empty() {
            imports.push(ScannedImport { specifier, bindings });
        }
    }
    imports
}
