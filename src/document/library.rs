//! Plugin library: the set of rule documents available to a session.
//!
//! A rules document names its deck and board by `<kind>.<name>`; the
//! library resolves those names. Documents can be inserted directly or
//! loaded from a flat directory of `<kind>.<name>.txt` files.

use rustc_hash::FxHashMap;
use std::path::Path;

use crate::core::{CompileError, CompileResult};

use super::rule_document::{DocumentKind, RuleDocument};

/// Documents keyed by kind and name.
#[derive(Clone, Debug, Default)]
pub struct PluginLibrary {
    documents: FxHashMap<(DocumentKind, String), RuleDocument>,
}

impl PluginLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and add a document. A later document with the same kind
    /// and name replaces the earlier one.
    pub fn add_text(
        &mut self,
        kind: DocumentKind,
        name: &str,
        text: &str,
    ) -> CompileResult<&mut Self> {
        let doc = RuleDocument::parse(kind, name.to_ascii_lowercase(), text)?;
        self.insert(doc);
        Ok(self)
    }

    pub fn insert(&mut self, document: RuleDocument) {
        let key = (document.kind(), document.name().to_string());
        self.documents.insert(key, document);
    }

    #[must_use]
    pub fn get(&self, kind: DocumentKind, name: &str) -> Option<&RuleDocument> {
        self.documents.get(&(kind, name.to_ascii_lowercase()))
    }

    /// Like `get`, but a missing document is a compile error naming the
    /// document that asked for it.
    pub fn require(
        &self,
        kind: DocumentKind,
        name: &str,
        referenced_by: &str,
    ) -> CompileResult<&RuleDocument> {
        self.get(kind, name)
            .ok_or_else(|| CompileError::UnresolvedReference {
                kind: kind.keyword(),
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }

    /// Names of all documents of one kind, sorted.
    #[must_use]
    pub fn names(&self, kind: DocumentKind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .documents
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, n)| n.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Load every `<kind>.<name>.txt` file in `dir`. Other files are
    /// skipped.
    pub fn load_dir(dir: impl AsRef<Path>) -> CompileResult<Self> {
        let mut library = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some((kind, name)) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(DocumentKind::from_file_name)
            else {
                continue;
            };
            let text = std::fs::read_to_string(&path)?;
            library.insert(RuleDocument::parse(kind, name, &text)?);
        }
        log::debug!("loaded {} rule documents", library.len());
        Ok(library)
    }
}
