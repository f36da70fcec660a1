//! Occurrence index
//!
//! Built in one pass over a [`Document`]: assigns every attribute line to its
//! enclosing scope and records, per `(scope, attribute)` key, the ordered line
//! indices of its occurrences. Also records the line range of each scope.

use std::collections::HashMap;
use std::ops::Range;

use crate::document::Document;
use crate::intent::Scope;
use crate::line::LineKind;

/// Identity of a scope within one document
///
/// Stanzas are identified by the index of their header line, so duplicate
/// stanza names yield distinct scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeId {
    /// Attributes before the first stanza header
    TopLevel,
    /// Stanza opened by the header at this line index
    Stanza(usize),
}

/// Key of an occurrence list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OccurrenceKey {
    /// Enclosing scope
    pub scope: ScopeId,
    /// Attribute name
    pub attribute: String,
}

impl OccurrenceKey {
    /// Create key
    #[inline]
    #[must_use]
    pub fn new(scope: ScopeId, attribute: impl Into<String>) -> Self {
        Self {
            scope,
            attribute: attribute.into(),
        }
    }
}

/// Extent of one scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSpan {
    /// Scope identity
    pub id: ScopeId,
    /// Stanza name (`None` for top-level)
    pub name: Option<String>,
    /// Half-open line range; includes the header for stanzas
    pub range: Range<usize>,
    /// Index of the last attribute line inside the scope
    pub last_attribute: Option<usize>,
}

impl ScopeSpan {
    /// Line index where content appended "at end of scope" goes
    ///
    /// Right after the last attribute; with no attributes, right after the
    /// header, or the very start of the file for the top-level scope.
    #[inline]
    #[must_use]
    pub fn append_position(&self) -> usize {
        match (self.last_attribute, self.id) {
            (Some(last), _) => last + 1,
            (None, ScopeId::Stanza(header)) => header + 1,
            (None, ScopeId::TopLevel) => self.range.start,
        }
    }
}

/// Index of scopes and attribute occurrences
#[derive(Debug, Clone, Default)]
pub struct OccurrenceIndex {
    /// All scopes in document order; the top-level scope comes first
    scopes: Vec<ScopeSpan>,
    occurrences: HashMap<OccurrenceKey, Vec<usize>>,
}

impl OccurrenceIndex {
    /// Build the index in a single pass
    #[must_use]
    pub fn build(document: &Document) -> Self {
        let mut scopes = vec![ScopeSpan {
            id: ScopeId::TopLevel,
            name: None,
            range: 0..document.len(),
            last_attribute: None,
        }];
        let mut occurrences: HashMap<OccurrenceKey, Vec<usize>> = HashMap::new();

        for (index, line) in document.lines().iter().enumerate() {
            match line.kind() {
                LineKind::StanzaHeader(name) => {
                    if let Some(current) = scopes.last_mut() {
                        current.range.end = index;
                    }
                    scopes.push(ScopeSpan {
                        id: ScopeId::Stanza(index),
                        name: Some(name.clone()),
                        range: index..document.len(),
                        last_attribute: None,
                    });
                }
                LineKind::Attribute { name, .. } => {
                    let Some(current) = scopes.last_mut() else {
                        continue;
                    };
                    current.last_attribute = Some(index);
                    occurrences
                        .entry(OccurrenceKey::new(current.id, name.as_str()))
                        .or_default()
                        .push(index);
                }
                LineKind::Blank | LineKind::Comment => {}
            }
        }

        tracing::debug!(
            scopes = scopes.len(),
            keys = occurrences.len(),
            "built occurrence index"
        );

        Self {
            scopes,
            occurrences,
        }
    }

    /// All scopes, top-level first
    #[inline]
    #[must_use]
    pub fn scopes(&self) -> &[ScopeSpan] {
        &self.scopes
    }

    /// Resolve a requested scope
    ///
    /// The top-level scope always resolves. A stanza name resolves to the
    /// first stanza carrying that name.
    #[must_use]
    pub fn find_scope(&self, scope: &Scope) -> Option<&ScopeSpan> {
        match scope {
            Scope::TopLevel => self.scopes.first(),
            Scope::Stanza(name) => self
                .scopes
                .iter()
                .find(|span| span.name.as_deref() == Some(name.as_str())),
        }
    }

    /// Every stanza carrying `name`, in document order
    pub fn stanzas_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ScopeSpan> + 'a {
        self.scopes
            .iter()
            .filter(move |span| span.name.as_deref() == Some(name))
    }

    /// Line indices of an attribute within a scope, in document order
    #[must_use]
    pub fn occurrences(&self, scope: ScopeId, attribute: &str) -> &[usize] {
        self.occurrences
            .get(&OccurrenceKey::new(scope, attribute))
            .map_or(&[], Vec::as_slice)
    }

    /// Every attribute line index in a scope, in document order
    #[must_use]
    pub fn attributes_in(&self, scope: ScopeId) -> Vec<usize> {
        let mut lines: Vec<usize> = self
            .occurrences
            .iter()
            .filter(|(key, _)| key.scope == scope)
            .flat_map(|(_, lines)| lines.iter().copied())
            .collect();
        lines.sort_unstable();
        lines
    }
}
