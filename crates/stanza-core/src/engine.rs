//! Mutation engine
//!
//! Given an [`Intent`], consults the [`OccurrenceIndex`], decides the edit
//! class, and produces an [`EditPlan`]: line deletions and insertions keyed
//! by original line index. The plan is applied by splicing, so lines the
//! edit does not touch are carried over as-is and never re-rendered.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::Range;

use crate::document::Document;
use crate::hash::ContentHash;
use crate::index::{OccurrenceIndex, ScopeId, ScopeSpan};
use crate::intent::{Intent, Scope, State};
use crate::line::Line;
use crate::outcome::{ChangeReason, EditOutcome};
use crate::render::{render, RenderOptions};

/// Stateless editor applying intents to stanza text
#[derive(Debug, Clone, Copy, Default)]
pub struct StanzaEditor {
    options: RenderOptions,
}

impl StanzaEditor {
    /// Create editor with render options
    #[inline]
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Apply an intent to text
    ///
    /// Pure: parses `text`, plans the minimal edit, splices it in and renders
    /// the result. For [`ChangeReason::Ok`] the returned text is the input
    /// minus any byte-order mark.
    #[must_use]
    pub fn apply(&self, text: &str, intent: &Intent) -> EditOutcome {
        let base_hash = ContentHash::of_text(text);
        let document = Document::parse(text);
        let (plan, reason) = plan(&document, intent);

        tracing::debug!(
            scope = %intent.scope(),
            attribute = intent.attribute().unwrap_or("<stanza>"),
            state = %intent.state(),
            exclusive = intent.exclusive(),
            deletions = plan.deletions.len(),
            insertions = plan.inserted_lines(),
            reason = %reason,
            base = %base_hash.short(),
            "planned stanza edit"
        );

        let edited = plan.apply(document);
        EditOutcome::new(render(&edited, self.options), reason, base_hash)
    }
}

/// Apply an intent with default render options
#[inline]
#[must_use]
pub fn apply(text: &str, intent: &Intent) -> EditOutcome {
    StanzaEditor::default().apply(text, intent)
}

/// Plan the edit satisfying `intent` against `document`
#[must_use]
pub fn plan(document: &Document, intent: &Intent) -> (EditPlan, ChangeReason) {
    let index = OccurrenceIndex::build(document);
    Planner {
        document,
        index: &index,
        intent,
        plan: EditPlan::default(),
    }
    .run()
}

/// Line splices computed for one edit
///
/// Insertions are keyed by the original index they go in front of; the key
/// `document.len()` appends at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPlan {
    deletions: BTreeSet<usize>,
    insertions: BTreeMap<usize, Vec<Line>>,
}

impl EditPlan {
    /// Mark a line for deletion
    #[inline]
    pub fn delete(&mut self, index: usize) {
        self.deletions.insert(index);
    }

    /// Mark a range of lines for deletion
    #[inline]
    pub fn delete_range(&mut self, range: Range<usize>) {
        self.deletions.extend(range);
    }

    /// Insert fresh lines in front of original line `before`
    pub fn insert(&mut self, before: usize, lines: impl IntoIterator<Item = Line>) {
        let mut lines = lines.into_iter().peekable();
        if lines.peek().is_some() {
            self.insertions.entry(before).or_default().extend(lines);
        }
    }

    /// Check if the plan changes nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.insertions.is_empty()
    }

    /// Number of fresh lines to insert
    #[must_use]
    pub fn inserted_lines(&self) -> usize {
        self.insertions.values().map(Vec::len).sum()
    }

    /// Splice the plan into a document
    ///
    /// When the edit reaches the end of the document, the new last line is
    /// newline-terminated: either it is fresh, or it was followed by a line
    /// in the input. A document emptied by deletions keeps a single newline.
    #[must_use]
    pub fn apply(mut self, document: Document) -> Document {
        if self.is_empty() {
            return document;
        }

        let len = document.len();
        let touches_end = self.insertions.contains_key(&len)
            || len.checked_sub(1).is_some_and(|last| self.deletions.contains(&last));
        let trailing_newline = document.has_trailing_newline() || touches_end;

        let mut lines = Vec::with_capacity(len + self.inserted_lines());
        for (index, line) in document.into_lines().into_iter().enumerate() {
            if let Some(fresh) = self.insertions.remove(&index) {
                tracing::trace!(before = index, count = fresh.len(), "inserting lines");
                lines.extend(fresh);
            }
            if self.deletions.contains(&index) {
                tracing::trace!(index, "deleting line");
            } else {
                lines.push(line);
            }
        }
        if let Some(fresh) = self.insertions.remove(&len) {
            tracing::trace!(count = fresh.len(), "appending lines");
            lines.extend(fresh);
        }

        let trailing_newline = trailing_newline || lines.is_empty();
        Document::from_lines(lines, trailing_newline)
    }
}

struct Planner<'a> {
    document: &'a Document,
    index: &'a OccurrenceIndex,
    intent: &'a Intent,
    plan: EditPlan,
}

impl<'a> Planner<'a> {
    fn run(mut self) -> (EditPlan, ChangeReason) {
        let (intent, index) = (self.intent, self.index);
        let scope = index.find_scope(intent.scope());
        let reason = match (intent.attribute(), intent.state()) {
            (None, State::Present) => self.stanza_present(scope),
            (None, State::Absent) => self.stanza_absent(scope),
            (Some(attribute), State::Present) => match scope {
                None => self.create_stanza_with(attribute),
                Some(span) if intent.exclusive() => self.replace_values(span, attribute),
                Some(span) => self.merge_values(span, attribute),
            },
            // A missing stanza is never created just to hold nothing
            (Some(attribute), State::Absent) => match scope {
                None => ChangeReason::Ok,
                Some(span) if intent.exclusive() => self.remove_all(span, attribute),
                Some(span) => self.remove_values(span, attribute),
            },
        };
        (self.plan, reason)
    }

    fn stanza_present(&mut self, scope: Option<&ScopeSpan>) -> ChangeReason {
        if scope.is_some() {
            return ChangeReason::Ok;
        }
        self.append_stanza(Vec::new());
        ChangeReason::OnlyStanzaAdded
    }

    fn stanza_absent(&mut self, scope: Option<&ScopeSpan>) -> ChangeReason {
        let Some(span) = scope else {
            return ChangeReason::Ok;
        };
        match span.id {
            // The implicit scope has no header; only its attributes go
            ScopeId::TopLevel => {
                let attributes = self.index.attributes_in(ScopeId::TopLevel);
                if attributes.is_empty() {
                    return ChangeReason::Ok;
                }
                attributes.into_iter().for_each(|i| self.plan.delete(i));
            }
            // Every stanza carrying the name goes
            ScopeId::Stanza(_) => {
                let Scope::Stanza(name) = self.intent.scope() else {
                    return ChangeReason::Ok;
                };
                for duplicate in self.index.stanzas_named(name) {
                    self.plan.delete_range(duplicate.range.clone());
                }
            }
        }
        ChangeReason::StanzaRemoved
    }

    fn create_stanza_with(&mut self, attribute: &str) -> ChangeReason {
        let body = self
            .intent
            .desired()
            .into_iter()
            .map(|value| Line::attribute(attribute, value))
            .collect();
        self.append_stanza(body);
        ChangeReason::StanzaAndAttrAdded
    }

    /// Separator, header and body at the end of the document
    fn append_stanza(&mut self, body: Vec<Line>) {
        let Scope::Stanza(name) = self.intent.scope() else {
            return;
        };
        let ends_blank = self.document.lines().last().is_some_and(Line::is_blank);

        let mut lines = Vec::with_capacity(body.len() + 2);
        if !ends_blank {
            lines.push(Line::blank());
        }
        lines.push(Line::header(name.as_str()));
        lines.extend(body);
        self.plan.insert(self.document.len(), lines);
    }

    /// Exclusive present: the value set becomes exactly the desired set
    fn replace_values(&mut self, span: &ScopeSpan, attribute: &str) -> ChangeReason {
        let occurrences = self.index.occurrences(span.id, attribute);
        let desired = self.intent.desired();

        let Some(&first) = occurrences.first() else {
            self.plan.insert(
                span.append_position(),
                desired.into_iter().map(|v| Line::attribute(attribute, v)),
            );
            return ChangeReason::AttrAdded;
        };

        let wanted: HashSet<Option<&str>> = desired.iter().map(Option::as_deref).collect();
        if self.current_values(occurrences) == wanted {
            return ChangeReason::Ok;
        }

        let mut retained = HashSet::new();
        let mut last_retained = None;
        for &index in occurrences {
            let value = self.value_at(index);
            if wanted.contains(&value) {
                retained.insert(value);
                last_retained = Some(index);
            } else {
                self.plan.delete(index);
            }
        }

        let missing: Vec<Line> = desired
            .iter()
            .filter(|value| !retained.contains(&value.as_deref()))
            .map(|value| Line::attribute(attribute, value.clone()))
            .collect();
        self.plan
            .insert(last_retained.map_or(first, |index| index + 1), missing);
        ChangeReason::AttrChanged
    }

    /// Non-exclusive present: append missing values, never remove
    fn merge_values(&mut self, span: &ScopeSpan, attribute: &str) -> ChangeReason {
        let current = self.current_values(self.index.occurrences(span.id, attribute));
        let missing: Vec<Line> = self
            .intent
            .desired()
            .into_iter()
            .filter(|value| !current.contains(&value.as_deref()))
            .map(|value| Line::attribute(attribute, value))
            .collect();

        if missing.is_empty() {
            return ChangeReason::Ok;
        }
        self.plan.insert(span.append_position(), missing);
        ChangeReason::AttrAdded
    }

    /// Exclusive absent: every occurrence goes, whatever values were named
    fn remove_all(&mut self, span: &ScopeSpan, attribute: &str) -> ChangeReason {
        let occurrences = self.index.occurrences(span.id, attribute);
        if occurrences.is_empty() {
            return ChangeReason::Ok;
        }
        occurrences.iter().for_each(|&i| self.plan.delete(i));
        ChangeReason::AttrChanged
    }

    /// Non-exclusive absent: only occurrences holding a named value go
    fn remove_values(&mut self, span: &ScopeSpan, attribute: &str) -> ChangeReason {
        let named: HashSet<&str> = self.intent.values().iter().map(String::as_str).collect();
        let mut removed = false;
        for &index in self.index.occurrences(span.id, attribute) {
            if self.value_at(index).is_some_and(|value| named.contains(value)) {
                self.plan.delete(index);
                removed = true;
            }
        }
        if removed {
            ChangeReason::AttrChanged
        } else {
            ChangeReason::Ok
        }
    }

    fn current_values(&self, occurrences: &[usize]) -> HashSet<Option<&'a str>> {
        occurrences.iter().map(|&i| self.value_at(i)).collect()
    }

    /// Value of the attribute at `index`; `None` for bare attributes
    fn value_at(&self, index: usize) -> Option<&'a str> {
        let document: &'a Document = self.document;
        document
            .line(index)
            .and_then(Line::as_attribute)
            .and_then(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drinks() -> crate::intent::IntentBuilder {
        Intent::builder(Scope::Stanza("drinks".into())).attribute("fav")
    }

    #[test]
    fn plan_is_empty_for_ok() {
        let doc = Document::parse("drinks:\n  fav = cola\n");
        let intent = drinks().value("cola").build().unwrap();
        let (plan, reason) = plan(&doc, &intent);
        assert_eq!(reason, ChangeReason::Ok);
        assert!(plan.is_empty());
    }

    #[test]
    fn splice_inserts_before_deleted_line() {
        let doc = Document::parse("a\nb\nc\n");
        let mut plan = EditPlan::default();
        plan.delete(1);
        plan.insert(1, [Line::attribute("x", None)]);
        let edited = plan.apply(doc);
        let names: Vec<_> = edited
            .lines()
            .iter()
            .filter_map(|l| l.as_attribute().map(|(n, _)| n))
            .collect();
        assert_eq!(names, vec!["a", "x", "c"]);
        assert!(edited.has_trailing_newline());
    }

    #[test]
    fn deleting_last_line_restores_newline() {
        let doc = Document::parse("a:\n  x = 1");
        let mut plan = EditPlan::default();
        plan.delete(1);
        let edited = plan.apply(doc);
        assert_eq!(render(&edited, RenderOptions::default()), "a:\n");
    }

    #[test]
    fn deleting_everything_leaves_placeholder_newline() {
        let doc = Document::parse("a:\n  x = 1");
        let mut plan = EditPlan::default();
        plan.delete_range(0..2);
        let edited = plan.apply(doc);
        assert!(edited.is_empty());
        assert_eq!(render(&edited, RenderOptions::default()), "\n");
    }

    #[test]
    fn empty_insertion_is_not_recorded() {
        let mut plan = EditPlan::default();
        plan.insert(0, Vec::new());
        assert!(plan.is_empty());
    }

    #[test]
    fn reconcile_inserts_after_last_retained() {
        let text = "drinks:\n  fav = a\n  size = l\n  fav = b\n  other = 1\n";
        let intent = drinks().values(["b", "c"]).build().unwrap();
        let outcome = apply(text, &intent);
        assert_eq!(outcome.reason(), ChangeReason::AttrChanged);
        assert_eq!(
            outcome.text(),
            "drinks:\n  size = l\n  fav = b\n  fav = c\n  other = 1\n"
        );
    }

    #[test]
    fn reconcile_without_retained_uses_first_position() {
        let text = "drinks:\n  size = l\n  fav = a\n  other = 1\n  fav = b\n";
        let intent = drinks().values(["x", "y"]).build().unwrap();
        let outcome = apply(text, &intent);
        assert_eq!(outcome.reason(), ChangeReason::AttrChanged);
        assert_eq!(
            outcome.text(),
            "drinks:\n  size = l\n  fav = x\n  fav = y\n  other = 1\n"
        );
    }

    #[test]
    fn merge_appends_at_end_of_scope() {
        let text = "drinks:\n  fav = a\n  size = l\n\n# trailing\nfood:\n";
        let intent = drinks().value("b").exclusive(false).build().unwrap();
        let outcome = apply(text, &intent);
        assert_eq!(outcome.reason(), ChangeReason::AttrAdded);
        assert_eq!(
            outcome.text(),
            "drinks:\n  fav = a\n  size = l\n  fav = b\n\n# trailing\nfood:\n"
        );
    }

    #[test]
    fn compact_style_applies_to_fresh_lines_only() {
        let editor = StanzaEditor::new(RenderOptions::with_no_extra_spaces(true));
        let text = "drinks:\n  size = l\n";
        let intent = drinks().value("a").build().unwrap();
        let outcome = editor.apply(text, &intent);
        assert_eq!(outcome.text(), "drinks:\n  size = l\n  fav=a\n");
    }

    #[test]
    fn stanza_removal_takes_every_duplicate() {
        let doc = Document::parse("a:\n  x = 1\nb:\na:\n  y = 2\n");
        let intent = Intent::builder(Scope::Stanza("a".into())).absent().build().unwrap();
        let (plan, reason) = plan(&doc, &intent);
        assert_eq!(reason, ChangeReason::StanzaRemoved);
        assert_eq!(plan.deletions.iter().copied().collect::<Vec<_>>(), vec![0, 1, 3, 4]);
    }

    #[test]
    fn base_hash_covers_input() {
        let text = "drinks:\n";
        let intent = drinks().value("a").build().unwrap();
        let outcome = apply(text, &intent);
        assert_eq!(outcome.base_hash(), &ContentHash::of_text(text));
    }
}
