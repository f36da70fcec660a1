//! Testing utilities for the stanza-file workspace
//!
//! Shared fixtures, intent shorthands, and assertions.

#![allow(missing_docs)]

use pretty_assertions::assert_eq;
use stanza_core::{apply, ChangeReason, EditOutcome, Intent, IntentBuilder, Scope};

/// AIX-style stanza file with comments, odd spacing and a repeated attribute
pub const SECURITY_USER: &str = "\
# /etc/security/user (sample)
# comment kept verbatim
default_shell = /bin/ksh

default:
\tadmin = false
  login   =  true
  rlogin = true
  tpath = nosak

root:
  admin = true
  SYSTEM = compat
  groups = system
  groups = staff
  skip_checks

daemon:
  login = false
";

/// Builder for an intent against a named stanza
pub fn stanza(name: &str) -> IntentBuilder {
    Intent::builder(Scope::Stanza(name.to_string()))
}

/// Builder for an intent against an attribute of a named stanza
pub fn attr(stanza_name: &str, attribute: &str) -> IntentBuilder {
    stanza(stanza_name).attribute(attribute)
}

/// Builder for an intent against a top-level attribute
pub fn top_level(attribute: &str) -> IntentBuilder {
    Intent::builder(Scope::TopLevel).attribute(attribute)
}

/// Build an intent that is known to be valid
pub fn intent(builder: IntentBuilder) -> Intent {
    builder.build().expect("test intent should be valid")
}

/// Apply an intent and check the reason and resulting text
pub fn assert_edit(text: &str, intent: &Intent, reason: ChangeReason, expected: &str) -> EditOutcome {
    let outcome = apply(text, intent);
    assert_eq!(outcome.reason(), reason, "unexpected reason for {intent:?}");
    assert_eq!(outcome.text(), expected);
    assert_eq!(outcome.changed(), reason.is_change());
    outcome
}

/// Check that applying an intent to `text` changes nothing
pub fn assert_unchanged(text: &str, intent: &Intent) {
    let outcome = apply(text, intent);
    assert_eq!(outcome.reason(), ChangeReason::Ok, "expected no-op for {intent:?}");
    assert!(!outcome.changed());
    assert_eq!(outcome.text(), text);
}

/// Apply an intent, then check that a second application is a no-op
pub fn assert_converges(text: &str, intent: &Intent) -> String {
    let first = apply(text, intent);
    assert_unchanged(first.text(), intent);
    first.into_text()
}

/// Values of an attribute in a stanza of `text`, in document order
pub fn values_of(text: &str, scope: &Scope, attribute: &str) -> Vec<Option<String>> {
    let document = stanza_core::Document::parse(text);
    let index = stanza_core::OccurrenceIndex::build(&document);
    let Some(span) = index.find_scope(scope) else {
        return Vec::new();
    };
    index
        .occurrences(span.id, attribute)
        .iter()
        .filter_map(|&i| document.line(i))
        .filter_map(|line| line.as_attribute())
        .map(|(_, value)| value.map(str::to_string))
        .collect()
}
