//! Stanza Core
//!
//! Format-preserving editor for stanza-structured configuration text:
//! optional named stanzas (`name:` headers), `name = value` or bare `name`
//! attribute lines, `#` comments, blank lines, and attributes that repeat
//! with different values.
//!
//! # Pipeline
//!
//! ```text
//! text → Document::parse → OccurrenceIndex::build → plan (EditPlan + ChangeReason)
//!      → EditPlan::apply → render → EditOutcome
//! ```
//!
//! Untouched lines round-trip byte-for-byte; only lines the engine creates
//! are normalized.
//!
//! # Example
//!
//! ```
//! use stanza_core::{apply, ChangeReason, Intent, Scope};
//!
//! let intent = Intent::builder(Scope::Stanza("drinks".into()))
//!     .attribute("fav")
//!     .values(["lemonade", "cocktail"])
//!     .build()
//!     .unwrap();
//!
//! let outcome = apply("", &intent);
//! assert_eq!(outcome.reason(), ChangeReason::StanzaAndAttrAdded);
//! assert_eq!(
//!     outcome.text(),
//!     "\ndrinks:\n  fav = lemonade\n  fav = cocktail\n"
//! );
//!
//! // Applying the same intent again is a no-op
//! assert!(!apply(outcome.text(), &intent).changed());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod document;
mod engine;
mod hash;
mod index;
mod intent;
mod line;
mod outcome;
mod render;

pub use document::Document;
pub use engine::{apply, plan, EditPlan, StanzaEditor};
pub use hash::ContentHash;
pub use index::{OccurrenceIndex, OccurrenceKey, ScopeId, ScopeSpan};
pub use intent::{Intent, IntentBuilder, IntentError, Scope, State};
pub use line::{Line, LineKind};
pub use outcome::{ChangeReason, EditOutcome};
pub use render::{render, AssignmentStyle, RenderOptions, STANZA_INDENT};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn drinks_fav() -> IntentBuilder {
        Intent::builder(Scope::Stanza("drinks".into())).attribute("fav")
    }

    #[test]
    fn full_edit_lifecycle() {
        let intent = drinks_fav().value("lemonade").build().unwrap();
        let created = apply("# managed\n", &intent);
        assert_eq!(created.reason(), ChangeReason::StanzaAndAttrAdded);
        assert_eq!(created.text(), "# managed\n\ndrinks:\n  fav = lemonade\n");

        let removal = drinks_fav().absent().build().unwrap();
        let removed = apply(created.text(), &removal);
        assert_eq!(removed.reason(), ChangeReason::AttrChanged);
        assert_eq!(removed.text(), "# managed\n\ndrinks:\n");

        let drop_stanza = Intent::builder(Scope::Stanza("drinks".into()))
            .absent()
            .build()
            .unwrap();
        let dropped = apply(removed.text(), &drop_stanza);
        assert_eq!(dropped.reason(), ChangeReason::StanzaRemoved);
        assert_eq!(dropped.text(), "# managed\n\n");
    }

    #[test]
    fn index_and_document_agree() {
        let doc = Document::parse("a = 1\nx:\n  a = 2\n");
        let index = OccurrenceIndex::build(&doc);
        assert_eq!(index.occurrences(ScopeId::TopLevel, "a"), &[0]);
        assert_eq!(index.occurrences(ScopeId::Stanza(1), "a"), &[2]);
        assert_eq!(render(&doc, RenderOptions::default()), "a = 1\nx:\n  a = 2\n");
    }
}
