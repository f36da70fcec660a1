//! Edit results
//!
//! [`ChangeReason`] is the fixed, externally visible classification of what
//! an edit did. [`EditOutcome`] bundles it with the rendered text.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::hash::ContentHash;

/// Reason code reported for every edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeReason {
    /// Nothing to do
    #[serde(rename = "OK")]
    Ok,
    /// A new stanza was created together with the attribute line(s)
    #[serde(rename = "stanza and attr added")]
    StanzaAndAttrAdded,
    /// A new, empty stanza was created
    #[serde(rename = "only stanza added")]
    OnlyStanzaAdded,
    /// Attribute line(s) appended to an existing stanza
    #[serde(rename = "attr added")]
    AttrAdded,
    /// Existing attribute lines were removed or reconciled
    #[serde(rename = "attr changed")]
    AttrChanged,
    /// A whole stanza was deleted
    #[serde(rename = "stanza removed")]
    StanzaRemoved,
}

impl ChangeReason {
    /// Literal reason code
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::StanzaAndAttrAdded => "stanza and attr added",
            Self::OnlyStanzaAdded => "only stanza added",
            Self::AttrAdded => "attr added",
            Self::AttrChanged => "attr changed",
            Self::StanzaRemoved => "stanza removed",
        }
    }

    /// `false` only for [`ChangeReason::Ok`]
    #[inline]
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Ok)
    }
}

impl Display for ChangeReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of applying one intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    text: String,
    reason: ChangeReason,
    base_hash: ContentHash,
}

impl EditOutcome {
    /// Create outcome
    #[inline]
    #[must_use]
    pub fn new(text: String, reason: ChangeReason, base_hash: ContentHash) -> Self {
        Self {
            text,
            reason,
            base_hash,
        }
    }

    /// Rendered text after the edit
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume outcome, returning the rendered text
    #[inline]
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Whether the text changed
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.reason.is_change()
    }

    /// Classified reason
    #[inline]
    #[must_use]
    pub fn reason(&self) -> ChangeReason {
        self.reason
    }

    /// Hash of the input text the edit was computed from
    #[inline]
    #[must_use]
    pub fn base_hash(&self) -> &ContentHash {
        &self.base_hash
    }
}
