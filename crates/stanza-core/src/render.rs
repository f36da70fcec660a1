//! Serializer
//!
//! Renders a [`Document`] back to text. Lines read from the input are emitted
//! verbatim; fresh lines are normalized according to [`RenderOptions`].

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::line::{Line, LineKind};

/// Indent of fresh attribute lines under a named stanza
pub const STANZA_INDENT: &str = "  ";

/// How fresh `name = value` lines are spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStyle {
    /// `name = value`
    #[default]
    Spaced,
    /// `name=value`
    Compact,
}

impl AssignmentStyle {
    #[inline]
    const fn separator(self) -> &'static str {
        match self {
            Self::Spaced => " = ",
            Self::Compact => "=",
        }
    }
}

/// Serializer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Spelling of fresh assignments
    pub assignment: AssignmentStyle,
}

impl RenderOptions {
    /// Options with compact assignments when `no_extra_spaces` is set
    #[inline]
    #[must_use]
    pub fn with_no_extra_spaces(no_extra_spaces: bool) -> Self {
        Self {
            assignment: if no_extra_spaces {
                AssignmentStyle::Compact
            } else {
                AssignmentStyle::Spaced
            },
        }
    }
}

/// Render a document to text
///
/// An empty document renders as `"\n"` when flagged newline-terminated (the
/// placeholder left after deleting all content) and as `""` otherwise.
#[must_use]
pub fn render(document: &Document, options: RenderOptions) -> String {
    let mut out = String::new();
    let mut in_stanza = false;

    for (index, line) in document.lines().iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        if line.stanza_name().is_some() {
            in_stanza = true;
        }
        match line.raw() {
            Some(raw) => out.push_str(raw),
            None => render_fresh(&mut out, line, in_stanza, options),
        }
    }

    if document.has_trailing_newline() {
        out.push('\n');
    }
    out
}

fn render_fresh(out: &mut String, line: &Line, in_stanza: bool, options: RenderOptions) {
    match line.kind() {
        LineKind::Blank | LineKind::Comment => {}
        LineKind::StanzaHeader(name) => {
            out.push_str(name);
            out.push(':');
        }
        LineKind::Attribute { name, value } => {
            if in_stanza {
                out.push_str(STANZA_INDENT);
            }
            out.push_str(name);
            if let Some(value) = value {
                out.push_str(options.assignment.separator());
                out.push_str(value);
            }
        }
    }
}
