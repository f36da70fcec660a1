//! Stanza document parsing
//!
//! A [`Document`] is the owned, ordered sequence of line records for one
//! file. It is parsed fresh on every edit and never fails: every physical
//! line classifies as one of the [`LineKind`](crate::LineKind)s.

use crate::line::Line;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parsed stanza file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    lines: Vec<Line>,
    /// Whether the last line is followed by `\n`
    trailing_newline: bool,
}

impl Document {
    /// Parse text into line records
    ///
    /// A leading byte-order mark is dropped. Each `\n`-terminated segment
    /// becomes one line; a final unterminated segment is kept as a line too.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

        let mut lines = Vec::new();
        let mut trailing_newline = false;
        for segment in text.split_inclusive('\n') {
            match segment.strip_suffix('\n') {
                Some(body) => {
                    lines.push(Line::parse(body));
                    trailing_newline = true;
                }
                None => {
                    lines.push(Line::parse(segment));
                    trailing_newline = false;
                }
            }
        }

        tracing::debug!(
            lines = lines.len(),
            trailing_newline,
            "parsed stanza document"
        );

        Self {
            lines,
            trailing_newline,
        }
    }

    /// Build a document from line records
    #[inline]
    #[must_use]
    pub fn from_lines(lines: Vec<Line>, trailing_newline: bool) -> Self {
        Self {
            lines,
            trailing_newline,
        }
    }

    /// All line records in order
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Consume the document, returning its line records
    #[inline]
    #[must_use]
    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    /// Line at index
    #[inline]
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Number of lines
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the document has no lines
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the last line is newline-terminated
    #[inline]
    #[must_use]
    pub fn has_trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    /// Names of all stanzas in document order (duplicates included)
    pub fn stanza_names(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(Line::stanza_name)
    }
}
