//! Line model
//!
//! Every physical line of a stanza file classifies as exactly one
//! [`LineKind`]. A [`Line`] pairs the kind with the original text, when the
//! line came from the input, so untouched lines render byte-for-byte.

/// Classification of a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only line
    Blank,

    /// Line whose first non-whitespace character is `#`
    Comment,

    /// `name:` at column 0, opening a new stanza
    StanzaHeader(String),

    /// `name = value` (`value` is `Some`) or a bare `name` (`value` is `None`)
    Attribute {
        /// Attribute name, trimmed
        name: String,
        /// Attribute value, trimmed; `None` for bare attributes
        value: Option<String>,
    },
}

/// A single line record
///
/// `raw` is `Some` for lines read from the input and `None` for lines the
/// engine created. Fresh lines are rendered by [`crate::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    kind: LineKind,
    raw: Option<String>,
}

impl Line {
    /// Classify one physical line (without its `\n` terminator)
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            kind: classify(raw),
            raw: Some(raw.to_string()),
        }
    }

    /// Fresh blank separator line
    #[inline]
    #[must_use]
    pub fn blank() -> Self {
        Self {
            kind: LineKind::Blank,
            raw: None,
        }
    }

    /// Fresh stanza header
    #[inline]
    #[must_use]
    pub fn header(name: impl Into<String>) -> Self {
        Self {
            kind: LineKind::StanzaHeader(name.into()),
            raw: None,
        }
    }

    /// Fresh attribute line
    #[inline]
    #[must_use]
    pub fn attribute(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            kind: LineKind::Attribute {
                name: name.into(),
                value,
            },
            raw: None,
        }
    }

    /// Line classification
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &LineKind {
        &self.kind
    }

    /// Original text, if the line came from the input
    #[inline]
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Whether the engine created this line
    #[inline]
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.raw.is_none()
    }

    /// Whether this is a blank line
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self.kind, LineKind::Blank)
    }

    /// Stanza name, if this is a header
    #[inline]
    #[must_use]
    pub fn stanza_name(&self) -> Option<&str> {
        match &self.kind {
            LineKind::StanzaHeader(name) => Some(name),
            _ => None,
        }
    }

    /// Attribute name and value, if this is an attribute line
    #[inline]
    #[must_use]
    pub fn as_attribute(&self) -> Option<(&str, Option<&str>)> {
        match &self.kind {
            LineKind::Attribute { name, value } => Some((name, value.as_deref())),
            _ => None,
        }
    }
}

fn classify(raw: &str) -> LineKind {
    let text = raw.strip_suffix('\r').unwrap_or(raw);
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with('#') {
        return LineKind::Comment;
    }
    if let Some(name) = header_name(text) {
        return LineKind::StanzaHeader(name.to_string());
    }

    match trimmed.split_once('=') {
        Some((name, value)) => LineKind::Attribute {
            name: name.trim().to_string(),
            value: Some(value.trim().to_string()),
        },
        None => LineKind::Attribute {
            name: trimmed.to_string(),
            value: None,
        },
    }
}

/// `name:` starting at column 0, no whitespace or `=` inside the token
fn header_name(text: &str) -> Option<&str> {
    if text.starts_with(char::is_whitespace) {
        return None;
    }
    let token = text.trim_end();
    let name = token.strip_suffix(':')?;
    if name.is_empty() || name.contains(|c: char| c.is_whitespace() || c == '=') {
        return None;
    }
    Some(name)
}
