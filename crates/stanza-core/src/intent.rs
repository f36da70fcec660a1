//! Edit intents
//!
//! An [`Intent`] is the single declarative request the engine satisfies:
//! "attribute `A` with values `V` must be present/absent in stanza `S`".
//! Intents are only obtainable through [`IntentBuilder`], which enforces the
//! caller-side preconditions so the engine never sees an invalid request.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target scope of an intent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Attributes placed before the first stanza
    TopLevel,
    /// Named stanza
    Stanza(String),
}

impl Scope {
    /// Scope from an optional stanza name
    ///
    /// `None`, an empty name and the literal `null` select the top-level scope.
    #[must_use]
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            None | Some("" | "null") => Self::TopLevel,
            Some(name) => Self::Stanza(name.to_string()),
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopLevel => f.write_str("<top-level>"),
            Self::Stanza(name) => f.write_str(name),
        }
    }
}

/// Desired state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Attribute (or stanza) must exist
    #[default]
    Present,
    /// Attribute (or stanza) must not exist
    Absent,
}

impl State {
    /// Lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for State {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(IntentError::InvalidState(other.to_string())),
        }
    }
}

/// Validated edit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    scope: Scope,
    attribute: Option<String>,
    /// Deduplicated, first-occurrence order
    values: Vec<String>,
    state: State,
    exclusive: bool,
    allow_no_value: bool,
}

impl Intent {
    /// Start building an intent for a scope
    #[inline]
    #[must_use]
    pub fn builder(scope: Scope) -> IntentBuilder {
        IntentBuilder::new(scope)
    }

    /// Target scope
    #[inline]
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Target attribute; `None` addresses the whole stanza
    #[inline]
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Requested values, deduplicated
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Desired state
    #[inline]
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether the intent owns the attribute's whole value set
    #[inline]
    #[must_use]
    pub fn exclusive(&self) -> bool {
        self.exclusive
    }

    /// Whether bare (valueless) attributes may be written
    #[inline]
    #[must_use]
    pub fn allow_no_value(&self) -> bool {
        self.allow_no_value
    }

    /// Value payloads to compare against occurrences
    ///
    /// Present intents with no values and `allow_no_value` ask for a single
    /// bare attribute, expressed as `[None]`.
    #[must_use]
    pub fn desired(&self) -> Vec<Option<String>> {
        if self.values.is_empty() && self.allow_no_value && self.state == State::Present {
            return vec![None];
        }
        self.values.iter().cloned().map(Some).collect()
    }
}

/// Builder for [`Intent`]
#[derive(Debug, Clone)]
#[must_use]
pub struct IntentBuilder {
    scope: Scope,
    attribute: Option<String>,
    values: Vec<String>,
    state: State,
    exclusive: bool,
    allow_no_value: bool,
}

impl IntentBuilder {
    /// Create builder with defaults: `present`, exclusive, no bare values
    #[inline]
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            attribute: None,
            values: Vec::new(),
            state: State::Present,
            exclusive: true,
            allow_no_value: false,
        }
    }

    /// Set target attribute
    #[inline]
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attribute = Some(name.into());
        self
    }

    /// Add a single value
    #[inline]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Add several values
    #[inline]
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Set desired state
    #[inline]
    pub fn state(mut self, state: State) -> Self {
        self.state = state;
        self
    }

    /// Shorthand for `state(State::Absent)`
    #[inline]
    pub fn absent(self) -> Self {
        self.state(State::Absent)
    }

    /// Set exclusive mode
    #[inline]
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    /// Allow bare attributes
    #[inline]
    pub fn allow_no_value(mut self, allow: bool) -> Self {
        self.allow_no_value = allow;
        self
    }

    /// Validate and build
    ///
    /// Names and values are trimmed the same way the parser trims them, then
    /// values are deduplicated by exact equality in first-occurrence order.
    ///
    /// # Errors
    /// - [`IntentError::MissingValue`] for a `present` attribute without
    ///   values when bare attributes are not allowed
    /// - [`IntentError::InvalidStanza`], [`IntentError::InvalidAttribute`],
    ///   [`IntentError::InvalidValue`] for text the line model cannot hold
    pub fn build(self) -> Result<Intent, IntentError> {
        let scope = match self.scope {
            Scope::TopLevel => Scope::TopLevel,
            Scope::Stanza(name) => {
                let name = name.trim();
                if name.is_empty() {
                    Scope::TopLevel
                } else {
                    validate_stanza(name)?;
                    Scope::Stanza(name.to_string())
                }
            }
        };

        let attribute = match self.attribute {
            Some(name) => {
                let name = name.trim().to_string();
                validate_attribute(&name)?;
                Some(name)
            }
            None => None,
        };

        let mut values: Vec<String> = Vec::with_capacity(self.values.len());
        for value in self.values {
            let value = value.trim();
            if value.contains(['\n', '\r']) {
                return Err(IntentError::InvalidValue(value.to_string()));
            }
            if !values.iter().any(|existing| existing == value) {
                values.push(value.to_string());
            }
        }

        // Whole-stanza intents carry no values
        let needs_value = attribute.is_some() && self.state == State::Present;
        if needs_value && values.is_empty() && !self.allow_no_value {
            return Err(IntentError::MissingValue);
        }

        Ok(Intent {
            scope,
            attribute,
            values,
            state: self.state,
            exclusive: self.exclusive,
            allow_no_value: self.allow_no_value,
        })
    }
}

fn validate_stanza(name: &str) -> Result<(), IntentError> {
    let invalid = name.starts_with('#')
        || name.contains(|c: char| c.is_whitespace() || c == '=');
    if invalid {
        return Err(IntentError::InvalidStanza(name.to_string()));
    }
    Ok(())
}

fn validate_attribute(name: &str) -> Result<(), IntentError> {
    let invalid = name.is_empty()
        || name.starts_with('#')
        || name.ends_with(':')
        || name.contains(['=', '\n', '\r']);
    if invalid {
        return Err(IntentError::InvalidAttribute(name.to_string()));
    }
    Ok(())
}

/// Errors raised while building an [`Intent`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntentError {
    /// `present` without values and without `allow_no_value`
    #[error("Parameter 'value(s)' must be defined if state=present and allow_no_value=False.")]
    MissingValue,

    /// Stanza name cannot be written as a header line
    #[error("invalid stanza name: '{0}'")]
    InvalidStanza(String),

    /// Attribute name cannot be written as an attribute line
    #[error("invalid attribute name: '{0}'")]
    InvalidAttribute(String),

    /// Value spans several lines
    #[error("invalid value: '{0}'")]
    InvalidValue(String),

    /// Unknown state name
    #[error("invalid state '{0}': expected 'present' or 'absent'")]
    InvalidState(String),
}
