//! CLI error types

use std::path::PathBuf;

use stanza_core::{ContentHash, IntentError};

/// Return code reported when the destination is missing and may not be created
pub const RC_MISSING_DESTINATION: i32 = 257;

/// Errors raised while applying an edit to a file
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Destination is missing and `create` is off
    #[error("Destination {} does not exist!", .0.display())]
    MissingDestination(PathBuf),

    /// Arguments do not form a valid intent
    #[error(transparent)]
    Intent(#[from] IntentError),

    /// Argument combination clap cannot express
    #[error("invalid arguments: {0}")]
    Arguments(String),

    /// Destination could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Backup copy could not be written
    #[error("failed to back up {}: {source}", path.display())]
    Backup {
        /// File being backed up
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// New content could not be written
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File being replaced
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Destination changed between read and replace
    #[error("{} was modified concurrently (expected {expected}, found {found})", path.display())]
    ConcurrentModification {
        /// File being replaced
        path: PathBuf,
        /// Hash of the text the edit was based on
        expected: ContentHash,
        /// Hash of the text found on disk
        found: ContentHash,
    },
}

impl CliError {
    /// Return code to report alongside the message, if any
    #[must_use]
    pub fn rc(&self) -> Option<i32> {
        match self {
            Self::MissingDestination(_) => Some(RC_MISSING_DESTINATION),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_destination_message() {
        let err = CliError::MissingDestination(PathBuf::from("/etc/security/user"));
        assert_eq!(err.to_string(), "Destination /etc/security/user does not exist!");
        assert_eq!(err.rc(), Some(257));
    }

    #[test]
    fn intent_errors_pass_through() {
        let err = CliError::from(IntentError::MissingValue);
        assert_eq!(err.to_string(), IntentError::MissingValue.to_string());
        assert_eq!(err.rc(), None);
    }
}
