//! JSON report printed on stdout

use std::path::Path;

use serde::Serialize;
use stanza_core::{ChangeReason, EditOutcome};

use crate::error::CliError;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Result of one successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Whether the content changed (or would change in check mode)
    pub changed: bool,
    /// Reason code
    pub msg: ChangeReason,
    /// Destination path
    pub path: String,
    /// Backup copy written before replacing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_file: Option<String>,
    /// Content before and after the edit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<Diff>,
}

impl Report {
    /// Report for an edit outcome
    #[must_use]
    pub fn new(path: &Path, outcome: &EditOutcome) -> Self {
        Self {
            changed: outcome.changed(),
            msg: outcome.reason(),
            path: path.display().to_string(),
            backup_file: None,
            diff: None,
        }
    }
}

/// Before/after content of the destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff {
    /// Text read from the destination
    pub before: String,
    /// Text after the edit
    pub after: String,
    /// Label of `before`
    pub before_header: String,
    /// Label of `after`
    pub after_header: String,
}

impl Diff {
    /// Diff between `before` and `after` for `path`
    ///
    /// A byte-order mark on `before` is dropped; the edit never emits one.
    #[must_use]
    pub fn new(path: &Path, before: &str, after: &str) -> Self {
        let header = format!("{} (content)", path.display());
        let before = before.strip_prefix(BYTE_ORDER_MARK).unwrap_or(before);
        Self {
            before: before.to_string(),
            after: after.to_string(),
            before_header: header.clone(),
            after_header: header,
        }
    }
}

/// Failure report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Always `true`
    pub failed: bool,
    /// Error message
    pub msg: String,
    /// Return code, for failures that carry one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc: Option<i32>,
}

impl From<&CliError> for Failure {
    fn from(err: &CliError) -> Self {
        Self {
            failed: true,
            msg: err.to_string(),
            rc: err.rc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use stanza_core::{apply, Intent, Scope};

    #[test]
    fn report_json_shape() {
        let intent = Intent::builder(Scope::Stanza("drinks".into()))
            .attribute("fav")
            .value("cola")
            .build()
            .unwrap();
        let outcome = apply("", &intent);
        let path = Path::new("/tmp/drinks");
        let mut report = Report::new(path, &outcome);
        report.diff = Some(Diff::new(path, "", outcome.text()));

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "changed": true,
                "msg": "stanza and attr added",
                "path": "/tmp/drinks",
                "diff": {
                    "before": "",
                    "after": "\ndrinks:\n  fav = cola\n",
                    "before_header": "/tmp/drinks (content)",
                    "after_header": "/tmp/drinks (content)",
                }
            })
        );
    }

    #[test]
    fn unchanged_report_omits_optional_fields() {
        let intent = Intent::builder(Scope::TopLevel).attribute("a").absent().build().unwrap();
        let report = Report::new(Path::new("f"), &apply("", &intent));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value, json!({"changed": false, "msg": "OK", "path": "f"}));
    }

    #[test]
    fn diff_before_drops_byte_order_mark() {
        let diff = Diff::new(Path::new("f"), "\u{feff}a:\n", "a:\n");
        assert_eq!(diff.before, "a:\n");
        assert_eq!(diff.before, diff.after);
    }

    #[test]
    fn failure_carries_rc() {
        let err = CliError::MissingDestination("/nope".into());
        let value = serde_json::to_value(Failure::from(&err)).unwrap();
        assert_eq!(
            value,
            json!({"failed": true, "msg": "Destination /nope does not exist!", "rc": 257})
        );
    }
}
