//! Stanza CLI
//!
//! Host layer around `stanza-core`: reads the destination file, applies one
//! intent, optionally backs the file up, and atomically replaces it when the
//! content changed. Produces the JSON [`Report`] printed by `stanza-file`.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod args;
pub mod error;
pub mod io;
pub mod report;

pub use args::{command, EditArgs};
pub use error::{CliError, RC_MISSING_DESTINATION};
pub use report::{Diff, Failure, Report};

use stanza_core::StanzaEditor;

/// Apply one edit request to its file
///
/// In check mode the outcome is computed and reported but nothing is
/// written. Otherwise a changed outcome is backed up (when asked) and then
/// persisted with [`io::write_atomic`]. A requested `mode` that differs from
/// the file's permission bits also counts as a change.
///
/// # Errors
/// Any [`CliError`] raised while reading, backing up or writing.
pub fn run(args: &EditArgs) -> Result<Report, CliError> {
    let before = io::read_destination(&args.path, args.create)?;
    let outcome = StanzaEditor::new(args.render).apply(&before, &args.intent);

    let mut report = Report::new(&args.path, &outcome);
    if args.diff {
        report.diff = Some(Diff::new(&args.path, &before, outcome.text()));
    }

    if !outcome.changed() {
        // Content already converged; only the permission bits may be off
        if let Some(mode) = args.mode {
            if args.path.exists() && io::mode_differs(&args.path, mode)? {
                report.changed = true;
                if !args.check {
                    io::set_mode(&args.path, mode)?;
                }
            }
        }
        return Ok(report);
    }
    if args.check {
        tracing::info!(path = %args.path.display(), reason = %outcome.reason(), "check mode, not writing");
        return Ok(report);
    }

    if args.backup && args.path.exists() {
        let backup = io::backup(&args.path)?;
        report.backup_file = Some(backup.display().to_string());
    }
    io::write_atomic(&args.path, outcome.text(), outcome.base_hash(), args.mode)?;
    Ok(report)
}
