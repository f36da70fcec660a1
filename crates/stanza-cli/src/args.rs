//! Command-line arguments
//!
//! The clap command definition and its translation into an [`EditArgs`]
//! request: destination path, intent, file-handling flags and render options.

use std::path::PathBuf;
use std::str::FromStr;

use clap::builder::BoolishValueParser;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use stanza_core::{Intent, RenderOptions, Scope, State};

use crate::error::CliError;

/// Build the `stanza-file` command
#[must_use]
pub fn command() -> Command {
    Command::new("stanza-file")
        .version(stanza_core::VERSION)
        .about("Ensure an attribute or stanza is present or absent in a stanza file")
        .arg(
            Arg::new("path")
                .long("path")
                .visible_alias("dest")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Stanza file to edit"),
        )
        .arg(
            Arg::new("stanza")
                .long("stanza")
                .help("Stanza name; omit, empty or 'null' for top-level attributes"),
        )
        .arg(
            Arg::new("attr")
                .long("attr")
                .help("Attribute name; omit to act on the whole stanza"),
        )
        .arg(
            Arg::new("value")
                .long("value")
                .conflicts_with("values")
                .help("Single attribute value"),
        )
        .arg(
            Arg::new("values")
                .long("values")
                .num_args(1..)
                .action(ArgAction::Append)
                .help("Attribute values (repeatable attribute)"),
        )
        .arg(
            Arg::new("state")
                .long("state")
                .default_value("present")
                .value_parser(["present", "absent"])
                .help("Whether the attribute or stanza must exist"),
        )
        .arg(
            Arg::new("exclusive")
                .long("exclusive")
                .default_value("true")
                .value_parser(BoolishValueParser::new())
                .help("Treat the given values as the complete set"),
        )
        .arg(
            Arg::new("allow-no-value")
                .long("allow-no-value")
                .action(ArgAction::SetTrue)
                .help("Allow attributes without a value"),
        )
        .arg(
            Arg::new("no-extra-spaces")
                .long("no-extra-spaces")
                .action(ArgAction::SetTrue)
                .help("Write new attributes as 'name=value'"),
        )
        .arg(
            Arg::new("create")
                .long("create")
                .default_value("true")
                .value_parser(BoolishValueParser::new())
                .help("Create the file if it does not exist"),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .value_parser(parse_mode)
                .help("Permission bits of the written file, in octal (e.g. 0600)"),
        )
        .arg(
            Arg::new("backup")
                .long("backup")
                .action(ArgAction::SetTrue)
                .help("Keep a timestamped copy of the file before changing it"),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .action(ArgAction::SetTrue)
                .help("Report what would change without writing"),
        )
        .arg(
            Arg::new("diff")
                .long("diff")
                .action(ArgAction::SetTrue)
                .help("Include before/after content in the report"),
        )
}

/// Parse octal permission bits such as `0600`, `600` or `0o600`
fn parse_mode(text: &str) -> Result<u32, String> {
    let digits = text.strip_prefix("0o").unwrap_or(text);
    let mode = u32::from_str_radix(digits, 8).map_err(|err| format!("invalid octal mode '{text}': {err}"))?;
    if mode > 0o7777 {
        return Err(format!("mode '{text}' exceeds 07777"));
    }
    Ok(mode)
}

/// One edit request against one file
#[derive(Debug, Clone)]
pub struct EditArgs {
    /// Destination file
    pub path: PathBuf,
    /// Validated edit intent
    pub intent: Intent,
    /// Start from empty text when the file is missing
    pub create: bool,
    /// Permission bits to enforce on the file
    pub mode: Option<u32>,
    /// Keep a backup copy before replacing
    pub backup: bool,
    /// Never write
    pub check: bool,
    /// Include before/after content in the report
    pub diff: bool,
    /// Formatting of fresh lines
    pub render: RenderOptions,
}

impl EditArgs {
    /// Translate parsed arguments into an edit request
    ///
    /// # Errors
    /// Returns [`CliError::Intent`] when the arguments do not form a valid
    /// intent, and [`CliError::Arguments`] when a required argument is absent.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, CliError> {
        let path = matches
            .get_one::<PathBuf>("path")
            .cloned()
            .ok_or_else(|| CliError::Arguments("--path is required".into()))?;

        let state = match matches.get_one::<String>("state") {
            Some(state) => State::from_str(state)?,
            None => State::default(),
        };
        let flag = |name: &str, default: bool| matches.get_one::<bool>(name).copied().unwrap_or(default);

        let values: Vec<&String> = match matches.get_one::<String>("value") {
            Some(value) => vec![value],
            None => matches
                .get_many::<String>("values")
                .map(Iterator::collect)
                .unwrap_or_default(),
        };

        let scope = Scope::from_name(matches.get_one::<String>("stanza").map(String::as_str));
        let mut builder = Intent::builder(scope)
            .values(values)
            .state(state)
            .exclusive(flag("exclusive", true))
            .allow_no_value(matches.get_flag("allow-no-value"));
        if let Some(attribute) = matches.get_one::<String>("attr") {
            builder = builder.attribute(attribute);
        }

        Ok(Self {
            path,
            intent: builder.build()?,
            create: flag("create", true),
            mode: matches.get_one::<u32>("mode").copied(),
            backup: matches.get_flag("backup"),
            check: matches.get_flag("check"),
            diff: matches.get_flag("diff"),
            render: RenderOptions::with_no_extra_spaces(matches.get_flag("no-extra-spaces")),
        })
    }
}
