//! Command line parsing
//!
//! Single-letter toggles may be bundled (`-nru`), `-k` takes its column either
//! attached (`-k2`) or as the next token, `--` ends option parsing and a lone
//! `-` names standard input. Nothing here touches the filesystem.

use crate::config::{SortConfig, SortConfigBuilder, SortMode};
use crate::error::{SortError, SortResult};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::ffi::{OsStr, OsString};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Parsed command line: the run configuration plus its input names in order
#[derive(Debug, Clone, Default)]
pub struct SortArgs {
    pub config: SortConfig,
    /// Source names as given, in any encoding; empty means stdin, `-` means
    /// stdin at that position
    pub files: Vec<OsString>,
}

/// What the command line asks for
#[derive(Debug)]
pub enum Invocation {
    /// Sort or check with these arguments
    Run(SortArgs),
    /// Print this text (help or version) and exit successfully
    Info(String),
}

pub fn build_cli() -> Command {
    Command::new("sort")
        .version(env!("CARGO_PKG_VERSION"))
        .override_usage("sort [-nhMrubc] [-k N] [-o FILE] [--] [FILE]...")
        .about("Sort lines of text files")
        .long_about("Sort lines of text files, optionally keyed on one tab-delimited column.\n\nWith no FILE, or when FILE is -, read standard input.")
        .disable_help_flag(true) // -h is human-numeric-sort
        .disable_version_flag(true)
        .args_override_self(true)
        .arg(
            Arg::new("files")
                .help("Input files to sort (use '-' or omit for stdin)")
                .value_parser(value_parser!(OsString))
                .num_args(0..)
                .action(ArgAction::Append)
                .value_name("FILE"),
        )
        .arg(
            Arg::new("key")
                .short('k')
                .long("key")
                .help("Sort via tab-delimited column N (1-based)")
                .value_name("N")
                .value_parser(value_parser!(OsString))
                .allow_hyphen_values(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("numeric-sort")
                .short('n')
                .long("numeric-sort")
                .help("Compare according to numerical value")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("human-numeric-sort")
                .short('h')
                .long("human-numeric-sort")
                .help("Compare human readable numbers (e.g., 2K 1G, base 1024)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("month-sort")
                .short('M')
                .long("month-sort")
                .help("Compare by month names (Jan < ... < Dec)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .help("Sort according to WORD: lexicographic, numeric, human-numeric, month")
                .value_name("WORD")
                .value_parser(value_parser!(OsString)),
        )
        .arg(
            Arg::new("reverse")
                .short('r')
                .long("reverse")
                .help("Reverse the result of comparisons")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("unique")
                .short('u')
                .long("unique")
                .help("Output only the first of an adjacent run of equal lines")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ignore-trailing-blanks")
                .short('b')
                .long("ignore-trailing-blanks")
                .help("Ignore trailing blanks when comparing and with -u")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .short('c')
                .long("check")
                .help("Check for sorted input; do not sort")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Write result to FILE instead of standard output")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Report settings, input sizes and key fallbacks on stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("help")
                .long("help")
                .help("Display this help and exit")
                .action(ArgAction::Help),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Output version information and exit")
                .action(ArgAction::Version),
        )
}

/// One-line usage summary for diagnostics
pub fn usage() -> String {
    build_cli().render_usage().to_string()
}

/// Parse a full argument list, program name first
pub fn parse_args<I, T>(args: I) -> SortResult<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let argv: Vec<OsString> = args.into_iter().map(Into::into).collect();
    match build_cli().try_get_matches_from(&argv) {
        Ok(matches) => parse_config_from_matches(&matches).map(Invocation::Run),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Ok(Invocation::Info(err.to_string()))
        }
        Err(err) => Err(convert_clap_error(&err, &argv)),
    }
}

/// Parse configuration from command line matches
fn parse_config_from_matches(matches: &ArgMatches) -> SortResult<SortArgs> {
    let mut builder = SortConfigBuilder::new();

    if matches.get_flag("numeric-sort") {
        builder = builder.mode(SortMode::Numeric);
    }
    if matches.get_flag("human-numeric-sort") {
        builder = builder.mode(SortMode::HumanNumeric);
    }
    if matches.get_flag("month-sort") {
        builder = builder.mode(SortMode::Month);
    }
    if let Some(word) = matches.get_one::<OsString>("sort") {
        let mode = word
            .to_str()
            .ok_or_else(|| SortError::invalid_argument("--sort", &word.to_string_lossy()))?
            .parse()?;
        builder = builder.mode(mode);
    }

    // Repeated -k: the last one wins
    if let Some(column) = matches
        .get_many::<OsString>("key")
        .and_then(|values| values.last())
    {
        builder = builder.key_column(parse_key_column(column)?);
    }

    if matches.get_flag("reverse") {
        builder = builder.reverse();
    }
    if matches.get_flag("unique") {
        builder = builder.unique();
    }
    if matches.get_flag("ignore-trailing-blanks") {
        builder = builder.ignore_trailing_blanks();
    }
    if matches.get_flag("check") {
        builder = builder.check();
    }
    if matches.get_flag("debug") {
        builder = builder.debug();
    }
    if let Some(output) = matches.get_one::<PathBuf>("output") {
        builder = builder.output_file(output.clone());
    }

    let files = matches
        .get_many::<OsString>("files")
        .unwrap_or_default()
        .cloned()
        .collect();

    Ok(SortArgs {
        config: builder.build()?,
        files,
    })
}

/// A key column must be a positive integer
fn parse_key_column(value: &OsStr) -> SortResult<NonZeroUsize> {
    value
        .to_str()
        .and_then(|text| text.parse::<usize>().ok())
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| SortError::invalid_argument("-k", &value.to_string_lossy()))
}

/// Map clap's rejections onto our error kinds
fn convert_clap_error(err: &clap::Error, argv: &[OsString]) -> SortError {
    let context = |kind| match err.get(kind) {
        Some(ContextValue::String(text)) => Some(text.clone()),
        _ => None,
    };
    let offending = context(ContextKind::InvalidArg).unwrap_or_default();

    match err.kind() {
        ErrorKind::InvalidValue | ErrorKind::ValueValidation | ErrorKind::NoEquals => {
            let value = context(ContextKind::InvalidValue).unwrap_or_default();
            SortError::invalid_argument(&short_label(&offending), &value)
        }
        // clap names no argument here; report the first one that is not UTF-8
        ErrorKind::InvalidUtf8 if offending.is_empty() => argv
            .iter()
            .skip(1)
            .find(|arg| arg.to_str().is_none())
            .map(|arg| SortError::invalid_option(&arg.to_string_lossy()))
            .unwrap_or_else(|| SortError::invalid_option(&offending)),
        _ => SortError::invalid_option(&offending),
    }
}

/// Render `--key <N>` as `-k`; options without a short form keep their long name
fn short_label(rendered: &str) -> String {
    let long = rendered.split_whitespace().next().unwrap_or(rendered);
    build_cli()
        .get_arguments()
        .find(|arg| arg.get_long().map(|name| format!("--{name}")).as_deref() == Some(long))
        .and_then(Arg::get_short)
        .map(|short| format!("-{short}"))
        .unwrap_or_else(|| long.to_string())
}
