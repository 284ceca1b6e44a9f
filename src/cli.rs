//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`FormatArg`] / [`DateFormatArg`] - value enums mapped onto library types
//! - [`init_logging`] - `tracing` subscriber setup for the binary

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ParserConfig, ParticipantMap};
use crate::error::Result;
use crate::format::OutputFormat;
use crate::parsing::TimestampFormat;

/// Default output file stem when `--output` is not given.
pub const DEFAULT_OUTPUT_STEM: &str = "chat_events";

/// Parse WhatsApp chat exports into typed conversation events.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatpulse")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatpulse \"WhatsApp Chat with Family.txt\"
    chatpulse chat.txt -o events.csv
    chatpulse chat.txt --map \"+44 7700 900123=Alice\" --skip-system
    chatpulse chat.txt --date-format auto --summary-only
    chatpulse huge.txt --streaming -f jsonl")]
pub struct Args {
    /// Path to the exported chat (.txt)
    pub input: PathBuf,

    /// Path to output file [default: chat_events.<format extension>]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format [default: from --output extension, else json]
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Rename a sender label (repeatable)
    #[arg(long = "map", value_name = "RAW=DISPLAY")]
    pub mappings: Vec<String>,

    /// JSON file with {"raw label": "display name"} entries
    #[arg(long, value_name = "FILE")]
    pub mapping: Option<PathBuf>,

    /// Header timestamp convention
    #[arg(long, value_enum, default_value = "dmy12")]
    pub date_format: DateFormatArg,

    /// Drop system notices (membership changes, encryption notices, ...)
    #[arg(long)]
    pub skip_system: bool,

    /// Keep known notices attributed to a group name as regular messages
    #[arg(long)]
    pub no_system_detection: bool,

    /// Read the export line by line instead of loading it into memory
    #[arg(long)]
    pub streaming: bool,

    /// Print the summary without writing events
    #[arg(long)]
    pub summary_only: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Builds the parser configuration from flags and mapping sources.
    ///
    /// `--map` entries override entries from `--mapping`.
    pub fn parser_config(&self) -> Result<ParserConfig> {
        let mut participants = match &self.mapping {
            Some(path) => ParticipantMap::from_json_file(path)?,
            None => ParticipantMap::new(),
        };
        for entry in &self.mappings {
            let (raw, display) = ParticipantMap::parse_entry(entry)?;
            participants.insert(raw, display);
        }

        Ok(ParserConfig::new()
            .with_participants(participants)
            .with_timestamp_format(self.date_format.fixed().unwrap_or_default())
            .with_detect_system_notices(!self.no_system_detection)
            .with_skip_system_notices(self.skip_system))
    }

    /// Resolves the output format: explicit flag, then output extension,
    /// then JSON.
    pub fn output_format(&self) -> Result<OutputFormat> {
        match (self.format, &self.output) {
            (Some(format), _) => Ok(format.into()),
            (None, Some(path)) => OutputFormat::from_path(path),
            (None, None) => Ok(OutputFormat::default()),
        }
    }

    /// Resolves the output path for the given format.
    pub fn output_path(&self, format: OutputFormat) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(format))
    }
}

fn default_output_path(format: OutputFormat) -> PathBuf {
    Path::new(DEFAULT_OUTPUT_STEM).with_extension(format.extension())
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// JSON array of events
    Json,
    /// One JSON event per line
    #[value(alias = "ndjson")]
    Jsonl,
    /// Flat rows, semicolon delimited
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> OutputFormat {
        match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Jsonl => OutputFormat::Jsonl,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

/// Timestamp convention options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DateFormatArg {
    /// [DD/MM/YY, H:MM:SS AM]
    Dmy12,
    /// [M/D/YY, H:MM:SS AM]
    Mdy12,
    /// [DD/MM/YYYY, HH:MM:SS]
    Dmy24,
    /// [DD.MM.YY, HH:MM:SS]
    Dot24,
    /// Pick the convention most header lines parse under
    Auto,
}

impl DateFormatArg {
    /// The explicit format, or `None` for [`Auto`](DateFormatArg::Auto).
    pub fn fixed(self) -> Option<TimestampFormat> {
        match self {
            DateFormatArg::Dmy12 => Some(TimestampFormat::DmyTwelveHour),
            DateFormatArg::Mdy12 => Some(TimestampFormat::MdyTwelveHour),
            DateFormatArg::Dmy24 => Some(TimestampFormat::DmyTwentyFourHour),
            DateFormatArg::Dot24 => Some(TimestampFormat::DotDmyTwentyFourHour),
            DateFormatArg::Auto => None,
        }
    }
}

/// Installs the stderr `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks the level
/// (0 warn, 1 debug, 2+ trace).
pub fn init_logging(verbose: u8) -> std::result::Result<(), tracing_subscriber::util::TryInitError> {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("chatpulse").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let a = args(&["chat.txt"]);
        assert_eq!(a.input, PathBuf::from("chat.txt"));
        assert_eq!(a.date_format, DateFormatArg::Dmy12);
        assert_eq!(a.output_format().unwrap(), OutputFormat::Json);
        assert_eq!(a.output_path(OutputFormat::Json), PathBuf::from("chat_events.json"));
        assert!(!a.streaming);
        assert_eq!(a.verbose, 0);

        let config = a.parser_config().unwrap();
        assert_eq!(config, ParserConfig::default());
    }

    #[test]
    fn test_format_from_output_extension() {
        let a = args(&["chat.txt", "-o", "out.csv"]);
        assert_eq!(a.output_format().unwrap(), OutputFormat::Csv);

        let a = args(&["chat.txt", "-o", "out.csv", "-f", "jsonl"]);
        assert_eq!(a.output_format().unwrap(), OutputFormat::Jsonl);

        let a = args(&["chat.txt", "-o", "out.txt"]);
        assert!(a.output_format().unwrap_err().is_invalid_format());
    }

    #[test]
    fn test_default_path_follows_format() {
        let a = args(&["chat.txt", "-f", "csv"]);
        let format = a.output_format().unwrap();
        assert_eq!(a.output_path(format), PathBuf::from("chat_events.csv"));
    }

    #[test]
    fn test_parser_config_from_flags() {
        let a = args(&[
            "chat.txt",
            "--map",
            "+44 7700 900123=Alice",
            "--map",
            "Bobby=Bob",
            "--date-format",
            "dot24",
            "--skip-system",
            "--no-system-detection",
        ]);
        let config = a.parser_config().unwrap();
        assert_eq!(config.participants.resolve("+44 7700 900123"), "Alice");
        assert_eq!(config.participants.resolve("Bobby"), "Bob");
        assert_eq!(config.timestamp_format, TimestampFormat::DotDmyTwentyFourHour);
        assert!(config.skip_system_notices);
        assert!(!config.detect_system_notices);
    }

    #[test]
    fn test_bad_mapping_entry() {
        let a = args(&["chat.txt", "--map", "no-equals"]);
        assert!(a.parser_config().unwrap_err().is_invalid_mapping());
    }

    #[test]
    fn test_mapping_file_then_overrides() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Al": "Alice", "Bo": "Bob"}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let a = args(&["chat.txt", "--mapping", &path, "--map", "Bo=Robert"]);
        let config = a.parser_config().unwrap();
        assert_eq!(config.participants.resolve("Al"), "Alice");
        assert_eq!(config.participants.resolve("Bo"), "Robert");
    }

    #[test]
    fn test_auto_date_format() {
        let a = args(&["chat.txt", "--date-format", "auto"]);
        assert_eq!(a.date_format.fixed(), None);
        assert_eq!(DateFormatArg::Mdy12.fixed(), Some(TimestampFormat::MdyTwelveHour));
    }

    #[test]
    fn test_verbosity_count() {
        assert_eq!(args(&["chat.txt", "-vv"]).verbose, 2);
    }
}
