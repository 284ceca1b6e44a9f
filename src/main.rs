//! # chatpulse CLI
//!
//! Command-line interface for the chatpulse library.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process;
use std::time::{Duration, Instant};

use clap::Parser as ClapParser;

use chatpulse::cli::{Args, init_logging};
use chatpulse::core::ParseSummary;
use chatpulse::core::output::JsonlWriter;
use chatpulse::format::{OutputFormat, write_to_format};
use chatpulse::parsing::TimestampFormat;
use chatpulse::{ChatpulseError, ConversationEvent, ExportParser};

/// Lines sampled by `--date-format auto`.
const DETECT_SAMPLE_LINES: usize = 200;

const READ_BUFFER_SIZE: usize = 64 * 1024;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChatpulseError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("⚠️  Logging disabled: {e}");
    }

    let mut config = args.parser_config()?;
    let format = args.output_format()?;
    let output_path = args.output_path(format);

    // Print header
    println!("💬 chatpulse v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input.display());
    if !args.summary_only {
        println!("💾 Output:  {}", output_path.display());
        println!("📄 Format:  {}", format);
    }
    if args.streaming {
        println!("🌊 Mode:    Streaming");
    }
    if !config.participants.is_empty() {
        println!("👤 Mapping: {} participant(s)", config.participants.len());
    }

    if args.date_format.fixed().is_none() {
        let sample = read_sample(&args.input)?;
        match TimestampFormat::detect(&sample) {
            Some(detected) => config.timestamp_format = detected,
            None => tracing::warn!("no header line matched any timestamp format, using default"),
        }
    }
    println!("📅 Dates:   [{}]", config.timestamp_format);
    println!();

    let parser = ExportParser::with_config(config);

    let (summary, parse_time) = if args.streaming {
        run_streaming(&parser, &args, format, &output_path)?
    } else {
        run_regular(&parser, &args, format, &output_path)?
    };

    println!();
    println!("📊 Summary:");
    for line in summary.to_string().lines() {
        println!("   {line}");
    }

    if !args.summary_only {
        println!();
        println!("✅ Done! Output saved to {}", output_path.display());
    }

    // Performance stats
    let total_time = total_start.elapsed();
    println!();
    println!("⚡ Performance:");
    println!("   Parse time:  {:.2}s", parse_time.as_secs_f64());
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    let events_per_sec = summary.total_events as f64 / total_time.as_secs_f64().max(f64::EPSILON);
    println!("   Throughput:  {:.0} events/sec", events_per_sec);

    Ok(())
}

/// Loads the whole export, parses it, then writes all events at once.
fn run_regular(
    parser: &ExportParser,
    args: &Args,
    format: OutputFormat,
    output_path: &Path,
) -> Result<(ParseSummary, Duration), ChatpulseError> {
    println!("⏳ Parsing...");
    let parse_start = Instant::now();
    let bytes = fs::read(&args.input)?;
    let export = parser.parse_bytes(&bytes)?;
    let parse_time = parse_start.elapsed();
    println!(
        "   Found {} events from {} participants ({:.2}s)",
        export.len(),
        export.participants.len(),
        parse_time.as_secs_f64()
    );

    if !args.summary_only {
        write_events(&export.events, output_path, format)?;
    }

    Ok((export.summary(), parse_time))
}

/// Parses line by line. JSONL is written as events arrive; other formats
/// are collected first.
fn run_streaming(
    parser: &ExportParser,
    args: &Args,
    format: OutputFormat,
    output_path: &Path,
) -> Result<(ParseSummary, Duration), ChatpulseError> {
    println!("⏳ Streaming...");
    let parse_start = Instant::now();

    let file = File::open(&args.input)?;
    let size = file.metadata()?.len();
    let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
    let mut stream = parser.stream_with_size(reader, size);

    let mut summary = ParseSummary::default();

    if !args.summary_only && format == OutputFormat::Jsonl {
        let mut writer = JsonlWriter::new(File::create(output_path)?);
        let written: Result<(), ChatpulseError> = stream.by_ref().try_for_each(|event| {
            let event = event?;
            summary.add(&event);
            writer.write_event(&event)
        });
        if let Err(e) = written.and_then(|()| writer.into_inner().map(drop)) {
            // Never leave a partial export behind
            let _ = fs::remove_file(output_path);
            return Err(e);
        }
    } else {
        let mut events: Vec<ConversationEvent> = Vec::new();
        for event in stream.by_ref() {
            let event = event?;
            summary.add(&event);
            if !args.summary_only {
                events.push(event);
            }
        }
        if !args.summary_only {
            write_events(&events, output_path, format)?;
        }
    }

    let parse_time = parse_start.elapsed();
    println!(
        "   Found {} events from {} participants ({:.2}s)",
        summary.total_events,
        stream.participants().len(),
        parse_time.as_secs_f64()
    );

    Ok((summary, parse_time))
}

fn write_events(
    events: &[ConversationEvent],
    output_path: &Path,
    format: OutputFormat,
) -> Result<(), ChatpulseError> {
    println!("💾 Writing {}...", format);
    let write_start = Instant::now();
    write_to_format(events, output_path, format)?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());
    Ok(())
}

/// Reads the first lines of the export for format detection.
fn read_sample(path: &Path) -> Result<Vec<String>, ChatpulseError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::with_capacity(DETECT_SAMPLE_LINES);
    let mut buf = Vec::new();

    while lines.len() < DETECT_SAMPLE_LINES {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        // Undecodable lines are reported by the parser itself
        lines.push(String::from_utf8_lossy(&buf).trim_end().to_string());
    }
    Ok(lines)
}
