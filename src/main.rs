//! METAR Decoder CLI - Decode METAR/SPECI reports into readable fields.

use anyhow::{Context, Result};
use clap::Parser;
use metar_decoder::{
    config::{Config, OutputFormat},
    decoder::{EXAMPLE_METAR, decode_metar, decode_report},
    field::DecodedField,
    filter::{ReportFilter, first_match},
    stats::DecodeStats,
    tokenizer::is_blank,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Standard input filename
const STDIN_FILE: &str = "-";

/// METAR Decoder - Decode METAR/SPECI aviation weather reports
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Report to decode; words are joined with single spaces
    report: Vec<String>,

    /// Decode one report per line from a file ("-" for stdin)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Decode the built-in example report
    #[arg(long, conflicts_with_all = ["report", "file"])]
    example: bool,

    /// Print decoded fields as JSON
    #[arg(long)]
    json: bool,

    /// Hide the raw group next to each decoded field
    #[arg(long)]
    no_raw: bool,

    /// Print statistics after decoding a batch of reports
    #[arg(short, long)]
    stats: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, env = "METAR_DECODER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// How decoded fields are rendered.
#[derive(Debug, Clone, Copy)]
struct Output {
    format: OutputFormat,
    show_raw: bool,
}

impl Output {
    fn render(&self, fields: &[&DecodedField]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string(fields).context("Failed to serialize decoded fields")
            }
            OutputFormat::Text => Ok(fields
                .iter()
                .map(|f| {
                    if self.show_raw {
                        f.to_string()
                    } else {
                        format!("{}: {}", f.label, f.value)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = match args.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.validate()?;

    let output = Output {
        format: if args.json {
            OutputFormat::Json
        } else {
            config.format
        },
        show_raw: config.show_raw && !args.no_raw,
    };

    if args.example {
        return decode_single(EXAMPLE_METAR, &output);
    }

    if !args.report.is_empty() {
        return decode_single(&args.report.join(" "), &output);
    }

    let reader: Box<dyn BufRead> = match args.file {
        Some(ref path) if path.as_os_str() != STDIN_FILE => {
            info!("Decoding reports from {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("Failed to open report file: {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        _ => {
            info!("Decoding reports from standard input");
            Box::new(io::stdin().lock())
        }
    };

    let stats = DecodeStats::new();
    for line in reader.lines() {
        let line = line.context("Failed to read report")?;
        if let Some(rendered) = process_line(&line, &stats, &config.filters, &output)? {
            println!("{}", rendered);
        }
    }

    if args.stats || config.stats {
        eprintln!("\n{}", stats.summary());
    }

    Ok(ExitCode::SUCCESS)
}

/// Decode one report and print it, or print why nothing was decoded.
fn decode_single(report: &str, output: &Output) -> Result<ExitCode> {
    match decode_report(report) {
        Ok(fields) => {
            let fields: Vec<&DecodedField> = fields.iter().collect();
            println!("{}", output.render(&fields)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Process a single line of a batch, returning the rendered report if it
/// decoded and passed the filters.
fn process_line(
    line: &str,
    stats: &DecodeStats,
    filters: &[ReportFilter],
    output: &Output,
) -> Result<Option<String>> {
    stats.record_bytes(line.len() as u64);

    if is_blank(line) {
        stats.record_blank();
        return Ok(None);
    }

    let fields = decode_metar(line);
    stats.record_report(&fields);
    if fields.is_empty() {
        debug!("Could not decode '{}'", line);
        return Ok(None);
    }

    let Some(filter) = first_match(filters, &fields) else {
        debug!("Filtered report: {}", line.trim());
        return Ok(None);
    };
    if let Some(ref name) = filter.name {
        debug!("Report matched filter '{}'", name);
    }

    let selected = filter.select(&fields);
    let mut rendered = output.render(&selected)?;
    if output.format == OutputFormat::Text {
        rendered.push('\n');
    }
    Ok(Some(rendered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use metar_decoder::filter::PatternList;
    use std::sync::atomic::Ordering;

    const TEXT: Output = Output {
        format: OutputFormat::Text,
        show_raw: true,
    };

    #[test]
    fn test_process_line_valid_report() {
        let stats = DecodeStats::new();

        let rendered = process_line(EXAMPLE_METAR, &stats, &[], &TEXT)
            .unwrap()
            .expect("report should be printed");

        assert!(rendered.starts_with("Report Type [METAR]: Routine report\n"));
        assert!(rendered.contains("Wind [31009KT]: From 310° at 9 knots"));
        assert_eq!(stats.decoded_reports.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_process_line_blank() {
        let stats = DecodeStats::new();

        assert!(process_line("   ", &stats, &[], &TEXT).unwrap().is_none());
        assert_eq!(stats.blank_lines.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_process_line_unparseable() {
        let stats = DecodeStats::new();

        assert!(
            process_line("Welcome to the weather feed", &stats, &[], &TEXT)
                .unwrap()
                .is_none()
        );
        assert_eq!(stats.unparseable_reports.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_process_line_filtered() {
        let stats = DecodeStats::new();
        let filters = vec![ReportFilter {
            station: Some(PatternList::new(vec!["EG*".to_string()])),
            ..Default::default()
        }];

        assert!(
            process_line(EXAMPLE_METAR, &stats, &filters, &TEXT)
                .unwrap()
                .is_none()
        );
        // Filtered reports still count as decoded
        assert_eq!(stats.decoded_reports.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_process_line_json_with_labels() {
        let stats = DecodeStats::new();
        let filters = vec![ReportFilter {
            labels: Some(vec!["Wind".to_string()]),
            ..Default::default()
        }];
        let output = Output {
            format: OutputFormat::Json,
            show_raw: true,
        };

        let rendered = process_line(EXAMPLE_METAR, &stats, &filters, &output)
            .unwrap()
            .unwrap();
        assert_eq!(
            rendered,
            r#"[{"label":"Wind","value":"From 310° at 9 knots","raw":"31009KT"}]"#
        );
    }

    #[test]
    fn test_decode_single_exit_codes() {
        let code = decode_single(EXAMPLE_METAR, &TEXT).unwrap();
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::SUCCESS));

        let code = decode_single("   ", &TEXT).unwrap();
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::FAILURE));

        let code = decode_single("Welcome to the weather feed", &TEXT).unwrap();
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::FAILURE));
    }

    #[test]
    fn test_render_without_raw() {
        let fields = decode_metar("KJFK 00000KT");
        let refs: Vec<_> = fields.iter().collect();
        let output = Output {
            format: OutputFormat::Text,
            show_raw: false,
        };

        assert_eq!(
            output.render(&refs).unwrap(),
            "Station: ICAO: KJFK\nWind: Calm"
        );
    }
}
