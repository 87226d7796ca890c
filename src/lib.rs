//! METAR Decoder - A Rust library and CLI for decoding METAR/SPECI aviation
//! weather reports into human-readable fields.
//!
//! This crate provides:
//! - A nom-based recognizer for each report group (wind, visibility, clouds, ...)
//! - A sequential decoder that applies the groups in report order
//! - Code tables and unit conversions for rendering decoded values
//! - Batch filtering and statistics for the command-line front-end
//!
//! # Example
//!
//! ```rust
//! use metar_decoder::{FieldLabel, decode_report};
//!
//! let report = "METAR KJFK 121856Z 31009KT 10SM FEW250 M04/M17 A3049 RMK AO2 SLP324";
//! let fields = decode_report(report).expect("Failed to decode report");
//!
//! for field in &fields {
//!     println!("{}", field);
//! }
//! assert_eq!(fields[8].label, FieldLabel::Altimeter);
//! assert_eq!(fields[8].value, "30.49 inHg (1032 hPa)");
//! ```

pub mod codes;
pub mod config;
pub mod decoder;
pub mod field;
pub mod filter;
pub mod parser;
pub mod stats;
pub mod tokenizer;
pub mod units;

pub use config::{Config, OutputFormat};
pub use decoder::{DecodeError, EXAMPLE_METAR, decode_metar, decode_report, decode_tokens};
pub use field::{DecodedField, FieldLabel};
pub use filter::{ReportFilter, any_filter_matches, first_match};
pub use stats::{DecodeStats, StatsSummary};
pub use tokenizer::tokenize;
