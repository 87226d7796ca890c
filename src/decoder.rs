//! Sequential field decoder for METAR/SPECI reports.
//!
//! The decoder walks the token sequence with a single forward cursor and
//! applies a fixed, ordered list of rules. Each rule either consumes tokens
//! at the cursor and emits fields, or does not apply and leaves the cursor
//! where it is. There is no backtracking: groups that overlap in shape are
//! told apart only by where they appear in the report.
//!
//! Decoding is total. Tokens that no remaining rule accepts are dropped, and
//! an empty result means the report could not be understood.
//!
//! # Example
//!
//! ```
//! use metar_decoder::decoder::{EXAMPLE_METAR, decode_metar};
//! use metar_decoder::field::FieldLabel;
//!
//! let fields = decode_metar(EXAMPLE_METAR);
//! assert_eq!(fields[0].label, FieldLabel::ReportType);
//! assert_eq!(fields[3].value, "From 310° at 9 knots");
//! ```

use thiserror::Error;
use tracing::{debug, trace};

use crate::codes::describe_weather;
use crate::field::{DecodedField, FieldLabel};
use crate::parser::{self, Altimeter, CloudGroup, Modifier, ReportType, Visibility, Wind};
use crate::tokenizer::{is_blank, tokenize};
use crate::units::{
    celsius_to_fahrenheit, format_thousands, hpa_to_inhg, inhg_to_hpa, parse_signed_celsius,
};

/// A complete report used for demonstrations.
pub const EXAMPLE_METAR: &str =
    "METAR KJFK 121856Z 31009KT 10SM FEW250 M04/M17 A3049 RMK AO2 SLP324";

/// Reasons a report produced nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Please enter a METAR string.")]
    EmptyInput,

    #[error("Could not parse the METAR string. Please check the format.")]
    Unparseable,
}

/// Result type for report decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// The decoding rules, in the order they are tried.
///
/// Fractional visibility is not listed: it is a post-step of
/// [`Rule::Visibility`], see [`Decoder::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    ReportType,
    Station,
    ObservationTime,
    Modifier,
    Wind,
    WindVariability,
    Visibility,
    Weather,
    Clouds,
    Temperature,
    Altimeter,
    Remarks,
}

impl Rule {
    const ORDER: [Rule; 12] = [
        Rule::ReportType,
        Rule::Station,
        Rule::ObservationTime,
        Rule::Modifier,
        Rule::Wind,
        Rule::WindVariability,
        Rule::Visibility,
        Rule::Weather,
        Rule::Clouds,
        Rule::Temperature,
        Rule::Altimeter,
        Rule::Remarks,
    ];
}

/// Forward-only position in the token sequence.
#[derive(Debug)]
struct Cursor<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [String]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// The token at the cursor.
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    /// The token after the one at the cursor.
    fn peek_next(&self) -> Option<&'a str> {
        self.tokens.get(self.pos + 1).map(String::as_str)
    }

    /// Tokens from the cursor to the end.
    fn rest(&self) -> &'a [String] {
        self.tokens.get(self.pos..).unwrap_or_default()
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.tokens.len());
    }

    fn finish(&mut self) {
        self.pos = self.tokens.len();
    }
}

/// Decoder state for one report.
#[derive(Debug)]
struct Decoder<'a> {
    cursor: Cursor<'a>,
    fields: Vec<DecodedField>,
}

impl<'a> Decoder<'a> {
    fn new(tokens: &'a [String]) -> Self {
        Self {
            cursor: Cursor::new(tokens),
            fields: Vec::new(),
        }
    }

    fn emit(&mut self, label: FieldLabel, value: impl Into<String>, raw: impl Into<String>) {
        self.fields.push(DecodedField::new(label, value, raw));
    }

    /// Apply every rule once, in order.
    fn run(&mut self) {
        for rule in Rule::ORDER {
            trace!(?rule, token = ?self.cursor.peek(), "trying rule");
            if self.apply(rule) {
                debug!(?rule, "rule matched");
                if rule == Rule::Visibility && self.fractional_visibility() {
                    debug!("merged fractional visibility");
                }
            }
        }

        let leftover = self.cursor.rest();
        if !leftover.is_empty() {
            debug!(
                count = leftover.len(),
                first = %leftover[0],
                "decoding halted with unrecognized tokens"
            );
        }
    }

    /// Try one rule at the cursor. Returns `true` if it consumed tokens.
    fn apply(&mut self, rule: Rule) -> bool {
        match rule {
            Rule::ReportType => self.report_type(),
            Rule::Station => self.station(),
            Rule::ObservationTime => self.observation_time(),
            Rule::Modifier => self.modifier(),
            Rule::Wind => self.wind(),
            Rule::WindVariability => self.wind_variability(),
            Rule::Visibility => self.visibility(),
            Rule::Weather => self.weather(),
            Rule::Clouds => self.clouds(),
            Rule::Temperature => self.temperature(),
            Rule::Altimeter => self.altimeter(),
            Rule::Remarks => self.remarks(),
        }
    }

    fn report_type(&mut self) -> bool {
        let Some(token) = self.cursor.peek() else {
            return false;
        };
        let Some(report_type) = parser::report_type(token) else {
            return false;
        };
        let value = match report_type {
            ReportType::Metar => "Routine report",
            ReportType::Speci => "Special (unscheduled) report",
        };
        self.emit(FieldLabel::ReportType, value, token);
        self.cursor.advance(1);
        true
    }

    fn station(&mut self) -> bool {
        let Some(station) = self.cursor.peek().and_then(parser::station) else {
            return false;
        };
        self.emit(FieldLabel::Station, format!("ICAO: {}", station), station);
        self.cursor.advance(1);
        true
    }

    fn observation_time(&mut self) -> bool {
        let Some(token) = self.cursor.peek() else {
            return false;
        };
        let Some(time) = parser::observation_time(token) else {
            return false;
        };
        self.emit(
            FieldLabel::ObservationTime,
            format!(
                "Day {:02}, {:02}:{:02} UTC",
                time.day, time.hour, time.minute
            ),
            token,
        );
        self.cursor.advance(1);
        true
    }

    fn modifier(&mut self) -> bool {
        let Some(token) = self.cursor.peek() else {
            return false;
        };
        let Some(modifier) = parser::modifier(token) else {
            return false;
        };
        let value = match modifier {
            Modifier::Auto => "Fully automated report",
            Modifier::Cor => "Corrected report",
        };
        self.emit(FieldLabel::Modifier, value, token);
        self.cursor.advance(1);
        true
    }

    fn wind(&mut self) -> bool {
        let Some(token) = self.cursor.peek() else {
            return false;
        };
        let Some(wind) = parser::wind(token) else {
            return false;
        };
        let value = match wind {
            Wind::Calm => "Calm".to_string(),
            Wind::Fixed {
                direction,
                speed,
                gust,
                unit,
            } => {
                let mut value = format!("From {:03}° at {} {}", direction, speed, unit.as_str());
                if let Some(gust) = gust {
                    value.push_str(&format!(", gusting to {} {}", gust, unit.as_str()));
                }
                value
            }
            Wind::Variable { speed, unit } => format!("Variable at {} {}", speed, unit.as_str()),
        };
        self.emit(FieldLabel::Wind, value, token);
        self.cursor.advance(1);
        true
    }

    fn wind_variability(&mut self) -> bool {
        let Some(token) = self.cursor.peek() else {
            return false;
        };
        let Some(range) = parser::wind_variability(token) else {
            return false;
        };
        self.emit(
            FieldLabel::WindVariability,
            format!("Varying between {:03}° and {:03}°", range.from, range.to),
            token,
        );
        self.cursor.advance(1);
        true
    }

    fn visibility(&mut self) -> bool {
        let Some(token) = self.cursor.peek() else {
            return false;
        };

        let value = match parser::visibility(token) {
            Some(Visibility::TenKmOrMore) => "10 km or more".to_string(),
            Some(Visibility::Meters(meters)) => format!("{} meters", meters),
            Some(Visibility::Cavok) => {
                "Ceiling and visibility OK (>10 km, no significant weather)".to_string()
            }
            Some(Visibility::MoreThanSixMiles) => "More than 6 statute miles".to_string(),
            Some(Visibility::StatuteMiles(miles)) | Some(Visibility::FractionalMiles(miles)) => {
                format!("{} statute miles", miles)
            }
            Some(Visibility::LessThanMiles(miles)) => {
                format!("Less than {} statute miles", miles)
            }
            None => {
                // A bare whole number only counts when a fraction follows it.
                let Some(whole) = parser::whole_miles(token) else {
                    return false;
                };
                if self
                    .cursor
                    .peek_next()
                    .and_then(parser::fractional_miles)
                    .is_none()
                {
                    return false;
                }
                format!("{} statute miles", whole)
            }
        };

        self.emit(FieldLabel::Visibility, value, token);
        self.cursor.advance(1);
        true
    }

    /// Merge a `<d>/<d>SM` token into the visibility field just emitted,
    /// e.g. `1` + `1/2SM` becomes "1 1/2 statute miles".
    ///
    /// The merged field replaces the previous one.
    fn fractional_visibility(&mut self) -> bool {
        let Some(token) = self.cursor.peek() else {
            return false;
        };
        let Some(fraction) = parser::fractional_miles(token) else {
            return false;
        };
        let Some(previous) = self.fields.last_mut() else {
            return false;
        };
        if previous.label != FieldLabel::Visibility {
            return false;
        }

        let leading = previous.raw.clone();
        *previous = DecodedField::new(
            FieldLabel::Visibility,
            format!("{} {} statute miles", leading, fraction),
            format!("{} {}", leading, token),
        );
        self.cursor.advance(1);
        true
    }

    fn weather(&mut self) -> bool {
        let mut matched = false;
        while let Some(token) = self.cursor.peek() {
            if parser::weather(token).is_none() {
                break;
            }
            self.emit(FieldLabel::Weather, describe_weather(token), token);
            self.cursor.advance(1);
            matched = true;
        }
        matched
    }

    fn clouds(&mut self) -> bool {
        let mut matched = false;
        while let Some(token) = self.cursor.peek() {
            let Some(group) = parser::cloud(token) else {
                break;
            };
            let value = match group {
                CloudGroup::NoCloudsDetected => "No clouds detected".to_string(),
                CloudGroup::NoSignificantClouds => "No significant clouds".to_string(),
                CloudGroup::Clear(cover) => cover.description().to_string(),
                CloudGroup::Layer {
                    cover,
                    height_hundreds_ft,
                    cloud_type,
                } => {
                    let height = u64::from(height_hundreds_ft) * 100;
                    let suffix = cloud_type
                        .map(|t| format!(" ({})", t.description()))
                        .unwrap_or_default();
                    format!(
                        "{} at {} ft{}",
                        cover.description(),
                        format_thousands(height),
                        suffix
                    )
                }
            };
            self.emit(FieldLabel::Clouds, value, token);
            self.cursor.advance(1);
            matched = true;
        }
        matched
    }

    fn temperature(&mut self) -> bool {
        let Some(group) = self.cursor.peek().and_then(parser::temperature) else {
            return false;
        };
        let (Some(temperature), Some(dewpoint)) = (
            parse_signed_celsius(&group.temperature_raw),
            parse_signed_celsius(&group.dewpoint_raw),
        ) else {
            return false;
        };

        self.emit(
            FieldLabel::Temperature,
            format_celsius(temperature),
            group.temperature_raw,
        );
        self.emit(
            FieldLabel::Dewpoint,
            format_celsius(dewpoint),
            group.dewpoint_raw,
        );
        self.cursor.advance(1);
        true
    }

    fn altimeter(&mut self) -> bool {
        let Some(token) = self.cursor.peek() else {
            return false;
        };
        match parser::altimeter(token) {
            Some(Altimeter::InchesHg(hundredths)) => {
                let inhg = f64::from(hundredths) / 100.0;
                self.emit(
                    FieldLabel::Altimeter,
                    format!("{:.2} inHg ({} hPa)", inhg, inhg_to_hpa(inhg)),
                    token,
                );
            }
            Some(Altimeter::Qnh(hpa)) => {
                self.emit(
                    FieldLabel::AltimeterQnh,
                    format!("{} hPa ({:.2} inHg)", hpa, hpa_to_inhg(f64::from(hpa))),
                    token,
                );
            }
            None => return false,
        }
        self.cursor.advance(1);
        true
    }

    /// Everything after `RMK` is kept verbatim. This rule ends decoding.
    fn remarks(&mut self) -> bool {
        let rest = self.cursor.rest();
        let Some((marker, remarks)) = rest.split_first() else {
            return false;
        };
        if !parser::is_remarks_marker(marker) {
            return false;
        }
        if !remarks.is_empty() {
            self.emit(FieldLabel::Remarks, remarks.join(" "), rest.join(" "));
        }
        self.cursor.finish();
        true
    }
}

fn format_celsius(celsius: i32) -> String {
    format!("{}°C ({}°F)", celsius, celsius_to_fahrenheit(celsius))
}

/// Decode an already tokenized report.
pub fn decode_tokens(tokens: &[String]) -> Vec<DecodedField> {
    let mut decoder = Decoder::new(tokens);
    decoder.run();
    decoder.fields
}

/// Decode a raw METAR/SPECI report into labeled fields.
///
/// Never fails: malformed input yields whatever fields were recognized
/// before decoding stopped, possibly none.
///
/// # Example
///
/// ```
/// use metar_decoder::decoder::decode_metar;
///
/// let fields = decode_metar("metar egll 011250z 24015g25kt 9999 q1013");
/// assert_eq!(fields.len(), 6);
/// assert_eq!(fields[5].value, "1013 hPa (29.92 inHg)");
/// ```
pub fn decode_metar(report: &str) -> Vec<DecodedField> {
    let tokens = tokenize(report);
    decode_tokens(&tokens)
}

/// Decode a report, treating blank input and an empty result as errors.
pub fn decode_report(report: &str) -> DecodeResult<Vec<DecodedField>> {
    if is_blank(report) {
        return Err(DecodeError::EmptyInput);
    }
    let fields = decode_metar(report);
    if fields.is_empty() {
        return Err(DecodeError::Unparseable);
    }
    Ok(fields)
}
