//! Data structures representing decoded report fields.
//!
//! Every decoding rule emits zero or more [`DecodedField`] values. A field
//! carries a label from a closed set, the human-readable value, and the raw
//! token text it was derived from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The category of a decoded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldLabel {
    #[serde(rename = "Report Type")]
    ReportType,
    #[serde(rename = "Station")]
    Station,
    #[serde(rename = "Observation Time")]
    ObservationTime,
    #[serde(rename = "Modifier")]
    Modifier,
    #[serde(rename = "Wind")]
    Wind,
    #[serde(rename = "Wind Variability")]
    WindVariability,
    #[serde(rename = "Visibility")]
    Visibility,
    #[serde(rename = "Weather")]
    Weather,
    #[serde(rename = "Clouds")]
    Clouds,
    #[serde(rename = "Temperature")]
    Temperature,
    #[serde(rename = "Dewpoint")]
    Dewpoint,
    #[serde(rename = "Altimeter")]
    Altimeter,
    #[serde(rename = "Altimeter (QNH)")]
    AltimeterQnh,
    #[serde(rename = "Remarks")]
    Remarks,
}

impl FieldLabel {
    /// Every label, in the order the decoder can emit them.
    pub const ALL: [FieldLabel; 14] = [
        FieldLabel::ReportType,
        FieldLabel::Station,
        FieldLabel::ObservationTime,
        FieldLabel::Modifier,
        FieldLabel::Wind,
        FieldLabel::WindVariability,
        FieldLabel::Visibility,
        FieldLabel::Weather,
        FieldLabel::Clouds,
        FieldLabel::Temperature,
        FieldLabel::Dewpoint,
        FieldLabel::Altimeter,
        FieldLabel::AltimeterQnh,
        FieldLabel::Remarks,
    ];

    /// The display name of this label.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldLabel::ReportType => "Report Type",
            FieldLabel::Station => "Station",
            FieldLabel::ObservationTime => "Observation Time",
            FieldLabel::Modifier => "Modifier",
            FieldLabel::Wind => "Wind",
            FieldLabel::WindVariability => "Wind Variability",
            FieldLabel::Visibility => "Visibility",
            FieldLabel::Weather => "Weather",
            FieldLabel::Clouds => "Clouds",
            FieldLabel::Temperature => "Temperature",
            FieldLabel::Dewpoint => "Dewpoint",
            FieldLabel::Altimeter => "Altimeter",
            FieldLabel::AltimeterQnh => "Altimeter (QNH)",
            FieldLabel::Remarks => "Remarks",
        }
    }
}

impl fmt::Display for FieldLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldLabel {
    type Err = String;

    /// Parse a label by its display name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FieldLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown field label: {}", s))
    }
}

/// One decoded unit of a report.
///
/// # Example
///
/// The wind group `31009KT` decodes to:
/// - `label`: FieldLabel::Wind
/// - `value`: "From 310° at 9 knots"
/// - `raw`: "31009KT"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedField {
    /// The category of this field.
    pub label: FieldLabel,

    /// Human-readable decoded text.
    pub value: String,

    /// The input token(s) this field was derived from. Multi-token groups
    /// are joined by single spaces.
    pub raw: String,
}

impl DecodedField {
    pub fn new(label: FieldLabel, value: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            raw: raw.into(),
        }
    }
}

impl fmt::Display for DecodedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.label, self.raw, self.value)
    }
}
