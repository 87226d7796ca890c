//! Report filtering for batch decoding.
//!
//! Allows configuring which decoded reports to print, and which of their
//! fields, based on the reporting station and the labels present.

use serde::Deserialize;

use crate::field::{DecodedField, FieldLabel};

/// Station patterns as written in the config: one string or an array.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for PatternList {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(pattern) => Self(vec![pattern]),
            OneOrMany::Many(patterns) => Self(patterns),
        }
    }
}

/// Station identifier patterns, matched with OR logic.
///
/// Accepts `station = "K*"` as well as `station = ["K*", "EG*"]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct PatternList(Vec<String>);

impl PatternList {
    pub fn new(patterns: Vec<String>) -> Self {
        Self(patterns)
    }

    pub fn patterns(&self) -> &[String] {
        &self.0
    }

    /// True if any pattern matches the station identifier.
    pub fn matches_any(&self, station: &str) -> bool {
        self.0.iter().any(|p| station_matches(p, station))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A filter for matching decoded reports.
///
/// All specified criteria must match (AND logic).
/// Use multiple filters for OR logic.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportFilter {
    /// Optional name for this filter (shown in debug logs).
    pub name: Option<String>,

    /// Station identifier patterns (supports `*` wildcard for prefix/suffix).
    /// Accepts a single string or array of strings (OR logic within array).
    pub station: Option<PatternList>,

    /// Labels that must all be present in the report (e.g. "Weather").
    pub require: Option<Vec<String>>,

    /// Labels to print for matching reports. All fields are printed when unset.
    pub labels: Option<Vec<String>>,
}

impl ReportFilter {
    /// Check if a decoded report matches this filter.
    ///
    /// All specified criteria must match (AND logic).
    pub fn matches(&self, fields: &[DecodedField]) -> bool {
        // Check station patterns (OR logic within array)
        if let Some(ref patterns) = self.station
            && !patterns.is_empty()
        {
            let station = fields
                .iter()
                .find(|f| f.label == FieldLabel::Station)
                .map(|f| f.raw.as_str());
            match station {
                Some(station) if patterns.matches_any(station) => {}
                _ => return false,
            }
        }

        // Check required labels
        if let Some(ref required) = self.require {
            for label in parse_labels(required) {
                if !fields.iter().any(|f| f.label == label) {
                    return false;
                }
            }
        }

        true
    }

    /// Keep only the fields this filter wants printed.
    pub fn select<'a>(&self, fields: &'a [DecodedField]) -> Vec<&'a DecodedField> {
        match self.labels {
            Some(ref labels) => {
                let wanted = parse_labels(labels);
                fields
                    .iter()
                    .filter(|f| wanted.contains(&f.label))
                    .collect()
            }
            None => fields.iter().collect(),
        }
    }

    /// Validate the filter configuration.
    ///
    /// Returns an error if any patterns or label names are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref patterns) = self.station {
            for pattern in patterns.patterns() {
                validate_station_pattern(pattern)?;
            }
        }
        for labels in [&self.require, &self.labels].into_iter().flatten() {
            for label in labels {
                label.parse::<FieldLabel>()?;
            }
        }
        Ok(())
    }
}

/// Find the first filter in the list that matches the report.
///
/// An empty list matches every report with an unrestricted filter.
pub fn first_match<'a>(
    filters: &'a [ReportFilter],
    fields: &[DecodedField],
) -> Option<&'a ReportFilter> {
    static PASS_ALL: ReportFilter = ReportFilter {
        name: None,
        station: None,
        require: None,
        labels: None,
    };

    if filters.is_empty() {
        return Some(&PASS_ALL);
    }
    filters.iter().find(|f| f.matches(fields))
}

/// Check if any filter in the list matches the report.
///
/// Returns `true` if at least one filter matches (OR logic), or if the
/// list is empty.
pub fn any_filter_matches(filters: &[ReportFilter], fields: &[DecodedField]) -> bool {
    first_match(filters, fields).is_some()
}

/// Parse label names, skipping unknown ones (rejected by `validate`).
fn parse_labels(names: &[String]) -> Vec<FieldLabel> {
    names.iter().filter_map(|n| n.parse().ok()).collect()
}

/// Case-insensitive station match. A single `*` at either end of the
/// pattern stands for any run of characters.
fn station_matches(pattern: &str, station: &str) -> bool {
    let (needle, at_end) = match (pattern.strip_prefix('*'), pattern.strip_suffix('*')) {
        (Some(tail), _) => (tail, true),
        (None, Some(head)) => (head, false),
        (None, None) => return pattern.eq_ignore_ascii_case(station),
    };
    let Some(split) = station.len().checked_sub(needle.len()) else {
        return false;
    };
    let window = if at_end {
        station.get(split..)
    } else {
        station.get(..needle.len())
    };
    window.is_some_and(|w| w.eq_ignore_ascii_case(needle))
}

/// Reject patterns with more than one `*` or a `*` away from the ends.
fn validate_station_pattern(pattern: &str) -> Result<(), String> {
    match pattern.matches('*').count() {
        0 => Ok(()),
        1 if pattern.starts_with('*') || pattern.ends_with('*') => Ok(()),
        1 => Err(format!(
            "Station pattern '{}' must put its wildcard first (*LL) or last (K*)",
            pattern
        )),
        _ => Err(format!(
            "Station pattern '{}' may contain at most one wildcard",
            pattern
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_metar;

    const JFK: &str = "METAR KJFK 121856Z 31009KT 10SM FEW250 M04/M17 A3049";
    const HEATHROW: &str = "METAR EGLL 011250Z 24015KT 9999 -RA BKN012 12/10 Q1008";

    #[test]
    fn test_station_matches_prefix() {
        assert!(station_matches("K*", "KJFK"));
        assert!(station_matches("k*", "KBOS"));
        assert!(!station_matches("K*", "EGLL"));
        assert!(!station_matches("KJFKX*", "KJFK"));
    }

    #[test]
    fn test_station_matches_suffix() {
        assert!(station_matches("*LL", "EGLL"));
        assert!(!station_matches("*LL", "KJFK"));
    }

    #[test]
    fn test_station_matches_exact() {
        assert!(station_matches("KJFK", "KJFK"));
        assert!(station_matches("kjfk", "KJFK"));
        assert!(!station_matches("KJFK", "KJFX"));
    }

    #[test]
    fn test_validate_station_pattern() {
        assert!(validate_station_pattern("K*").is_ok());
        assert!(validate_station_pattern("*LL").is_ok());
        assert!(validate_station_pattern("KJFK").is_ok());
        assert!(validate_station_pattern("*J*").is_err());
        assert!(validate_station_pattern("K*K").is_err());
    }

    #[test]
    fn test_filter_station() {
        let toml = r#"
            station = "K*"
        "#;
        let filter: ReportFilter = toml::from_str(toml).unwrap();

        assert!(filter.matches(&decode_metar(JFK)));
        assert!(!filter.matches(&decode_metar(HEATHROW)));
    }

    #[test]
    fn test_filter_station_array() {
        let toml = r#"
            station = ["EG*", "LF*"]
        "#;
        let filter: ReportFilter = toml::from_str(toml).unwrap();

        assert!(filter.matches(&decode_metar(HEATHROW)));
        assert!(!filter.matches(&decode_metar(JFK)));
    }

    #[test]
    fn test_filter_station_missing() {
        let filter = ReportFilter {
            station: Some(PatternList::new(vec!["K*".to_string()])),
            ..Default::default()
        };
        // No station group at all
        assert!(!filter.matches(&decode_metar("31009KT 10SM")));
    }

    #[test]
    fn test_filter_require() {
        let filter = ReportFilter {
            require: Some(vec!["Weather".to_string()]),
            ..Default::default()
        };

        assert!(filter.matches(&decode_metar(HEATHROW)));
        assert!(!filter.matches(&decode_metar(JFK)));
    }

    #[test]
    fn test_filter_combined_and_logic() {
        let filter = ReportFilter {
            station: Some(PatternList::new(vec!["EG*".to_string()])),
            require: Some(vec!["Altimeter".to_string()]),
            ..Default::default()
        };

        // Station ok, but Heathrow reports QNH rather than inHg
        assert!(!filter.matches(&decode_metar(HEATHROW)));
    }

    #[test]
    fn test_select_labels() {
        let filter = ReportFilter {
            labels: Some(vec!["Temperature".to_string(), "dewpoint".to_string()]),
            ..Default::default()
        };
        let fields = decode_metar(JFK);
        let selected = filter.select(&fields);

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].value, "-4°C (25°F)");
        assert_eq!(selected[1].value, "-17°C (1°F)");
    }

    #[test]
    fn test_select_all_by_default() {
        let fields = decode_metar(JFK);
        assert_eq!(ReportFilter::default().select(&fields).len(), fields.len());
    }

    #[test]
    fn test_validate_rejects_unknown_label() {
        let filter = ReportFilter {
            labels: Some(vec!["Runway Visual Range".to_string()]),
            ..Default::default()
        };
        assert!(filter.validate().is_err());

        let filter = ReportFilter {
            require: Some(vec!["Clouds".to_string()]),
            station: Some(PatternList::new(vec!["K*".to_string()])),
            ..Default::default()
        };
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_any_filter_matches_or_logic() {
        let toml = r#"
            [[filters]]
            station = "KJFK"

            [[filters]]
            require = ["Weather"]
        "#;
        #[derive(Deserialize)]
        struct TestConfig {
            filters: Vec<ReportFilter>,
        }
        let config: TestConfig = toml::from_str(toml).unwrap();
        let filters = config.filters;

        assert!(any_filter_matches(&filters, &decode_metar(JFK)));
        assert!(any_filter_matches(&filters, &decode_metar(HEATHROW)));
        assert!(!any_filter_matches(
            &filters,
            &decode_metar("METAR KBOS 121854Z 28011KT 10SM CLR")
        ));
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let filters: Vec<ReportFilter> = vec![];
        assert!(any_filter_matches(&filters, &decode_metar(JFK)));
        assert!(first_match(&filters, &decode_metar(JFK)).is_some());
    }

    #[test]
    fn test_pattern_list_from_string() {
        let json = r#""K*""#;
        let list: PatternList = serde_json::from_str(json).unwrap();
        assert_eq!(list.patterns(), &["K*"]);
    }

    #[test]
    fn test_pattern_list_from_array() {
        let json = r#"["K*", "EG*", "LF*"]"#;
        let list: PatternList = serde_json::from_str(json).unwrap();
        assert_eq!(list.patterns(), &["K*", "EG*", "LF*"]);
    }

    #[test]
    fn test_pattern_list_rejects_other_types() {
        assert!(serde_json::from_str::<PatternList>("42").is_err());
        assert!(serde_json::from_str::<PatternList>(r#"["K*", 7]"#).is_err());
    }
}
