//! Statistics tracking for batch decoding.
//!
//! Tracks how many reports were decoded or rejected, the distribution of
//! fields per report, and breakdowns by field label and station.

use hdrhistogram::Histogram;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::field::{DecodedField, FieldLabel};

/// Thread-safe statistics collector for decoded reports.
#[derive(Debug)]
pub struct DecodeStats {
    /// Total number of reports that produced at least one field
    pub decoded_reports: AtomicU64,

    /// Total number of reports that produced no fields
    pub unparseable_reports: AtomicU64,

    /// Total number of blank input lines skipped
    pub blank_lines: AtomicU64,

    /// Total bytes of raw input processed
    pub bytes_processed: AtomicU64,

    /// Histogram of fields per decoded report
    field_histogram: RwLock<Histogram<u64>>,

    /// Fields per label
    fields_by_label: RwLock<HashMap<FieldLabel, u64>>,

    /// Reports per station
    top_stations: RwLock<HashMap<String, u64>>,

    /// When stats collection started
    start_time: Instant,
}

impl DecodeStats {
    /// Create a new statistics collector.
    pub fn new() -> Self {
        Self {
            decoded_reports: AtomicU64::new(0),
            unparseable_reports: AtomicU64::new(0),
            blank_lines: AtomicU64::new(0),
            bytes_processed: AtomicU64::new(0),
            // 1 to 256 fields per report, 2 significant figures
            field_histogram: RwLock::new(
                Histogram::new_with_bounds(1, 256, 2).expect("valid histogram bounds"),
            ),
            fields_by_label: RwLock::new(HashMap::new()),
            top_stations: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Record the fields of a decoded report.
    ///
    /// An empty field list counts as an unparseable report.
    pub fn record_report(&self, fields: &[DecodedField]) {
        if fields.is_empty() {
            self.record_unparseable();
            return;
        }

        self.decoded_reports.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut hist) = self.field_histogram.write() {
            let _ = hist.record((fields.len() as u64).clamp(1, 256));
        }

        if let Ok(mut map) = self.fields_by_label.write() {
            for field in fields {
                *map.entry(field.label).or_insert(0) += 1;
            }
        }

        if let Some(station) = fields.iter().find(|f| f.label == FieldLabel::Station)
            && let Ok(mut map) = self.top_stations.write()
        {
            *map.entry(station.raw.clone()).or_insert(0) += 1;
        }
    }

    /// Record a report that produced no fields.
    pub fn record_unparseable(&self) {
        self.unparseable_reports.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a blank input line.
    pub fn record_blank(&self) {
        self.blank_lines.fetch_add(1, Ordering::Relaxed);
    }

    /// Record bytes processed.
    pub fn record_bytes(&self, bytes: u64) {
        self.bytes_processed.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Get the elapsed time since stats collection started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get the current decoded reports per second rate.
    pub fn reports_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.decoded_reports.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Generate a summary report.
    pub fn summary(&self) -> StatsSummary {
        let field_percentiles = self
            .field_histogram
            .read()
            .ok()
            .filter(|h| !h.is_empty())
            .map(|h| HistogramPercentiles {
                p50: h.value_at_quantile(0.50),
                p90: h.value_at_quantile(0.90),
                p99: h.value_at_quantile(0.99),
                min: h.min(),
                max: h.max(),
                mean: h.mean(),
            });

        let fields_by_label = self
            .fields_by_label
            .read()
            .map(|m| {
                let mut vec: Vec<_> = m.iter().map(|(k, v)| (k.to_string(), *v)).collect();
                vec.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                vec
            })
            .unwrap_or_default();

        // Get top 10 stations
        let top_stations = self
            .top_stations
            .read()
            .map(|m| {
                let mut vec: Vec<_> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
                vec.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                vec.truncate(10);
                vec
            })
            .unwrap_or_default();

        StatsSummary {
            elapsed_secs: self.elapsed().as_secs_f64(),
            decoded_reports: self.decoded_reports.load(Ordering::Relaxed),
            unparseable_reports: self.unparseable_reports.load(Ordering::Relaxed),
            blank_lines: self.blank_lines.load(Ordering::Relaxed),
            bytes_processed: self.bytes_processed.load(Ordering::Relaxed),
            reports_per_second: self.reports_per_second(),
            field_percentiles,
            fields_by_label,
            top_stations,
        }
    }
}

impl Default for DecodeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Percentile values from a histogram.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramPercentiles {
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
}

/// Summary of collected statistics.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub elapsed_secs: f64,
    pub decoded_reports: u64,
    pub unparseable_reports: u64,
    pub blank_lines: u64,
    pub bytes_processed: u64,
    pub reports_per_second: f64,
    pub field_percentiles: Option<HistogramPercentiles>,
    pub fields_by_label: Vec<(String, u64)>,
    pub top_stations: Vec<(String, u64)>,
}

impl StatsSummary {
    /// Share of non-blank lines that decoded to at least one field.
    pub fn decoded_percent(&self) -> f64 {
        let total = self.decoded_reports + self.unparseable_reports;
        if total == 0 {
            return 0.0;
        }
        self.decoded_reports as f64 / total as f64 * 100.0
    }
}

/// Write `name count, name count, ...` on one line.
fn write_counts(f: &mut std::fmt::Formatter<'_>, counts: &[(String, u64)]) -> std::fmt::Result {
    for (i, (name, count)) in counts.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{} {}", name, count)?;
    }
    writeln!(f)
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "METAR decode summary ({:.3}s)", self.elapsed_secs)?;
        writeln!(
            f,
            "  reports:     {} decoded, {} unparseable ({:.1}% decoded)",
            self.decoded_reports,
            self.unparseable_reports,
            self.decoded_percent()
        )?;
        writeln!(f, "  blank lines: {}", self.blank_lines)?;
        writeln!(
            f,
            "  input:       {} KB at {:.1} reports/s",
            self.bytes_processed / 1024,
            self.reports_per_second
        )?;

        if let Some(ref p) = self.field_percentiles {
            writeln!(
                f,
                "  fields:      min {} p50 {} p90 {} p99 {} max {} (mean {:.1})",
                p.min, p.p50, p.p90, p.p99, p.max, p.mean
            )?;
        }
        if !self.fields_by_label.is_empty() {
            f.write_str("  by label:    ")?;
            write_counts(f, &self.fields_by_label)?;
        }
        if !self.top_stations.is_empty() {
            f.write_str("  stations:    ")?;
            write_counts(f, &self.top_stations)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{EXAMPLE_METAR, decode_metar};

    #[test]
    fn test_record_report() {
        let stats = DecodeStats::new();
        stats.record_report(&decode_metar(EXAMPLE_METAR));

        assert_eq!(stats.decoded_reports.load(Ordering::Relaxed), 1);
        assert_eq!(stats.unparseable_reports.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_empty_report_is_unparseable() {
        let stats = DecodeStats::new();
        stats.record_report(&decode_metar("XYZ123FOO"));

        assert_eq!(stats.decoded_reports.load(Ordering::Relaxed), 0);
        assert_eq!(stats.unparseable_reports.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_reports_per_second() {
        let stats = DecodeStats::new();
        for _ in 0..100 {
            stats.record_report(&decode_metar(EXAMPLE_METAR));
        }
        std::thread::sleep(Duration::from_millis(1));

        assert!(stats.reports_per_second() > 0.0);
    }

    #[test]
    fn test_summary_generation() {
        let stats = DecodeStats::new();

        for _ in 0..10 {
            stats.record_report(&decode_metar(EXAMPLE_METAR));
        }
        stats.record_report(&decode_metar("METAR EGLL 011250Z 24015KT 9999 -RA BR"));
        stats.record_unparseable();
        stats.record_blank();
        stats.record_bytes(2048);

        let summary = stats.summary();

        assert_eq!(summary.decoded_reports, 11);
        assert_eq!(summary.unparseable_reports, 1);
        assert_eq!(summary.blank_lines, 1);
        assert_eq!(summary.bytes_processed, 2048);
        assert_eq!(summary.top_stations[0], ("KJFK".to_string(), 10));
        assert_eq!(summary.top_stations[1], ("EGLL".to_string(), 1));
        assert!(
            summary
                .fields_by_label
                .contains(&("Weather".to_string(), 2))
        );

        let p = summary.field_percentiles.unwrap();
        assert_eq!(p.min, 7);
        assert_eq!(p.max, 10);
    }

    #[test]
    fn test_summary_display() {
        let stats = DecodeStats::new();
        stats.record_report(&decode_metar(EXAMPLE_METAR));
        let text = stats.summary().to_string();

        assert!(text.starts_with("METAR decode summary ("));
        assert!(text.contains("reports:     1 decoded, 0 unparseable (100.0% decoded)"));
        assert!(text.contains("stations:    KJFK 1\n"));
        assert!(text.contains("Altimeter 1"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = DecodeStats::new().summary();
        assert_eq!(summary.decoded_percent(), 0.0);
        assert!(summary.field_percentiles.is_none());
        assert!(summary.top_stations.is_empty());
    }
}
