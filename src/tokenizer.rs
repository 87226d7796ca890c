//! Report normalization and tokenization.

/// Split a raw report into upper-cased, whitespace-delimited tokens.
///
/// Surrounding whitespace is trimmed and runs of whitespace collapse, so the
/// result never contains empty tokens. Empty input yields no tokens.
pub fn tokenize(report: &str) -> Vec<String> {
    report
        .split_whitespace()
        .map(|token| token.to_uppercase())
        .collect()
}

/// Check if a report contains anything to decode.
#[inline]
pub fn is_blank(report: &str) -> bool {
    report.trim().is_empty()
}
