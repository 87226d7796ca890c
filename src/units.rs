//! Unit conversions used when rendering decoded groups.
//!
//! All rounding to whole numbers uses `f64::round` (half away from zero).

/// Hectopascals per inch of mercury.
///
/// This is the rounded factor used in aviation practice; with it the
/// standard setting A2992 maps to 1013 hPa and Q1013 back to 29.92 inHg.
/// It replaces the exact factor 33.8639, which gives A3049 -> 1033 hPa.
pub const HPA_PER_INHG: f64 = 33.86;

/// Decode a report temperature such as `M04` or `17` into whole °C.
///
/// A leading `M` marks a negative value. Returns `None` when the digits do
/// not form a number.
pub fn parse_signed_celsius(raw: &str) -> Option<i32> {
    match raw.strip_prefix('M') {
        Some(digits) => digits.parse::<i32>().ok().map(|v| -v),
        None => raw.parse::<i32>().ok(),
    }
}

/// Convert °C to °F, rounded to the nearest integer.
pub fn celsius_to_fahrenheit(celsius: i32) -> i64 {
    (f64::from(celsius) * 1.8 + 32.0).round() as i64
}

/// Convert inches of mercury to hectopascals, rounded to the nearest integer.
pub fn inhg_to_hpa(inhg: f64) -> i64 {
    (inhg * HPA_PER_INHG).round() as i64
}

/// Convert hectopascals to inches of mercury.
pub fn hpa_to_inhg(hpa: f64) -> f64 {
    hpa / HPA_PER_INHG
}

/// Format an integer with `,` thousands separators (e.g. `25000` → `25,000`).
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signed_celsius() {
        assert_eq!(parse_signed_celsius("04"), Some(4));
        assert_eq!(parse_signed_celsius("M04"), Some(-4));
        assert_eq!(parse_signed_celsius("M17"), Some(-17));
        assert_eq!(parse_signed_celsius("M00"), Some(0));
        assert_eq!(parse_signed_celsius("XX"), None);
    }

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert_eq!(celsius_to_fahrenheit(-4), 25);
        assert_eq!(celsius_to_fahrenheit(-17), 1);
        assert_eq!(celsius_to_fahrenheit(0), 32);
        assert_eq!(celsius_to_fahrenheit(100), 212);
        assert_eq!(celsius_to_fahrenheit(-40), -40);
    }

    #[test]
    fn test_inhg_to_hpa() {
        assert_eq!(inhg_to_hpa(30.00), 1016);
        assert_eq!(inhg_to_hpa(30.49), 1032);
        assert_eq!(inhg_to_hpa(29.92), 1013);
    }

    #[test]
    fn test_hpa_to_inhg() {
        assert_eq!(format!("{:.2}", hpa_to_inhg(1013.0)), "29.92");
        assert_eq!(format!("{:.2}", hpa_to_inhg(1000.0)), "29.53");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(500), "500");
        assert_eq!(format_thousands(2500), "2,500");
        assert_eq!(format_thousands(25000), "25,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }
}
