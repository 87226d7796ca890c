//! Code tables for METAR groups.
//!
//! Three disjoint tables map short report codes to descriptions: weather
//! phenomena (with their intensity, proximity and descriptor qualifiers),
//! cloud cover, and cloud type. The tables are closed: codes outside them
//! are reported as `None` by the lookups.

use std::fmt;

/// Intensity or proximity qualifier that may prefix a weather group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Light,
    Heavy,
    Vicinity,
}

impl Qualifier {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "-" => Some(Qualifier::Light),
            "+" => Some(Qualifier::Heavy),
            "VC" => Some(Qualifier::Vicinity),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Qualifier::Light => "-",
            Qualifier::Heavy => "+",
            Qualifier::Vicinity => "VC",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Qualifier::Light => "Light",
            Qualifier::Heavy => "Heavy",
            Qualifier::Vicinity => "In the vicinity",
        }
    }
}

/// Descriptor that qualifies the phenomena following it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Descriptor {
    Shallow,
    Partial,
    Patches,
    LowDrifting,
    Blowing,
    Showers,
    Thunderstorm,
    Freezing,
}

impl Descriptor {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "MI" => Some(Descriptor::Shallow),
            "PR" => Some(Descriptor::Partial),
            "BC" => Some(Descriptor::Patches),
            "DR" => Some(Descriptor::LowDrifting),
            "BL" => Some(Descriptor::Blowing),
            "SH" => Some(Descriptor::Showers),
            "TS" => Some(Descriptor::Thunderstorm),
            "FZ" => Some(Descriptor::Freezing),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Descriptor::Shallow => "MI",
            Descriptor::Partial => "PR",
            Descriptor::Patches => "BC",
            Descriptor::LowDrifting => "DR",
            Descriptor::Blowing => "BL",
            Descriptor::Showers => "SH",
            Descriptor::Thunderstorm => "TS",
            Descriptor::Freezing => "FZ",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Descriptor::Shallow => "Shallow",
            Descriptor::Partial => "Partial",
            Descriptor::Patches => "Patches",
            Descriptor::LowDrifting => "Low drifting",
            Descriptor::Blowing => "Blowing",
            Descriptor::Showers => "Showers",
            Descriptor::Thunderstorm => "Thunderstorm",
            Descriptor::Freezing => "Freezing",
        }
    }
}

/// Precipitation, obscuration and other weather phenomena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phenomenon {
    // Precipitation
    Rain,
    Drizzle,
    Snow,
    SnowGrains,
    IceCrystals,
    IcePellets,
    Hail,
    SmallHail,
    UnknownPrecipitation,
    // Obscuration
    Fog,
    Mist,
    Haze,
    Sand,
    Dust,
    Smoke,
    VolcanicAsh,
    Spray,
    // Other
    Squall,
    DustWhirls,
    Duststorm,
    Sandstorm,
    FunnelCloud,
}

impl Phenomenon {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "RA" => Some(Phenomenon::Rain),
            "DZ" => Some(Phenomenon::Drizzle),
            "SN" => Some(Phenomenon::Snow),
            "SG" => Some(Phenomenon::SnowGrains),
            "IC" => Some(Phenomenon::IceCrystals),
            "PL" => Some(Phenomenon::IcePellets),
            "GR" => Some(Phenomenon::Hail),
            "GS" => Some(Phenomenon::SmallHail),
            "UP" => Some(Phenomenon::UnknownPrecipitation),
            "FG" => Some(Phenomenon::Fog),
            "BR" => Some(Phenomenon::Mist),
            "HZ" => Some(Phenomenon::Haze),
            "SA" => Some(Phenomenon::Sand),
            "DU" => Some(Phenomenon::Dust),
            "FU" => Some(Phenomenon::Smoke),
            "VA" => Some(Phenomenon::VolcanicAsh),
            "PY" => Some(Phenomenon::Spray),
            "SQ" => Some(Phenomenon::Squall),
            "PO" => Some(Phenomenon::DustWhirls),
            "DS" => Some(Phenomenon::Duststorm),
            "SS" => Some(Phenomenon::Sandstorm),
            "FC" => Some(Phenomenon::FunnelCloud),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Phenomenon::Rain => "Rain",
            Phenomenon::Drizzle => "Drizzle",
            Phenomenon::Snow => "Snow",
            Phenomenon::SnowGrains => "Snow grains",
            Phenomenon::IceCrystals => "Ice crystals",
            Phenomenon::IcePellets => "Ice pellets",
            Phenomenon::Hail => "Hail",
            Phenomenon::SmallHail => "Small hail",
            Phenomenon::UnknownPrecipitation => "Unknown precipitation",
            Phenomenon::Fog => "Fog",
            Phenomenon::Mist => "Mist",
            Phenomenon::Haze => "Haze",
            Phenomenon::Sand => "Sand",
            Phenomenon::Dust => "Dust",
            Phenomenon::Smoke => "Smoke",
            Phenomenon::VolcanicAsh => "Volcanic ash",
            Phenomenon::Spray => "Spray",
            Phenomenon::Squall => "Squall",
            Phenomenon::DustWhirls => "Dust/sand whirls",
            Phenomenon::Duststorm => "Duststorm",
            Phenomenon::Sandstorm => "Sandstorm",
            Phenomenon::FunnelCloud => "Funnel cloud/tornado",
        }
    }
}

/// Describe a two-letter weather code, either a descriptor or a phenomenon.
pub fn weather_pair_description(code: &str) -> Option<&'static str> {
    Descriptor::from_code(code)
        .map(|d| d.description())
        .or_else(|| Phenomenon::from_code(code).map(|p| p.description()))
}

/// Describe a complete weather group such as `+TSRA` or `VCFG`.
///
/// The leading intensity sign and `VC` are described first, then each
/// remaining two-letter group from left to right. Unknown pairs are left
/// out. If nothing in the token is recognized, the token itself is
/// returned.
pub fn describe_weather(token: &str) -> String {
    let mut parts: Vec<&'static str> = Vec::new();
    let mut rest = token;

    if let Some(sign) = rest.get(..1)
        && let Some(q @ (Qualifier::Light | Qualifier::Heavy)) = Qualifier::from_code(sign)
    {
        parts.push(q.description());
        rest = &rest[1..];
    }

    if let Some(stripped) = rest.strip_prefix(Qualifier::Vicinity.code()) {
        parts.push(Qualifier::Vicinity.description());
        rest = stripped;
    }

    while !rest.is_empty() {
        let split = rest
            .char_indices()
            .nth(2)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (pair, tail) = rest.split_at(split);
        if let Some(description) = weather_pair_description(pair) {
            parts.push(description);
        }
        rest = tail;
    }

    if parts.is_empty() {
        token.to_string()
    } else {
        parts.join(" ")
    }
}

/// Sky cover amount of a cloud layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudCover {
    SkyClear,
    Clear,
    Few,
    Scattered,
    Broken,
    Overcast,
    VerticalVisibility,
}

impl CloudCover {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SKC" => Some(CloudCover::SkyClear),
            "CLR" => Some(CloudCover::Clear),
            "FEW" => Some(CloudCover::Few),
            "SCT" => Some(CloudCover::Scattered),
            "BKN" => Some(CloudCover::Broken),
            "OVC" => Some(CloudCover::Overcast),
            "VV" => Some(CloudCover::VerticalVisibility),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CloudCover::SkyClear => "SKC",
            CloudCover::Clear => "CLR",
            CloudCover::Few => "FEW",
            CloudCover::Scattered => "SCT",
            CloudCover::Broken => "BKN",
            CloudCover::Overcast => "OVC",
            CloudCover::VerticalVisibility => "VV",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CloudCover::SkyClear => "Sky clear",
            CloudCover::Clear => "Clear",
            CloudCover::Few => "Few (1-2 oktas)",
            CloudCover::Scattered => "Scattered (3-4 oktas)",
            CloudCover::Broken => "Broken (5-7 oktas)",
            CloudCover::Overcast => "Overcast (8 oktas)",
            CloudCover::VerticalVisibility => "Vertical visibility",
        }
    }
}

impl fmt::Display for CloudCover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Convective cloud type appended to a cloud layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudType {
    Cumulonimbus,
    ToweringCumulus,
}

impl CloudType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "CB" => Some(CloudType::Cumulonimbus),
            "TCU" => Some(CloudType::ToweringCumulus),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CloudType::Cumulonimbus => "Cumulonimbus",
            CloudType::ToweringCumulus => "Towering cumulus",
        }
    }
}

impl fmt::Display for CloudType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_simple_weather() {
        assert_eq!(describe_weather("RA"), "Rain");
        assert_eq!(describe_weather("BR"), "Mist");
        assert_eq!(describe_weather("FC"), "Funnel cloud/tornado");
    }

    #[test]
    fn test_describe_intensity_and_descriptor() {
        assert_eq!(describe_weather("-RA"), "Light Rain");
        assert_eq!(describe_weather("+TSRA"), "Heavy Thunderstorm Rain");
        assert_eq!(describe_weather("FZDZ"), "Freezing Drizzle");
    }

    #[test]
    fn test_describe_vicinity() {
        assert_eq!(describe_weather("VCFG"), "In the vicinity Fog");
        assert_eq!(describe_weather("VCSHRA"), "In the vicinity Showers Rain");
    }

    #[test]
    fn test_describe_multiple_phenomena() {
        assert_eq!(describe_weather("-SHRASN"), "Light Showers Rain Snow");
        assert_eq!(describe_weather("RABR"), "Rain Mist");
    }

    #[test]
    fn test_describe_skips_unknown_pairs() {
        assert_eq!(describe_weather("RAXX"), "Rain");
        assert_eq!(describe_weather("XXYY"), "XXYY");
    }

    #[test]
    fn test_describe_odd_length_does_not_panic() {
        assert_eq!(describe_weather("RAX"), "Rain");
        assert_eq!(describe_weather("+"), "Heavy");
    }

    #[test]
    fn test_cloud_cover_lookup() {
        assert_eq!(CloudCover::from_code("FEW"), Some(CloudCover::Few));
        assert_eq!(CloudCover::from_code("VV"), Some(CloudCover::VerticalVisibility));
        assert_eq!(CloudCover::from_code("NCD"), None);
        assert_eq!(CloudCover::Broken.description(), "Broken (5-7 oktas)");
        assert_eq!(CloudCover::Overcast.code(), "OVC");
    }

    #[test]
    fn test_cloud_type_lookup() {
        assert_eq!(CloudType::from_code("CB"), Some(CloudType::Cumulonimbus));
        assert_eq!(CloudType::from_code("TCU"), Some(CloudType::ToweringCumulus));
        assert_eq!(CloudType::from_code("CU"), None);
    }

    #[test]
    fn test_tables_are_disjoint() {
        for code in ["MI", "PR", "BC", "DR", "BL", "SH", "TS", "FZ"] {
            assert!(Descriptor::from_code(code).is_some());
            assert!(Phenomenon::from_code(code).is_none());
            assert!(CloudCover::from_code(code).is_none());
        }
    }
}
