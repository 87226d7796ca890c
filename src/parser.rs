//! Shape parsers for individual METAR/SPECI groups.
//!
//! Each public function here looks at exactly one token and either
//! recognizes it as a particular group, returning a typed value, or returns
//! `None`. A token only matches when the whole token is consumed. Ordering
//! between groups and the decision of which parser to try at which position
//! belong to the [`decoder`](crate::decoder).
//!
//! The parsers are built with `nom` combinators. Numeric fields are always
//! recognized as runs of ASCII digits before conversion, so a shape match
//! cannot carry a non-numeric value into the decoder.
//!
//! # Report Format
//!
//! ```text
//! METAR KJFK 121856Z 31009KT 10SM FEW250 M04/M17 A3049 RMK AO2 SLP324
//! ^type ^stn ^time   ^wind   ^vis ^cloud ^tt/dd  ^alt  ^remarks
//! ```

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take, take_while_m_n, take_while1},
    character::complete::char,
    combinator::{all_consuming, map, map_opt, map_res, opt, recognize, value},
    error::Error,
    multi::many1,
    sequence::{preceded, terminated},
};

use crate::codes::{CloudCover, CloudType, Descriptor, Phenomenon, Qualifier};

/// Report type group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    /// Routine `METAR`
    Metar,
    /// Unscheduled `SPECI`
    Speci,
}

/// Report modifier group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// `AUTO`: fully automated observation
    Auto,
    /// `COR`: corrected report
    Cor,
}

/// Day of month and UTC time of the observation (`DDHHMMZ`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationTime {
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Unit of a wind group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindUnit {
    Knots,
    MetersPerSecond,
}

impl WindUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindUnit::Knots => "knots",
            WindUnit::MetersPerSecond => "m/s",
        }
    }
}

/// Surface wind group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wind {
    /// `00000KT`
    Calm,
    /// `DDDSS[GGG]KT` with a fixed direction
    Fixed {
        direction: u32,
        speed: u32,
        gust: Option<u32>,
        unit: WindUnit,
    },
    /// `VRBSSKT`
    Variable { speed: u32, unit: WindUnit },
}

/// Variable wind direction range (`DDDVDDD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindVariability {
    pub from: u32,
    pub to: u32,
}

/// Prevailing visibility group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// `9999`
    TenKmOrMore,
    /// Any other four-digit group, in meters
    Meters(u32),
    /// `CAVOK`
    Cavok,
    /// `P6SM`
    MoreThanSixMiles,
    /// `<digits>SM`, digits kept as reported
    StatuteMiles(String),
    /// `<d>/<d>SM`
    FractionalMiles(String),
    /// `M<d>/<d>SM`
    LessThanMiles(String),
}

/// Present weather group such as `-SHRA` or `VCFG`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherGroup {
    pub qualifier: Option<Qualifier>,
    pub descriptor: Option<Descriptor>,
    pub phenomena: Vec<Phenomenon>,
}

/// Sky condition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudGroup {
    /// `NCD`
    NoCloudsDetected,
    /// `NSC`
    NoSignificantClouds,
    /// Bare `SKC` or `CLR`
    Clear(CloudCover),
    /// `<cover><hhh>[CB|TCU]`, height in hundreds of feet
    Layer {
        cover: CloudCover,
        height_hundreds_ft: u32,
        cloud_type: Option<CloudType>,
    },
}

/// Temperature and dewpoint group (`[M]TT/[M]DD`).
///
/// The raw halves keep their `M` sign marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemperatureGroup {
    pub temperature_raw: String,
    pub dewpoint_raw: String,
}

/// Altimeter setting group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Altimeter {
    /// `A<dddd>`: hundredths of an inch of mercury
    InchesHg(u32),
    /// `Q<dddd>`: hectopascals
    Qnh(u32),
}

/// Run a group parser against a whole token.
fn parse_token<'a, O, P>(parser: P, token: &'a str) -> Option<O>
where
    P: Parser<&'a str, Output = O, Error = Error<&'a str>>,
{
    all_consuming(parser).parse(token).ok().map(|(_, out)| out)
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Recognize between `min` and `max` ASCII digits.
fn digits<'a>(
    min: usize,
    max: usize,
) -> impl Parser<&'a str, Output = &'a str, Error = Error<&'a str>> {
    take_while_m_n(min, max, is_digit)
}

/// Parse between `min` and `max` ASCII digits as a number.
fn number<'a>(
    min: usize,
    max: usize,
) -> impl Parser<&'a str, Output = u32, Error = Error<&'a str>> {
    map_res(digits(min, max), |s: &str| s.parse::<u32>())
}

/// Parse a wind speed unit suffix.
fn wind_unit(input: &str) -> IResult<&str, WindUnit> {
    alt((
        value(WindUnit::Knots, tag("KT")),
        value(WindUnit::MetersPerSecond, tag("MPS")),
    ))
    .parse(input)
}

/// Parse `DDDSS[GGG](KT|MPS)`.
fn fixed_wind(input: &str) -> IResult<&str, Wind> {
    map(
        (
            number(3, 3),
            number(2, 3),
            opt(preceded(char('G'), number(2, 3))),
            wind_unit,
        ),
        |(direction, speed, gust, unit)| Wind::Fixed {
            direction,
            speed,
            gust,
            unit,
        },
    )
    .parse(input)
}

/// Parse `VRBSS(KT|MPS)`.
fn variable_wind(input: &str) -> IResult<&str, Wind> {
    map(
        preceded(tag("VRB"), (number(2, 3), wind_unit)),
        |(speed, unit)| Wind::Variable { speed, unit },
    )
    .parse(input)
}

/// Recognize a bare fraction such as `1/2` or `3/16`.
fn fraction(input: &str) -> IResult<&str, &str> {
    recognize((digits(1, 1), char('/'), digits(1, 2))).parse(input)
}

/// Parse a single two-letter weather phenomenon.
fn phenomenon(input: &str) -> IResult<&str, Phenomenon> {
    map_opt(take(2usize), Phenomenon::from_code).parse(input)
}

/// Parse an optional intensity or proximity prefix.
fn qualifier(input: &str) -> IResult<&str, Qualifier> {
    map_opt(alt((tag("-"), tag("+"), tag("VC"))), Qualifier::from_code).parse(input)
}

/// Parse a two-letter descriptor.
fn descriptor(input: &str) -> IResult<&str, Descriptor> {
    map_opt(take(2usize), Descriptor::from_code).parse(input)
}

/// Parse a cloud cover code that may carry a layer height.
fn layer_cover(input: &str) -> IResult<&str, CloudCover> {
    map_opt(
        alt((
            tag("SKC"),
            tag("CLR"),
            tag("FEW"),
            tag("SCT"),
            tag("BKN"),
            tag("OVC"),
            tag("VV"),
        )),
        CloudCover::from_code,
    )
    .parse(input)
}

/// Recognize one half of a temperature group (`M04`, `17`).
fn temperature_half(input: &str) -> IResult<&str, &str> {
    recognize(preceded(opt(char('M')), digits(2, 2))).parse(input)
}

/// Recognize the `METAR` / `SPECI` report type.
pub fn report_type(token: &str) -> Option<ReportType> {
    parse_token(
        alt((
            value(ReportType::Metar, tag("METAR")),
            value(ReportType::Speci, tag("SPECI")),
        )),
        token,
    )
}

/// Recognize a four-letter ICAO station identifier.
pub fn station(token: &str) -> Option<&str> {
    parse_token(take_while_m_n(4, 4, |c: char| c.is_ascii_uppercase()), token)
}

/// Recognize a `DDHHMMZ` observation time.
///
/// Only the shape is checked; out-of-range values are passed through.
pub fn observation_time(token: &str) -> Option<ObservationTime> {
    parse_token(
        map(
            terminated((number(2, 2), number(2, 2), number(2, 2)), char('Z')),
            |(day, hour, minute)| ObservationTime { day, hour, minute },
        ),
        token,
    )
}

/// Recognize the `AUTO` / `COR` modifier.
pub fn modifier(token: &str) -> Option<Modifier> {
    parse_token(
        alt((
            value(Modifier::Auto, tag("AUTO")),
            value(Modifier::Cor, tag("COR")),
        )),
        token,
    )
}

/// Recognize a wind group.
///
/// `00000KT` is tried before the fixed-direction form so that it is always
/// reported as calm.
pub fn wind(token: &str) -> Option<Wind> {
    parse_token(value(Wind::Calm, tag("00000KT")), token)
        .or_else(|| parse_token(fixed_wind, token))
        .or_else(|| parse_token(variable_wind, token))
}

/// Recognize a `DDDVDDD` wind direction range.
pub fn wind_variability(token: &str) -> Option<WindVariability> {
    parse_token(
        map(
            (number(3, 3), char('V'), number(3, 3)),
            |(from, _, to)| WindVariability { from, to },
        ),
        token,
    )
}

/// Recognize a prevailing visibility group.
pub fn visibility(token: &str) -> Option<Visibility> {
    parse_token(value(Visibility::Cavok, tag("CAVOK")), token)
        .or_else(|| parse_token(value(Visibility::MoreThanSixMiles, tag("P6SM")), token))
        .or_else(|| {
            parse_token(
                map(preceded(char('M'), terminated(fraction, tag("SM"))), |f: &str| {
                    Visibility::LessThanMiles(f.to_string())
                }),
                token,
            )
        })
        .or_else(|| fractional_miles(token).map(|f| Visibility::FractionalMiles(f.to_string())))
        .or_else(|| {
            parse_token(
                map(terminated(take_while1(is_digit), tag("SM")), |d: &str| {
                    Visibility::StatuteMiles(d.to_string())
                }),
                token,
            )
        })
        .or_else(|| {
            parse_token(number(4, 4), token).map(|meters| match meters {
                9999 => Visibility::TenKmOrMore,
                m => Visibility::Meters(m),
            })
        })
}

/// Recognize a bare whole number of statute miles (`1`, `2`, `10`) that
/// precedes a fractional group such as `1/2SM`.
pub fn whole_miles(token: &str) -> Option<&str> {
    parse_token(digits(1, 2), token)
}

/// Recognize a bare fractional statute-mile group (`1/2SM`), returning
/// the fraction without its unit.
pub fn fractional_miles(token: &str) -> Option<&str> {
    parse_token(terminated(fraction, tag("SM")), token)
}

/// Recognize a present weather group.
///
/// The token must be an optional intensity/proximity prefix, an optional
/// descriptor, and one or more phenomenon codes with nothing left over.
pub fn weather(token: &str) -> Option<WeatherGroup> {
    parse_token(
        map(
            (opt(qualifier), opt(descriptor), many1(phenomenon)),
            |(qualifier, descriptor, phenomena)| WeatherGroup {
                qualifier,
                descriptor,
                phenomena,
            },
        ),
        token,
    )
}

/// Recognize a sky condition group.
pub fn cloud(token: &str) -> Option<CloudGroup> {
    parse_token(
        alt((
            value(CloudGroup::NoCloudsDetected, tag("NCD")),
            value(CloudGroup::NoSignificantClouds, tag("NSC")),
        )),
        token,
    )
    .or_else(|| {
        parse_token(
            map(
                (
                    layer_cover,
                    number(3, 3),
                    opt(map_opt(alt((tag("CB"), tag("TCU"))), CloudType::from_code)),
                ),
                |(cover, height_hundreds_ft, cloud_type)| CloudGroup::Layer {
                    cover,
                    height_hundreds_ft,
                    cloud_type,
                },
            ),
            token,
        )
    })
    .or_else(|| {
        parse_token(
            map_opt(alt((tag("SKC"), tag("CLR"))), CloudCover::from_code),
            token,
        )
        .map(CloudGroup::Clear)
    })
}

/// Recognize a `[M]TT/[M]DD` temperature and dewpoint group.
pub fn temperature(token: &str) -> Option<TemperatureGroup> {
    parse_token(
        map(
            (temperature_half, char('/'), temperature_half),
            |(t, _, d)| TemperatureGroup {
                temperature_raw: t.to_string(),
                dewpoint_raw: d.to_string(),
            },
        ),
        token,
    )
}

/// Recognize an `A<dddd>` or `Q<dddd>` altimeter group.
pub fn altimeter(token: &str) -> Option<Altimeter> {
    parse_token(
        alt((
            map(preceded(char('A'), number(4, 4)), Altimeter::InchesHg),
            map(preceded(char('Q'), number(4, 4)), Altimeter::Qnh),
        )),
        token,
    )
}

/// Check if a token is the remarks marker.
#[inline]
pub fn is_remarks_marker(token: &str) -> bool {
    token == "RMK"
}
