//! SRO (Search Request Object) model and its token codec.
//!
//! An SRO token is a single string carrying a complete flight search:
//! a 21-character positional prefix, one or more 14-character segments,
//! and an optional `_`-delimited tail for filter lists, currency and
//! language. Decode is permissive about tail ordering and unknown tail
//! parts; encode always emits the canonical order (carriers, GDS,
//! currency, language), so `to_token(from_token(t)) == t` holds exactly
//! for canonically-ordered inputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shortest well-formed token accepted by the decoder.
pub const MIN_TOKEN_LEN: usize = 34;

const FIXED_PREFIX_LEN: usize = 21;
const SEGMENT_LEN: usize = 14;
const DATE_FORMAT: &str = "%Y%m%d";

/// The codec reports a single error kind; the offending field is only
/// interesting for debugging and goes to the logs, not to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid SRO token format")]
pub struct InvalidToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelClass {
    #[serde(rename = "E")]
    Economy,
    #[serde(rename = "B")]
    Business,
    #[serde(rename = "F")]
    First,
    #[serde(rename = "W")]
    PremiumEconomy,
}

impl TravelClass {
    pub fn code(&self) -> &'static str {
        match self {
            TravelClass::Economy => "E",
            TravelClass::Business => "B",
            TravelClass::First => "F",
            TravelClass::PremiumEconomy => "W",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "E" => Some(TravelClass::Economy),
            "B" => Some(TravelClass::Business),
            "F" => Some(TravelClass::First),
            "W" => Some(TravelClass::PremiumEconomy),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteType {
    #[serde(rename = "OW")]
    OneWay,
    #[serde(rename = "RT")]
    RoundTrip,
    #[serde(rename = "CX")]
    Complex,
}

impl RouteType {
    pub fn code(&self) -> &'static str {
        match self {
            RouteType::OneWay => "OW",
            RouteType::RoundTrip => "RT",
            RouteType::Complex => "CX",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "OW" => Some(RouteType::OneWay),
            "RT" => Some(RouteType::RoundTrip),
            "CX" => Some(RouteType::Complex),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    #[default]
    Include,
    Exclude,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "from")]
    pub origin: String,
    #[serde(rename = "to")]
    pub destination: String,
    pub date: NaiveDate,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passengers {
    #[serde(rename = "adt")]
    pub adults: u8,
    #[serde(rename = "chd")]
    pub children: u8,
    #[serde(rename = "inf")]
    pub infants: u8,
    #[serde(rename = "src")]
    pub seniors: u8,
    #[serde(rename = "yth")]
    pub youths: u8,
    #[serde(rename = "ins")]
    pub has_insurance: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelToken {
    pub partner_code: String,
    pub source_code: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(rename = "isDirectOnly")]
    pub direct_only: bool,
    #[serde(rename = "maxStops")]
    pub max_stops: u8,
    #[serde(rename = "withBaggageOnly")]
    pub baggage_only: bool,
    pub carriers: Vec<String>,
    #[serde(rename = "carriersType")]
    pub carriers_mode: ListMode,
    #[serde(rename = "gdsList")]
    pub gds_list: Vec<String>,
    #[serde(rename = "gdsListType")]
    pub gds_mode: ListMode,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub is_test: bool,
    pub currency: Option<String>,
    pub language: Option<String>,
}

/// Canonical decoded form of a flight search request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sro {
    pub segments: Vec<Segment>,
    pub passengers: Passengers,
    pub class: TravelClass,
    #[serde(rename = "type")]
    pub route_type: RouteType,
    #[serde(rename = "channelToken")]
    pub channel: ChannelToken,
    pub filters: Filters,
    pub metadata: Metadata,
}

impl Sro {
    pub fn is_one_way(&self) -> bool {
        self.route_type == RouteType::OneWay
    }

    pub fn is_round_trip(&self) -> bool {
        self.route_type == RouteType::RoundTrip
    }

    pub fn is_complex(&self) -> bool {
        self.route_type == RouteType::Complex
    }

    /// Encodes this request as an SRO token.
    ///
    /// Passenger counts and max-stops occupy one character each; values
    /// above 9 are clamped so the emitted token always decodes back.
    pub fn to_token(&self) -> String {
        let mut out = String::with_capacity(MIN_TOKEN_LEN + self.segments.len() * SEGMENT_LEN);

        out.push_str(&self.channel.partner_code);
        out.push_str(&self.channel.source_code);
        out.push_str(self.route_type.code());
        out.push_str(self.class.code());
        push_count(&mut out, self.passengers.adults);
        push_count(&mut out, self.passengers.children);
        push_count(&mut out, self.passengers.infants);
        push_count(&mut out, self.passengers.seniors);
        push_count(&mut out, self.passengers.youths);
        push_flag(&mut out, self.metadata.is_test);
        push_flag(&mut out, self.filters.direct_only);
        push_flag(&mut out, self.filters.baggage_only);
        push_count(&mut out, self.filters.max_stops);
        push_flag(&mut out, self.passengers.has_insurance);

        for segment in &self.segments {
            out.push_str(&segment.origin);
            out.push_str(&segment.destination);
            out.push_str(&segment.date.format(DATE_FORMAT).to_string());
        }

        if !self.filters.carriers.is_empty() {
            out.push_str(match self.filters.carriers_mode {
                ListMode::Include => "_I_",
                ListMode::Exclude => "_E_",
            });
            out.push_str(&self.filters.carriers.join("."));
        }

        if !self.filters.gds_list.is_empty() {
            out.push_str(match self.filters.gds_mode {
                ListMode::Include => "_GI_",
                ListMode::Exclude => "_GE_",
            });
            out.push_str(&self.filters.gds_list.join("."));
        }

        if let Some(currency) = &self.metadata.currency {
            out.push('_');
            out.push_str(currency);
        }

        if let Some(language) = &self.metadata.language {
            out.push('_');
            out.push_str(language);
        }

        out
    }

    /// Decodes an SRO token.
    ///
    /// Every fixed field is validated against the grammar; any violation
    /// yields [`InvalidToken`]. Unknown tail parts are ignored.
    pub fn from_token(token: &str) -> Result<Self, InvalidToken> {
        if token.len() < MIN_TOKEN_LEN || !token.is_ascii() {
            return Err(InvalidToken);
        }
        let bytes = token.as_bytes();

        let partner_code = parse_channel_code(&token[0..4])?;
        let source_code = parse_channel_code(&token[4..8])?;
        let route_type = RouteType::from_code(&token[8..10]).ok_or(InvalidToken)?;
        let class = TravelClass::from_code(&token[10..11]).ok_or(InvalidToken)?;

        let adults = parse_digit(bytes[11])?;
        let children = parse_digit(bytes[12])?;
        let infants = parse_digit(bytes[13])?;
        let seniors = parse_digit(bytes[14])?;
        let youths = parse_digit(bytes[15])?;
        let is_test = parse_flag(bytes[16])?;
        let direct_only = parse_flag(bytes[17])?;
        let baggage_only = parse_flag(bytes[18])?;
        let max_stops = parse_digit(bytes[19])?;
        let has_insurance = parse_flag(bytes[20])?;

        let remaining = &token[FIXED_PREFIX_LEN..];
        let (segments, tail) = parse_segments(remaining)?;
        let (filters_tail, metadata_tail) = parse_tail(tail);

        Ok(Sro {
            segments,
            passengers: Passengers {
                adults,
                children,
                infants,
                seniors,
                youths,
                has_insurance,
            },
            class,
            route_type,
            channel: ChannelToken {
                partner_code,
                source_code,
            },
            filters: Filters {
                direct_only,
                baggage_only,
                max_stops,
                carriers: filters_tail.carriers,
                carriers_mode: filters_tail.carriers_mode,
                gds_list: filters_tail.gds_list,
                gds_mode: filters_tail.gds_mode,
            },
            metadata: Metadata {
                is_test,
                currency: metadata_tail.currency,
                language: metadata_tail.language,
            },
        })
    }
}

fn push_count(out: &mut String, n: u8) {
    out.push(char::from(b'0' + n.min(9)));
}

fn push_flag(out: &mut String, v: bool) {
    out.push(if v { '1' } else { '0' });
}

fn parse_channel_code(s: &str) -> Result<String, InvalidToken> {
    if s.bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    {
        Ok(s.to_string())
    } else {
        Err(InvalidToken)
    }
}

fn parse_digit(b: u8) -> Result<u8, InvalidToken> {
    if b.is_ascii_digit() {
        Ok(b - b'0')
    } else {
        Err(InvalidToken)
    }
}

fn parse_flag(b: u8) -> Result<bool, InvalidToken> {
    match b {
        b'0' => Ok(false),
        b'1' => Ok(true),
        _ => Err(InvalidToken),
    }
}

/// Greedy non-overlapping scan for `XXXYYYYYYYMMDD`-shaped segments.
/// Returns the segments and the suffix after the last match.
fn parse_segments(remaining: &str) -> Result<(Vec<Segment>, &str), InvalidToken> {
    let bytes = remaining.as_bytes();
    let mut segments = Vec::new();
    let mut last_end = 0;
    let mut i = 0;

    while i + SEGMENT_LEN <= bytes.len() {
        if !is_segment_at(bytes, i) {
            i += 1;
            continue;
        }
        let date = NaiveDate::parse_from_str(&remaining[i + 6..i + SEGMENT_LEN], DATE_FORMAT)
            .map_err(|_| InvalidToken)?;
        segments.push(Segment {
            origin: remaining[i..i + 3].to_string(),
            destination: remaining[i + 3..i + 6].to_string(),
            date,
        });
        i += SEGMENT_LEN;
        last_end = i;
    }

    if segments.is_empty() {
        return Err(InvalidToken);
    }
    Ok((segments, &remaining[last_end..]))
}

fn is_segment_at(bytes: &[u8], i: usize) -> bool {
    bytes[i..i + 6].iter().all(u8::is_ascii_uppercase)
        && bytes[i + 6..i + SEGMENT_LEN].iter().all(u8::is_ascii_digit)
}

#[derive(Default)]
struct TailFilters {
    carriers: Vec<String>,
    carriers_mode: ListMode,
    gds_list: Vec<String>,
    gds_mode: ListMode,
}

#[derive(Default)]
struct TailMetadata {
    currency: Option<String>,
    language: Option<String>,
}

/// Classifies `_`-delimited tail parts, order-independently. A filter
/// marker (`I`/`E`/`GI`/`GE`) consumes the following part as its
/// dot-joined code list; a bare 3-char part is a currency, a bare
/// 2-char part a language. Anything else is ignored by contract.
fn parse_tail(tail: &str) -> (TailFilters, TailMetadata) {
    let mut filters = TailFilters::default();
    let mut metadata = TailMetadata::default();

    let parts: Vec<&str> = tail.split('_').filter(|p| !p.is_empty()).collect();
    let mut i = 0;
    while i < parts.len() {
        let part = parts[i];
        match part {
            "I" | "E" => {
                if let Some(list) = parts.get(i + 1) {
                    filters.carriers_mode = if part == "I" {
                        ListMode::Include
                    } else {
                        ListMode::Exclude
                    };
                    filters.carriers = split_codes(list);
                    i += 2;
                    continue;
                }
            }
            "GI" | "GE" => {
                if let Some(list) = parts.get(i + 1) {
                    filters.gds_mode = if part == "GI" {
                        ListMode::Include
                    } else {
                        ListMode::Exclude
                    };
                    filters.gds_list = split_codes(list);
                    i += 2;
                    continue;
                }
            }
            _ if part.len() == 3 => metadata.currency = Some(part.to_string()),
            _ if part.len() == 2 => metadata.language = Some(part.to_string()),
            _ => tracing::debug!(part, "ignoring unrecognized token tail part"),
        }
        i += 1;
    }

    (filters, metadata)
}

fn split_codes(list: &str) -> Vec<String> {
    list.split('.').map(str::to_string).collect()
}
