//! Deterministic parser adapter over the `phonenumber` crate.
//!
//! Produces the fields a numbering-plan library can answer exactly. Parse
//! failures are ordinary data (`ParseOutcome::Failed`), never errors.

use std::panic;

use phonenumber::metadata::{Metadata, DATABASE};
use phonenumber::{Mode, Type};
use tracing::{debug, warn};

use crate::lookup::timezones;
use crate::models::phone::{NumberType, PhoneNumberRecord};

/// Bounds on a national significant number when the region has no length data.
const MIN_NSN_LENGTH: usize = 2;
const MAX_NSN_LENGTH: usize = 17;

/// Region id the metadata uses for non-geographic calling codes (+800, +979, ...).
const NON_GEOGRAPHIC_REGION: &str = "001";

/// Everything the library reported for a successfully parsed number.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNumber {
    pub country_code: Option<String>,
    pub national_number: String,
    pub e164: String,
    pub timezones: Vec<&'static str>,
    pub is_valid: bool,
    pub is_possible: bool,
    pub number_type: NumberType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(ParsedNumber),
    Failed { reason: String },
}

impl ParseOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ParseOutcome::Parsed(_))
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ParseOutcome::Parsed(_) => None,
            ParseOutcome::Failed { reason } => Some(reason),
        }
    }

    /// The partial record for this outcome. Model-only fields stay null.
    ///
    /// A failed parse yields an all-null record with both validity flags
    /// forced to `false` ("known invalid" rather than "unknown").
    pub fn to_record(&self) -> PhoneNumberRecord {
        match self {
            ParseOutcome::Parsed(parsed) => PhoneNumberRecord {
                country_code: parsed.country_code.clone(),
                national_number: non_empty(&parsed.national_number),
                e164_format: non_empty(&parsed.e164),
                timezone: join_timezones(&parsed.timezones),
                is_valid_number: Some(parsed.is_valid),
                number_type: Some(parsed.number_type),
                is_possible_number: Some(parsed.is_possible),
                ..Default::default()
            },
            ParseOutcome::Failed { .. } => PhoneNumberRecord {
                is_valid_number: Some(false),
                is_possible_number: Some(false),
                ..Default::default()
            },
        }
    }
}

/// Parses `raw`, which is expected in international format (`+<cc>...`).
/// No validation happens before handing it to the library.
pub fn parse(raw: &str) -> ParseOutcome {
    let input = raw.to_owned();

    // The library has panicking paths on some malformed input.
    let result = panic::catch_unwind(move || phonenumber::parse(None, input));

    let number = match result {
        Ok(Ok(number)) => number,
        Ok(Err(err)) => return failed(raw, format!("{err:?}")),
        Err(_) => return failed(raw, "phone number library panicked".to_string()),
    };

    // `national()` keeps leading zeros only through Display (Italian fixed lines).
    let national_number = number.national().to_string();
    let e164 = number.format().mode(Mode::E164).to_string();
    let metadata = region_metadata(number.code().value(), &national_number);

    let country_code = metadata
        .map(Metadata::id)
        .filter(|id| *id != NON_GEOGRAPHIC_REGION)
        .map(str::to_string);
    let is_valid = phonenumber::is_valid(&number);
    let number_type = NumberType::from(
        metadata
            .map(|metadata| classify(metadata, &national_number))
            .unwrap_or(Type::Unknown),
    );
    let is_possible = metadata
        .map(|metadata| has_possible_length(metadata, national_number.len()))
        .unwrap_or(false);

    let digits = e164.trim_start_matches('+');
    let timezones = timezones::for_number(digits, country_code.as_deref());

    debug!(
        "Parsed {} as region={:?} type={:?} valid={} possible={}",
        mask_number(raw),
        country_code,
        number_type,
        is_valid,
        is_possible
    );

    ParseOutcome::Parsed(ParsedNumber {
        country_code,
        national_number,
        e164,
        timezones,
        is_valid,
        is_possible,
        number_type,
    })
}

/// The metadata governing `national` under calling code `code`.
///
/// A code shared by several regions (NANP, +7, +44, ...) is resolved by
/// leading digits, or by the first region whose patterns match.
fn region_metadata(code: u16, national: &str) -> Option<&'static Metadata> {
    let regions = DATABASE.region(&code)?;

    if let [only] = regions.as_slice() {
        return if *only == NON_GEOGRAPHIC_REGION {
            DATABASE.by_code(&code)?.into_iter().next()
        } else {
            DATABASE.by_id(*only)
        };
    }

    regions
        .into_iter()
        .filter_map(|region| DATABASE.by_id(region))
        .find(|metadata| match metadata.leading_digits() {
            Some(pattern) => pattern.find(national).is_some_and(|m| m.start() == 0),
            None => classify(metadata, national) != Type::Unknown,
        })
}

/// Number type by the region's descriptors, most specific first.
fn classify(metadata: &Metadata, national: &str) -> Type {
    let descriptors = metadata.descriptors();
    if !descriptors.general().is_match(national) {
        return Type::Unknown;
    }

    let is_kind = |kind: Type| {
        descriptors
            .get(kind)
            .is_some_and(|descriptor| descriptor.is_match(national))
    };

    let special = [
        Type::PremiumRate,
        Type::TollFree,
        Type::SharedCost,
        Type::Voip,
        Type::PersonalNumber,
        Type::Pager,
        Type::Uan,
        Type::Voicemail,
    ];
    if let Some(kind) = special.into_iter().find(|&kind| is_kind(kind)) {
        return kind;
    }

    if is_kind(Type::FixedLine) {
        let same_patterns = match (descriptors.fixed_line(), descriptors.mobile()) {
            (Some(fixed), Some(mobile)) => {
                fixed.national_number().as_str() == mobile.national_number().as_str()
            }
            _ => false,
        };
        if same_patterns || is_kind(Type::Mobile) {
            Type::FixedLineOrMobile
        } else {
            Type::FixedLine
        }
    } else if is_kind(Type::Mobile) {
        Type::Mobile
    } else {
        Type::Unknown
    }
}

fn has_possible_length(metadata: &Metadata, nsn_length: usize) -> bool {
    let lengths = metadata.descriptors().general().possible_length();
    if lengths.is_empty() {
        (MIN_NSN_LENGTH..=MAX_NSN_LENGTH).contains(&nsn_length)
    } else {
        lengths.iter().any(|&len| usize::from(len) == nsn_length)
    }
}

fn failed(raw: &str, reason: String) -> ParseOutcome {
    warn!("Failed to parse phone number {}: {}", mask_number(raw), reason);
    ParseOutcome::Failed { reason }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn join_timezones(zones: &[&str]) -> Option<String> {
    if zones.is_empty() {
        None
    } else {
        Some(zones.join(", "))
    }
}

/// Replaces every digit but the last four with `*` for logging.
pub fn mask_number(raw: &str) -> String {
    let digit_count = raw.chars().filter(|c| c.is_ascii_digit()).count();
    let keep_from = digit_count.saturating_sub(4);

    let mut seen = 0;
    raw.chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen <= keep_from {
                    return '*';
                }
            }
            c
        })
        .collect()
}
