use serde::{Deserialize, Serialize};

/// Closed set of number categories surfaced to clients.
///
/// `Other` is the sentinel for library categories outside this list
/// (emergency, short codes, ...). It is never produced by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumberType {
    FixedLine,
    Mobile,
    FixedLineOrMobile,
    TollFree,
    PremiumRate,
    SharedCost,
    Voip,
    PersonalNumber,
    Pager,
    Uan,
    Voicemail,
    Unknown,
    Other,
}

impl From<phonenumber::Type> for NumberType {
    fn from(value: phonenumber::Type) -> Self {
        use phonenumber::Type;

        match value {
            Type::FixedLine => NumberType::FixedLine,
            Type::Mobile => NumberType::Mobile,
            Type::FixedLineOrMobile => NumberType::FixedLineOrMobile,
            Type::TollFree => NumberType::TollFree,
            Type::PremiumRate => NumberType::PremiumRate,
            Type::SharedCost => NumberType::SharedCost,
            Type::Voip => NumberType::Voip,
            Type::PersonalNumber => NumberType::PersonalNumber,
            Type::Pager => NumberType::Pager,
            Type::Uan => NumberType::Uan,
            Type::Voicemail => NumberType::Voicemail,
            Type::Unknown => NumberType::Unknown,
            _ => NumberType::Other,
        }
    }
}

/// The combined lookup result returned to clients.
///
/// Built once per request and never mutated afterwards. Every field is
/// independently nullable; nulls are always serialized so the shape is fixed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberRecord {
    /// ISO 3166-1 alpha-2 region, e.g. "US".
    pub country_code: Option<String>,
    /// State or region name inferred by the model, e.g. "California".
    pub region_description: Option<String>,
    /// National significant number, digits only.
    pub national_number: Option<String>,
    pub e164_format: Option<String>,
    pub carrier: Option<String>,
    /// IANA zone names joined with ", ".
    pub timezone: Option<String>,
    pub is_valid_number: Option<bool>,
    pub number_type: Option<NumberType>,
    pub is_possible_number: Option<bool>,
    pub region_latitude: Option<f64>,
    pub region_longitude: Option<f64>,
}

/// Fields only the model can supply. Already coerced: no empty strings,
/// no out-of-range coordinates, coordinates present in pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferredFields {
    pub region_description: Option<String>,
    pub carrier: Option<String>,
    pub region_latitude: Option<f64>,
    pub region_longitude: Option<f64>,
}

impl PhoneNumberRecord {
    /// Overlays model-inferred fields onto a parser-produced record.
    /// Deterministic fields are left untouched.
    pub fn with_inferred(self, inferred: InferredFields) -> Self {
        Self {
            region_description: inferred.region_description,
            carrier: inferred.carrier,
            region_latitude: inferred.region_latitude,
            region_longitude: inferred.region_longitude,
            ..self
        }
    }
}
