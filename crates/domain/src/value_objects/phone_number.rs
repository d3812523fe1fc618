//! Phone number value object with country-aware normalization
//!
//! Numbers are stored in a canonical dialable E.164 form (`+5511987654321`).
//! Input without a country code is interpreted in a default [`PhoneRegion`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Dialing regions with national numbering rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PhoneRegion {
    /// Brazil (+55)
    #[default]
    #[serde(rename = "BR")]
    Brazil,
    /// United States and the rest of the NANP (+1)
    #[serde(rename = "US")]
    UnitedStates,
    /// Germany (+49)
    #[serde(rename = "DE")]
    Germany,
}

impl PhoneRegion {
    const ALL: [Self; 3] = [Self::Brazil, Self::UnitedStates, Self::Germany];

    /// International calling code without the leading `+`
    pub const fn calling_code(self) -> &'static str {
        match self {
            Self::Brazil => "55",
            Self::UnitedStates => "1",
            Self::Germany => "49",
        }
    }

    /// ISO 3166 alpha-2 code
    pub const fn iso_code(self) -> &'static str {
        match self {
            Self::Brazil => "BR",
            Self::UnitedStates => "US",
            Self::Germany => "DE",
        }
    }

    fn strip_trunk_prefix(self, national: &str) -> &str {
        match self {
            Self::Brazil | Self::Germany => national.strip_prefix('0').unwrap_or(national),
            Self::UnitedStates if national.len() == 11 => {
                national.strip_prefix('1').unwrap_or(national)
            },
            Self::UnitedStates => national,
        }
    }

    /// Validate a national significant number and determine its line type
    fn classify(self, national: &str) -> Result<PhoneLineType, String> {
        let bytes = national.as_bytes();
        match self {
            Self::Brazil => {
                if !(10..=11).contains(&bytes.len()) {
                    return Err(
                        "Brazilian numbers need a 2-digit area code and an 8 or 9 digit subscriber number"
                            .to_string(),
                    );
                }
                if bytes[0] == b'0' || bytes[1] == b'0' {
                    return Err("Brazilian area codes cannot contain 0".to_string());
                }
                let subscriber = &bytes[2..];
                match (subscriber.len(), subscriber[0]) {
                    (9, b'9') => Ok(PhoneLineType::Mobile),
                    (9, _) | (8, b'6'..=b'9') => {
                        Err("Brazilian mobile numbers must start with 9".to_string())
                    },
                    (8, b'2'..=b'5') => Ok(PhoneLineType::Landline),
                    _ => Err("Invalid Brazilian subscriber number".to_string()),
                }
            },
            Self::UnitedStates => {
                if bytes.len() != 10 {
                    return Err("US numbers must have 10 digits".to_string());
                }
                if !(b'2'..=b'9').contains(&bytes[0]) || !(b'2'..=b'9').contains(&bytes[3]) {
                    return Err("US area code and exchange cannot start with 0 or 1".to_string());
                }
                Ok(PhoneLineType::Unknown)
            },
            Self::Germany => {
                if !(6..=13).contains(&bytes.len()) {
                    return Err("German numbers must have 6-13 national digits".to_string());
                }
                if bytes[0] == b'0' {
                    return Err("German national numbers cannot start with 0".to_string());
                }
                if national.starts_with("15") || national.starts_with("16") || national.starts_with("17")
                {
                    Ok(PhoneLineType::Mobile)
                } else {
                    Ok(PhoneLineType::Landline)
                }
            },
        }
    }
}

impl fmt::Display for PhoneRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iso_code())
    }
}

impl FromStr for PhoneRegion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BR" => Ok(Self::Brazil),
            "US" => Ok(Self::UnitedStates),
            "DE" => Ok(Self::Germany),
            other => Err(format!("Unsupported phone region: {other}. Use BR, US or DE")),
        }
    }
}

/// Kind of line a number belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneLineType {
    Mobile,
    Landline,
    /// The numbering plan does not distinguish line types
    Unknown,
}

/// A validated phone number in canonical E.164 form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PhoneNumber {
    value: String,
    region: Option<PhoneRegion>,
    line_type: PhoneLineType,
}

impl PhoneNumber {
    /// Parse a phone number, applying `default_region` when no country code is present
    ///
    /// Spaces, dashes, dots and parentheses are ignored. A leading `+` or `00`
    /// marks an international number; otherwise a single trunk prefix is
    /// stripped and the default region's calling code is prepended.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPhoneNumber` for malformed input.
    pub fn new(number: impl AsRef<str>, default_region: PhoneRegion) -> Result<Self, DomainError> {
        let cleaned: String = number
            .as_ref()
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
            .collect();

        if cleaned.is_empty() {
            return Err(DomainError::InvalidPhoneNumber(
                "Phone number is empty".to_string(),
            ));
        }

        let international = cleaned
            .strip_prefix('+')
            .or_else(|| cleaned.strip_prefix("00"));

        let digits = international.unwrap_or(&cleaned);
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidPhoneNumber(
                "Phone number must contain only digits".to_string(),
            ));
        }

        match international {
            Some(digits) => Self::from_international(digits),
            None => Self::from_national(digits, default_region),
        }
    }

    fn from_international(digits: &str) -> Result<Self, DomainError> {
        if let Some(region) = PhoneRegion::ALL
            .into_iter()
            .find(|r| digits.starts_with(r.calling_code()))
        {
            let national = &digits[region.calling_code().len()..];
            return Self::build(region, national);
        }

        if !(8..=15).contains(&digits.len()) {
            return Err(DomainError::InvalidPhoneNumber(
                "International numbers must have 8-15 digits".to_string(),
            ));
        }

        Ok(Self {
            value: format!("+{digits}"),
            region: None,
            line_type: PhoneLineType::Unknown,
        })
    }

    fn from_national(digits: &str, region: PhoneRegion) -> Result<Self, DomainError> {
        Self::build(region, region.strip_trunk_prefix(digits))
    }

    fn build(region: PhoneRegion, national: &str) -> Result<Self, DomainError> {
        let line_type = region
            .classify(national)
            .map_err(DomainError::InvalidPhoneNumber)?;

        Ok(Self {
            value: format!("+{}{national}", region.calling_code()),
            region: Some(region),
            line_type,
        })
    }

    /// The canonical E.164 form
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Digits only (without +)
    pub fn digits(&self) -> &str {
        &self.value[1..]
    }

    /// The recognized region, `None` for numbers outside the supported plans
    pub const fn region(&self) -> Option<PhoneRegion> {
        self.region
    }

    /// Line type as determined by the numbering plan
    pub const fn line_type(&self) -> PhoneLineType {
        self.line_type
    }

    /// National significant number (without the calling code)
    pub fn national_number(&self) -> &str {
        let code_len = self.region.map_or(0, |r| r.calling_code().len());
        &self.digits()[code_len..]
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.value
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value, PhoneRegion::default())
    }
}
