//! CPF document number value object
//!
//! A CPF is an 11-digit Brazilian taxpayer number whose last two digits are
//! check digits over the first nine. Both the masked (`###.###.###-##`) and
//! the raw form are accepted; comparison uses the digits only.
//!
//! # Examples
//!
//! ```
//! use domain::DocumentNumber;
//!
//! let masked = DocumentNumber::new("529.982.247-25").unwrap();
//! let raw = DocumentNumber::new("52998224725").unwrap();
//! assert_eq!(masked, raw);
//! assert_eq!(raw.formatted(), "529.982.247-25");
//!
//! assert!(DocumentNumber::new("111.111.111-11").is_err());
//! ```

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

const CPF_LENGTH: usize = 11;

/// A validated CPF
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DocumentNumber {
    digits: String,
    raw: String,
}

impl DocumentNumber {
    /// Create a document number, validating length, repetition and check digits
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDocumentNumber` if the input is not a valid CPF.
    pub fn new(input: impl Into<String>) -> Result<Self, DomainError> {
        let raw = input.into().trim().to_string();

        let mut digits = String::with_capacity(CPF_LENGTH);
        for c in raw.chars() {
            match c {
                '0'..='9' => digits.push(c),
                '.' | '-' | ' ' => {},
                _ => {
                    return Err(DomainError::InvalidDocumentNumber(format!(
                        "unexpected character '{c}'"
                    )));
                },
            }
        }

        if digits.len() != CPF_LENGTH {
            return Err(DomainError::InvalidDocumentNumber(format!(
                "expected {CPF_LENGTH} digits, got {}",
                digits.len()
            )));
        }

        let values: Vec<u8> = digits.bytes().map(|b| b - b'0').collect();

        if values.iter().all(|d| *d == values[0]) {
            return Err(DomainError::InvalidDocumentNumber(
                "all digits are identical".to_string(),
            ));
        }

        let mut base = [0u8; 9];
        base.copy_from_slice(&values[..9]);
        if Self::check_digits(&base) != [values[9], values[10]] {
            return Err(DomainError::InvalidDocumentNumber(
                "check digits do not match".to_string(),
            ));
        }

        Ok(Self { digits, raw })
    }

    /// Complete a nine-digit base with its check digits
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDocumentNumber` if `base` has more than
    /// nine digits or completes to a CPF of one repeated digit.
    pub fn from_base(base: u32) -> Result<Self, DomainError> {
        let base_str = format!("{base:09}");
        if base_str.len() != 9 {
            return Err(DomainError::InvalidDocumentNumber(format!(
                "base {base} has more than nine digits"
            )));
        }
        let mut digits = [0u8; 9];
        for (slot, b) in digits.iter_mut().zip(base_str.bytes()) {
            *slot = b - b'0';
        }
        let [first, second] = Self::check_digits(&digits);
        Self::new(format!("{base_str}{first}{second}"))
    }

    /// Compute the two CPF check digits for the first nine digits
    ///
    /// The first digit weighs the base with 10 down to 2, the second weighs the
    /// base plus the first check digit with 11 down to 2. Remainders below 2
    /// map to 0, anything else to `11 - remainder`.
    pub fn check_digits(base: &[u8; 9]) -> [u8; 2] {
        let first = Self::mod11_digit(base.iter().copied(), 10);
        let second = Self::mod11_digit(base.iter().copied().chain(std::iter::once(first)), 11);
        [first, second]
    }

    fn mod11_digit(digits: impl Iterator<Item = u8>, first_weight: u32) -> u8 {
        let sum: u32 = digits
            .zip((2..=first_weight).rev())
            .map(|(d, w)| u32::from(d) * w)
            .sum();
        let remainder = sum % 11;
        if remainder < 2 {
            0
        } else {
            // remainder is in 2..=10, so the result is a single digit
            u8::try_from(11 - remainder).unwrap_or(0)
        }
    }

    /// The eleven digits without mask
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// The input as it was supplied (trimmed)
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The digits in the `###.###.###-##` mask
    pub fn formatted(&self) -> String {
        let d = &self.digits;
        format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
    }
}

impl PartialEq for DocumentNumber {
    fn eq(&self, other: &Self) -> bool {
        self.digits == other.digits
    }
}

impl Eq for DocumentNumber {}

impl Hash for DocumentNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.digits.hash(state);
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl From<DocumentNumber> for String {
    fn from(document: DocumentNumber) -> Self {
        document.digits
    }
}

impl TryFrom<String> for DocumentNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DocumentNumber {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
