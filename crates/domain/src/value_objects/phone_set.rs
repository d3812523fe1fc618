//! Non-empty, immutable set of phone numbers owned by an employee

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::PhoneNumber;
use crate::errors::DomainError;

/// A set of at least one phone number, compared by canonical form
///
/// The set is never mutated in place; every change yields a new `PhoneSet`
/// which the owner swaps in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PhoneNumber>", into = "Vec<PhoneNumber>")]
pub struct PhoneSet {
    phones: Vec<PhoneNumber>,
}

/// Outcome of reconciling a phone set against a new one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneSetChanges {
    pub added: Vec<PhoneNumber>,
    pub removed: Vec<PhoneNumber>,
}

impl PhoneSetChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl PhoneSet {
    /// Build a set from any collection, dropping duplicates while keeping first-seen order
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyPhoneSet` when no phone is supplied.
    pub fn new(phones: impl IntoIterator<Item = PhoneNumber>) -> Result<Self, DomainError> {
        let mut seen = BTreeSet::new();
        let phones: Vec<PhoneNumber> = phones
            .into_iter()
            .filter(|p| seen.insert(p.as_str().to_string()))
            .collect();

        if phones.is_empty() {
            return Err(DomainError::EmptyPhoneSet);
        }
        Ok(Self { phones })
    }

    /// A set holding a single number
    pub fn single(phone: PhoneNumber) -> Self {
        Self {
            phones: vec![phone],
        }
    }

    pub fn len(&self) -> usize {
        self.phones.len()
    }

    /// Always false; kept for API symmetry with collections
    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }

    pub fn contains(&self, phone: &PhoneNumber) -> bool {
        self.phones.contains(phone)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhoneNumber> {
        self.phones.iter()
    }

    /// The first number, used as the primary contact
    pub fn primary(&self) -> &PhoneNumber {
        &self.phones[0]
    }

    /// A new set with `phone` appended, or `None` if it is already present
    pub fn with(&self, phone: PhoneNumber) -> Option<Self> {
        if self.contains(&phone) {
            return None;
        }
        let mut phones = self.phones.clone();
        phones.push(phone);
        Some(Self { phones })
    }

    /// A new set without `phone`
    ///
    /// Returns `Ok(None)` when the number is not present.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyPhoneSet` when `phone` is the only number.
    pub fn without(&self, phone: &PhoneNumber) -> Result<Option<Self>, DomainError> {
        if !self.contains(phone) {
            return Ok(None);
        }
        let phones: Vec<PhoneNumber> = self.phones.iter().filter(|p| *p != phone).cloned().collect();
        if phones.is_empty() {
            return Err(DomainError::EmptyPhoneSet);
        }
        Ok(Some(Self { phones }))
    }

    /// Compute the numbers to add and remove to turn `self` into `target`
    pub fn diff(&self, target: &Self) -> PhoneSetChanges {
        PhoneSetChanges {
            added: target
                .iter()
                .filter(|p| !self.contains(p))
                .cloned()
                .collect(),
            removed: self
                .iter()
                .filter(|p| !target.contains(p))
                .cloned()
                .collect(),
        }
    }

    /// Whether both sets hold the same numbers, ignoring order
    pub fn same_numbers(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|p| other.contains(p))
    }
}

impl TryFrom<Vec<PhoneNumber>> for PhoneSet {
    type Error = DomainError;

    fn try_from(value: Vec<PhoneNumber>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhoneSet> for Vec<PhoneNumber> {
    fn from(set: PhoneSet) -> Self {
        set.phones
    }
}

impl<'a> IntoIterator for &'a PhoneSet {
    type Item = &'a PhoneNumber;
    type IntoIter = std::slice::Iter<'a, PhoneNumber>;

    fn into_iter(self) -> Self::IntoIter {
        self.phones.iter()
    }
}
