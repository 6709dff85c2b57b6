//! Matching preferences
//!
//! A seeking client describes itself (gender, species, kinks) and what it
//! is looking for (genders, species). Every list may be the `any` sentinel.
//! Payloads arrive as `RawPreferences` and are validated into `Preferences`
//! before they can reach the waiting pool.

use std::fmt;

use serde::Deserialize;

use crate::error::PreferencesError;

/// Either the `any` sentinel or an explicit non-empty list of values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Matches every value
    Any,
    /// Matches only the listed values
    Only(Vec<String>),
}

impl Selection {
    /// Sentinel value accepted in place of a list
    pub const ANY: &'static str = "any";

    /// Build an explicit selection from a list of values
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(values.into_iter().map(Into::into).collect())
    }

    /// Validate a wire list into a selection
    ///
    /// Blank entries are discarded first; a list left empty is rejected.
    /// A list whose first remaining element is `any` is the sentinel.
    fn parse(field: &'static str, values: Option<Vec<String>>) -> Result<Self, PreferencesError> {
        let values: Vec<String> = values
            .ok_or(PreferencesError::Missing(field))?
            .into_iter()
            .filter(|v| !v.trim().is_empty())
            .collect();

        let is_any = match values.first() {
            None => return Err(PreferencesError::Empty(field)),
            Some(first) => first == Self::ANY,
        };

        if is_any {
            Ok(Self::Any)
        } else {
            Ok(Self::Only(values))
        }
    }

    /// Check whether this is the `any` sentinel
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Check whether a value is accepted by this selection
    pub fn admits(&self, value: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Only(values) => values.iter().any(|v| v == value),
        }
    }

    /// Explicit values (empty for `Any`)
    pub fn values(&self) -> &[String] {
        match self {
            Self::Any => &[],
            Self::Only(values) => values,
        }
    }
}

/// Comma-and-space joined, as shown to a partner
impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(Self::ANY),
            Self::Only(values) => f.write_str(&values.join(", ")),
        }
    }
}

/// Validated matching preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    /// Own gender
    pub gender: String,
    /// Own species
    pub species: String,
    /// Own kinks, also used as the kink filter
    pub kinks: Selection,
    /// Genders this client wants to meet
    pub match_gender: Selection,
    /// Species this client wants to meet
    pub match_species: Selection,
}

impl Preferences {
    fn required(field: &'static str, value: Option<String>) -> Result<String, PreferencesError> {
        let value = value.ok_or(PreferencesError::Missing(field))?;
        if value.trim().is_empty() {
            return Err(PreferencesError::Empty(field));
        }
        Ok(value)
    }
}

impl TryFrom<RawPreferences> for Preferences {
    type Error = PreferencesError;

    fn try_from(raw: RawPreferences) -> Result<Self, Self::Error> {
        Ok(Self {
            gender: Self::required("gender", raw.gender)?,
            species: Self::required("species", raw.species)?,
            kinks: Selection::parse("kinks", raw.kinks)?,
            match_gender: Selection::parse("matchGender", raw.match_gender)?,
            match_species: Selection::parse("matchSpecies", raw.match_species)?,
        })
    }
}

impl TryFrom<PreferencesPayload> for Preferences {
    type Error = PreferencesError;

    fn try_from(payload: PreferencesPayload) -> Result<Self, Self::Error> {
        RawPreferences::from(payload).try_into()
    }
}

/// Unvalidated preferences as received from a client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPreferences {
    pub gender: Option<String>,
    pub species: Option<String>,
    pub kinks: Option<Vec<String>>,
    pub match_gender: Option<Vec<String>>,
    pub match_species: Option<Vec<String>>,
}

/// Accepted layouts for the `preferences` field of a seek request
///
/// `Positional` is the five-element form older clients send:
/// `[{gender}, {species}, {kinks}, {matchGender}, {matchSpecies}]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PreferencesPayload {
    Positional(Vec<RawPreferences>),
    Named(RawPreferences),
}

impl From<PreferencesPayload> for RawPreferences {
    fn from(payload: PreferencesPayload) -> Self {
        match payload {
            PreferencesPayload::Named(raw) => raw,
            PreferencesPayload::Positional(mut parts) => {
                let mut take = |i: usize| parts.get_mut(i).map(std::mem::take).unwrap_or_default();
                Self {
                    gender: take(0).gender,
                    species: take(1).species,
                    kinks: take(2).kinks,
                    match_gender: take(3).match_gender,
                    match_species: take(4).match_species,
                }
            }
        }
    }
}
