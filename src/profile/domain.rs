//! Core profile domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Database identifier for a profile.
pub type ProfileId = i64;

/// Whether a profile tracks personal or business finances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    /// Personal finances.
    Personal,
    /// The finances of a business.
    Business,
}

impl ProfileType {
    /// The value stored in the database, "personal" or "business".
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::Personal => "personal",
            ProfileType::Business => "business",
        }
    }
}

impl FromStr for ProfileType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(ProfileType::Personal),
            "business" => Ok(ProfileType::Business),
            other => Err(Error::InvalidProfileType(other.to_owned())),
        }
    }
}

impl Display for ProfileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An identity grouping services, expense categories, transactions and invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// The unique, stable ID of the profile.
    pub id: ProfileId,
    /// The display name, e.g. "Personal".
    pub name: String,
    /// Whether this is a personal or business profile.
    #[serde(rename = "type")]
    pub profile_type: ProfileType,
    /// The currency code amounts are recorded in, e.g. "BRL".
    pub currency: String,
}
