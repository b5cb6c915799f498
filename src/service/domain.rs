//! Core service domain types.

use serde::{Deserialize, Serialize};

use crate::profile::{Profile, ProfileId};

/// Database identifier for a service.
pub type ServiceId = i64;

/// A billable offering that belongs to exactly one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// The service's database ID.
    pub id: ServiceId,
    /// The display name.
    pub name: String,
    /// Optional details shown next to the name.
    pub description: Option<String>,
    /// The price in the owning profile's currency.
    pub price: f64,
    /// The profile that offers the service.
    pub profile_id: ProfileId,
}

/// The fields needed to create a [Service].
#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    /// The display name.
    pub name: String,
    /// Optional details shown next to the name.
    pub description: Option<String>,
    /// The price in the owning profile's currency.
    pub price: f64,
    /// The profile that offers the service.
    pub profile_id: ProfileId,
}

/// A service together with the profile that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceWithProfile {
    /// The service.
    #[serde(flatten)]
    pub service: Service,
    /// The profile referenced by `service.profile_id`.
    pub profile: Profile,
}
