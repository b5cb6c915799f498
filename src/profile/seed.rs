//! The default profiles every installation starts with.
//!
//! There are two ways of ensuring they exist. [seed_default_profiles] looks the
//! profiles up by type, [upsert_default_profiles] writes them under fixed IDs.
//! They can disagree about which IDs exist, so they are kept as separate
//! operations.

use rusqlite::Connection;

use crate::{
    Error,
    profile::{
        Profile, ProfileType, ProfileUpdate, create_profile, find_first_profile_by_type,
        upsert_profile,
    },
};

/// The currency of the default profiles.
pub const DEFAULT_CURRENCY: &str = "BRL";

/// The outcome of ensuring a default profile exists.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedOutcome {
    /// The profile was already in the database.
    Existing(Profile),
    /// The profile was created.
    Created(Profile),
}

fn default_profiles() -> [Profile; 2] {
    [
        Profile {
            id: 1,
            name: "Personal".to_owned(),
            profile_type: ProfileType::Personal,
            currency: DEFAULT_CURRENCY.to_owned(),
        },
        Profile {
            id: 2,
            name: "Business".to_owned(),
            profile_type: ProfileType::Business,
            currency: DEFAULT_CURRENCY.to_owned(),
        },
    ]
}

/// Create a personal and a business profile unless a profile of that type
/// already exists.
pub fn seed_default_profiles(connection: &Connection) -> Result<Vec<SeedOutcome>, Error> {
    default_profiles()
        .into_iter()
        .map(|profile| {
            match find_first_profile_by_type(profile.profile_type, connection)? {
                Some(existing) => Ok(SeedOutcome::Existing(existing)),
                None => create_profile(
                    &profile.name,
                    profile.profile_type,
                    &profile.currency,
                    connection,
                )
                .map(SeedOutcome::Created),
            }
        })
        .collect()
}

/// Write the personal profile with ID 1 and the business profile with ID 2,
/// keeping any existing rows with those IDs as they are.
pub fn upsert_default_profiles(connection: &Connection) -> Result<Vec<Profile>, Error> {
    default_profiles()
        .iter()
        .map(|profile| upsert_profile(profile, &ProfileUpdate::default(), connection))
        .collect()
}
