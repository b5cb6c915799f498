//! Database operations for profiles.

use rusqlite::{Connection, OptionalExtension, Row, types::Type};

use crate::{
    Error,
    profile::{Profile, ProfileId, ProfileType},
};

/// The fields to change when an upserted profile already exists.
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    /// The new display name.
    pub name: Option<String>,
    /// The new profile type.
    pub profile_type: Option<ProfileType>,
    /// The new currency code.
    pub currency: Option<String>,
}

/// Create a profile and return it with its generated ID.
pub fn create_profile(
    name: &str,
    profile_type: ProfileType,
    currency: &str,
    connection: &Connection,
) -> Result<Profile, Error> {
    connection.execute(
        "INSERT INTO profile (name, type, currency) VALUES (?1, ?2, ?3);",
        (name, profile_type.as_str(), currency),
    )?;

    Ok(Profile {
        id: connection.last_insert_rowid(),
        name: name.to_owned(),
        profile_type,
        currency: currency.to_owned(),
    })
}

/// Retrieve a single profile by ID.
pub fn get_profile(profile_id: ProfileId, connection: &Connection) -> Result<Profile, Error> {
    connection
        .prepare("SELECT id, name, type, currency FROM profile WHERE id = :id;")?
        .query_row(&[(":id", &profile_id)], |row| map_profile_row(row, 0))
        .map_err(|error| error.into())
}

/// Retrieve all profiles ordered by ID.
pub fn get_all_profiles(connection: &Connection) -> Result<Vec<Profile>, Error> {
    connection
        .prepare("SELECT id, name, type, currency FROM profile ORDER BY id ASC;")?
        .query_map([], |row| map_profile_row(row, 0))?
        .map(|maybe_profile| maybe_profile.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the profile of `profile_type` with the lowest ID, if there is one.
pub fn find_first_profile_by_type(
    profile_type: ProfileType,
    connection: &Connection,
) -> Result<Option<Profile>, Error> {
    connection
        .prepare(
            "SELECT id, name, type, currency FROM profile
            WHERE type = ?1 ORDER BY id ASC LIMIT 1;",
        )?
        .query_row([profile_type.as_str()], |row| map_profile_row(row, 0))
        .optional()
        .map_err(|error| error.into())
}

/// Insert `profile` with its ID, or apply `update` if a profile with that ID
/// already exists. Returns the stored profile.
pub fn upsert_profile(
    profile: &Profile,
    update: &ProfileUpdate,
    connection: &Connection,
) -> Result<Profile, Error> {
    connection.execute(
        "INSERT INTO profile (id, name, type, currency) VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(id) DO UPDATE SET
            name = COALESCE(?5, name),
            type = COALESCE(?6, type),
            currency = COALESCE(?7, currency);",
        (
            profile.id,
            &profile.name,
            profile.profile_type.as_str(),
            &profile.currency,
            update.name.as_deref(),
            update.profile_type.map(|profile_type| profile_type.as_str()),
            update.currency.as_deref(),
        ),
    )?;

    get_profile(profile.id, connection)
}

/// Delete every profile of `profile_type`, returning how many were deleted.
///
/// The profiles' services, categories, transactions and invoices are deleted with them.
pub fn delete_profiles_by_type(
    profile_type: ProfileType,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM profile WHERE type = ?1", [profile_type.as_str()])
        .map_err(|error| error.into())
}

/// Initialize the profile table.
pub fn create_profile_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS profile (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('personal', 'business')),
            currency TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_profile_type ON profile(type);",
    )?;

    Ok(())
}

/// Map the four profile columns starting at `offset`.
///
/// Queries that join the profile onto another table use the offset to skip
/// the other table's columns.
pub(crate) fn map_profile_row(row: &Row, offset: usize) -> Result<Profile, rusqlite::Error> {
    let raw_type: String = row.get(offset + 2)?;
    let profile_type = raw_type.parse::<ProfileType>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(offset + 2, Type::Text, Box::new(error))
    })?;

    Ok(Profile {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        profile_type,
        currency: row.get(offset + 3)?,
    })
}
