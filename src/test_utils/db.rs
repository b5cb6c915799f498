use rusqlite::Connection;

use crate::{
    db::initialize,
    profile::{Profile, ProfileType, create_profile},
};

/// An in-memory database with the full schema and foreign keys enabled.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

#[track_caller]
pub(crate) fn must_create_profile(
    name: &str,
    profile_type: ProfileType,
    connection: &Connection,
) -> Profile {
    create_profile(name, profile_type, "BRL", connection).expect("Could not create test profile")
}
