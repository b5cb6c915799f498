//! Creates the application's database schema.

use rusqlite::Connection;

use crate::{
    category::create_category_table, invoice::create_invoice_table,
    profile::create_profile_table, service::create_service_table,
    transaction::create_transaction_table,
};

/// Enable foreign keys and create the tables for the domain models if they do
/// not exist yet.
///
/// Foreign key enforcement is a per-connection setting in SQLite, so every
/// connection the app uses should be passed through this function.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    // Parents before children so that the foreign keys resolve.
    create_profile_table(connection)?;
    create_service_table(connection)?;
    create_category_table(connection)?;
    create_invoice_table(connection)?;
    create_transaction_table(connection)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Could not initialize database a second time");
    }

    #[test]
    fn initialize_enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let enabled: bool = connection
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();

        assert!(enabled);
    }
}
