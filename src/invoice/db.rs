//! Database operations for invoices.

use std::collections::BTreeSet;

use rusqlite::{Connection, OptionalExtension, Row};
use time::Date;

use crate::{
    Error,
    invoice::Invoice,
    profile::ProfileId,
    transaction::TransactionId,
};

/// Create an invoice for `profile_id` that bills the incomes in `income_ids`.
///
/// Either every income is attached to the new invoice or nothing is stored.
///
/// # Errors
///
/// - [Error::EmptyInvoice] if `income_ids` is empty.
/// - [Error::InvalidIncome] if an ID is not an uninvoiced income of the profile.
pub fn create_invoice(
    profile_id: ProfileId,
    income_ids: &[TransactionId],
    date: Date,
    connection: &Connection,
) -> Result<Invoice, Error> {
    let income_ids = income_ids.iter().copied().collect::<BTreeSet<_>>();

    if income_ids.is_empty() {
        return Err(Error::EmptyInvoice);
    }

    // Dropping the transaction without committing rolls it back.
    let transaction = connection.unchecked_transaction()?;

    transaction.execute(
        "INSERT INTO invoice (profile_id, date, total) VALUES (?1, ?2, 0)",
        (profile_id, date),
    )?;
    let invoice_id = transaction.last_insert_rowid();

    let mut total = 0.0;

    for income_id in income_ids {
        let amount: Option<f64> = transaction
            .query_row(
                "UPDATE \"transaction\" SET invoice_id = ?1
                WHERE id = ?2 AND profile_id = ?3 AND kind = 'income' AND invoice_id IS NULL
                RETURNING amount",
                (invoice_id, income_id, profile_id),
                |row| row.get(0),
            )
            .optional()?;

        match amount {
            Some(amount) => total += amount,
            None => return Err(Error::InvalidIncome(income_id)),
        }
    }

    transaction.execute(
        "UPDATE invoice SET total = ?1 WHERE id = ?2",
        (total, invoice_id),
    )?;
    transaction.commit()?;

    Ok(Invoice {
        id: invoice_id,
        profile_id,
        date,
        total,
    })
}

/// The invoices of `profile_id`, newest first.
pub fn get_invoices(profile_id: ProfileId, connection: &Connection) -> Result<Vec<Invoice>, Error> {
    connection
        .prepare(
            "SELECT id, profile_id, date, total FROM invoice
            WHERE profile_id = ?1
            ORDER BY date DESC, id DESC",
        )?
        .query_map([profile_id], map_invoice_row)?
        .map(|maybe_invoice| maybe_invoice.map_err(|error| error.into()))
        .collect()
}

/// Initialize the invoice table.
pub fn create_invoice_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS invoice (
            id INTEGER PRIMARY KEY,
            profile_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            total REAL NOT NULL,
            FOREIGN KEY(profile_id) REFERENCES profile(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_invoice_profile_id ON invoice(profile_id);",
    )?;

    Ok(())
}

fn map_invoice_row(row: &Row) -> Result<Invoice, rusqlite::Error> {
    Ok(Invoice {
        id: row.get(0)?,
        profile_id: row.get(1)?,
        date: row.get(2)?,
        total: row.get(3)?,
    })
}
