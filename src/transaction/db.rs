//! Database operations for transactions.

use rusqlite::{Connection, Row, types::Type};

use crate::{
    Error,
    profile::ProfileId,
    transaction::{NewTransaction, Transaction, TransactionId, TransactionKind},
};

const TRANSACTION_COLUMNS: &str =
    "id, kind, amount, date, description, profile_id, category_id, invoice_id";

/// Record a transaction and return it with its generated ID.
///
/// Fails with [Error::InvalidAmount] if the amount is not a finite number
/// greater than zero, or [Error::InvalidForeignKey] if the profile or category
/// does not exist.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if !(transaction.amount.is_finite() && transaction.amount > 0.0) {
        return Err(Error::InvalidAmount(transaction.amount));
    }

    connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (kind, amount, date, description, profile_id, category_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                transaction.kind.as_str(),
                transaction.amount,
                transaction.date,
                transaction.description,
                transaction.profile_id,
                transaction.category_id,
            ),
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single transaction by ID.
pub fn get_transaction(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &transaction_id)], map_transaction_row)
        .map_err(|error| error.into())
}

/// The incomes of `profile_id` that are not on an invoice yet, newest first.
pub fn get_uninvoiced_incomes(
    profile_id: ProfileId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
            WHERE profile_id = ?1 AND kind = 'income' AND invoice_id IS NULL
            ORDER BY date DESC, id DESC"
        ))?
        .query_map([profile_id], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Initialize the transaction table.
///
/// The profile, expense category and invoice tables must exist first.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
            amount REAL NOT NULL CHECK (amount > 0),
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            profile_id INTEGER NOT NULL,
            category_id INTEGER,
            invoice_id INTEGER,
            FOREIGN KEY(profile_id) REFERENCES profile(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES expense_category(id) ON UPDATE CASCADE ON DELETE SET NULL,
            FOREIGN KEY(invoice_id) REFERENCES invoice(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_profile_kind_invoice
            ON \"transaction\"(profile_id, kind, invoice_id);",
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_kind: String = row.get(1)?;
    let kind = raw_kind.parse::<TransactionKind>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error))
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        kind,
        amount: row.get(2)?,
        date: row.get(3)?,
        description: row.get(4)?,
        profile_id: row.get(5)?,
        category_id: row.get(6)?,
        invoice_id: row.get(7)?,
    })
}
