//! Database operations for expense categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{CategoryId, CategoryName, CategoryUpdate, CategoryWithProfile, ExpenseCategory},
    profile::{ProfileId, map_profile_row},
};

/// Insert a category and return it with its generated ID.
pub(super) fn insert_category(
    name: CategoryName,
    profile_id: ProfileId,
    connection: &Connection,
) -> Result<ExpenseCategory, Error> {
    connection.execute(
        "INSERT INTO expense_category (name, profile_id) VALUES (?1, ?2);",
        (name.as_ref(), profile_id),
    )?;

    Ok(ExpenseCategory {
        id: connection.last_insert_rowid(),
        name,
        profile_id,
    })
}

/// Retrieve a single expense category by ID.
pub fn get_category(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<ExpenseCategory, Error> {
    connection
        .prepare("SELECT id, name, profile_id FROM expense_category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_category_row)
        .map_err(|error| error.into())
}

/// Retrieve the categories of `profile_id`, or of every profile if `None`,
/// ordered by name with ties broken by ID.
pub(super) fn select_categories(
    profile_id: Option<ProfileId>,
    connection: &Connection,
) -> Result<Vec<CategoryWithProfile>, Error> {
    connection
        .prepare(
            "SELECT c.id, c.name, c.profile_id, p.id, p.name, p.type, p.currency
            FROM expense_category c
            INNER JOIN profile p ON p.id = c.profile_id
            WHERE ?1 IS NULL OR c.profile_id = ?1
            ORDER BY c.name ASC, c.id ASC;",
        )?
        .query_map([profile_id], |row| {
            Ok(CategoryWithProfile {
                category: map_category_row(row)?,
                profile: map_profile_row(row, 3)?,
            })
        })?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Apply `update` to a category, returning the number of rows matched.
pub(super) fn update_category_row(
    category_id: CategoryId,
    update: &CategoryUpdate,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            "UPDATE expense_category SET name = COALESCE(?2, name) WHERE id = ?1",
            (
                category_id,
                update.name.as_ref().map(|name| name.as_ref()),
            ),
        )
        .map_err(|error| error.into())
}

/// Delete a category, returning the number of rows deleted.
pub(super) fn delete_category_row(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM expense_category WHERE id = ?1",
            [category_id],
        )
        .map_err(|error| error.into())
}

/// The number of expense categories owned by `profile_id`.
pub fn count_categories(profile_id: ProfileId, connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row(
            "SELECT COUNT(*) FROM expense_category WHERE profile_id = ?1",
            [profile_id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Initialize the expense category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense_category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            profile_id INTEGER NOT NULL,
            FOREIGN KEY(profile_id) REFERENCES profile(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_expense_category_profile_id ON expense_category(profile_id);",
    )?;

    Ok(())
}

fn map_category_row(row: &Row) -> Result<ExpenseCategory, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(ExpenseCategory {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&raw_name),
        profile_id: row.get(2)?,
    })
}
