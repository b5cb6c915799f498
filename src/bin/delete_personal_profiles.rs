//! Delete every personal profile along with the data it owns.

use std::{error::Error, process::exit};

use clap::Parser;
use rusqlite::Connection;

use finbook_rs::{
    initialize_db,
    profile::{ProfileType, delete_profiles_by_type},
};

/// Delete all personal profiles and their services, categories, transactions and invoices.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DATABASE_PATH")]
    db_path: String,
}

fn main() {
    tracing_subscriber::fmt().compact().init();

    let args = Args::parse();

    match delete_personal_profiles(&args.db_path) {
        Ok(count) => tracing::info!("Deleted {count} personal profile(s)"),
        Err(error) => {
            tracing::error!("Could not delete personal profiles: {error}");
            exit(1);
        }
    }
}

fn delete_personal_profiles(db_path: &str) -> Result<usize, Box<dyn Error>> {
    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;

    Ok(delete_profiles_by_type(ProfileType::Personal, &connection)?)
}
