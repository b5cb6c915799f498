//! Write the default profiles under fixed IDs: 1 for personal and 2 for business.

use std::{error::Error, process::exit};

use clap::Parser;
use rusqlite::Connection;

use finbook_rs::{initialize_db, profile::upsert_default_profiles};

/// Insert the default profiles with IDs 1 and 2, leaving existing rows untouched.
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

    if let Err(error) = upsert_profiles(&args.db_path) {
        tracing::error!("Could not upsert profiles: {error}");
        exit(1);
    }
}

fn upsert_profiles(db_path: &str) -> Result<(), Box<dyn Error>> {
    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;

    for profile in upsert_default_profiles(&connection)? {
        tracing::info!(
            "Profile {} is \"{}\" ({}, {})",
            profile.id,
            profile.name,
            profile.profile_type,
            profile.currency
        );
    }

    Ok(())
}
