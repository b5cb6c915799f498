//! Make sure a personal and a business profile exist, creating whichever is missing.

use std::{error::Error, process::exit};

use clap::Parser;
use rusqlite::Connection;

use finbook_rs::{
    initialize_db,
    profile::{SeedOutcome, seed_default_profiles},
};

/// Create the default personal and business profiles if they do not exist yet.
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

    if let Err(error) = seed_profiles(&args.db_path) {
        tracing::error!("Could not seed profiles: {error}");
        exit(1);
    }
}

fn seed_profiles(db_path: &str) -> Result<(), Box<dyn Error>> {
    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;

    for outcome in seed_default_profiles(&connection)? {
        match outcome {
            SeedOutcome::Existing(profile) => tracing::info!(
                "Found {} profile \"{}\" with ID {}",
                profile.profile_type,
                profile.name,
                profile.id
            ),
            SeedOutcome::Created(profile) => tracing::info!(
                "Created {} profile \"{}\" with ID {}",
                profile.profile_type,
                profile.name,
                profile.id
            ),
        }
    }

    Ok(())
}
