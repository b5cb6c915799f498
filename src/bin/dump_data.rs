//! Print every profile and service as JSON.

use std::{error::Error, process::exit};

use clap::Parser;
use rusqlite::Connection;
use serde::Serialize;

use finbook_rs::{
    initialize_db,
    profile::{Profile, get_all_profiles},
    service::{ServiceWithProfile, get_services},
};

/// Dump the profiles and services in the database to stdout as JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DATABASE_PATH")]
    db_path: String,
}

#[derive(Serialize)]
struct Dump {
    profiles: Vec<Profile>,
    services: Vec<ServiceWithProfile>,
}

fn main() {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match dump_data(&args.db_path) {
        Ok(json) => println!("{json}"),
        Err(error) => {
            tracing::error!("Could not dump data: {error}");
            exit(1);
        }
    }
}

fn dump_data(db_path: &str) -> Result<String, Box<dyn Error>> {
    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;

    let dump = Dump {
        profiles: get_all_profiles(&connection)?,
        services: get_services(&connection)?,
    };

    Ok(serde_json::to_string_pretty(&dump)?)
}
