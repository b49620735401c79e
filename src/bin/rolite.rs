//! # rolite CLI Entry Point
//!
//! Small diagnostic tool over the reader library.
//!
//! ## Usage
//!
//! ```bash
//! # Header parameters
//! rolite ./chinook.db info
//!
//! # List tables and indexes
//! rolite ./chinook.db schema
//!
//! # Dump a table or index, tab-separated
//! rolite ./chinook.db dump Album
//! ```

use std::env;

use eyre::{bail, Result, WrapErr};
use rolite::{Database, ObjectKind};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }
    if args[1] == "--version" || args[1] == "-v" {
        println!("rolite {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let path = &args[1];
    let command = args.get(2).map(String::as_str).unwrap_or("info");

    let db = Database::open(path).wrap_err_with(|| format!("failed to open '{}'", path))?;

    match command {
        "info" => info(&db),
        "schema" => schema(&db),
        "dump" => {
            let Some(name) = args.get(3) else {
                bail!("dump requires an object name");
            };
            dump(&db, name)
        }
        other => bail!("unknown command: {}", other),
    }
}

fn info(db: &Database) -> Result<()> {
    println!("page size:       {}", db.page_size());
    println!("pages:           {}", db.num_pages());
    println!("encoding:        {:?}", db.encoding());
    println!("library version: {}", db.library_version());
    Ok(())
}

fn schema(db: &Database) -> Result<()> {
    for object in db.schema()? {
        let columns = object.columns();
        let detail = match object.kind() {
            ObjectKind::Table => format!("{} columns", columns.len()),
            ObjectKind::Index => format!("on {}", object.table_name()),
        };
        println!(
            "{:<6} {:<30} root={:<5} {}",
            object.kind().as_str(),
            object.name(),
            object.root_page(),
            detail
        );
    }
    Ok(())
}

fn dump(db: &Database, name: &str) -> Result<()> {
    let object = db.object(name)?;
    let mut rows = 0u64;

    object.for_each(|record| {
        let mut line = String::new();
        if let Some(rowid) = record.rowid() {
            line.push_str(&rowid.to_string());
        }
        for i in 0..record.num_values() {
            if !line.is_empty() {
                line.push('\t');
            }
            line.push_str(&record.value_at(i)?.to_string());
        }
        println!("{}", line);
        rows += 1;
        Ok(())
    })?;

    eprintln!("{} rows", rows);
    Ok(())
}

fn print_usage() {
    println!("Usage: rolite <database> [command]");
    println!();
    println!("Commands:");
    println!("  info           Show header parameters (default)");
    println!("  schema         List tables and indexes");
    println!("  dump <name>    Print rows of a table or entries of an index");
    println!();
    println!("Options:");
    println!("  -h, --help     Show this help");
    println!("  -v, --version  Show version");
}
