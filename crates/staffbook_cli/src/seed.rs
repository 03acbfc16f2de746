//! Database bootstrap with sample employee rows.
//!
//! Recreates the database file from scratch; an existing file is only
//! overwritten after confirmation (or `--force`).

use log::info;
use staffbook_core::db::open_db;
use staffbook_core::{EmployeeRepository, SqliteEmployeeRepository};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Canonical sample fixture: 10 employees across 4 departments, unique
/// phone numbers.
const SAMPLE_EMPLOYEES: [(&str, &str, &str, &str); 10] = [
    ("John", "Doe", "Engineering", "555-0101"),
    ("Jane", "Smith", "Marketing", "555-0102"),
    ("Mike", "Johnson", "Engineering", "555-0103"),
    ("Sarah", "Williams", "HR", "555-0104"),
    ("David", "Brown", "Finance", "555-0105"),
    ("Lisa", "Davis", "Marketing", "555-0106"),
    ("Tom", "Wilson", "Engineering", "555-0107"),
    ("Amy", "Garcia", "HR", "555-0108"),
    ("Chris", "Martinez", "Finance", "555-0109"),
    ("Emma", "Anderson", "Marketing", "555-0110"),
];

pub fn run(db_path: &Path, force: bool) -> Result<(), Box<dyn Error>> {
    if db_path.exists() {
        if !force && !confirm_recreate(db_path)? {
            println!("Seed cancelled.");
            return Ok(());
        }
        std::fs::remove_file(db_path)?;
    }

    let conn = open_db(db_path)?;
    let repo = SqliteEmployeeRepository::try_new(&conn)?;
    for (first_name, last_name, department, phone_number) in SAMPLE_EMPLOYEES {
        repo.insert(first_name, last_name, department, phone_number)?;
    }

    info!(
        "event=seed module=cli status=ok db={} rows={}",
        db_path.display(),
        SAMPLE_EMPLOYEES.len()
    );
    println!(
        "Seeded '{}' with {} sample employees.",
        db_path.display(),
        SAMPLE_EMPLOYEES.len()
    );
    Ok(())
}

fn confirm_recreate(db_path: &Path) -> io::Result<bool> {
    print!(
        "Database '{}' already exists. Recreate it? This will delete all existing data! (yes/no): ",
        db_path.display()
    );
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(matches!(line.trim().to_lowercase().as_str(), "yes" | "y"))
}
