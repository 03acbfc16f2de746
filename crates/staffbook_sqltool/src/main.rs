//! Raw-SQL inspection tool speaking line-oriented JSON over stdio.
//!
//! # Responsibility
//! - Give external agents ad hoc read/execute access to the employee
//!   database, bypassing the directory service.
//! - Answer every request line with exactly one JSON response line.
//!
//! # Invariants
//! - Never used for domain-level correctness; the coordinator's validation
//!   does not run here.
//! - Malformed input produces an error response, never a crash.

mod protocol;

use clap::Parser;
use staffbook_core::db::open_db;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "staffbook-sqltool",
    about = "Raw SQL access to the employee database over stdio JSON",
    version
)]
struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, default_value = "staffbook.db")]
    db: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli.db) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &Path) -> Result<(), Box<dyn Error>> {
    let conn = open_db(db_path)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = protocol::handle_line(&conn, &line);
        serde_json::to_writer(&mut out, &response)?;
        out.write_all(b"\n")?;
        out.flush()?;
    }

    Ok(())
}
