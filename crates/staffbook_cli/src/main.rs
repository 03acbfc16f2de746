//! Console entry point for the employee directory.
//!
//! # Responsibility
//! - Parse arguments, bootstrap logging and the database connection, and
//!   hand control to the interactive menu or the seed path.
//! - Keep all rendering decisions in `menu`; this file only wires layers.

mod menu;
mod seed;

use clap::{Parser, Subcommand};
use staffbook_core::db::open_db;
use staffbook_core::{default_log_level, init_logging, EmployeeService, SqliteEmployeeRepository};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "staffbook", about = "Employee record manager", version)]
struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, default_value = "staffbook.db")]
    db: PathBuf,

    /// Directory for rotating log files; logging stays off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level override (trace|debug|info|warn|error).
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Recreate the database with sample employee rows.
    Seed {
        /// Overwrite an existing database file without asking.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        if let Err(err) = init_file_logging(level, dir) {
            // The directory tool still works without file logging.
            eprintln!("Warning: {err}");
        }
    }

    let result = match &cli.command {
        Some(Command::Seed { force }) => seed::run(&cli.db, *force),
        None => run_menu(&cli.db),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=app_exit module=cli status=error error={err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_menu(db_path: &Path) -> Result<(), Box<dyn Error>> {
    if !db_path.exists() {
        return Err(format!(
            "database file '{}' not found; run `staffbook seed --db {}` to create a sample database",
            db_path.display(),
            db_path.display()
        )
        .into());
    }

    let conn = open_db(db_path)?;
    let repo = SqliteEmployeeRepository::try_new(&conn)?;
    let service = EmployeeService::new(repo);
    menu::run(&service)?;
    Ok(())
}

fn init_file_logging(level: &str, dir: &Path) -> Result<(), String> {
    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|err| format!("cannot resolve log directory: {err}"))?
            .join(dir)
    };
    init_logging(level, absolute)
}
