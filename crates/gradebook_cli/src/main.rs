//! Gradebook command line.
//!
//! # Responsibility
//! - Wire `gradebook_core` repositories to a local SQLite record store.
//! - Render repository results as JSON and failure notices on stderr.
//!
//! Configuration comes from `GRADEBOOK_DB_PATH`, `GRADEBOOK_LOG_DIR` and
//! `GRADEBOOK_LOG_LEVEL`; without a database path the store lives in memory.

use clap::{Parser, Subcommand, ValueEnum};
use gradebook_core::{
    init_logging, table_schemas, CoreConfig, Entity, GradebookService, Notifier, RecordClient,
    RecordId, Repository, SqliteRecordClient, StudentDraft,
};
use log::info;
use serde::Serialize;
use std::error::Error;
use std::sync::Arc;

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "gradebook", about = "School gradebook record tool", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every record of a table
    List { table: Table },

    /// Show one record
    Get { table: Table, id: RecordId },

    /// Delete one record
    Delete { table: Table, id: RecordId },

    /// Enroll a new student
    AddStudent {
        name: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        /// Numeric grade level
        #[arg(long)]
        grade_level: String,

        #[arg(long, default_value = "")]
        section: String,

        #[arg(long, default_value = "")]
        enrollment_date: String,

        #[arg(long, default_value = "active")]
        status: String,
    },

    /// Record a student's attendance for a day, replacing any earlier mark
    MarkAttendance {
        student_id: i64,

        /// Day in YYYY-MM-DD form
        date: String,

        status: String,

        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Table {
    Student,
    Class,
    Grade,
    Attendance,
}

/// Prints repository notices on stderr.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn error(&self, message: &str) {
        eprintln!("notice: {message}");
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> CliResult {
    let config = CoreConfig::from_env()?;
    if let Some(dir) = &config.log_dir {
        init_logging(config.log_level, &dir.to_string_lossy())?;
    }

    let client = match &config.database_path {
        Some(path) => SqliteRecordClient::open(path, table_schemas())?,
        None => SqliteRecordClient::open_in_memory(table_schemas())?,
    };
    let service = GradebookService::new(Arc::new(client), Arc::new(StderrNotifier));
    info!("event=cli_command module=cli status=start");

    match command {
        Commands::List { table } => match table {
            Table::Student => list(service.students()).await,
            Table::Class => list(service.classes()).await,
            Table::Grade => list(service.grades()).await,
            Table::Attendance => list(service.attendance()).await,
        },
        Commands::Get { table, id } => match table {
            Table::Student => show(service.students(), id).await,
            Table::Class => show(service.classes(), id).await,
            Table::Grade => show(service.grades(), id).await,
            Table::Attendance => show(service.attendance(), id).await,
        },
        Commands::Delete { table, id } => {
            match table {
                Table::Student => service.students().delete(id).await?,
                Table::Class => service.classes().delete(id).await?,
                Table::Grade => service.grades().delete(id).await?,
                Table::Attendance => service.attendance().delete(id).await?,
            };
            println!("deleted {id}");
            Ok(())
        }
        Commands::AddStudent {
            name,
            email,
            phone,
            grade_level,
            section,
            enrollment_date,
            status,
        } => {
            let draft = StudentDraft {
                name,
                email,
                phone,
                grade_level: grade_level.into(),
                section,
                enrollment_date,
                status,
                ..StudentDraft::default()
            };
            print_json(&service.students().create(&draft).await?)
        }
        Commands::MarkAttendance {
            student_id,
            date,
            status,
            reason,
        } => {
            let marked = service
                .mark_attendance(student_id, &date, &status, reason.as_deref())
                .await?;
            print_json(&marked)
        }
    }
}

async fn list<E, C>(repo: &Repository<E, C>) -> CliResult
where
    E: Entity + Serialize,
    C: RecordClient + ?Sized,
{
    print_json(&repo.get_all().await)
}

async fn show<E, C>(repo: &Repository<E, C>, id: RecordId) -> CliResult
where
    E: Entity + Serialize,
    C: RecordClient + ?Sized,
{
    print_json(&repo.get_by_id(id).await?)
}

fn print_json(value: &impl Serialize) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
