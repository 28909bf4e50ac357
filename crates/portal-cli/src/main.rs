//! Command-line entry point for the student portal.
//!
//! Each invocation performs one logical operation against the store and
//! prints its outcome as one line of JSON on stdout. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Parse arguments
//! 2. Load configuration from `portal-config.yaml` (`DATABASE_URL` wins)
//! 3. Initialize structured logging (tracing)
//! 4. Connect the `PostgreSQL` pool (fatal on failure)
//! 5. Apply migrations if configured or requested
//! 6. Run the command and print its outcome

mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use portal_core::Portal;
use portal_core::config::{LoggingConfig, PortalConfig};
use portal_db::{PostgresConfig, PostgresPool};
use portal_types::{CourseCode, RegistrationStatus, StudentId};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Student portal: enrollment ledger and student documents.
#[derive(Debug, Parser)]
#[command(name = "portal", version, about)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "portal-config.yaml")]
    config: PathBuf,

    /// Operation to run.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a student on a course.
    Register {
        /// Student identity number.
        student: String,
        /// Course code.
        course: String,
        /// Status decided by the capacity policy.
        #[arg(long, value_enum, default_value_t = StatusArg::Registered)]
        status: StatusArg,
    },
    /// Remove a student from a course, seated or waiting.
    Unregister {
        /// Student identity number.
        student: String,
        /// Course code.
        course: String,
    },
    /// Print the student document.
    Info {
        /// Student identity number.
        student: String,
    },
    /// Print a student's waitlist position on a course.
    Position {
        /// Student identity number.
        student: String,
        /// Course code.
        course: String,
    },
    /// Print the ranked waitlist of a course.
    Waitlist {
        /// Course code.
        course: String,
    },
    /// Move a waiting student onto the course.
    Promote {
        /// Student identity number.
        student: String,
        /// Course code.
        course: String,
    },
    /// Apply pending migrations and exit.
    Migrate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    Registered,
    Waiting,
}

impl From<StatusArg> for RegistrationStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Registered => Self::Registered,
            StatusArg::Waiting => Self::Waiting,
        }
    }
}

#[derive(Debug, Serialize)]
struct PositionOutput<'a> {
    student: &'a StudentId,
    course: &'a CourseCode,
    position: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WaitlistEntryOutput<'a> {
    student: &'a StudentId,
    position: u32,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, connection or migration fails, or if
/// a read without an outcome document fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = PortalConfig::load(&cli.config).map_err(CliError::from)?;
    init_logging(&config.logging);
    info!(
        config = %cli.config.display(),
        max_connections = config.database.max_connections,
        run_migrations = config.database.run_migrations,
        "portal starting"
    );

    let pool = PostgresPool::connect(&PostgresConfig::from(&config.database))
        .await
        .map_err(CliError::from)?;

    let result = run(&cli.command, &config, pool.clone()).await;
    pool.close().await;

    let output = result?;
    println!("{output}");
    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(
    command: &Command,
    config: &PortalConfig,
    pool: PostgresPool,
) -> Result<String, CliError> {
    if config.database.run_migrations || matches!(command, Command::Migrate) {
        pool.run_migrations().await?;
    }

    let portal = Portal::new(pool);
    let output = match command {
        Command::Register {
            student,
            course,
            status,
        } => portal
            .register_with_status(
                &student.as_str().into(),
                &course.as_str().into(),
                (*status).into(),
            )
            .await
            .to_json()?,
        Command::Unregister { student, course } => portal
            .unregister(&student.as_str().into(), &course.as_str().into())
            .await
            .to_json()?,
        Command::Info { student } => portal
            .student_document(&student.as_str().into())
            .await
            .to_json()?,
        Command::Position { student, course } => {
            let student = StudentId::from(student.as_str());
            let course = CourseCode::from(course.as_str());
            let position = portal.position_of(&student, &course).await?;
            serde_json::to_string(&PositionOutput {
                student: &student,
                course: &course,
                position,
            })?
        }
        Command::Waitlist { course } => {
            let waitlist = portal.waitlist(&course.as_str().into()).await?;
            let entries: Vec<WaitlistEntryOutput<'_>> = waitlist
                .iter()
                .map(|p| WaitlistEntryOutput {
                    student: &p.student,
                    position: p.position,
                })
                .collect();
            serde_json::to_string(&entries)?
        }
        Command::Promote { student, course } => portal
            .promote(&student.as_str().into(), &course.as_str().into())
            .await
            .to_json()?,
        Command::Migrate => serde_json::to_string(&serde_json::json!({ "success": true }))?,
    };

    Ok(output)
}
