// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info, warn};
use std::io::Write;
use std::path::PathBuf;

use staff_reviews::app_config::{self, Config};
use staff_reviews::database::DatabaseConnection;
use staff_reviews::employees::EmployeeRepository;
use staff_reviews::reviews::{Review, ReviewHandle, ReviewRepository};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the employees and reviews tables
    Init,

    /// Drop the reviews and employees tables
    Reset,

    /// Show row counts and database size
    Stats,

    /// Manage employees
    #[command(subcommand)]
    Employee(EmployeeCommand),

    /// Manage reviews
    #[command(subcommand)]
    Review(ReviewCommand),

    /// Generate shell completions for staff-reviews
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum EmployeeCommand {
    /// Add an employee
    Add {
        name: String,
        job_title: String,
    },
    /// List all employees
    List {
        /// Print JSON instead of one line per employee
        #[arg(long)]
        json: bool,
    },
    /// Show one employee and their reviews
    Show { id: i64 },
    /// Delete an employee
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum ReviewCommand {
    /// Add a review for an existing employee
    Add {
        year: i64,
        summary: String,
        employee_id: i64,
    },
    /// List all reviews
    List {
        /// Print JSON instead of one line per review
        #[arg(long)]
        json: bool,
    },
    /// Show one review
    Show { id: i64 },
    /// Change attributes of a stored review
    Update {
        id: i64,
        #[arg(long)]
        year: Option<i64>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        employee_id: Option<i64>,
    },
    /// Delete a review
    Delete { id: i64 },
    /// List the reviews of one employee
    ByEmployee {
        employee_id: i64,
        /// Print JSON instead of one line per review
        #[arg(long)]
        json: bool,
    },
}

/// staff-reviews - employee performance reviews stored in SQLite
#[derive(Parser, Debug)]
#[command(name = "staff-reviews")]
#[command(version)]
#[command(about = "Employee performance reviews stored in SQLite")]
#[command(long_about = "staff-reviews keeps employees and their yearly performance reviews in a SQLite database.

EXAMPLES:
    staff-reviews init                                  # Create the tables
    staff-reviews employee add \"Lee\" \"Manager\"          # Add an employee
    staff-reviews review add 2023 \"Great year\" 1        # Review employee 1
    staff-reviews review update 1 --summary \"Strong\"    # Edit a stored review
    staff-reviews review by-employee 1 --json           # Reviews of employee 1
    staff-reviews --db /tmp/test.db stats               # Use another database file
    staff-reviews completions bash > staff-reviews.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: PathBuf,

    /// Database file, overrides the configuration
    #[arg(long, global = true, env = "STAFF_REVIEWS_DB")]
    db: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // ANSI colour and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "staff-reviews", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;

    // Override config with CLI options if provided
    if let Some(db_path) = &cli.db {
        config.database.path = Some(db_path.clone());
        config.database.in_memory = false;
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let db = DatabaseConnection::open(&config.database)?;
    let employees = EmployeeRepository::new(db.clone());
    let reviews = ReviewRepository::for_connection(db.clone());

    match cli.command {
        Commands::Init => {
            employees.create_table()?;
            reviews.create_table()?;
            info!("Database ready at {:?}", db.path());
        }
        Commands::Reset => {
            reviews.drop_table()?;
            employees.drop_table()?;
            info!("All tables dropped");
        }
        Commands::Stats => {
            println!("{}", db.stats()?);
        }
        Commands::Employee(command) => run_employee_command(command, &employees, &reviews)?,
        Commands::Review(command) => run_review_command(command, &reviews)?,
        Commands::Completions { .. } => unreachable!("handled before opening the database"),
    }

    Ok(())
}

fn run_employee_command(
    command: EmployeeCommand,
    employees: &EmployeeRepository,
    reviews: &ReviewRepository,
) -> Result<()> {
    match command {
        EmployeeCommand::Add { name, job_title } => {
            let employee = employees.create(&name, &job_title)?;
            println!("{}", employee);
        }
        EmployeeCommand::List { json } => {
            let all = employees.get_all()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                for employee in &all {
                    println!("{}", employee);
                }
            }
        }
        EmployeeCommand::Show { id } => {
            let employee = employees
                .find_by_id(id)?
                .ok_or_else(|| anyhow!("Employee {} not found", id))?;
            println!("{}", employee);
            for handle in reviews.get_reviews_by_employee_id(id)? {
                println!("  {}", handle.read());
            }
        }
        EmployeeCommand::Delete { id } => {
            let mut employee = employees
                .find_by_id(id)?
                .ok_or_else(|| anyhow!("Employee {} not found", id))?;

            let orphaned = reviews.get_reviews_by_employee_id(id)?.len();
            if orphaned > 0 {
                warn!("{} review(s) still reference employee {}", orphaned, id);
            }

            employees.delete(&mut employee)?;
            info!("Deleted employee {}", id);
        }
    }

    Ok(())
}

fn run_review_command(command: ReviewCommand, reviews: &ReviewRepository) -> Result<()> {
    match command {
        ReviewCommand::Add {
            year,
            summary,
            employee_id,
        } => {
            let handle = reviews.create(year, &summary, employee_id)?;
            println!("{}", handle.read());
        }
        ReviewCommand::List { json } => print_reviews(&reviews.get_all()?, json)?,
        ReviewCommand::Show { id } => {
            let handle = find_review(reviews, id)?;
            println!("{}", handle.read());
        }
        ReviewCommand::Update {
            id,
            year,
            summary,
            employee_id,
        } => {
            let handle = find_review(reviews, id)?;
            reviews.modify(&handle, |review| {
                if let Some(year) = year {
                    review.set_year(year)?;
                }
                if let Some(summary) = summary {
                    review.set_summary(summary)?;
                }
                if let Some(employee_id) = employee_id {
                    review.set_employee_id(employee_id, reviews.employees())?;
                }
                Ok(())
            })?;
            println!("{}", handle.read());
        }
        ReviewCommand::Delete { id } => {
            let handle = find_review(reviews, id)?;
            reviews.delete(&handle)?;
        }
        ReviewCommand::ByEmployee { employee_id, json } => {
            let found = reviews.get_reviews_by_employee_id(employee_id)?;
            debug!("Employee {} has {} review(s)", employee_id, found.len());
            print_reviews(&found, json)?;
        }
    }

    Ok(())
}

fn find_review(reviews: &ReviewRepository, id: i64) -> Result<ReviewHandle> {
    reviews
        .find_by_id(id)?
        .ok_or_else(|| anyhow!("Review {} not found", id))
}

fn print_reviews(handles: &[ReviewHandle], json: bool) -> Result<()> {
    if json {
        let snapshot: Vec<Review> = handles.iter().map(|h| h.read().clone()).collect();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        for handle in handles {
            println!("{}", handle.read());
        }
    }
    Ok(())
}
