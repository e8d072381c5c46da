//! Command-line surface over the registry services.
//!
//! # Responsibility
//! - Map subcommands onto user and student service operations.
//! - Print every successful result as one JSON document on stdout.
//!
//! # Invariants
//! - Each invocation opens the database once and runs exactly one operation.
//! - Errors go to stderr with a non-zero exit code.

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use student_registry_core::{
    dispatch_welcome, init_logging_from_config, BcryptPasswordHasher, ConfigError, Database,
    DbError, Grimoire, LogNotifier, LoggingError, MagicAffinity, NewStudent, NewUser,
    PasswordHasher, RegistryConfig, Repository, ServiceError, StudentService, StudentUpdate,
    UserService, UserUpdate,
};

#[derive(Parser, Debug)]
#[command(
    name = "student-registry",
    about = "Manage registry users and student applications",
    version
)]
struct Cli {
    /// Override the configured SQLite database path
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// User account operations
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Student application operations
    Student {
        #[command(subcommand)]
        command: StudentCommand,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Register a new account and send the welcome notification
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show one account by id
    Get { id: i64 },
    /// List accounts
    List(PageArgs),
    /// Update account fields; omitted flags stay unchanged
    Update {
        id: i64,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete an account
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum StudentCommand {
    /// Submit a student application for an existing user
    Create {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        age: u32,
        /// One of Oscuridad, Luz, Fuego, Agua, Viento, Tierra
        #[arg(long, value_parser = parse_affinity)]
        magic_affinity: Option<MagicAffinity>,
        /// One of Sinceridad, Esperanza, Amor, Buena Fortuna, Desesperación
        #[arg(long, value_parser = parse_grimoire)]
        grimoire_cover: Grimoire,
    },
    /// Show one application by id
    Get { id: i64 },
    /// List applications
    List(PageArgs),
    /// Update application fields; omitted flags stay unchanged
    Update {
        id: i64,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long, value_parser = parse_affinity)]
        magic_affinity: Option<MagicAffinity>,
        #[arg(long, value_parser = parse_grimoire)]
        grimoire_cover: Option<Grimoire>,
        #[arg(long)]
        is_active: Option<bool>,
    },
    /// Delete an application
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = 0)]
    offset: u32,
    /// Page size (defaults to REGISTRY_PAGE_LIMIT)
    #[arg(long)]
    limit: Option<NonZeroU32>,
}

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Logging(LoggingError),
    Db(DbError),
    Service(ServiceError),
    Output(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::Logging(err) => write!(f, "logging error: {err}"),
            Self::Db(err) => write!(f, "database error: {err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "output error: {err}"),
        }
    }
}

impl Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

struct Registry {
    users: UserService<Arc<Database>>,
    students: StudentService<Arc<Database>>,
    page_limit: NonZeroU32,
}

impl Registry {
    fn open(config: &RegistryConfig) -> Result<Self, CliError> {
        let db = Arc::new(Database::open(&config.db_path)?);
        let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::new());
        Ok(Self {
            users: UserService::new(Repository::new(Arc::clone(&db), Arc::clone(&hasher))),
            students: StudentService::new(Repository::new(db, hasher)),
            page_limit: config.page_limit,
        })
    }
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("student-registry: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    let mut config = RegistryConfig::load()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    init_logging_from_config(&config)?;
    info!(
        "event=cli_start module=cli status=ok db_path={}",
        config.db_path.display()
    );

    let registry = Registry::open(&config)?;
    match cli.command {
        Command::User { command } => run_user(&registry, command),
        Command::Student { command } => run_student(&registry, command),
    }
}

fn run_user(registry: &Registry, command: UserCommand) -> Result<(), CliError> {
    let users = &registry.users;
    match command {
        UserCommand::Register {
            username,
            email,
            password,
        } => {
            let registered = users.register(&NewUser::new(username, email, password))?;
            let notification = dispatch_welcome(
                Arc::new(LogNotifier),
                registered.email.clone(),
                registered.username.clone(),
            );
            print_json(&registered)?;
            // The process exits right after; let the log line land first.
            await_notification(notification);
            Ok(())
        }
        UserCommand::Get { id } => print_json(&users.get_by_id(id)?),
        UserCommand::List(page) => {
            let limit = page.limit.unwrap_or(registry.page_limit);
            print_json(&users.list(page.offset, limit)?)
        }
        UserCommand::Update {
            id,
            username,
            email,
            password,
        } => {
            let patch = UserUpdate {
                username,
                email,
                password,
            };
            print_json(&users.update(id, &patch)?)
        }
        UserCommand::Delete { id } => print_json(&users.delete(id)?),
    }
}

fn run_student(registry: &Registry, command: StudentCommand) -> Result<(), CliError> {
    let students = &registry.students;
    match command {
        StudentCommand::Create {
            user_id,
            first_name,
            last_name,
            age,
            magic_affinity,
            grimoire_cover,
        } => {
            let mut draft = NewStudent::new(user_id, first_name, last_name, age, grimoire_cover);
            if let Some(magic_affinity) = magic_affinity {
                draft.magic_affinity = magic_affinity;
            }
            print_json(&students.create(&draft)?)
        }
        StudentCommand::Get { id } => print_json(&students.get_by_id(id)?),
        StudentCommand::List(page) => {
            let limit = page.limit.unwrap_or(registry.page_limit);
            print_json(&students.list(page.offset, limit)?)
        }
        StudentCommand::Update {
            id,
            first_name,
            last_name,
            age,
            magic_affinity,
            grimoire_cover,
            is_active,
        } => {
            let patch = StudentUpdate {
                first_name,
                last_name,
                age,
                magic_affinity,
                grimoire_cover,
                is_active,
            };
            print_json(&students.update(id, &patch)?)
        }
        StudentCommand::Delete { id } => print_json(&students.delete(id)?),
    }
}

/// Waits for a dispatched notification. Returns `false` when the notifier
/// thread panicked.
fn await_notification(handle: JoinHandle<()>) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(_) => {
            error!(
                "event=welcome_notify module=cli status=error error_code=notifier_panicked"
            );
            false
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_affinity(raw: &str) -> Result<MagicAffinity, String> {
    MagicAffinity::parse(raw.trim()).ok_or_else(|| {
        let allowed: Vec<_> = MagicAffinity::ALL.iter().map(|item| item.as_str()).collect();
        format!("unknown magic affinity '{raw}', expected one of: {}", allowed.join(", "))
    })
}

fn parse_grimoire(raw: &str) -> Result<Grimoire, String> {
    Grimoire::parse(raw.trim()).ok_or_else(|| {
        let allowed: Vec<_> = Grimoire::ALL.iter().map(|item| item.as_str()).collect();
        format!("unknown grimoire cover '{raw}', expected one of: {}", allowed.join(", "))
    })
}
