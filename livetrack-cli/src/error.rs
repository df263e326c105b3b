//! CLI error handling with user-facing messages.
//!
//! Every failure ends the process with exit code 1 after printing the
//! message (and, for common setup mistakes, a hint).

use std::fmt;
use std::path::PathBuf;
use std::process;

use livetrack::config::ConfigFileError;
use livetrack::notify::NotifyError;
use livetrack::server::ServerError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Config file could not be read, parsed or written
    Config(ConfigFileError),
    /// `init-config` target exists and `--force` was not given
    ConfigExists(PathBuf),
    /// No order service URL and not running in demo mode
    MissingOrderService,
    /// Order service client could not be built
    Resolver(String),
    /// Background daemons failed to start
    Runtime(NotifyError),
    /// HTTP server failed
    Server(ServerError),
}

impl CliError {
    /// Print the error and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::MissingOrderService => {
                eprintln!();
                eprintln!("Set the order service URL in the config file:");
                eprintln!("  [assignment]");
                eprintln!("  url = http://orders.internal:8000");
                eprintln!();
                eprintln!("or try the service without one: livetrack serve --demo");
            }
            CliError::ConfigExists(_) => {
                eprintln!("Use --force to overwrite it.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::ConfigExists(path) => {
                write!(f, "Config file already exists: {}", path.display())
            }
            CliError::MissingOrderService => write!(f, "No order service URL configured"),
            CliError::Resolver(msg) => write!(f, "Failed to create order service client: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::Server(e) => write!(f, "Server error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Server(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<NotifyError> for CliError {
    fn from(e: NotifyError) -> Self {
        CliError::Runtime(e)
    }
}

impl From<ServerError> for CliError {
    fn from(e: ServerError) -> Self {
        CliError::Server(e)
    }
}
