//! Startup error types
//!
//! Everything that can stop the server before it serves a request. Per-request
//! failures never surface here; they become HTTP responses in `handler::respond`.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Fatal configuration errors. All of them end the process with exit code 1.
#[derive(Debug)]
pub enum StartupError {
    MissingArgument { program: String },
    NotFound(PathBuf),
    PermissionDenied(PathBuf),
    Inaccessible(PathBuf, io::Error),
    Config(config::ConfigError),
    InvalidAddress(String),
    Bind(SocketAddr, io::Error),
    Runtime(io::Error),
    LogInit(io::Error),
}

impl StartupError {
    /// Classify a failed metadata lookup on the root path
    pub fn from_probe(path: PathBuf, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Inaccessible(path, err),
        }
    }

    pub const fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument { program } => write!(f, "Usage: {program} <path_to_serve>"),
            Self::NotFound(path) => write!(f, "Error: Path not found - {}", path.display()),
            Self::PermissionDenied(path) => {
                write!(f, "Error: Permission denied to access - {}", path.display())
            }
            Self::Inaccessible(_, err) => write!(f, "An unexpected error occurred: {err}"),
            Self::Config(err) => write!(f, "Error: Invalid configuration: {err}"),
            Self::InvalidAddress(msg) => write!(f, "Error: {msg}"),
            Self::Bind(addr, err) => write!(f, "Error: Failed to bind {addr}: {err}"),
            Self::Runtime(err) => write!(f, "Error: Failed to start runtime: {err}"),
            Self::LogInit(err) => write!(f, "Error: Failed to open log files: {err}"),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Inaccessible(_, err)
            | Self::Bind(_, err)
            | Self::Runtime(err)
            | Self::LogInit(err) => Some(err),
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for StartupError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err)
    }
}
