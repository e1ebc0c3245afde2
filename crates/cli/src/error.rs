//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: field error (mount failure, bad dimensions)
//! - 11: I/O error (PNG write)
//! - 12: input error (bad params JSON, bad color, out-of-range parameter)
//! - 13: serialization error

use plexus_core::PlexusError;
use std::fmt;

pub enum CliError {
    Field(PlexusError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Field(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Field(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<PlexusError> for CliError {
    fn from(e: PlexusError) -> Self {
        match e {
            PlexusError::Io(msg) => CliError::Io(msg),
            e @ (PlexusError::InvalidParam { .. } | PlexusError::InvalidColor(_)) => {
                CliError::Input(e.to_string())
            }
            other => CliError::Field(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
