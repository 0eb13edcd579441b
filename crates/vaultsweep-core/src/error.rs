use std::path::PathBuf;

use thiserror::Error;

/// All errors that can occur in vaultsweep-core.
///
/// The cleaning stages themselves never fail: malformed items are treated as
/// missing the relevant field. Errors only come from loading, saving and
/// configuring.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Cannot read vault export {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Vault export {} is not valid JSON: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Vault export {} has no \"items\" array", .0.display())]
    MissingItems(PathBuf),

    #[error("Refusing to overwrite the input file {} without --in-place", .0.display())]
    WouldOverwriteInput(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl SweepError {
    /// Process exit code the CLI should use for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            SweepError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ExitCode::NotFound
            }
            SweepError::Read { .. } | SweepError::Io(_) => ExitCode::FileSystemError,
            SweepError::Decode { .. } | SweepError::MissingItems(_) | SweepError::Json(_) => {
                ExitCode::DecodeError
            }
            SweepError::WouldOverwriteInput(_) => ExitCode::InvalidArgs,
            SweepError::Config(_) | SweepError::TomlParse(_) | SweepError::TomlSerialize(_) => {
                ExitCode::GeneralError
            }
        }
    }
}

/// Exit codes used by the `vaultsweep` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    NotFound = 2,
    InvalidArgs = 3,
    FileSystemError = 4,
    DecodeError = 5,
}

pub type Result<T> = std::result::Result<T, SweepError>;
