//! vaultsweep core: cleans a decrypted password-vault export.
//!
//! Incomplete logins (no username, no password, no usable URI) are dropped,
//! then logins sharing first URI, username and password are offered for
//! merging one pair at a time through the [`Confirm`] seam.

pub mod config;
pub mod dedup;
pub mod error;
pub mod filters;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod storage;

pub use config::{AppConfig, OutputConfig};
pub use dedup::{DuplicateFinder, DuplicatePair, PairOrder};
pub use error::{ExitCode, Result, SweepError};
pub use filters::{Removal, RemovalReason};
pub use merge::{MergeOutcome, MergeRecord, MergeResolver};
pub use models::*;
pub use pipeline::{Pipeline, PipelineOptions, Stage, SweepReport};
pub use prompt::{ActionLog, Announce, Confirm, FixedAnswer, ScriptedAnswers, Silent};
