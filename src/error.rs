// Errors surfaced by the engine and its persistence layer.
use std::path::PathBuf;

use crate::logic::game::{MatchPhase, Outcome};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Odd or too small team counts, bad strength values, unknown team ids and such.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no score table for {outcome:?} in {phase:?}")]
    UnknownOutcome { phase: MatchPhase, outcome: Outcome },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("could not read {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("could not parse league setup: {0}")]
    Setup(#[from] serde_json::Error),

    #[error("invalid decimal: {0}")]
    Decimal(#[from] rust_decimal::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
