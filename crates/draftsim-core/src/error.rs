// Error taxonomy for catalog loading and draft operations.

use thiserror::Error;

use crate::draft::slot::DraftStatus;

/// Errors surfaced by draft engine operations.
///
/// Every variant is synchronous and final: the engine is in-memory and
/// deterministic, so there is nothing to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{what} not found")]
    NotFound { what: String },

    #[error("not the user's turn (draft is {status})")]
    InvalidTurn { status: DraftStatus },

    #[error("player {player_id} is not available")]
    PlayerUnavailable { player_id: u64 },
}

impl DraftError {
    pub(crate) fn draft_not_found(id: impl std::fmt::Display) -> Self {
        DraftError::NotFound {
            what: format!("draft {id}"),
        }
    }

    pub(crate) fn year_not_found(year: u16) -> Self {
        DraftError::NotFound {
            what: format!("year {year}"),
        }
    }

    pub(crate) fn player_not_found(player_id: u64) -> Self {
        DraftError::NotFound {
            what: format!("player {player_id}"),
        }
    }
}

/// Errors produced while loading the player catalog from disk.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}
