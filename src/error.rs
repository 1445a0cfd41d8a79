//! Error types for the arena.
//!
//! Rule-engine errors (`GameError`) are programmer errors and abort the
//! operation. A session refusing a request because it is busy is not an
//! error: see [`crate::session::Rejection`].

use std::path::PathBuf;

use thiserror::Error;

use crate::games::GameKind;

/// Errors raised by rule engines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("illegal move '{token}' for state '{label}'")]
    IllegalMove { token: String, label: String },

    #[error("reward queried on non-terminal state '{label}'")]
    NotTerminal { label: String },

    #[error("expected a {expected} state, got a {found} state")]
    VariantMismatch { expected: GameKind, found: GameKind },

    #[error("invalid {game} setup: {reason}")]
    InvalidSetup { game: GameKind, reason: String },
}

/// Errors raised while consulting the search oracle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OracleError {
    #[error("search requested on state '{label}' which has no legal moves")]
    NoLegalMoves { label: String },

    #[error("oracle returned move '{token}' which is not legal in '{label}'")]
    ReturnedIllegalMove { token: String, label: String },

    #[error("search worker failed: {message}")]
    Worker { message: String },
}

impl From<GameError> for OracleError {
    /// A rule engine rejecting its own move mid-search is a worker fault.
    fn from(err: GameError) -> Self {
        OracleError::Worker {
            message: err.to_string(),
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors surfaced by the session controller.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience alias for session results.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_error_messages() {
        let err = GameError::IllegalMove {
            token: "9".into(),
            label: "X:___/___/___".into(),
        };
        assert_eq!(err.to_string(), "illegal move '9' for state 'X:___/___/___'");

        let err = GameError::VariantMismatch {
            expected: GameKind::Grid,
            found: GameKind::Territory,
        };
        assert_eq!(err.to_string(), "expected a Grid state, got a Territory state");
    }

    #[test]
    fn test_session_error_wraps_sources() {
        let err: SessionError = OracleError::Worker {
            message: "panicked".into(),
        }
        .into();
        assert!(matches!(err, SessionError::Oracle(_)));
        assert_eq!(err.to_string(), "search worker failed: panicked");
    }
}
