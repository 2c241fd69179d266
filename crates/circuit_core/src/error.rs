use thiserror::Error;

use crate::models::{PlayerId, TournamentId};

#[derive(Error, Debug)]
pub enum CircuitError {
    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Match index {index} out of range for round {round} of tournament {tournament} ({len} matches)")]
    MatchIndexOutOfRange { tournament: TournamentId, round: usize, index: usize, len: usize },

    #[error("Invalid draw size {draw_size} for tournament {tournament}: must be a power of two >= 2")]
    InvalidDrawSize { tournament: TournamentId, draw_size: u32 },

    #[error("Tournament {0} has no draw yet")]
    BracketNotGenerated(TournamentId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Data table parse error: {0}")]
    Table(#[from] serde_yaml::Error),
}

impl CircuitError {
    /// Caller misuse, as opposed to bad input data.
    pub fn is_lookup(&self) -> bool {
        matches!(self, CircuitError::TournamentNotFound(_) | CircuitError::PlayerNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CircuitError>;
