//! Error types for the simulation engine

use thiserror::Error;

/// Main error type for the simulation engine.
///
/// Every variant describes a structurally invalid input. All of them are
/// detected before or during the first trial and abort the run; a failed run
/// produces no partial results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Invalid run parameters (trial count, week count).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An odd number of teams cannot be paired into weekly matchups.
    #[error("No valid pairing exists for {team_count} teams: team count must be even")]
    OddTeamCount { team_count: usize },

    /// A scheduled team has no score for the given week index.
    #[error("Team {team:?} has no score for week {week}")]
    MissingScore { team: String, week: usize },

    /// Two score rows share the same team name.
    #[error("Duplicate team name: {0:?}")]
    DuplicateTeam(String),
}

/// Result type alias for the simulation engine
pub type Result<T> = std::result::Result<T, SimError>;
