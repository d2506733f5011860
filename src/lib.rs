//! FFSim Core - Monte Carlo fantasy football season simulation engine.
//!
//! Given a fixed set of teams with known per-week scores, this library
//! estimates the probability distribution of end-of-season win/loss records
//! under randomized round-robin-style schedules, along with each team's
//! extremal matchups (closest win, worst loss) across all sampled schedules.
//!
//! The engine is pure computation: callers hand in an already-parsed
//! [`ScoreTable`] plus trial parameters and get back a ranked
//! [`SimulationReport`]. File parsing and report rendering live with the
//! embedding application. Optional Python bindings are available behind the
//! `python` cargo feature.

pub mod aggregate;
pub mod error;
pub mod schedule;
pub mod scores;
pub mod season;
pub mod summary;

#[cfg(feature = "python")]
mod python;

pub use aggregate::{run_trials, MatchupRecord, TeamExtremes, TrialAccumulator};
pub use error::{Result, SimError};
pub use schedule::Schedule;
pub use scores::ScoreTable;
pub use season::{simulate_season, MatchupOutcome, TeamRecord};
pub use summary::{
    run_simulation, summarize, MatchupSummary, RecordEntry, SimulationReport, TeamSummary,
};
