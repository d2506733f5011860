//! Python bindings for the simulation engine.
//!
//! Compiled only with the `python` cargo feature; the embedding application
//! passes already-parsed score rows and gets back the ranked report as plain
//! attribute-bearing objects.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::SimError;
use crate::scores::ScoreTable;
use crate::summary;

impl From<SimError> for PyErr {
    fn from(err: SimError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// One entry of a team's record distribution.
#[pyclass(name = "RecordEntry")]
#[derive(Clone)]
pub struct PyRecordEntry {
    #[pyo3(get)]
    pub wins: u32,

    #[pyo3(get)]
    pub losses: u32,

    #[pyo3(get)]
    pub count: u64,

    #[pyo3(get)]
    pub probability_percent: f64,
}

#[pymethods]
impl PyRecordEntry {
    /// The record in `"W-L"` form.
    #[getter]
    pub fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }

    fn __repr__(&self) -> String {
        format!(
            "RecordEntry({}-{}, count={}, probability={:.2}%)",
            self.wins, self.losses, self.count, self.probability_percent
        )
    }
}

/// Extremal matchup detail (closest win / worst loss). Weeks are 1-based.
#[pyclass(name = "MatchupSummary")]
#[derive(Clone)]
pub struct PyMatchupSummary {
    #[pyo3(get)]
    pub week: usize,

    #[pyo3(get)]
    pub opponent: String,

    #[pyo3(get)]
    pub team_score: f64,

    #[pyo3(get)]
    pub opponent_score: f64,

    #[pyo3(get)]
    pub margin: f64,
}

#[pymethods]
impl PyMatchupSummary {
    fn __repr__(&self) -> String {
        format!(
            "MatchupSummary(week {} vs {}, {:.2}-{:.2}, margin={:.2})",
            self.week, self.opponent, self.team_score, self.opponent_score, self.margin
        )
    }
}

/// Per-team simulation results.
#[pyclass(name = "TeamSummary")]
#[derive(Clone)]
pub struct PyTeamSummary {
    #[pyo3(get)]
    pub team: String,

    #[pyo3(get)]
    pub average_wins: f64,

    #[pyo3(get)]
    pub record_distribution: Vec<PyRecordEntry>,

    #[pyo3(get)]
    pub closest_win: Option<PyMatchupSummary>,

    #[pyo3(get)]
    pub worst_loss: Option<PyMatchupSummary>,
}

#[pymethods]
impl PyTeamSummary {
    fn __repr__(&self) -> String {
        format!(
            "TeamSummary({}, avg_wins={:.3}, {} records)",
            self.team,
            self.average_wins,
            self.record_distribution.len()
        )
    }
}

/// Full run output, teams ranked by descending average wins.
#[pyclass(name = "SimulationReport")]
#[derive(Clone)]
pub struct PySimulationReport {
    #[pyo3(get)]
    pub num_trials: u64,

    #[pyo3(get)]
    pub num_weeks: usize,

    #[pyo3(get)]
    pub teams: Vec<PyTeamSummary>,
}

#[pymethods]
impl PySimulationReport {
    fn __repr__(&self) -> String {
        format!(
            "SimulationReport({} teams, {} trials)",
            self.teams.len(),
            self.num_trials
        )
    }
}

fn convert_matchup(m: summary::MatchupSummary) -> PyMatchupSummary {
    PyMatchupSummary {
        week: m.week,
        opponent: m.opponent,
        team_score: m.team_score,
        opponent_score: m.opponent_score,
        margin: m.margin,
    }
}

impl From<summary::SimulationReport> for PySimulationReport {
    fn from(report: summary::SimulationReport) -> Self {
        PySimulationReport {
            num_trials: report.num_trials,
            num_weeks: report.num_weeks,
            teams: report
                .teams
                .into_iter()
                .map(|team| PyTeamSummary {
                    team: team.team,
                    average_wins: team.average_wins,
                    record_distribution: team
                        .record_distribution
                        .into_iter()
                        .map(|e| PyRecordEntry {
                            wins: e.wins,
                            losses: e.losses,
                            count: e.count,
                            probability_percent: e.probability_percent,
                        })
                        .collect(),
                    closest_win: team.closest_win.map(convert_matchup),
                    worst_loss: team.worst_loss.map(convert_matchup),
                })
                .collect(),
        }
    }
}

/// Run the Monte Carlo study over already-parsed score rows.
///
/// `rows` is an ordered list of `(team_name, weekly_scores)` tuples. Order
/// matters: it is the tie-break for the final ranking. Pass `seed` for a
/// reproducible run.
#[pyfunction]
#[pyo3(signature = (rows, num_weeks, num_trials, seed = None))]
fn run_simulation(
    rows: Vec<(String, Vec<f64>)>,
    num_weeks: usize,
    num_trials: usize,
    seed: Option<u64>,
) -> PyResult<PySimulationReport> {
    let table = ScoreTable::from_rows(rows)?;
    let report = summary::run_simulation(&table, num_weeks, num_trials, seed)?;
    Ok(report.into())
}

/// Python module definition
#[pymodule]
fn ffsim_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyRecordEntry>()?;
    m.add_class::<PyMatchupSummary>()?;
    m.add_class::<PyTeamSummary>()?;
    m.add_class::<PySimulationReport>()?;

    m.add_function(wrap_pyfunction!(run_simulation, m)?)?;

    Ok(())
}
