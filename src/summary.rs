use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregate::{run_trials, TrialAccumulator};
use crate::error::Result;
use crate::scores::ScoreTable;

/// One record's share of a team's distribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub wins: u32,
    pub losses: u32,
    pub count: u64,
    /// `count / num_trials * 100`.
    pub probability_percent: f64,
}

impl fmt::Display for RecordEntry {
    /// Renders the record in the conventional `"W-L"` form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wins, self.losses)
    }
}

/// Formatted extremal matchup detail. Weeks are reported 1-based.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchupSummary {
    pub week: usize,
    pub opponent: String,
    pub team_score: f64,
    pub opponent_score: f64,
    pub margin: f64,
}

/// Everything the report shows for one team.
///
/// `closest_win` is `None` if the team never won a matchup in any trial,
/// `worst_loss` is `None` if it never lost one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team: String,
    pub average_wins: f64,
    /// Sorted by descending wins, then ascending losses.
    pub record_distribution: Vec<RecordEntry>,
    pub closest_win: Option<MatchupSummary>,
    pub worst_loss: Option<MatchupSummary>,
}

/// Full run output, teams ranked by descending average wins.
///
/// Ties rank in score-table insertion order (the sort is stable), so a
/// loader that inserts rows name-sorted gets name-sorted ties. This is the
/// structure handed to a CLI printer, JSON writer, or HTML renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub num_trials: u64,
    pub num_weeks: usize,
    pub teams: Vec<TeamSummary>,
}

/// Reduce raw trial counts into the ranked, probability-annotated report.
pub fn summarize(table: &ScoreTable, acc: &TrialAccumulator) -> SimulationReport {
    let num_weeks = acc.num_weeks();
    let trials = acc.trials();

    let mut teams: Vec<TeamSummary> = (0..table.len())
        .map(|team| {
            let counts = acc.record_counts(team);

            // Walking win counts high-to-low yields the documented order:
            // descending wins, ascending losses.
            let record_distribution: Vec<RecordEntry> = (0..=num_weeks)
                .rev()
                .filter(|&wins| counts[wins] > 0)
                .map(|wins| RecordEntry {
                    wins: wins as u32,
                    losses: (num_weeks - wins) as u32,
                    count: counts[wins],
                    probability_percent: counts[wins] as f64 / trials as f64 * 100.0,
                })
                .collect();

            let total_wins: u64 = counts
                .iter()
                .enumerate()
                .map(|(wins, &count)| wins as u64 * count)
                .sum();

            let extremes = acc.extremes(team);
            TeamSummary {
                team: table.name(team).to_string(),
                average_wins: total_wins as f64 / trials as f64,
                record_distribution,
                closest_win: extremes.closest_win.map(|m| MatchupSummary {
                    week: m.week + 1,
                    opponent: table.name(m.opponent).to_string(),
                    team_score: m.team_score,
                    opponent_score: m.opponent_score,
                    margin: m.margin,
                }),
                worst_loss: extremes.worst_loss.map(|m| MatchupSummary {
                    week: m.week + 1,
                    opponent: table.name(m.opponent).to_string(),
                    team_score: m.team_score,
                    opponent_score: m.opponent_score,
                    margin: m.margin,
                }),
            }
        })
        .collect();

    // Stable sort: equal averages keep table insertion order.
    teams.sort_by(|a, b| b.average_wins.total_cmp(&a.average_wins));

    SimulationReport {
        num_trials: trials,
        num_weeks,
        teams,
    }
}

/// Run a full study: `num_trials` randomized seasons, reduced to a ranked
/// report. Pass a seed for a reproducible run; `None` draws from entropy.
pub fn run_simulation(
    table: &ScoreTable,
    num_weeks: usize,
    num_trials: usize,
    seed: Option<u64>,
) -> Result<SimulationReport> {
    let acc = run_trials(table, num_weeks, num_trials, seed)?;
    Ok(summarize(table, &acc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::TrialAccumulator;
    use crate::season::TeamRecord;

    fn ladder_table(num_weeks: usize) -> ScoreTable {
        // Constant scores: Alpha always beats Bravo, Bravo always beats
        // Charlie, and so on. Every season outcome is schedule-dependent but
        // the pairwise results never are.
        ScoreTable::from_rows(vec![
            ("Alpha".to_string(), vec![100.0; num_weeks]),
            ("Bravo".to_string(), vec![90.0; num_weeks]),
            ("Charlie".to_string(), vec![80.0; num_weeks]),
            ("Delta".to_string(), vec![70.0; num_weeks]),
        ])
        .unwrap()
    }

    #[test]
    fn test_probabilities_sum_to_100() {
        let report = run_simulation(&ladder_table(3), 3, 250, Some(5)).unwrap();

        for team in &report.teams {
            let total: f64 = team
                .record_distribution
                .iter()
                .map(|e| e.probability_percent)
                .sum();
            assert!(
                (total - 100.0).abs() < 1e-6,
                "{} probabilities sum to {}",
                team.team,
                total
            );
            let counted: u64 = team.record_distribution.iter().map(|e| e.count).sum();
            assert_eq!(counted, 250);
        }
    }

    #[test]
    fn test_distribution_sorted_by_wins_desc() {
        let report = run_simulation(&ladder_table(3), 3, 250, Some(5)).unwrap();

        for team in &report.teams {
            for pair in team.record_distribution.windows(2) {
                assert!(pair[0].wins > pair[1].wins);
                assert!(pair[0].losses < pair[1].losses);
                assert_eq!(pair[0].wins + pair[0].losses, 3);
            }
        }
    }

    #[test]
    fn test_ranking_follows_score_strength() {
        let report = run_simulation(&ladder_table(3), 3, 300, Some(7)).unwrap();

        let order: Vec<&str> = report.teams.iter().map(|t| t.team.as_str()).collect();
        assert_eq!(order, vec!["Alpha", "Bravo", "Charlie", "Delta"]);

        // The top team never loses, the bottom one never wins.
        assert_eq!(report.teams[0].average_wins, 3.0);
        assert_eq!(report.teams[3].average_wins, 0.0);
        assert!(report.teams[0].worst_loss.is_none());
        assert!(report.teams[3].closest_win.is_none());
    }

    #[test]
    fn test_equal_averages_keep_insertion_order() {
        let table = ScoreTable::from_rows(vec![
            ("Zulu".to_string(), vec![1.0]),
            ("Alpha".to_string(), vec![2.0]),
        ])
        .unwrap();

        // Hand-built counts giving both teams an average of 0.5 wins.
        let mut acc = TrialAccumulator::new(2, 1);
        acc.observe_season(&[
            TeamRecord { wins: 1, losses: 0 },
            TeamRecord { wins: 0, losses: 1 },
        ]);
        acc.observe_season(&[
            TeamRecord { wins: 0, losses: 1 },
            TeamRecord { wins: 1, losses: 0 },
        ]);

        let report = summarize(&table, &acc);
        assert_eq!(report.teams[0].average_wins, 0.5);
        assert_eq!(report.teams[1].average_wins, 0.5);
        assert_eq!(report.teams[0].team, "Zulu");
        assert_eq!(report.teams[1].team, "Alpha");
    }

    #[test]
    fn test_extremal_details_use_names_and_one_based_weeks() {
        let table = ScoreTable::from_rows(vec![
            ("A".to_string(), vec![100.0]),
            ("B".to_string(), vec![90.0]),
        ])
        .unwrap();
        let report = run_simulation(&table, 1, 1, Some(1)).unwrap();

        let a = report.teams.iter().find(|t| t.team == "A").unwrap();
        let closest = a.closest_win.as_ref().unwrap();
        assert_eq!(closest.week, 1);
        assert_eq!(closest.opponent, "B");
        assert_eq!(closest.team_score, 100.0);
        assert_eq!(closest.opponent_score, 90.0);
        assert!((closest.margin - 10.0).abs() < 1e-12);
        assert!(a.worst_loss.is_none());

        let b = report.teams.iter().find(|t| t.team == "B").unwrap();
        assert!(b.closest_win.is_none());
        assert_eq!(b.worst_loss.as_ref().unwrap().margin, 10.0);
    }

    #[test]
    fn test_record_entry_display() {
        let entry = RecordEntry {
            wins: 5,
            losses: 2,
            count: 10,
            probability_percent: 1.0,
        };
        assert_eq!(entry.to_string(), "5-2");
    }

    #[test]
    fn test_report_json_round_trip() {
        let report = run_simulation(&ladder_table(2), 2, 50, Some(3)).unwrap();

        let json = serde_json::to_string(&report).unwrap();
        let back: SimulationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
    }
}
