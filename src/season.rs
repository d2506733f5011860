use crate::error::{Result, SimError};
use crate::schedule::Schedule;
use crate::scores::ScoreTable;

/// A team's win/loss record for one simulated season.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
}

/// The outcome of a single matchup, emitted once per pair per week.
///
/// Teams are dense `ScoreTable` indices; `week` is 0-based.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchupOutcome {
    pub week: usize,
    pub winner: usize,
    pub loser: usize,
    pub winner_score: f64,
    pub loser_score: f64,
    pub margin: f64,
}

/// Play out one season: compare weekly scores across a schedule's matchups.
///
/// The team whose score is strictly greater wins the matchup; otherwise,
/// including an exact tie, the win goes to the second team of the pair as
/// ordered by the schedule. The asymmetric tie-break is deliberate league
/// policy; do not symmetrize it.
///
/// `records` is caller-owned scratch (one slot per team, reset here) so the
/// trial loop can reuse it; every matchup is also reported through
/// `on_matchup` for extremal tracking.
pub fn simulate_season<F>(
    table: &ScoreTable,
    schedule: &Schedule,
    records: &mut [TeamRecord],
    mut on_matchup: F,
) -> Result<()>
where
    F: FnMut(MatchupOutcome),
{
    if schedule.num_teams() != table.len() {
        return Err(SimError::InvalidConfig(format!(
            "schedule pairs {} teams but the score table has {}",
            schedule.num_teams(),
            table.len()
        )));
    }
    assert_eq!(records.len(), table.len());
    table.check_weeks(schedule.num_weeks())?;

    records.fill(TeamRecord::default());

    for (week, pairs) in schedule.weeks().enumerate() {
        for &(first, second) in pairs {
            let first_score = table.scores(first)[week];
            let second_score = table.scores(second)[week];

            let (winner, loser, winner_score, loser_score) = if first_score > second_score {
                (first, second, first_score, second_score)
            } else {
                (second, first, second_score, first_score)
            };

            records[winner].wins += 1;
            records[loser].losses += 1;

            on_matchup(MatchupOutcome {
                week,
                winner,
                loser,
                winner_score,
                loser_score,
                margin: (first_score - second_score).abs(),
            });
        }
    }

    Ok(())
}
