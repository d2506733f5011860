use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::error::{Result, SimError};
use crate::schedule::Schedule;
use crate::scores::ScoreTable;
use crate::season::{simulate_season, MatchupOutcome, TeamRecord};

/// Trials per parallel work unit.
///
/// Chunking by a fixed size (rather than by thread count) makes a seeded run
/// produce identical results on any machine: chunk `i` always covers the same
/// trials with the same sub-seed, however rayon schedules it.
const TRIALS_PER_CHUNK: usize = 1024;

/// Matchup detail attached to an extremal margin. `week` is 0-based.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchupRecord {
    pub opponent: usize,
    pub week: usize,
    pub team_score: f64,
    pub opponent_score: f64,
    pub margin: f64,
}

/// Running extremes for one team across all observed trials.
///
/// `closest_win` holds the minimum winning margin seen so far, `worst_loss`
/// the maximum losing margin. `None` means the team has not won (or lost) a
/// single matchup yet; a team's first win or loss always installs an entry,
/// so a margin-0 result is tracked rather than hidden behind a sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TeamExtremes {
    pub closest_win: Option<MatchupRecord>,
    pub worst_loss: Option<MatchupRecord>,
}

/// Accumulated results of many independent trials: per-team record counts
/// plus per-team extremal matchups.
///
/// Record counts are keyed by win count: with `wins + losses == num_weeks`
/// fixed, the win count identifies the record, so each team's distribution
/// is a dense `num_weeks + 1` counter array.
#[derive(Clone, Debug, PartialEq)]
pub struct TrialAccumulator {
    num_weeks: usize,
    trials: u64,
    counts: Vec<Vec<u64>>,
    extremes: Vec<TeamExtremes>,
}

impl TrialAccumulator {
    pub fn new(num_teams: usize, num_weeks: usize) -> Self {
        TrialAccumulator {
            num_weeks,
            trials: 0,
            counts: vec![vec![0; num_weeks + 1]; num_teams],
            extremes: vec![TeamExtremes::default(); num_teams],
        }
    }

    /// Record one finished season: exactly one count per team.
    pub fn observe_season(&mut self, records: &[TeamRecord]) {
        assert_eq!(records.len(), self.counts.len());
        self.trials += 1;
        for (team, record) in records.iter().enumerate() {
            self.counts[team][record.wins as usize] += 1;
        }
    }

    /// Fold one matchup into both teams' extremal trackers.
    pub fn observe_matchup(&mut self, outcome: MatchupOutcome) {
        let win = &mut self.extremes[outcome.winner].closest_win;
        match win {
            Some(current) if current.margin <= outcome.margin => {}
            _ => {
                *win = Some(MatchupRecord {
                    opponent: outcome.loser,
                    week: outcome.week,
                    team_score: outcome.winner_score,
                    opponent_score: outcome.loser_score,
                    margin: outcome.margin,
                })
            }
        }

        let loss = &mut self.extremes[outcome.loser].worst_loss;
        match loss {
            Some(current) if current.margin >= outcome.margin => {}
            _ => {
                *loss = Some(MatchupRecord {
                    opponent: outcome.winner,
                    week: outcome.week,
                    team_score: outcome.loser_score,
                    opponent_score: outcome.winner_score,
                    margin: outcome.margin,
                })
            }
        }
    }

    /// Fold another accumulator into this one: counts add, the closest win
    /// keeps the smaller margin, the worst loss the larger.
    pub fn merge(&mut self, other: TrialAccumulator) {
        assert_eq!(self.counts.len(), other.counts.len());
        assert_eq!(self.num_weeks, other.num_weeks);

        self.trials += other.trials;
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            for (count, &added) in mine.iter_mut().zip(theirs) {
                *count += added;
            }
        }
        for (mine, theirs) in self.extremes.iter_mut().zip(&other.extremes) {
            if let Some(new) = theirs.closest_win {
                match mine.closest_win {
                    Some(current) if current.margin <= new.margin => {}
                    _ => mine.closest_win = Some(new),
                }
            }
            if let Some(new) = theirs.worst_loss {
                match mine.worst_loss {
                    Some(current) if current.margin >= new.margin => {}
                    _ => mine.worst_loss = Some(new),
                }
            }
        }
    }

    /// Total trials observed.
    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn num_teams(&self) -> usize {
        self.counts.len()
    }

    pub fn num_weeks(&self) -> usize {
        self.num_weeks
    }

    /// A team's record counts, indexed by win count.
    pub fn record_counts(&self, team: usize) -> &[u64] {
        &self.counts[team]
    }

    /// A team's extremal trackers.
    pub fn extremes(&self, team: usize) -> &TeamExtremes {
        &self.extremes[team]
    }
}

/// Run `num_trials` independent trials of generate-then-simulate and
/// accumulate the results.
///
/// Trials are embarrassingly parallel: the work is split into fixed-size
/// chunks on the rayon pool, each chunk driving its own `ChaCha8Rng` stream
/// (sub-seeded from `seed`, or from entropy when `None`), its own reusable
/// schedule and record buffers, and its own private accumulator. Chunk
/// accumulators are merged once at the end.
///
/// All structural problems (zero trials or weeks, odd or empty team count,
/// short score rows) are rejected before the first trial runs.
pub fn run_trials(
    table: &ScoreTable,
    num_weeks: usize,
    num_trials: usize,
    seed: Option<u64>,
) -> Result<TrialAccumulator> {
    if num_trials == 0 {
        return Err(SimError::InvalidConfig(
            "number of trials must be positive".to_string(),
        ));
    }
    if num_weeks == 0 {
        return Err(SimError::InvalidConfig(
            "number of weeks must be positive".to_string(),
        ));
    }
    if table.is_empty() {
        return Err(SimError::InvalidConfig(
            "score table has no teams".to_string(),
        ));
    }
    if table.len() % 2 != 0 {
        return Err(SimError::OddTeamCount {
            team_count: table.len(),
        });
    }
    table.check_weeks(num_weeks)?;

    let mut master = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };

    let num_chunks = (num_trials + TRIALS_PER_CHUNK - 1) / TRIALS_PER_CHUNK;
    let chunks: Vec<(u64, usize)> = (0..num_chunks)
        .map(|i| {
            let start = i * TRIALS_PER_CHUNK;
            let len = TRIALS_PER_CHUNK.min(num_trials - start);
            (master.gen::<u64>(), len)
        })
        .collect();

    log::debug!(
        "running {} trials in {} chunks ({} teams, {} weeks)",
        num_trials,
        chunks.len(),
        table.len(),
        num_weeks
    );

    let partials: Vec<Result<TrialAccumulator>> = chunks
        .par_iter()
        .map(|&(chunk_seed, chunk_trials)| run_chunk(table, num_weeks, chunk_trials, chunk_seed))
        .collect();

    let mut acc = TrialAccumulator::new(table.len(), num_weeks);
    for partial in partials {
        acc.merge(partial?);
    }

    log::debug!("completed {} trials", acc.trials());
    Ok(acc)
}

/// One worker's share: a sequential trial loop over reused buffers.
fn run_chunk(
    table: &ScoreTable,
    num_weeks: usize,
    num_trials: usize,
    seed: u64,
) -> Result<TrialAccumulator> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut schedule = Schedule::generate(table.len(), num_weeks, &mut rng)?;
    let mut records = vec![TeamRecord::default(); table.len()];
    let mut acc = TrialAccumulator::new(table.len(), num_weeks);

    for trial in 0..num_trials {
        if trial > 0 {
            schedule.regenerate(&mut rng);
        }
        simulate_season(table, &schedule, &mut records, |outcome| {
            acc.observe_matchup(outcome)
        })?;
        acc.observe_season(&records);
    }

    Ok(acc)
}
