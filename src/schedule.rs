use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, SimError};

/// One randomized season schedule: for each week, a pairing of all teams.
///
/// Each week is drawn independently as a uniform random permutation of the
/// team indices, split into consecutive pairs: pair `k` holds the `2k`-th
/// and `2k+1`-th teams of the permutation. Nothing prevents the same matchup
/// from recurring in later weeks.
///
/// Pair order matters downstream: the season simulator's tie-break favors
/// the second team of a pair, so `(first, second)` is an ordered tuple even
/// though the matchup itself is unordered.
#[derive(Clone, Debug)]
pub struct Schedule {
    weeks: Vec<Vec<(usize, usize)>>,
    perm: Vec<usize>,
}

impl Schedule {
    /// Draw a fresh schedule for `num_teams` teams over `num_weeks` weeks.
    ///
    /// The caller supplies the random source, so independent trial workers
    /// can each drive their own stream.
    pub fn generate<R: Rng>(num_teams: usize, num_weeks: usize, rng: &mut R) -> Result<Self> {
        if num_teams == 0 {
            return Err(SimError::InvalidConfig("no teams to schedule".to_string()));
        }
        if num_teams % 2 != 0 {
            return Err(SimError::OddTeamCount { team_count: num_teams });
        }

        let mut schedule = Schedule {
            weeks: (0..num_weeks)
                .map(|_| Vec::with_capacity(num_teams / 2))
                .collect(),
            perm: (0..num_teams).collect(),
        };
        schedule.regenerate(rng);
        Ok(schedule)
    }

    /// Redraw every week's pairing in place, reusing the existing buffers.
    ///
    /// The trial loop calls this once per trial instead of building a new
    /// `Schedule`, keeping the hot path free of steady-state allocation.
    pub fn regenerate<R: Rng>(&mut self, rng: &mut R) {
        for week in &mut self.weeks {
            self.perm.shuffle(rng);
            week.clear();
            week.extend(self.perm.chunks_exact(2).map(|pair| (pair[0], pair[1])));
        }
    }

    pub fn num_weeks(&self) -> usize {
        self.weeks.len()
    }

    pub fn num_teams(&self) -> usize {
        self.perm.len()
    }

    /// Matchups for one week, in pair order.
    pub fn week(&self, week: usize) -> &[(usize, usize)] {
        &self.weeks[week]
    }

    /// Iterate weeks in season order.
    pub fn weeks(&self) -> impl Iterator<Item = &[(usize, usize)]> {
        self.weeks.iter().map(Vec::as_slice)
    }
}

#[cfg(test)]
impl Schedule {
    /// Test-only: a fixed schedule with explicit week pairings.
    pub(crate) fn from_weeks(num_teams: usize, weeks: Vec<Vec<(usize, usize)>>) -> Self {
        Schedule {
            weeks,
            perm: (0..num_teams).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn assert_perfect_matching(week: &[(usize, usize)], num_teams: usize) {
        let mut seen = vec![false; num_teams];
        for &(a, b) in week {
            assert_ne!(a, b, "team paired with itself");
            assert!(!seen[a], "team {} appears twice", a);
            assert!(!seen[b], "team {} appears twice", b);
            seen[a] = true;
            seen[b] = true;
        }
        assert!(seen.iter().all(|&s| s), "not every team plays");
    }

    #[test]
    fn test_every_team_plays_once_per_week() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let schedule = Schedule::generate(8, 5, &mut rng).unwrap();

        assert_eq!(schedule.num_weeks(), 5);
        assert_eq!(schedule.num_teams(), 8);
        for week in schedule.weeks() {
            assert_eq!(week.len(), 4);
            assert_perfect_matching(week, 8);
        }
    }

    #[test]
    fn test_odd_team_count_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let err = Schedule::generate(3, 1, &mut rng).unwrap_err();
        assert_eq!(err, SimError::OddTeamCount { team_count: 3 });
    }

    #[test]
    fn test_zero_teams_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(matches!(
            Schedule::generate(0, 1, &mut rng),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(42);
        let mut rng2 = ChaCha8Rng::seed_from_u64(42);

        let s1 = Schedule::generate(6, 4, &mut rng1).unwrap();
        let s2 = Schedule::generate(6, 4, &mut rng2).unwrap();

        for (w1, w2) in s1.weeks().zip(s2.weeks()) {
            assert_eq!(w1, w2);
        }
    }

    #[test]
    fn test_regenerate_keeps_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut schedule = Schedule::generate(4, 3, &mut rng).unwrap();

        for _ in 0..10 {
            schedule.regenerate(&mut rng);
            assert_eq!(schedule.num_weeks(), 3);
            for week in schedule.weeks() {
                assert_perfect_matching(week, 4);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_weeks_are_perfect_matchings(
            pairs in 1usize..=10,
            num_weeks in 1usize..=8,
            seed in any::<u64>(),
        ) {
            let num_teams = pairs * 2;
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let schedule = Schedule::generate(num_teams, num_weeks, &mut rng).unwrap();

            prop_assert_eq!(schedule.num_weeks(), num_weeks);
            for week in schedule.weeks() {
                assert_perfect_matching(week, num_teams);
            }
        }
    }
}
