use std::collections::HashMap;

use crate::error::{Result, SimError};

/// Per-team weekly scores, the read-only input to every simulation run.
///
/// Teams keep their insertion order; the final report uses that order as the
/// stable tie-break when ranking teams, so a loader that inserts rows in file
/// order (or name order) determines how ties display. Internally teams are
/// addressed by dense index so the trial loop never hashes a name.
#[derive(Clone, Debug, Default)]
pub struct ScoreTable {
    names: Vec<String>,
    scores: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
}

impl ScoreTable {
    pub fn new() -> Self {
        ScoreTable::default()
    }

    /// Build a table from `(team name, weekly scores)` rows.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<f64>)>,
    {
        let mut table = ScoreTable::new();
        for (name, scores) in rows {
            table.insert(name, scores)?;
        }
        Ok(table)
    }

    /// Add a team's score row. Team names must be unique.
    pub fn insert(&mut self, name: String, scores: Vec<f64>) -> Result<()> {
        if self.index.contains_key(&name) {
            return Err(SimError::DuplicateTeam(name));
        }
        self.index.insert(name.clone(), self.names.len());
        self.names.push(name);
        self.scores.push(scores);
        Ok(())
    }

    /// Number of teams.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Team name for a dense index.
    pub fn name(&self, team: usize) -> &str {
        &self.names[team]
    }

    /// Weekly scores for a dense index.
    pub fn scores(&self, team: usize) -> &[f64] {
        &self.scores[team]
    }

    /// Look up a team's scores by name.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.index.get(name).map(|&i| self.scores[i].as_slice())
    }

    /// Iterate team names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Check that every team has a score for each of the first `num_weeks`
    /// weeks. Week numbers in the error are 1-based, matching reports.
    pub fn check_weeks(&self, num_weeks: usize) -> Result<()> {
        for (name, scores) in self.names.iter().zip(&self.scores) {
            if scores.len() < num_weeks {
                return Err(SimError::MissingScore {
                    team: name.clone(),
                    week: scores.len() + 1,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let table = ScoreTable::from_rows(vec![
            ("Zeta".to_string(), vec![1.0]),
            ("Alpha".to_string(), vec![2.0]),
        ])
        .unwrap();

        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert_eq!(table.name(0), "Zeta");
        assert_eq!(table.scores(1), &[2.0]);
        assert_eq!(table.get("Alpha"), Some(&[2.0][..]));
    }

    #[test]
    fn test_duplicate_team_rejected() {
        let mut table = ScoreTable::new();
        table.insert("A".to_string(), vec![1.0]).unwrap();
        let err = table.insert("A".to_string(), vec![2.0]).unwrap_err();
        assert_eq!(err, SimError::DuplicateTeam("A".to_string()));
    }

    #[test]
    fn test_check_weeks() {
        let table = ScoreTable::from_rows(vec![
            ("A".to_string(), vec![1.0, 2.0, 3.0]),
            ("B".to_string(), vec![1.0, 2.0]),
        ])
        .unwrap();

        assert!(table.check_weeks(2).is_ok());
        let err = table.check_weeks(3).unwrap_err();
        assert_eq!(
            err,
            SimError::MissingScore {
                team: "B".to_string(),
                week: 3,
            }
        );
    }
}
