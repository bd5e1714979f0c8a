use pyo3::prelude::*;
use std::collections::HashMap;

use log::debug;

use crate::error::EliminationError;
use crate::team::TeamRecord;

/// Immutable division model: per-team standings plus the pairwise
/// remaining-game matrix and a stable name <-> dense-index mapping.
///
/// Built once from the loader's table and validated in full; every query
/// afterwards is a read, so a `Division` can be shared across threads
/// without synchronization.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Division {
    names: Vec<String>,
    index: HashMap<String, usize>,
    wins: Vec<u64>,
    losses: Vec<u64>,
    remaining: Vec<u64>,
    against: Vec<Vec<u64>>,
}

impl Division {
    /// Build and validate a division from loader records.
    ///
    /// Rejects the whole table with `InvalidInput` on any negative stat,
    /// ragged or asymmetric `against` matrix, nonzero diagonal, or duplicate
    /// or empty team name. A `Division` that constructs is consistent.
    pub fn new(records: Vec<TeamRecord>) -> Result<Self, EliminationError> {
        let n = records.len();
        let mut names = Vec::with_capacity(n);
        let mut index = HashMap::with_capacity(n);
        let mut wins = Vec::with_capacity(n);
        let mut losses = Vec::with_capacity(n);
        let mut remaining = Vec::with_capacity(n);
        let mut against = Vec::with_capacity(n);

        for (i, rec) in records.iter().enumerate() {
            if rec.name.is_empty() {
                return Err(EliminationError::invalid_input(format!(
                    "team at position {} has an empty name",
                    i
                )));
            }
            if index.insert(rec.name.clone(), i).is_some() {
                return Err(EliminationError::invalid_input(format!(
                    "duplicate team name {:?}",
                    rec.name
                )));
            }
            names.push(rec.name.clone());
            wins.push(checked_stat(rec.wins, "wins", &rec.name)?);
            losses.push(checked_stat(rec.losses, "losses", &rec.name)?);
            remaining.push(checked_stat(rec.remaining, "remaining", &rec.name)?);

            if rec.against.len() != n {
                return Err(EliminationError::invalid_input(format!(
                    "team {:?} lists {} opponents, expected {}",
                    rec.name,
                    rec.against.len(),
                    n
                )));
            }
            let row = rec
                .against
                .iter()
                .map(|&g| checked_stat(g, "remaining games against", &rec.name))
                .collect::<Result<Vec<u64>, _>>()?;
            against.push(row);
        }

        // The matrix is an invariant of the source table, checked once here
        // rather than defended against at query time.
        for i in 0..n {
            if against[i][i] != 0 {
                return Err(EliminationError::invalid_input(format!(
                    "team {:?} has {} remaining games against itself",
                    names[i], against[i][i]
                )));
            }
            for j in (i + 1)..n {
                if against[i][j] != against[j][i] {
                    return Err(EliminationError::invalid_input(format!(
                        "asymmetric matrix: {:?} vs {:?} is {} one way and {} the other",
                        names[i], names[j], against[i][j], against[j][i]
                    )));
                }
            }
        }

        debug!("loaded division with {} teams", n);
        Ok(Division {
            names,
            index,
            wins,
            losses,
            remaining,
            against,
        })
    }

    /// Number of wins for the named team.
    pub fn wins(&self, team: &str) -> Result<u64, EliminationError> {
        Ok(self.wins[self.resolve(team)?])
    }

    /// Number of losses for the named team.
    pub fn losses(&self, team: &str) -> Result<u64, EliminationError> {
        Ok(self.losses[self.resolve(team)?])
    }

    /// Number of remaining games for the named team.
    pub fn remaining(&self, team: &str) -> Result<u64, EliminationError> {
        Ok(self.remaining[self.resolve(team)?])
    }

    /// Number of remaining games between two named teams.
    pub fn against(&self, team_a: &str, team_b: &str) -> Result<u64, EliminationError> {
        let a = self.resolve(team_a)?;
        let b = self.resolve(team_b)?;
        Ok(self.against[a][b])
    }

    /// Dense index of a team name; `UnknownTeam` if absent or empty.
    pub(crate) fn resolve(&self, team: &str) -> Result<usize, EliminationError> {
        if team.is_empty() {
            return Err(EliminationError::unknown_team(team));
        }
        self.index
            .get(team)
            .copied()
            .ok_or_else(|| EliminationError::unknown_team(team))
    }

    pub(crate) fn name_of(&self, i: usize) -> &str {
        &self.names[i]
    }

    pub(crate) fn wins_of(&self, i: usize) -> u64 {
        self.wins[i]
    }

    pub(crate) fn remaining_of(&self, i: usize) -> u64 {
        self.remaining[i]
    }

    pub(crate) fn games_between(&self, i: usize, j: usize) -> u64 {
        self.against[i][j]
    }

    /// Best possible final win count for team `i`.
    pub(crate) fn ceiling_of(&self, i: usize) -> u64 {
        self.wins[i] + self.remaining[i]
    }
}

#[pymethods]
impl Division {
    #[new]
    fn py_new(records: Vec<TeamRecord>) -> PyResult<Self> {
        Ok(Division::new(records)?)
    }

    /// Number of teams in the division.
    pub fn team_count(&self) -> usize {
        self.names.len()
    }

    /// All team names, in load order.
    pub fn teams(&self) -> Vec<String> {
        self.names.clone()
    }

    #[pyo3(name = "wins")]
    fn py_wins(&self, team: &str) -> PyResult<u64> {
        Ok(self.wins(team)?)
    }

    #[pyo3(name = "losses")]
    fn py_losses(&self, team: &str) -> PyResult<u64> {
        Ok(self.losses(team)?)
    }

    #[pyo3(name = "remaining")]
    fn py_remaining(&self, team: &str) -> PyResult<u64> {
        Ok(self.remaining(team)?)
    }

    #[pyo3(name = "against")]
    fn py_against(&self, team_a: &str, team_b: &str) -> PyResult<u64> {
        Ok(self.against(team_a, team_b)?)
    }

    fn __repr__(&self) -> String {
        format!("Division({} teams)", self.names.len())
    }
}

fn checked_stat(value: i64, what: &str, team: &str) -> Result<u64, EliminationError> {
    u64::try_from(value).map_err(|_| {
        EliminationError::invalid_input(format!("negative {} for team {:?}: {}", what, team, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_pair() -> Vec<TeamRecord> {
        vec![
            TeamRecord::new("Atlanta".to_string(), 52, 30, 10, vec![0, 4]),
            TeamRecord::new("Montreal".to_string(), 40, 42, 10, vec![4, 0]),
        ]
    }

    #[test]
    fn test_accessors() {
        let division = Division::new(make_pair()).unwrap();

        assert_eq!(division.team_count(), 2);
        assert_eq!(division.teams(), vec!["Atlanta", "Montreal"]);
        assert_eq!(division.wins("Atlanta").unwrap(), 52);
        assert_eq!(division.losses("Montreal").unwrap(), 42);
        assert_eq!(division.remaining("Atlanta").unwrap(), 10);
        assert_eq!(division.against("Atlanta", "Montreal").unwrap(), 4);
        assert_eq!(division.against("Montreal", "Atlanta").unwrap(), 4);
        assert_eq!(division.against("Atlanta", "Atlanta").unwrap(), 0);
    }

    #[test]
    fn test_unknown_team() {
        let division = Division::new(make_pair()).unwrap();

        assert!(matches!(
            division.wins("Boston"),
            Err(EliminationError::UnknownTeam { .. })
        ));
        assert!(matches!(
            division.against("Atlanta", "Boston"),
            Err(EliminationError::UnknownTeam { .. })
        ));
        assert!(matches!(
            division.against("Boston", "Atlanta"),
            Err(EliminationError::UnknownTeam { .. })
        ));
        // Empty names are never valid, even if a loader smuggled one in.
        assert!(matches!(
            division.remaining(""),
            Err(EliminationError::UnknownTeam { .. })
        ));
    }

    #[test]
    fn test_negative_stat_rejected() {
        let mut records = make_pair();
        records[1].losses = -1;

        assert!(matches!(
            Division::new(records),
            Err(EliminationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_asymmetric_matrix_rejected() {
        let mut records = make_pair();
        records[1].against = vec![3, 0];

        let err = Division::new(records).unwrap_err();
        assert!(matches!(err, EliminationError::InvalidInput { .. }));
        assert!(err.to_string().contains("asymmetric"));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let mut records = make_pair();
        records[0].against = vec![0, 4, 1];

        assert!(matches!(
            Division::new(records),
            Err(EliminationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_nonzero_diagonal_rejected() {
        let mut records = make_pair();
        records[0].against = vec![2, 4];

        assert!(matches!(
            Division::new(records),
            Err(EliminationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut records = make_pair();
        records[1].name = "Atlanta".to_string();

        assert!(matches!(
            Division::new(records),
            Err(EliminationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut records = make_pair();
        records[0].name = String::new();

        assert!(matches!(
            Division::new(records),
            Err(EliminationError::InvalidInput { .. })
        ));
    }
}
