use pyo3::prelude::*;

/// One row of the division table, as handed over by the external loader.
///
/// Stats are kept signed so that a negative value coming across the boundary
/// reaches [`Division::new`](crate::Division::new) validation instead of
/// failing in conversion before the model can report it.
#[pyclass]
#[derive(Clone, Debug)]
pub struct TeamRecord {
    #[pyo3(get, set)]
    pub name: String,

    #[pyo3(get, set)]
    pub wins: i64,

    #[pyo3(get, set)]
    pub losses: i64,

    /// Remaining games in total, not all of which need be within the division.
    #[pyo3(get, set)]
    pub remaining: i64,

    /// Remaining games against each team in division order (own entry zero).
    #[pyo3(get, set)]
    pub against: Vec<i64>,
}

#[pymethods]
impl TeamRecord {
    #[new]
    pub fn new(name: String, wins: i64, losses: i64, remaining: i64, against: Vec<i64>) -> Self {
        TeamRecord {
            name,
            wins,
            losses,
            remaining,
            against,
        }
    }

    fn __str__(&self) -> String {
        format!(
            "{}: {}-{} ({} remaining)",
            self.name, self.wins, self.losses, self.remaining
        )
    }

    fn __repr__(&self) -> String {
        format!(
            "TeamRecord({:?}, {}, {}, {}, {:?})",
            self.name, self.wins, self.losses, self.remaining, self.against
        )
    }
}
