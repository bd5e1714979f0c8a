use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::PyErr;
use thiserror::Error;

/// Errors surfaced by the division model and the elimination oracle.
///
/// `UnknownTeam` is raised at the start of any name-taking query, before any
/// computation or cache mutation. `InvalidInput` is raised only while
/// constructing a [`Division`](crate::Division); a malformed table never
/// produces a queryable model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EliminationError {
    /// The named team is not part of the division (or the name is empty).
    #[error("unknown team: {name:?}")]
    UnknownTeam { name: String },

    /// The source table was malformed and construction was aborted.
    #[error("invalid division table: {reason}")]
    InvalidInput { reason: String },
}

impl EliminationError {
    pub(crate) fn unknown_team(name: &str) -> Self {
        EliminationError::UnknownTeam {
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid_input(reason: String) -> Self {
        EliminationError::InvalidInput { reason }
    }
}

impl From<EliminationError> for PyErr {
    fn from(err: EliminationError) -> PyErr {
        match err {
            EliminationError::UnknownTeam { .. } => PyKeyError::new_err(err.to_string()),
            EliminationError::InvalidInput { .. } => PyValueError::new_err(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = EliminationError::unknown_team("Montreal");
        assert!(err.to_string().contains("Montreal"));

        let err = EliminationError::invalid_input("asymmetric matrix".to_string());
        assert!(err.to_string().contains("asymmetric matrix"));
    }
}
