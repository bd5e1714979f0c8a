//! Pennant Core - baseball-style division elimination queries.
//!
//! Given a division's fixed win/loss/remaining-game records, this library
//! decides which teams are mathematically eliminated from first place and
//! produces a witness subset of teams proving each elimination. The
//! interesting cases reduce to a max-flow/min-cut computation over a small
//! game/team network built per queried team.
//!
//! The crate doubles as a Python extension module via PyO3; the reporting
//! and input-parsing layers live with the Python caller.

use pyo3::prelude::*;

pub mod division;
pub mod elimination;
pub mod error;
mod flow;
pub mod team;

pub use division::Division;
pub use elimination::{elimination_report, eliminated_teams, EliminationOracle};
pub use error::EliminationError;
pub use team::TeamRecord;

/// Python module definition
#[pymodule]
fn pennant_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Classes
    m.add_class::<TeamRecord>()?;
    m.add_class::<Division>()?;
    m.add_class::<EliminationOracle>()?;

    // Whole-division sweeps
    m.add_function(wrap_pyfunction!(elimination_report, m)?)?;
    m.add_function(wrap_pyfunction!(eliminated_teams, m)?)?;

    Ok(())
}
