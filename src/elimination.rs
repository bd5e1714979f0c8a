use pyo3::prelude::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::OnceLock;

use log::debug;

use crate::division::Division;
use crate::error::EliminationError;
use crate::flow::FlowNetwork;

const SOURCE: usize = 0;

/// Node id layout of the per-team network: source, then one node per rival
/// pair with games left, then one node per rival team in index order, then
/// the sink.
fn team_node(game_nodes: usize, rank: usize) -> usize {
    1 + game_nodes + rank
}

/// Rank of rival team `i` among all teams other than `x`, in index order.
fn rival_rank(x: usize, i: usize) -> usize {
    if i < x {
        i
    } else {
        i - 1
    }
}

/// Cached outcome of analyzing one team, keyed by its index in the division.
#[derive(Debug)]
enum Analysis {
    /// Some rival's current win count already exceeds the team's ceiling;
    /// holds every such rival. Never empty.
    Trivial { rivals: Vec<usize> },
    /// The flow reduction had to decide.
    Flow(FlowAnalysis),
}

impl Analysis {
    fn eliminated(&self) -> bool {
        match self {
            Analysis::Trivial { .. } => true,
            Analysis::Flow(flow) => flow.max_flow < flow.total_games,
        }
    }
}

/// Residual network and max-flow result for one queried team.
///
/// Retained for the lifetime of the oracle so the certificate query reads
/// the very cut that decided elimination, never a rebuilt one.
#[derive(Debug)]
struct FlowAnalysis {
    network: FlowNetwork,
    game_nodes: usize,
    /// Total capacity leaving the source: all remaining games among rivals.
    total_games: u64,
    max_flow: u64,
}

/// Answers elimination queries for one loaded division.
///
/// For each queried team the oracle first applies the O(n) trivial test; if
/// inconclusive it builds the flow network, runs max-flow once, and caches
/// the analysis in a per-team slot. The slots are `OnceLock`s, so a shared
/// oracle fills each slot exactly once even under concurrent queries.
#[pyclass]
pub struct EliminationOracle {
    division: Division,
    cache: Vec<OnceLock<Analysis>>,
}

impl EliminationOracle {
    pub fn new(division: Division) -> Self {
        let mut cache = Vec::new();
        cache.resize_with(division.team_count(), OnceLock::new);
        EliminationOracle { division, cache }
    }

    /// The underlying division model.
    pub fn division(&self) -> &Division {
        &self.division
    }

    /// Whether the named team is mathematically eliminated from first place.
    pub fn is_eliminated(&self, team: &str) -> Result<bool, EliminationError> {
        let x = self.division.resolve(team)?;
        Ok(self.analysis(x).eliminated())
    }

    /// Witness subset of teams proving elimination; `None` iff the team is
    /// not eliminated.
    pub fn certificate_of_elimination(
        &self,
        team: &str,
    ) -> Result<Option<Vec<String>>, EliminationError> {
        let x = self.division.resolve(team)?;
        Ok(self.certificate_of_index(x))
    }

    fn analysis(&self, x: usize) -> &Analysis {
        self.cache[x].get_or_init(|| {
            let ceiling = self.division.ceiling_of(x);
            let rivals: Vec<usize> = (0..self.division.team_count())
                .filter(|&i| i != x && self.division.wins_of(i) > ceiling)
                .collect();
            if rivals.is_empty() {
                Analysis::Flow(self.flow_analysis(x))
            } else {
                Analysis::Trivial { rivals }
            }
        })
    }

    fn certificate_of_index(&self, x: usize) -> Option<Vec<String>> {
        match self.analysis(x) {
            Analysis::Trivial { rivals } => Some(
                rivals
                    .iter()
                    .map(|&i| self.division.name_of(i).to_string())
                    .collect(),
            ),
            Analysis::Flow(flow) if flow.max_flow < flow.total_games => {
                Some(self.cut_certificate(x, flow))
            }
            Analysis::Flow(_) => None,
        }
    }

    /// Build the network for team `x`, run max-flow, and keep the residual.
    ///
    /// Team `x` can end with at most `ceiling` wins; elimination holds iff
    /// not all remaining games among its rivals can be routed to rivals with
    /// slack below that ceiling, i.e. iff max-flow falls short of the total
    /// source capacity.
    fn flow_analysis(&self, x: usize) -> FlowAnalysis {
        let division = &self.division;
        let n = division.team_count();
        let ceiling = division.ceiling_of(x);

        let mut pairs: Vec<(usize, usize, u64)> = Vec::new();
        let mut total_games = 0u64;
        for i in 0..n {
            if i == x {
                continue;
            }
            for j in (i + 1)..n {
                if j == x {
                    continue;
                }
                let games = division.games_between(i, j);
                if games > 0 {
                    pairs.push((i, j, games));
                    total_games += games;
                }
            }
        }

        let game_nodes = pairs.len();
        let rival_count = n - 1;
        let sink = 1 + game_nodes + rival_count;
        let mut network = FlowNetwork::new(sink + 1);

        // One more than every remaining game combined, so a game -> team
        // edge is never the bottleneck.
        let unbounded = total_games + 1;

        for (g, &(i, j, games)) in pairs.iter().enumerate() {
            let game_node = 1 + g;
            network.add_edge(SOURCE, game_node, games);
            network.add_edge(game_node, team_node(game_nodes, rival_rank(x, i)), unbounded);
            network.add_edge(game_node, team_node(game_nodes, rival_rank(x, j)), unbounded);
        }
        for i in (0..n).filter(|&i| i != x) {
            // Saturating: a rival already past the ceiling contributes no
            // slack. The trivial test fires before this point, but the
            // builder must not wrap if handed that case anyway.
            let slack = ceiling.saturating_sub(division.wins_of(i));
            network.add_edge(team_node(game_nodes, rival_rank(x, i)), sink, slack);
        }

        let max_flow = network.max_flow(SOURCE, sink);
        debug!(
            "elimination network for {:?}: {} nodes ({} games, {} rivals), flow {}/{}",
            division.name_of(x),
            network.node_count(),
            game_nodes,
            rival_count,
            max_flow,
            total_games
        );

        FlowAnalysis {
            network,
            game_nodes,
            total_games,
            max_flow,
        }
    }

    /// Rival teams on the source side of the min cut of the cached residual
    /// network, translated back to names.
    fn cut_certificate(&self, x: usize, flow: &FlowAnalysis) -> Vec<String> {
        let side = flow.network.source_side(SOURCE);
        (0..self.division.team_count())
            .filter(|&i| i != x)
            .filter(|&i| side[team_node(flow.game_nodes, rival_rank(x, i))])
            .map(|i| self.division.name_of(i).to_string())
            .collect()
    }
}

#[pymethods]
impl EliminationOracle {
    #[new]
    fn py_new(division: Division) -> Self {
        EliminationOracle::new(division)
    }

    /// Number of teams in the underlying division.
    pub fn team_count(&self) -> usize {
        self.division.team_count()
    }

    /// All team names, in load order.
    pub fn teams(&self) -> Vec<String> {
        self.division.teams()
    }

    #[getter(division)]
    fn py_division(&self) -> Division {
        self.division.clone()
    }

    #[pyo3(name = "wins")]
    fn py_wins(&self, team: &str) -> PyResult<u64> {
        Ok(self.division.wins(team)?)
    }

    #[pyo3(name = "losses")]
    fn py_losses(&self, team: &str) -> PyResult<u64> {
        Ok(self.division.losses(team)?)
    }

    #[pyo3(name = "remaining")]
    fn py_remaining(&self, team: &str) -> PyResult<u64> {
        Ok(self.division.remaining(team)?)
    }

    #[pyo3(name = "against")]
    fn py_against(&self, team_a: &str, team_b: &str) -> PyResult<u64> {
        Ok(self.division.against(team_a, team_b)?)
    }

    #[pyo3(name = "is_eliminated")]
    fn py_is_eliminated(&self, team: &str) -> PyResult<bool> {
        Ok(self.is_eliminated(team)?)
    }

    #[pyo3(name = "certificate_of_elimination")]
    fn py_certificate_of_elimination(&self, team: &str) -> PyResult<Option<Vec<String>>> {
        Ok(self.certificate_of_elimination(team)?)
    }

    fn __repr__(&self) -> String {
        format!("EliminationOracle({} teams)", self.division.team_count())
    }
}

/// Elimination status for every team of the division at once.
///
/// Returns a map from team name to its certificate (`None` when the team is
/// not eliminated). Per-team analyses run in parallel; results land in the
/// oracle's cache exactly as if the teams had been queried one by one.
#[pyfunction]
pub fn elimination_report(oracle: &EliminationOracle) -> HashMap<String, Option<Vec<String>>> {
    (0..oracle.division.team_count())
        .into_par_iter()
        .map(|i| {
            (
                oracle.division.name_of(i).to_string(),
                oracle.certificate_of_index(i),
            )
        })
        .collect()
}

/// Names of all eliminated teams, in load order.
#[pyfunction]
pub fn eliminated_teams(oracle: &EliminationOracle) -> Vec<String> {
    (0..oracle.division.team_count())
        .into_par_iter()
        .filter(|&i| oracle.analysis(i).eliminated())
        .map(|i| oracle.division.name_of(i).to_string())
        .collect()
}
