//! The top-level solver facade: dispatches to a search strategy and reports a
//! verdict plus statistics.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use log::info;

use crate::budget::{Budget, UnknownReason};
use crate::cnf::CnfFormula;
use crate::config::{SolverConfig, Strategy};
use crate::model::Model;
use crate::{cdcl, dp, dpll, resolution};

/// The outcome of a solve call.
#[derive(Clone, Debug, PartialEq)]
pub enum SolveResult {
    Sat(Model),
    Unsat,
    /// The search stopped before reaching a verdict, e.g. a budget ran out.
    Unknown(UnknownReason),
}

impl SolveResult {
    pub fn is_sat(&self) -> bool {
        matches!(self, SolveResult::Sat(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, SolveResult::Unsat)
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            SolveResult::Sat(model) => Some(model),
            _ => None,
        }
    }
}

/// Counters describing the work a solve call performed.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SolverStats {
    pub decisions: u64,
    pub propagations: u64,
    pub conflicts: u64,
    pub restarts: u64,
    pub learned_clauses: u64,
    pub deleted_clauses: u64,
    /// Wall-clock time the solve call took, in seconds.
    pub elapsed_seconds: f64,
}

/// Runs a configured search strategy against a formula.
pub struct Solver {
    config: SolverConfig,
    cancelled: Option<Arc<AtomicBool>>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Solver {
        Solver {
            config,
            cancelled: None,
        }
    }

    /// A shared flag the caller can set from another thread to cancel the
    /// in-progress solve, reported back as `UnknownReason::Cancelled`.
    pub fn cancellation_flag(&mut self) -> Arc<AtomicBool> {
        let flag = Arc::new(AtomicBool::new(false));
        self.cancelled = Some(flag.clone());
        flag
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves `formula`, returning the verdict and the stats gathered along
    /// the way.
    pub fn solve(&self, formula: &CnfFormula) -> (SolveResult, SolverStats) {
        let started_at = Instant::now();
        let budget = Budget::new(&self.config, started_at, self.cancelled.clone());
        let mut stats = SolverStats::default();

        let result = match self.config.strategy {
            Strategy::Cdcl => cdcl::solve(formula, &self.config, &budget, &mut stats),
            Strategy::Dpll => dpll::solve(formula, &self.config, &budget, &mut stats),
            Strategy::Dp => dp::solve(formula, &budget, &mut stats),
            Strategy::Resolution => resolution::solve(formula, &budget),
        };
        stats.elapsed_seconds = started_at.elapsed().as_secs_f64();

        info!(
            "solve finished: {:?} confl: {} dec: {} restarts: {} in {:?}",
            result_tag(&result),
            stats.conflicts,
            stats.decisions,
            stats.restarts,
            started_at.elapsed()
        );

        (result, stats)
    }
}

fn result_tag(result: &SolveResult) -> &'static str {
    match result {
        SolveResult::Sat(_) => "SAT",
        SolveResult::Unsat => "UNSAT",
        SolveResult::Unknown(_) => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit::Lit;

    fn clause(xs: &[isize]) -> Vec<Lit> {
        xs.iter().map(|&x| Lit::from_dimacs(x)).collect()
    }

    #[test]
    fn solves_trivial_sat_formula() {
        let formula = CnfFormula::from(vec![clause(&[1, 2]), clause(&[-1])]);
        let solver = Solver::new(SolverConfig::default());
        let (result, _) = solver.solve(&formula);
        assert!(result.is_sat());
        assert!(result.model().unwrap().satisfies(Lit::from_dimacs(2)));
    }

    #[test]
    fn solves_trivial_unsat_formula() {
        let formula = CnfFormula::from(vec![clause(&[1]), clause(&[-1])]);
        let solver = Solver::new(SolverConfig::default());
        let (result, _) = solver.solve(&formula);
        assert!(result.is_unsat());
    }
}
