//! The DPLL strategy: unit propagation plus chronological backtracking, with
//! optional pure-literal elimination -- no clause learning or non-chronological
//! backjumping.
//!
//! Each decision tries the positive literal first; on conflict the search
//! backtracks to that same decision and tries the negative literal; if both
//! have been tried it backtracks further. This is the textbook algorithm the
//! CDCL strategy in [`crate::cdcl`] generalizes.

use crate::budget::Budget;
use crate::clause::ClauseDb;
use crate::cnf::CnfFormula;
use crate::config::SolverConfig;
use crate::lit::{Lit, LitValue, Var};
use crate::model::Model;
use crate::propagate::propagate;
use crate::solver::{SolveResult, SolverStats};
use crate::trail::Trail;
use crate::watch::Watchlists;

struct Frame {
    var: Var,
    tried_negative: bool,
}

pub fn solve(
    formula: &CnfFormula,
    config: &SolverConfig,
    budget: &Budget,
    stats: &mut SolverStats,
) -> SolveResult {
    let var_count = formula.var_count();

    let mut db = ClauseDb::new();
    let mut watchlists = Watchlists::new();
    watchlists.set_var_count(var_count);
    let mut trail = Trail::new(var_count);
    let mut trivially_unsat = false;

    for lits in formula.iter() {
        if lits.is_empty() {
            trivially_unsat = true;
            continue;
        }
        let lits = lits.to_vec();
        if lits.len() == 1 {
            let lit = lits[0];
            let id = db.add_original(lits);
            match trail.value_of(lit) {
                LitValue::True => {}
                LitValue::False => trivially_unsat = true,
                LitValue::Unassigned => trail.assign(lit, Some(id)),
            }
        } else {
            let watched = [lits[0], lits[1]];
            let id = db.add_original(lits);
            watchlists.watch_clause(id, watched);
        }
    }

    if trivially_unsat {
        return SolveResult::Unsat;
    }
    if var_count == 0 {
        return SolveResult::Sat(Model::new(Vec::new()));
    }

    match propagate(&mut trail, &mut db, &mut watchlists) {
        Err(_) => return SolveResult::Unsat,
        Ok(implied) => stats.propagations += implied as u64,
    }

    if config.use_pure_literal {
        apply_pure_literals(formula, &mut trail);
        match propagate(&mut trail, &mut db, &mut watchlists) {
            Err(_) => return SolveResult::Unsat,
            Ok(implied) => stats.propagations += implied as u64,
        }
    }

    let mut frames: Vec<Frame> = Vec::new();

    loop {
        let propagated = propagate(&mut trail, &mut db, &mut watchlists);
        if let Ok(implied) = propagated {
            stats.propagations += implied as u64;
        }
        if propagated.is_err() {
            stats.conflicts += 1;
            loop {
                match frames.pop() {
                    None => return SolveResult::Unsat,
                    Some(frame) => {
                        let level = frames.len() as u32;
                        trail.backtrack_to(level, |_| {});
                        if !frame.tried_negative {
                            trail.push_decision(frame.var.negative());
                            frames.push(Frame {
                                var: frame.var,
                                tried_negative: true,
                            });
                            break;
                        }
                    }
                }
            }
            continue;
        }

        if trail.is_complete() {
            return SolveResult::Sat(build_model(&trail, var_count));
        }
        if let Some(reason) = budget.check(stats.conflicts) {
            return SolveResult::Unknown(reason);
        }

        let var = first_unassigned(&trail, var_count)
            .expect("trail is incomplete but no unassigned variable was found");
        stats.decisions += 1;
        trail.push_decision(var.positive());
        frames.push(Frame {
            var,
            tried_negative: false,
        });
    }
}

fn first_unassigned(trail: &Trail, var_count: usize) -> Option<Var> {
    (0..var_count)
        .map(Var::from_index)
        .find(|&var| !trail.is_assigned(var))
}

/// Assigns every variable that occurs with only one polarity across the
/// (still live) formula. Done once up front rather than interleaved with
/// every propagation step, unlike the textbook recursive formulation -- a
/// deliberate simplification, since re-scanning the whole formula after each
/// unit propagation would dominate runtime without changing correctness.
fn apply_pure_literals(formula: &CnfFormula, trail: &mut Trail) {
    let mut seen_positive = vec![false; formula.var_count()];
    let mut seen_negative = vec![false; formula.var_count()];

    for clause in formula.iter() {
        let satisfied = clause
            .iter()
            .any(|&lit| trail.value_of(lit) == LitValue::True);
        if satisfied {
            continue;
        }
        for &lit in clause {
            if trail.value_of(lit) != LitValue::Unassigned {
                continue;
            }
            if lit.is_positive() {
                seen_positive[lit.var().index()] = true;
            } else {
                seen_negative[lit.var().index()] = true;
            }
        }
    }

    for index in 0..formula.var_count() {
        let var = Var::from_index(index);
        if trail.is_assigned(var) {
            continue;
        }
        match (seen_positive[index], seen_negative[index]) {
            (true, false) => trail.assign(Lit::positive(var), None),
            (false, true) => trail.assign(Lit::negative(var), None),
            _ => {}
        }
    }
}

fn build_model(trail: &Trail, var_count: usize) -> Model {
    let values = (0..var_count)
        .map(|index| {
            let var = Var::from_index(index);
            trail.value_of(Lit::positive(var)) == LitValue::True
        })
        .collect();
    Model::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(xs: &[isize]) -> Vec<Lit> {
        xs.iter().map(|&x| Lit::from_dimacs(x)).collect()
    }

    fn run(clauses: Vec<Vec<Lit>>, config: SolverConfig) -> SolveResult {
        let formula = CnfFormula::from(clauses);
        let budget = Budget::unlimited();
        let mut stats = SolverStats::default();
        solve(&formula, &config, &budget, &mut stats)
    }

    #[test]
    fn finds_model_for_satisfiable_formula() {
        let clauses = vec![clause(&[1, 2]), clause(&[-1, 2]), clause(&[-1, -2])];
        let result = run(clauses.clone(), SolverConfig::for_strategy(crate::config::Strategy::Dpll));
        assert!(result.is_sat());
        let model = result.model().unwrap();
        for c in &clauses {
            assert!(c.iter().any(|&lit| model.satisfies(lit)));
        }
    }

    #[test]
    fn detects_unsat() {
        let clauses = vec![clause(&[1]), clause(&[2]), clause(&[-1, -2])];
        let result = run(clauses, SolverConfig::for_strategy(crate::config::Strategy::Dpll));
        assert!(result.is_unsat());
    }

    #[test]
    fn pure_literal_elimination_assigns_pure_variable() {
        // Variable 2 only ever occurs positively.
        let clauses = vec![clause(&[1, 2]), clause(&[-1, 2])];
        let config = SolverConfig::for_strategy(crate::config::Strategy::Dpll);
        assert!(config.use_pure_literal);
        let result = run(clauses, config);
        assert!(result.is_sat());
        let model = result.model().unwrap();
        assert!(model.satisfies(Lit::from_dimacs(2)));
    }
}
