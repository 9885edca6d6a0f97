//! The Davis-Putnam strategy: unit propagation, pure-literal elimination, and
//! resolution-based variable elimination -- no trail, no branching.
//!
//! Unlike DPLL or CDCL this never guesses a variable's value and backtracks;
//! instead it eliminates a variable entirely by resolving every clause that
//! contains it positively against every clause that contains it negatively.
//! The formula shrinks to zero variables (SAT) or produces an empty clause
//! (UNSAT). Because eliminating a variable discards the clauses that
//! mentioned it, a witness model has to be reconstructed afterwards by
//! replaying the eliminations in reverse and picking, for each one, whichever
//! polarity satisfies the clauses that were set aside for it.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;

use crate::budget::Budget;
use crate::cnf::CnfFormula;
use crate::lit::{Lit, Var};
use crate::model::Model;
use crate::solver::{SolveResult, SolverStats};

/// The clauses set aside when a variable was eliminated, needed to pick its
/// value once every other variable has been decided.
struct Elimination {
    var: usize,
    positive: Vec<Vec<Lit>>,
    negative: Vec<Vec<Lit>>,
}

pub fn solve(formula: &CnfFormula, budget: &Budget, stats: &mut SolverStats) -> SolveResult {
    let var_count = formula.var_count();
    let mut clauses: Vec<Vec<Lit>> = formula.iter().map(|c| c.to_vec()).collect();
    let mut assignment: Vec<Option<bool>> = vec![None; var_count];

    if clauses.iter().any(|c| c.is_empty()) {
        return SolveResult::Unsat;
    }

    let mut eliminations: Vec<Elimination> = Vec::new();

    loop {
        if unit_propagate(&mut clauses, &mut assignment, stats).is_err() {
            return SolveResult::Unsat;
        }
        if eliminate_pure_literals(&mut clauses, &mut assignment, stats) {
            continue;
        }
        if clauses.iter().any(|c| c.is_empty()) {
            return SolveResult::Unsat;
        }

        let remaining = live_vars(&clauses);
        if remaining.is_empty() {
            break;
        }
        if let Some(reason) = budget.check(stats.conflicts) {
            return SolveResult::Unknown(reason);
        }

        let var_index = *remaining.iter().next().unwrap();
        match eliminate_variable(var_index, &mut clauses) {
            None => return SolveResult::Unsat,
            Some((positive, negative)) => {
                stats.decisions += 1;
                eliminations.push(Elimination {
                    var: var_index,
                    positive,
                    negative,
                });
            }
        }
    }

    // Any variable that never occurred in a unit, a pure literal or an
    // elimination record is genuinely unconstrained; fix those before
    // back-substituting, since eliminated variables may depend on them.
    for value in assignment.iter_mut() {
        if value.is_none() {
            *value = Some(true);
        }
    }

    for elim in eliminations.into_iter().rev() {
        let var = Var::from_index(elim.var);
        let negatives_satisfied = elim
            .negative
            .iter()
            .all(|clause| satisfied_by_others(clause, var, &assignment));
        assignment[elim.var] = Some(negatives_satisfied);
    }

    let values = assignment.into_iter().map(|v| v.unwrap()).collect();
    SolveResult::Sat(Model::new(values))
}

fn live_vars(clauses: &[Vec<Lit>]) -> BTreeSet<usize> {
    clauses
        .iter()
        .flatten()
        .map(|lit| lit.var().index())
        .collect()
}

fn unit_propagate(
    clauses: &mut Vec<Vec<Lit>>,
    assignment: &mut [Option<bool>],
    stats: &mut SolverStats,
) -> Result<(), ()> {
    loop {
        if clauses.iter().any(|c| c.is_empty()) {
            return Err(());
        }
        let unit = clauses.iter().find(|c| c.len() == 1).map(|c| c[0]);
        let lit = match unit {
            Some(lit) => lit,
            None => return Ok(()),
        };
        assignment[lit.var().index()] = Some(lit.is_positive());
        stats.propagations += 1;
        apply_literal(clauses, lit);
    }
}

/// Drops clauses `lit` satisfies, and removes `!lit` from the rest.
fn apply_literal(clauses: &mut Vec<Vec<Lit>>, lit: Lit) {
    clauses.retain(|c| !c.contains(&lit));
    let negated = !lit;
    for clause in clauses.iter_mut() {
        clause.retain(|&l| l != negated);
    }
}

/// Assigns every variable that occurs with a single polarity among the live
/// clauses. Returns whether any assignment was made.
fn eliminate_pure_literals(
    clauses: &mut Vec<Vec<Lit>>,
    assignment: &mut [Option<bool>],
    stats: &mut SolverStats,
) -> bool {
    let mut changed = false;
    for index in live_vars(clauses) {
        if assignment[index].is_some() {
            continue;
        }
        let mut seen_positive = false;
        let mut seen_negative = false;
        for clause in clauses.iter() {
            for &lit in clause {
                if lit.var().index() == index {
                    if lit.is_positive() {
                        seen_positive = true;
                    } else {
                        seen_negative = true;
                    }
                }
            }
        }
        if seen_positive && seen_negative {
            continue;
        }
        assignment[index] = Some(seen_positive);
        let lit = Lit::from_index(index, seen_positive);
        clauses.retain(|c| !c.contains(&lit));
        stats.propagations += 1;
        changed = true;
    }
    changed
}

/// Resolves every clause containing `var` positively against every clause
/// containing it negatively, keeping only non-tautological resolvents.
/// Returns `None` on an empty resolvent (the formula is unsatisfiable), or
/// the clauses set aside for later back-substitution.
fn eliminate_variable(
    var_index: usize,
    clauses: &mut Vec<Vec<Lit>>,
) -> Option<(Vec<Vec<Lit>>, Vec<Vec<Lit>>)> {
    let var = Var::from_index(var_index);
    let pos_lit = Lit::positive(var);
    let neg_lit = Lit::negative(var);

    let mut positive = Vec::new();
    let mut negative = Vec::new();
    let mut rest = Vec::new();
    for clause in clauses.drain(..) {
        if clause.contains(&pos_lit) {
            positive.push(clause);
        } else if clause.contains(&neg_lit) {
            negative.push(clause);
        } else {
            rest.push(clause);
        }
    }

    let mut seen = FxHashSet::default();
    let mut resolvents = Vec::new();
    for p in &positive {
        for n in &negative {
            let mut resolvent: Vec<Lit> =
                p.iter().copied().filter(|&l| l != pos_lit).collect();
            for &lit in n {
                if lit != neg_lit && !resolvent.contains(&lit) {
                    resolvent.push(lit);
                }
            }
            if resolvent.iter().any(|&l| resolvent.contains(&!l)) {
                continue;
            }
            if resolvent.is_empty() {
                return None;
            }
            resolvent.sort();
            if seen.insert(resolvent.clone()) {
                resolvents.push(resolvent);
            }
        }
    }

    *clauses = rest;
    clauses.extend(resolvents);
    Some((positive, negative))
}

fn satisfied_by_others(clause: &[Lit], var: Var, assignment: &[Option<bool>]) -> bool {
    clause
        .iter()
        .any(|&lit| lit.var() != var && assignment[lit.var().index()] == Some(lit.is_positive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(xs: &[isize]) -> Vec<Lit> {
        xs.iter().map(|&x| Lit::from_dimacs(x)).collect()
    }

    fn run(clauses: Vec<Vec<Lit>>) -> SolveResult {
        let formula = CnfFormula::from(clauses);
        let budget = Budget::unlimited();
        let mut stats = SolverStats::default();
        solve(&formula, &budget, &mut stats)
    }

    #[test]
    fn detects_unsat_by_propagation() {
        let result = run(vec![clause(&[1]), clause(&[-1])]);
        assert!(result.is_unsat());
    }

    #[test]
    fn finds_model_requiring_variable_elimination() {
        // No units, no pure literals: eliminating x1 then x2 is required.
        let clauses = vec![clause(&[1, 2]), clause(&[-1, 3]), clause(&[-2, -3])];
        let result = run(clauses.clone());
        assert!(result.is_sat());
        let model = result.model().unwrap();
        for c in &clauses {
            assert!(c.iter().any(|&lit| model.satisfies(lit)), "clause {:?} unsatisfied", c);
        }
    }

    #[test]
    fn detects_unsat_requiring_variable_elimination() {
        // Eliminating x1 yields clauses whose resolvent with x2 is empty.
        let clauses = vec![
            clause(&[1, 2]),
            clause(&[-1, 2]),
            clause(&[1, -2]),
            clause(&[-1, -2]),
        ];
        let result = run(clauses);
        assert!(result.is_unsat());
    }
}
