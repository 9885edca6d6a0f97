//! The resolution strategy: a saturating refutation procedure.
//!
//! Repeatedly resolves every pair of clauses and adds any new, non-tautological
//! resolvent to the clause set. If the empty clause is ever derived the
//! formula is unsatisfiable; if a full round produces nothing new, the clause
//! set is saturated and the formula is satisfiable. This is the classical
//! resolution decision procedure and, unlike DPLL/DP/CDCL, it never assigns a
//! variable -- it only ever proves or refutes. Finding a witness model is not
//! part of the classical procedure, so on a SAT verdict a plain DPLL search is
//! run once against the original formula to produce one.

use rustc_hash::FxHashSet;

use crate::budget::Budget;
use crate::cnf::CnfFormula;
use crate::config::{SolverConfig, Strategy};
use crate::dpll;
use crate::lit::Lit;
use crate::solver::{SolveResult, SolverStats};

pub fn solve(formula: &CnfFormula, budget: &Budget) -> SolveResult {
    let mut stats = SolverStats::default();

    let mut clauses: FxHashSet<Vec<Lit>> = FxHashSet::default();
    for clause in formula.iter() {
        let mut clause = clause.to_vec();
        clause.sort();
        clause.dedup();
        if is_tautology(&clause) {
            continue;
        }
        if clause.is_empty() {
            return SolveResult::Unsat;
        }
        clauses.insert(clause);
    }

    loop {
        if let Some(reason) = budget.check(stats.conflicts) {
            return SolveResult::Unknown(reason);
        }

        let snapshot: Vec<Vec<Lit>> = clauses.iter().cloned().collect();
        let mut new_resolvents: FxHashSet<Vec<Lit>> = FxHashSet::default();

        for i in 0..snapshot.len() {
            for j in (i + 1)..snapshot.len() {
                stats.conflicts += 1;
                for resolvent in resolve(&snapshot[i], &snapshot[j]) {
                    if resolvent.is_empty() {
                        return SolveResult::Unsat;
                    }
                    if !clauses.contains(&resolvent) {
                        new_resolvents.insert(resolvent);
                    }
                }
            }
        }

        if new_resolvents.is_empty() {
            let dpll_config = SolverConfig::for_strategy(Strategy::Dpll);
            let mut dpll_stats = SolverStats::default();
            return dpll::solve(formula, &dpll_config, budget, &mut dpll_stats);
        }

        clauses.extend(new_resolvents);
    }
}

fn is_tautology(clause: &[Lit]) -> bool {
    clause.iter().any(|&lit| clause.contains(&!lit))
}

/// All non-tautological resolvents of `a` and `b` over every variable they
/// share with opposite polarity. A pair of clauses can share more than one
/// complementary variable, each yielding a distinct resolvent.
fn resolve(a: &[Lit], b: &[Lit]) -> Vec<Vec<Lit>> {
    let mut resolvents = Vec::new();
    for &lit in a {
        if b.contains(&!lit) {
            let mut resolvent: Vec<Lit> = a.iter().copied().filter(|&l| l != lit).collect();
            for &other in b {
                if other != !lit && !resolvent.contains(&other) {
                    resolvent.push(other);
                }
            }
            if is_tautology(&resolvent) {
                continue;
            }
            resolvent.sort();
            resolvents.push(resolvent);
        }
    }
    resolvents
}
