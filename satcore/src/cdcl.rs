//! The CDCL (Conflict-Driven Clause Learning) search driver.
//!
//! Ties together the watch-based propagator, first-UIP conflict analysis,
//! VSIDS branching, and the restart/reduction schedule into the standard
//! "propagate, and on conflict analyze and backjump, otherwise decide" loop.

use crate::analyze::analyze;
use crate::budget::Budget;
use crate::clause::activity::ClauseActivity;
use crate::clause::{ClauseDb, ClauseId};
use crate::cnf::CnfFormula;
use crate::config::SolverConfig;
use crate::decision::Vsids;
use crate::lit::{Lit, LitValue, Var};
use crate::model::Model;
use crate::propagate::propagate;
use crate::schedule::Schedule;
use crate::solver::{SolveResult, SolverStats};
use crate::trail::Trail;
use crate::watch::Watchlists;

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

    let mut vsids = Vsids::new(config.var_decay);
    vsids.set_var_count(var_count);
    let mut clause_activity = ClauseActivity::default();
    clause_activity.set_decay(config.clause_decay);
    let mut schedule = Schedule::new(config);

    loop {
        match propagate(&mut trail, &mut db, &mut watchlists) {
            Err(conflict) => {
                stats.conflicts += 1;
                schedule.record_conflict();

                if trail.decision_level() == 0 {
                    return SolveResult::Unsat;
                }
                if let Some(reason) = budget.check(stats.conflicts) {
                    return SolveResult::Unknown(reason);
                }

                handle_conflict(
                    conflict,
                    &mut trail,
                    &mut db,
                    &mut watchlists,
                    &mut vsids,
                    &mut clause_activity,
                    &mut schedule,
                    var_count,
                    stats,
                );
            }
            Ok(implied) => {
                stats.propagations += implied as u64;

                if trail.is_complete() {
                    return SolveResult::Sat(build_model(&trail, var_count));
                }
                if let Some(reason) = budget.check(stats.conflicts) {
                    return SolveResult::Unknown(reason);
                }

                let var = match next_decision_var(&mut vsids, &trail) {
                    Some(var) => var,
                    None => return SolveResult::Sat(build_model(&trail, var_count)),
                };
                stats.decisions += 1;
                let polarity = !config.use_phase_saving || trail.saved_phase(var);
                trail.push_decision(var.lit(polarity));
            }
        }
    }
}

fn next_decision_var(vsids: &mut Vsids, trail: &Trail) -> Option<Var> {
    loop {
        let var = vsids.next()?;
        if !trail.is_assigned(var) {
            return Some(var);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_conflict(
    conflict: ClauseId,
    trail: &mut Trail,
    db: &mut ClauseDb,
    watchlists: &mut Watchlists,
    vsids: &mut Vsids,
    clause_activity: &mut ClauseActivity,
    schedule: &mut Schedule,
    var_count: usize,
    stats: &mut SolverStats,
) {
    let analysis = analyze(trail, db, conflict, var_count, |var| vsids.bump(var));
    vsids.decay();
    clause_activity.decay(db);

    let mut unassigned: Vec<Var> = Vec::new();
    trail.backtrack_to(analysis.backtrack_level, |var| unassigned.push(var));
    for var in unassigned {
        vsids.make_available(var);
    }

    stats.learned_clauses += 1;

    if analysis.learned.len() == 1 {
        trail.assign(analysis.learned[0], None);
    } else {
        let watched = [analysis.learned[0], analysis.learned[1]];
        let id = db.add_learned(analysis.learned, analysis.lbd);
        watchlists.watch_clause(id, watched);
        clause_activity.bump(db, id);
        trail.assign(watched[0], Some(id));
    }

    if schedule.restart_due() {
        let mut unassigned: Vec<Var> = Vec::new();
        trail.backtrack_to(0, |var| unassigned.push(var));
        for var in unassigned {
            vsids.make_available(var);
        }
        schedule.advance_restart();
        stats.restarts += 1;
    }

    if schedule.reduce_due(db.learned_count()) {
        let locked = lock_reasons(trail, db);
        let deleted = crate::clause::reduce::reduce(db);
        unlock(db, &locked);
        schedule.advance_reduce();
        stats.deleted_clauses += deleted as u64;
    }
}

fn lock_reasons(trail: &Trail, db: &mut ClauseDb) -> Vec<ClauseId> {
    let mut locked = Vec::new();
    for &lit in trail.literals() {
        if let Some(id) = trail.reason_of(lit.var()) {
            if !db.is_locked(id) {
                db.set_locked(id, true);
                locked.push(id);
            }
        }
    }
    locked
}

fn unlock(db: &mut ClauseDb, ids: &[ClauseId]) {
    for &id in ids {
        db.set_locked(id, false);
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
    use crate::budget::Budget;

    fn clause(xs: &[isize]) -> Vec<Lit> {
        xs.iter().map(|&x| Lit::from_dimacs(x)).collect()
    }

    fn run(clauses: Vec<Vec<Lit>>) -> SolveResult {
        run_with_stats(clauses).0
    }

    fn run_with_stats(clauses: Vec<Vec<Lit>>) -> (SolveResult, SolverStats) {
        let formula = CnfFormula::from(clauses);
        let config = SolverConfig::default();
        let budget = Budget::unlimited();
        let mut stats = SolverStats::default();
        let result = solve(&formula, &config, &budget, &mut stats);
        (result, stats)
    }

    #[test]
    fn empty_formula_is_sat() {
        let result = run(vec![]);
        assert!(result.is_sat());
    }

    #[test]
    fn unit_conflict_is_unsat() {
        let result = run(vec![clause(&[1]), clause(&[-1])]);
        assert!(result.is_unsat());
    }

    #[test]
    fn direct_contradiction_is_refuted_by_propagation_alone() {
        // {1}, {-1}: unit propagation alone derives the conflict at level 0,
        // so no decision should ever be taken.
        let (result, stats) = run_with_stats(vec![clause(&[1]), clause(&[-1])]);
        assert!(result.is_unsat());
        assert_eq!(stats.decisions, 0);
    }

    #[test]
    fn pigeonhole_two_into_one_is_unsat() {
        // Pigeons 1, 2 can't both go into the single hole represented by variable 1.
        let result = run(vec![clause(&[1]), clause(&[2]), clause(&[-1, -2])]);
        assert!(result.is_unsat());
    }

    #[test]
    fn repeated_solves_of_the_same_input_agree() {
        // No randomization anywhere in the driver, so the verdict for a fixed
        // input and configuration must be stable across invocations.
        let clauses = vec![clause(&[1, 2]), clause(&[-1, 2]), clause(&[-1, -2])];
        let first = run(clauses.clone());
        let second = run(clauses);
        assert_eq!(first.is_sat(), second.is_sat());
    }

    #[test]
    fn finds_a_model_satisfying_every_clause() {
        // "Exactly one of 1, 2, 3" forces backtracking regardless of decision order.
        let clauses = vec![
            clause(&[1, 2, 3]),
            clause(&[-1, -2]),
            clause(&[-1, -3]),
            clause(&[-2, -3]),
        ];
        let result = run(clauses.clone());
        assert!(result.is_sat());
        let model = result.model().unwrap();
        for c in &clauses {
            assert!(c.iter().any(|&lit| model.satisfies(lit)), "clause {:?} unsatisfied", c);
        }
    }
}
