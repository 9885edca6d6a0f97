//! First-UIP conflict analysis.
//!
//! Resolves the conflicting clause backwards against the trail, one reason at
//! a time, until exactly one literal of the current decision level remains.
//! That literal's negation becomes the asserting literal of the learned
//! clause. Unlike a from-scratch port, this performs no recursive
//! minimization pass: the unminimized first-UIP clause is already asserting
//! and safe to learn, and the resolution loop below is the part of the
//! algorithm actually load-bearing for correctness.

use crate::clause::{ClauseDb, ClauseId};
use crate::lit::{Lit, Var};
use crate::trail::Trail;

/// The result of analyzing a single conflict.
pub struct Analysis {
    /// The learned clause, with the asserting literal in position 0 and the
    /// literal of the second-highest level (the new backtrack target) in
    /// position 1, if the clause has more than one literal.
    pub learned: Vec<Lit>,
    /// Literal block distance: the number of distinct decision levels among
    /// the learned clause's literals.
    pub lbd: u32,
    /// The decision level to backtrack to so that the learned clause becomes
    /// unit immediately after backtracking.
    pub backtrack_level: u32,
}

/// Folds the literals of `lits` into the in-progress learned clause: marks
/// each not-yet-seen, non-level-0 variable seen, bumps its activity, and
/// either counts it (current decision level, still to be resolved away) or
/// keeps it in the clause (an earlier level, already final).
fn resolve_into(
    trail: &Trail,
    current_level: u32,
    lits: &[Lit],
    skip_first: bool,
    seen: &mut [bool],
    learned: &mut Vec<Lit>,
    counter: &mut u32,
    bump: &mut dyn FnMut(Var),
) {
    let lits = if skip_first { &lits[1..] } else { lits };
    for &lit in lits {
        let var = lit.var();
        if seen[var.index()] {
            continue;
        }
        let level = match trail.level_of(var) {
            Some(level) => level,
            None => continue,
        };
        if level == 0 {
            continue;
        }
        seen[var.index()] = true;
        bump(var);
        if level == current_level {
            *counter += 1;
        } else {
            learned.push(lit);
        }
    }
}

/// Analyzes `conflict`, bumping the activity of every variable resolved over
/// via `bump`.
pub fn analyze(
    trail: &Trail,
    db: &ClauseDb,
    conflict: ClauseId,
    var_count: usize,
    mut bump: impl FnMut(Var),
) -> Analysis {
    let current_level = trail.decision_level();
    let mut seen = vec![false; var_count];
    let mut learned = Vec::new();
    let mut counter = 0u32;

    resolve_into(
        trail,
        current_level,
        db.get(conflict).lits(),
        false,
        &mut seen,
        &mut learned,
        &mut counter,
        &mut bump,
    );

    let mut index = trail.literals().len();
    let mut pivot;
    loop {
        loop {
            index -= 1;
            let lit = trail.literals()[index];
            if seen[lit.var().index()] {
                pivot = lit;
                break;
            }
        }

        seen[pivot.var().index()] = false;
        counter -= 1;
        if counter == 0 {
            break;
        }

        let reason = trail
            .reason_of(pivot.var())
            .expect("a non-pivot trail literal at the current level must have a reason");
        resolve_into(
            trail,
            current_level,
            db.get(reason).lits(),
            true,
            &mut seen,
            &mut learned,
            &mut counter,
            &mut bump,
        );
    }

    learned.insert(0, !pivot);
    place_backtrack_literal(trail, &mut learned);

    let lbd = distinct_levels(trail, &learned);
    let backtrack_level = learned
        .get(1)
        .and_then(|lit| trail.level_of(lit.var()))
        .unwrap_or(0);

    Analysis {
        learned,
        lbd,
        backtrack_level,
    }
}

fn distinct_levels(trail: &Trail, lits: &[Lit]) -> u32 {
    let mut levels: Vec<u32> = lits
        .iter()
        .filter_map(|lit| trail.level_of(lit.var()))
        .collect();
    levels.sort_unstable();
    levels.dedup();
    levels.len() as u32
}

/// Moves the literal with the highest decision level among `lits[1..]` into
/// position 1, so the two watched literals of the newly learned clause are
/// the asserting literal and the one that makes it unit right after
/// backtracking (spec §9's watch invariant, extended to learned clauses).
fn place_backtrack_literal(trail: &Trail, lits: &mut [Lit]) {
    if lits.len() <= 1 {
        return;
    }
    let mut best = 1;
    let mut best_level = trail.level_of(lits[1].var()).unwrap_or(0);
    for i in 2..lits.len() {
        let level = trail.level_of(lits[i].var()).unwrap_or(0);
        if level > best_level {
            best_level = level;
            best = i;
        }
    }
    lits.swap(1, best);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit::Lit;

    fn lits(xs: &[isize]) -> Vec<Lit> {
        xs.iter().map(|&x| Lit::from_dimacs(x)).collect()
    }

    #[test]
    fn analyzes_simple_conflict() {
        let mut db = ClauseDb::new();
        let mut trail = Trail::new(3);

        let c1 = db.add_original(lits(&[-1, 2]));
        let c2 = db.add_original(lits(&[-1, 3]));
        let conflict = db.add_original(lits(&[-2, -3]));

        trail.push_decision(Lit::from_dimacs(1));
        trail.assign(Lit::from_dimacs(2), Some(c1));
        trail.assign(Lit::from_dimacs(3), Some(c2));

        let analysis = analyze(&trail, &db, conflict, 3, |_| {});
        assert_eq!(analysis.learned, vec![Lit::from_dimacs(-1)]);
        assert_eq!(analysis.backtrack_level, 0);
    }

    #[test]
    fn keeps_earlier_level_literals_and_picks_second_highest() {
        let mut db = ClauseDb::new();
        let mut trail = Trail::new(4);

        // Level 1: decide 1.
        trail.push_decision(Lit::from_dimacs(1));
        // Level 2: decide 2, which (with a clause on 1) implies 3, then conflicts.
        trail.push_decision(Lit::from_dimacs(2));
        // The propagated literal (3) is stored first, matching the watch
        // invariant that position 0 holds whichever literal ended up true.
        let c1 = db.add_original(lits(&[3, -1, -2]));
        trail.assign(Lit::from_dimacs(3), Some(c1));
        let conflict = db.add_original(lits(&[-2, -3]));

        let analysis = analyze(&trail, &db, conflict, 4, |_| {});
        // Resolving {-2,-3} with reason {3,-1,-2} over var 3 yields {-1,-2}.
        assert_eq!(analysis.learned.len(), 2);
        assert!(analysis.learned.contains(&Lit::from_dimacs(-1)));
        assert!(analysis.learned.contains(&Lit::from_dimacs(-2)));
        assert_eq!(analysis.backtrack_level, 1);
    }
}
