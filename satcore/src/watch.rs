//! Watchlists: per-literal lists of clauses that might become unit when that
//! literal is falsified.
//!
//! Every clause keeps its two watched literals in positions 0 and 1. A clause
//! is registered under the negation of each watched literal, so falsifying a
//! literal is exactly the event that requires re-checking a clause (spec §9
//! Design Notes, "append-and-prune"). Each watch entry carries a blocking
//! literal -- some other literal of the clause -- so that the common case
//! (clause already satisfied through a literal other than the watched pair)
//! can be detected without touching the clause database at all.
//!
//! Backtracking never needs to touch the watchlists: unassigning a variable
//! cannot break the watch invariant, only assigning one can.

use crate::clause::ClauseId;
use crate::lit::Lit;

/// A watch on a clause, stored in the watchlist of the negation of one of its
/// two watched literals.
#[derive(Copy, Clone, Debug)]
pub struct Watch {
    pub clause: ClauseId,
    /// A literal of the clause other than the one this watch is filed under.
    pub blocking: Lit,
}

/// Per-literal watchlists.
#[derive(Default)]
pub struct Watchlists {
    by_lit: Vec<Vec<Watch>>,
}

impl Watchlists {
    pub fn new() -> Watchlists {
        Watchlists::default()
    }

    pub fn set_var_count(&mut self, count: usize) {
        self.by_lit.resize(count * 2, Vec::new());
    }

    /// Begins watching `clause` under the negations of `lits`, the clause's
    /// current watched pair.
    pub fn watch_clause(&mut self, clause: ClauseId, lits: [Lit; 2]) {
        for i in 0..2 {
            self.by_lit[(!lits[i]).code()].push(Watch {
                clause,
                blocking: lits[i ^ 1],
            });
        }
    }

    /// The watch list for literal `lit`: clauses to re-check when `lit` is
    /// falsified.
    pub fn watches(&self, lit: Lit) -> &[Watch] {
        &self.by_lit[lit.code()]
    }

    /// Replace the watch list for `lit` with `watches`, as built up by the
    /// propagation loop while scanning the previous contents.
    pub fn set_watches(&mut self, lit: Lit, watches: Vec<Watch>) {
        self.by_lit[lit.code()] = watches;
    }

    /// Takes the current watch list for `lit`, leaving an empty one behind.
    /// The propagation loop scans the taken list and re-files each watch (in
    /// its original or a new position) via [`add_watch`](Self::add_watch).
    pub fn take(&mut self, lit: Lit) -> Vec<Watch> {
        std::mem::take(&mut self.by_lit[lit.code()])
    }

    pub fn add_watch(&mut self, lit: Lit, watch: Watch) {
        self.by_lit[lit.code()].push(watch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_clause_files_under_negated_literals() {
        let mut watches = Watchlists::new();
        watches.set_var_count(2);
        let a = Lit::from_dimacs(1);
        let b = Lit::from_dimacs(-2);
        watches.watch_clause(ClauseId::new(0), [a, b]);

        assert_eq!(watches.watches(!a).len(), 1);
        assert_eq!(watches.watches(!b).len(), 1);
        assert_eq!(watches.watches(a).len(), 0);
    }

    #[test]
    fn take_empties_then_can_be_refilled() {
        let mut watches = Watchlists::new();
        watches.set_var_count(1);
        let lit = Lit::from_dimacs(-1);
        watches.add_watch(lit, Watch {
            clause: ClauseId::new(0),
            blocking: Lit::from_dimacs(2),
        });

        let taken = watches.take(lit);
        assert_eq!(taken.len(), 1);
        assert_eq!(watches.watches(lit).len(), 0);

        watches.set_watches(lit, taken);
        assert_eq!(watches.watches(lit).len(), 1);
    }
}
