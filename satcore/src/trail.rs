//! The trail: the chronological record of assigned literals, alongside the
//! per-variable assignment, reason and decision-level tables it indexes.
//!
//! Backtracking never touches the clause database or the watch index; it only
//! pops literals off the trail and clears their variables' assignment state,
//! which is what makes non-chronological backjumping cheap.

use crate::clause::ClauseId;
use crate::lit::{Lit, LitValue, Var};

#[derive(Copy, Clone, Debug, PartialEq)]
struct Assignment {
    value: bool,
    level: u32,
    reason: Option<ClauseId>,
}

/// The assignment trail plus the tables it keeps in sync.
pub struct Trail {
    assigned: Vec<Option<Assignment>>,
    trail: Vec<Lit>,
    /// `level_starts[i]` is the index into `trail` where decision level `i + 1` begins.
    level_starts: Vec<usize>,
    /// The last-assigned polarity for each variable, used for phase saving.
    /// Defaults to `true` (try positive first on first encounter): this
    /// departs from the textbook "default FALSE" convention but matches
    /// `original_source/sat_algorithms/cdcl.py`'s branching order, which this
    /// crate follows as its ground truth.
    saved_phase: Vec<bool>,
    /// Index into `trail` of the next literal that unit propagation has not
    /// yet processed.
    propagated: usize,
}

impl Trail {
    pub fn new(var_count: usize) -> Trail {
        Trail {
            assigned: vec![None; var_count],
            trail: Vec::new(),
            level_starts: Vec::new(),
            saved_phase: vec![true; var_count],
            propagated: 0,
        }
    }

    pub fn grow_to(&mut self, var_count: usize) {
        if var_count > self.assigned.len() {
            self.assigned.resize(var_count, None);
            self.saved_phase.resize(var_count, true);
        }
    }

    /// The current decision level. Level 0 holds unit propagations made before
    /// any decision.
    pub fn decision_level(&self) -> u32 {
        self.level_starts.len() as u32
    }

    /// All literals assigned so far, in assignment order.
    pub fn literals(&self) -> &[Lit] {
        &self.trail
    }

    /// Literals assigned at or after `level`, in assignment order.
    pub fn literals_from(&self, level: u32) -> &[Lit] {
        if level == 0 {
            &self.trail
        } else {
            let start = self.level_starts[(level - 1) as usize];
            &self.trail[start..]
        }
    }

    pub fn value_of(&self, lit: Lit) -> LitValue {
        match self.assigned[lit.var().index()] {
            None => LitValue::Unassigned,
            Some(a) if a.value == lit.is_positive() => LitValue::True,
            Some(_) => LitValue::False,
        }
    }

    pub fn is_assigned(&self, var: Var) -> bool {
        self.assigned[var.index()].is_some()
    }

    pub fn level_of(&self, var: Var) -> Option<u32> {
        self.assigned[var.index()].map(|a| a.level)
    }

    pub fn reason_of(&self, var: Var) -> Option<ClauseId> {
        self.assigned[var.index()].and_then(|a| a.reason)
    }

    pub fn saved_phase(&self, var: Var) -> bool {
        self.saved_phase[var.index()]
    }

    /// Begins a new decision level and assigns `lit` as the decision literal.
    pub fn push_decision(&mut self, lit: Lit) {
        self.level_starts.push(self.trail.len());
        self.assign(lit, None);
    }

    /// Assigns `lit` true at the current decision level, with an optional
    /// propagating reason clause (`None` for a decision).
    pub fn assign(&mut self, lit: Lit, reason: Option<ClauseId>) {
        let level = self.decision_level();
        self.assigned[lit.var().index()] = Some(Assignment {
            value: lit.is_positive(),
            level,
            reason,
        });
        self.saved_phase[lit.var().index()] = lit.is_positive();
        self.trail.push(lit);
    }

    /// Undoes every assignment made at or after `level`, leaving the trail at
    /// the end of `level - 1`. A no-op if already at or below `level`. Calls
    /// `on_unassign` for each variable that becomes unassigned, in the order
    /// they're undone, so callers can re-offer them to the decision heuristic.
    pub fn backtrack_to(&mut self, level: u32, mut on_unassign: impl FnMut(Var)) {
        if level >= self.decision_level() {
            return;
        }
        let cut = self.level_starts[level as usize];
        for &lit in self.trail[cut..].iter().rev() {
            self.assigned[lit.var().index()] = None;
            on_unassign(lit.var());
        }
        self.trail.truncate(cut);
        self.level_starts.truncate(level as usize);
        self.propagated = self.propagated.min(cut);
    }

    pub fn is_complete(&self) -> bool {
        self.trail.len() == self.assigned.len()
    }

    /// Index of the next trail literal unit propagation has not yet processed.
    pub fn propagated(&self) -> usize {
        self.propagated
    }

    /// Records that unit propagation has processed the trail up to `index`.
    pub fn set_propagated(&mut self, index: usize) {
        self.propagated = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_and_backtrack_restores_unassigned() {
        let mut trail = Trail::new(3);
        trail.push_decision(Lit::from_dimacs(1));
        trail.assign(Lit::from_dimacs(2), None);
        trail.push_decision(Lit::from_dimacs(-3));

        assert_eq!(trail.decision_level(), 2);
        assert_eq!(trail.value_of(Lit::from_dimacs(2)), LitValue::True);

        trail.backtrack_to(1, |_| {});
        assert_eq!(trail.decision_level(), 1);
        assert_eq!(trail.value_of(Lit::from_dimacs(-3)), LitValue::Unassigned);
        assert_eq!(trail.value_of(Lit::from_dimacs(2)), LitValue::True);
    }

    #[test]
    fn phase_is_saved_across_backtrack() {
        let mut trail = Trail::new(1);
        trail.push_decision(Lit::from_dimacs(-1));
        trail.backtrack_to(0, |_| {});
        assert!(!trail.saved_phase(Var::from_dimacs(1)));
    }

    #[test]
    fn reason_is_tracked() {
        let mut trail = Trail::new(2);
        let reason = ClauseId::new(7);
        trail.assign(Lit::from_dimacs(1), Some(reason));
        assert_eq!(trail.reason_of(Var::from_dimacs(1)), Some(reason));
    }
}
