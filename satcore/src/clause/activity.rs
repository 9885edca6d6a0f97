//! Global clause-activity bookkeeping.
//!
//! The individual clause activities live on the clauses themselves (see
//! [`super::Clause`]); this only tracks the shared bump value and decay rate, the
//! same split the VSIDS variable heuristic uses (see [`crate::decision::vsids`]).

use super::ClauseDb;

pub struct ClauseActivity {
    bump: f32,
    inv_decay: f32,
}

impl Default for ClauseActivity {
    fn default() -> ClauseActivity {
        ClauseActivity {
            bump: 1.0,
            inv_decay: 1.0 / 0.999,
        }
    }
}

impl ClauseActivity {
    pub fn set_decay(&mut self, decay: f32) {
        assert!(decay < 1.0 && decay > 1.0 / 16.0);
        self.inv_decay = 1.0 / decay;
    }

    fn rescale_limit() -> f32 {
        f32::MAX / 16.0
    }

    /// Bump a clause's activity, rescaling the whole database if needed to avoid overflow.
    pub fn bump(&mut self, db: &mut ClauseDb, id: super::ClauseId) {
        db.bump(id, self.bump);
        if db.get(id).activity() > Self::rescale_limit() {
            self.rescale(db);
        }
    }

    /// Decay the shared bump value, used once per conflict.
    pub fn decay(&mut self, db: &mut ClauseDb) {
        self.bump *= self.inv_decay;
        if self.bump >= Self::rescale_limit() {
            self.rescale(db);
        }
    }

    fn rescale(&mut self, db: &mut ClauseDb) {
        let factor = 1.0 / Self::rescale_limit();
        db.rescale_all(factor);
        self.bump *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit::Lit;

    #[test]
    fn bump_increases_activity() {
        let mut db = ClauseDb::new();
        let id = db.add_learned(vec![Lit::from_dimacs(1), Lit::from_dimacs(2), Lit::from_dimacs(3)], 2);
        let mut activity = ClauseActivity::default();
        activity.bump(&mut db, id);
        activity.bump(&mut db, id);
        assert!(db.get(id).activity() > 0.0);
    }
}
