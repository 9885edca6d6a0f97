//! Learned-clause database reduction.
//!
//! Periodically sorts learned clauses by LBD ascending, then activity
//! descending, and deletes the lower half -- except clauses currently locked as
//! a trail reason, and binary clauses, which are never deleted (spec §4.5).

use super::ClauseDb;

/// Deletes the least useful half of the current learned clauses.
///
/// Returns the number of clauses actually deleted (may be less than half of the
/// learned count, since locked and binary clauses are skipped rather than
/// counted against the target).
pub fn reduce(db: &mut ClauseDb) -> usize {
    let mut candidates: Vec<_> = db
        .learned_ids()
        .filter(|&id| db.get(id).len() > 2 && !db.is_locked(id))
        .collect();

    candidates.sort_by(|&a, &b| {
        let ca = db.get(a);
        let cb = db.get(b);
        ca.lbd()
            .cmp(&cb.lbd())
            .then(cb.activity().partial_cmp(&ca.activity()).unwrap())
    });

    let target = candidates.len() / 2;
    let mut deleted = 0;
    for &id in candidates.iter().rev().take(target) {
        db.delete(id);
        deleted += 1;
    }
    deleted
}
