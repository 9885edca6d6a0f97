//! Boolean constraint propagation (unit propagation to fixpoint) over the
//! watch index.
//!
//! For each newly falsified literal, every clause watching it is rechecked:
//! if its blocking literal is already true the clause is skipped outright; if
//! another non-false literal can be found the watch moves there; otherwise
//! the clause is unit (propagate its other watched literal) or conflicting
//! (the other watched literal is also false). This mirrors the watch
//! invariant from [`crate::watch`] and never needs to inspect satisfied
//! clauses whose satisfying literal happens to be the blocking one.

use crate::clause::{ClauseDb, ClauseId};
use crate::lit::{Lit, LitValue};
use crate::trail::Trail;
use crate::watch::{Watch, Watchlists};

/// Runs unit propagation to a fixpoint, starting from whatever the trail has
/// not yet had propagated.
///
/// On success, returns the number of literals newly implied by this call
/// (i.e. assigned as the consequence of a now-unit clause, not counting the
/// literals that were already pending on entry). Every clause is then
/// satisfied or still has at least two non-false literals. On conflict,
/// returns the clause that became empty under the current assignment; the
/// trail is left exactly as it stood at the moment the conflict was
/// discovered, ready for conflict analysis.
pub fn propagate(
    trail: &mut Trail,
    db: &mut ClauseDb,
    watchlists: &mut Watchlists,
) -> Result<usize, ClauseId> {
    let mut qhead = trail.propagated();
    let mut implied = 0;

    while qhead < trail.literals().len() {
        let lit = trail.literals()[qhead];
        qhead += 1;

        match propagate_literal(trail, db, watchlists, lit) {
            Ok(count) => implied += count,
            Err(conflict) => {
                trail.set_propagated(qhead);
                return Err(conflict);
            }
        }
    }

    trail.set_propagated(qhead);
    Ok(implied)
}

fn propagate_literal(
    trail: &mut Trail,
    db: &mut ClauseDb,
    watchlists: &mut Watchlists,
    lit: Lit,
) -> Result<usize, ClauseId> {
    // `lit` was just assigned true, so its negation is the watched literal
    // that may have invalidated the watch invariant. Clauses watching it are
    // filed under `lit` itself (see `Watchlists::watch_clause`).
    let false_lit = !lit;
    let watching = lit;
    let watches = watchlists.take(watching);
    let mut keep = Vec::with_capacity(watches.len());
    let mut conflict = None;
    let mut implied = 0;

    let mut iter = watches.into_iter();
    for watch in iter.by_ref() {
        if trail.value_of(watch.blocking) == LitValue::True {
            keep.push(watch);
            continue;
        }

        let clause = db.get_mut(watch.clause);
        if clause.watch(0) == false_lit {
            clause.swap(0, 1);
        }
        let other = clause.watch(0);

        if other != watch.blocking && trail.value_of(other) == LitValue::True {
            keep.push(Watch {
                clause: watch.clause,
                blocking: other,
            });
            continue;
        }

        let len = clause.len();
        let mut replaced = false;
        for slot in 2..len {
            let candidate = clause.watch(slot);
            if trail.value_of(candidate) != LitValue::False {
                clause.swap(1, slot);
                watchlists.add_watch(
                    !candidate,
                    Watch {
                        clause: watch.clause,
                        blocking: other,
                    },
                );
                replaced = true;
                break;
            }
        }
        if replaced {
            continue;
        }

        keep.push(Watch {
            clause: watch.clause,
            blocking: other,
        });

        if trail.value_of(other) == LitValue::False {
            conflict = Some(watch.clause);
            break;
        }

        debug_assert!(
            clause.lits().iter().all(|&l| l == other || trail.value_of(l) == LitValue::False),
            "every literal of a propagating clause other than the asserted one must be false"
        );
        trail.assign(other, Some(watch.clause));
        implied += 1;
    }

    // Any watches not yet visited (because we broke out on conflict) still
    // belong in this literal's watch list.
    keep.extend(iter);
    watchlists.set_watches(watching, keep);

    match conflict {
        Some(id) => Err(id),
        None => Ok(implied),
    }
}
