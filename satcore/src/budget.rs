//! Budgets and cancellation for a solve call.
//!
//! A solve can be told to give up instead of running to completion: after a
//! number of conflicts, after a wall-clock duration, or because the caller
//! flipped a shared flag from another thread. None of these are faults --
//! they produce `SolveResult::Unknown`, never an error (spec §5/§7).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::SolverConfig;

/// Why a solve stopped without reaching a verdict.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnknownReason {
    ConflictBudgetExceeded,
    TimeBudgetExceeded,
    Cancelled,
}

/// Tracks the budgets for a single solve call.
pub struct Budget {
    conflict_budget: Option<u64>,
    deadline: Option<Instant>,
    cancelled: Option<Arc<AtomicBool>>,
}

impl Budget {
    pub fn new(config: &SolverConfig, started_at: Instant, cancelled: Option<Arc<AtomicBool>>) -> Budget {
        Budget {
            conflict_budget: config.conflict_budget,
            deadline: config
                .time_budget_seconds
                .map(|secs| started_at + std::time::Duration::from_secs_f64(secs)),
            cancelled,
        }
    }

    pub fn unlimited() -> Budget {
        Budget {
            conflict_budget: None,
            deadline: None,
            cancelled: None,
        }
    }

    /// Checks all budgets given the current conflict count. Cheap enough to
    /// call once per conflict.
    pub fn check(&self, conflicts: u64) -> Option<UnknownReason> {
        if let Some(cancelled) = &self.cancelled {
            if cancelled.load(Ordering::Relaxed) {
                return Some(UnknownReason::Cancelled);
            }
        }
        if let Some(limit) = self.conflict_budget {
            if conflicts >= limit {
                return Some(UnknownReason::ConflictBudgetExceeded);
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Some(UnknownReason::TimeBudgetExceeded);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_budget_triggers() {
        let config = SolverConfig {
            conflict_budget: Some(5),
            ..SolverConfig::default()
        };
        let budget = Budget::new(&config, Instant::now(), None);
        assert_eq!(budget.check(4), None);
        assert_eq!(budget.check(5), Some(UnknownReason::ConflictBudgetExceeded));
    }

    #[test]
    fn cancellation_flag_triggers() {
        let config = SolverConfig::default();
        let flag = Arc::new(AtomicBool::new(false));
        let budget = Budget::new(&config, Instant::now(), Some(flag.clone()));
        assert_eq!(budget.check(0), None);
        flag.store(true, Ordering::Relaxed);
        assert_eq!(budget.check(0), Some(UnknownReason::Cancelled));
    }

    #[test]
    fn unlimited_never_triggers() {
        let budget = Budget::unlimited();
        assert_eq!(budget.check(u64::MAX), None);
    }
}
