//! Solver configuration.

/// Which search strategy a [`crate::solver::Solver`] runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Cdcl,
    Dpll,
    Dp,
    Resolution,
}

impl Default for Strategy {
    fn default() -> Strategy {
        Strategy::Cdcl
    }
}

/// Configurable parameters used during solving.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Conflicts before the first restart. (Default: 100)
    pub restart_initial: u64,
    /// Growth factor applied to the restart interval after each restart. (Default: 1.5)
    pub restart_factor: f64,
    /// Multiplicative decay for the VSIDS decision heuristic. (Default: 0.95)
    pub var_decay: f32,
    /// Multiplicative decay for learned clause activities. (Default: 0.999)
    pub clause_decay: f32,
    /// Number of learned clauses before the first reduction pass. (Default: 2000)
    pub learned_cap_initial: usize,
    /// Growth of the learned-clause cap after each reduction pass. (Default: 1.1)
    pub learned_cap_growth: f64,
    /// Whether to branch using the saved polarity from the last assignment. (Default: true)
    pub use_phase_saving: bool,
    /// Whether to perform pure-literal elimination. (Default: false for CDCL, true for DP/DPLL)
    pub use_pure_literal: bool,
    /// Which strategy to run. (Default: CDCL)
    pub strategy: Strategy,
    /// Stop and report UNKNOWN after this many conflicts, if set.
    pub conflict_budget: Option<u64>,
    /// Stop and report UNKNOWN after this many seconds of wall-clock time, if set.
    pub time_budget_seconds: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            restart_initial: 100,
            restart_factor: 1.5,
            var_decay: 0.95,
            clause_decay: 0.999,
            learned_cap_initial: 2000,
            learned_cap_growth: 1.1,
            use_phase_saving: true,
            use_pure_literal: false,
            strategy: Strategy::Cdcl,
            conflict_budget: None,
            time_budget_seconds: None,
        }
    }
}

impl SolverConfig {
    /// A config suitable for the non-CDCL strategies: pure-literal elimination on by default.
    pub fn for_strategy(strategy: Strategy) -> SolverConfig {
        SolverConfig {
            strategy,
            use_pure_literal: strategy != Strategy::Cdcl,
            ..SolverConfig::default()
        }
    }
}

/// A partial override of [`SolverConfig`], as read from a TOML config file or
/// built up from repeated `-C key=value` command line options.
#[derive(Default, Debug, Clone, serde::Deserialize)]
pub struct SolverConfigUpdate {
    pub restart_initial: Option<u64>,
    pub restart_factor: Option<f64>,
    pub var_decay: Option<f32>,
    pub clause_decay: Option<f32>,
    pub learned_cap_initial: Option<usize>,
    pub learned_cap_growth: Option<f64>,
    pub use_phase_saving: Option<bool>,
    pub use_pure_literal: Option<bool>,
    pub strategy: Option<Strategy>,
    pub conflict_budget: Option<u64>,
    pub time_budget_seconds: Option<f64>,
}

impl SolverConfigUpdate {
    /// Merge `other`'s fields over `self`'s, preferring `other` wherever it sets a field.
    pub fn merge(&mut self, other: SolverConfigUpdate) {
        macro_rules! merge_field {
            ($field:ident) => {
                if other.$field.is_some() {
                    self.$field = other.$field;
                }
            };
        }
        merge_field!(restart_initial);
        merge_field!(restart_factor);
        merge_field!(var_decay);
        merge_field!(clause_decay);
        merge_field!(learned_cap_initial);
        merge_field!(learned_cap_growth);
        merge_field!(use_phase_saving);
        merge_field!(use_pure_literal);
        merge_field!(strategy);
        merge_field!(conflict_budget);
        merge_field!(time_budget_seconds);
    }

    /// Apply this update onto a base configuration, producing a new one.
    pub fn apply(&self, base: SolverConfig) -> SolverConfig {
        SolverConfig {
            restart_initial: self.restart_initial.unwrap_or(base.restart_initial),
            restart_factor: self.restart_factor.unwrap_or(base.restart_factor),
            var_decay: self.var_decay.unwrap_or(base.var_decay),
            clause_decay: self.clause_decay.unwrap_or(base.clause_decay),
            learned_cap_initial: self.learned_cap_initial.unwrap_or(base.learned_cap_initial),
            learned_cap_growth: self.learned_cap_growth.unwrap_or(base.learned_cap_growth),
            use_phase_saving: self.use_phase_saving.unwrap_or(base.use_phase_saving),
            use_pure_literal: self.use_pure_literal.unwrap_or(base.use_pure_literal),
            strategy: self.strategy.unwrap_or(base.strategy),
            conflict_budget: self.conflict_budget.or(base.conflict_budget),
            time_budget_seconds: self.time_budget_seconds.or(base.time_budget_seconds),
        }
    }
}
