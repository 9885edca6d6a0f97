//! A CDCL based SAT solver, with DPLL, Davis-Putnam and resolution strategies
//! kept alongside it for comparison and teaching purposes.
//!
//! The [`solver::Solver`] facade is the main entry point: configure it with a
//! [`config::SolverConfig`], hand it a [`cnf::CnfFormula`], and it dispatches
//! to whichever [`config::Strategy`] the configuration selects.

pub mod analyze;
pub mod budget;
pub mod cdcl;
pub mod clause;
pub mod cnf;
pub mod config;
pub mod decision;
pub mod dimacs;
pub mod dp;
pub mod dpll;
pub mod lit;
pub mod model;
pub mod propagate;
pub mod resolution;
pub mod schedule;
pub mod solver;
pub mod sudoku;
pub mod trail;
pub mod watch;

pub use cnf::CnfFormula;
pub use config::{SolverConfig, SolverConfigUpdate, Strategy};
pub use lit::{Lit, Var};
pub use model::Model;
pub use solver::{SolveResult, Solver, SolverStats};
