//! Branching (decision) heuristics.

pub mod vsids;

pub use vsids::Vsids;
