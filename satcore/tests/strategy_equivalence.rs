//! All four strategies must agree on every formula's satisfiability.

use proptest::prelude::*;

use satcore::config::{SolverConfig, Strategy};
use satcore::lit::Lit;
use satcore::solver::Solver;
use satcore::CnfFormula;

const STRATEGIES: [Strategy; 4] = [
    Strategy::Cdcl,
    Strategy::Dpll,
    Strategy::Dp,
    Strategy::Resolution,
];

fn arb_formula(max_vars: usize, max_clauses: usize) -> impl Strategy<Value = CnfFormula> {
    prop::collection::vec(
        prop::collection::vec(1..=max_vars as isize, 1..=4)
            .prop_map(|vars| vars.into_iter().map(|v| if v % 2 == 0 { -v } else { v }).collect::<Vec<_>>()),
        0..max_clauses,
    )
    .prop_map(|clauses: Vec<Vec<isize>>| {
        let clauses: Vec<Vec<Lit>> = clauses
            .into_iter()
            .map(|c| c.into_iter().map(Lit::from_dimacs).collect())
            .collect();
        CnfFormula::from(clauses)
    })
}

proptest! {
    #[test]
    fn every_strategy_agrees_on_small_formulas(formula in arb_formula(5, 8)) {
        let mut verdicts = Vec::new();
        for &strategy in &STRATEGIES {
            let config = SolverConfig::for_strategy(strategy);
            let solver = Solver::new(config);
            let (result, _) = solver.solve(&formula);
            // A budget-bound strategy may legitimately answer Unknown; only
            // compare definite verdicts.
            if result.is_sat() || result.is_unsat() {
                verdicts.push((strategy, result.is_sat()));
            }
        }
        if let Some((_, first)) = verdicts.first() {
            for (strategy, sat) in &verdicts {
                prop_assert_eq!(*sat, *first, "{:?} disagreed with the rest", strategy);
            }
        }
    }

    #[test]
    fn a_returned_model_always_satisfies_every_clause(formula in arb_formula(5, 8)) {
        for &strategy in &STRATEGIES {
            let config = SolverConfig::for_strategy(strategy);
            let solver = Solver::new(config);
            let (result, _) = solver.solve(&formula);
            if let Some(model) = result.model() {
                for clause in formula.iter() {
                    prop_assert!(clause.iter().any(|&lit| model.satisfies(lit)));
                }
            }
        }
    }
}
