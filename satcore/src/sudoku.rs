//! Sudoku as a CNF encoding problem.
//!
//! One boolean variable per (row, column, digit) triple: `var(row, col, num)
//! = row*n*n + col*n + num + 1`, for an `n`×`n` grid with `n = k²` (`num`
//! ranges over `0..n`, representing digit `num + 1`). Clauses encode: every
//! cell holds at least one digit, every cell holds at most one digit, every
//! digit appears at most once per row/column/box, and every pre-filled cell
//! is pinned with a unit clause.

use std::fmt;

use crate::cnf::CnfFormula;
use crate::lit::Lit;
use crate::model::Model;

/// An `n`×`n` Sudoku grid, `0` marking an empty cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    n: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Builds a grid from row-major cell values. `n` must be a perfect square
    /// and every value must be in `0..=n`.
    pub fn new(n: usize, cells: Vec<u8>) -> Grid {
        let box_size = (n as f64).sqrt().round() as usize;
        assert!(box_size * box_size == n, "grid size must be a perfect square");
        assert_eq!(cells.len(), n * n, "expected {} cells, got {}", n * n, cells.len());
        assert!(
            cells.iter().all(|&v| (v as usize) <= n),
            "cell values must be in 0..={}",
            n
        );
        Grid { n, cells }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn box_size(&self) -> usize {
        (self.n as f64).sqrt().round() as usize
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.n + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[row * self.n + col] = value;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.n)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.rows() {
            for (i, &value) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                if value == 0 {
                    write!(f, ".")?;
                } else {
                    write!(f, "{}", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn var_index(n: usize, row: usize, col: usize, num: usize) -> usize {
    row * n * n + col * n + num
}

fn lit(n: usize, row: usize, col: usize, num: usize, positive: bool) -> Lit {
    Lit::from_index(var_index(n, row, col, num), positive)
}

/// Encodes `grid` as a CNF formula: a satisfying model corresponds exactly to
/// a completed grid consistent with the pre-filled cells.
pub fn encode(grid: &Grid) -> CnfFormula {
    let n = grid.n;
    let box_size = grid.box_size();
    let mut formula = CnfFormula::new();
    formula.set_var_count(n * n * n);

    // Every cell holds at least one digit.
    for row in 0..n {
        for col in 0..n {
            let clause: Vec<Lit> = (0..n).map(|num| lit(n, row, col, num, true)).collect();
            formula.add_clause(clause);
        }
    }

    // Every cell holds at most one digit.
    for row in 0..n {
        for col in 0..n {
            for num1 in 0..n {
                for num2 in (num1 + 1)..n {
                    formula.add_clause(vec![
                        lit(n, row, col, num1, false),
                        lit(n, row, col, num2, false),
                    ]);
                }
            }
        }
    }

    // Every digit appears at most once per row.
    for row in 0..n {
        for num in 0..n {
            for col1 in 0..n {
                for col2 in (col1 + 1)..n {
                    formula.add_clause(vec![
                        lit(n, row, col1, num, false),
                        lit(n, row, col2, num, false),
                    ]);
                }
            }
        }
    }

    // Every digit appears at most once per column.
    for col in 0..n {
        for num in 0..n {
            for row1 in 0..n {
                for row2 in (row1 + 1)..n {
                    formula.add_clause(vec![
                        lit(n, row1, col, num, false),
                        lit(n, row2, col, num, false),
                    ]);
                }
            }
        }
    }

    // Every digit appears at most once per box.
    for box_row in 0..box_size {
        for box_col in 0..box_size {
            let cells: Vec<(usize, usize)> = (0..box_size)
                .flat_map(|i| {
                    (0..box_size).map(move |j| (box_row * box_size + i, box_col * box_size + j))
                })
                .collect();
            for num in 0..n {
                for a in 0..cells.len() {
                    for b in (a + 1)..cells.len() {
                        let (r1, c1) = cells[a];
                        let (r2, c2) = cells[b];
                        formula.add_clause(vec![
                            lit(n, r1, c1, num, false),
                            lit(n, r2, c2, num, false),
                        ]);
                    }
                }
            }
        }
    }

    // Pre-filled cells are pinned with unit clauses.
    for row in 0..n {
        for col in 0..n {
            let value = grid.get(row, col);
            if value != 0 {
                let num = (value - 1) as usize;
                formula.add_clause(vec![lit(n, row, col, num, true)]);
            }
        }
    }

    formula
}

/// Inverts [`encode`]: reads off, for each cell, the digit whose variable the
/// model set true.
pub fn decode(model: &Model, n: usize) -> Grid {
    let mut cells = vec![0u8; n * n];
    for row in 0..n {
        for col in 0..n {
            for num in 0..n {
                if model.satisfies(lit(n, row, col, num, true)) {
                    cells[row * n + col] = (num + 1) as u8;
                    break;
                }
            }
        }
    }
    Grid::new(n, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Solver;
    use crate::config::SolverConfig;

    fn empty_grid(n: usize) -> Grid {
        Grid::new(n, vec![0; n * n])
    }

    fn is_valid_solution(grid: &Grid) -> bool {
        let n = grid.size();
        let box_size = grid.box_size();

        let all_digits = |values: Vec<u8>| -> bool {
            let mut seen = vec![false; n + 1];
            for v in values {
                if v == 0 || seen[v as usize] {
                    return false;
                }
                seen[v as usize] = true;
            }
            true
        };

        for row in 0..n {
            if !all_digits((0..n).map(|col| grid.get(row, col)).collect()) {
                return false;
            }
        }
        for col in 0..n {
            if !all_digits((0..n).map(|row| grid.get(row, col)).collect()) {
                return false;
            }
        }
        for box_row in 0..box_size {
            for box_col in 0..box_size {
                let values: Vec<u8> = (0..box_size)
                    .flat_map(|i| {
                        (0..box_size).map(move |j| {
                            (box_row * box_size + i, box_col * box_size + j)
                        })
                    })
                    .map(|(r, c)| grid.get(r, c))
                    .collect();
                if !all_digits(values) {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn empty_4x4_is_satisfiable_and_valid() {
        let grid = empty_grid(4);
        let formula = encode(&grid);
        let solver = Solver::new(SolverConfig::default());
        let (result, _) = solver.solve(&formula);
        assert!(result.is_sat());
        let solved = decode(result.model().unwrap(), 4);
        assert!(is_valid_solution(&solved));
    }

    #[test]
    fn pre_filled_cells_are_preserved() {
        #[rustfmt::skip]
        let grid = Grid::new(4, vec![
            1, 0, 0, 0,
            0, 0, 1, 0,
            0, 1, 0, 0,
            0, 0, 0, 1,
        ]);
        let formula = encode(&grid);
        let solver = Solver::new(SolverConfig::default());
        let (result, _) = solver.solve(&formula);
        assert!(result.is_sat());
        let solved = decode(result.model().unwrap(), 4);
        assert!(is_valid_solution(&solved));
        assert_eq!(solved.get(0, 0), 1);
        assert_eq!(solved.get(1, 2), 1);
        assert_eq!(solved.get(2, 1), 1);
        assert_eq!(solved.get(3, 3), 1);
    }

    #[test]
    fn conflicting_pre_filled_cells_are_unsatisfiable() {
        #[rustfmt::skip]
        let grid = Grid::new(4, vec![
            1, 1, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
        ]);
        let formula = encode(&grid);
        let solver = Solver::new(SolverConfig::default());
        let (result, _) = solver.solve(&formula);
        assert!(result.is_unsat());
    }

    #[test]
    fn display_renders_dots_for_empty_cells() {
        let grid = empty_grid(4);
        assert_eq!(grid.to_string(), ". . . .\n".repeat(4));
    }
}
