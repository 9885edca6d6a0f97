//! A satisfying assignment.

use std::io;

use crate::lit::{Lit, Var};

/// A complete satisfying assignment for every variable the formula declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    pub fn new(values: Vec<bool>) -> Model {
        Model { values }
    }

    pub fn var_count(&self) -> usize {
        self.values.len()
    }

    pub fn value(&self, var: Var) -> bool {
        self.values[var.index()]
    }

    /// Whether `lit` is true under this model.
    pub fn satisfies(&self, lit: Lit) -> bool {
        self.value(lit.var()) == lit.is_positive()
    }

    /// The model as a sequence of literals, one per variable, in the polarity
    /// that variable was assigned.
    pub fn assignment(&self) -> impl Iterator<Item = Lit> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(index, &value)| Lit::from_index(index, value))
    }

    /// Writes the model in the `v <lit> <lit> ... 0` form used by the SAT
    /// competition output format.
    pub fn write_dimacs(&self, target: &mut impl io::Write) -> io::Result<()> {
        write!(target, "v")?;
        for lit in self.assignment() {
            write!(target, " {}", lit.to_dimacs())?;
        }
        writeln!(target, " 0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn satisfies_checks_polarity() {
        let model = Model::new(vec![true, false]);
        assert!(model.satisfies(Lit::from_dimacs(1)));
        assert!(!model.satisfies(Lit::from_dimacs(2)));
        assert!(model.satisfies(Lit::from_dimacs(-2)));
    }

    #[test]
    fn write_dimacs_lists_every_variable() {
        let model = Model::new(vec![true, false, true]);
        let mut buf = Vec::new();
        model.write_dimacs(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "v 1 -2 3 0\n");
    }
}
