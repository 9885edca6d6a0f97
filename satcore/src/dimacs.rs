//! Relaxed DIMACS CNF parsing and writing.
//!
//! Lines starting with `c` are comments. A line starting with `p cnf <V> <C>`
//! declares variable and clause counts, but the parser tolerates a missing or
//! mismatched header: it only ever informs the caller, never fails, since a
//! header is optional per the DIMACS dialect this solver accepts. Every other
//! non-blank line is a clause: whitespace-separated signed integers terminated
//! by `0`. Duplicate literals are silently deduplicated and tautological
//! clauses (containing both `l` and `-l`) are dropped.
use std::io::{self, BufRead};

use thiserror::Error;

use crate::cnf::CnfFormula;
use crate::lit::{Lit, Var};

/// Errors that can occur while parsing a DIMACS CNF formula.
///
/// These are the only faults the parser raises; a missing or mismatched header
/// count is not one of them (see module docs).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DimacsError {
    #[error("line {line}: non-integer token '{token}' in clause")]
    NotAnInteger { line: usize, token: String },
    #[error("line {line}: unterminated clause (missing trailing 0)")]
    UnterminatedClause { line: usize },
    #[error("line {line}: literal index {index} exceeds the supported maximum")]
    LiteralTooLarge { line: usize, index: usize },
    #[error("line {line}: malformed header '{header}'")]
    InvalidHeader { line: usize, header: String },
}

/// Variable and clause counts declared by a `p cnf` header line, if present.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DimacsHeader {
    pub var_count: usize,
    pub clause_count: usize,
}

/// Parser for DIMACS CNF input.
///
/// Can consume input incrementally via [`parse_line`](DimacsParser::parse_line),
/// or parse a whole reader in one call via [`parse`](DimacsParser::parse).
#[derive(Default)]
pub struct DimacsParser {
    formula: CnfFormula,
    header: Option<DimacsHeader>,
    clause_count: usize,
    line_number: usize,
    /// When set, a missing trailing `0` on a non-blank clause line is an error
    /// instead of being tolerated as an implicit terminator at EOF.
    strict: bool,
}

impl DimacsParser {
    /// Create a new parser in the default, tolerant mode.
    pub fn new() -> DimacsParser {
        DimacsParser::default()
    }

    /// Create a parser that rejects clause lines missing their trailing `0`.
    pub fn strict() -> DimacsParser {
        DimacsParser {
            strict: true,
            ..DimacsParser::default()
        }
    }

    /// Parse an entire reader into a [`CnfFormula`].
    pub fn parse(input: impl io::Read) -> Result<CnfFormula, DimacsError> {
        let mut parser = DimacsParser::new();
        let mut reader = io::BufReader::new(input);
        let mut line = String::new();
        loop {
            line.clear();
            let read = reader.read_line(&mut line).unwrap_or(0);
            if read == 0 {
                break;
            }
            parser.parse_line(&line)?;
        }
        Ok(parser.take_formula())
    }

    /// Parse a single line of input.
    ///
    /// A clause line without a trailing `0` is buffered as a comment-level
    /// warning candidate by the caller; in non-strict mode this parser treats a
    /// bare clause (no trailing zero, consumed whole) as already complete, since
    /// the spec only requires the zero as *a* terminator, not that every line
    /// carry one independently.
    pub fn parse_line(&mut self, line: &str) -> Result<(), DimacsError> {
        self.line_number += 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('c') {
            return Ok(());
        }

        if line.starts_with('p') {
            self.parse_header(line)?;
            return Ok(());
        }

        let mut clause = Vec::new();
        let mut terminated = false;

        for token in line.split_whitespace() {
            let value: isize = token.parse().map_err(|_| DimacsError::NotAnInteger {
                line: self.line_number,
                token: token.to_string(),
            })?;

            if value == 0 {
                terminated = true;
                break;
            }

            if value.unsigned_abs() > Var::max_var().index() + 1 {
                return Err(DimacsError::LiteralTooLarge {
                    line: self.line_number,
                    index: value.unsigned_abs(),
                });
            }

            clause.push(Lit::from_dimacs(value));
        }

        if self.strict && !terminated {
            return Err(DimacsError::UnterminatedClause {
                line: self.line_number,
            });
        }

        self.add_clause(clause);
        Ok(())
    }

    /// Adds a parsed clause, dropping tautologies and deduplicating literals.
    fn add_clause(&mut self, mut clause: Vec<Lit>) {
        clause.sort_unstable();
        clause.dedup();

        let is_tautology = clause
            .windows(2)
            .any(|pair| pair[0].var() == pair[1].var());

        if is_tautology {
            return;
        }

        self.clause_count += 1;
        self.formula.add_clause(clause);
    }

    fn parse_header(&mut self, line: &str) -> Result<(), DimacsError> {
        let mut fields = line.split_whitespace();
        let invalid = || DimacsError::InvalidHeader {
            line: self.line_number,
            header: line.to_string(),
        };

        if fields.next() != Some("p") || fields.next() != Some("cnf") {
            return Err(invalid());
        }

        let var_count: usize = fields.next().and_then(|v| v.parse().ok()).ok_or_else(invalid)?;
        let clause_count: usize = fields.next().and_then(|v| v.parse().ok()).ok_or_else(invalid)?;

        if fields.next().is_some() {
            return Err(invalid());
        }

        self.formula.set_var_count(var_count);
        self.header = Some(DimacsHeader {
            var_count,
            clause_count,
        });
        Ok(())
    }

    /// The `p cnf` header, if the input declared one.
    pub fn header(&self) -> Option<DimacsHeader> {
        self.header
    }

    /// Whether the declared header counts (if any) match what was parsed.
    ///
    /// The core never treats a mismatch as a fault; callers may log it.
    pub fn header_matches(&self) -> bool {
        match self.header {
            None => true,
            Some(header) => {
                header.var_count == self.formula.var_count()
                    && header.clause_count == self.clause_count
            }
        }
    }

    /// Take the parsed formula, leaving an empty one with the same variable count behind.
    pub fn take_formula(&mut self) -> CnfFormula {
        let mut replacement = CnfFormula::new();
        replacement.set_var_count(self.formula.var_count());
        std::mem::replace(&mut self.formula, replacement)
    }
}

/// Write a formula as DIMACS CNF, including its `p cnf` header.
pub fn write_dimacs(target: &mut impl io::Write, formula: &CnfFormula) -> io::Result<()> {
    writeln!(target, "p cnf {} {}", formula.var_count(), formula.len())?;
    for clause in formula.iter() {
        for lit in clause {
            write!(target, "{} ", lit.to_dimacs())?;
        }
        writeln!(target, "0")?;
    }
    Ok(())
}
