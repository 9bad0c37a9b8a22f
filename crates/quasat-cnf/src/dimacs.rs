//! DIMACS CNF reading and writing.
//!
//! ```text
//! c optional comments
//! p cnf <num_variables> <num_clauses>
//! 1 -2 3 0
//! -1 2 0
//! ```
//!
//! Clauses are whitespace-separated literals terminated by `0` and may span
//! lines. A `%` line (SATLIB end marker) stops parsing. A clause count that
//! disagrees with the header is logged, not rejected.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::warn;

use crate::clause::Clause;
use crate::error::{CnfError, CnfResult};
use crate::instance::CnfInstance;
use crate::literal::Literal;

/// Parse DIMACS CNF text.
pub fn parse(input: &str) -> CnfResult<CnfInstance> {
    let mut header: Option<(usize, usize)> = None;
    let mut clauses = Vec::new();
    let mut pending: Vec<Literal> = Vec::new();
    let mut pending_line = 0;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }
        if line.starts_with('%') {
            break;
        }
        if line.starts_with('p') {
            if header.is_some() {
                return Err(parse_error(line_no, "duplicate problem line"));
            }
            header = Some(parse_header(line, line_no)?);
            continue;
        }
        if header.is_none() {
            return Err(parse_error(line_no, "clause before problem line"));
        }

        for token in line.split_whitespace() {
            let value: i32 = token
                .parse()
                .map_err(|_| parse_error(line_no, format!("invalid literal '{token}'")))?;
            if value == 0 {
                clauses.push(finish_clause(&mut pending, line_no)?);
            } else {
                if pending.is_empty() {
                    pending_line = line_no;
                }
                pending.push(Literal::new(value)?);
            }
        }
    }

    let Some((num_variables, declared)) = header else {
        return Err(parse_error(0, "missing problem line"));
    };
    if !pending.is_empty() {
        // Tolerate a final clause without its terminating 0.
        clauses.push(finish_clause(&mut pending, pending_line)?);
    }
    if clauses.len() != declared {
        warn!(
            declared,
            found = clauses.len(),
            "DIMACS clause count differs from header"
        );
    }
    CnfInstance::new(num_variables, clauses)
}

/// Read and parse a DIMACS file.
pub fn read_file(path: impl AsRef<Path>) -> CnfResult<CnfInstance> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Render an instance as DIMACS text.
pub fn to_string(instance: &CnfInstance) -> String {
    Dimacs(instance).to_string()
}

/// Write an instance as DIMACS to any writer.
pub fn write<W: Write>(instance: &CnfInstance, mut writer: W) -> CnfResult<()> {
    write!(writer, "{}", Dimacs(instance))?;
    Ok(())
}

/// DIMACS rendering of an instance.
struct Dimacs<'a>(&'a CnfInstance);

impl fmt::Display for Dimacs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.0.num_variables(), self.0.num_clauses())?;
        for clause in self.0.clauses() {
            for lit in clause.literals() {
                write!(f, "{} ", lit.to_dimacs())?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

fn parse_header(line: &str, line_no: usize) -> CnfResult<(usize, usize)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        ["p", "cnf", vars, clauses] => {
            let vars = vars
                .parse()
                .map_err(|_| parse_error(line_no, format!("invalid variable count '{vars}'")))?;
            let clauses = clauses
                .parse()
                .map_err(|_| parse_error(line_no, format!("invalid clause count '{clauses}'")))?;
            Ok((vars, clauses))
        }
        _ => Err(parse_error(line_no, "expected 'p cnf <vars> <clauses>'")),
    }
}

fn finish_clause(pending: &mut Vec<Literal>, line_no: usize) -> CnfResult<Clause> {
    Clause::new(pending.drain(..)).map_err(|e| parse_error(line_no, e.to_string()))
}

fn parse_error(line: usize, message: impl Into<String>) -> CnfError {
    CnfError::Parse {
        line,
        message: message.into(),
    }
}
