//! DIMACS CNF parser

use crate::{
    formula::{Clause, Formula},
    literal::{Literal, Variable},
    memory::Vector,
};
use std::{
    cmp,
    convert::TryInto,
    fs::File,
    io::{BufReader, Error, ErrorKind, Read, Result},
    iter::Peekable,
};

/// Parse the formula in the given file.
///
/// Reports failures to open or parse the file as a fatal error.
pub fn parse_formula_file(filename: &str) -> Formula {
    let file = File::open(filename).unwrap_or_else(|err| die!("cannot open file: {}", err));
    let mut input = Input::new(Box::new(BufReader::new(file).bytes().map(panic_on_error)));
    parse_formula(&mut input).unwrap_or_else(|err| die!("failed to parse formula: {}", err))
}

/// Unwraps a result, halting with a fatal error message on failure.
pub fn panic_on_error<T>(result: Result<T>) -> T {
    result.unwrap_or_else(|error| die!("{}", error))
}

/// Parse a DIMACS formula.
///
/// Reads clauses until the declared clause count is reached or the input
/// ends. An input that ends early yields a truncated formula (with a
/// warning); a clause that is missing its terminating zero at the end of
/// the input is closed as-is.
pub fn parse_formula(input: &mut Input) -> Result<Formula> {
    let (declared_maxvar, declared_clauses) = parse_formula_header(input)?;
    let mut formula = Formula {
        maxvar: Variable::new(declared_maxvar as u32),
        clauses: Vector::new(),
    };
    while formula.num_clauses() < declared_clauses as usize {
        parse_any_whitespace(input);
        match input.peek() {
            None => break,
            Some(b'c') => {
                parse_comment(input)?;
                continue;
            }
            Some(_) => (),
        }
        let clause = parse_clause(input, &mut formula.maxvar)?;
        formula.clauses.push(clause);
    }
    if formula.num_clauses() < declared_clauses as usize {
        as_warning!(comment!(
            "formula ends after {} of {} declared clauses",
            formula.num_clauses(),
            declared_clauses
        ));
    }
    Ok(formula)
}

/// Parse a single clause, ending at its terminating zero or at end of input.
fn parse_clause(input: &mut Input, maxvar: &mut Variable) -> Result<Clause> {
    let mut literals = Vector::new();
    loop {
        parse_any_whitespace(input);
        if input.peek().is_none() {
            break;
        }
        let literal = parse_literal(input)?;
        if literal.is_zero() {
            break;
        }
        *maxvar = cmp::max(*maxvar, literal.variable());
        literals.push(literal);
    }
    Ok(Clause::new(literals))
}

// Error messages.
/// A numeric overflow. This should only happen for user input.
const OVERFLOW: &str = "overflow while parsing number";
/// Parser error ("unexpected EOF")
const EOF: &str = "premature end of file";
/// Parser error (`expected ...`)
const NUMBER: &str = "expected number";
/// Parser error (`expected ...`)
const SPACE: &str = "expected space";
/// Parser error (`expected ...`)
const NUMBER_OR_SPACE: &str = "expected number or space";
/// Parser error (`expected ...`)
const NUMBER_OR_MINUS: &str = "expected number or \"-\"";
/// Parser error (`expected ...`)
const P_CNF: &str = "expected \"p cnf\"";
/// Parser error (`expected ...`)
const NEWLINE: &str = "expected newline";

/// Check if a character is a decimal digit.
fn is_digit(value: u8) -> bool {
    value >= b'0' && value <= b'9'
}

/// Check if a character is a decimal digit or a dash.
fn is_digit_or_dash(value: u8) -> bool {
    is_digit(value) || value == b'-'
}

/// Returns true if the character is one of the whitespace characters we allow.
fn is_space(c: u8) -> bool {
    [b' ', b'\t', b'\n', b'\r'].iter().any(|&s| s == c)
}

/// Parse a decimal number.
///
/// Consumes one or more decimal digits, returning the value of the
/// resulting number on success. Fails if there is no digit or if the digits
/// do not end in a whitespace or newline.
fn parse_u64(input: &mut Input) -> Result<u64> {
    match input.peek() {
        None => return Err(input.error(NUMBER)),
        Some(c) => {
            if !is_digit(c) {
                return Err(input.error(NUMBER));
            }
        }
    }
    let mut value: u64 = 0;
    while let Some(c) = input.peek() {
        if is_space(c) {
            break;
        }
        if !is_digit(c) {
            return Err(input.error(NUMBER_OR_SPACE));
        }
        input.next();
        value = value
            .checked_mul(10)
            .and_then(|val| val.checked_add(u64::from(c - b'0')))
            .ok_or_else(|| input.error(OVERFLOW))?;
    }
    Ok(value)
}

/// Just like `parse_u64` but convert the result to an i32.
fn parse_i32(input: &mut Input) -> Result<i32> {
    let value = parse_u64(input)?;
    if value > i32::max_value().try_into().unwrap() {
        Err(input.error(OVERFLOW))
    } else {
        Ok(value as i32)
    }
}

/// Parse a [Literal](../literal/struct.Literal.html).
///
/// Consumes zero or more spaces followed by an optional "-", a number of at
/// least one decimal digit, trailed by whitespace. If the number is zero,
/// consumes all whitespace until the next clause.
pub fn parse_literal(input: &mut Input) -> Result<Literal> {
    parse_any_space(input);
    match input.peek() {
        None => Err(input.error(EOF)),
        Some(c) if is_digit_or_dash(c) => {
            let sign = if c == b'-' {
                input.next();
                -1
            } else {
                1
            };
            let number = parse_i32(input)?;
            if number == 0 {
                parse_any_whitespace(input);
            }
            Ok(Literal::new(sign * number))
        }
        _ => Err(input.error(NUMBER_OR_MINUS)),
    }
}

/// Parse a DIMACS comment starting with "c".
///
/// Consumes the leading "c" and any characters until (including) the next
/// newline.
fn parse_comment(input: &mut Input) -> Result<()> {
    match input.peek() {
        Some(b'c') => {
            input.next();
            while let Some(c) = input.next() {
                if c == b'\n' {
                    return Ok(());
                }
            }
            Err(input.error(NEWLINE))
        }
        _ => Err(input.error("")),
    }
}

/// Parse one or more spaces.
fn parse_some_spaces(input: &mut Input) -> Result<()> {
    if input.peek() != Some(b' ') {
        return Err(input.error(SPACE));
    }
    while let Some(b' ') = input.peek() {
        input.next();
    }
    Ok(())
}

/// Parse zero or more spaces.
fn parse_any_space(input: &mut Input) {
    while let Some(c) = input.peek() {
        if c != b' ' {
            break;
        }
        input.next();
    }
}

/// Parse zero or more spaces or linebreaks.
fn parse_any_whitespace(input: &mut Input) {
    while let Some(c) = input.peek() {
        if !is_space(c) {
            break;
        }
        input.next();
    }
}

/// Parse a DIMACS header.
fn parse_formula_header(input: &mut Input) -> Result<(i32, u64)> {
    while Some(b'c') == input.peek() {
        parse_comment(input)?
    }
    for &expected in b"p cnf" {
        if input.peek().map_or(true, |c| c != expected) {
            return Err(input.error(P_CNF));
        }
        input.next();
    }
    parse_some_spaces(input)?;
    let maxvar = parse_i32(input)?;
    parse_some_spaces(input)?;
    let num_clauses = parse_u64(input)?;
    parse_any_whitespace(input);
    Ok((maxvar, num_clauses))
}

/// A peekable iterator for bytes that records line and column information.
pub struct Input<'a> {
    /// The source of the input data
    source: Peekable<Box<dyn Iterator<Item = u8> + 'a>>,
    /// The current line number
    line: usize,
    /// The current column
    column: usize,
}

impl<'a> Input<'a> {
    /// Create a new `Input` from some source
    pub fn new(source: Box<dyn Iterator<Item = u8> + 'a>) -> Self {
        Input {
            source: source.peekable(),
            line: 1,
            column: 1,
        }
    }
    /// Look at the next byte without consuming it
    pub fn peek(&mut self) -> Option<u8> {
        self.source.peek().cloned()
    }
    /// Create an io::Error with the given message and position information.
    pub fn error(&self, why: &'static str) -> Error {
        Error::new(
            ErrorKind::InvalidData,
            format!("{} at line {} column {}", why, self.line, self.column),
        )
    }
}

impl Iterator for Input<'_> {
    type Item = u8;
    fn next(&mut self) -> Option<u8> {
        self.source.next().map(|c| {
            if c == b'\n' {
                self.line += 1;
                self.column = 0;
            }
            self.column += 1;
            c
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Formula> {
        parse_formula(&mut Input::new(Box::new(text.as_bytes().iter().cloned())))
    }

    fn clause(literals: &[i32]) -> Clause {
        Clause::new(literals.iter().map(|&value| Literal::new(value)).collect())
    }

    #[test]
    fn valid_formula() {
        let example = r#"c comment
p cnf 2 2
1 2 0
c comment
-1 -2 0"#;
        assert_eq!(
            parse(example).expect("parse failed"),
            Formula {
                maxvar: Variable::new(2),
                clauses: vec![clause(&[1, 2]), clause(&[-1, -2])].into_iter().collect(),
            }
        );
    }

    #[test]
    fn clause_spanning_lines() {
        let formula = parse("p cnf 3 1\n1\n2 3 0\n").expect("parse failed");
        assert_eq!(formula.num_clauses(), 1);
        assert_eq!(formula.clauses[0], clause(&[1, 2, 3]));
    }

    #[test]
    fn truncated_formula() {
        let formula = parse("p cnf 2 3\n1 0\n").expect("parse failed");
        assert_eq!(formula.num_clauses(), 1);
    }

    #[test]
    fn missing_terminator() {
        let formula = parse("p cnf 2 1\n1 2").expect("parse failed");
        assert_eq!(formula.clauses[0], clause(&[1, 2]));
    }

    #[test]
    fn empty_clause() {
        let formula = parse("p cnf 1 1\n0\n").expect("parse failed");
        assert_eq!(formula.clauses[0], clause(&[]));
    }

    #[test]
    fn maxvar_tracks_literals_beyond_header() {
        let formula = parse("p cnf 1 1\n3 0\n").expect("parse failed");
        assert_eq!(formula.maxvar, Variable::new(3));
    }

    #[test]
    fn rejects_missing_header() {
        assert!(parse("1 2 0\n").is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("p cnf 1 1\nx 0\n").is_err());
    }
}
