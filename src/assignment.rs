//! Abstraction for a partial assignment

use crate::{
    literal::{Literal, Variable},
    memory::Array,
};
use ansi_term::Colour;
use std::{fmt, ops::Index};

/// A partial assignment of truth values to variables.
///
/// The map has one entry per literal; `map[literal]` states whether the
/// literal has been assigned true. A variable is unassigned if neither of
/// its literals is.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Assignment {
    map: Array<Literal, bool>,
}

impl Assignment {
    pub fn new(maxvar: Variable) -> Assignment {
        Assignment {
            map: Array::new(false, maxvar.array_size_for_literals()),
        }
    }
    /// Assign the literal to true.
    pub fn assign(&mut self, literal: Literal) {
        requires!(!self.map[literal] && !self.map[-literal]);
        self.map[literal] = true;
    }
    /// Revert the assignment of the literal.
    pub fn unassign(&mut self, literal: Literal) {
        requires!(self.map[literal]);
        self.map[literal] = false;
    }
    pub fn is_unassigned(&self, variable: Variable) -> bool {
        !self.map[variable.literal()] && !self.map[-variable.literal()]
    }
}

impl Index<Literal> for Assignment {
    type Output = bool;
    fn index(&self, literal: Literal) -> &bool {
        &self.map[literal]
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Assignment: {{ ")?;
        for encoding in 2..self.map.size() as u32 {
            let literal = Literal::from_raw(encoding);
            if self.map[literal] {
                write!(f, "{} ", literal)?;
            }
        }
        write!(f, "}}")
    }
}

/// Render the clause with each literal colored by its truth value:
/// green for satisfied, red for falsified, yellow for unassigned.
pub fn format_clause_under_assignment(clause: &[Literal], assignment: &Assignment) -> String {
    let mut result = String::new();
    for &literal in clause {
        let style = if assignment[literal] {
            Colour::Green.normal()
        } else if assignment[-literal] {
            Colour::Red.normal()
        } else {
            Colour::Yellow.normal()
        };
        result += &format!("{}", style.paint(&format!("{} ", literal)));
    }
    result += "\n";
    result
}
