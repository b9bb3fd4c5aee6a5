//! Watcher lists for unit propagation

use crate::{
    formula::{ClauseIx, Formula},
    literal::{Literal, Variable},
    memory::{Array, Vector},
    trail::{Trail, UndoEntry},
};
use std::ops::Index;

/// For every literal, the clauses that currently watch it.
///
/// A clause with at least two literals is registered in the lists of two of
/// its own literals; a unit clause in exactly one; an empty clause in none.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Watches {
    lists: Array<Literal, Vector<ClauseIx>>,
}

impl Watches {
    pub fn new(maxvar: Variable) -> Watches {
        Watches {
            lists: Array::new(Vector::new(), maxvar.array_size_for_literals()),
        }
    }
    /// Register the initial watches: the first literal of every clause, and
    /// additionally the second one for clauses with at least two literals.
    pub fn init(formula: &Formula) -> Watches {
        let mut watches = Watches::new(formula.maxvar);
        for clause_ix in formula.clause_indices() {
            let literals = &formula[clause_ix].literals;
            if literals.is_empty() {
                continue;
            }
            watches.push(literals[0], clause_ix);
            if literals.len() >= 2 {
                watches.push(literals[1], clause_ix);
            }
        }
        watches
    }
    /// Append without logging. Used for the initial registration and by
    /// rewind to invert a logged removal.
    pub fn push(&mut self, literal: Literal, clause: ClauseIx) {
        self.lists[literal].push(clause);
    }
    /// Remove the first occurrence without logging. Used by rewind to invert
    /// a logged addition.
    pub fn remove_first(&mut self, literal: Literal, clause: ClauseIx) {
        let list = &mut self.lists[literal];
        let position = list.iter().position(|&watched| watched == clause);
        requires!(position.is_some(), "clause {} does not watch {}", clause, literal);
        if let Some(position) = position {
            list.remove(position);
        }
    }
    /// Append the clause to the literal's list and log the effect.
    pub fn add(&mut self, literal: Literal, clause: ClauseIx, trail: &mut Trail) {
        self.push(literal, clause);
        trail.record(UndoEntry::WatchAdd(literal, clause));
    }
    /// Remove the first occurrence of the clause from the literal's list and
    /// log the effect.
    pub fn remove(&mut self, literal: Literal, clause: ClauseIx, trail: &mut Trail) {
        self.remove_first(literal, clause);
        trail.record(UndoEntry::WatchRemove(literal, clause));
    }
    pub fn contains(&self, literal: Literal, clause: ClauseIx) -> bool {
        self.lists[literal].iter().any(|&watched| watched == clause)
    }
}

impl Index<Literal> for Watches {
    type Output = Vector<ClauseIx>;
    fn index(&self, literal: Literal) -> &Vector<ClauseIx> {
        &self.lists[literal]
    }
}

/// Check that every clause that is not satisfied is watched according to its
/// size: two distinct literals of its own vector for clauses of size two or
/// more, its single literal for unit clauses, and nothing for empty clauses.
pub fn watch_invariants(formula: &Formula, watches: &Watches) {
    for clause_ix in formula.clause_indices() {
        let clause = &formula[clause_ix];
        if clause.satisfied {
            continue;
        }
        let mut watching = Vector::new();
        for literal in Literal::all(formula.maxvar) {
            for &watched in watches[literal].iter() {
                if watched == clause_ix {
                    watching.push(literal);
                }
            }
        }
        match clause.len() {
            0 => invariant!(
                watching.is_empty(),
                "empty clause {} must not be watched",
                clause_ix
            ),
            1 => invariant!(
                watching.len() == 1 && watching[0] == clause.literals[0],
                "unit clause {} must watch its only literal",
                clause_ix
            ),
            _ => {
                invariant!(
                    watching.len() == 2 && watching[0] != watching[1],
                    "clause {} must be watched through two distinct literals",
                    clause_ix
                );
                invariant!(
                    watching
                        .iter()
                        .all(|watcher| clause.literals.iter().any(|literal| literal == watcher)),
                    "clause {} must be watched through its own literals",
                    clause_ix
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_formula, Input};

    fn formula(text: &str) -> Formula {
        parse_formula(&mut Input::new(Box::new(text.as_bytes().iter().cloned())))
            .expect("failed to parse test formula")
    }

    #[test]
    fn initial_registration_by_clause_size() {
        let formula = formula("p cnf 2 3\n1 0\n1 -2 0\n0\n");
        let watches = Watches::init(&formula);
        assert!(watches.contains(Literal::new(1), ClauseIx::new(0)));
        assert_eq!(watches[Literal::new(1)].len(), 2);
        assert!(watches.contains(Literal::new(1), ClauseIx::new(1)));
        assert!(watches.contains(Literal::new(-2), ClauseIx::new(1)));
        for literal in Literal::all(formula.maxvar) {
            assert!(!watches.contains(literal, ClauseIx::new(2)));
        }
        watch_invariants(&formula, &watches);
    }

    #[test]
    fn add_and_remove_log_their_inverses() {
        let formula = formula("p cnf 2 1\n1 2 0\n");
        let mut watches = Watches::init(&formula);
        let mut trail = Trail::new();
        let clause = ClauseIx::new(0);

        watches.remove(Literal::new(1), clause, &mut trail);
        watches.add(Literal::new(-1), clause, &mut trail);
        assert!(!watches.contains(Literal::new(1), clause));
        assert!(watches.contains(Literal::new(-1), clause));
        assert_eq!(trail.len(), 2);
    }
}
