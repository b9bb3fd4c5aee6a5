//! Undo log for search-time mutations

use crate::{
    assignment::Assignment,
    formula::{ClauseIx, Formula},
    literal::Literal,
    memory::Vector,
    watchlist::Watches,
};
use static_assertions::const_assert;
use std::mem::size_of;

/// A reversible side effect of the search.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UndoEntry {
    /// The literal was assigned true.
    Assign(Literal),
    /// The clause's satisfied flag was raised.
    SatisfyClause(ClauseIx),
    /// The clause was appended to the literal's watcher list.
    WatchAdd(Literal, ClauseIx),
    /// The clause was removed from the literal's watcher list.
    WatchRemove(Literal, ClauseIx),
}

const_assert!(size_of::<UndoEntry>() == 12);

/// A trail position that can be rewound to.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct Checkpoint(usize);

/// The log of all reversible mutations since the search started.
///
/// Every mutation of the assignment, of a clause's satisfied flag, or of a
/// watcher list must be recorded here, and rewinding is the only way to take
/// any of them back.
#[derive(Debug, PartialEq, Eq, Default)]
pub struct Trail {
    entries: Vector<UndoEntry>,
}

impl Trail {
    pub fn new() -> Trail {
        Trail {
            entries: Vector::new(),
        }
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    /// The current top of the trail.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.entries.len())
    }
    pub fn record(&mut self, entry: UndoEntry) {
        self.entries.push(entry);
    }
    /// Pop entries in LIFO order, applying the exact inverse of each,
    /// until the top of the trail equals the checkpoint.
    ///
    /// This is purely state-restoring; it must never trigger propagation.
    pub fn rewind(
        &mut self,
        checkpoint: Checkpoint,
        formula: &mut Formula,
        assignment: &mut Assignment,
        watches: &mut Watches,
    ) {
        requires!(checkpoint.0 <= self.len());
        while self.len() > checkpoint.0 {
            let entry = self.entries.pop().expect("trail is above the checkpoint");
            match entry {
                UndoEntry::Assign(literal) => assignment.unassign(literal),
                UndoEntry::SatisfyClause(clause) => formula[clause].satisfied = false,
                UndoEntry::WatchAdd(literal, clause) => watches.remove_first(literal, clause),
                UndoEntry::WatchRemove(literal, clause) => watches.push(literal, clause),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Variable;
    use crate::parser::{parse_formula, Input};

    fn formula(text: &str) -> Formula {
        parse_formula(&mut Input::new(Box::new(text.as_bytes().iter().cloned())))
            .expect("failed to parse test formula")
    }

    #[test]
    fn rewind_inverts_every_entry_kind() {
        let mut formula = formula("p cnf 2 2\n1 2 0\n-1 -2 0\n");
        let maxvar = Variable::new(2);
        let mut assignment = Assignment::new(maxvar);
        let mut watches = Watches::init(&formula);
        let mut trail = Trail::new();

        let formula_before = formula.clone();
        let assignment_before = assignment.clone();
        let watches_before = watches.clone();
        let checkpoint = trail.checkpoint();

        let literal = Literal::new(1);
        let first = ClauseIx::new(0);
        assignment.assign(literal);
        trail.record(UndoEntry::Assign(literal));
        formula[first].satisfied = true;
        trail.record(UndoEntry::SatisfyClause(first));
        watches.remove(Literal::new(2), first, &mut trail);
        watches.add(Literal::new(-2), first, &mut trail);

        assert_eq!(trail.len(), 4);
        trail.rewind(checkpoint, &mut formula, &mut assignment, &mut watches);
        assert_eq!(trail.len(), 0);
        assert_eq!(formula, formula_before);
        assert_eq!(assignment, assignment_before);
        assert_eq!(watches, watches_before);
    }

    #[test]
    fn rewind_stops_at_the_checkpoint() {
        let mut formula = formula("p cnf 1 1\n1 0\n");
        let mut assignment = Assignment::new(Variable::new(1));
        let mut watches = Watches::init(&formula);
        let mut trail = Trail::new();

        assignment.assign(Literal::new(1));
        trail.record(UndoEntry::Assign(Literal::new(1)));
        let checkpoint = trail.checkpoint();
        formula[ClauseIx::new(0)].satisfied = true;
        trail.record(UndoEntry::SatisfyClause(ClauseIx::new(0)));

        trail.rewind(checkpoint, &mut formula, &mut assignment, &mut watches);
        assert_eq!(trail.checkpoint(), checkpoint);
        assert!(assignment[Literal::new(1)]);
        assert!(!formula[ClauseIx::new(0)].satisfied);
    }
}
