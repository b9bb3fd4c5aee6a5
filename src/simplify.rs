//! Subsumption pre-processing

use crate::{
    formula::{Clause, ClauseIx, Formula},
    literal::Literal,
    memory::{Array, StackMapping, Vector},
};

/// Remove every clause whose literal set contains some other clause's
/// literal set. Runs once, before the watcher lists and the branching order
/// are built. Returns the number of removed clauses.
pub fn remove_subsumed(formula: &mut Formula) -> usize {
    let num_clauses = formula.num_clauses();
    let mut marked = Array::<ClauseIx, bool>::new(false, num_clauses);
    let longest_clause = formula.clauses.iter().map(Clause::len).max().unwrap_or(0);
    let mut members: StackMapping<Literal, bool> = StackMapping::with_array_value_size_stack_size(
        false,
        formula.maxvar.array_size_for_literals(),
        longest_clause,
    );
    for i in formula.clause_indices() {
        if marked[i] {
            continue;
        }
        for &literal in formula[i].literals.iter() {
            members.push(literal, true);
        }
        for j in formula.clause_indices() {
            if i == j || marked[j] {
                continue;
            }
            let subsumed = formula[i].len() >= formula[j].len()
                && formula[j].literals.iter().all(|&literal| members[literal]);
            if subsumed {
                marked[i] = true;
                break;
            }
        }
        members.clear();
    }
    let clauses = std::mem::replace(&mut formula.clauses, Vector::new());
    let mut kept = Vector::new();
    for (offset, clause) in clauses.into_iter().enumerate() {
        if !marked[ClauseIx::from_usize(offset)] {
            kept.push(clause);
        }
    }
    let removed = num_clauses - kept.len();
    formula.clauses = kept;
    removed
}
