//! Static branching order

use crate::{
    assignment::Assignment,
    formula::Formula,
    literal::Variable,
    memory::{Array, Vector},
};
use std::cmp::Reverse;

/// All variables, sorted by descending number of occurrences in the
/// formula; ties are broken by ascending variable id. Computed once, after
/// pre-processing, and never updated during the search.
#[derive(Debug)]
pub struct VariableOrder {
    order: Vector<Variable>,
}

impl VariableOrder {
    pub fn new(formula: &Formula) -> VariableOrder {
        let mut counts =
            Array::<Variable, usize>::new(0, formula.maxvar.array_size_for_variables());
        for clause in formula.clauses.iter() {
            for &literal in clause.literals.iter() {
                counts[literal.variable()] += 1;
            }
        }
        let mut order: Vector<Variable> = (1..=formula.maxvar.0).map(Variable::new).collect();
        order.sort_unstable_by_key(|&variable| (Reverse(counts[variable]), variable.0));
        VariableOrder { order }
    }
    /// The next variable to branch on: the first unassigned one in the
    /// precomputed order, or `None` once every variable is assigned.
    pub fn pick(&self, assignment: &Assignment) -> Option<Variable> {
        self.order
            .iter()
            .find(|&&variable| assignment.is_unassigned(variable))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Literal;
    use crate::parser::{parse_formula, Input};

    fn formula(text: &str) -> Formula {
        parse_formula(&mut Input::new(Box::new(text.as_bytes().iter().cloned())))
            .expect("failed to parse test formula")
    }

    #[test]
    fn orders_by_descending_occurrence_count() {
        let formula = formula("p cnf 3 3\n1 2 0\n-2 3 0\n2 0\n");
        let order = VariableOrder::new(&formula);
        let assignment = Assignment::new(formula.maxvar);
        assert_eq!(order.pick(&assignment), Some(Variable::new(2)));
    }

    #[test]
    fn breaks_ties_by_ascending_id() {
        let formula = formula("p cnf 3 1\n1 2 3 0\n");
        let order = VariableOrder::new(&formula);
        let mut assignment = Assignment::new(formula.maxvar);
        assert_eq!(order.pick(&assignment), Some(Variable::new(1)));
        assignment.assign(Literal::new(1));
        assert_eq!(order.pick(&assignment), Some(Variable::new(2)));
    }

    #[test]
    fn pick_skips_assigned_variables() {
        let formula = formula("p cnf 2 2\n2 0\n2 1 0\n");
        let order = VariableOrder::new(&formula);
        let mut assignment = Assignment::new(formula.maxvar);
        assignment.assign(Literal::new(-2));
        assert_eq!(order.pick(&assignment), Some(Variable::new(1)));
        assignment.assign(Literal::new(1));
        assert_eq!(order.pick(&assignment), None);
    }
}
