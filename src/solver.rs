//! DPLL search with two-watched-literal unit propagation

use crate::{
    assignment::Assignment,
    config,
    deadline::Deadline,
    formula::{ClauseIx, Formula},
    literal::{Literal, Variable},
    memory::{Array, Vector},
    order::VariableOrder,
    trail::{Checkpoint, Trail, UndoEntry},
    watchlist::{self, Watches},
};
use std::fmt;

/// The answer of the solver.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Verdict {
    Sat,
    Unsat,
    Timeout,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Verdict::Sat => "SAT",
                Verdict::Unsat => "UNSAT",
                Verdict::Timeout => "TIMEOUT",
            }
        )
    }
}

/// Whether a conflict has been found.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MaybeConflict(bool);
/// A conflict has been found
pub const CONFLICT: MaybeConflict = MaybeConflict(true);
/// No conflict has been found yet
pub const NO_CONFLICT: MaybeConflict = MaybeConflict(false);

/// What a sweep over the clauses found out about the formula.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum FormulaStatus {
    /// Every clause is satisfied.
    Satisfied,
    /// Some clause has only falsified literals left.
    Falsified,
    /// Neither of the above.
    Unknown,
}

/// Counters for diagnostics.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Stats {
    pub decisions: usize,
    pub propagated: usize,
    pub pure_literals: usize,
    pub conflicts: usize,
}

/// The search state.
///
/// The formula's satisfied flags, the assignment, and the watcher lists are
/// mutated in place during the search; the trail records every such
/// mutation so that backtracking is an exact rewind.
pub struct Solver {
    formula: Formula,
    assignment: Assignment,
    watches: Watches,
    trail: Trail,
    order: VariableOrder,
    deadline: Deadline,
    stats: Stats,
}

impl Solver {
    /// Set up the search state for a pre-processed formula.
    pub fn new(formula: Formula, deadline: Deadline) -> Solver {
        let order = VariableOrder::new(&formula);
        let watches = Watches::init(&formula);
        let assignment = Assignment::new(formula.maxvar);
        Solver {
            formula,
            assignment,
            watches,
            trail: Trail::new(),
            order,
            deadline,
            stats: Stats::default(),
        }
    }

    /// Decide satisfiability of the formula.
    pub fn solve(&mut self) -> Verdict {
        self.dpll(0)
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// One level of the recursive search.
    ///
    /// The checkpoint taken at entry covers everything this level does:
    /// when both branches fail, the caller sees no side effects. The second
    /// checkpoint, taken after propagation, lets the second branch reuse the
    /// propagation work, which is valid for either polarity.
    fn dpll(&mut self, depth: usize) -> Verdict {
        if self.deadline.exceeded() {
            return Verdict::Timeout;
        }
        let entry = self.trail.checkpoint();
        if self.propagate() == CONFLICT {
            self.rewind(entry);
            return Verdict::Unsat;
        }
        if self.eliminate_pure_literals() == CONFLICT {
            self.rewind(entry);
            return Verdict::Unsat;
        }
        match self.check_satisfaction() {
            FormulaStatus::Satisfied => return Verdict::Sat,
            // The caller rewinds past our effects.
            FormulaStatus::Falsified => return Verdict::Unsat,
            FormulaStatus::Unknown => (),
        }
        let variable = match self.order.pick(&self.assignment) {
            None => return Verdict::Unsat,
            Some(variable) => variable,
        };
        let branch = self.trail.checkpoint();
        // The polarity order is fixed: false before true.
        self.decide(-variable.literal());
        let first = self.dpll(depth + 1);
        if first != Verdict::Unsat {
            return first;
        }
        self.rewind(branch);
        self.decide(variable.literal());
        let second = self.dpll(depth + 1);
        if second == Verdict::Unsat {
            self.rewind(entry);
        }
        second
    }

    /// Two-watched-literal unit propagation.
    ///
    /// Works off a FIFO queue of literals to make true, seeded with the
    /// forced literal of every currently-unit clause. Duplicate enqueues are
    /// tolerated; a literal whose variable is already assigned is a no-op at
    /// assignment time, but its negation's watchers are still visited.
    fn propagate(&mut self) -> MaybeConflict {
        let mut queue = Vector::new();
        for clause_ix in self.formula.clause_indices() {
            let clause = &self.formula[clause_ix];
            if clause.satisfied {
                continue;
            }
            if clause.is_empty() {
                self.stats.conflicts += 1;
                return CONFLICT;
            }
            let mut unassigned_count = 0;
            let mut unit = Literal::new(0);
            let mut satisfied_by_assignment = false;
            for &literal in clause.literals.iter() {
                if self.assignment[literal] {
                    satisfied_by_assignment = true;
                    break;
                }
                if self.assignment.is_unassigned(literal.variable()) {
                    unassigned_count += 1;
                    if unassigned_count == 1 {
                        unit = literal;
                    }
                }
            }
            if !satisfied_by_assignment && unassigned_count == 1 {
                queue.push(unit);
            }
        }
        let mut head = 0;
        while head < queue.len() {
            let literal = queue[head];
            head += 1;
            if self.assignment.is_unassigned(literal.variable()) {
                self.assign(literal);
            }
            let falsified = -literal;
            let mut position = 0;
            while position < self.watches[falsified].len() {
                let clause_ix = self.watches[falsified][position];
                if self.formula[clause_ix].satisfied {
                    position += 1;
                    continue;
                }
                let other = match self.other_watcher(clause_ix, falsified) {
                    None => {
                        // The clause has a single watcher, so it is a unit
                        // clause: conflict if falsified, otherwise leave it
                        // for a later pass.
                        if self.clause_falsified(clause_ix) {
                            self.stats.conflicts += 1;
                            return CONFLICT;
                        }
                        queue.push(falsified);
                        position += 1;
                        continue;
                    }
                    Some(other) => other,
                };
                if self.assignment[other] {
                    position += 1;
                    continue;
                }
                if let Some(replacement) = self.replacement_watch(clause_ix, falsified, other) {
                    self.watches.remove(falsified, clause_ix, &mut self.trail);
                    self.watches.add(replacement, clause_ix, &mut self.trail);
                    // The removal shifted the next entry into this slot.
                    continue;
                }
                // No literal is left to watch: the co-watcher is forced.
                if self.assignment.is_unassigned(other.variable()) {
                    self.assign(other);
                    queue.push(other);
                    position += 1;
                } else {
                    self.stats.conflicts += 1;
                    return CONFLICT;
                }
            }
        }
        if config::CHECK_WATCH_INVARIANTS {
            watchlist::watch_invariants(&self.formula, &self.watches);
        }
        NO_CONFLICT
    }

    /// Find the other literal through which this clause is registered, by
    /// probing the watcher lists of the clause's literals.
    fn other_watcher(&self, clause_ix: ClauseIx, falsified: Literal) -> Option<Literal> {
        for &literal in self.formula[clause_ix].literals.iter() {
            if literal == falsified {
                continue;
            }
            if self.watches.contains(literal, clause_ix) {
                return Some(literal);
            }
        }
        None
    }

    /// Find a literal that can take over the falsified watcher: any literal
    /// of the clause, other than the two current watchers, that is
    /// unassigned or satisfies the clause.
    fn replacement_watch(
        &self,
        clause_ix: ClauseIx,
        falsified: Literal,
        other: Literal,
    ) -> Option<Literal> {
        for &literal in self.formula[clause_ix].literals.iter() {
            if literal == falsified || literal == other {
                continue;
            }
            if self.assignment.is_unassigned(literal.variable()) || self.assignment[literal] {
                return Some(literal);
            }
        }
        None
    }

    fn clause_falsified(&self, clause_ix: ClauseIx) -> bool {
        self.formula[clause_ix]
            .literals
            .iter()
            .all(|&literal| self.assignment[-literal])
    }

    /// Make the literal true, log the assignment, and mark every clause
    /// watching the literal satisfied.
    fn assign(&mut self, literal: Literal) {
        self.assignment.assign(literal);
        self.trail.record(UndoEntry::Assign(literal));
        self.stats.propagated += 1;
        for position in 0..self.watches[literal].len() {
            let clause_ix = self.watches[literal][position];
            if !self.formula[clause_ix].satisfied {
                self.satisfy_clause(clause_ix);
            }
        }
    }

    /// Raise the clause's satisfied flag and log the change.
    fn satisfy_clause(&mut self, clause_ix: ClauseIx) {
        requires!(!self.formula[clause_ix].satisfied);
        self.formula[clause_ix].satisfied = true;
        self.trail.record(UndoEntry::SatisfyClause(clause_ix));
    }

    /// Assign every variable that occurs with a single polarity among the
    /// clauses that are not yet satisfied, then mark the clauses those
    /// variables satisfy.
    ///
    /// Returns a conflict indicator for uniformity with the propagator,
    /// but pure assignments can never falsify a clause.
    fn eliminate_pure_literals(&mut self) -> MaybeConflict {
        let variable_slots = self.formula.maxvar.array_size_for_variables();
        let mut seen_positive = Array::<Variable, bool>::new(false, variable_slots);
        let mut seen_negative = Array::<Variable, bool>::new(false, variable_slots);
        for clause_ix in self.formula.clause_indices() {
            let clause = &self.formula[clause_ix];
            if clause.satisfied {
                continue;
            }
            for &literal in clause.literals.iter() {
                if !self.assignment.is_unassigned(literal.variable()) {
                    continue;
                }
                if literal.is_negative() {
                    seen_negative[literal.variable()] = true;
                } else {
                    seen_positive[literal.variable()] = true;
                }
            }
        }
        let mut pure = Array::<Variable, bool>::new(false, variable_slots);
        for variable in (1..=self.formula.maxvar.0).map(Variable::new) {
            if !self.assignment.is_unassigned(variable) {
                continue;
            }
            if seen_positive[variable] == seen_negative[variable] {
                continue;
            }
            pure[variable] = true;
            let literal = if seen_positive[variable] {
                variable.literal()
            } else {
                -variable.literal()
            };
            self.assignment.assign(literal);
            self.trail.record(UndoEntry::Assign(literal));
            self.stats.pure_literals += 1;
        }
        for clause_ix in self.formula.clause_indices() {
            if self.formula[clause_ix].satisfied {
                continue;
            }
            // A pure variable's occurrences all have the pure polarity, so
            // containing one means the clause is satisfied.
            let contains_pure = self.formula[clause_ix]
                .literals
                .iter()
                .any(|&literal| pure[literal.variable()]);
            if contains_pure {
                self.satisfy_clause(clause_ix);
            }
        }
        NO_CONFLICT
    }

    /// Mark every clause that the current assignment satisfies, and report
    /// whether the formula as a whole is decided.
    fn check_satisfaction(&mut self) -> FormulaStatus {
        let mut all_satisfied = true;
        let mut found_falsified = false;
        for clause_ix in self.formula.clause_indices() {
            if self.formula[clause_ix].satisfied {
                continue;
            }
            let mut has_true = false;
            let mut has_unassigned = false;
            for &literal in self.formula[clause_ix].literals.iter() {
                if self.assignment[literal] {
                    has_true = true;
                    break;
                }
                if self.assignment.is_unassigned(literal.variable()) {
                    has_unassigned = true;
                }
            }
            // The sweep completes even after finding a falsified clause, so
            // that every satisfiable clause gets its flag in this pass.
            if has_true {
                self.satisfy_clause(clause_ix);
            } else if !has_unassigned {
                found_falsified = true;
            } else {
                all_satisfied = false;
            }
        }
        if found_falsified {
            FormulaStatus::Falsified
        } else if all_satisfied {
            FormulaStatus::Satisfied
        } else {
            FormulaStatus::Unknown
        }
    }

    /// Branch on a literal: assign it, then mark the clauses it satisfies.
    fn decide(&mut self, literal: Literal) {
        self.stats.decisions += 1;
        self.assignment.assign(literal);
        self.trail.record(UndoEntry::Assign(literal));
        self.mark_satisfied_clauses();
    }

    fn mark_satisfied_clauses(&mut self) {
        for clause_ix in self.formula.clause_indices() {
            if self.formula[clause_ix].satisfied {
                continue;
            }
            let satisfied = self.formula[clause_ix]
                .literals
                .iter()
                .any(|&literal| self.assignment[literal]);
            if satisfied {
                self.satisfy_clause(clause_ix);
            }
        }
    }

    fn rewind(&mut self, checkpoint: Checkpoint) {
        let Solver {
            formula,
            assignment,
            watches,
            trail,
            ..
        } = self;
        trail.rewind(checkpoint, formula, assignment, watches);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_formula, Input};
    use crate::simplify::remove_subsumed;
    use quickcheck::{Arbitrary, Gen, QuickCheck};

    fn formula(text: &str) -> Formula {
        parse_formula(&mut Input::new(Box::new(text.as_bytes().iter().cloned())))
            .expect("failed to parse test formula")
    }

    fn solve(text: &str) -> (Verdict, Solver) {
        let mut formula = formula(text);
        remove_subsumed(&mut formula);
        let mut solver = Solver::new(formula, Deadline::start(60.0));
        let verdict = solver.solve();
        (verdict, solver)
    }

    #[test]
    fn trivial_satisfiable() {
        let (verdict, solver) = solve("p cnf 1 1\n1 0\n");
        assert_eq!(verdict, Verdict::Sat);
        assert!(solver.assignment()[Literal::new(1)]);
    }

    #[test]
    fn trivial_unsatisfiable() {
        let (verdict, _) = solve("p cnf 1 2\n1 0\n-1 0\n");
        assert_eq!(verdict, Verdict::Unsat);
    }

    #[test]
    fn unit_chain_propagates() {
        let (verdict, solver) = solve("p cnf 3 3\n1 0\n-1 2 0\n-2 3 0\n");
        assert_eq!(verdict, Verdict::Sat);
        assert!(solver.assignment()[Literal::new(1)]);
        assert!(solver.assignment()[Literal::new(2)]);
        assert!(solver.assignment()[Literal::new(3)]);
    }

    #[test]
    fn pure_literal_satisfies_both_clauses() {
        let (verdict, solver) = solve("p cnf 3 2\n1 2 0\n1 3 0\n");
        assert_eq!(verdict, Verdict::Sat);
        assert!(solver.assignment()[Literal::new(1)]);
    }

    #[test]
    fn pigeonhole_is_unsatisfiable() {
        // Three pigeons in two holes: each pigeon takes a hole, no two
        // pigeons share one.
        let (verdict, _) = solve(
            "p cnf 6 9\n\
             1 2 0\n3 4 0\n5 6 0\n\
             -1 -3 0\n-1 -5 0\n-3 -5 0\n\
             -2 -4 0\n-2 -6 0\n-4 -6 0\n",
        );
        assert_eq!(verdict, Verdict::Unsat);
    }

    #[test]
    fn empty_clause_is_unsatisfiable() {
        let (verdict, _) = solve("p cnf 1 1\n0\n");
        assert_eq!(verdict, Verdict::Unsat);
    }

    #[test]
    fn empty_formula_is_satisfiable() {
        let (verdict, _) = solve("p cnf 3 0\n");
        assert_eq!(verdict, Verdict::Sat);
    }

    #[test]
    fn expired_deadline_times_out() {
        let mut formula = formula("p cnf 1 1\n1 0\n");
        remove_subsumed(&mut formula);
        let mut solver = Solver::new(formula, Deadline::start(0.0));
        assert_eq!(solver.solve(), Verdict::Timeout);
    }

    #[test]
    fn verdicts_are_deterministic() {
        let text = "p cnf 4 5\n1 2 0\n-1 3 0\n-3 -4 0\n2 4 0\n-2 3 4 0\n";
        let (first_verdict, first_solver) = solve(text);
        let (second_verdict, second_solver) = solve(text);
        assert_eq!(first_verdict, second_verdict);
        assert_eq!(first_solver.assignment(), second_solver.assignment());
    }

    fn watch_sets(solver: &Solver) -> Vec<Vec<ClauseIx>> {
        Literal::all(solver.formula.maxvar)
            .map(|literal| {
                let mut list: Vec<ClauseIx> =
                    solver.watches[literal].iter().cloned().collect();
                list.sort_unstable();
                list
            })
            .collect()
    }

    #[test]
    fn rewind_restores_the_initial_state() {
        let mut formula = formula("p cnf 4 4\n1 0\n-1 2 3 0\n-2 -3 0\n-3 4 0\n");
        remove_subsumed(&mut formula);
        let mut solver = Solver::new(formula, Deadline::start(60.0));
        let formula_before = solver.formula.clone();
        let assignment_before = solver.assignment.clone();
        let watch_sets_before = watch_sets(&solver);

        let checkpoint = solver.trail.checkpoint();
        assert_eq!(solver.propagate(), NO_CONFLICT);
        assert_eq!(solver.eliminate_pure_literals(), NO_CONFLICT);
        solver.decide(Literal::new(-2));
        assert!(solver.trail.len() > 0);

        solver.rewind(checkpoint);
        assert_eq!(solver.trail.len(), 0);
        assert_eq!(solver.formula, formula_before);
        assert_eq!(solver.assignment, assignment_before);
        assert_eq!(watch_sets(&solver), watch_sets_before);
    }

    #[test]
    fn propagation_relocates_watchers() {
        // Assigning 1 falsifies the second clause's watcher on -1, which
        // must move to the unassigned literal 3.
        let mut solver = Solver::new(formula("p cnf 3 2\n1 0\n-1 2 3 0\n"), Deadline::start(60.0));
        assert_eq!(solver.propagate(), NO_CONFLICT);
        let moved = ClauseIx::new(1);
        assert!(!solver.watches.contains(Literal::new(-1), moved));
        assert!(solver.watches.contains(Literal::new(2), moved));
        assert!(solver.watches.contains(Literal::new(3), moved));
    }

    #[test]
    fn propagation_detects_conflicts() {
        let mut solver = Solver::new(formula("p cnf 1 2\n1 0\n-1 0\n"), Deadline::start(60.0));
        assert_eq!(solver.propagate(), CONFLICT);
    }

    #[derive(Debug, Clone)]
    struct SmallFormula(Formula);

    impl Arbitrary for SmallFormula {
        fn arbitrary<G: Gen>(g: &mut G) -> SmallFormula {
            const MAX_VARS: u32 = 6;
            const MAX_CLAUSES: u32 = 10;
            let num_vars = g.next_u32() % MAX_VARS + 1;
            let num_clauses = g.next_u32() % (MAX_CLAUSES + 1);
            let mut clauses = Vector::new();
            for _ in 0..num_clauses {
                let size = g.next_u32() % 3 + 1;
                let mut literals: Vector<Literal> = Vector::new();
                for _ in 0..size {
                    let variable = g.next_u32() % num_vars + 1;
                    let negated = g.next_u32() % 2 == 1;
                    let literal =
                        Literal::new(if negated { -(variable as i32) } else { variable as i32 });
                    // One literal per variable keeps the clause free of
                    // duplicates and tautologies.
                    if literals
                        .iter()
                        .all(|&seen| seen.variable() != literal.variable())
                    {
                        literals.push(literal);
                    }
                }
                clauses.push(crate::formula::Clause::new(literals));
            }
            SmallFormula(Formula {
                maxvar: Variable::new(num_vars),
                clauses,
            })
        }
    }

    /// Truth-table decision procedure for cross-checking.
    fn brute_force_satisfiable(formula: &Formula) -> bool {
        let num_vars = formula.maxvar.0;
        (0..1u32 << num_vars).any(|candidate| {
            formula.clauses.iter().all(|clause| {
                clause.literals.iter().any(|&literal| {
                    let positive = candidate >> (literal.variable().0 - 1) & 1 == 1;
                    positive != literal.is_negative()
                })
            })
        })
    }

    #[test]
    fn matches_brute_force_on_random_formulas() {
        fn property(input: SmallFormula) -> bool {
            let SmallFormula(original) = input;
            let mut preprocessed = original.clone();
            remove_subsumed(&mut preprocessed);
            let mut solver = Solver::new(preprocessed, Deadline::start(60.0));
            match solver.solve() {
                Verdict::Sat => {
                    brute_force_satisfiable(&original)
                        && original.clauses.iter().all(|clause| {
                            clause
                                .literals
                                .iter()
                                .any(|&literal| solver.assignment()[literal])
                        })
                }
                Verdict::Unsat => !brute_force_satisfiable(&original),
                Verdict::Timeout => false,
            }
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(property as fn(SmallFormula) -> bool);
    }
}
