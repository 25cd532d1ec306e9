//! The DPLL (Davis-Putnam-Logemann-Loveland) search.
//!
//! The solver works directly on immutable formulas. Every step takes the
//! clauses that are still open together with the environment built so far and
//! does one of four things:
//!
//! 1.  **Success:** no clauses are left, so the environment is a model.
//! 2.  **Conflict:** some clause is empty, so this state is dead and the
//!     search falls back to the most recent untried alternative.
//! 3.  **Unit propagation:** the shortest clause has a single literal, which
//!     is forced. The literal is bound and substituted, with no alternative.
//! 4.  **Decision:** otherwise a literal of the shortest clause is tried as
//!     true, and if that fails, as false.
//!
//! Substituting a literal produces a new formula in which satisfied clauses
//! are gone and the negated literal has been removed from the rest. Because
//! formulas and environments are persistent, backtracking is just dropping a
//! state; nothing needs undoing.
//!
//! The search keeps its pending states on an explicit stack instead of the
//! call stack. Its depth grows with the number of variables, which for large
//! Sudokus runs into the thousands.

use crate::sat::assignment::Environment;
use crate::sat::clause::Clause;
use crate::sat::cnf::Formula;
use crate::sat::literal::Literal;
use crate::sat::solver::{SolutionStats, Solver};
use log::{debug, trace};

/// Solves `formula`, returning a satisfying environment or `None` when the
/// formula is unsatisfiable.
///
/// Variables that the search never had to bind stay unassigned in the result;
/// any value for them satisfies the formula.
#[must_use]
pub fn solve(formula: &Formula) -> Option<Environment> {
    Dpll::new(formula.clone()).solve()
}

/// One pending search state.
#[derive(Debug, Clone)]
struct Frame {
    clauses: Formula,
    env: Environment,
    /// Literal to set before the state is examined. `None` only for the root.
    assume: Option<Literal>,
    depth: usize,
}

/// A DPLL solver over a single formula.
#[derive(Debug, Clone)]
pub struct Dpll {
    /// The formula being solved, as handed in.
    pub formula: Formula,
    stats: SolutionStats,
}

impl Solver for Dpll {
    fn new(formula: Formula) -> Self {
        Self {
            formula,
            stats: SolutionStats::default(),
        }
    }

    /// Runs the search to completion.
    ///
    /// Alternatives are pushed below the branch being explored, so the stack
    /// is popped in exactly the order a recursive implementation would visit
    /// the same states: `l = true` first, then `l = false`.
    fn solve(&mut self) -> Option<Environment> {
        self.stats = SolutionStats::default();
        debug!(
            "solving {} clauses over {} variables",
            self.formula.len(),
            self.formula.variables().len()
        );

        let mut stack = vec![Frame {
            clauses: self.formula.clone(),
            env: Environment::new(),
            assume: None,
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            let Frame {
                mut clauses,
                mut env,
                assume,
                depth,
            } = frame;

            if let Some(lit) = assume {
                clauses = clauses.substitute(lit);
                env = env.assign(lit);
            }
            self.stats.max_depth = self.stats.max_depth.max(depth);

            if clauses.is_empty() {
                debug!("satisfiable ({})", self.stats);
                return Some(env);
            }

            if clauses.has_empty_clause() {
                self.stats.conflicts += 1;
                trace!("conflict at depth {depth}");
                continue;
            }

            let Some((lit, forced)) = smallest_clause(&clauses)
                .and_then(|clause| Some((clause.choose_literal()?, clause.is_unit())))
            else {
                // only the empty clause has no literal, and that was handled above
                continue;
            };

            if forced {
                self.stats.propagations += 1;
                stack.push(Frame {
                    clauses,
                    env,
                    assume: Some(lit),
                    depth: depth + 1,
                });
            } else {
                self.stats.decisions += 1;
                trace!("decide {lit} at depth {depth}");
                stack.push(Frame {
                    clauses: clauses.clone(),
                    env: env.clone(),
                    assume: Some(lit.negated()),
                    depth: depth + 1,
                });
                stack.push(Frame {
                    clauses,
                    env,
                    assume: Some(lit),
                    depth: depth + 1,
                });
            }
        }

        debug!("unsatisfiable ({})", self.stats);
        None
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

/// The first clause of minimal length. Stops at the first unit clause, since
/// nothing shorter can follow once empty clauses have been ruled out.
fn smallest_clause(clauses: &Formula) -> Option<&Clause> {
    let mut smallest: Option<&Clause> = None;
    for clause in clauses.iter() {
        if smallest.is_none_or(|best| clause.len() < best.len()) {
            smallest = Some(clause);
            if clause.is_unit() {
                break;
            }
        }
    }
    smallest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::variable::Variable;

    fn lit(name: &str) -> Literal {
        Literal::named(name)
    }

    fn assert_model(formula: &Formula, env: &Environment) {
        assert!(
            formula.is_satisfied_by(env),
            "{env} does not satisfy {formula}"
        );
    }

    /// Whether any total assignment over the formula's variables satisfies it.
    fn brute_force(formula: &Formula) -> bool {
        let vars = formula.variables();
        (0..1u64 << vars.len()).any(|bits| {
            let env: Environment = vars
                .iter()
                .enumerate()
                .map(|(i, &var)| (var, bits & (1 << i) != 0))
                .collect();
            formula.is_satisfied_by(&env)
        })
    }

    fn random_formula(
        rng: &mut fastrand::Rng,
        prefix: &str,
        vars: usize,
        clauses: usize,
    ) -> Formula {
        let pool: Vec<Variable> = (0..vars)
            .map(|i| Variable::new(&format!("{prefix}_{i}")))
            .collect();
        (0..clauses)
            .map(|_| {
                let width = rng.usize(1..=3);
                (0..width)
                    .map(|_| Literal::new(pool[rng.usize(..vars)], rng.bool()))
                    .collect::<Clause>()
            })
            .collect()
    }

    #[test]
    fn test_empty_formula_is_sat() {
        let env = solve(&Formula::new()).unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn test_empty_clause_is_unsat() {
        assert!(solve(&Formula::contradiction()).is_none());
        let f = Formula::from_clause(Clause::singleton(lit("dpll_ec"))).add_clause(Clause::new());
        assert!(solve(&f).is_none());
    }

    #[test]
    fn test_unit_and_negation_is_unsat() {
        let a = lit("dpll_un_a");
        let f = Formula::from(vec![Clause::singleton(a), Clause::singleton(!a)]);
        assert!(solve(&f).is_none());
    }

    #[test]
    fn test_scenario_one() {
        // (a | ~b) & (a | b)
        let (a, b) = (lit("dpll_s1_a"), lit("dpll_s1_b"));
        let f = Formula::from(vec![Clause::from(vec![a, !b]), Clause::from(vec![a, b])]);
        let env = solve(&f).unwrap();
        assert_eq!(env.var_value(a.variable()), Some(true));
        assert_model(&f, &env);
    }

    #[test]
    fn test_scenario_two() {
        // (a) & (b) & (~b | c)
        let (a, b, c) = (lit("dpll_s2_a"), lit("dpll_s2_b"), lit("dpll_s2_c"));
        let not_b = Formula::from_clause(Clause::singleton(!b));
        let only_c = Formula::from_clause(Clause::singleton(c));
        let f = Formula::from(vec![Clause::singleton(a), Clause::singleton(b)])
            .and(&not_b.or(&only_c));
        let env = solve(&f).unwrap();
        for x in [a, b, c] {
            assert_eq!(env.var_value(x.variable()), Some(true));
        }
    }

    #[test]
    fn test_scenario_three() {
        // (a) & (b) & (a) & (~b)
        let (a, b) = (lit("dpll_s3_a"), lit("dpll_s3_b"));
        let f = Formula::from(vec![Clause::singleton(a), Clause::singleton(b)])
            .and(&Formula::from(vec![Clause::singleton(a), Clause::singleton(!b)]));
        assert!(solve(&f).is_none());
    }

    #[test]
    fn test_tautology_does_not_block_solution() {
        let (a, b) = (lit("dpll_t_a"), lit("dpll_t_b"));
        let f = Formula::from(vec![Clause::from(vec![a, !a]), Clause::from(vec![!b])]);
        let env = solve(&f).unwrap();
        assert_eq!(env.var_value(b.variable()), Some(false));
        assert_model(&f, &env);
    }

    #[test]
    fn test_branches_do_not_leak_bindings() {
        // a = true leads to a conflict through the unit chain a -> b -> ~b,
        // so the model must come from the a = false branch with b free of
        // anything the first branch bound.
        let (a, b, c) = (lit("dpll_leak_a"), lit("dpll_leak_b"), lit("dpll_leak_c"));
        let f = Formula::from(vec![
            Clause::from(vec![a, c]),
            Clause::from(vec![!a, b]),
            Clause::from(vec![!a, !b]),
        ]);
        let env = solve(&f).unwrap();
        assert_model(&f, &env);
        assert_ne!(env.var_value(a.variable()), Some(true));
    }

    #[test]
    fn test_stats_are_counted() {
        let (a, b, c) = (lit("dpll_st_a"), lit("dpll_st_b"), lit("dpll_st_c"));
        let f = Formula::from(vec![
            Clause::singleton(a),
            Clause::from(vec![!a, b]),
            Clause::from(vec![b, c]),
        ]);
        let mut solver = Dpll::new(f.clone());
        let env = solver.solve().unwrap();
        assert_model(&f, &env);

        let stats = solver.stats();
        assert_eq!(stats.propagations, 2);
        assert_eq!(stats.decisions, 0);
        assert_eq!(stats.conflicts, 0);
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn test_pigeonhole_three_into_two_is_unsat() {
        // p_i_j: pigeon i sits in hole j
        let p = |i: usize, j: usize| lit(&format!("dpll_php_{i}_{j}"));
        let mut f = Formula::new();
        for i in 0..3 {
            f = f.add_clause(Clause::from(vec![p(i, 0), p(i, 1)]));
        }
        for j in 0..2 {
            for i in 0..3 {
                for k in i + 1..3 {
                    f = f.add_clause(Clause::from(vec![!p(i, j), !p(k, j)]));
                }
            }
        }
        let mut solver = Dpll::new(f);
        assert!(solver.solve().is_none());
        assert!(solver.stats().conflicts > 0);
    }

    #[test]
    fn test_random_formulas_match_brute_force() {
        let mut rng = fastrand::Rng::with_seed(0x5a7_d911);
        for round in 0..300 {
            let vars = rng.usize(1..=6);
            let clauses = rng.usize(0..=14);
            let f = random_formula(&mut rng, &format!("dpll_rand{round}"), vars, clauses);

            match solve(&f) {
                Some(env) => assert_model(&f, &env),
                None => assert!(!brute_force(&f), "missed a model for {f}"),
            }
        }
    }

    #[test]
    fn test_negated_formula_models_falsify_original() {
        let mut rng = fastrand::Rng::with_seed(42);
        for round in 0..50 {
            let f = random_formula(&mut rng, &format!("dpll_neg{round}"), 4, 3);
            let negated = f.not();
            match solve(&negated) {
                Some(env) => {
                    assert_model(&negated, &env);
                    // complete the model so the original can be evaluated
                    let total: Environment = f
                        .variables()
                        .into_iter()
                        .map(|var| (var, env.var_value(var).unwrap_or(false)))
                        .collect();
                    assert!(!f.is_satisfied_by(&total));
                }
                None => assert!(!brute_force(&negated)),
            }
        }
    }
}
