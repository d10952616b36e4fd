use std::collections::BTreeMap;

use log::{debug, trace, warn};

use crate::error::SolveError;
use crate::problem::LpProblem;
use crate::solution::{Analysis, ReducedCost, ShadowPrice, Solution};
use crate::tableau::Tableau;

/// Slack values within this distance of zero count as binding
const BINDING_TOLERANCE: f64 = 1e-9;

/// Receives the tableau at the start of every iteration, before the optimality test
pub trait SolveObserver {
    fn on_iteration(&mut self, iteration: usize, tableau: &Tableau);
}

impl<F> SolveObserver for F
where
    F: FnMut(usize, &Tableau),
{
    fn on_iteration(&mut self, iteration: usize, tableau: &Tableau) {
        self(iteration, tableau)
    }
}

/// Tableau Simplex solver for `<=`-constrained linear programs.
///
/// Pivoting follows Dantzig's rule: the most negative objective-row entry
/// enters, the minimum ratio leaves, and ties go to the lowest index on
/// both sides. There is no anti-cycling rule; the iteration cap turns a
/// cycling degenerate problem into [`SolveError::IterationLimitExceeded`].
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots before giving up
    max_iterations: usize,
    /// Tolerance for the optimality and ratio tests
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 0.0,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Entries above `-tol` count as non-negative in the optimality test and
    /// entries at or below `tol` are skipped by the ratio test.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol.abs();
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solve the LP problem with the primal Simplex method
    pub fn solve(&self, problem: &LpProblem) -> Result<Solution, SolveError> {
        self.solve_observed(problem, &mut |_: usize, _: &Tableau| {})
    }

    /// Like [`Solver::solve`], reporting every intermediate tableau to `observer`
    pub fn solve_observed<O>(
        &self,
        problem: &LpProblem,
        observer: &mut O,
    ) -> Result<Solution, SolveError>
    where
        O: SolveObserver + ?Sized,
    {
        validate(problem)?;

        let mut tableau = Tableau::new(problem);
        debug!(
            "Solving {} variables, {} constraints ({:?})",
            problem.num_variables(),
            problem.num_constraints(),
            problem.direction
        );

        let iterations = self.iterate(&mut tableau, observer)?;
        debug!("Optimal after {} pivots", iterations);

        Ok(self.extract_solution(&tableau, problem, iterations))
    }

    /// Pivots until optimal; returns the number of pivots performed
    fn iterate<O>(&self, tableau: &mut Tableau, observer: &mut O) -> Result<usize, SolveError>
    where
        O: SolveObserver + ?Sized,
    {
        let mut pivots = 0;

        loop {
            observer.on_iteration(pivots + 1, tableau);
            trace!("Iteration {}\n{}", pivots + 1, tableau);

            let (col, min_val) = tableau.entering_column();
            if min_val >= -self.tolerance {
                return Ok(pivots);
            }

            if pivots >= self.max_iterations {
                warn!(
                    "Stopping after {} pivots without reaching optimality",
                    self.max_iterations
                );
                return Err(SolveError::IterationLimitExceeded {
                    iterations: self.max_iterations,
                });
            }

            let Some(row) = tableau.leaving_row(col, self.tolerance) else {
                let variable = tableau.column_names()[col].clone();
                debug!("No row bounds {}; problem is unbounded", variable);
                return Err(SolveError::Unbounded { variable });
            };

            debug!(
                "Pivot {}: {} enters, {} leaves (row {}, col {})",
                pivots + 1,
                tableau.column_names()[col],
                tableau.basic_vars()[row],
                row,
                col
            );
            tableau.pivot(row, col);
            pivots += 1;
        }
    }

    fn extract_solution(&self, tableau: &Tableau, problem: &LpProblem, iterations: usize) -> Solution {
        let minimize = problem.direction.is_minimize();

        // Nonbasic variables are zero
        let mut values: BTreeMap<String, f64> = tableau
            .column_names()
            .iter()
            .map(|name| (name.clone(), 0.0))
            .collect();
        for (i, name) in tableau.basic_vars().iter().enumerate() {
            values.insert(name.clone(), tableau.rhs(i));
        }

        let raw = tableau.rhs(tableau.num_constraints());
        let objective_value = if minimize { -raw } else { raw };

        let analysis = self.analyze(tableau, &values, minimize);

        Solution {
            values,
            objective_value,
            iterations,
            basic_vars: tableau.basic_vars().to_vec(),
            analysis,
        }
    }

    fn analyze(&self, tableau: &Tableau, values: &BTreeMap<String, f64>, minimize: bool) -> Analysis {
        let n_vars = tableau.num_variables();
        let names = tableau.column_names();
        let obj_row = tableau.objective_row();

        // Objective-row slack entries are the duals of the maximization form
        let shadow_prices: Vec<ShadowPrice> = (0..tableau.num_constraints())
            .map(|i| {
                let dual = obj_row[n_vars + i];
                ShadowPrice {
                    constraint: names[n_vars + i].clone(),
                    value: if minimize { -dual } else { dual },
                }
            })
            .collect();

        let reduced_costs = (0..n_vars)
            .map(|j| {
                let is_basic = tableau.basic_cols().contains(&j);
                ReducedCost {
                    variable: names[j].clone(),
                    value: values[&names[j]],
                    reduced_cost: if is_basic { 0.0 } else { obj_row[j] },
                    is_basic,
                }
            })
            .collect();

        let binding_constraints = names[n_vars..]
            .iter()
            .filter(|name| values[*name].abs() <= BINDING_TOLERANCE)
            .cloned()
            .collect();

        Analysis {
            shadow_prices,
            reduced_costs,
            binding_constraints,
        }
    }
}

/// Checks dimensions, finiteness and feasibility of the slack basis
fn validate(problem: &LpProblem) -> Result<(), SolveError> {
    let n_vars = problem.num_variables();
    let n_constraints = problem.num_constraints();

    if n_vars == 0 || n_constraints == 0 {
        return Err(SolveError::EmptyProblem {
            variables: n_vars,
            constraints: n_constraints,
        });
    }

    if problem.objective.iter().any(|c| !c.is_finite()) {
        return Err(SolveError::NonFinite {
            what: "objective".to_string(),
        });
    }

    for (i, c) in problem.constraints.iter().enumerate() {
        if c.coefficients.len() != n_vars {
            return Err(SolveError::InvalidDimensions {
                row: i,
                expected: n_vars,
                found: c.coefficients.len(),
            });
        }
        if c.coefficients.iter().any(|a| !a.is_finite()) || !c.rhs.is_finite() {
            return Err(SolveError::NonFinite {
                what: format!("constraint row {}", i),
            });
        }
        if c.rhs < 0.0 {
            return Err(SolveError::InfeasibleStart { row: i, rhs: c.rhs });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Direction, LpProblem};

    const EPS: f64 = 1e-9;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn textbook(direction: Direction, objective: Vec<f64>) -> LpProblem {
        LpProblem::new(objective, direction)
            .with_constraint(vec![1.0, 0.0], 4.0)
            .with_constraint(vec![0.0, 2.0], 12.0)
            .with_constraint(vec![3.0, 2.0], 18.0)
    }

    fn assert_close(actual: f64, expected: f64, what: &str) {
        assert!(
            (actual - expected).abs() < EPS,
            "{} = {} (expected {})",
            what,
            actual,
            expected
        );
    }

    fn assert_feasible(problem: &LpProblem, solution: &Solution) {
        let x = solution.decision_values();
        assert_eq!(x.len(), problem.num_variables());
        for (j, &v) in x.iter().enumerate() {
            assert!(v >= -EPS, "x{} = {} is negative", j + 1, v);
        }
        for (i, c) in problem.constraints.iter().enumerate() {
            let lhs = solution.evaluate(&c.coefficients);
            assert!(lhs <= c.rhs + EPS, "constraint {} violated: {} > {}", i, lhs, c.rhs);
        }
    }

    #[test]
    fn test_textbook_maximization() {
        // Maximize: 3x1 + 5x2
        // Subject to:
        //   x1 <= 4
        //   2x2 <= 12
        //   3x1 + 2x2 <= 18
        // Optimal: x1=2, x2=6, obj=36
        init_logger();
        let problem = textbook(Direction::Maximize, vec![3.0, 5.0]);
        let solution = Solver::new().solve(&problem).unwrap();

        assert_close(solution.value("x1").unwrap(), 2.0, "x1");
        assert_close(solution.value("x2").unwrap(), 6.0, "x2");
        assert_close(solution.value("s1").unwrap(), 2.0, "s1");
        assert_close(solution.value("s2").unwrap(), 0.0, "s2");
        assert_close(solution.value("s3").unwrap(), 0.0, "s3");
        assert_close(solution.objective_value, 36.0, "obj");
        assert_eq!(solution.iterations, 2);
        assert_eq!(solution.basic_vars, vec!["s1", "x2", "x1"]);
        assert_feasible(&problem, &solution);
    }

    #[test]
    fn test_minimization_stays_at_origin() {
        // Minimize 2x1 + 3x2 with x1 + x2 <= 4: nothing pushes away from zero
        let problem = LpProblem::new(vec![2.0, 3.0], Direction::Minimize)
            .with_constraint(vec![1.0, 1.0], 4.0);
        let solution = Solver::new().solve(&problem).unwrap();

        assert_close(solution.value("x1").unwrap(), 0.0, "x1");
        assert_close(solution.value("x2").unwrap(), 0.0, "x2");
        assert_close(solution.value("s1").unwrap(), 4.0, "s1");
        assert_close(solution.objective_value, 0.0, "obj");
        assert_eq!(solution.iterations, 0);
    }

    #[test]
    fn test_minimization_with_negative_costs() {
        // Minimize: -x1 - 2x2
        // Subject to:
        //   x1 + x2 <= 4
        //   x1 <= 2
        //   x2 <= 3
        // Optimal: x1=1, x2=3, obj=-7
        let problem = LpProblem::new(vec![-1.0, -2.0], Direction::Minimize)
            .with_constraint(vec![1.0, 1.0], 4.0)
            .with_constraint(vec![1.0, 0.0], 2.0)
            .with_constraint(vec![0.0, 1.0], 3.0);
        let solution = Solver::new().solve(&problem).unwrap();

        assert_eq!(solution.decision_values().len(), 2);
        assert_close(solution.value("x1").unwrap(), 1.0, "x1");
        assert_close(solution.value("x2").unwrap(), 3.0, "x2");
        assert_close(solution.objective_value, -7.0, "obj");
        assert_feasible(&problem, &solution);
    }

    #[test]
    fn test_direction_symmetry() {
        let max = Solver::new()
            .solve(&textbook(Direction::Maximize, vec![3.0, 5.0]))
            .unwrap();
        let min = Solver::new()
            .solve(&textbook(Direction::Minimize, vec![-3.0, -5.0]))
            .unwrap();

        assert_eq!(max.values, min.values);
        assert_close(max.objective_value, -min.objective_value, "obj");
    }

    #[test]
    fn test_three_variables() {
        // Maximize: 3x1 + x2 + 2x3, optimum 28
        let problem = LpProblem::new(vec![3.0, 1.0, 2.0], Direction::Maximize)
            .with_constraint(vec![1.0, 1.0, 3.0], 30.0)
            .with_constraint(vec![2.0, 2.0, 5.0], 24.0)
            .with_constraint(vec![4.0, 1.0, 2.0], 36.0);
        let solution = Solver::new().solve(&problem).unwrap();

        assert_close(solution.objective_value, 28.0, "obj");
        assert_close(solution.evaluate(&problem.objective), 28.0, "c·x");
        assert_feasible(&problem, &solution);

        // No single pivot can improve an optimal tableau
        for rc in &solution.analysis.reduced_costs {
            assert!(rc.reduced_cost >= -EPS, "{} has reduced cost {}", rc.variable, rc.reduced_cost);
        }
        for sp in &solution.analysis.shadow_prices {
            assert!(sp.value >= -EPS, "{} has shadow price {}", sp.constraint, sp.value);
        }
    }

    #[test]
    fn test_analysis_of_textbook_problem() {
        let problem = textbook(Direction::Maximize, vec![3.0, 5.0]);
        let analysis = Solver::new().solve(&problem).unwrap().analysis;

        let prices: Vec<f64> = analysis.shadow_prices.iter().map(|sp| sp.value).collect();
        assert_close(prices[0], 0.0, "y1");
        assert_close(prices[1], 1.5, "y2");
        assert_close(prices[2], 1.0, "y3");
        assert_eq!(analysis.binding_constraints, vec!["s2", "s3"]);
        assert!(analysis.reduced_costs.iter().all(|rc| rc.is_basic));
    }

    #[test]
    fn test_shadow_price_sign_for_minimization() {
        // Minimize -x1 subject to x1 <= 5: relaxing the bound lowers the optimum
        let problem = LpProblem::new(vec![-1.0, 1.0], Direction::Minimize)
            .with_constraint(vec![1.0, 0.0], 5.0);
        let solution = Solver::new().solve(&problem).unwrap();

        assert_close(solution.objective_value, -5.0, "obj");
        assert_close(solution.analysis.shadow_prices[0].value, -1.0, "y1");

        let x2 = &solution.analysis.reduced_costs[1];
        assert!(!x2.is_basic);
        assert_close(x2.reduced_cost, 1.0, "d2");
    }

    #[test]
    fn test_unbounded() {
        // x2 appears in no constraint
        let problem = LpProblem::new(vec![1.0, 1.0], Direction::Maximize)
            .with_constraint(vec![1.0, 0.0], 3.0);
        let err = Solver::new().solve(&problem).unwrap_err();

        assert_eq!(
            err,
            SolveError::Unbounded {
                variable: "x2".to_string()
            }
        );
    }

    #[test]
    fn test_unbounded_through_negative_column() {
        // x1 - x2 <= 1 lets both grow together
        let problem = LpProblem::new(vec![1.0, 1.0], Direction::Maximize)
            .with_constraint(vec![1.0, -1.0], 1.0);

        assert!(matches!(
            Solver::new().solve(&problem),
            Err(SolveError::Unbounded { .. })
        ));
    }

    #[test]
    fn test_iteration_limit() {
        let problem = textbook(Direction::Maximize, vec![3.0, 5.0]);

        let err = Solver::new().with_max_iterations(1).solve(&problem).unwrap_err();
        assert_eq!(err, SolveError::IterationLimitExceeded { iterations: 1 });

        // Exactly enough pivots is fine
        assert!(Solver::new().with_max_iterations(2).solve(&problem).is_ok());
    }

    #[test]
    fn test_iteration_limit_stops_cycling() {
        // Beale's example: the most-negative-entry rule cycles through degenerate bases
        let problem = LpProblem::new(vec![0.75, -150.0, 0.02, -6.0], Direction::Maximize)
            .with_constraint(vec![0.25, -60.0, -0.04, 9.0], 0.0)
            .with_constraint(vec![0.5, -90.0, -0.02, 3.0], 0.0)
            .with_constraint(vec![0.0, 0.0, 1.0, 0.0], 1.0);

        let err = Solver::new().with_max_iterations(200).solve(&problem).unwrap_err();
        assert_eq!(err, SolveError::IterationLimitExceeded { iterations: 200 });
    }

    #[test]
    fn test_observer_sees_every_iteration() {
        let problem = textbook(Direction::Maximize, vec![3.0, 5.0]);
        let mut seen = Vec::new();

        Solver::new()
            .solve_observed(&problem, &mut |iteration: usize, tableau: &Tableau| {
                seen.push((iteration, tableau.rhs(tableau.num_constraints())));
            })
            .unwrap();

        assert_eq!(seen.len(), 3);
        assert_eq!(seen.iter().map(|s| s.0).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_close(seen[0].1, 0.0, "z0");
        assert_close(seen[1].1, 30.0, "z1");
        assert_close(seen[2].1, 36.0, "z2");
    }

    #[test]
    fn test_negative_rhs_rejected() {
        let problem = LpProblem::new(vec![1.0], Direction::Maximize)
            .with_constraint(vec![1.0], 4.0)
            .with_constraint(vec![-1.0], -1.0);

        assert_eq!(
            Solver::new().solve(&problem).unwrap_err(),
            SolveError::InfeasibleStart { row: 1, rhs: -1.0 }
        );
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let problem = LpProblem::new(vec![1.0, 2.0], Direction::Maximize)
            .with_constraint(vec![1.0, 1.0], 4.0)
            .with_constraint(vec![1.0], 4.0);

        assert_eq!(
            Solver::new().solve(&problem).unwrap_err(),
            SolveError::InvalidDimensions {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_empty_problem_rejected() {
        let problem = LpProblem::new(vec![1.0], Direction::Maximize);

        assert_eq!(
            Solver::new().solve(&problem).unwrap_err(),
            SolveError::EmptyProblem {
                variables: 1,
                constraints: 0
            }
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let problem = LpProblem::new(vec![f64::NAN], Direction::Maximize)
            .with_constraint(vec![1.0], 1.0);

        assert!(matches!(
            Solver::new().solve(&problem),
            Err(SolveError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_degenerate_vertex() {
        // Two constraints meet x1 = 0 at the start; the first pivot is degenerate
        let problem = LpProblem::new(vec![1.0, 1.0], Direction::Maximize)
            .with_constraint(vec![1.0, -1.0], 0.0)
            .with_constraint(vec![0.0, 1.0], 3.0);
        let solution = Solver::new().solve(&problem).unwrap();

        assert_close(solution.value("x1").unwrap(), 3.0, "x1");
        assert_close(solution.value("x2").unwrap(), 3.0, "x2");
        assert_close(solution.objective_value, 6.0, "obj");
        assert_feasible(&problem, &solution);
    }
}
