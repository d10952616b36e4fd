mod error;
mod problem;
mod simplex;
mod solution;
mod tableau;

pub use error::SolveError;
pub use problem::{Constraint, Direction, LpProblem};
pub use simplex::{SolveObserver, Solver};
pub use solution::{Analysis, ReducedCost, ShadowPrice, Solution};
pub use tableau::Tableau;

/// Solves `optimize c·x` subject to `a·x <= b`, `x >= 0` with the default [`Solver`]
pub fn solve(
    c: Vec<f64>,
    a: Vec<Vec<f64>>,
    b: Vec<f64>,
    direction: Direction,
) -> Result<Solution, SolveError> {
    let problem = LpProblem::from_parts(c, a, b, direction)?;
    Solver::new().solve(&problem)
}
