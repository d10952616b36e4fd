use thiserror::Error;

/// Reasons a problem could not be solved
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Problem needs at least one variable and one constraint (got {variables} variables, {constraints} constraints)")]
    EmptyProblem { variables: usize, constraints: usize },

    #[error("Constraint {row} has {found} coefficients, expected {expected}")]
    InvalidDimensions {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Right-hand side has {found} entries, expected {expected}")]
    RhsLength { expected: usize, found: usize },

    #[error("Non-finite value in {what}")]
    NonFinite { what: String },

    #[error("Constraint {row} has negative right-hand side {rhs}; the slack basis is not feasible")]
    InfeasibleStart { row: usize, rhs: f64 },

    #[error("Problem is unbounded: variable {variable} can increase without limit")]
    Unbounded { variable: String },

    #[error("Iteration limit of {iterations} exceeded (possible cycling)")]
    IterationLimitExceeded { iterations: usize },
}
