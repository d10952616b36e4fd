use std::path::Path;

use tableau_solver::{Direction, LpProblem};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error("Constraint '{0}' must look like 'a1,a2,...<=b'")]
    MissingOperator(String),

    #[error("Constraint '{constraint}' has {found} coefficients, expected {expected}")]
    Arity {
        constraint: String,
        expected: usize,
        found: usize,
    },

    #[error("At least one constraint is required")]
    NoConstraints,

    #[error("At least one objective coefficient is required")]
    NoVariables,

    #[error("Error reading file: {0}")]
    Io(String),

    #[error("Invalid problem file: {0}")]
    Json(String),
}

/// Parses a finite number; `inf` and `NaN` are rejected
pub fn parse_number(text: &str) -> Result<f64, InputError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(InputError::InvalidNumber(trimmed.to_string())),
    }
}

/// Parses `"a1,a2,...<=b"` into its coefficients and right-hand side
pub fn parse_constraint(text: &str, n_vars: usize) -> Result<(Vec<f64>, f64), InputError> {
    let (lhs, rhs) = text
        .split_once("<=")
        .ok_or_else(|| InputError::MissingOperator(text.to_string()))?;

    let coefficients = lhs
        .split(',')
        .map(parse_number)
        .collect::<Result<Vec<_>, _>>()?;
    if coefficients.len() != n_vars {
        return Err(InputError::Arity {
            constraint: text.to_string(),
            expected: n_vars,
            found: coefficients.len(),
        });
    }

    Ok((coefficients, parse_number(rhs)?))
}

pub fn build_problem(
    objective: Vec<f64>,
    constraints: &[String],
    direction: Direction,
) -> Result<LpProblem, InputError> {
    if objective.is_empty() {
        return Err(InputError::NoVariables);
    }
    if constraints.is_empty() {
        return Err(InputError::NoConstraints);
    }

    let n_vars = objective.len();
    let mut problem = LpProblem::new(objective, direction);
    for text in constraints {
        let (coefficients, rhs) = parse_constraint(text, n_vars)?;
        problem.add_constraint(coefficients, rhs);
    }
    Ok(problem)
}

/// Reads a problem stored as JSON
pub fn load_problem(path: impl AsRef<Path>) -> Result<LpProblem, InputError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .map_err(|e| InputError::Io(format!("{}: {}", path.display(), e)))?;
    let problem: LpProblem = serde_json::from_str(&source)
        .map_err(|e| InputError::Json(format!("{}: {}", path.display(), e)))?;

    if problem.objective.is_empty() {
        return Err(InputError::NoVariables);
    }
    if problem.constraints.is_empty() {
        return Err(InputError::NoConstraints);
    }
    Ok(problem)
}
