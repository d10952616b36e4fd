#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SolveError;

/// A linear program with `<=` constraints and non-negative variables
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LpProblem {
    /// Objective function coefficients, one per decision variable
    pub objective: Vec<f64>,
    /// Whether to maximize or minimize the objective
    pub direction: Direction,
    /// Constraints of the form `coefficients · x <= rhs`
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constraint {
    /// Coefficients for each decision variable
    pub coefficients: Vec<f64>,
    /// Right-hand side value
    pub rhs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    #[cfg_attr(feature = "serde", serde(rename = "max"))]
    Maximize,
    #[cfg_attr(feature = "serde", serde(rename = "min"))]
    Minimize,
}

impl LpProblem {
    pub fn new(objective: Vec<f64>, direction: Direction) -> Self {
        Self {
            objective,
            direction,
            constraints: Vec::new(),
        }
    }

    /// Builds a problem from an objective, a constraint matrix and its right-hand side
    pub fn from_parts(
        objective: Vec<f64>,
        matrix: Vec<Vec<f64>>,
        rhs: Vec<f64>,
        direction: Direction,
    ) -> Result<Self, SolveError> {
        if matrix.len() != rhs.len() {
            return Err(SolveError::RhsLength {
                expected: matrix.len(),
                found: rhs.len(),
            });
        }

        let constraints = matrix
            .into_iter()
            .zip(rhs)
            .map(|(coefficients, rhs)| Constraint { coefficients, rhs })
            .collect();

        Ok(Self {
            objective,
            direction,
            constraints,
        })
    }

    pub fn add_constraint(&mut self, coefficients: Vec<f64>, rhs: f64) {
        self.constraints.push(Constraint { coefficients, rhs });
    }

    /// Builder form of [`LpProblem::add_constraint`]
    pub fn with_constraint(mut self, coefficients: Vec<f64>, rhs: f64) -> Self {
        self.add_constraint(coefficients, rhs);
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Name of the `j`-th decision variable (`x1`, `x2`, ...)
    pub fn variable_name(j: usize) -> String {
        format!("x{}", j + 1)
    }

    /// Name of the slack variable of the `i`-th constraint (`s1`, `s2`, ...)
    pub fn slack_name(i: usize) -> String {
        format!("s{}", i + 1)
    }
}

impl Direction {
    pub fn is_minimize(self) -> bool {
        self == Direction::Minimize
    }
}
