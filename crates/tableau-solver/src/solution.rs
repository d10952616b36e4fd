use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::problem::LpProblem;

/// The optimal solution of an LP problem
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    /// Value of every decision and slack variable, keyed by name
    pub values: BTreeMap<String, f64>,
    /// Optimal objective value
    pub objective_value: f64,
    /// Number of pivots performed
    pub iterations: usize,
    /// Basic variable of each constraint row in the final tableau
    pub basic_vars: Vec<String>,
    /// Sensitivity information read off the final tableau
    pub analysis: Analysis,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Analysis {
    /// Shadow prices (dual values) for each constraint.
    /// Change of the objective per unit increase of the constraint's RHS.
    pub shadow_prices: Vec<ShadowPrice>,

    /// Reduced costs for each decision variable
    pub reduced_costs: Vec<ReducedCost>,

    /// Slack names of the constraints that are tight at the optimum
    pub binding_constraints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShadowPrice {
    /// Slack name of the constraint (`s1`, `s2`, ...)
    pub constraint: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReducedCost {
    pub variable: String,
    /// Current value in solution
    pub value: f64,
    /// How much the objective coefficient must improve before the variable enters
    pub reduced_cost: f64,
    pub is_basic: bool,
}

impl Solution {
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Decision variable values in index order (`x1`, `x2`, ...)
    pub fn decision_values(&self) -> Vec<f64> {
        (0..)
            .map(LpProblem::variable_name)
            .map_while(|name| self.value(&name))
            .collect()
    }

    /// Evaluates `coefficients · x` at this solution's decision values
    pub fn evaluate(&self, coefficients: &[f64]) -> f64 {
        coefficients
            .iter()
            .enumerate()
            .map(|(j, &coef)| coef * self.value(&LpProblem::variable_name(j)).unwrap_or(0.0))
            .sum()
    }
}
