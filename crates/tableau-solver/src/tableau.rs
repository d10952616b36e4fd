use std::fmt;

use crate::problem::LpProblem;

/// Dense Simplex tableau for a problem with `n` decision variables and `m` constraints.
///
/// Layout is `(m + 1) x (n + m + 1)`: constraint rows first, then the
/// objective row; decision columns, then one slack column per constraint,
/// then the right-hand side. In the constraint rows the columns of the
/// basic variables always form an identity matrix.
#[derive(Debug, Clone)]
pub struct Tableau {
    data: Vec<Vec<f64>>,
    /// Name of the basic variable owning each constraint row
    basic_vars: Vec<String>,
    /// Column index of each basic variable
    basic_cols: Vec<usize>,
    /// Names of the nonbasic variables, one slot per decision variable
    nonbasic_vars: Vec<String>,
    /// Column index held by each nonbasic slot
    nonbasic_cols: Vec<usize>,
    column_names: Vec<String>,
    n_vars: usize,
}

impl Tableau {
    /// Builds the starting tableau with every slack variable basic.
    ///
    /// The objective row holds the negated coefficients of the maximization
    /// form: `-c` when maximizing, `c` when minimizing.
    pub(crate) fn new(problem: &LpProblem) -> Self {
        let n_vars = problem.num_variables();
        let n_constraints = problem.num_constraints();
        let total_cols = n_vars + n_constraints + 1;
        let rhs_col = total_cols - 1;

        let mut data = vec![vec![0.0; total_cols]; n_constraints + 1];

        for (i, c) in problem.constraints.iter().enumerate() {
            data[i][..n_vars].copy_from_slice(&c.coefficients);
            data[i][n_vars + i] = 1.0;
            data[i][rhs_col] = c.rhs;
        }

        let obj_row = n_constraints;
        for (j, &coef) in problem.objective.iter().enumerate() {
            data[obj_row][j] = if problem.direction.is_minimize() { coef } else { -coef };
        }

        let column_names: Vec<String> = (0..n_vars)
            .map(LpProblem::variable_name)
            .chain((0..n_constraints).map(LpProblem::slack_name))
            .collect();

        Self {
            data,
            basic_vars: column_names[n_vars..].to_vec(),
            basic_cols: (n_vars..n_vars + n_constraints).collect(),
            nonbasic_vars: column_names[..n_vars].to_vec(),
            nonbasic_cols: (0..n_vars).collect(),
            column_names,
            n_vars,
        }
    }

    /// Column with the most negative objective-row entry, first occurrence on ties
    pub(crate) fn entering_column(&self) -> (usize, f64) {
        let row = self.objective_row();
        let mut min_col = 0;
        let mut min_val = row[0];

        for (j, &val) in row.iter().enumerate().take(self.rhs_col()).skip(1) {
            if val < min_val {
                min_val = val;
                min_col = j;
            }
        }

        (min_col, min_val)
    }

    /// Minimum-ratio test over rows whose entry in `col` exceeds `tolerance`.
    ///
    /// Ties go to the lowest row index. `None` means no row bounds the
    /// entering variable.
    pub(crate) fn leaving_row(&self, col: usize, tolerance: f64) -> Option<usize> {
        let rhs_col = self.rhs_col();
        let mut min_ratio = f64::INFINITY;
        let mut min_row = None;

        for i in 0..self.num_constraints() {
            let val = self.data[i][col];
            if val > tolerance {
                let ratio = self.data[i][rhs_col] / val;
                if min_row.is_none() || ratio < min_ratio {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }

        min_row
    }

    /// Exchanges the basic variable of `row` with the variable of `col`
    /// and eliminates `col` from every other row.
    pub(crate) fn pivot(&mut self, row: usize, col: usize) {
        let n_rows = self.data.len();
        let n_cols = self.num_cols();

        let leaving_col = self.basic_cols[row];
        let slot = self.nonbasic_cols.iter().position(|&c| c == col);
        debug_assert!(slot.is_some(), "entering column {} is already basic", col);
        if let Some(slot) = slot {
            self.nonbasic_vars[slot] = self.column_names[leaving_col].clone();
            self.nonbasic_cols[slot] = leaving_col;
        }
        self.basic_vars[row] = self.column_names[col].clone();
        self.basic_cols[row] = col;

        let pivot_val = self.data[row][col];
        for j in 0..n_cols {
            self.data[row][j] /= pivot_val;
        }

        for i in 0..n_rows {
            if i != row {
                let factor = self.data[i][col];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..n_cols {
                    self.data[i][j] -= factor * self.data[row][j];
                }
            }
        }
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn num_rows(&self) -> usize {
        self.data.len()
    }

    pub fn num_cols(&self) -> usize {
        self.data[0].len()
    }

    pub fn num_variables(&self) -> usize {
        self.n_vars
    }

    pub fn num_constraints(&self) -> usize {
        self.data.len() - 1
    }

    pub fn rhs_col(&self) -> usize {
        self.num_cols() - 1
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.data[row][self.rhs_col()]
    }

    pub fn objective_row(&self) -> &[f64] {
        &self.data[self.num_constraints()]
    }

    pub fn basic_vars(&self) -> &[String] {
        &self.basic_vars
    }

    pub fn nonbasic_vars(&self) -> &[String] {
        &self.nonbasic_vars
    }

    pub(crate) fn basic_cols(&self) -> &[usize] {
        &self.basic_cols
    }

    /// Column names: `x1..xn`, then `s1..sm`
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}", "basis")?;
        for name in &self.column_names {
            write!(f, " {:>9}", name)?;
        }
        writeln!(f, " {:>9}", "rhs")?;

        for (i, row) in self.data.iter().enumerate() {
            let label = self.basic_vars.get(i).map(String::as_str).unwrap_or("z");
            write!(f, "{:>6}", label)?;
            for val in row {
                // Avoid printing "-0.00"
                let rounded = (val * 100.0).round() / 100.0;
                let shown = if rounded == 0.0 { 0.0 } else { rounded };
                write!(f, " {:>9.2}", shown)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
