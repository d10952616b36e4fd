//! Prompt-driven loop: collect one problem at a time from the console, solve it, repeat.

use std::io::{self, BufRead, Write};

use tableau_solver::{Constraint, Direction, LpProblem, Solver, Tableau};

use crate::input::parse_number;
use crate::report::{format_value, render_iteration, render_values};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

pub struct Session<R, W> {
    input: R,
    output: W,
    solver: Solver,
    precision: usize,
    trace: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, solver: Solver) -> Self {
        Self {
            input,
            output,
            solver,
            precision: 4,
            trace: false,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Runs until the input is exhausted
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "{}", CLEAR_SCREEN)?;
            writeln!(self.output, "=== INTERACTIVE SIMPLEX METHOD ===")?;

            let Some(line) = self.prompt("How many variables does the objective function have? ")? else {
                return Ok(());
            };
            let n_vars = match line.trim().parse::<i64>() {
                Ok(n) if n > 0 => n as usize,
                Ok(_) => {
                    writeln!(self.output, "The number of variables must be positive.")?;
                    continue;
                }
                Err(_) => {
                    writeln!(self.output, "Enter a valid number.")?;
                    continue;
                }
            };

            writeln!(
                self.output,
                "\nEnter the objective function coefficients ({} variables):",
                n_vars
            )?;
            let Some(objective) = self.read_coefficients(n_vars)? else {
                return Ok(());
            };

            let Some(constraints) = self.read_constraints(n_vars)? else {
                return Ok(());
            };
            if constraints.is_empty() {
                writeln!(self.output, "At least one constraint is required.")?;
                continue;
            }

            let Some(direction) = self.read_direction()? else {
                return Ok(());
            };

            let problem = LpProblem {
                objective,
                direction,
                constraints,
            };

            writeln!(self.output, "\nSolving the problem...")?;
            self.solve_and_report(&problem)?;

            if self.prompt("\nPress Enter for a new problem...")?.is_none() {
                return Ok(());
            }
        }
    }

    fn solve_and_report(&mut self, problem: &LpProblem) -> io::Result<()> {
        let mut trace = String::new();
        let result = if self.trace {
            self.solver
                .solve_observed(problem, &mut |iteration: usize, tableau: &Tableau| {
                    trace.push_str(&render_iteration(iteration, tableau));
                })
        } else {
            self.solver.solve(problem)
        };
        write!(self.output, "{}", trace)?;

        match result {
            Ok(solution) => {
                writeln!(self.output, "\nOPTIMAL SOLUTION\n")?;
                write!(self.output, "{}", render_values(&solution, self.precision))?;
                writeln!(
                    self.output,
                    "\nOPTIMAL VALUE OF Z = {}",
                    format_value(solution.objective_value, self.precision)
                )?;
            }
            Err(e) => {
                log::debug!("Interactive solve failed: {:?}", e);
                writeln!(self.output, "\nCould not solve the problem: {}", e)?;
            }
        }
        Ok(())
    }

    fn read_coefficients(&mut self, n_vars: usize) -> io::Result<Option<Vec<f64>>> {
        let mut coefficients = Vec::new();
        for i in 1..=n_vars {
            let Some(value) = self.read_number(&format!("Coefficient of x{}: ", i))? else {
                return Ok(None);
            };
            coefficients.push(value);
        }
        Ok(Some(coefficients))
    }

    fn read_constraints(&mut self, n_vars: usize) -> io::Result<Option<Vec<Constraint>>> {
        let mut constraints = Vec::new();
        loop {
            writeln!(self.output, "\nAdd a new constraint? (y/n)")?;
            let Some(answer) = self.prompt("")? else {
                return Ok(None);
            };
            if answer.trim().to_lowercase() != "y" {
                return Ok(Some(constraints));
            }

            writeln!(self.output, "Enter the constraint coefficients:")?;
            let Some(coefficients) = self.read_coefficients(n_vars)? else {
                return Ok(None);
            };
            let Some(rhs) = self.read_number("Right-hand side (RHS): ")? else {
                return Ok(None);
            };
            constraints.push(Constraint { coefficients, rhs });
        }
    }

    fn read_direction(&mut self) -> io::Result<Option<Direction>> {
        loop {
            writeln!(self.output, "\nMaximize or minimize the objective function?")?;
            writeln!(self.output, "1. Maximize")?;
            writeln!(self.output, "2. Minimize")?;
            let Some(choice) = self.prompt("Select an option (1/2): ")? else {
                return Ok(None);
            };
            match choice.trim() {
                "1" => return Ok(Some(Direction::Maximize)),
                "2" => return Ok(Some(Direction::Minimize)),
                _ => writeln!(self.output, "Invalid option.")?,
            }
        }
    }

    /// Re-prompts until a number is entered
    fn read_number(&mut self, message: &str) -> io::Result<Option<f64>> {
        loop {
            let Some(line) = self.prompt(message)? else {
                return Ok(None);
            };
            match parse_number(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Invalid value. Enter a number.")?,
            }
        }
    }

    /// `None` once the input is exhausted
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
