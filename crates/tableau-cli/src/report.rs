use std::fmt::Write;

use tableau_solver::{Solution, Tableau};

/// Rounds for display, folding `-0` into `0`
pub fn format_value(value: f64, precision: usize) -> String {
    let scale = 10f64.powi(precision.min(15) as i32);
    let rounded = (value * scale).round() / scale;
    let shown = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.*}", precision, shown)
}

/// One `name = value` line per variable, sorted by name
pub fn render_values(solution: &Solution, precision: usize) -> String {
    let mut out = String::new();
    for (name, &value) in &solution.values {
        let _ = writeln!(out, "{} = {}", name, format_value(value, precision));
    }
    out
}

pub fn render_solution(solution: &Solution, precision: usize, analysis: bool) -> String {
    let mut out = String::new();
    out.push_str("Status: OPTIMAL\n\n");
    out.push_str(&render_values(solution, precision));
    let _ = writeln!(out, "\nOptimal value Z = {}", format_value(solution.objective_value, precision));
    let _ = writeln!(out, "Pivots: {}", solution.iterations);

    if analysis {
        out.push_str(&render_analysis(solution, precision));
    }
    out
}

fn render_analysis(solution: &Solution, precision: usize) -> String {
    let analysis = &solution.analysis;
    let mut out = String::from("\nAnalysis:\n\n");

    if !analysis.binding_constraints.is_empty() {
        out.push_str("Binding constraints:\n");
        for name in &analysis.binding_constraints {
            let _ = writeln!(out, "  - {}", name);
        }
        out.push('\n');
    }

    out.push_str("Shadow prices:\n");
    for sp in &analysis.shadow_prices {
        let _ = writeln!(out, "  {:10} {:>12}", sp.constraint, format_value(sp.value, precision));
    }
    out.push('\n');

    out.push_str("Reduced costs (variables not in solution):\n");
    for rc in analysis.reduced_costs.iter().filter(|rc| !rc.is_basic) {
        let _ = writeln!(
            out,
            "  {:10} objective coefficient must improve by {} to enter",
            rc.variable,
            format_value(rc.reduced_cost, precision)
        );
    }
    out
}

/// Banner and tableau printed for each iteration when tracing
pub fn render_iteration(iteration: usize, tableau: &Tableau) -> String {
    let rule = "-".repeat(30);
    format!("\n{} Iteration {} {}\n{}", rule, iteration, rule, tableau)
}
