mod input;
mod interactive;
mod report;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tableau_solver::{Direction, LpProblem, Solver, Tableau};

#[derive(Parser)]
#[command(name = "tableau")]
#[command(about = "Solve linear programs with the tableau Simplex method", long_about = None)]
struct Cli {
    /// Log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem given on the command line
    Solve {
        /// Objective coefficients, comma separated (e.g. 3,5)
        #[arg(short = 'c', long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
        objective: Vec<f64>,
        /// Constraint of the form "a1,a2,...<=b" (repeatable)
        #[arg(short = 'a', long = "constraint", allow_hyphen_values = true)]
        constraints: Vec<String>,
        /// Minimize instead of maximize
        #[arg(long)]
        minimize: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Solve a problem stored in a JSON file
    Load {
        /// The file containing the problem
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Enter problems at interactive prompts, one after another
    Interactive {
        /// Decimal places shown in results
        #[arg(short, long, default_value_t = 4)]
        precision: usize,
        /// Print the tableau at every iteration
        #[arg(long)]
        trace: bool,
        /// Maximum pivots before giving up
        #[arg(long, default_value_t = 10000)]
        max_iterations: usize,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
    format: Format,
    /// Decimal places shown in results
    #[arg(short, long, default_value_t = 4)]
    precision: usize,
    /// Show shadow prices, reduced costs and binding constraints
    #[arg(short = 'A', long)]
    analysis: bool,
    /// Print the tableau at every iteration
    #[arg(long)]
    trace: bool,
    /// Maximum pivots before giving up
    #[arg(long, default_value_t = 10000)]
    max_iterations: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Solve {
            objective,
            constraints,
            minimize,
            output,
        } => {
            let direction = if minimize { Direction::Minimize } else { Direction::Maximize };
            let problem = match input::build_problem(objective, &constraints, direction) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Input error: {}", e);
                    std::process::exit(1);
                }
            };
            solve_and_print(&problem, &output);
        }
        Commands::Load { file, output } => {
            let problem = match input::load_problem(&file) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            };
            solve_and_print(&problem, &output);
        }
        Commands::Interactive {
            precision,
            trace,
            max_iterations,
        } => {
            let solver = Solver::new().with_max_iterations(max_iterations);
            let stdin = io::stdin();
            let mut session = interactive::Session::new(stdin.lock(), io::stdout(), solver)
                .with_precision(precision)
                .with_trace(trace);
            if let Err(e) = session.run() {
                eprintln!("I/O error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn init_logger(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn solve_and_print(problem: &LpProblem, output: &OutputArgs) {
    let solver = Solver::new().with_max_iterations(output.max_iterations);

    let result = if output.trace {
        // Keep stdout parseable when emitting JSON
        let json = output.format == Format::Json;
        solver.solve_observed(problem, &mut |iteration: usize, tableau: &Tableau| {
            let text = report::render_iteration(iteration, tableau);
            if json {
                eprint!("{}", text);
            } else {
                print!("{}", text);
            }
        })
    } else {
        solver.solve(problem)
    };

    let solution = match result {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Solve error: {}", e);
            std::process::exit(1);
        }
    };

    match output.format {
        Format::Pretty => {
            print!(
                "{}",
                report::render_solution(&solution, output.precision, output.analysis)
            );
        }
        Format::Json => match serde_json::to_string_pretty(&solution) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing solution: {}", e);
                std::process::exit(1);
            }
        },
    }
    if let Err(e) = io::stdout().flush() {
        eprintln!("Error writing output: {}", e);
        std::process::exit(1);
    }
}
