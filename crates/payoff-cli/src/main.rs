mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::budget::SuggestExtraArgs;
use commands::payoff::{CompareArgs, PlanArgs, SimulateArgs, SweepArgs};
use commands::preview::PreviewArgs;

/// Debt payoff projections (avalanche / snowball)
#[derive(Parser)]
#[command(
    name = "payoff",
    version,
    about = "Debt payoff projections with decimal precision",
    long_about = "Simulates month-by-month repayment of a set of debts under the \
                  avalanche (highest rate first) or snowball (lowest balance first) \
                  strategy. Reports payoff dates, total interest, per-debt milestones, \
                  and savings against paying minimums only."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the amortization engine once
    Simulate(SimulateArgs),
    /// Minimum-only baseline vs a strategy with extra payment
    Plan(PlanArgs),
    /// Avalanche and snowball side by side
    Compare(CompareArgs),
    /// Months and interest across a range of extra payments
    Sweep(SweepArgs),
    /// Approximate pooled-balance chart preview
    Preview(PreviewArgs),
    /// Suggest a safe extra payment from monthly income
    SuggestExtra(SuggestExtraArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::payoff::run_simulate(args),
        Commands::Plan(args) => commands::payoff::run_plan(args),
        Commands::Compare(args) => commands::payoff::run_compare(args),
        Commands::Sweep(args) => commands::payoff::run_sweep(args),
        Commands::Preview(args) => commands::preview::run_preview(args),
        Commands::SuggestExtra(args) => commands::budget::run_suggest_extra(args),
        Commands::Version => {
            println!("payoff {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
