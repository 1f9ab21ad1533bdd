mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::valuation::{ReportArgs, ValuateArgs};

/// Cross-market property purchase cost and yield estimates
#[derive(Parser)]
#[command(
    name = "gpc",
    version,
    about = "Cross-market property purchase cost and yield estimates",
    long_about = "A CLI for estimating property acquisition costs, rental yields and \
                  owner-occupied running costs across the UK, UAE, Thailand and Japan \
                  with decimal precision. Supports progressive stamp duty and flat \
                  transfer-fee tables, interest-only financing splits, rent-vs-APR \
                  sensitivity grids and localized report payloads."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a purchase cost and yield valuation
    Valuate(ValuateArgs),
    /// Build a localized, display-ready report payload from a valuation
    Report(ReportArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Valuate(args) => commands::valuation::run_valuate(args),
        Commands::Report(args) => commands::valuation::run_report(args),
        Commands::Version => {
            println!("gpc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
