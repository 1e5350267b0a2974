mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analyze::AnalyzeArgs;
use commands::classify::ClassifyArgs;
use commands::xirr::XirrArgs;

/// Mutual-fund portfolio health analysis
#[derive(Parser)]
#[command(
    name = "fundscan",
    version,
    about = "Mutual-fund portfolio health analysis",
    long_about = "Analyzes a parsed consolidated account statement: per-holding \
                  annualized returns (XIRR), asset-class and plan-type tags, \
                  estimated commission drag, health ratings, and portfolio \
                  aggregates. Consumes the normalized snapshot JSON produced \
                  by an external statement parser."
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
    /// Analyze a holdings snapshot into per-holding results and a summary
    Analyze(AnalyzeArgs),
    /// Solve the annualized return of a standalone dated cash-flow series
    Xirr(XirrArgs),
    /// Classify a scheme name (asset class, plan type, commission drag)
    Classify(ClassifyArgs),
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
        Commands::Analyze(args) => commands::analyze::run_analyze(args),
        Commands::Xirr(args) => commands::xirr::run_xirr(args),
        Commands::Classify(args) => commands::classify::run_classify(args),
        Commands::Version => {
            println!("fundscan {}", env!("CARGO_PKG_VERSION"));
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
