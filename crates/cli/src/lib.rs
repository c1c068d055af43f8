pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "marketlens",
    about = "Marketlens demand-supply analysis CLI",
    long_about = "Compare a customer survey against a product catalog: coverage and \
                  accuracy metrics, ranked recommendations, precision scores, and \
                  business rule insights.",
    after_help = "Examples:\n  marketlens metrics --survey survey.csv --catalog catalog.json\n  marketlens recommend --survey survey.csv --catalog catalog.json --user USER_0001\n  marketlens generate --count 100 --output survey.csv"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compute the full metrics snapshot for a survey/catalog pair")]
    Metrics {
        #[arg(long, help = "Path to the customer survey CSV")]
        survey: PathBuf,
        #[arg(long, help = "Path to the product catalog JSON")]
        catalog: PathBuf,
    },
    #[command(about = "Rank the top-K catalog products for one surveyed customer")]
    Recommend {
        #[arg(long, help = "Path to the customer survey CSV")]
        survey: PathBuf,
        #[arg(long, help = "Path to the product catalog JSON")]
        catalog: PathBuf,
        #[arg(long, help = "Customer user_id to rank products for")]
        user: String,
        #[arg(long, help = "Number of entries to return (overrides config)")]
        top_k: Option<usize>,
    },
    #[command(about = "Evaluate business rules and list the insight keys that fired")]
    Insights {
        #[arg(long, help = "Path to the customer survey CSV")]
        survey: PathBuf,
        #[arg(long, help = "Path to the product catalog JSON")]
        catalog: PathBuf,
    },
    #[command(about = "Write a deterministic synthetic survey CSV")]
    Generate {
        #[arg(long, help = "Number of customers to generate")]
        count: usize,
        #[arg(long, default_value_t = 42, help = "RNG seed for reproducible output")]
        seed: u64,
        #[arg(long, help = "Destination CSV path")]
        output: PathBuf,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Metrics { survey, catalog } => commands::metrics::run(&survey, &catalog),
        Command::Recommend { survey, catalog, user, top_k } => {
            commands::recommend::run(&survey, &catalog, &user, top_k)
        }
        Command::Insights { survey, catalog } => commands::insights::run(&survey, &catalog),
        Command::Generate { count, seed, output } => commands::generate::run(count, seed, &output),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
