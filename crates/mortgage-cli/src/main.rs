mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::buydown::BuydownArgs;
use commands::payment::PaymentArgs;
use commands::schedule::ScheduleArgs;
use commands::tax_benefit::TaxBenefitArgs;

/// Mortgage analytics with decimal precision
#[derive(Parser)]
#[command(
    name = "mortcalc",
    version,
    about = "Mortgage analytics with decimal precision",
    long_about = "A CLI for mortgage analysis: amortization schedules with extra \
                  principal payments, yearly rollups, itemized-vs-standard tax \
                  benefit projections, and discount-point break-even comparisons."
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
    /// Quick payment quote: monthly payment, total interest, LTV, PMI
    Payment(PaymentArgs),
    /// Build a full amortization schedule with yearly rollup
    Schedule(ScheduleArgs),
    /// Itemized-vs-standard tax benefit projection over the loan life
    TaxBenefit(TaxBenefitArgs),
    /// Discount-point break-even comparison
    Buydown(BuydownArgs),
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
        Commands::Payment(args) => commands::payment::run_payment(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::TaxBenefit(args) => commands::tax_benefit::run_tax_benefit(args),
        Commands::Buydown(args) => commands::buydown::run_buydown(args),
        Commands::Version => {
            println!("mortcalc {}", env!("CARGO_PKG_VERSION"));
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
