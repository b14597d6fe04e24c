pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "yardage",
    about = "Yardage operator CLI",
    long_about = "Operate the Yardage storefront: migrations, catalog seeding, config inspection, readiness checks, and order previews.",
    after_help = "Examples:\n  yardage doctor --json\n  yardage config\n  yardage order --select aria-voile-001:5 --select aria-voile-002:2 --address \"12 Marina Road, Lagos\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the starter catalog into an empty configured backend")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, catalog backend, and database readiness checks")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Preview the messaging handoff for a selection against the catalog")]
    Order {
        #[arg(
            long,
            value_name = "PRODUCT_ID[:YARDS]",
            help = "Product to include; yards default to 4, repeat for more products"
        )]
        select: Vec<String>,
        #[arg(long, help = "Delivery address to embed in the order message")]
        address: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Order { select, address } => commands::order::run(&select, address.as_deref()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
