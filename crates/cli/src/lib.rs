pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};
use foodshop_core::config::{AppConfig, LoadOptions};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "foodshop",
    about = "Foodshop storefront CLI",
    long_about = "Browse the catalog, manage the persisted cart, and hand orders or enquiries off to the shop's messaging channel.",
    after_help = "Examples:\n  foodshop catalog\n  foodshop add 1\n  foodshop qty 1 -1\n  foodshop checkout"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List every product in the catalog")]
    Catalog,
    #[command(about = "Show one product's details")]
    Preview { product_id: u32 },
    #[command(about = "Show the cart lines, item count, and total")]
    Cart,
    #[command(about = "Add one unit of a product to the cart")]
    Add { product_id: u32 },
    #[command(about = "Add one unit of the product with this exact name")]
    AddByName { name: String },
    #[command(about = "Change a cart line's quantity by a signed amount; zero or below removes it")]
    Qty {
        product_id: u32,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    #[command(about = "Remove a product's line from the cart")]
    Remove { product_id: u32 },
    #[command(about = "Empty the cart")]
    Clear,
    #[command(about = "Summarize the order and build the messaging hand-off link")]
    Checkout,
    #[command(about = "Build a contact message hand-off link")]
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        logging::init(&config.logging);
    }

    let result = match cli.command {
        Command::Catalog => commands::catalog::list(),
        Command::Preview { product_id } => commands::catalog::preview(product_id),
        Command::Cart => commands::cart::show(),
        Command::Add { product_id } => commands::cart::add(product_id),
        Command::AddByName { name } => commands::cart::add_by_name(&name),
        Command::Qty { product_id, delta } => commands::cart::adjust(product_id, delta),
        Command::Remove { product_id } => commands::cart::remove(product_id),
        Command::Clear => commands::cart::clear(),
        Command::Checkout => commands::checkout::checkout(),
        Command::Contact { name, email, message } => {
            commands::checkout::contact(&name, &email, &message)
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn qty_accepts_a_negative_delta() {
        let cli = Cli::try_parse_from(["foodshop", "qty", "1", "-1"]).expect("qty should parse");

        assert!(matches!(cli.command, Command::Qty { product_id: 1, delta: -1 }));
    }

    #[test]
    fn contact_requires_named_flags() {
        assert!(Cli::try_parse_from(["foodshop", "contact", "Ada"]).is_err());

        let cli = Cli::try_parse_from([
            "foodshop", "contact", "--name", "Ada", "--email", "ada@example.com", "--message", "Hi",
        ])
        .expect("contact should parse");
        assert!(matches!(cli.command, Command::Contact { .. }));
    }
}
