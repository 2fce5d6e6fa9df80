//! Marigold Books CLI - store seeding and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the catalog collection from the built-in dataset
//! mb-cli seed
//!
//! # Wipe and reseed the catalog (destructive)
//! mb-cli reset --yes
//!
//! # Print the sales dashboard
//! mb-cli dashboard --days 7
//!
//! # List orders / change an order's status
//! mb-cli orders list
//! mb-cli orders status <ORDER_ID> shipped
//! ```
//!
//! # Commands
//!
//! - `seed` - Write the fallback catalog into the store in batches
//! - `reset` - Clear the catalog collection and reseed it
//! - `dashboard` - Fetch orders and books concurrently, print every
//!   analytics view
//! - `orders` - List orders or overwrite an order's status

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mb-cli")]
#[command(author, version, about = "Marigold Books CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the catalog collection from the built-in dataset
    Seed,
    /// Wipe the catalog collection and reseed it
    Reset {
        /// Confirm the destructive reset
        #[arg(long)]
        yes: bool,
    },
    /// Print the sales analytics dashboard
    Dashboard {
        /// How many calendar days the daily-sales view covers
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Inspect and manage orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List all orders, newest first
    List,
    /// Overwrite an order's status
    Status {
        /// Order ID
        id: String,
        /// New status (`pending`, `confirmed`, `processing`, `shipped`,
        /// `delivered`, `cancelled`)
        status: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed => commands::seed::seed().await?,
        Commands::Reset { yes } => {
            if !yes {
                return Err(
                    "reset wipes the entire catalog collection; pass --yes to confirm".into(),
                );
            }
            commands::seed::reset().await?;
        }
        Commands::Dashboard { days } => commands::dashboard::show(days).await?,
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list().await?,
            OrdersAction::Status { id, status } => {
                let status: marigold_core::OrderStatus = status.parse()?;
                commands::orders::set_status(&id, status).await?;
            }
        },
    }
    Ok(())
}
