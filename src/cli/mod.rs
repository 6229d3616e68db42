pub mod app;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bidbook")]
#[command(about = "Auction items mirrored from a hosted table")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show every item, or one bidder's items
    List {
        #[arg(long)]
        bidder: Option<i64>,
    },
    /// Create an item
    Add {
        #[arg(long)]
        bid: i64,
        #[arg(long)]
        item: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: Option<f64>,
    },
    /// Change fields of an existing item
    Edit {
        id: String,
        #[arg(long)]
        bid: Option<i64>,
        #[arg(long)]
        item: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "clear_price")]
        price: Option<f64>,
        #[arg(long)]
        clear_price: bool,
        #[arg(long)]
        paid: Option<bool>,
    },
    /// Delete an item
    Delete { id: String },
    /// Show a bidder's items and total due, optionally marking them paid
    Checkout {
        bidder: i64,
        #[arg(long = "pay")]
        pay: Vec<String>,
        #[arg(long)]
        pay_all: bool,
        #[arg(long)]
        commit: bool,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::List { .. } => "list",
            Command::Add { .. } => "add",
            Command::Edit { .. } => "edit",
            Command::Delete { .. } => "delete",
            Command::Checkout { .. } => "checkout",
        }
    }
}
