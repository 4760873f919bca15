//! SpinToEarn CLI - Main entry point

mod commands;
mod render;

use clap::{Parser, Subcommand};
use spintoearn_core::RewardKind;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "spintoearn", version, about = "Spin the wheel, scratch cards, collect rewards")]
pub struct Cli {
    /// Directory holding the game database
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Connected wallet address
    #[arg(long, global = true, env = "SPINTOEARN_WALLET")]
    pub wallet: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Overview of spins, streak, rewards and cards
    Dashboard,
    /// Spin the daily wheel
    Spin,
    /// Scratch cards
    #[command(subcommand)]
    Card(CardCommand),
    /// Reward history, newest first, grouped by day
    Rewards {
        /// Only show one reward type (sol, usdt, nft, scratchcard, replay)
        #[arg(long)]
        kind: Option<RewardKind>,
    },
    /// Claim a reward by id (or id prefix)
    Claim {
        id: Option<String>,
        /// Claim every unclaimed reward
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },
    /// Game settings and maintenance
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
pub enum CardCommand {
    /// Take one of this week's free cards
    Free,
    /// List cards still waiting to be scratched
    List,
    /// Scratch a card by id (or id prefix)
    Reveal { id: String },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Print the active configuration
    Show,
    /// Set the weekly free card quota
    Quota { per_week: u32 },
    /// Set reward probabilities in whole percent (must sum to 100)
    Weights {
        sol: u32,
        usdt: u32,
        nft: u32,
        scratchcard: u32,
        replay: u32,
    },
    /// Whether spinning through the cooldown uses up a replay
    ReplayPolicy { policy: ReplayPolicyArg },
    /// Start a new week of free cards
    ResetWeek,
    /// Wipe all game progress
    Reset,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum ReplayPolicyArg {
    Manual,
    Consume,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "spintoearn_cli=info,spintoearn_engine=info,spintoearn_persistence=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| {
        dirs_next::data_local_dir()
            .map(|p| p.join("SpinToEarn"))
            .unwrap_or_else(|| PathBuf::from("."))
    });

    if let Err(e) = commands::run(cli, data_dir).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
