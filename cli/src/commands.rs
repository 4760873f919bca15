//! Command handlers
//!
//! Each run loads the config and snapshot, applies one command, and saves
//! whatever it changed before exiting.

use crate::render;
use crate::{AdminCommand, CardCommand, Cli, Command, ReplayPolicyArg};
use anyhow::{bail, Context, Result};
use spintoearn_core::{GameConfig, GameState, ReplayPolicy, RewardWeights};
use spintoearn_engine::{Clock, Game, Gate};
use spintoearn_persistence::{load_config, load_game_state, save_config, save_game_state, Database};
use std::path::PathBuf;
use tracing::{debug, info};

const DB_FILE: &str = "spintoearn.db";

/// Resolve a full id from an exact match or a unique prefix
///
/// Anything ambiguous or unknown is passed through so the game reports it.
fn resolve_id<'a, I>(ids: I, input: &str) -> String
where
    I: Iterator<Item = &'a str>,
{
    let mut found: Option<&str> = None;
    for id in ids {
        if id == input {
            return id.to_string();
        }
        if id.starts_with(input) {
            if found.is_some() {
                return input.to_string();
            }
            found = Some(id);
        }
    }
    found.unwrap_or(input).to_string()
}

fn card_id(state: &GameState, input: &str) -> String {
    resolve_id(state.scratch_cards.iter().map(|c| c.id.as_str()), input)
}

fn reward_id(state: &GameState, input: &str) -> String {
    resolve_id(state.rewards.iter().map(|r| r.id.as_str()), input)
}

fn replay_policy(arg: ReplayPolicyArg) -> ReplayPolicy {
    match arg {
        ReplayPolicyArg::Manual => ReplayPolicy::Manual,
        ReplayPolicyArg::Consume => ReplayPolicy::ConsumeOnSpin,
    }
}

/// Whether the command changes the game state
fn mutates_state(command: &Command) -> bool {
    match command {
        Command::Spin | Command::Claim { .. } => true,
        Command::Card(card) => !matches!(card, CardCommand::List),
        Command::Admin(admin) => matches!(admin, AdminCommand::ResetWeek | AdminCommand::Reset),
        Command::Dashboard | Command::Rewards { .. } => false,
    }
}

fn requires_wallet(command: &Command) -> bool {
    match command {
        Command::Spin | Command::Claim { .. } => true,
        Command::Card(card) => !matches!(card, CardCommand::List),
        _ => false,
    }
}

pub async fn run(cli: Cli, data_dir: PathBuf) -> Result<()> {
    let db_path = data_dir.join(DB_FILE);
    let db = Database::connect(&db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    let config = load_config(&db).await.context("Failed to load configuration")?;
    let state = load_game_state(&db).await.context("Failed to load game state")?;
    let mut game = Game::with_system(state, config)?;

    let gate = Gate::from_address(cli.wallet.as_deref());
    if requires_wallet(&cli.command) && !gate.is_ready() {
        println!("{}", render::CONNECT_PROMPT);
        return Ok(());
    }

    let save = mutates_state(&cli.command);
    execute(&mut game, &db, cli.command, &gate).await?;

    if save {
        save_game_state(&db, game.state()).await.context("Failed to save game state")?;
        debug!("Game state saved");
    }
    Ok(())
}

async fn execute<C: Clock>(
    game: &mut Game<C>,
    db: &Database,
    command: Command,
    gate: &Gate,
) -> Result<()> {
    match command {
        Command::Dashboard => {
            let wallet = match gate {
                Gate::Ready(address) => Some(address.as_str()),
                Gate::WalletRequired => None,
            };
            println!("{}", render::dashboard(&game.stats(), wallet));
        }
        Command::Spin => {
            let reward = game.perform_spin()?;
            println!("{}", render::spin_result(&reward));
        }
        Command::Card(CardCommand::Free) => {
            let card = game.add_scratch_card(false)?;
            println!(
                "New scratch card {} ({} free left this week)",
                render::short_id(card.id.as_str()),
                game.free_cards_remaining()
            );
        }
        Command::Card(CardCommand::List) => {
            println!("{}", render::card_list(&game.unrevealed_cards()));
        }
        Command::Card(CardCommand::Reveal { id }) => {
            let id = card_id(game.state(), &id);
            let reward = game.reveal_scratch_card(&id)?;
            println!("{}", render::spin_result(&reward));
        }
        Command::Rewards { kind } => {
            let offset = game.clock().utc_offset();
            let days = game.state().rewards_by_day(kind, offset);
            println!("{}", render::history(&days, offset));
        }
        Command::Claim { id, all } => {
            if all {
                let claimed = game.claim_all();
                println!("Claimed {} reward(s)", claimed);
            } else {
                let Some(id) = id else {
                    bail!("Pass a reward id or --all");
                };
                let id = reward_id(game.state(), &id);
                let reward = game.claim_reward(&id)?;
                println!("Claimed {} ({})", reward.name, render::reward_amount(&reward));
            }
        }
        Command::Admin(admin) => run_admin(game, db, admin).await?,
    }
    Ok(())
}

async fn apply_config<C: Clock>(game: &mut Game<C>, db: &Database, config: GameConfig) -> Result<()> {
    game.set_config(config)?;
    save_config(db, game.config()).await.context("Failed to save configuration")?;
    println!("{}", render::config_summary(game.config()));
    Ok(())
}

async fn run_admin<C: Clock>(game: &mut Game<C>, db: &Database, admin: AdminCommand) -> Result<()> {
    match admin {
        AdminCommand::Show => println!("{}", render::config_summary(game.config())),
        AdminCommand::Quota { per_week } => {
            let config = GameConfig {
                free_cards_per_week: per_week,
                ..game.config().clone()
            };
            apply_config(game, db, config).await?;
        }
        AdminCommand::Weights {
            sol,
            usdt,
            nft,
            scratchcard,
            replay,
        } => {
            let weights = RewardWeights::from_percentages(sol, usdt, nft, scratchcard, replay)?;
            let config = GameConfig {
                weights,
                ..game.config().clone()
            };
            apply_config(game, db, config).await?;
        }
        AdminCommand::ReplayPolicy { policy } => {
            let config = GameConfig {
                replay_policy: replay_policy(policy),
                ..game.config().clone()
            };
            apply_config(game, db, config).await?;
        }
        AdminCommand::ResetWeek => {
            game.reset_free_cards();
            println!("Free cards reset: {} available", game.free_cards_remaining());
        }
        AdminCommand::Reset => {
            game.reset();
            info!("All progress wiped");
            println!("Game progress reset");
        }
    }
    Ok(())
}
