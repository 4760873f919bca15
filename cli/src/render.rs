//! Plain-text views of the game state

use chrono::{Duration, FixedOffset, NaiveDate};
use spintoearn_core::{GameConfig, GameStats, Reward, RewardKind, ScratchCard};
use spintoearn_engine::format_countdown;
use std::fmt::Write;

pub const CONNECT_PROMPT: &str =
    "Connect a wallet to play: pass --wallet <ADDRESS> or set SPINTOEARN_WALLET";

/// First eight characters, enough to address an id on the command line
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

pub fn reward_amount(reward: &Reward) -> String {
    match (reward.kind, reward.amount) {
        (RewardKind::Sol, Some(a)) => format!("{} SOL", a),
        (RewardKind::Usdt, Some(a)) => format!("{} USDT", a),
        _ => "-".to_string(),
    }
}

pub fn reward_line(reward: &Reward, offset: FixedOffset) -> String {
    format!(
        "  {}  {}  {:<11} {:<24} {:<12} {}",
        short_id(reward.id.as_str()),
        reward.timestamp.with_timezone(&offset).format("%H:%M"),
        reward.kind.as_str(),
        reward.name,
        reward_amount(reward),
        if reward.claimed { "claimed" } else { "unclaimed" },
    )
}

pub fn spin_result(reward: &Reward) -> String {
    let mut out = format!("🎉 {} - {}", reward.name, reward.description);
    match reward.kind {
        RewardKind::ScratchCard => out.push_str("\n   A new scratch card was added to your collection"),
        RewardKind::Replay => out.push_str("\n   Your next spin skips the cooldown"),
        _ => {}
    }
    out
}

pub fn history(days: &[(NaiveDate, Vec<&Reward>)], offset: FixedOffset) -> String {
    if days.is_empty() {
        return "No rewards yet. Spin the wheel to win!".to_string();
    }
    let mut out = String::new();
    for (day, rewards) in days {
        let _ = writeln!(out, "{}", day.format("%A, %B %-d, %Y"));
        for reward in rewards {
            let _ = writeln!(out, "{}", reward_line(reward, offset));
        }
    }
    out.trim_end().to_string()
}

pub fn card_list(cards: &[&ScratchCard]) -> String {
    if cards.is_empty() {
        return "No cards to scratch.".to_string();
    }
    let mut out = format!("{} card(s) to scratch:", cards.len());
    for card in cards {
        let _ = write!(out, "\n  {}  {:?}", short_id(card.id.as_str()), card.source);
    }
    out
}

pub fn dashboard(stats: &GameStats, wallet: Option<&str>) -> String {
    let mut out = String::new();
    match wallet {
        Some(address) => {
            let _ = writeln!(out, "Wallet:          {}", address);
        }
        None => {
            let _ = writeln!(out, "{}", CONNECT_PROMPT);
        }
    }
    let next = if stats.can_spin {
        "ready".to_string()
    } else {
        format_countdown(Duration::seconds(stats.next_spin_in_secs))
    };
    let _ = writeln!(out, "Next spin:       {}", next);
    let _ = writeln!(out, "Streak:          {} day(s)", stats.streak_days);
    let _ = writeln!(out, "Total spins:     {}", stats.total_spins);
    let _ = writeln!(
        out,
        "Rewards:         {} won, {} unclaimed",
        stats.rewards_won, stats.unclaimed_rewards
    );
    let _ = writeln!(out, "Winnings:        {} SOL, {} USDT", stats.total_sol, stats.total_usdt);
    let _ = writeln!(out, "Cards to scratch: {}", stats.unrevealed_cards);
    let _ = write!(out, "Free cards left: {} this week", stats.free_cards_remaining);
    out
}

pub fn config_summary(config: &GameConfig) -> String {
    let w = &config.weights;
    let mut out = String::new();
    let _ = writeln!(out, "Spin cooldown:    {}", format_countdown(Duration::seconds(config.spin_cooldown_secs)));
    let _ = writeln!(out, "Free cards/week:  {}", config.free_cards_per_week);
    let _ = writeln!(
        out,
        "Probabilities:    sol {:.0}%  usdt {:.0}%  nft {:.0}%  scratchcard {:.0}%  replay {:.0}%",
        w.sol * 100.0,
        w.usdt * 100.0,
        w.nft * 100.0,
        w.scratchcard * 100.0,
        w.replay * 100.0
    );
    let _ = writeln!(out, "Replay policy:    {:?}", config.replay_policy);
    let _ = write!(
        out,
        "Card price:       {} SOL / {} ETH",
        config.card_price.sol, config.card_price.eth
    );
    out
}
