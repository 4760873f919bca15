//! Spin Scheduler - Cooldown gate, streak tracking, and the spin itself

use super::Game;
use crate::clock::Clock;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use spintoearn_core::{Error, GameState, ReplayPolicy, Result, Reward};
use tracing::{info, warn};

/// Why a spin is or is not allowed right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Eligibility {
    FirstSpin,
    CooldownElapsed,
    /// Cooldown still running, but an unclaimed replay overrides it
    Replay,
    Cooldown(Duration),
}

fn eligibility(state: &GameState, cooldown: Duration, now: DateTime<Utc>) -> Eligibility {
    let Some(last) = state.last_spin_time else {
        return Eligibility::FirstSpin;
    };
    let remaining = (last - now)
        .checked_add(&cooldown)
        .unwrap_or(Duration::MAX);
    if remaining <= Duration::zero() {
        Eligibility::CooldownElapsed
    } else if state.has_unclaimed_replay() {
        Eligibility::Replay
    } else {
        Eligibility::Cooldown(remaining)
    }
}

/// Streak after a spin today, given the local date of the previous spin
///
/// Yesterday extends the streak, today keeps it, anything else restarts at 1.
pub fn next_streak(previous: Option<NaiveDate>, today: NaiveDate, current: u32) -> u32 {
    match previous {
        None => 1,
        Some(prev) if prev == today => current.max(1),
        Some(prev) if today.pred_opt() == Some(prev) => current + 1,
        Some(_) => 1,
    }
}

/// Render a countdown as `HH:MM:SS`
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

fn ceil_secs(d: Duration) -> i64 {
    d.num_milliseconds().saturating_add(999).div_euclid(1000)
}

impl<C: Clock, R: Rng> Game<C, R> {
    fn cooldown(&self) -> Duration {
        Duration::try_seconds(self.config.spin_cooldown_secs).unwrap_or(Duration::MAX)
    }

    /// Whether a spin is allowed at this instant
    pub fn can_spin(&self) -> bool {
        !matches!(
            eligibility(&self.state, self.cooldown(), self.clock.now()),
            Eligibility::Cooldown(_)
        )
    }

    /// Time left on the cooldown, zero whenever a spin is allowed
    pub fn time_until_next_spin(&self) -> Duration {
        match eligibility(&self.state, self.cooldown(), self.clock.now()) {
            Eligibility::Cooldown(remaining) => remaining,
            _ => Duration::zero(),
        }
    }

    /// Spin the wheel
    ///
    /// Updates the streak, stamps `last_spin_time`, bumps `total_spins` and
    /// appends the drawn reward (materializing a card for "scratchcard").
    pub fn perform_spin(&mut self) -> Result<Reward> {
        let now = self.clock.now();
        let gate = eligibility(&self.state, self.cooldown(), now);
        if let Eligibility::Cooldown(remaining) = gate {
            warn!("Spin rejected, cooldown active for {}", format_countdown(remaining));
            return Err(Error::CooldownActive {
                remaining_secs: ceil_secs(remaining),
            });
        }

        let today = self.clock.local_date(now);
        let previous = self.state.last_spin_time.map(|t| self.clock.local_date(t));
        let streak = next_streak(previous, today, self.state.streak_days);

        if gate == Eligibility::Replay && self.config.replay_policy == ReplayPolicy::ConsumeOnSpin {
            if let Some(replay) = self.state.rewards.iter_mut().find(|r| r.is_unclaimed_replay()) {
                replay.claimed = true;
                info!("Replay {} consumed to skip the cooldown", replay.id);
            }
        }

        let draft = self.engine.generate(&mut self.rng);
        let reward = self.append_reward_at(draft, now);

        self.state.last_spin_time = Some(now);
        self.state.streak_days = streak;
        self.state.total_spins += 1;

        info!(
            "Spin #{} -> {} (streak {} day(s))",
            self.state.total_spins, reward.name, streak
        );
        Ok(reward)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{game, start};
    use super::*;
    use crate::clock::ManualClock;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use spintoearn_core::{GameConfig, RewardKind, RewardWeights};
    use chrono::{FixedOffset, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Config where every spin yields the given variant
    fn always(kind: RewardKind) -> GameConfig {
        let mut weights = RewardWeights {
            sol: 0.0,
            usdt: 0.0,
            nft: 0.0,
            scratchcard: 0.0,
            replay: 0.0,
        };
        match kind {
            RewardKind::Sol => weights.sol = 1.0,
            RewardKind::Usdt => weights.usdt = 1.0,
            RewardKind::Nft => weights.nft = 1.0,
            RewardKind::ScratchCard => weights.scratchcard = 1.0,
            RewardKind::Replay => weights.replay = 1.0,
        }
        GameConfig {
            weights,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_next_streak_rules() {
        let today = date(2024, 5, 10);
        assert_eq!(next_streak(None, today, 0), 1);
        assert_eq!(next_streak(Some(date(2024, 5, 9)), today, 4), 5);
        assert_eq!(next_streak(Some(today), today, 4), 4);
        assert_eq!(next_streak(Some(date(2024, 5, 7)), today, 4), 1);
        // Month boundary
        assert_eq!(next_streak(Some(date(2024, 4, 30)), date(2024, 5, 1), 2), 3);
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(Duration::seconds(3_725)), "01:02:05");
        assert_eq!(format_countdown(Duration::hours(23) + Duration::minutes(59)), "23:59:00");
        assert_eq!(format_countdown(Duration::seconds(-5)), "00:00:00");
    }

    #[test]
    fn test_first_spin() {
        let (mut game, clock) = game(GameConfig::default());
        assert!(game.can_spin());
        assert_eq!(game.time_until_next_spin(), Duration::zero());

        let reward = game.perform_spin().unwrap();
        let state = game.state();
        assert_eq!(state.last_spin_time, Some(clock.now()));
        assert_eq!(state.total_spins, 1);
        assert_eq!(state.streak_days, 1);
        assert_eq!(state.rewards.len(), 1);
        assert_eq!(state.rewards[0], reward);
        assert!(!reward.claimed);
        if reward.kind == RewardKind::ScratchCard {
            assert_eq!(state.scratch_cards.len(), 1);
            assert!(!state.scratch_cards[0].revealed);
        } else {
            assert!(state.scratch_cards.is_empty());
        }
    }

    #[test]
    fn test_second_spin_within_cooldown_fails() {
        let (mut game, clock) = game(always(RewardKind::Nft));
        game.perform_spin().unwrap();
        clock.advance(Duration::hours(23));

        assert!(!game.can_spin());
        assert_eq!(game.time_until_next_spin(), Duration::hours(1));
        let err = game.perform_spin().unwrap_err();
        assert_eq!(err, Error::CooldownActive { remaining_secs: 3_600 });
        assert_eq!(game.state().total_spins, 1);
        assert_eq!(game.state().rewards.len(), 1);
    }

    #[test]
    fn test_cooldown_is_elapsed_time_not_calendar() {
        let (mut game, clock) = game(always(RewardKind::Nft));
        game.perform_spin().unwrap();
        clock.advance(Duration::hours(24));
        assert!(game.can_spin());
        game.perform_spin().unwrap();
        assert_eq!(game.state().total_spins, 2);
    }

    #[test]
    fn test_daily_spins_build_streak_then_reset() {
        let (mut game, clock) = game(always(RewardKind::Usdt));
        for day in 1..=4u64 {
            game.perform_spin().unwrap();
            assert_eq!(game.state().total_spins, day);
            assert_eq!(game.state().streak_days, day as u32);
            clock.advance(Duration::hours(24));
        }
        // Skip a day
        clock.advance(Duration::hours(24));
        game.perform_spin().unwrap();
        assert_eq!(game.state().streak_days, 1);
        assert_eq!(game.state().total_spins, 5);
    }

    #[test]
    fn test_streak_uses_calendar_days() {
        // 23:59 then 00:01 local time are consecutive days even two minutes apart
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let first = offset
            .with_ymd_and_hms(2024, 5, 10, 23, 59, 0)
            .unwrap()
            .with_timezone(&Utc);
        let clock = ManualClock::new(first, offset);
        let mut game = Game::new(
            spintoearn_core::GameState::default(),
            always(RewardKind::Replay),
            clock.clone(),
            StdRng::seed_from_u64(5),
        )
        .unwrap();

        game.perform_spin().unwrap();
        clock.advance(Duration::minutes(2));
        game.perform_spin().unwrap();
        assert_eq!(game.state().streak_days, 2);
    }

    #[test]
    fn test_unclaimed_replay_bypasses_cooldown() {
        let (mut game, clock) = game(always(RewardKind::Replay));
        let replay = game.perform_spin().unwrap();
        clock.advance(Duration::minutes(1));

        assert!(game.can_spin());
        assert_eq!(game.time_until_next_spin(), Duration::zero());
        game.perform_spin().unwrap();
        assert_eq!(game.state().total_spins, 2);
        // Manual policy leaves the replay unclaimed
        assert!(!game.state().find_reward(replay.id.as_str()).unwrap().claimed);
    }

    #[test]
    fn test_claimed_replay_no_longer_bypasses() {
        let (mut game, clock) = game(always(RewardKind::Replay));
        let replay = game.perform_spin().unwrap();
        game.claim_reward(replay.id.as_str()).unwrap();
        clock.advance(Duration::minutes(1));
        assert!(!game.can_spin());
    }

    #[test]
    fn test_consume_on_spin_policy() {
        let mut config = always(RewardKind::Replay);
        config.replay_policy = ReplayPolicy::ConsumeOnSpin;
        let (mut game, clock) = game(config);
        let first = game.perform_spin().unwrap();
        clock.advance(Duration::minutes(1));

        let second = game.perform_spin().unwrap();
        let state = game.state();
        assert!(state.find_reward(first.id.as_str()).unwrap().claimed);
        assert!(!state.find_reward(second.id.as_str()).unwrap().claimed);
    }

    #[test]
    fn test_consume_policy_keeps_replay_when_cooldown_elapsed() {
        let mut config = always(RewardKind::Replay);
        config.replay_policy = ReplayPolicy::ConsumeOnSpin;
        let (mut game, clock) = game(config);
        let first = game.perform_spin().unwrap();
        clock.advance(Duration::hours(25));
        game.perform_spin().unwrap();
        assert!(!game.state().find_reward(first.id.as_str()).unwrap().claimed);
    }

    #[test]
    fn test_scratchcard_reward_materializes_card() {
        let (mut game, _clock) = game(always(RewardKind::ScratchCard));
        let reward = game.perform_spin().unwrap();
        assert_eq!(reward.kind, RewardKind::ScratchCard);
        assert_eq!(game.state().scratch_cards.len(), 1);
        assert!(!game.state().scratch_cards[0].revealed);
        assert!(game.state().scratch_cards[0].reward.is_none());
    }

    #[test]
    fn test_same_day_replay_spin_keeps_streak() {
        let (mut game, clock) = game(always(RewardKind::Replay));
        game.perform_spin().unwrap();
        clock.advance(Duration::hours(1));
        game.perform_spin().unwrap();
        assert_eq!(game.state().streak_days, 1);
        assert_eq!(game.clock().now(), start() + Duration::hours(1));
    }

    #[test]
    fn test_far_future_last_spin_stays_on_cooldown() {
        let state = GameState {
            last_spin_time: Some(DateTime::<Utc>::MAX_UTC),
            ..GameState::default()
        };
        let clock = ManualClock::utc(start());
        let mut game = Game::new(state, GameConfig::default(), clock, StdRng::seed_from_u64(9)).unwrap();

        assert!(!game.can_spin());
        assert!(game.time_until_next_spin() > Duration::days(365));
        assert!(matches!(game.perform_spin(), Err(Error::CooldownActive { .. })));
    }

    #[test]
    fn test_longest_cooldown_is_enforced() {
        let config = GameConfig {
            spin_cooldown_secs: spintoearn_core::MAX_SPIN_COOLDOWN_SECS,
            ..always(RewardKind::Nft)
        };
        let (mut game, clock) = game(config);
        game.perform_spin().unwrap();

        clock.advance(Duration::days(364));
        let Err(Error::CooldownActive { remaining_secs }) = game.perform_spin() else {
            panic!("expected cooldown");
        };
        assert_eq!(remaining_secs, 86_400);
    }

    #[test]
    fn test_payout_that_rounds_to_zero_is_refused() {
        let mut config = always(RewardKind::Sol);
        config.spin_payouts.sol = spintoearn_core::PayoutRange::new(0.00001, 0.00004, 4);
        let result = Game::new(
            GameState::default(),
            config,
            ManualClock::utc(start()),
            StdRng::seed_from_u64(9),
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
