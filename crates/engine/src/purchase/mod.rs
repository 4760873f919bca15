//! Paid scratch cards
//!
//! The only flow that touches the network: pay the card price from the
//! connected wallet, then add a paid card. The payment is awaited first and
//! the game transition happens afterwards in one synchronous step. Nothing
//! reconciles the transfer with the card beyond this ordering.

use crate::clock::Clock;
use crate::game::Game;
use crate::wallet::{Chain, TransferRequest, Wallet, WalletError, WalletProvider};
use rand::Rng;
use spintoearn_core::{CardPricing, Error, ScratchCard};
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PurchaseError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Game(#[from] Error),

    #[error("No treasury address configured for {0} payments")]
    PaymentNotConfigured(Chain),
}

/// Price and destination for one card on a chain
#[derive(Debug, Clone, PartialEq)]
pub struct CardQuote {
    pub chain: Chain,
    pub price: f64,
    pub treasury: String,
}

impl CardQuote {
    pub fn for_chain(pricing: &CardPricing, chain: Chain) -> Result<Self, PurchaseError> {
        let (price, treasury) = match chain {
            Chain::Solana => (pricing.sol, pricing.sol_treasury.as_ref()),
            Chain::Ethereum => (pricing.eth, pricing.eth_treasury.as_ref()),
        };
        let treasury = treasury
            .filter(|t| !t.trim().is_empty())
            .ok_or(PurchaseError::PaymentNotConfigured(chain))?;
        Ok(Self {
            chain,
            price,
            treasury: treasury.clone(),
        })
    }
}

/// A bought card and the transfer that paid for it
#[derive(Debug, Clone, PartialEq)]
pub struct PaidCard {
    pub card: ScratchCard,
    pub signature: String,
    pub price: f64,
    pub chain: Chain,
}

/// Pay for and add one scratch card
pub async fn buy_scratch_card<P, C, R>(
    game: &mut Game<C, R>,
    wallet: &mut Wallet<P>,
) -> Result<PaidCard, PurchaseError>
where
    P: WalletProvider,
    C: Clock,
    R: Rng,
{
    let (chain, from) = match wallet.session() {
        Some(session) => (session.kind.chain(), session.address.clone()),
        None => return Err(WalletError::NotConnected.into()),
    };
    let quote = CardQuote::for_chain(&game.config().card_price, chain)?;

    let available = wallet.refresh_balance().await?;
    if available < quote.price {
        return Err(WalletError::InsufficientFunds {
            required: quote.price,
            available,
        }
        .into());
    }

    let transfer = TransferRequest {
        chain,
        from,
        to: quote.treasury.clone(),
        amount: quote.price,
    };
    let signature = match wallet.send(&transfer).await {
        Ok(sig) => sig,
        Err(e) => {
            error!("Card payment failed: {}", e);
            return Err(e.into());
        }
    };
    info!("Card payment sent: {} {} ({})", quote.price, chain, signature);

    let card = game.add_scratch_card(true)?;
    Ok(PaidCard {
        card,
        signature,
        price: quote.price,
        chain,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::wallet::test_support::FakeProvider;
    use crate::wallet::WalletKind;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use spintoearn_core::{CardSource, GameConfig, GameState};

    fn game_with_treasury() -> Game<ManualClock, StdRng> {
        let mut config = GameConfig::default();
        config.card_price.sol_treasury = Some("TreasurySol".to_string());
        Game::new(
            GameState::default(),
            config,
            ManualClock::utc(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            StdRng::seed_from_u64(3),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_buy_card_with_sol() {
        let mut game = game_with_treasury();
        let mut wallet = Wallet::new(FakeProvider::mainnet(1.0));
        wallet.connect(WalletKind::Phantom).await.unwrap();

        let paid = buy_scratch_card(&mut game, &mut wallet).await.unwrap();
        assert_eq!(paid.chain, Chain::Solana);
        assert_eq!(paid.price, 0.1);
        assert_eq!(paid.card.source, CardSource::Paid);
        assert_eq!(game.state().scratch_cards.len(), 1);
        assert_eq!(game.state().free_cards_this_week, 0);
    }

    #[tokio::test]
    async fn test_insufficient_funds_adds_nothing() {
        let mut game = game_with_treasury();
        let mut wallet = Wallet::new(FakeProvider::mainnet(0.05));
        wallet.connect(WalletKind::Phantom).await.unwrap();

        let err = buy_scratch_card(&mut game, &mut wallet).await.unwrap_err();
        assert!(matches!(
            err,
            PurchaseError::Wallet(WalletError::InsufficientFunds { .. })
        ));
        assert!(game.state().scratch_cards.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_signature_adds_nothing() {
        let mut game = game_with_treasury();
        let provider = FakeProvider {
            reject: true,
            ..FakeProvider::mainnet(5.0)
        };
        let mut wallet = Wallet::new(provider);
        wallet.connect(WalletKind::Phantom).await.unwrap();

        let err = buy_scratch_card(&mut game, &mut wallet).await.unwrap_err();
        assert_eq!(err, PurchaseError::Wallet(WalletError::Rejected));
        assert!(game.state().scratch_cards.is_empty());
    }

    #[tokio::test]
    async fn test_missing_treasury() {
        let mut game = game_with_treasury();
        let mut wallet = Wallet::new(FakeProvider::mainnet(5.0));
        wallet.connect(WalletKind::MetaMask).await.unwrap();

        let err = buy_scratch_card(&mut game, &mut wallet).await.unwrap_err();
        assert_eq!(err, PurchaseError::PaymentNotConfigured(Chain::Ethereum));
    }

    #[tokio::test]
    async fn test_requires_connection() {
        let mut game = game_with_treasury();
        let mut wallet = Wallet::new(FakeProvider::mainnet(5.0));
        let err = buy_scratch_card(&mut game, &mut wallet).await.unwrap_err();
        assert_eq!(err, PurchaseError::Wallet(WalletError::NotConnected));
    }
}
