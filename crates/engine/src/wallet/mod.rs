//! Wallet boundary
//!
//! The game never talks to a chain itself. A [`WalletProvider`] is supplied
//! by the host (browser extension bridge, test double, ...) and [`Wallet`]
//! tracks the connected session on top of it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// Supported wallet extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    Phantom,
    MetaMask,
    TrustWallet,
}

impl WalletKind {
    pub fn chain(&self) -> Chain {
        match self {
            WalletKind::Phantom => Chain::Solana,
            WalletKind::MetaMask | WalletKind::TrustWallet => Chain::Ethereum,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WalletKind::Phantom => "Phantom",
            WalletKind::MetaMask => "MetaMask",
            WalletKind::TrustWallet => "Trust Wallet",
        }
    }
}

/// Chain a wallet pays on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Solana,
    Ethereum,
}

impl Chain {
    /// Chain id reported on mainnet
    pub fn mainnet_id(&self) -> u64 {
        match self {
            Chain::Solana => 101,
            Chain::Ethereum => 1,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Chain::Solana => "SOL",
            Chain::Ethereum => "ETH",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Connected wallet as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSession {
    pub kind: WalletKind,
    pub address: String,
    /// Native balance (SOL or ETH)
    pub balance: f64,
    pub chain_id: u64,
}

/// Native value transfer to sign and submit
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub chain: Chain,
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Wallet and network failures, kept apart from game rule errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalletError {
    #[error("Please install {0} to continue")]
    NotInstalled(&'static str),

    #[error("Wrong network: expected chain {expected}, wallet is on {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("No wallet connected")]
    NotConnected,

    #[error("Request rejected by the user")]
    Rejected,

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("Wallet transport error: {0}")]
    Transport(String),
}

/// Host-supplied bridge to a wallet extension
#[allow(async_fn_in_trait)]
pub trait WalletProvider {
    /// Prompt the extension for an account
    async fn connect(&mut self, kind: WalletKind) -> Result<WalletSession, WalletError>;

    async fn disconnect(&mut self);

    /// Current native balance of `address`
    async fn balance(&self, address: &str) -> Result<f64, WalletError>;

    /// Sign and broadcast a transfer, returning its signature / hash
    async fn sign_and_send(&mut self, transfer: &TransferRequest) -> Result<String, WalletError>;
}

/// Result of checking whether an action may proceed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Ready(String),
    /// The caller should prompt for a wallet connection
    WalletRequired,
}

impl Gate {
    pub fn from_address(address: Option<&str>) -> Self {
        match address {
            Some(a) if !a.trim().is_empty() => Gate::Ready(a.trim().to_string()),
            _ => Gate::WalletRequired,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Gate::Ready(_))
    }
}

/// Connection state over a provider
pub struct Wallet<P: WalletProvider> {
    provider: P,
    session: Option<WalletSession>,
}

impl<P: WalletProvider> Wallet<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            session: None,
        }
    }

    /// Connect and require mainnet for the wallet's chain
    pub async fn connect(&mut self, kind: WalletKind) -> Result<&WalletSession, WalletError> {
        let session = self.provider.connect(kind).await?;

        let expected = kind.chain().mainnet_id();
        if session.chain_id != expected {
            warn!(
                "{} connected on chain {} (expected {})",
                kind.display_name(),
                session.chain_id,
                expected
            );
            self.provider.disconnect().await;
            return Err(WalletError::WrongNetwork {
                expected,
                actual: session.chain_id,
            });
        }

        info!("{} connected: {}", kind.display_name(), session.address);
        Ok(self.session.insert(session))
    }

    pub async fn disconnect(&mut self) {
        if self.session.take().is_some() {
            self.provider.disconnect().await;
            info!("Wallet disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&WalletSession> {
        self.session.as_ref()
    }

    pub fn address(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.address.as_str())
    }

    pub fn gate(&self) -> Gate {
        Gate::from_address(self.address())
    }

    /// Re-read the balance from the provider
    pub async fn refresh_balance(&mut self) -> Result<f64, WalletError> {
        let address = self.address().ok_or(WalletError::NotConnected)?.to_string();
        let balance = self.provider.balance(&address).await?;
        if let Some(session) = self.session.as_mut() {
            session.balance = balance;
        }
        Ok(balance)
    }

    pub async fn send(&mut self, transfer: &TransferRequest) -> Result<String, WalletError> {
        if !self.is_connected() {
            return Err(WalletError::NotConnected);
        }
        self.provider.sign_and_send(transfer).await
    }
}
