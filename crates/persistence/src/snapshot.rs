//! Game state and configuration snapshots
//!
//! The whole aggregate is written as one JSON blob under a fixed key. There is
//! no schema version; clearing the key wipes all history.

use crate::BlobStore;
use spintoearn_core::{GameConfig, GameState, Result};
use tracing::{debug, info};

/// Fixed key of the game state blob
pub const GAME_STATE_KEY: &str = "spintoearn-game-state";

/// Fixed key of the game configuration blob
pub const CONFIG_KEY: &str = "spintoearn-config";

/// Restore the game state, or first-load defaults when nothing is stored
pub async fn load_game_state<S: BlobStore>(store: &S) -> Result<GameState> {
    let Some(json) = store.get(GAME_STATE_KEY).await? else {
        debug!("No stored game state, starting fresh");
        return Ok(GameState::default());
    };

    let state: GameState = serde_json::from_str(&json)?;
    state.validate()?;
    debug!(
        "Restored game state: {} spin(s), {} reward(s), {} card(s)",
        state.total_spins,
        state.rewards.len(),
        state.scratch_cards.len()
    );
    Ok(state)
}

/// Write the full snapshot
pub async fn save_game_state<S: BlobStore>(store: &S, state: &GameState) -> Result<()> {
    let json = serde_json::to_string(state)?;
    store.put(GAME_STATE_KEY, &json).await?;
    debug!("Game state saved ({} bytes)", json.len());
    Ok(())
}

/// Store reset: drop the snapshot entirely
pub async fn clear_game_state<S: BlobStore>(store: &S) -> Result<()> {
    store.remove(GAME_STATE_KEY).await?;
    info!("Stored game state cleared");
    Ok(())
}

/// Load the saved configuration, falling back to defaults
pub async fn load_config<S: BlobStore>(store: &S) -> Result<GameConfig> {
    match store.get(CONFIG_KEY).await? {
        Some(json) => {
            let config: GameConfig = serde_json::from_str(&json)?;
            config.validate()?;
            Ok(config)
        }
        None => Ok(GameConfig::default()),
    }
}

pub async fn save_config<S: BlobStore>(store: &S, config: &GameConfig) -> Result<()> {
    config.validate()?;
    let json = serde_json::to_string(config)?;
    store.put(CONFIG_KEY, &json).await?;
    info!("Game configuration saved");
    Ok(())
}
