//! SpinToEarn Persistence - Key-value blob store and game snapshots

pub mod memory;
pub mod snapshot;
pub mod sqlite;

pub use memory::MemoryStore;
pub use snapshot::{
    clear_game_state, load_config, load_game_state, save_config, save_game_state, CONFIG_KEY,
    GAME_STATE_KEY,
};
pub use sqlite::Database;

use spintoearn_core::Result;

/// Opaque string blobs addressed by a fixed key
#[allow(async_fn_in_trait)]
pub trait BlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}
