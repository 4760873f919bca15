//! SQLite-backed blob store

mod connection;
mod kv;

pub use connection::Database;
pub use kv::*;
