//! Model layer for a Twitch desktop client: live-stream snapshots,
//! the Helix wire adapter, and the poll-driven refresh cycle.

pub mod models;
pub mod services;
