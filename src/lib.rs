//! wg-nord - NordVPN WireGuard profile generator and tunnel manager
//!
//! Fetches server metadata from the NordVPN directory API, renders
//! `wg-quick` configuration profiles for the best recommended server, and
//! manages activation of saved profiles through the external `wg-quick`
//! tool.
//!
//! # Architecture
//!
//! - `config`: Application settings (TOML)
//! - `api`: Directory API client (servers, countries)
//! - `keys`: Key-pair generation via the external `wg` tool
//! - `profile`: Profile rendering and persistence
//! - `tunnel`: External tunnel manager integration (`wg-quick`)
//! - `store`: Saved-profile store and activation state

pub mod api;
pub mod config;
pub mod keys;
pub mod profile;
pub mod store;
pub mod tunnel;

pub use config::Config;
pub use store::{ConfigStore, TunnelStatus};
