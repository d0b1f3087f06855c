// src/core/mod.rs
//! HTTP client, configuration, token storage and polling shared by every service

pub mod config_manager;
pub mod poller;
pub mod service_client;
pub mod token_store;

pub use config_manager::{ClientConfig, ConfigManager};
pub use poller::{poll_until, PollOutcome, PollPolicy, PollStep};
pub use service_client::ApiClient;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
