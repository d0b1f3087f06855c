//! Client for the CV tailoring API gateway: accounts, Career Ark imports,
//! tailoring sessions, job tracking and user settings.

pub mod api;
pub mod auth;
pub mod core;
pub mod error;
pub mod import;
pub mod state;
pub mod types;
pub mod utils;

pub use crate::auth::{AuthGuard, SessionEvent, SessionEvents, TokenCheck};
pub use crate::core::{ApiClient, ClientConfig, ConfigManager};
pub use crate::error::{ApiError, Result};
pub use crate::import::{CvImport, ImportOutcome, ImportProgress};
pub use crate::state::Loadable;
