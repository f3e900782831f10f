pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod ids;
pub mod models;
pub mod prompts;
pub mod retry;
pub mod service;
pub mod session;
pub mod transport;
pub mod validation;

pub use crate::client::GenerationClient;
pub use crate::config::Config;
pub use crate::error::{Result, WellnessError};
pub use crate::models::{TipDetail, UserProfile, WellnessTip};
pub use crate::service::WellnessService;
pub use crate::session::{Screen, SessionStore};
