//! Recurrent action-value network.
mod base;
mod config;
pub use base::Critic;
pub use config::CriticConfig;
