//! Recurrent policy network.
mod base;
mod config;
pub use base::Actor;
pub use config::ActorConfig;
