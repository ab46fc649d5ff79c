//! Train a recurrent TD3 agent on pure-Rust control environments.
pub mod env;
pub mod recorder;
