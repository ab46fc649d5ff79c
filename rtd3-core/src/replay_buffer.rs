//! Episode-indexed replay buffer for recurrent training.
mod base;
mod config;

pub use base::EpisodeReplayBuffer;
pub use config::EpisodeReplayBufferConfig;
