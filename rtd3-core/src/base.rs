//! Basic traits and types.
mod agent;
mod env;
mod episode;
mod policy;
mod replay_buffer;
mod step;

pub use agent::Agent;
pub use env::Env;
pub use episode::{Episode, Transition};
pub use policy::RecurrentPolicy;
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
pub use step::{Info, Step};
