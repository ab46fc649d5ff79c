//! A recurrent TD3 agent implemented with [tch](https://crates.io/crates/tch).
//!
//! The agent holds six function approximators (twin critics, an actor, and
//! their slowly-tracking target copies), each an LSTM-backed network whose
//! recurrent state is threaded explicitly through consecutive timesteps of
//! one episode.
mod device;
pub mod lstm;
pub mod model;
pub mod opt;
pub mod td3;
pub mod util;

pub use device::Device;
