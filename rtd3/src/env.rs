//! Control environments and environment wrappers.
mod norm;
mod pendulum;
mod reacher;
mod vec;
pub use norm::{NormalizedActConfig, NormalizedActEnv};
pub use pendulum::{PendulumConfig, PendulumEnv};
pub use reacher::{ReacherConfig, ReacherEnv};
pub use vec::{ActVec, ObsVec};
