//! Environment.
use super::Step;
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// Observations and actions are fixed-dimension numeric vectors. Rescaling
/// an action to the valid range of the underlying dynamics is the
/// responsibility of the environment (or an environment wrapper), not of the
/// trainer.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Clone;

    /// Action of the environment.
    type Act: Clone;

    /// Information attached to a [`Step`] object.
    type Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: u64) -> Result<Self>
    where
        Self: Sized;

    /// Performs an environment step.
    fn step(&mut self, act: &Self::Act) -> Step<Self>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;
}
