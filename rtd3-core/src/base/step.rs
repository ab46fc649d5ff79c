//! Environment step.
use super::Env;

/// Additional information to observations and actions.
pub trait Info {}

impl Info for () {}

/// Represents the outcome of one environment step: the next observation,
/// the reward, and the terminal flag.
///
/// An environment emits a [`Step`] object at every interaction step. Episode
/// termination is a normal control-flow event, not an error.
pub struct Step<E: Env> {
    /// Observation after the step.
    pub obs: E::Obs,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if the episode is done.
    pub is_done: bool,

    /// Information defined by the user.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(obs: E::Obs, reward: f32, is_done: bool, info: E::Info) -> Self {
        Step {
            obs,
            reward,
            is_done,
            info,
        }
    }
}
