//! Agent.
use super::{Env, ExperienceBufferBase, RecurrentPolicy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable recurrent policy on an environment.
pub trait Agent<E, R>: RecurrentPolicy<E>
where
    E: Env,
    R: ExperienceBufferBase + ReplayBufferBase,
{
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step.
    ///
    /// `buffer` is a replay buffer from which episodes will be sampled for
    /// updating model parameters. Returns `None` while the buffer holds too
    /// few episodes; a failed step (for example, a non-finite loss) is
    /// surfaced through the inner `Result`.
    fn opt(&mut self, buffer: &mut R) -> Option<Result<Record>>;

    /// Saves the learnable networks under the given path prefix.
    ///
    /// Each network is written as a separate parameter blob keyed by the
    /// prefix plus a role suffix. Target networks are not persisted; they
    /// are rederivable from the saved sources.
    fn save_params(&self, path_prefix: &Path) -> Result<()>;

    /// Loads the learnable networks from the given path prefix.
    ///
    /// Target networks are re-initialized from the loaded sources. A shape
    /// mismatch fails immediately, without a partial load.
    fn load_params(&mut self, path_prefix: &Path) -> Result<()>;
}
