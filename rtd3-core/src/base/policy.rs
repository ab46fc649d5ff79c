//! Recurrent policy.
use super::Env;

/// A policy whose action depends on the history of the current episode.
///
/// The recurrent state is threaded explicitly: each call consumes the state
/// produced by the previous call within the same episode and returns the
/// successor state. A fresh state from
/// [`initial_hidden`](RecurrentPolicy::initial_hidden) must be used at every
/// episode start. Reusing a state across episodes, or skipping a timestep,
/// corrupts the recurrent context and is a correctness bug.
pub trait RecurrentPolicy<E: Env> {
    /// Recurrent state carried between consecutive steps of one episode.
    type Hidden;

    /// Returns the zeroed recurrent state for an episode start.
    fn initial_hidden(&self) -> Self::Hidden;

    /// Samples an action given an observation and the previous action.
    ///
    /// In training mode this may add exploration noise, clipped to the valid
    /// action range; in evaluation mode the policy is deterministic.
    fn sample(
        &mut self,
        obs: &E::Obs,
        last_act: &E::Act,
        hidden: &Self::Hidden,
    ) -> (E::Act, Self::Hidden);

    /// Returns an action drawn uniformly at random from the valid range.
    ///
    /// Used before any learning signal is available.
    fn sample_uniform(&mut self) -> E::Act;
}
