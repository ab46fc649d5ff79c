//! Errors in the library.
use thiserror::Error;

/// Errors raised by the core library and its downstream agents.
#[derive(Debug, Error)]
pub enum Rtd3Error {
    /// Sampling was attempted on a replay buffer holding no episode.
    ///
    /// Callers are expected to check buffer occupancy before sampling.
    #[error("replay buffer holds no episode")]
    EmptyReplayBuffer,

    /// An episode without transitions was pushed or replayed.
    ///
    /// Replaying a zero-length episode would produce a degenerate gradient
    /// step, so it is rejected instead.
    #[error("episode has no transitions")]
    EmptyEpisode,

    /// An accumulated loss left the finite range.
    ///
    /// Signals training divergence; the optimizer step is aborted rather
    /// than applied.
    #[error("non-finite loss in optimization step ({0})")]
    NonFiniteLoss(f64),

    /// Key was not found in a record.
    #[error("key {0} was not found in the record")]
    RecordKeyError(String),

    /// Type of a record value did not match the accessor.
    #[error("record value type mismatch, expected {0}")]
    RecordValueTypeError(String),
}
