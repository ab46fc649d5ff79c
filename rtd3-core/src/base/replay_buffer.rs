//! Replay buffer interfaces.
use anyhow::Result;

/// Interface for buffers that store experiences from environments.
pub trait ExperienceBufferBase {
    /// The type of items stored in the buffer.
    type Item;

    /// Pushes a new item into the buffer.
    fn push(&mut self, item: Self::Item) -> Result<()>;

    /// Returns the current number of items in the buffer.
    fn len(&self) -> usize;

    /// Returns true if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interface for replay buffers that produce batches for training.
///
/// This trait is independent of [`ExperienceBufferBase`] and focuses solely
/// on batch generation.
pub trait ReplayBufferBase {
    /// Configuration parameters of the replay buffer.
    type Config: Clone;

    /// The type of batches produced for training.
    type Batch;

    /// Builds a replay buffer from the given configuration.
    fn build(config: &Self::Config) -> Self;

    /// Produces a batch for training.
    ///
    /// Fails when the buffer holds no experience; callers are responsible
    /// for checking occupancy first.
    fn batch(&mut self, size: usize) -> Result<Self::Batch>;
}
