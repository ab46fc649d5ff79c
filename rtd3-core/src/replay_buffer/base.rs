//! Generic implementation of an episode replay buffer.
use super::EpisodeReplayBufferConfig;
use crate::{
    base::{Episode, ExperienceBufferBase, ReplayBufferBase},
    error::Rtd3Error,
};
use anyhow::Result;
use rand::{rngs::StdRng, seq::index, SeedableRng};
use std::collections::VecDeque;

/// A bounded collection of complete episodes.
///
/// Episodes are stored whole because recurrent training replays them
/// step-by-step with a carried hidden state; sampling individual transitions
/// would break the sequence. Once the capacity is exceeded, the oldest
/// episodes are evicted first.
///
/// Sampling draws the requested slots uniformly at random without
/// replacement within one call, so a single batch never contains the same
/// stored episode twice; duplicates across calls are expected.
pub struct EpisodeReplayBuffer<O, A> {
    /// Maximum number of stored episodes.
    capacity: usize,

    /// Stored episodes, oldest first.
    episodes: VecDeque<Episode<O, A>>,

    /// Random number generator for sampling.
    rng: StdRng,
}

impl<O, A> ExperienceBufferBase for EpisodeReplayBuffer<O, A>
where
    O: Clone,
    A: Clone,
{
    type Item = Episode<O, A>;

    /// Appends one completed episode, evicting the oldest stored episodes
    /// while over capacity.
    ///
    /// An episode without transitions is rejected: replaying it later would
    /// produce a degenerate gradient step.
    fn push(&mut self, episode: Self::Item) -> Result<()> {
        if episode.is_empty() {
            return Err(Rtd3Error::EmptyEpisode.into());
        }

        self.episodes.push_back(episode);
        while self.episodes.len() > self.capacity {
            self.episodes.pop_front();
        }

        Ok(())
    }

    fn len(&self) -> usize {
        self.episodes.len()
    }
}

impl<O, A> ReplayBufferBase for EpisodeReplayBuffer<O, A>
where
    O: Clone,
    A: Clone,
{
    type Config = EpisodeReplayBufferConfig;
    type Batch = Vec<Episode<O, A>>;

    fn build(config: &Self::Config) -> Self {
        Self {
            capacity: config.capacity,
            episodes: VecDeque::with_capacity(config.capacity.min(1024)),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Samples up to `size` distinct episodes uniformly at random.
    ///
    /// The request is clamped to the number of stored episodes. Fails when
    /// the buffer holds no episode.
    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        if self.episodes.is_empty() {
            return Err(Rtd3Error::EmptyReplayBuffer.into());
        }

        let amount = size.min(self.episodes.len());
        Ok(index::sample(&mut self.rng, self.episodes.len(), amount)
            .into_iter()
            .map(|ix| self.episodes[ix].clone())
            .collect())
    }
}
