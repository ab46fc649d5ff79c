//! Configuration of [`Td3`](super::Td3).
use super::{ActorConfig, CriticConfig};
use crate::{util::OutDim, Device};
use anyhow::Result;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Td3`](super::Td3).
///
/// `Q` and `P` are the configuration types of the critic and actor
/// submodels.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct Td3Config<Q, P>
where
    Q: OutDim,
    P: OutDim,
{
    /// Configuration of the actor, shared by both the online actor and its
    /// target.
    pub actor_config: ActorConfig<P>,

    /// Configuration of each of the twin critics and their targets.
    pub critic_config: CriticConfig<Q>,

    /// Discount factor.
    pub gamma: f64,

    /// Soft update coefficient of the target networks.
    pub tau: f64,

    /// Number of optimization steps between two actor/target updates.
    pub policy_delay: usize,

    /// Scale of the Gaussian exploration noise added during rollouts.
    pub explore_noise_scale: f64,

    /// Half-width of the symmetric valid action range.
    pub act_limit: f64,

    /// Scaling applied to rewards when forming the Bellman target.
    pub reward_scale: f64,

    /// Number of episodes replayed per optimization step.
    pub batch_size: usize,

    /// Minimum number of stored episodes before optimization starts.
    pub min_episodes_warmup: usize,

    /// Initial training mode.
    pub train: bool,

    /// Seed of the torch RNG.
    pub seed: Option<i64>,

    /// Device on which the networks are allocated.
    pub device: Option<Device>,
}

impl<Q, P> Default for Td3Config<Q, P>
where
    Q: OutDim,
    P: OutDim,
{
    fn default() -> Self {
        Self {
            actor_config: ActorConfig::default(),
            critic_config: CriticConfig::default(),
            gamma: 0.9,
            tau: 1e-2,
            policy_delay: 1,
            explore_noise_scale: 0.1,
            act_limit: 1.0,
            reward_scale: 1.0,
            batch_size: 1,
            min_episodes_warmup: 2,
            train: false,
            seed: None,
            device: None,
        }
    }
}

impl<Q, P> Td3Config<Q, P>
where
    Q: DeserializeOwned + Serialize + OutDim + Clone,
    P: DeserializeOwned + Serialize + OutDim + Clone,
{
    /// Sets the configuration of the actor.
    pub fn actor_config(mut self, actor_config: ActorConfig<P>) -> Self {
        self.actor_config = actor_config;
        self
    }

    /// Sets the configuration of the critics.
    pub fn critic_config(mut self, critic_config: CriticConfig<Q>) -> Self {
        self.critic_config = critic_config;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the soft update coefficient.
    pub fn tau(mut self, v: f64) -> Self {
        self.tau = v;
        self
    }

    /// Sets the actor/target update interval.
    pub fn policy_delay(mut self, v: usize) -> Self {
        self.policy_delay = v;
        self
    }

    /// Sets the scale of the exploration noise.
    pub fn explore_noise_scale(mut self, v: f64) -> Self {
        self.explore_noise_scale = v;
        self
    }

    /// Sets the half-width of the valid action range.
    pub fn act_limit(mut self, v: f64) -> Self {
        self.act_limit = v;
        self
    }

    /// Sets the reward scaling.
    pub fn reward_scale(mut self, v: f64) -> Self {
        self.reward_scale = v;
        self
    }

    /// Sets the number of episodes replayed per optimization step.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the number of stored episodes required before optimization.
    pub fn min_episodes_warmup(mut self, v: usize) -> Self {
        self.min_episodes_warmup = v;
        self
    }

    /// Sets the initial training mode.
    pub fn train(mut self, v: bool) -> Self {
        self.train = v;
        self
    }

    /// Sets the seed of the torch RNG.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = Some(v);
        self
    }

    /// Sets the device.
    pub fn device(mut self, v: Device) -> Self {
        self.device = Some(v);
        self
    }

    /// Constructs [`Td3Config`] from yaml file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`Td3Config`] to yaml file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of TD3 agent to {}", path.to_string_lossy());
        Ok(())
    }
}
