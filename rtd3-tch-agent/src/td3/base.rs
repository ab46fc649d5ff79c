//! TD3 agent with recurrent function approximators.
use super::{Actor, Critic, Td3Config};
use crate::{
    model::{ModelBase, SubModel2Rnn, SubModel3Rnn},
    util::{track, OutDim},
};
use anyhow::{Context, Result};
use log::trace;
use rtd3_core::{
    error::Rtd3Error,
    record::{Record, RecordValue},
    Agent, Env, Episode, ExperienceBufferBase, RecurrentPolicy, ReplayBufferBase,
};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    marker::PhantomData,
    path::{Path, PathBuf},
};
use tch::{nn::LSTMState, no_grad, Kind, Tensor};

fn suffixed(prefix: &Path, suffix: &str) -> PathBuf {
    let mut stem = prefix.as_os_str().to_os_string();
    stem.push(suffix);
    PathBuf::from(stem)
}

/// Twin delayed deep deterministic policy gradient with recurrent networks.
///
/// Six function approximators are held: twin critics, their targets, an
/// actor and its target. Targets start as exact copies of their sources and
/// trail them by soft updates. Each optimization step replays sampled
/// episodes timestep by timestep, threading one recurrent state per online
/// network; the target networks are seeded with the online networks'
/// post-step states of the same timestep.
pub struct Td3<E, Q, P, R>
where
    E: Env,
    Q: SubModel3Rnn<Output = Tensor>,
    P: SubModel2Rnn<Output = Tensor>,
    E::Obs: Into<Tensor>,
    E::Act: Into<Tensor> + From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
    P::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    pub(super) critic1: Critic<Q>,
    pub(super) critic2: Critic<Q>,
    pub(super) critic1_tgt: Critic<Q>,
    pub(super) critic2_tgt: Critic<Q>,
    pub(super) actor: Actor<P>,
    pub(super) actor_tgt: Actor<P>,
    gamma: f64,
    tau: f64,
    policy_delay: usize,
    explore_noise_scale: f64,
    act_limit: f64,
    reward_scale: f64,
    batch_size: usize,
    min_episodes_warmup: usize,
    update_cnt: usize,
    train: bool,
    act_dim: i64,
    device: tch::Device,
    phantom: PhantomData<(E, R)>,
}

impl<E, Q, P, R> Td3<E, Q, P, R>
where
    E: Env,
    Q: SubModel3Rnn<Output = Tensor>,
    P: SubModel2Rnn<Output = Tensor>,
    E::Obs: Into<Tensor>,
    E::Act: Into<Tensor> + From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
    P::Config: DeserializeOwned + Serialize + OutDim + Clone,
    R: ExperienceBufferBase<Item = Episode<E::Obs, E::Act>>
        + ReplayBufferBase<Batch = Vec<Episode<E::Obs, E::Act>>>,
{
    /// Constructs the agent.
    ///
    /// The two critics start from independent random initializations; each
    /// target starts as an exact copy of its source.
    pub fn build(config: Td3Config<Q::Config, P::Config>) -> Result<Self> {
        let device: tch::Device = config
            .device
            .map(Into::into)
            .unwrap_or_else(tch::Device::cuda_if_available);
        if let Some(seed) = config.seed {
            tch::manual_seed(seed);
        }
        let act_dim = config
            .actor_config
            .pi_config
            .as_ref()
            .context("pi_config is not set")?
            .get_out_dim();

        let critic1: Critic<Q> = Critic::build(config.critic_config.clone(), device)?;
        let critic2: Critic<Q> = Critic::build(config.critic_config, device)?;
        let critic1_tgt = critic1.clone();
        let critic2_tgt = critic2.clone();
        let actor: Actor<P> = Actor::build(config.actor_config, device)?;
        let actor_tgt = actor.clone();

        Ok(Self {
            critic1,
            critic2,
            critic1_tgt,
            critic2_tgt,
            actor,
            actor_tgt,
            gamma: config.gamma,
            tau: config.tau,
            policy_delay: config.policy_delay,
            explore_noise_scale: config.explore_noise_scale,
            act_limit: config.act_limit,
            reward_scale: config.reward_scale,
            batch_size: config.batch_size,
            min_episodes_warmup: config.min_episodes_warmup,
            update_cnt: 0,
            train: config.train,
            act_dim,
            device,
            phantom: PhantomData,
        })
    }

    /// Replays the sampled episodes and applies one optimizer step to each
    /// online network due for an update.
    fn opt_(&mut self, buffer: &mut R) -> Result<Record> {
        let episodes = buffer.batch(self.batch_size)?;
        let delayed = self.update_cnt % self.policy_delay == 0;

        let mut loss_critic1 = Tensor::zeros(&[], (Kind::Float, self.device));
        let mut loss_critic2 = Tensor::zeros(&[], (Kind::Float, self.device));
        let mut loss_actor = Tensor::zeros(&[], (Kind::Float, self.device));
        let mut q1_pred = 0f32;

        for episode in episodes.iter() {
            if episode.is_empty() {
                return Err(Rtd3Error::EmptyEpisode.into());
            }

            let mut pi_state = self.actor.initial_state(1);
            let mut q1_state = self.critic1.initial_state(1);
            let mut q2_state = self.critic2.initial_state(1);

            for tr in episode.iter() {
                let obs: Tensor = tr.obs.clone().into();
                let act: Tensor = tr.act.clone().into();
                let last_act: Tensor = tr.last_act.clone().into();
                let next_obs: Tensor = tr.next_obs.clone().into();
                let reward = Tensor::from_slice(&[tr.reward]).unsqueeze(0).to(self.device);
                let not_done = if tr.is_done { 0f64 } else { 1f64 };

                let (q1, q1_out) = self.critic1.forward(&obs, &act, &last_act, &q1_state);
                let (q2, q2_out) = self.critic2.forward(&obs, &act, &last_act, &q2_state);
                let (new_act, pi_out) = self.actor.forward(&obs, &last_act, &pi_state);
                let new_act = self.act_limit * new_act;

                // Target networks are seeded with the online networks'
                // post-step recurrent states of the same timestep.
                let (next_act_tgt, _) = self.actor_tgt.forward(&next_obs, &act, &pi_out);
                let next_act_tgt = self.act_limit * next_act_tgt;
                let (q1_tgt, _) =
                    self.critic1_tgt
                        .forward(&next_obs, &next_act_tgt, &act, &q1_out);
                let (q2_tgt, _) =
                    self.critic2_tgt
                        .forward(&next_obs, &next_act_tgt, &act, &q2_out);
                let q_tgt_min = q1_tgt.min_other(&q2_tgt);

                // Terminal steps truncate the bootstrap to the bare reward.
                let q_tgt =
                    (self.reward_scale * &reward + (not_done * self.gamma) * &q_tgt_min).detach();

                q1_pred = q1.mean(Kind::Float).double_value(&[]) as f32;
                loss_critic1 = loss_critic1 + (&q1 - &q_tgt).square().mean(Kind::Float);
                loss_critic2 = loss_critic2 + (&q2 - &q_tgt).square().mean(Kind::Float);

                if delayed {
                    // The policy loss evaluates the new action with the
                    // critic's pre-step recurrent state of this timestep.
                    let (q_new, _) = self.critic1.forward(&obs, &new_act, &last_act, &q1_state);
                    loss_actor = loss_actor - q_new.mean(Kind::Float);
                }

                pi_state = pi_out;
                q1_state = q1_out;
                q2_state = q2_out;
            }
        }

        let loss_critic1_v = loss_critic1.double_value(&[]);
        let loss_critic2_v = loss_critic2.double_value(&[]);
        if !loss_critic1_v.is_finite() {
            return Err(Rtd3Error::NonFiniteLoss(loss_critic1_v).into());
        }
        if !loss_critic2_v.is_finite() {
            return Err(Rtd3Error::NonFiniteLoss(loss_critic2_v).into());
        }

        self.critic1.backward_step(&loss_critic1);
        self.critic2.backward_step(&loss_critic2);

        let loss_actor_v = loss_actor.double_value(&[]);
        if delayed {
            if !loss_actor_v.is_finite() {
                return Err(Rtd3Error::NonFiniteLoss(loss_actor_v).into());
            }
            self.actor.backward_step(&loss_actor);
            track(&mut self.critic1_tgt, &self.critic1, self.tau);
            track(&mut self.critic2_tgt, &self.critic2, self.tau);
            track(&mut self.actor_tgt, &self.actor, self.tau);
        }

        self.update_cnt += 1;
        trace!("Td3.opt_(), update_cnt = {}", self.update_cnt);

        Ok(Record::from_slice(&[
            (
                "loss_critic1",
                RecordValue::Scalar(loss_critic1_v as f32),
            ),
            (
                "loss_critic2",
                RecordValue::Scalar(loss_critic2_v as f32),
            ),
            ("loss_actor", RecordValue::Scalar(loss_actor_v as f32)),
            ("q1_pred", RecordValue::Scalar(q1_pred)),
        ]))
    }
}

impl<E, Q, P, R> RecurrentPolicy<E> for Td3<E, Q, P, R>
where
    E: Env,
    Q: SubModel3Rnn<Output = Tensor>,
    P: SubModel2Rnn<Output = Tensor>,
    E::Obs: Into<Tensor>,
    E::Act: Into<Tensor> + From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
    P::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    type Hidden = LSTMState;

    fn initial_hidden(&self) -> LSTMState {
        self.actor.initial_state(1)
    }

    fn sample(&mut self, obs: &E::Obs, last_act: &E::Act, hidden: &LSTMState) -> (E::Act, LSTMState) {
        let obs: Tensor = obs.clone().into();
        let last_act: Tensor = last_act.clone().into();
        let (act, hidden) = no_grad(|| {
            let (act, hidden) = self.actor.forward(&obs, &last_act, hidden);
            let act = self.act_limit * act;
            let act = if self.train {
                let noise = self.explore_noise_scale
                    * Tensor::randn(&act.size(), (Kind::Float, self.device));
                (act + noise).clamp(-self.act_limit, self.act_limit)
            } else {
                act
            };
            (act, hidden)
        });
        (act.into(), hidden)
    }

    fn sample_uniform(&mut self) -> E::Act {
        let act = Tensor::rand(&[1, self.act_dim], (Kind::Float, self.device));
        let act: Tensor = self.act_limit * (2.0 * act - 1.0);
        act.into()
    }
}

impl<E, Q, P, R> Agent<E, R> for Td3<E, Q, P, R>
where
    E: Env,
    Q: SubModel3Rnn<Output = Tensor>,
    P: SubModel2Rnn<Output = Tensor>,
    E::Obs: Into<Tensor>,
    E::Act: Into<Tensor> + From<Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
    P::Config: DeserializeOwned + Serialize + OutDim + Clone,
    R: ExperienceBufferBase<Item = Episode<E::Obs, E::Act>>
        + ReplayBufferBase<Batch = Vec<Episode<E::Obs, E::Act>>>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt(&mut self, buffer: &mut R) -> Option<Result<Record>> {
        if buffer.len() >= self.min_episodes_warmup {
            Some(self.opt_(buffer))
        } else {
            None
        }
    }

    fn save_params(&self, path_prefix: &Path) -> Result<()> {
        if let Some(parent) = path_prefix.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        self.critic1.save(suffixed(path_prefix, "_q1"))?;
        self.critic2.save(suffixed(path_prefix, "_q2"))?;
        self.actor.save(suffixed(path_prefix, "_policy"))?;
        Ok(())
    }

    fn load_params(&mut self, path_prefix: &Path) -> Result<()> {
        self.critic1.load(suffixed(path_prefix, "_q1"))?;
        self.critic2.load(suffixed(path_prefix, "_q2"))?;
        self.actor.load(suffixed(path_prefix, "_policy"))?;

        // Targets are never persisted; they are rederived from the loaded
        // sources as exact copies.
        self.critic1_tgt = self.critic1.clone();
        self.critic2_tgt = self.critic2.clone();
        self.actor_tgt = self.actor.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lstm::{LstmMlp, LstmMlpConfig};
    use crate::td3::{ActorConfig, CriticConfig};
    use rtd3_core::replay_buffer::{EpisodeReplayBuffer, EpisodeReplayBufferConfig};
    use rtd3_core::{Step, Transition};
    use std::convert::TryFrom;

    #[derive(Clone, Debug)]
    struct ObsV(Vec<f32>);

    impl From<ObsV> for Tensor {
        fn from(obs: ObsV) -> Tensor {
            Tensor::from_slice(&obs.0).unsqueeze(0)
        }
    }

    #[derive(Clone, Debug)]
    struct ActV(Vec<f32>);

    impl From<ActV> for Tensor {
        fn from(act: ActV) -> Tensor {
            Tensor::from_slice(&act.0).unsqueeze(0)
        }
    }

    impl From<Tensor> for ActV {
        fn from(t: Tensor) -> Self {
            Self(Vec::<f32>::try_from(&t.flatten(0, -1)).unwrap())
        }
    }

    struct RollEnv;

    impl Env for RollEnv {
        type Config = ();
        type Obs = ObsV;
        type Act = ActV;
        type Info = ();

        fn build(_config: &Self::Config, _seed: u64) -> Result<Self> {
            Ok(Self)
        }

        fn step(&mut self, _act: &ActV) -> Step<Self> {
            Step::new(ObsV(vec![0.0, 0.0]), 0.0, false, ())
        }

        fn reset(&mut self) -> Result<ObsV> {
            Ok(ObsV(vec![0.0, 0.0]))
        }
    }

    const DIM_OBS: i64 = 2;
    const DIM_ACT: i64 = 1;

    type Buffer = EpisodeReplayBuffer<ObsV, ActV>;
    type Td3Lstm = Td3<RollEnv, LstmMlp, LstmMlp, Buffer>;

    fn agent(policy_delay: usize) -> Td3Lstm {
        let q_config = LstmMlpConfig::new(DIM_OBS + 2 * DIM_ACT, vec![8], 8, 1);
        let pi_config = LstmMlpConfig::new(DIM_OBS + DIM_ACT, vec![8], 8, DIM_ACT).tanh_out();
        let config = Td3Config::default()
            .actor_config(ActorConfig::default().pi_config(pi_config))
            .critic_config(CriticConfig::default().q_config(q_config))
            .policy_delay(policy_delay)
            .seed(42)
            .train(true);
        Td3::build(config).unwrap()
    }

    fn episode(len: usize) -> Episode<ObsV, ActV> {
        let mut episode = Episode::new();
        for i in 0..len {
            episode.push(Transition {
                obs: ObsV(vec![0.1 * i as f32, 0.2]),
                act: ActV(vec![0.3]),
                last_act: ActV(vec![0.1]),
                reward: 1.0,
                next_obs: ObsV(vec![0.1 * (i + 1) as f32, 0.2]),
                is_done: i + 1 == len,
            });
        }
        episode
    }

    fn flat_params<M: ModelBase>(model: &M) -> Vec<f32> {
        let mut vars: Vec<_> = model.get_var_store().variables().into_iter().collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars.into_iter()
            .flat_map(|(_, t)| Vec::<f32>::try_from(&t.flatten(0, -1)).unwrap())
            .collect()
    }

    #[test]
    fn targets_start_as_exact_copies() {
        let agent = agent(1);
        assert_eq!(flat_params(&agent.critic1), flat_params(&agent.critic1_tgt));
        assert_eq!(flat_params(&agent.critic2), flat_params(&agent.critic2_tgt));
        assert_eq!(flat_params(&agent.actor), flat_params(&agent.actor_tgt));

        // The twins must not share an initialization.
        assert_ne!(flat_params(&agent.critic1), flat_params(&agent.critic2));
    }

    #[test]
    fn critics_update_every_step_actor_only_on_delayed_steps() {
        let mut agent = agent(3);
        let mut buffer = Buffer::build(&EpisodeReplayBufferConfig::default());
        buffer.push(episode(3)).unwrap();
        buffer.push(episode(4)).unwrap();

        for cnt in 0..7 {
            let critic1_before = flat_params(&agent.critic1);
            let actor_before = flat_params(&agent.actor);
            let actor_tgt_before = flat_params(&agent.actor_tgt);
            let critic1_tgt_before = flat_params(&agent.critic1_tgt);

            agent.opt(&mut buffer).unwrap().unwrap();

            let delayed = cnt % 3 == 0;
            assert_ne!(critic1_before, flat_params(&agent.critic1));
            assert_eq!(actor_before != flat_params(&agent.actor), delayed);
            assert_eq!(actor_tgt_before != flat_params(&agent.actor_tgt), delayed);
            assert_eq!(
                critic1_tgt_before != flat_params(&agent.critic1_tgt),
                delayed
            );
        }
    }

    #[test]
    fn opt_is_skipped_until_enough_episodes() {
        let mut agent = agent(1);
        let mut buffer = Buffer::build(&EpisodeReplayBufferConfig::default());
        assert!(agent.opt(&mut buffer).is_none());
        buffer.push(episode(3)).unwrap();
        assert!(agent.opt(&mut buffer).is_none());
        buffer.push(episode(3)).unwrap();
        assert!(agent.opt(&mut buffer).unwrap().is_ok());
    }

    #[test]
    fn load_rederives_targets_from_loaded_sources() {
        let dir = tempdir::TempDir::new("td3").unwrap();
        let prefix = dir.path().join("td3");

        let mut trained = agent(1);
        let mut buffer = Buffer::build(&EpisodeReplayBufferConfig::default());
        buffer.push(episode(3)).unwrap();
        buffer.push(episode(3)).unwrap();
        for _ in 0..3 {
            trained.opt(&mut buffer).unwrap().unwrap();
        }
        trained.save_params(&prefix).unwrap();

        let mut restored = agent(1);
        restored.load_params(&prefix).unwrap();

        assert_eq!(flat_params(&trained.critic1), flat_params(&restored.critic1));
        assert_eq!(flat_params(&trained.actor), flat_params(&restored.actor));

        // Targets come back as exact copies of the loaded sources, not as
        // the trailing averages they were when the sources were saved.
        assert_eq!(
            flat_params(&restored.critic1),
            flat_params(&restored.critic1_tgt)
        );
        assert_eq!(flat_params(&restored.actor), flat_params(&restored.actor_tgt));
    }
}
