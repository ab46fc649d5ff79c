//! Train an [`Agent`] on complete episodes.
mod config;

use crate::{
    base::{Agent, Env, Episode, ExperienceBufferBase, ReplayBufferBase, Transition},
    record::{Record, RecordValue::Scalar, Recorder},
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::{info, warn};
use std::path::Path;

/// Manages the episode-driven training loop.
///
/// One iteration of the loop looks like following:
///
/// 1. Reset the environment and the agent's recurrent state; draw a
///    placeholder previous action uniformly at random.
/// 2. For each step, up to `max_steps`: choose an action with the policy
///    (or uniformly at random during the warmup period), step the
///    environment, record the transition, and trigger `update_itr`
///    optimization steps on the agent. The loop breaks early when the
///    environment signals termination.
/// 3. Push the recorded episode into the replay buffer and store the episode
///    return in the recorder.
/// 4. Every `save_interval` episodes, flush the recorder and save the model
///    parameters.
///
/// The first step of each episode is not recorded: its previous action is
/// the sampled placeholder rather than an action the policy produced, so the
/// transition would carry a meaningless auxiliary input.
///
/// The replay buffer and the agent are mutated in strict alternation within
/// this single control thread; no synchronization is involved.
pub struct Trainer<E, R>
where
    E: Env,
    R: ExperienceBufferBase<Item = Episode<E::Obs, E::Act>> + ReplayBufferBase,
{
    /// Configuration of the environment for training.
    env_config: E::Config,

    /// Configuration of the replay buffer.
    replay_buffer_config: R::Config,

    /// The number of training episodes.
    max_episodes: usize,

    /// The maximum number of environment steps per episode.
    max_steps: usize,

    /// Warmup period in environment steps.
    warmup_steps: usize,

    /// Optimization steps per environment step.
    update_itr: usize,

    /// Interval of saving in episodes.
    save_interval: usize,

    /// Path prefix under which the model is saved.
    model_path: Option<String>,
}

impl<E, R> Trainer<E, R>
where
    E: Env,
    R: ExperienceBufferBase<Item = Episode<E::Obs, E::Act>> + ReplayBufferBase,
{
    /// Constructs a trainer.
    pub fn build(
        config: TrainerConfig,
        env_config: E::Config,
        replay_buffer_config: R::Config,
    ) -> Self {
        Self {
            env_config,
            replay_buffer_config,
            max_episodes: config.max_episodes,
            max_steps: config.max_steps,
            warmup_steps: config.warmup_steps,
            update_itr: config.update_itr,
            save_interval: config.save_interval,
            model_path: config.model_path,
        }
    }

    fn save_model<A: Agent<E, R>>(agent: &A, model_path: &str) {
        match agent.save_params(Path::new(model_path)) {
            Ok(()) => info!("Saved the model with prefix {:?}.", model_path),
            Err(e) => warn!("Failed to save model with prefix {:?}: {}", model_path, e),
        }
    }

    /// Runs one episode, triggering optimization steps along the way.
    ///
    /// Returns the recorded episode and its return (the sum of rewards over
    /// the recorded steps; the unrecorded first step contributes nothing).
    fn run_episode<A: Agent<E, R>>(
        &self,
        env: &mut E,
        agent: &mut A,
        buffer: &mut R,
        env_steps: &mut usize,
    ) -> Result<(Episode<E::Obs, E::Act>, f32)> {
        let mut obs = env.reset()?;
        let mut hidden = agent.initial_hidden();
        let mut last_act = agent.sample_uniform();
        let mut episode = Episode::new();
        let mut ret = 0f32;

        for step_ix in 0..self.max_steps {
            let act = if *env_steps > self.warmup_steps {
                let (act, next_hidden) = agent.sample(&obs, &last_act, &hidden);
                hidden = next_hidden;
                act
            } else {
                agent.sample_uniform()
            };

            let step = env.step(&act);

            if step_ix > 0 {
                ret += step.reward;
                episode.push(Transition {
                    obs: obs.clone(),
                    act: act.clone(),
                    last_act: last_act.clone(),
                    reward: step.reward,
                    next_obs: step.obs.clone(),
                    is_done: step.is_done,
                });
            }

            let is_done = step.is_done;
            obs = step.obs;
            last_act = act;
            *env_steps += 1;

            for _ in 0..self.update_itr {
                if let Some(result) = agent.opt(buffer) {
                    result?;
                }
            }

            if is_done {
                break;
            }
        }

        Ok((episode, ret))
    }

    /// Trains the agent.
    pub fn train<A: Agent<E, R>>(
        &mut self,
        agent: &mut A,
        recorder: &mut dyn Recorder,
    ) -> Result<()> {
        let mut env = E::build(&self.env_config, 0)?;
        let mut buffer = R::build(&self.replay_buffer_config);
        let mut env_steps: usize = 0;
        agent.train();

        for episode_ix in 0..self.max_episodes {
            let (episode, ret) = self.run_episode(&mut env, agent, &mut buffer, &mut env_steps)?;

            if episode.is_empty() {
                // An episode that terminated on its first step leaves nothing
                // to learn from.
                warn!("Episode {} recorded no transition; skipped.", episode_ix);
            } else {
                buffer.push(episode)?;
            }

            info!("Episode: {} | Episode Reward: {}", episode_ix, ret);
            recorder.store(Record::from_slice(&[
                ("episode", Scalar(episode_ix as f32)),
                ("episode_return", Scalar(ret)),
            ]));

            if self.save_interval > 0 && episode_ix > 0 && episode_ix % self.save_interval == 0 {
                recorder.flush()?;
                if let Some(model_path) = &self.model_path {
                    Self::save_model(agent, model_path);
                }
            }
        }

        recorder.flush()?;
        if let Some(model_path) = &self.model_path {
            Self::save_model(agent, model_path);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        base::{RecurrentPolicy, Step},
        replay_buffer::{EpisodeReplayBuffer, EpisodeReplayBufferConfig},
    };

    struct ConstEnv;

    impl Env for ConstEnv {
        type Config = ();
        type Obs = Vec<f32>;
        type Act = Vec<f32>;
        type Info = ();

        fn build(_config: &Self::Config, _seed: u64) -> Result<Self> {
            Ok(Self)
        }

        fn step(&mut self, _act: &Vec<f32>) -> Step<Self> {
            Step::new(vec![0.0], 1.0, false, ())
        }

        fn reset(&mut self) -> Result<Vec<f32>> {
            Ok(vec![0.0])
        }
    }

    type Buffer = EpisodeReplayBuffer<Vec<f32>, Vec<f32>>;

    struct FixedAgent;

    impl RecurrentPolicy<ConstEnv> for FixedAgent {
        type Hidden = ();

        fn initial_hidden(&self) {}

        fn sample(
            &mut self,
            _obs: &Vec<f32>,
            _last_act: &Vec<f32>,
            _hidden: &(),
        ) -> (Vec<f32>, ()) {
            (vec![0.0], ())
        }

        fn sample_uniform(&mut self) -> Vec<f32> {
            vec![0.0]
        }
    }

    impl Agent<ConstEnv, Buffer> for FixedAgent {
        fn train(&mut self) {}

        fn eval(&mut self) {}

        fn is_train(&self) -> bool {
            true
        }

        fn opt(&mut self, _buffer: &mut Buffer) -> Option<Result<Record>> {
            None
        }

        fn save_params(&self, _path_prefix: &Path) -> Result<()> {
            Ok(())
        }

        fn load_params(&mut self, _path_prefix: &Path) -> Result<()> {
            Ok(())
        }
    }

    struct CaptureRecorder {
        returns: Vec<f32>,
    }

    impl Recorder for CaptureRecorder {
        fn store(&mut self, record: Record) {
            self.returns
                .push(record.get_scalar("episode_return").unwrap());
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn episode_return_counts_only_recorded_steps() -> Result<()> {
        let config = TrainerConfig::default().max_episodes(1).max_steps(4);
        let mut trainer =
            Trainer::<ConstEnv, Buffer>::build(config, (), EpisodeReplayBufferConfig::default());
        let mut agent = FixedAgent;
        let mut recorder = CaptureRecorder {
            returns: Vec::new(),
        };

        trainer.train(&mut agent, &mut recorder)?;

        // Four env steps at reward 1 each; the unrecorded first step does
        // not enter the reported return.
        assert_eq!(recorder.returns, vec![3.0]);
        Ok(())
    }
}
