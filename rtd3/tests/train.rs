//! End-to-end training smoke run on the pendulum with tiny networks.
use anyhow::Result;
use rtd3::{
    env::{ActVec, NormalizedActConfig, NormalizedActEnv, ObsVec, PendulumConfig, PendulumEnv},
    recorder::CsvRecorder,
};
use rtd3_core::{
    replay_buffer::{EpisodeReplayBuffer, EpisodeReplayBufferConfig},
    Agent, DefaultEvaluator, Trainer, TrainerConfig,
};
use rtd3_tch_agent::{
    lstm::{LstmMlp, LstmMlpConfig},
    td3::{ActorConfig, CriticConfig, Td3, Td3Config},
};
use std::fs;
use tempdir::TempDir;

const DIM_OBS: i64 = 3;
const DIM_ACT: i64 = 1;

type E = NormalizedActEnv<PendulumEnv>;
type Buffer = EpisodeReplayBuffer<ObsVec, ActVec>;
type Td3Pendulum = Td3<E, LstmMlp, LstmMlp, Buffer>;

fn env_config() -> NormalizedActConfig<PendulumConfig> {
    let (low, high) = PendulumEnv::action_bounds();
    NormalizedActConfig {
        env_config: PendulumConfig::default(),
        low,
        high,
    }
}

fn agent_config(train: bool) -> Td3Config<LstmMlpConfig, LstmMlpConfig> {
    let actor_config = ActorConfig::default()
        .pi_config(LstmMlpConfig::new(DIM_OBS + DIM_ACT, vec![8], 8, DIM_ACT).tanh_out());
    let critic_config = CriticConfig::default()
        .q_config(LstmMlpConfig::new(DIM_OBS + 2 * DIM_ACT, vec![8], 8, 1));
    Td3Config::default()
        .actor_config(actor_config)
        .critic_config(critic_config)
        .policy_delay(2)
        .seed(1234)
        .train(train)
}

#[test]
fn trains_saves_and_evaluates() -> Result<()> {
    let dir = TempDir::new("rtd3_train")?;
    let model_path = dir.path().join("td3");
    let csv_path = dir.path().join("rewards.csv");

    let trainer_config = TrainerConfig::default()
        .max_episodes(3)
        .max_steps(5)
        .update_itr(1)
        .model_path(model_path.to_string_lossy());
    let mut trainer = Trainer::<E, Buffer>::build(
        trainer_config,
        env_config(),
        EpisodeReplayBufferConfig::default(),
    );
    let mut agent = Td3Pendulum::build(agent_config(true))?;
    let mut recorder = CsvRecorder::new(&csv_path);

    trainer.train(&mut agent, &mut recorder)?;

    for suffix in ["_q1", "_q2", "_policy"] {
        let mut path = model_path.as_os_str().to_os_string();
        path.push(suffix);
        assert!(std::path::Path::new(&path).exists(), "missing {:?}", path);
    }

    let content = fs::read_to_string(&csv_path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "episode,episode_return");

    // A fresh agent picks the saved parameters back up and runs inference.
    let mut restored = Td3Pendulum::build(agent_config(false))?;
    restored.load_params(&model_path)?;
    restored.eval();
    let mut evaluator = DefaultEvaluator::<E>::new(&env_config(), 1, 2, 5)?;
    let ret = evaluator.evaluate(&mut restored)?;
    assert!(ret.is_finite());
    Ok(())
}
