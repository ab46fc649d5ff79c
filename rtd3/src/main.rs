//! Train and evaluate a recurrent TD3 agent on the pendulum.
use anyhow::Result;
use clap::Parser;
use log::info;
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
use std::path::Path;

const DIM_OBS: i64 = 3;
const DIM_ACT: i64 = 1;
const UNITS: i64 = 256;
const HIDDEN_DIM: i64 = 256;
const LR_ACTOR: f64 = 3e-4;
const LR_CRITIC: f64 = 3e-4;
const GAMMA: f64 = 0.9;
const TAU: f64 = 1e-2;
const POLICY_DELAY: usize = 3;
const EXPLORE_NOISE_SCALE: f64 = 0.1;
const ACT_LIMIT: f64 = 1.0;
const SEED: i64 = 1234;
const MAX_EPISODES: usize = 1000;
const MAX_STEPS: usize = 150;
const WARMUP_STEPS: usize = 0;
const UPDATE_ITR: usize = 1;
const SAVE_INTERVAL: usize = 20;
const EVAL_EPISODES: usize = 10;
const REPLAY_BUFFER_CAPACITY: usize = 10_000;
const MODEL_PATH: &str = "./model/td3";
const REWARD_CSV: &str = "./model/rewards.csv";

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
        .opt_config(rtd3_tch_agent::opt::OptimizerConfig::Adam { lr: LR_ACTOR })
        .pi_config(LstmMlpConfig::new(DIM_OBS + DIM_ACT, vec![UNITS], HIDDEN_DIM, DIM_ACT).tanh_out());
    let critic_config = CriticConfig::default()
        .opt_config(rtd3_tch_agent::opt::OptimizerConfig::Adam { lr: LR_CRITIC })
        .q_config(LstmMlpConfig::new(
            DIM_OBS + 2 * DIM_ACT,
            vec![UNITS],
            HIDDEN_DIM,
            1,
        ));
    Td3Config::default()
        .actor_config(actor_config)
        .critic_config(critic_config)
        .gamma(GAMMA)
        .tau(TAU)
        .policy_delay(POLICY_DELAY)
        .explore_noise_scale(EXPLORE_NOISE_SCALE)
        .act_limit(ACT_LIMIT)
        .seed(SEED)
        .train(train)
}

fn train() -> Result<()> {
    let trainer_config = TrainerConfig::default()
        .max_episodes(MAX_EPISODES)
        .max_steps(MAX_STEPS)
        .warmup_steps(WARMUP_STEPS)
        .update_itr(UPDATE_ITR)
        .save_interval(SAVE_INTERVAL)
        .model_path(MODEL_PATH);
    let replay_buffer_config = EpisodeReplayBufferConfig::default().capacity(REPLAY_BUFFER_CAPACITY);
    let mut trainer = Trainer::<E, Buffer>::build(trainer_config, env_config(), replay_buffer_config);
    let mut agent = Td3Pendulum::build(agent_config(true))?;
    let mut recorder = CsvRecorder::new(REWARD_CSV);

    trainer.train(&mut agent, &mut recorder)
}

fn eval() -> Result<()> {
    let mut agent = Td3Pendulum::build(agent_config(false))?;
    agent.load_params(Path::new(MODEL_PATH))?;
    agent.eval();

    let mut evaluator = DefaultEvaluator::<E>::new(&env_config(), 1, EVAL_EPISODES, MAX_STEPS)?;
    let ret = evaluator.evaluate(&mut agent)?;
    info!("Mean evaluation return: {}", ret);
    Ok(())
}

/// Train or evaluate a recurrent TD3 pendulum controller.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Trains the agent and saves the model.
    #[arg(long)]
    train: bool,

    /// Evaluates a previously trained agent.
    #[arg(long)]
    test: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    let args = Args::parse();

    if args.train {
        train()?;
    }
    if args.test {
        eval()?;
    }
    if !args.train && !args.test {
        info!("Nothing to do; pass --train and/or --test.");
    }
    Ok(())
}
