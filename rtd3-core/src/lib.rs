#![warn(missing_docs)]
//! Core abstractions for training a recurrent TD3 controller.
//!
//! This crate is backend agnostic: it defines the environment, policy and
//! agent interfaces, the episode-indexed replay buffer, and the
//! episode-driven training and evaluation loops. The function approximators
//! themselves live in a backend crate (see `rtd3-tch-agent`).
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{
    Agent, Env, Episode, ExperienceBufferBase, Info, RecurrentPolicy, ReplayBufferBase, Step,
    Transition,
};

mod trainer;
pub use trainer::{Trainer, TrainerConfig};

mod evaluator;
pub use evaluator::DefaultEvaluator;
