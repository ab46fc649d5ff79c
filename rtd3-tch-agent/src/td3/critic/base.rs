//! Recurrent action-value network.
use super::CriticConfig;
use crate::{
    model::{ModelBase, SubModel3Rnn},
    opt::{Optimizer, OptimizerConfig},
    util::OutDim,
};
use anyhow::{Context, Result};
use log::{info, trace};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use tch::{nn, nn::LSTMState, Device, Tensor};

/// Recurrent action-value network with its optimizer.
///
/// See [`Actor`](super::super::Actor) for the cloning contract used to
/// derive target networks.
pub struct Critic<Q>
where
    Q: SubModel3Rnn<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    device: Device,
    var_store: nn::VarStore,
    q: Q,
    opt_config: OptimizerConfig,
    q_config: Q::Config,
    opt: Optimizer,
}

impl<Q> Critic<Q>
where
    Q: SubModel3Rnn<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    /// Constructs the critic.
    pub fn build(config: CriticConfig<Q::Config>, device: Device) -> Result<Critic<Q>> {
        let q_config = config.q_config.context("q_config is not set")?;
        let opt_config = config.opt_config;
        let var_store = nn::VarStore::new(device);
        let q = Q::build(&var_store, q_config.clone());

        Ok(Critic::_build(
            device, opt_config, q_config, q, var_store, None,
        ))
    }

    fn _build(
        device: Device,
        opt_config: OptimizerConfig,
        q_config: Q::Config,
        q: Q,
        mut var_store: nn::VarStore,
        var_store_src: Option<&nn::VarStore>,
    ) -> Self {
        // Copy var_store
        if let Some(var_store_src) = var_store_src {
            var_store.copy(var_store_src).unwrap();
        }

        let opt = opt_config.build(&var_store).unwrap();

        Self {
            device,
            var_store,
            q,
            opt_config,
            q_config,
            opt,
        }
    }

    /// Evaluates one timestep of the action-value function.
    pub fn forward(
        &self,
        obs: &Tensor,
        act: &Tensor,
        last_act: &Tensor,
        state: &LSTMState,
    ) -> (Tensor, LSTMState) {
        self.q.forward(obs, act, last_act, state)
    }

    /// Returns a fresh zeroed recurrent state.
    pub fn initial_state(&self, batch_size: i64) -> LSTMState {
        self.q.initial_state(batch_size)
    }
}

impl<Q> Clone for Critic<Q>
where
    Q: SubModel3Rnn<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    fn clone(&self) -> Self {
        let device = self.device;
        let opt_config = self.opt_config.clone();
        let var_store = nn::VarStore::new(device);
        let q_config = self.q_config.clone();
        let q = self.q.clone_with_var_store(&var_store);

        Self::_build(
            device,
            opt_config,
            q_config,
            q,
            var_store,
            Some(&self.var_store),
        )
    }
}

impl<Q> ModelBase for Critic<Q>
where
    Q: SubModel3Rnn<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    fn backward_step(&mut self, loss: &Tensor) {
        self.opt.backward_step(loss);
        trace!("Critic.backward_step()");
    }

    fn get_var_store(&self) -> &nn::VarStore {
        &self.var_store
    }

    fn get_var_store_mut(&mut self) -> &mut nn::VarStore {
        &mut self.var_store
    }

    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.var_store.save(&path)?;
        info!("Save critic to {:?}", path.as_ref());
        Ok(())
    }

    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.var_store.load(&path)?;
        info!("Load critic from {:?}", path.as_ref());
        Ok(())
    }
}
