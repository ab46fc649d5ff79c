//! Recurrent policy network.
use super::ActorConfig;
use crate::{
    model::{ModelBase, SubModel2Rnn},
    opt::{Optimizer, OptimizerConfig},
    util::OutDim,
};
use anyhow::{Context, Result};
use log::{info, trace};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use tch::{nn, nn::LSTMState, Device, Tensor};

/// Recurrent policy network with its optimizer.
///
/// Wraps a [`SubModel2Rnn`] together with the [`nn::VarStore`] holding its
/// parameters. [`Clone`] derives a structurally identical network in a fresh
/// store with copied parameter values, which is how target networks start.
pub struct Actor<P>
where
    P: SubModel2Rnn<Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    device: Device,
    var_store: nn::VarStore,
    pi: P,
    opt_config: OptimizerConfig,
    pi_config: P::Config,
    opt: Optimizer,
}

impl<P> Actor<P>
where
    P: SubModel2Rnn<Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    /// Constructs the actor.
    pub fn build(config: ActorConfig<P::Config>, device: Device) -> Result<Actor<P>> {
        let pi_config = config.pi_config.context("pi_config is not set")?;
        let opt_config = config.opt_config;
        let var_store = nn::VarStore::new(device);
        let pi = P::build(&var_store, pi_config.clone());

        Ok(Actor::_build(
            device, opt_config, pi_config, pi, var_store, None,
        ))
    }

    fn _build(
        device: Device,
        opt_config: OptimizerConfig,
        pi_config: P::Config,
        pi: P,
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
            pi,
            opt_config,
            pi_config,
            opt,
        }
    }

    /// Evaluates one timestep of the policy.
    pub fn forward(
        &self,
        obs: &Tensor,
        last_act: &Tensor,
        state: &LSTMState,
    ) -> (Tensor, LSTMState) {
        self.pi.forward(obs, last_act, state)
    }

    /// Returns a fresh zeroed recurrent state.
    pub fn initial_state(&self, batch_size: i64) -> LSTMState {
        self.pi.initial_state(batch_size)
    }
}

impl<P> Clone for Actor<P>
where
    P: SubModel2Rnn<Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    fn clone(&self) -> Self {
        let device = self.device;
        let opt_config = self.opt_config.clone();
        let var_store = nn::VarStore::new(device);
        let pi_config = self.pi_config.clone();
        let pi = self.pi.clone_with_var_store(&var_store);

        Self::_build(
            device,
            opt_config,
            pi_config,
            pi,
            var_store,
            Some(&self.var_store),
        )
    }
}

impl<P> ModelBase for Actor<P>
where
    P: SubModel2Rnn<Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    fn backward_step(&mut self, loss: &Tensor) {
        self.opt.backward_step(loss);
        trace!("Actor.backward_step()");
    }

    fn get_var_store(&self) -> &nn::VarStore {
        &self.var_store
    }

    fn get_var_store_mut(&mut self) -> &mut nn::VarStore {
        &mut self.var_store
    }

    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.var_store.save(&path)?;
        info!("Save actor to {:?}", path.as_ref());
        Ok(())
    }

    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.var_store.load(&path)?;
        info!("Load actor from {:?}", path.as_ref());
        Ok(())
    }
}
