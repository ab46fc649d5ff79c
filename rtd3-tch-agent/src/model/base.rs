//! Definition of interfaces of recurrent neural networks.
use anyhow::Result;
use std::path::Path;
use tch::{
    nn,
    nn::{LSTMState, VarStore},
    Tensor,
};

/// Base interface of learnable models.
pub trait ModelBase {
    /// Trains the network given a loss.
    fn backward_step(&mut self, loss: &Tensor);

    /// Returns `var_store`.
    fn get_var_store(&self) -> &nn::VarStore;

    /// Returns `var_store` as mutable reference.
    fn get_var_store_mut(&mut self) -> &mut nn::VarStore;

    /// Save parameters of the neural network.
    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()>;

    /// Load parameters of the neural network.
    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()>;
}

/// Recurrent network taking an observation and the previous action
/// (a policy-shaped model).
///
/// The LSTM state is threaded explicitly: `forward` consumes the state
/// produced by the previous timestep of the same sequence and returns the
/// successor state. States must never be shared across sequences; a fresh
/// state from [`initial_state`](SubModel2Rnn::initial_state) starts each one.
///
/// Structs implementing this trait can be initialized with a given
/// [`VarStore`], which allows cloning a model into a fresh store. That
/// ability is used to derive target networks.
pub trait SubModel2Rnn {
    /// Configuration from which the model is constructed.
    type Config;

    /// Output of the model.
    type Output;

    /// Builds the model with [`VarStore`] and [`SubModel2Rnn::Config`].
    fn build(var_store: &VarStore, config: Self::Config) -> Self;

    /// Clones the model with a given [`VarStore`].
    fn clone_with_var_store(&self, var_store: &VarStore) -> Self;

    /// Performs one recurrent step.
    fn forward(
        &self,
        obs: &Tensor,
        last_act: &Tensor,
        state: &LSTMState,
    ) -> (Self::Output, LSTMState);

    /// Returns the zeroed LSTM state for the given batch size.
    fn initial_state(&self, batch_size: i64) -> LSTMState;
}

/// Recurrent network taking an observation, an action and the previous
/// action (a critic-shaped model).
///
/// See [`SubModel2Rnn`] for the state-threading contract.
pub trait SubModel3Rnn {
    /// Configuration from which the model is constructed.
    type Config;

    /// Output of the model.
    type Output;

    /// Builds the model with [`VarStore`] and [`SubModel3Rnn::Config`].
    fn build(var_store: &VarStore, config: Self::Config) -> Self;

    /// Clones the model with a given [`VarStore`].
    fn clone_with_var_store(&self, var_store: &VarStore) -> Self;

    /// Performs one recurrent step.
    fn forward(
        &self,
        obs: &Tensor,
        act: &Tensor,
        last_act: &Tensor,
        state: &LSTMState,
    ) -> (Self::Output, LSTMState);

    /// Returns the zeroed LSTM state for the given batch size.
    fn initial_state(&self, batch_size: i64) -> LSTMState;
}
