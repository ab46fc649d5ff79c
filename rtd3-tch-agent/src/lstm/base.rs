//! Recurrent multilayer perceptron built on an LSTM cell.
use super::LstmMlpConfig;
use crate::model::{SubModel2Rnn, SubModel3Rnn};
use tch::{
    nn,
    nn::{LSTMState, Module, VarStore, RNN},
    Device, Kind, Tensor,
};

/// A feed-forward stack followed by a single LSTM cell and a linear head.
///
/// Inputs of one timestep are concatenated along the feature dimension,
/// passed through ReLU-activated linear layers, then through one step of the
/// LSTM cell. The head reads the new hidden state. With
/// [`tanh_out`](LstmMlpConfig::tanh_out) the output is squashed to `(-1, 1)`,
/// which suits policy heads; critic heads leave it unbounded.
pub struct LstmMlp {
    config: LstmMlpConfig,
    device: Device,
    body: nn::Sequential,
    lstm: nn::LSTM,
    head: nn::Linear,
}

impl LstmMlp {
    fn construct(var_store: &VarStore, config: LstmMlpConfig) -> Self {
        let p = &var_store.root();
        let mut body = nn::seq();
        let mut in_dim = config.in_dim;
        for (i, &units) in config.units.iter().enumerate() {
            body = body
                .add(nn::linear(
                    p / format!("ln{}", i),
                    in_dim,
                    units,
                    Default::default(),
                ))
                .add_fn(|x| x.relu());
            in_dim = units;
        }
        let lstm = nn::lstm(p / "lstm", in_dim, config.hidden_dim, Default::default());
        let head = nn::linear(
            p / "head",
            config.hidden_dim,
            config.out_dim,
            Default::default(),
        );

        Self {
            device: var_store.device(),
            config,
            body,
            lstm,
            head,
        }
    }

    fn step(&self, input: &Tensor, state: &LSTMState) -> (Tensor, LSTMState) {
        let x = self.body.forward(&input.to(self.device));
        let state = self.lstm.step(&x, state);
        let out = self.head.forward(&state.h().squeeze_dim(0));
        let out = if self.config.tanh_out { out.tanh() } else { out };
        (out, state)
    }

    fn zero_state(&self, batch_size: i64) -> LSTMState {
        let shape = [1, batch_size, self.config.hidden_dim];
        LSTMState((
            Tensor::zeros(&shape, (Kind::Float, self.device)),
            Tensor::zeros(&shape, (Kind::Float, self.device)),
        ))
    }
}

impl SubModel2Rnn for LstmMlp {
    type Config = LstmMlpConfig;
    type Output = Tensor;

    fn build(var_store: &VarStore, config: Self::Config) -> Self {
        Self::construct(var_store, config)
    }

    fn clone_with_var_store(&self, var_store: &VarStore) -> Self {
        Self::construct(var_store, self.config.clone())
    }

    fn forward(
        &self,
        obs: &Tensor,
        last_act: &Tensor,
        state: &LSTMState,
    ) -> (Tensor, LSTMState) {
        let input = Tensor::cat(&[obs, last_act], 1);
        self.step(&input, state)
    }

    fn initial_state(&self, batch_size: i64) -> LSTMState {
        self.zero_state(batch_size)
    }
}

impl SubModel3Rnn for LstmMlp {
    type Config = LstmMlpConfig;
    type Output = Tensor;

    fn build(var_store: &VarStore, config: Self::Config) -> Self {
        Self::construct(var_store, config)
    }

    fn clone_with_var_store(&self, var_store: &VarStore) -> Self {
        Self::construct(var_store, self.config.clone())
    }

    fn forward(
        &self,
        obs: &Tensor,
        act: &Tensor,
        last_act: &Tensor,
        state: &LSTMState,
    ) -> (Tensor, LSTMState) {
        let input = Tensor::cat(&[obs, act, last_act], 1);
        self.step(&input, state)
    }

    fn initial_state(&self, batch_size: i64) -> LSTMState {
        self.zero_state(batch_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::kind::FLOAT_CPU;

    fn model(tanh_out: bool) -> LstmMlp {
        let config = LstmMlpConfig::new(3, vec![8], 4, 2);
        let config = if tanh_out { config.tanh_out() } else { config };
        let vs = VarStore::new(Device::Cpu);
        <LstmMlp as SubModel2Rnn>::build(&vs, config)
    }

    #[test]
    fn output_and_state_shapes() {
        let model = model(false);
        let obs = Tensor::randn(&[1, 2], FLOAT_CPU);
        let last_act = Tensor::randn(&[1, 1], FLOAT_CPU);
        let state = SubModel2Rnn::initial_state(&model, 1);

        let (out, state) = SubModel2Rnn::forward(&model, &obs, &last_act, &state);
        assert_eq!(out.size(), vec![1, 2]);
        assert_eq!(state.h().size(), vec![1, 1, 4]);
        assert_eq!(state.c().size(), vec![1, 1, 4]);
    }

    #[test]
    fn tanh_bounds_output() {
        let model = model(true);
        let obs = 100.0 * Tensor::randn(&[1, 2], FLOAT_CPU);
        let last_act = Tensor::randn(&[1, 1], FLOAT_CPU);
        let state = SubModel2Rnn::initial_state(&model, 1);

        let (out, _) = SubModel2Rnn::forward(&model, &obs, &last_act, &state);
        let max = out.abs().max().double_value(&[]);
        assert!(max <= 1.0);
    }

    #[test]
    fn state_threading_changes_output() {
        // The same input fed twice must see two different hidden states.
        let model = model(false);
        let obs = Tensor::ones(&[1, 2], FLOAT_CPU);
        let last_act = Tensor::ones(&[1, 1], FLOAT_CPU);
        let state0 = SubModel2Rnn::initial_state(&model, 1);

        let (out1, state1) = SubModel2Rnn::forward(&model, &obs, &last_act, &state0);
        let (out2, _) = SubModel2Rnn::forward(&model, &obs, &last_act, &state1);
        let (out1b, _) = SubModel2Rnn::forward(&model, &obs, &last_act, &state0);

        assert!(out1.allclose(&out1b, 1e-6, 1e-6, false));
        assert!(!out1.allclose(&out2, 1e-6, 1e-6, false));
    }
}
