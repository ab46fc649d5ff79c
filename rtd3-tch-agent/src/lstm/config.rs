//! Configuration of [`LstmMlp`](super::LstmMlp).
use crate::util::OutDim;
use serde::{Deserialize, Serialize};

/// Configuration of [`LstmMlp`](super::LstmMlp).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LstmMlpConfig {
    pub(super) in_dim: i64,
    pub(super) units: Vec<i64>,
    pub(super) hidden_dim: i64,
    pub(super) out_dim: i64,
    pub(super) tanh_out: bool,
}

impl LstmMlpConfig {
    /// Creates a configuration.
    ///
    /// `in_dim` is the width of the concatenated inputs fed to the network,
    /// `units` the widths of the feed-forward layers before the LSTM cell,
    /// `hidden_dim` the width of the LSTM hidden state and `out_dim` the
    /// width of the linear head.
    pub fn new(in_dim: i64, units: Vec<i64>, hidden_dim: i64, out_dim: i64) -> Self {
        Self {
            in_dim,
            units,
            hidden_dim,
            out_dim,
            tanh_out: false,
        }
    }

    /// Bounds the output to `(-1, 1)` with a tanh activation.
    pub fn tanh_out(mut self) -> Self {
        self.tanh_out = true;
        self
    }

    /// Returns the width of the LSTM hidden state.
    pub fn hidden_dim(&self) -> i64 {
        self.hidden_dim
    }
}

impl OutDim for LstmMlpConfig {
    fn get_out_dim(&self) -> i64 {
        self.out_dim
    }

    fn set_out_dim(&mut self, out_dim: i64) {
        self.out_dim = out_dim;
    }
}
