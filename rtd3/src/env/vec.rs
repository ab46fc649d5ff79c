//! Observation and action vectors.
use std::convert::TryFrom;
use tch::Tensor;

/// Fixed-dimension observation vector.
#[derive(Clone, Debug)]
pub struct ObsVec(pub Vec<f32>);

/// Converts to a batched `[1, dim]` tensor.
impl From<ObsVec> for Tensor {
    fn from(obs: ObsVec) -> Tensor {
        Tensor::from_slice(&obs.0).unsqueeze(0)
    }
}

/// Fixed-dimension action vector.
#[derive(Clone, Debug)]
pub struct ActVec(pub Vec<f32>);

/// Converts to a batched `[1, dim]` tensor.
impl From<ActVec> for Tensor {
    fn from(act: ActVec) -> Tensor {
        Tensor::from_slice(&act.0).unsqueeze(0)
    }
}

impl From<Tensor> for ActVec {
    fn from(t: Tensor) -> Self {
        Self(Vec::<f32>::try_from(&t.flatten(0, -1)).expect("action tensor must be f32"))
    }
}
