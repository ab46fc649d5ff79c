//! Definition of interfaces of recurrent neural networks.
mod base;
pub use base::{ModelBase, SubModel2Rnn, SubModel3Rnn};
