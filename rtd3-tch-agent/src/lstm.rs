//! Recurrent multilayer perceptron built on an LSTM cell.
mod base;
mod config;
pub use base::LstmMlp;
pub use config::LstmMlpConfig;
