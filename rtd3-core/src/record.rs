//! Records of diagnostic values and their sinks.
//!
//! A [`Record`] is a set of named values produced by one training step or
//! episode. Records are handed to a [`Recorder`], which aggregates them and
//! writes them to an output destination when flushed.
use crate::error::Rtd3Error;
use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// A single floating-point value, typically a metric.
    Scalar(f32),

    /// A text value.
    String(String),
}

/// A container of key-value pairs for diagnostic output.
#[derive(Debug, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<'_, String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a value by key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges this record with another, consuming both.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Returns true if the record holds no value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets a scalar value by key.
    pub fn get_scalar(&self, k: &str) -> Result<f32, Rtd3Error> {
        if let Some(v) = self.get(k) {
            match v {
                RecordValue::Scalar(v) => Ok(*v),
                _ => Err(Rtd3Error::RecordValueTypeError("Scalar".to_string())),
            }
        } else {
            Err(Rtd3Error::RecordKeyError(k.to_string()))
        }
    }
}

/// Writes records to an output destination.
pub trait Recorder {
    /// Stores a record.
    fn store(&mut self, record: Record);

    /// Writes the stored records to the destination.
    fn flush(&mut self) -> anyhow::Result<()>;
}

/// A recorder that discards everything.
pub struct NullRecorder;

impl Recorder for NullRecorder {
    fn store(&mut self, _record: Record) {}

    fn flush(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
