//! Built-in stage data types.

use super::StageData;
use crate::CassetteError;
use serde_json::{Value, json};
use std::any::Any;

/// Stage data for algorithms that keep nothing per element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassiveData {
    algorithm: String,
}

impl PassiveData {
    #[must_use]
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
        }
    }
}

impl StageData for PassiveData {
    fn algorithm(&self) -> &str {
        &self.algorithm
    }

    fn reset(&mut self) {}

    fn to_json(&self) -> Value {
        json!({ "algorithm": self.algorithm })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Placing-stage node data: the device (ordered part names) collected for
/// the vertex by the assembly planner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceData {
    parts: Vec<String>,
}

impl DeviceData {
    pub const ALGORITHM: &'static str = "Eugene";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_parts(parts: Vec<String>) -> Self {
        Self { parts }
    }

    /// Ordered part names of the device.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

impl StageData for DeviceData {
    fn algorithm(&self) -> &str {
        Self::ALGORITHM
    }

    fn reset(&mut self) {
        self.parts.clear();
    }

    fn to_json(&self) -> Value {
        json!({ "algorithm": Self::ALGORITHM, "device": self.parts })
    }

    fn restore(&mut self, value: &Value) -> Result<(), CassetteError> {
        self.parts = match value.get("device") {
            None | Some(Value::Null) => Vec::new(),
            Some(device) => serde_json::from_value(device.clone())?,
        };
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
