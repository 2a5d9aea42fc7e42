//! Gates and their response functions.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// RESPONSE FUNCTION
// =============================================================================

/// A named input variable of a response function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseVariable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_threshold: Option<f64>,
}

/// Transfer characteristic of a gate.
///
/// Only the data lives here. Evaluating the equation against an
/// evaluation context belongs to the scoring stages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseFunction {
    pub equation: String,
    pub variables: Vec<ResponseVariable>,
    #[serde(default, deserialize_with = "parameter_list")]
    pub parameters: BTreeMap<String, f64>,
}

impl ResponseFunction {
    /// Variable names in declared order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.name.as_str())
    }

    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&ResponseVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }
}

/// Parameters arrive either as `[{"name", "value"}]` or as a plain map.
fn parameter_list<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Entry {
        name: String,
        value: f64,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Parameters {
        List(Vec<Entry>),
        Map(BTreeMap<String, f64>),
    }

    Ok(match Parameters::deserialize(deserializer)? {
        Parameters::List(entries) => entries.into_iter().map(|e| (e.name, e.value)).collect(),
        Parameters::Map(map) => map,
    })
}

// =============================================================================
// GATE
// =============================================================================

/// A genetic logic gate from the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// Library name, matched against a vertex's gate type.
    pub name: String,
    /// Repressor or activator that names the gate's device family.
    pub regulator: String,
    /// Logic function, e.g. `NOR`.
    #[serde(default)]
    pub gate_type: String,
    /// Name of the output promoter part.
    pub promoter: String,
    /// Parts grouped by response-function variable.
    pub cassette: BTreeMap<String, Vec<String>>,
    pub response_function: ResponseFunction,
}

impl Gate {
    /// Cassette part names registered for a response-function variable.
    #[must_use]
    pub fn cassette_parts(&self, variable: &str) -> Option<&[String]> {
        self.cassette.get(variable).map(Vec::as_slice)
    }
}
