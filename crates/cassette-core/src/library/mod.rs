//! # Domain Library
//!
//! The target library of parts, gates, input sensors, output reporters and
//! assembly rules. It is loaded once from a JSON document and consulted
//! read-only by the assembly planner.
//!
//! Required fields are enforced by serde at load time, so a malformed
//! document is rejected before any planner run starts. Cross references
//! (a gate naming a part, a sensor naming a part) are resolved lazily by
//! the planner and reported against the vertex that needed them.

mod gate;
mod part;
pub mod rules;

pub use gate::{Gate, ResponseFunction, ResponseVariable};
pub use part::{InputSensor, OutputReporter, PROMOTER, Part};
pub use rules::Rules;

use crate::CassetteError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// =============================================================================
// DOCUMENT
// =============================================================================

/// On-disk shape of the library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryDocument {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub gates: Vec<Gate>,
    #[serde(default)]
    pub input_sensors: Vec<InputSensor>,
    #[serde(default)]
    pub output_reporters: Vec<OutputReporter>,
    #[serde(default)]
    pub rules: Rules,
}

// =============================================================================
// LIBRARY
// =============================================================================

/// Name-keyed collections of library objects.
#[derive(Debug, Clone, Default)]
pub struct Library {
    parts: BTreeMap<String, Part>,
    gates: BTreeMap<String, Gate>,
    input_sensors: BTreeMap<String, InputSensor>,
    output_reporters: BTreeMap<String, OutputReporter>,
    rules: Rules,
}

impl Library {
    /// Build a library, rejecting duplicate names within a collection.
    pub fn from_document(doc: LibraryDocument) -> Result<Self, CassetteError> {
        Ok(Self {
            parts: index("part", doc.parts, |p| &p.name)?,
            gates: index("gate", doc.gates, |g| &g.name)?,
            input_sensors: index("input sensor", doc.input_sensors, |s| &s.name)?,
            output_reporters: index("output reporter", doc.output_reporters, |r| &r.name)?,
            rules: doc.rules,
        })
    }

    /// Parse a library from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, CassetteError> {
        let doc: LibraryDocument = serde_json::from_str(json)
            .map_err(|e| CassetteError::InvalidDocument(format!("library: {}", e)))?;
        Self::from_document(doc)
    }

    /// Read and parse a library file.
    pub fn load(path: &Path) -> Result<Self, CassetteError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CassetteError::IoError(format!("Cannot read library '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    #[must_use]
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    #[must_use]
    pub fn gate(&self, name: &str) -> Option<&Gate> {
        self.gates.get(name)
    }

    #[must_use]
    pub fn input_sensor(&self, name: &str) -> Option<&InputSensor> {
        self.input_sensors.get(name)
    }

    #[must_use]
    pub fn output_reporter(&self, name: &str) -> Option<&OutputReporter> {
        self.output_reporters.get(name)
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }
}

fn index<T>(
    kind: &str,
    items: Vec<T>,
    name: impl Fn(&T) -> &String,
) -> Result<BTreeMap<String, T>, CassetteError> {
    let mut map = BTreeMap::new();
    for item in items {
        let key = name(&item).clone();
        if map.insert(key.clone(), item).is_some() {
            return Err(CassetteError::InvalidDocument(format!(
                "duplicate {} '{}'",
                kind, key
            )));
        }
    }
    Ok(map)
}
