//! Parts and the part-list devices built from them.

use serde::{Deserialize, Serialize};

/// Part type tag that marks a promoter.
pub const PROMOTER: &str = "promoter";

/// An immutable genetic part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    #[serde(rename = "type")]
    pub part_type: String,
    #[serde(rename = "dnasequence", alias = "sequence")]
    pub dna_sequence: String,
}

impl Part {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        part_type: impl Into<String>,
        dna_sequence: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            part_type: part_type.into(),
            dna_sequence: dna_sequence.into(),
        }
    }

    /// Promoter parts are left open in device definitions.
    #[must_use]
    pub fn is_promoter(&self) -> bool {
        self.part_type.eq_ignore_ascii_case(PROMOTER)
    }
}

/// An input sensor: the parts that realise a primary input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSensor {
    pub name: String,
    pub parts: Vec<String>,
}

/// An output reporter: the parts that realise a primary output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputReporter {
    pub name: String,
    pub parts: Vec<String>,
}
