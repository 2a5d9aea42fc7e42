//! Assembly rule fragments and the rule-language keywords.
//!
//! Rule fragments are opaque text in the solver's rule language, e.g.
//! `STARTSWITH pAmtR` or `gate_A1_AmtR BEFORE gate_P3_PhlF`. The planner
//! only needs to know which names a fragment mentions, so it can keep the
//! fragments whose names all occur in a device or circuit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const AND: &str = "AND";
pub const CONTAINS: &str = "CONTAINS";
pub const EXACTLY: &str = "EXACTLY";
pub const STARTSWITH: &str = "STARTSWITH";
pub const ALL_FORWARD: &str = "ALL_FORWARD";
pub const REVERSE: &str = "REVERSE";

/// Reserved words of the rule language. Never treated as names.
pub const KEYWORDS: &[&str] = &[
    "CONTAINS",
    "NOTCONTAINS",
    "EXACTLY",
    "NOTEXACTLY",
    "MORETHAN",
    "NOTMORETHAN",
    "SAME_COUNT",
    "WITH",
    "NOTWITH",
    "THEN",
    "NEXTTO",
    "NOTNEXTTO",
    "STARTSWITH",
    "ENDSWITH",
    "BEFORE",
    "ALL_BEFORE",
    "SOME_BEFORE",
    "AFTER",
    "ALL_AFTER",
    "SOME_AFTER",
    "ALL_NEXTTO",
    "SOME_NEXTTO",
    "ALL_FORWARD",
    "ALL_REVERSE",
    "FORWARD",
    "REVERSE",
    "SOME_FORWARD",
    "SOME_REVERSE",
    "ALTERNATE_ORIENTATION",
    "SOME_ALTERNATE_ORIENTATION",
    "EQUALS",
    "NOTEQUALS",
    "INDUCES",
    "REPRESSES",
    "DRIVES",
    "MATCHES",
    "AND",
    "OR",
    "NOT",
    "ON",
];

/// Rule fragments configured in the library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Ordering constraints on the parts of one device.
    #[serde(default)]
    pub part_rules: Vec<String>,
    /// Ordering constraints on the gate devices of the circuit.
    #[serde(default)]
    pub gate_rules: Vec<String>,
}

/// Names a rule fragment mentions: every token that is not a keyword and
/// starts with an ASCII letter. Tokens split on whitespace and commas.
#[must_use]
pub fn referenced_names(rule: &str) -> BTreeSet<&str> {
    rule.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .filter(|token| !KEYWORDS.contains(token))
        .filter(|token| token.starts_with(|c: char| c.is_ascii_alphabetic()))
        .collect()
}

/// Whether the fragment belongs to the "must start with" family.
#[must_use]
pub fn is_starts_with(rule: &str) -> bool {
    rule.split_whitespace()
        .any(|token| token.eq_ignore_ascii_case(STARTSWITH))
}
