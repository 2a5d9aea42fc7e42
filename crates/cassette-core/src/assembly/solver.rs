//! # Solver Boundary
//!
//! The planner never runs the rule-language solver itself. It hands the
//! script to a [`Solver`] and reads back a structured response:
//!
//! ```json
//! {"collections": {"allResults": [
//!     {"name": "circuit_1", "components": [
//!         {"name": "gate_AmtR", "orientation": "reverse", "parts": ["pTac", "A1", "AmtR"]}
//!     ]}
//! ]}}
//! ```
//!
//! or `{"error": "..."}` when the solver gives up.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

// =============================================================================
// RESPONSE MODEL
// =============================================================================

/// Strand orientation of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    #[serde(alias = "FORWARD")]
    Forward,
    #[serde(alias = "REVERSE")]
    Reverse,
}

/// A gate-level device inside one assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// `gate_<base>` name of the device.
    pub name: String,
    #[serde(default)]
    pub orientation: Orientation,
    /// Part names in the order the solver chose.
    pub parts: Vec<String>,
}

/// One top-level arrangement of the circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assembly {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub components: Vec<Component>,
}

/// What a solver run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverResponse {
    #[serde(default)]
    pub collections: BTreeMap<String, Vec<Assembly>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SolverResponse {
    /// Response holding a single named collection.
    #[must_use]
    pub fn with_collection(name: impl Into<String>, assemblies: Vec<Assembly>) -> Self {
        Self {
            collections: BTreeMap::from([(name.into(), assemblies)]),
            error: None,
        }
    }

    /// Take the collection `name` out of the response.
    pub fn take_collection(&mut self, name: &str) -> Option<Vec<Assembly>> {
        self.collections.remove(name)
    }

    /// Parse a response, turning a reported `error` into [`SolverError::Reported`].
    pub fn from_json_str(json: &str) -> Result<Self, SolverError> {
        let mut response: Self =
            serde_json::from_str(json).map_err(|e| SolverError::Malformed(e.to_string()))?;
        match response.error.take() {
            Some(message) => Err(SolverError::Reported(message)),
            None => Ok(response),
        }
    }
}

// =============================================================================
// SOLVER
// =============================================================================

/// Failure at the solver boundary.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("cannot launch solver '{program}': {reason}")]
    Launch { program: String, reason: String },

    #[error("solver exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("malformed solver response: {0}")]
    Malformed(String),

    #[error("solver reported: {0}")]
    Reported(String),
}

/// Turns an assembly script into a response.
pub trait Solver {
    fn solve(&self, script: &str) -> Result<SolverResponse, SolverError>;
}

impl<F> Solver for F
where
    F: Fn(&str) -> Result<SolverResponse, SolverError>,
{
    fn solve(&self, script: &str) -> Result<SolverResponse, SolverError> {
        self(script)
    }
}

/// Runs an external program: script on stdin, JSON response on stdout.
#[derive(Debug, Clone)]
pub struct CommandSolver {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandSolver {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn launch_error(&self, e: &std::io::Error) -> SolverError {
        SolverError::Launch {
            program: self.program.display().to_string(),
            reason: e.to_string(),
        }
    }
}

impl Solver for CommandSolver {
    fn solve(&self, script: &str) -> Result<SolverResponse, SolverError> {
        debug!(program = %self.program.display(), args = ?self.args, "spawning solver");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.launch_error(&e))?;

        // stdin is fed from its own thread while stdout and stderr drain,
        // so neither side can stall on a full pipe.
        let stdin = child.stdin.take();
        let (written, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(script.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            (writer.join(), output)
        });

        let output = output.map_err(|e| self.launch_error(&e))?;
        if !output.status.success() {
            return Err(SolverError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        match written {
            Ok(Ok(())) => {}
            // The solver may stop reading once it has what it needs.
            Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {
                debug!("solver closed stdin before the whole script was written");
            }
            Ok(Err(e)) => return Err(self.launch_error(&e)),
            Err(_) => {
                return Err(SolverError::Launch {
                    program: self.program.display().to_string(),
                    reason: "stdin writer thread panicked".to_string(),
                });
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        SolverResponse::from_json_str(&stdout)
    }
}

/// Answers every script with a pre-recorded response.
#[derive(Debug, Clone)]
pub struct ReplaySolver {
    response: SolverResponse,
}

impl ReplaySolver {
    #[must_use]
    pub fn new(response: SolverResponse) -> Self {
        Self { response }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SolverError> {
        SolverResponse::from_json_str(json).map(Self::new)
    }

    /// Load a recorded response file.
    pub fn load(path: &Path) -> Result<Self, SolverError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SolverError::Malformed(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }
}

impl Solver for ReplaySolver {
    fn solve(&self, _script: &str) -> Result<SolverResponse, SolverError> {
        Ok(self.response.clone())
    }
}
