//! # Input script interpreter
//!
//! This module provides an interpreter for input scripts, allowing raw input
//! channel values to be played back from a file rather than read from a live
//! device. Each line of a script sets the three raw channels at a given time:
//!
//! ```text
//! 0.0: 0.0 1.0 -1.0;
//! 2.5: 0.3 -0.5 -1.0;
//! ```
//!
//! The payload is `steer throttle brake`, each a raw device float in the
//! range [-1, 1]. Values are sample-and-hold: a line's channels apply until
//! the next line's time is reached.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A raw input sample which is scripted to occur at a specific time.
struct Command {
    /// The time the sample is supposed to apply from
    exec_time_s: f64,

    /// The raw channel values to apply
    sample: ScriptSample,
}

/// Raw input channel values read from a script line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptSample {
    pub steer: f64,
    pub throttle: f64,
    pub brake: f64,
}

/// An input script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending`
/// to acquire the latest raw sample that needs applying.
pub struct InputScript {
    _script_path: PathBuf,
    cmds: VecDeque<Command>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)"
    )]
    InvalidTimestamp(String),

    #[error("Script contains an invalid sample at {0} s: expected three floats, got \"{1}\"")]
    InvalidSample(f64, String),
}

pub enum PendingSample {
    None,
    Some(ScriptSample),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InputScript {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(
                path.to_str().unwrap_or("<invalid path>").to_string(),
            ));
        }

        // Load the script into a string
        let script = match fs::read_to_string(script_path) {
            Ok(s) => s,
            Err(e) => return Err(ScriptError::ScriptLoadError(e)),
        };

        Self::from_str(&script, path)
    }

    /// Parse a script from a string.
    fn from_str(script: &str, path: PathBuf) -> Result<Self, ScriptError> {
        // Empty queue of commands
        let mut cmd_queue: VecDeque<Command> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .unwrap();

        for cap in re.captures_iter(script) {
            // Parse the exec time
            let exec_time_s: f64 = match cap.get(1).unwrap().as_str().parse() {
                Ok(t) => t,
                Err(e) => return Err(ScriptError::InvalidTimestamp(format!("{}", e))),
            };

            // Parse the three raw channels from the payload.
            let payload = cap.get(3).unwrap().as_str();
            let channels: Vec<f64> = payload
                .split_whitespace()
                .filter_map(|v| v.parse().ok())
                .collect();

            let sample = match channels.as_slice() {
                [steer, throttle, brake] => ScriptSample {
                    steer: *steer,
                    throttle: *throttle,
                    brake: *brake,
                },
                _ => {
                    return Err(ScriptError::InvalidSample(
                        exec_time_s,
                        payload.trim().to_string(),
                    ))
                }
            };

            // Build command from the match
            cmd_queue.push_back(Command {
                exec_time_s,
                sample,
            });
        }

        if cmd_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        Ok(InputScript {
            _script_path: path,
            cmds: cmd_queue,
        })
    }

    /// Return the latest sample due at the given time, or `None` if no new
    /// sample applies yet.
    ///
    /// Time is passed in rather than read from the session clock so that
    /// playback is deterministic for a fixed cycle period.
    pub fn get_pending(&mut self, current_time_s: f64) -> PendingSample {
        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return PendingSample::EndOfScript;
        }

        let mut latest: Option<ScriptSample> = None;

        // Peek items from the queue, if the head's exec time is lower than
        // the current time take it, keeping only the latest due sample since
        // earlier ones have already been superseded.
        while self
            .cmds
            .front()
            .map(|c| c.exec_time_s <= current_time_s)
            .unwrap_or(false)
        {
            latest = self.cmds.pop_front().map(|c| c.sample);
        }

        match latest {
            Some(s) => PendingSample::Some(s),
            None => PendingSample::None,
        }
    }

    /// Get the number of samples remaining in the script
    pub fn get_num_samples(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64,
        }
    }
}
