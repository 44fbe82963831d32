//! Parameters for the vehicle executable itself

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ExecParams {
    /// Total run duration, after which the executable exits cleanly.
    ///
    /// Units: seconds
    pub run_duration_s: f64,
}
