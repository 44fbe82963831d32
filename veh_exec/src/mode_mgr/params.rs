//! Parameters structure for ModeMgr

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Mode management.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Params {
    /// Time the input must be idle before autonomous mode is entered.
    ///
    /// Units: seconds
    pub idle_time_before_auto_s: f64,

    /// Threshold above which a control channel counts as input activity.
    pub input_threshold: f64,
}
