//! # Mode manager module
//!
//! This module implements the control mode state machine arbitrating between
//! two modes:
//!
//! - `Manual` - the driver's normalized inputs are converted into forces and
//!   torques on the body.
//! - `AutoWaypoint` - the body follows the waypoint path autonomously.
//!
//! Arbitration is asymmetric by design: a single tick of above-threshold
//! input regains manual control immediately, while autonomous mode is only
//! entered after the input has been idle for a configured time. The
//! asymmetry prevents rapid mode toggling.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ModeMgr operation.
#[derive(Debug, thiserror::Error)]
pub enum ModeMgrError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),
}
