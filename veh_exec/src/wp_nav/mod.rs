//! # Waypoint navigation module
//!
//! Advances a target index along a bounded waypoint path with
//! reversal-at-endpoints semantics, producing a deterministic back-and-forth
//! sweep. Each frame tick the navigator turns the body's heading toward the
//! current target and translates it forward along its own heading axis.
//!
//! Whenever autonomous mode is (re-)entered the navigation state is
//! re-anchored to the closest path point (nearest-waypoint seeding).

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

/// Possible errors that can occur during WpNav operation.
#[derive(Debug, thiserror::Error)]
pub enum WpNavError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Attempted to create a waypoint path from an empty point list")]
    EmptyPath,
}
