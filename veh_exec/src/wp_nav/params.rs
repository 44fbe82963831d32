//! Parameters structure for WpNav

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Waypoint navigation.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Params {
    /// Radius within which a waypoint is considered arrived at and the
    /// target advances.
    ///
    /// Units: meters
    pub reach_distance_m: f64,

    /// Forward speed of the body while navigating.
    ///
    /// Units: meters/second
    pub waypoint_speed_mps: f64,

    /// Rate at which the heading tracks the target direction, applied as a
    /// slerp factor of `clamp01(heading_rate * dt)` per tick.
    ///
    /// Units: 1/seconds
    pub heading_rate_per_s: f64,

    /// The waypoint positions in the world frame, in path order.
    ///
    /// Units: meters
    pub waypoints_m: Vec<[f64; 3]>,
}
