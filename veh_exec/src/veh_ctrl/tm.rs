//! Telemetry record produced by the vehicle controller each fixed tick.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One row of vehicle telemetry.
///
/// Kept flat (scalar fields only) so it serialises directly as a CSV record.
#[derive(Debug, Clone, Serialize)]
pub struct VehTm {
    /// Simulation time of this record.
    ///
    /// Units: seconds
    pub time_s: f64,

    /// Body position in the world frame
    pub pos_x_m: f64,
    pub pos_y_m: f64,
    pub pos_z_m: f64,

    /// Body attitude as euler angles.
    ///
    /// Units: radians
    pub att_roll_rad: f64,
    pub att_pitch_rad: f64,
    pub att_yaw_rad: f64,

    /// Linear speed.
    ///
    /// Units: meters/second
    pub speed_mps: f64,

    /// Angular speed.
    ///
    /// Units: radians/second
    pub ang_speed_rads: f64,

    /// Linear acceleration magnitude derived from the velocity delta over
    /// the last fixed tick.
    ///
    /// Units: meters/second^2
    pub accel_mpss: f64,

    /// The current control mode ("MANUAL" or "AUTO")
    pub mode: String,

    /// The current navigation target waypoint index
    pub wp_target_index: usize,

    /// The current navigation sweep direction
    pub wp_direction: i32,

    /// Time since the last tick with input activity.
    ///
    /// Units: seconds
    pub input_idle_s: f64,

    /// The normalized control sample executed this tick
    pub steer_cmd: f64,
    pub accel_cmd: f64,
    pub brake_cmd: f64,
}
