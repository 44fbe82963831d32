//! Parameters structure for ActCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Force actuation control.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Params {
    /// Force applied along the body forward axis at full acceleration demand.
    ///
    /// Units: newtons
    pub acceleration_force_n: f64,

    /// Force applied against the velocity direction at full brake demand.
    ///
    /// Units: newtons
    pub brake_force_n: f64,

    /// Torque applied about the world vertical axis at full steer demand.
    ///
    /// Units: newton meters
    pub turn_torque_nm: f64,
}
