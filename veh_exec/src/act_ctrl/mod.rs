//! Force actuation control module
//!
//! Converts a normalized [`crate::input::ControlSample`] into force/torque
//! demands for the rigid body, applied by the root controller each fixed
//! tick while manual control is active.

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
// CONSTANTS
// ---------------------------------------------------------------------------

/// Demands below this magnitude are treated as no demand at all.
pub const DEMAND_DEADBAND: f64 = 0.01;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ActCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ActCtrlError {
    #[error("Recieved a non-finite control sample: {0:?}")]
    NonFiniteControl(crate::input::ControlSample),
}
