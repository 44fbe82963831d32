//! # Vehicle controller module
//!
//! The root controller composing the three submodules:
//!
//! - [`crate::input`] / [`crate::act_ctrl`] - normalized driver inputs
//!   converted to force and torque demands
//! - [`crate::wp_nav`] - autonomous waypoint following
//! - [`crate::mode_mgr`] - arbitration between the two
//!
//! The controller runs two cadences, mirroring the body's physics engine:
//! `frame_tick` samples input, arbitrates the mode and performs the
//! kinematic navigation move, while `fixed_tick` applies manual force and
//! torque demands to the body and records telemetry.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod state;
mod tm;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use state::*;
pub use tm::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during VehCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum VehCtrlError {
    #[error("Could not initialise ActCtrl: {0}")]
    ActCtrlInitError(util::params::LoadError),

    #[error("Could not initialise WpNav: {0}")]
    WpNavInitError(crate::wp_nav::WpNavError),

    #[error("Could not initialise ModeMgr: {0}")]
    ModeMgrInitError(crate::mode_mgr::ModeMgrError),

    #[error("Could not create the telemetry archive: {0}")]
    ArchiveError(String),
}
