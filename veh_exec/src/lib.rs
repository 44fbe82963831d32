//! # Vehicle controller library.
//!
//! This library allows other crates in the workspace (and the integration
//! tests) to access the modules defined inside the vehicle executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Force actuation module - converts normalized controls into force/torque demands
pub mod act_ctrl;

/// Rigid body capability interface - the only physics surface the controller depends on
pub mod body;

/// Global data store for the executable
pub mod data_store;

/// Input module - normalizes raw device channels into control samples
pub mod input;

/// Mode manager - the Manual/AutoWaypoint arbitration state machine
pub mod mode_mgr;

/// Simulation body - a simple integrator implementing the rigid body capability
pub mod sim_body;

/// Vehicle controller - the root module composing actuation, navigation and arbitration
pub mod veh_ctrl;

/// Waypoint navigation module - bidirectional sweep along a bounded path
pub mod wp_nav;
