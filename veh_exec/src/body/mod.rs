//! # Rigid body capability interface
//!
//! The controller never owns the physics integration. It depends only on the
//! [`RigidBody`] trait defined here, which a physics engine (or the simple
//! [`crate::sim_body::SimBody`] integrator) implements.
//!
//! Conventions: world frame is Y-up, the body's forward axis is its +Z axis.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pose (position and attitude in the world frame) of the body.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Default)]
pub struct Pose {
    /// The position in the world frame
    pub position_m: Vector3<f64>,

    /// The attitude of the body in the world frame
    pub attitude_q: UnitQuaternion<f64>,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Capability interface onto the externally-owned rigid body.
///
/// The controller issues force/torque commands against the body and reads
/// its state back; velocity and position integration belong to the physics
/// engine. The write accessors exist for the two cases the controller is
/// allowed to bypass the integrator: the navigator's kinematic move and the
/// velocity zeroing performed on a Manual to AutoWaypoint transition.
pub trait RigidBody {
    fn pose(&self) -> Pose;
    fn set_pose(&mut self, pose: Pose);

    fn velocity_mps(&self) -> Vector3<f64>;
    fn set_velocity_mps(&mut self, velocity_mps: Vector3<f64>);

    fn ang_velocity_rads(&self) -> Vector3<f64>;
    fn set_ang_velocity_rads(&mut self, ang_velocity_rads: Vector3<f64>);

    /// Accumulate a force (world frame) for the next integration step.
    fn apply_force_n(&mut self, force_n: Vector3<f64>);

    /// Accumulate a torque (world frame) for the next integration step.
    fn apply_torque_nm(&mut self, torque_nm: Vector3<f64>);
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// The body's forward axis (+Z) expressed in the world frame.
    pub fn forward(&self) -> Vector3<f64> {
        self.attitude_q * Vector3::z()
    }

    /// The world vertical axis (Y-up).
    pub fn up() -> Vector3<f64> {
        Vector3::y()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_forward_axis() {
        // Identity attitude faces +Z
        let pose = Pose::default();
        assert_relative_eq!(pose.forward(), Vector3::z());

        // A quarter turn about Y swings forward onto +X
        let pose = Pose {
            position_m: Vector3::zeros(),
            attitude_q: UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2),
        };
        assert_relative_eq!(pose.forward(), Vector3::x(), epsilon = 1e-12);
    }
}
