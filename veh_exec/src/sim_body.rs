//! # Simulation body
//!
//! A simple rigid body integrator implementing the [`RigidBody`] capability,
//! used by the executable and the integration tests in place of a full
//! physics engine. Semi-implicit Euler with per-step linear damping.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{UnitQuaternion, Vector3};
use serde::Deserialize;

// Internal
use crate::body::{Pose, RigidBody};
use util::maths::clamp01;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the simulation body.
#[derive(Debug, Clone, Deserialize)]
pub struct SimBodyParams {
    /// Mass of the body.
    ///
    /// Units: kilograms
    pub mass_kg: f64,

    /// Moment of inertia about the vertical axis, treated as isotropic.
    ///
    /// Units: kilogram meters squared
    pub inertia_kgm2: f64,

    /// Linear drag coefficient, applied as `v *= 1 - drag * dt` per step.
    ///
    /// Units: 1/seconds
    pub drag_coeff: f64,

    /// Initial position in the world frame.
    ///
    /// Units: meters
    pub initial_position_m: [f64; 3],

    /// Initial heading about the world vertical axis.
    ///
    /// Units: radians
    pub initial_heading_rad: f64,
}

/// Simulation rigid body state.
pub struct SimBody {
    params: SimBodyParams,

    pose: Pose,
    velocity_mps: Vector3<f64>,
    ang_velocity_rads: Vector3<f64>,

    /// Force accumulated since the last step, cleared on integration
    force_accum_n: Vector3<f64>,

    /// Torque accumulated since the last step, cleared on integration
    torque_accum_nm: Vector3<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimBody {
    pub fn new(params: SimBodyParams) -> Self {
        let pose = Pose {
            position_m: Vector3::from(params.initial_position_m),
            attitude_q: UnitQuaternion::from_axis_angle(
                &Vector3::y_axis(),
                params.initial_heading_rad,
            ),
        };

        Self {
            params,
            pose,
            velocity_mps: Vector3::zeros(),
            ang_velocity_rads: Vector3::zeros(),
            force_accum_n: Vector3::zeros(),
            torque_accum_nm: Vector3::zeros(),
        }
    }

    /// Integrate the accumulated forces and torques over the given timestep.
    pub fn step(&mut self, dt_s: f64) {
        // Semi-implicit Euler: update velocities first, then positions
        self.velocity_mps += self.force_accum_n / self.params.mass_kg * dt_s;
        self.ang_velocity_rads += self.torque_accum_nm / self.params.inertia_kgm2 * dt_s;

        // Linear damping on both velocities
        let damping = clamp01(1.0 - self.params.drag_coeff * dt_s);
        self.velocity_mps *= damping;
        self.ang_velocity_rads *= damping;

        self.pose.position_m += self.velocity_mps * dt_s;
        self.pose.attitude_q =
            UnitQuaternion::from_scaled_axis(self.ang_velocity_rads * dt_s) * self.pose.attitude_q;

        self.force_accum_n = Vector3::zeros();
        self.torque_accum_nm = Vector3::zeros();
    }
}

impl RigidBody for SimBody {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    fn velocity_mps(&self) -> Vector3<f64> {
        self.velocity_mps
    }

    fn set_velocity_mps(&mut self, velocity_mps: Vector3<f64>) {
        self.velocity_mps = velocity_mps;
    }

    fn ang_velocity_rads(&self) -> Vector3<f64> {
        self.ang_velocity_rads
    }

    fn set_ang_velocity_rads(&mut self, ang_velocity_rads: Vector3<f64>) {
        self.ang_velocity_rads = ang_velocity_rads;
    }

    fn apply_force_n(&mut self, force_n: Vector3<f64>) {
        self.force_accum_n += force_n;
    }

    fn apply_torque_nm(&mut self, torque_nm: Vector3<f64>) {
        self.torque_accum_nm += torque_nm;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn test_params() -> SimBodyParams {
        SimBodyParams {
            mass_kg: 1.0,
            inertia_kgm2: 1.0,
            drag_coeff: 0.0,
            initial_position_m: [0.0; 3],
            initial_heading_rad: 0.0,
        }
    }

    #[test]
    fn test_force_integration() {
        let mut body = SimBody::new(test_params());
        body.apply_force_n(Vector3::new(0.0, 0.0, 2.0));
        body.step(0.5);

        assert_relative_eq!(body.velocity_mps(), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(body.pose().position_m, Vector3::new(0.0, 0.0, 0.5));

        // Accumulator cleared, coasting at constant velocity with no drag
        body.step(0.5);
        assert_relative_eq!(body.velocity_mps(), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(body.pose().position_m, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_drag_decays_velocity() {
        let mut params = test_params();
        params.drag_coeff = 1.0;
        let mut body = SimBody::new(params);

        body.set_velocity_mps(Vector3::new(0.0, 0.0, 1.0));
        body.step(0.1);
        assert_relative_eq!(body.velocity_mps().norm(), 0.9, epsilon = 1e-12);
    }
}
