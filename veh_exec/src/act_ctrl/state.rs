//! Implementations for the ActCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector3;
use serde::Serialize;

// Internal
use super::{ActCtrlError, Params, DEMAND_DEADBAND};
use crate::body::Pose;
use crate::input::ControlSample;
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Force actuation control module state
#[derive(Default)]
pub struct ActCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,

    pub(crate) output: Option<OutputData>,
}

/// Input data to Force actuation control.
#[derive(Debug, Clone, Copy)]
pub struct InputData {
    /// The control sample to execute this tick.
    pub control: ControlSample,

    /// The body's forward axis in the world frame.
    pub forward: Vector3<f64>,

    /// The body's current linear velocity in the world frame.
    pub velocity_mps: Vector3<f64>,

    /// The fixed timestep over which the demands apply.
    pub dt_s: f64,
}

/// Output demand from ActCtrl that the root controller must apply to the
/// rigid body.
#[derive(Clone, Copy, Serialize, Debug)]
pub struct OutputData {
    /// Force demand in the world frame.
    ///
    /// Units: newtons
    pub force_n: Vector3<f64>,

    /// Torque demand in the world frame.
    ///
    /// Units: newton meters
    pub torque_nm: Vector3<f64>,
}

impl Default for OutputData {
    fn default() -> Self {
        OutputData {
            force_n: Vector3::zeros(),
            torque_nm: Vector3::zeros(),
        }
    }
}

/// Status report for ActCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// True if a forward force demand was produced this tick
    pub accel_applied: bool,

    /// True if a braking force demand was produced this tick
    pub brake_applied: bool,

    /// True if a brake demand was present but skipped because the body is
    /// stationary (normalising a zero velocity is undefined)
    pub brake_skipped_zero_speed: bool,

    /// True if a steering torque demand was produced this tick
    pub steer_applied: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for ActCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = ActCtrlError;

    /// Initialise the ActCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, _session: &Session) -> Result<(), Self::InitError> {
        self.params = params::load(init_data)?;

        Ok(())
    }

    /// Perform cyclic processing of Force actuation control.
    ///
    /// The three demands are independent and may all apply in the same tick.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        if !input_data.control.is_finite() {
            return Err(ActCtrlError::NonFiniteControl(input_data.control));
        }

        let control = input_data.control;
        let mut output = OutputData::default();

        // Forward force along the body's forward axis
        if control.accel > DEMAND_DEADBAND {
            output.force_n +=
                input_data.forward * control.accel * self.params.acceleration_force_n * input_data.dt_s;
            self.report.accel_applied = true;
        }

        // Braking force against the current velocity direction. A stationary
        // body has no velocity direction so the demand is skipped for the
        // tick.
        if control.brake > DEMAND_DEADBAND {
            let speed_mps = input_data.velocity_mps.norm();

            if speed_mps > 0.0 {
                let brake_dir = -input_data.velocity_mps / speed_mps;
                output.force_n +=
                    brake_dir * control.brake * self.params.brake_force_n * input_data.dt_s;
                self.report.brake_applied = true;
            } else {
                self.report.brake_skipped_zero_speed = true;
            }
        }

        // Steering torque about the world vertical axis
        if control.steer.abs() > DEMAND_DEADBAND {
            output.torque_nm +=
                Pose::up() * control.steer * self.params.turn_torque_nm * input_data.dt_s;
            self.report.steer_applied = true;
        }

        trace!(
            "ActCtrl output:\n    force: {:?}\n    torque: {:?}",
            output.force_n,
            output.torque_nm
        );

        // Update the output in self
        self.output = Some(output);

        Ok((output, self.report))
    }
}

impl ActCtrl {
    /// Build the module directly from a parameter set.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }
}
