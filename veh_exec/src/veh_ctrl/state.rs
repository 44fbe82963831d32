//! Implementations for the VehCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use nalgebra::Vector3;

// Internal
use super::{VehCtrlError, VehTm};
use crate::act_ctrl::{self, ActCtrl};
use crate::body::RigidBody;
use crate::input::{ControlSample, RawChannels};
use crate::mode_mgr::{Mode, ModeMgr, Transition};
use crate::wp_nav::{WaypointPath, WpNav};
use util::archive::{Archived, Archiver};
use util::module::State;
use util::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Vehicle controller state.
#[derive(Default)]
pub struct VehCtrl {
    act_ctrl: ActCtrl,

    wp_nav: WpNav,

    mode_mgr: ModeMgr,

    /// Body velocity at the end of the previous fixed tick, used to derive
    /// the acceleration telemetry channel.
    prev_velocity_mps: Vector3<f64>,

    /// The control sample derived on the most recent frame tick.
    control: ControlSample,

    /// True once the navigator has been anchored to the path for the first
    /// time.
    nav_seeded: bool,

    /// The most recent telemetry record
    latest_tm: Option<VehTm>,

    arch_tm: Archiver,
}

/// Initialisation data for VehCtrl: the parameter file paths of the three
/// submodules.
#[derive(Debug, Clone, Copy)]
pub struct InitData {
    pub act_ctrl: &'static str,
    pub wp_nav: &'static str,
    pub mode_mgr: &'static str,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehCtrl {
    /// Initialise the controller and all its submodules.
    pub fn init(&mut self, init_data: InitData, session: &Session) -> Result<(), VehCtrlError> {
        self.act_ctrl
            .init(init_data.act_ctrl, session)
            .map_err(VehCtrlError::ActCtrlInitError)?;

        self.wp_nav = WpNav::init(init_data.wp_nav).map_err(VehCtrlError::WpNavInitError)?;

        self.mode_mgr
            .init(init_data.mode_mgr)
            .map_err(VehCtrlError::ModeMgrInitError)?;

        self.arch_tm = Archiver::from_path(session, "veh_tm.csv")
            .map_err(|e| VehCtrlError::ArchiveError(e.to_string()))?;

        info!(
            "VehCtrl initialised, {} waypoints loaded",
            self.wp_nav.get_path().get_num_points()
        );

        Ok(())
    }

    /// Build the controller directly from its submodules.
    pub fn with_modules(act_ctrl: ActCtrl, wp_nav: WpNav, mode_mgr: ModeMgr) -> Self {
        Self {
            act_ctrl,
            wp_nav,
            mode_mgr,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode_mgr.mode()
    }

    pub fn control(&self) -> ControlSample {
        self.control
    }

    pub fn waypoint_path(&self) -> &WaypointPath {
        self.wp_nav.get_path()
    }

    pub fn latest_tm(&self) -> Option<&VehTm> {
        self.latest_tm.as_ref()
    }

    /// Per-frame processing: input sampling, mode arbitration and the
    /// kinematic navigation move.
    ///
    /// The navigator is anchored to the nearest waypoint on the very first
    /// tick, so the navigation state tracks the body's starting position
    /// even before the first handover. On a Manual to AutoWaypoint
    /// transition it is re-anchored and the body's velocities are zeroed, so
    /// the handover starts from rest. Navigation itself only runs from the
    /// tick after the transition.
    pub fn frame_tick(
        &mut self,
        body: &mut dyn RigidBody,
        raw: Option<RawChannels>,
        now_s: f64,
        dt_s: f64,
    ) {
        if !self.nav_seeded {
            self.wp_nav.seed_nearest(&body.pose());
            self.nav_seeded = true;
        }

        self.control = ControlSample::from_raw(raw);

        match self.mode_mgr.step(now_s, &self.control) {
            Some(Transition::ManualToAuto) => {
                self.wp_nav.seed_nearest(&body.pose());
                body.set_velocity_mps(Vector3::zeros());
                body.set_ang_velocity_rads(Vector3::zeros());
            }
            Some(Transition::AutoToManual) => {
                info!("Manual control resumed");
            }
            None => (),
        }

        if self.mode_mgr.is_auto() && !self.mode_mgr.is_transitioning() {
            if let (Some(pose), _) = self.wp_nav.step(&body.pose(), dt_s) {
                body.set_pose(pose);
            }
        }
    }

    /// Per-physics-step processing: manual force and torque demands and the
    /// telemetry record.
    ///
    /// Actuation errors are absorbed here, a bad control sample skips the
    /// demands for one tick rather than aborting the run.
    pub fn fixed_tick(&mut self, body: &mut dyn RigidBody, now_s: f64, dt_s: f64) {
        let velocity_mps = body.velocity_mps();
        let accel_mpss = if dt_s > 0.0 {
            (velocity_mps - self.prev_velocity_mps).norm() / dt_s
        } else {
            0.0
        };

        if !self.mode_mgr.is_auto() || self.mode_mgr.is_transitioning() {
            let input = act_ctrl::InputData {
                control: self.control,
                forward: body.pose().forward(),
                velocity_mps,
                dt_s,
            };

            match self.act_ctrl.proc(&input) {
                Ok((output, _)) => {
                    body.apply_force_n(output.force_n);
                    body.apply_torque_nm(output.torque_nm);
                }
                Err(e) => warn!("Actuation skipped this tick: {}", e),
            }
        }

        let pose = body.pose();
        let (att_roll_rad, att_pitch_rad, att_yaw_rad) = pose.attitude_q.euler_angles();
        let nav = self.wp_nav.get_nav_state();

        self.latest_tm = Some(VehTm {
            time_s: now_s,
            pos_x_m: pose.position_m.x,
            pos_y_m: pose.position_m.y,
            pos_z_m: pose.position_m.z,
            att_roll_rad,
            att_pitch_rad,
            att_yaw_rad,
            speed_mps: velocity_mps.norm(),
            ang_speed_rads: body.ang_velocity_rads().norm(),
            accel_mpss,
            mode: self.mode_mgr.mode().to_string(),
            wp_target_index: nav.target_index,
            wp_direction: nav.direction,
            input_idle_s: self.mode_mgr.time_since_input_s(now_s),
            steer_cmd: self.control.steer,
            accel_cmd: self.control.accel,
            brake_cmd: self.control.brake,
        });

        self.prev_velocity_mps = velocity_mps;
    }
}

impl Archived for VehCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(ref tm) = self.latest_tm {
            self.arch_tm.serialise(tm)?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::act_ctrl;
    use crate::mode_mgr;
    use crate::sim_body::{SimBody, SimBodyParams};
    use crate::wp_nav;
    use approx::assert_relative_eq;

    const DT_S: f64 = 0.02;

    fn test_veh(waypoints: Vec<Vector3<f64>>) -> VehCtrl {
        let path = if waypoints.is_empty() {
            WaypointPath::default()
        } else {
            WaypointPath::from_points(waypoints).unwrap()
        };

        VehCtrl::with_modules(
            ActCtrl::with_params(act_ctrl::Params {
                acceleration_force_n: 50.0,
                brake_force_n: 100.0,
                turn_torque_nm: 10.0,
            }),
            WpNav::with_params(
                wp_nav::Params {
                    reach_distance_m: 0.5,
                    waypoint_speed_mps: 3.0,
                    heading_rate_per_s: 2.0,
                    waypoints_m: vec![],
                },
                path,
            ),
            ModeMgr::with_params(mode_mgr::Params {
                idle_time_before_auto_s: 3.0,
                input_threshold: 0.1,
            }),
        )
    }

    fn test_body() -> SimBody {
        SimBody::new(SimBodyParams {
            mass_kg: 1.0,
            inertia_kgm2: 1.0,
            drag_coeff: 0.0,
            initial_position_m: [0.0; 3],
            initial_heading_rad: 0.0,
        })
    }

    /// Raw channels corresponding to centred sticks (no activity)
    fn idle_raw() -> Option<RawChannels> {
        Some(RawChannels {
            steer: 0.0,
            throttle: 1.0,
            brake: -1.0,
        })
    }

    fn steering_raw() -> Option<RawChannels> {
        Some(RawChannels {
            steer: 0.5,
            throttle: 1.0,
            brake: -1.0,
        })
    }

    #[test]
    fn test_idle_entry_hard_stops_and_seeds() {
        let mut veh = test_veh(vec![
            Vector3::new(0.0, 0.0, -10.0),
            Vector3::new(0.0, 0.0, 10.0),
        ]);
        let mut body = test_body();

        // A coasting body with idle input, run past the idle threshold
        body.set_velocity_mps(Vector3::new(0.0, 0.0, 2.0));

        let mut now_s = 0.0;
        while now_s <= 3.0 + DT_S {
            veh.frame_tick(&mut body, idle_raw(), now_s, DT_S);
            veh.fixed_tick(&mut body, now_s, DT_S);
            body.step(DT_S);
            now_s += DT_S;
        }

        assert!(matches!(veh.mode(), Mode::AutoWaypoint { .. }));

        // The handover zeroed the velocity on the transition tick, and the
        // navigator re-anchored to the nearer waypoint (+z, ahead of the
        // coasting body)
        assert_relative_eq!(body.ang_velocity_rads(), Vector3::zeros());
        assert_eq!(veh.wp_nav.get_nav_state().target_index, 1);
    }

    #[test]
    fn test_activity_regains_manual_immediately() {
        let mut veh = test_veh(vec![
            Vector3::new(0.0, 0.0, -10.0),
            Vector3::new(0.0, 0.0, 10.0),
        ]);
        let mut body = test_body();

        let mut now_s = 0.0;
        while now_s <= 4.0 {
            veh.frame_tick(&mut body, idle_raw(), now_s, DT_S);
            veh.fixed_tick(&mut body, now_s, DT_S);
            body.step(DT_S);
            now_s += DT_S;
        }
        assert!(matches!(veh.mode(), Mode::AutoWaypoint { .. }));

        // One tick of steering input is enough
        veh.frame_tick(&mut body, steering_raw(), now_s, DT_S);
        assert_eq!(veh.mode(), Mode::Manual);
    }

    #[test]
    fn test_manual_forces_drive_body() {
        let mut veh = test_veh(vec![]);
        let mut body = test_body();

        // Full throttle (slider at -1) for one second of ticks
        let raw = Some(RawChannels {
            steer: 0.0,
            throttle: -1.0,
            brake: -1.0,
        });

        let mut now_s = 0.0;
        for _ in 0..50 {
            veh.frame_tick(&mut body, raw, now_s, DT_S);
            veh.fixed_tick(&mut body, now_s, DT_S);
            body.step(DT_S);
            now_s += DT_S;
        }

        assert_eq!(veh.mode(), Mode::Manual);
        let velocity_mps = body.velocity_mps();
        assert!(velocity_mps.z > 0.0);
        assert_relative_eq!(velocity_mps.x, 0.0);
        assert_relative_eq!(velocity_mps.y, 0.0);
    }

    #[test]
    fn test_auto_mode_moves_kinematically() {
        let mut veh = test_veh(vec![Vector3::new(0.0, 0.0, 100.0)]);
        let mut body = test_body();

        // Enter auto by idling past the threshold, then run for a while
        let mut now_s = 0.0;
        while now_s <= 10.0 {
            veh.frame_tick(&mut body, idle_raw(), now_s, DT_S);
            veh.fixed_tick(&mut body, now_s, DT_S);
            body.step(DT_S);
            now_s += DT_S;
        }

        // The body was moved toward the waypoint by pose writes, not forces
        assert!(matches!(veh.mode(), Mode::AutoWaypoint { .. }));
        assert!(body.pose().position_m.z > 1.0);
        assert_relative_eq!(body.velocity_mps(), Vector3::zeros());
    }

    #[test]
    fn test_nav_seeded_from_starting_position() {
        let mut veh = test_veh(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::new(0.0, 0.0, 20.0),
        ]);
        let mut body = SimBody::new(SimBodyParams {
            mass_kg: 1.0,
            inertia_kgm2: 1.0,
            drag_coeff: 0.0,
            initial_position_m: [0.0, 0.0, 19.0],
            initial_heading_rad: 0.0,
        });

        // One tick in manual mode, long before any handover
        veh.frame_tick(&mut body, idle_raw(), 0.0, DT_S);
        veh.fixed_tick(&mut body, 0.0, DT_S);

        // The telemetry already tracks the path point nearest the starting
        // position, the last waypoint with an inward sweep
        let tm = veh.latest_tm().unwrap();
        assert_eq!(tm.wp_target_index, 2);
        assert_eq!(tm.wp_direction, -1);
        assert_eq!(veh.mode(), Mode::Manual);
    }

    #[test]
    fn test_telemetry_record_tracks_mode() {
        let mut veh = test_veh(vec![]);
        let mut body = test_body();

        veh.frame_tick(&mut body, steering_raw(), 0.0, DT_S);
        veh.fixed_tick(&mut body, 0.0, DT_S);

        let tm = veh.latest_tm().unwrap();
        assert_eq!(tm.mode, "MANUAL");
        assert_eq!(tm.steer_cmd, 0.5);
        assert_eq!(tm.input_idle_s, 0.0);
    }
}
