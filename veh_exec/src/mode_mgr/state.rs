//! Implementation of the control mode state machine.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use serde::Serialize;

// Internal
use crate::input::ControlSample;
use crate::mode_mgr::Params;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The control mode the vehicle is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Mode {
    /// Driver inputs are converted to forces and torques on the body.
    Manual,

    /// The body follows the waypoint path autonomously.
    AutoWaypoint {
        /// Time at which autonomous mode was entered.
        ///
        /// Units: seconds
        entered_at_s: f64,

        /// How long the input had been idle when the mode was entered.
        ///
        /// Units: seconds
        idle_for_s: f64,
    },
}

/// A mode change which occurred during the current tick.
///
/// Transitions are edge events, they are reported exactly once on the tick
/// the mode changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Transition {
    /// The input went idle for long enough that autonomous mode takes over.
    ManualToAuto,

    /// Input activity was detected and the driver regains control.
    AutoToManual,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Mode manager state.
#[derive(Debug, Clone)]
pub struct ModeMgr {
    params: Params,

    mode: Mode,

    /// Time of the most recent tick with above-threshold input.
    ///
    /// Units: seconds
    last_input_time_s: f64,

    /// Transition which occurred during the most recent tick, if any.
    transition: Option<Transition>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Mode {
    fn default() -> Self {
        Mode::Manual
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Mode::Manual => write!(f, "MANUAL"),
            Mode::AutoWaypoint { .. } => write!(f, "AUTO"),
        }
    }
}

impl ModeMgr {
    /// Create a new uninitialised mode manager in manual mode.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
            mode: Mode::Manual,
            last_input_time_s: 0.0,
            transition: None,
        }
    }

    /// Initialise the mode manager by loading its parameter file.
    pub fn init(&mut self, params_path: &str) -> Result<(), super::ModeMgrError> {
        self.params = util::params::load(params_path)?;

        Ok(())
    }

    /// Create a mode manager from in-memory parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            mode: Mode::Manual,
            last_input_time_s: 0.0,
            transition: None,
        }
    }

    /// The current control mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// True if the vehicle is in autonomous mode.
    pub fn is_auto(&self) -> bool {
        matches!(self.mode, Mode::AutoWaypoint { .. })
    }

    /// The transition which occurred during the most recent tick, if any.
    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    /// True if the mode changed during the most recent tick.
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Time elapsed since the most recent tick with input activity.
    ///
    /// Units: seconds
    pub fn time_since_input_s(&self, now_s: f64) -> f64 {
        now_s - self.last_input_time_s
    }

    /// Advance the state machine by one tick.
    ///
    /// Any input activity regains manual control immediately and resets the
    /// idle timer. With no activity the idle timer runs, and once it strictly
    /// exceeds the configured idle time autonomous mode is entered. The
    /// returned transition is also latched and available from
    /// [`ModeMgr::transition`] until the next tick.
    pub fn step(&mut self, now_s: f64, control: &ControlSample) -> Option<Transition> {
        self.transition = None;

        if control.has_activity(self.params.input_threshold) {
            self.last_input_time_s = now_s;

            if self.is_auto() {
                info!("Input activity detected, switching to manual control");
                self.mode = Mode::Manual;
                self.transition = Some(Transition::AutoToManual);
            }
        } else if !self.is_auto() {
            let idle_for_s = now_s - self.last_input_time_s;

            if idle_for_s > self.params.idle_time_before_auto_s {
                info!(
                    "Input idle for {:.2} s, switching to autonomous waypoint mode",
                    idle_for_s
                );
                self.mode = Mode::AutoWaypoint {
                    entered_at_s: now_s,
                    idle_for_s,
                };
                self.transition = Some(Transition::ManualToAuto);
            }
        }

        self.transition
    }
}

impl Default for ModeMgr {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn test_params() -> Params {
        Params {
            idle_time_before_auto_s: 3.0,
            input_threshold: 0.1,
        }
    }

    fn idle() -> ControlSample {
        ControlSample::default()
    }

    fn active() -> ControlSample {
        ControlSample {
            steer: 0.5,
            accel: 0.0,
            brake: 0.0,
        }
    }

    #[test]
    fn idle_timeout_enters_auto_only_after_threshold() {
        let mut mgr = ModeMgr::with_params(test_params());

        // At exactly the idle time the comparison is strict, so still manual
        assert_eq!(mgr.step(3.0, &idle()), None);
        assert_eq!(mgr.mode(), Mode::Manual);

        // One tick past it the transition fires
        assert_eq!(mgr.step(3.02, &idle()), Some(Transition::ManualToAuto));
        assert!(mgr.is_auto());
        assert_eq!(
            mgr.mode(),
            Mode::AutoWaypoint {
                entered_at_s: 3.02,
                idle_for_s: 3.02
            }
        );
    }

    #[test]
    fn transition_fires_exactly_once() {
        let mut mgr = ModeMgr::with_params(test_params());

        assert_eq!(mgr.step(3.5, &idle()), Some(Transition::ManualToAuto));

        // Staying idle in auto produces no further transitions
        assert_eq!(mgr.step(3.52, &idle()), None);
        assert_eq!(mgr.step(10.0, &idle()), None);
        assert!(mgr.is_auto());
        assert!(!mgr.is_transitioning());
    }

    #[test]
    fn single_active_tick_exits_auto_and_resets_timer() {
        let mut mgr = ModeMgr::with_params(test_params());

        mgr.step(3.5, &idle());
        assert!(mgr.is_auto());

        // One tick of activity is enough to regain manual control
        assert_eq!(mgr.step(4.0, &active()), Some(Transition::AutoToManual));
        assert_eq!(mgr.mode(), Mode::Manual);

        // The idle timer restarts from the activity tick, so auto isn't
        // re-entered until a full idle period later
        assert_eq!(mgr.step(7.0, &idle()), None);
        assert_eq!(mgr.step(7.02, &idle()), Some(Transition::ManualToAuto));
    }

    #[test]
    fn activity_in_manual_holds_manual() {
        let mut mgr = ModeMgr::with_params(test_params());

        for i in 0..500 {
            assert_eq!(mgr.step(i as f64 * 0.02, &active()), None);
        }
        assert_eq!(mgr.mode(), Mode::Manual);
        assert_eq!(mgr.time_since_input_s(499.0 * 0.02), 0.0);
    }

    #[test]
    fn sub_threshold_input_counts_as_idle() {
        let mut mgr = ModeMgr::with_params(test_params());

        let weak = ControlSample {
            steer: 0.05,
            accel: 0.05,
            brake: 0.05,
        };

        assert_eq!(mgr.step(3.5, &weak), Some(Transition::ManualToAuto));
    }
}
