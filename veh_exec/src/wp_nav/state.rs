//! Implementations for the WpNav state structures

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// Internal
use super::{Params, WpNavError};
use crate::body::Pose;
use util::maths::clamp01;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An ordered sequence of waypoint positions.
///
/// The path is immutable during navigation; index and direction live in
/// [`NavState`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaypointPath {
    pub points_m: Vec<Vector3<f64>>,
}

/// Mutable navigation state over a [`WaypointPath`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NavState {
    /// Index of the current target waypoint, always in `[0, len - 1]`.
    pub target_index: usize,

    /// Sweep direction along the path, `+1` or `-1`.
    pub direction: i32,
}

/// Waypoint navigation module state
#[derive(Debug, Clone, Default)]
pub struct WpNav {
    pub(crate) params: Params,

    pub(crate) path: WaypointPath,

    pub(crate) nav: NavState,

    pub(crate) report: StatusReport,
}

/// Status report for WpNav processing.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    /// The current target waypoint index
    pub target_index: usize,

    /// The current sweep direction
    pub direction: i32,

    /// Distance from the body to the current target
    pub distance_to_target_m: f64,

    /// True if the target was reached (and advanced) this tick
    pub reached: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for NavState {
    fn default() -> Self {
        NavState {
            target_index: 0,
            direction: 1,
        }
    }
}

impl WaypointPath {
    /// Create a path from a list of points.
    ///
    /// An empty list is an error; a single-point path is allowed but
    /// degenerate (the navigator will never advance on it).
    pub fn from_points(points_m: Vec<Vector3<f64>>) -> Result<Self, WpNavError> {
        if points_m.is_empty() {
            return Err(WpNavError::EmptyPath);
        }

        Ok(Self { points_m })
    }

    /// Get the number of points in the path
    pub fn get_num_points(&self) -> usize {
        self.points_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_m.is_empty()
    }
}

impl WpNav {
    /// Initialise the WpNav module.
    ///
    /// Expected init data is the path to the parameter file. A parameter
    /// file with no waypoints leaves the module degraded: navigation steps
    /// are skipped rather than failing.
    pub fn init(params_path: &str) -> Result<Self, WpNavError> {
        let params: Params = util::params::load(params_path)?;

        let path = match WaypointPath::from_points(
            params.waypoints_m.iter().map(|p| Vector3::from(*p)).collect(),
        ) {
            Ok(p) => p,
            Err(WpNavError::EmptyPath) => {
                warn!("No waypoints configured, navigation will be skipped");
                WaypointPath::default()
            }
            Err(e) => return Err(e),
        };

        Ok(Self::with_params(params, path))
    }

    /// Build the module directly from a parameter set and path.
    pub fn with_params(params: Params, path: WaypointPath) -> Self {
        Self {
            params,
            path,
            nav: NavState::default(),
            report: StatusReport::default(),
        }
    }

    pub fn get_path(&self) -> &WaypointPath {
        &self.path
    }

    pub fn get_nav_state(&self) -> NavState {
        self.nav
    }

    /// Perform one navigation step from the given pose.
    ///
    /// Returns the new pose to write back to the body, or `None` if no path
    /// is configured, along with the status report for this tick.
    pub fn step(&mut self, pose: &Pose, dt_s: f64) -> (Option<Pose>, StatusReport) {
        self.report = StatusReport::default();

        if self.path.is_empty() {
            return (None, self.report);
        }

        // Advance the target if the body is within the reach radius
        let distance_m = (self.path.points_m[self.nav.target_index] - pose.position_m).norm();

        if distance_m < self.params.reach_distance_m {
            self.advance_target();
            self.report.reached = true;
        }

        // Turn the heading toward the (possibly new) target. If the body
        // sits exactly on the target there is no direction to face, so the
        // heading update is skipped for this tick.
        let target_vec = self.path.points_m[self.nav.target_index] - pose.position_m;
        let mut attitude_q = pose.attitude_q;

        if target_vec.norm() > 0.0 {
            let target_q = UnitQuaternion::face_towards(&target_vec, &Pose::up());
            let slerp_t = clamp01(self.params.heading_rate_per_s * dt_s);

            if let Some(q) = attitude_q.try_slerp(&target_q, slerp_t, 1.0e-9) {
                attitude_q = q;
            }
        }

        // Translate forward along the body's own heading axis
        let new_pose = Pose {
            position_m: pose.position_m
                + (attitude_q * Vector3::z()) * self.params.waypoint_speed_mps * dt_s,
            attitude_q,
        };

        self.report.target_index = self.nav.target_index;
        self.report.direction = self.nav.direction;
        self.report.distance_to_target_m =
            (self.path.points_m[self.nav.target_index] - new_pose.position_m).norm();

        (Some(new_pose), self.report)
    }

    /// Re-anchor the navigation state to the path point nearest the given
    /// pose, used on startup and on every Manual to AutoWaypoint transition.
    pub fn seed_nearest(&mut self, pose: &Pose) {
        if self.path.is_empty() {
            return;
        }

        let mut nearest_index = 0;
        let mut nearest_distance_m = f64::MAX;

        for (i, point) in self.path.points_m.iter().enumerate() {
            let distance_m = (point - pose.position_m).norm();
            if distance_m < nearest_distance_m {
                nearest_distance_m = distance_m;
                nearest_index = i;
            }
        }

        self.nav.target_index = nearest_index;

        // Sweep direction: at an endpoint the only way is inward, otherwise
        // head toward the nearer neighbour. An exact tie picks -1, matching
        // the strict `<` comparison.
        let last_index = self.path.get_num_points() - 1;
        self.nav.direction = if nearest_index == 0 {
            1
        } else if nearest_index == last_index {
            -1
        } else {
            let dist_next_m = (self.path.points_m[nearest_index + 1] - pose.position_m).norm();
            let dist_prev_m = (self.path.points_m[nearest_index - 1] - pose.position_m).norm();

            if dist_next_m < dist_prev_m {
                1
            } else {
                -1
            }
        };

        debug!(
            "WpNav seeded: nearest waypoint {} ({:.3} m away), direction {}",
            nearest_index, nearest_distance_m, self.nav.direction
        );
    }

    /// Advance the target index one step along the sweep, reversing at the
    /// path endpoints.
    ///
    /// A path with fewer than two points cannot be swept, so advancing is a
    /// no-op there.
    fn advance_target(&mut self) {
        let num_points = self.path.get_num_points();
        if num_points < 2 {
            return;
        }

        let next = self.nav.target_index as i64 + self.nav.direction as i64;

        if next >= num_points as i64 {
            self.nav.target_index = num_points - 2;
            self.nav.direction = -1;
        } else if next < 0 {
            self.nav.target_index = 1;
            self.nav.direction = 1;
        } else {
            self.nav.target_index = next as usize;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn test_params() -> Params {
        Params {
            reach_distance_m: 0.5,
            waypoint_speed_mps: 3.0,
            heading_rate_per_s: 2.0,
            waypoints_m: vec![],
        }
    }

    fn nav_over(points: Vec<Vector3<f64>>) -> WpNav {
        WpNav::with_params(test_params(), WaypointPath::from_points(points).unwrap())
    }

    fn pose_at(x: f64, y: f64, z: f64) -> Pose {
        Pose {
            position_m: Vector3::new(x, y, z),
            ..Pose::default()
        }
    }

    #[test]
    fn test_empty_path_is_error() {
        assert!(matches!(
            WaypointPath::from_points(vec![]),
            Err(WpNavError::EmptyPath)
        ));
    }

    #[test]
    fn test_sweep_with_endpoint_reversal() {
        // Path [A, B, C] along the z axis
        let mut nav = nav_over(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::new(0.0, 0.0, 20.0),
        ]);

        // Within A's reach radius: advance to B
        nav.step(&pose_at(0.0, 0.0, 0.1), 0.02);
        assert_eq!(nav.get_nav_state().target_index, 1);
        assert_eq!(nav.get_nav_state().direction, 1);

        // Reach B: advance to C
        nav.step(&pose_at(0.0, 0.0, 10.1), 0.02);
        assert_eq!(nav.get_nav_state().target_index, 2);

        // Reach C (the last point): reverse back onto B
        nav.step(&pose_at(0.0, 0.0, 20.1), 0.02);
        assert_eq!(nav.get_nav_state().target_index, 1);
        assert_eq!(nav.get_nav_state().direction, -1);

        // Sweep back down: B then A, then reverse again at the front
        nav.step(&pose_at(0.0, 0.0, 10.1), 0.02);
        assert_eq!(nav.get_nav_state().target_index, 0);
        nav.step(&pose_at(0.0, 0.0, 0.1), 0.02);
        assert_eq!(nav.get_nav_state().target_index, 1);
        assert_eq!(nav.get_nav_state().direction, 1);
    }

    #[test]
    fn test_single_point_path_never_advances() {
        let mut nav = nav_over(vec![Vector3::new(0.0, 0.0, 0.0)]);

        // Standing on the single waypoint: no index change, no direction
        // change, no panic
        for _ in 0..10 {
            let (pose, report) = nav.step(&pose_at(0.0, 0.0, 0.1), 0.02);
            assert!(pose.is_some());
            assert!(report.reached);
            assert_eq!(nav.get_nav_state().target_index, 0);
            assert_eq!(nav.get_nav_state().direction, 1);
        }
    }

    #[test]
    fn test_seed_nearest_endpoints() {
        let points = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::new(0.0, 0.0, 20.0),
        ];

        // Nearest the first point: sweep forward
        let mut nav = nav_over(points.clone());
        nav.seed_nearest(&pose_at(0.0, 0.0, 1.0));
        assert_eq!(nav.get_nav_state().target_index, 0);
        assert_eq!(nav.get_nav_state().direction, 1);

        // Nearest the last point: sweep backward
        let mut nav = nav_over(points);
        nav.seed_nearest(&pose_at(0.0, 0.0, 19.0));
        assert_eq!(nav.get_nav_state().target_index, 2);
        assert_eq!(nav.get_nav_state().direction, -1);
    }

    #[test]
    fn test_seed_nearest_interior_follows_nearer_neighbour() {
        // Five points, body nearest index 2 but biased toward index 3
        let points = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::new(0.0, 0.0, 20.0),
            Vector3::new(0.0, 0.0, 30.0),
            Vector3::new(0.0, 0.0, 40.0),
        ];

        let mut nav = nav_over(points.clone());
        nav.seed_nearest(&pose_at(0.0, 0.0, 22.0));
        assert_eq!(nav.get_nav_state().target_index, 2);
        assert_eq!(nav.get_nav_state().direction, 1);

        let mut nav = nav_over(points);
        nav.seed_nearest(&pose_at(0.0, 0.0, 18.0));
        assert_eq!(nav.get_nav_state().target_index, 2);
        assert_eq!(nav.get_nav_state().direction, -1);
    }

    #[test]
    fn seed_direction_tie_breaks_backward() {
        // Body exactly on index 2, equidistant from both neighbours. The
        // strict less-than comparison means the tie resolves to -1.
        let mut nav = nav_over(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::new(0.0, 0.0, 20.0),
            Vector3::new(0.0, 0.0, 30.0),
            Vector3::new(0.0, 0.0, 40.0),
        ]);
        nav.seed_nearest(&pose_at(0.0, 0.0, 20.0));
        assert_eq!(nav.get_nav_state().target_index, 2);
        assert_eq!(nav.get_nav_state().direction, -1);
    }

    #[test]
    fn test_step_translates_along_heading() {
        // Body already facing its distant target: heading barely changes
        // and the translation is along the forward axis
        let mut nav = nav_over(vec![Vector3::new(0.0, 0.0, 100.0)]);
        let pose = pose_at(0.0, 0.0, 0.0);

        let (new_pose, report) = nav.step(&pose, 0.02);
        let new_pose = new_pose.unwrap();

        assert!(!report.reached);
        assert_relative_eq!(
            new_pose.position_m,
            Vector3::new(0.0, 0.0, 3.0 * 0.02),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_heading_update_skipped_on_target() {
        // Body exactly on its only waypoint: no direction to face, pose
        // attitude must be untouched and finite
        let mut nav = nav_over(vec![Vector3::new(0.0, 0.0, 0.0)]);
        let pose = pose_at(0.0, 0.0, 0.0);

        let (new_pose, _) = nav.step(&pose, 0.02);
        let new_pose = new_pose.unwrap();

        assert_relative_eq!(
            new_pose.attitude_q.into_inner(),
            pose.attitude_q.into_inner()
        );
        assert!(new_pose.position_m.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_unconfigured_path_skips_navigation() {
        let mut nav = WpNav::with_params(test_params(), WaypointPath::default());
        let (pose, _) = nav.step(&pose_at(0.0, 0.0, 0.0), 0.02);
        assert!(pose.is_none());
    }
}
