//! # Input module
//!
//! Normalizes the three raw input device channels (steering, throttle,
//! brake) into the ranges the controller expects. The raw conventions match
//! the original input bindings:
//!
//! - steering: [-1, 1], positive right
//! - throttle: slider in [-1, 1], +1 = no throttle, -1 = full throttle
//! - brake: stick in [-1, 1], -1 = no brake, +1 = full brake

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use util::maths::{clamp01, lin_map};
use util::script::ScriptSample;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Raw input channel values as read from the device layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawChannels {
    pub steer: f64,
    pub throttle: f64,
    pub brake: f64,
}

/// A normalized control sample, derived once per frame tick and immutable
/// for that tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ControlSample {
    /// Steering demand in [-1, 1], positive right
    pub steer: f64,

    /// Acceleration demand in [0, 1]
    pub accel: f64,

    /// Brake demand in [0, 1]
    pub brake: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ControlSample {
    /// Derive a normalized sample from the raw device channels.
    ///
    /// A missing input source (`None`) reads as zero on all channels, which
    /// makes an unbound device eligible for the idle timeout.
    pub fn from_raw(raw: Option<RawChannels>) -> Self {
        match raw {
            Some(r) => Self {
                steer: r.steer,
                accel: clamp01(lin_map((1.0, -1.0), (0.0, 1.0), r.throttle)),
                brake: clamp01(lin_map((-1.0, 1.0), (0.0, 1.0), r.brake)),
            },
            None => Self::default(),
        }
    }

    /// True if any channel is above the given activity threshold.
    pub fn has_activity(&self, threshold: f64) -> bool {
        self.steer.abs() > threshold || self.accel > threshold || self.brake > threshold
    }

    /// True if all channels are finite.
    pub fn is_finite(&self) -> bool {
        self.steer.is_finite() && self.accel.is_finite() && self.brake.is_finite()
    }
}

impl From<ScriptSample> for RawChannels {
    fn from(s: ScriptSample) -> Self {
        Self {
            steer: s.steer,
            throttle: s.throttle,
            brake: s.brake,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_throttle_mapping() {
        // Slider at +1 is no throttle, at -1 full throttle
        let none = ControlSample::from_raw(Some(RawChannels {
            steer: 0.0,
            throttle: 1.0,
            brake: -1.0,
        }));
        assert_eq!(none.accel, 0.0);

        let full = ControlSample::from_raw(Some(RawChannels {
            steer: 0.0,
            throttle: -1.0,
            brake: -1.0,
        }));
        assert_eq!(full.accel, 1.0);

        // Mapping stays in [0, 1] across the raw range
        let mut raw = -1.0;
        while raw <= 1.0 {
            let s = ControlSample::from_raw(Some(RawChannels {
                steer: 0.0,
                throttle: raw,
                brake: -1.0,
            }));
            assert!(s.accel >= 0.0 && s.accel <= 1.0);
            raw += 0.125;
        }
    }

    #[test]
    fn test_brake_mapping() {
        let none = ControlSample::from_raw(Some(RawChannels {
            steer: 0.0,
            throttle: 1.0,
            brake: -1.0,
        }));
        assert_eq!(none.brake, 0.0);

        let full = ControlSample::from_raw(Some(RawChannels {
            steer: 0.0,
            throttle: 1.0,
            brake: 1.0,
        }));
        assert_eq!(full.brake, 1.0);

        let mut raw = -1.0;
        while raw <= 1.0 {
            let s = ControlSample::from_raw(Some(RawChannels {
                steer: 0.0,
                throttle: 1.0,
                brake: raw,
            }));
            assert!(s.brake >= 0.0 && s.brake <= 1.0);
            raw += 0.125;
        }
    }

    #[test]
    fn test_missing_source_reads_zero() {
        let s = ControlSample::from_raw(None);
        assert_eq!(s, ControlSample::default());
        assert!(!s.has_activity(0.1));
    }

    #[test]
    fn test_activity_threshold() {
        let s = ControlSample {
            steer: -0.2,
            accel: 0.0,
            brake: 0.0,
        };
        assert!(s.has_activity(0.1));
        assert!(!s.has_activity(0.3));

        // Centred throttle slider maps to 0.5 accel, which counts as activity
        let s = ControlSample::from_raw(Some(RawChannels {
            steer: 0.0,
            throttle: 0.0,
            brake: -1.0,
        }));
        assert!(s.has_activity(0.1));
    }
}
