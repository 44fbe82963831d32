//! # Data Store

use crate::input::RawChannels;
use crate::veh_ctrl::VehCtrl;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Simulation elapsed time
    pub sim_time_s: f64,

    // Input
    /// The most recent raw input channels. Held between script samples so
    /// that channels are sample-and-hold, `None` until the first sample.
    pub raw_channels: Option<RawChannels>,

    // Controller
    pub veh_ctrl: VehCtrl,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Sets the 1Hz cycle flag and advances the simulation clock. The clock
    /// is driven from the cycle count, not the wall clock, so runs are
    /// deterministic for a fixed cycle period.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.sim_time_s = self.num_cycles as f64 / cycle_frequency_hz;
    }
}
