//! # Replay Executable Parameters
//!
//! This module provides parameters for the replay executable, loaded from `replay_exec.toml`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use comms_if::msg::DEFAULT_FRAME_ID;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayExecParams {
    /// Maximum number of route points in a replayed path
    pub path_length: usize,

    /// Time between two planning runs
    pub plan_period_s: f64,

    /// Rate at which the latest path is republished, this is also the main loop rate
    pub publish_rate_hz: f64,

    /// Cruise speed used until one is received, in meters/second
    pub default_cruise_speed_ms: f64,

    /// Frame the outgoing messages are stamped with
    pub frame_id: String,

    /// If set the replayed path is densified so that its points are at most this far apart
    pub interp_spacing_m: Option<f64>,

    /// If true every planned path is saved into the session directory
    pub save_paths: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("The publish rate must be a finite number greater than zero, found {0}")]
    InvalidPublishRate(f64),

    #[error("The planning period must be a finite number greater than zero, found {0}")]
    InvalidPlanPeriod(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for ReplayExecParams {
    fn default() -> Self {
        Self {
            path_length: 20,
            plan_period_s: 1.0,
            publish_rate_hz: 60.0,
            default_cruise_speed_ms: 5.0,
            frame_id: DEFAULT_FRAME_ID.into(),
            interp_spacing_m: None,
            save_paths: false,
        }
    }
}

impl ReplayExecParams {
    /// Check that the loop timing parameters can be used.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(self.publish_rate_hz.is_finite() && self.publish_rate_hz > 0.0) {
            return Err(ParamsError::InvalidPublishRate(self.publish_rate_hz));
        }

        if !(self.plan_period_s.is_finite() && self.plan_period_s > 0.0) {
            return Err(ParamsError::InvalidPlanPeriod(self.plan_period_s));
        }

        Ok(())
    }

    /// Duration of one main loop cycle in seconds.
    pub fn cycle_period_s(&self) -> f64 {
        1.0 / self.publish_rate_hz
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_params() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "path_length = 30").unwrap();

        let params: ReplayExecParams = util::params::load_from_path(file.path()).unwrap();

        assert_eq!(params.path_length, 30);
        assert_eq!(params.plan_period_s, 1.0);
        assert_eq!(params.default_cruise_speed_ms, 5.0);
        assert_eq!(params.frame_id, "map");
        assert!(params.interp_spacing_m.is_none());
        assert!(!params.save_paths);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_reject_zero_publish_rate() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "publish_rate_hz = 0.0").unwrap();

        let params: ReplayExecParams = util::params::load_from_path(file.path()).unwrap();

        assert!(matches!(
            params.validate(),
            Err(ParamsError::InvalidPublishRate(r)) if r == 0.0
        ));
    }

    #[test]
    fn test_reject_bad_timing() {
        for &rate in [-60.0, std::f64::NAN, std::f64::INFINITY].iter() {
            let params = ReplayExecParams {
                publish_rate_hz: rate,
                ..Default::default()
            };
            assert!(matches!(
                params.validate(),
                Err(ParamsError::InvalidPublishRate(_))
            ));
        }

        for &period in [0.0, -1.0, std::f64::NAN].iter() {
            let params = ReplayExecParams {
                plan_period_s: period,
                ..Default::default()
            };
            assert!(matches!(
                params.validate(),
                Err(ParamsError::InvalidPlanPeriod(_))
            ));
        }
    }
}
