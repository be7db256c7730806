//! Simulation configuration

use crate::constants::{
    DEFAULT_COLS, DEFAULT_ROWS, FIXED_STEP, KM_PER_CELL, P_WAVE_BASE_VELOCITY,
    S_WAVE_BASE_VELOCITY,
};
use crate::error::{SimError, SimResult};

/// Configuration for a simulation session
///
/// No CFL check is made. The explicit scheme stays stable only while
/// `(velocity * fixed_step / km_per_cell)^2 * max_speed_factor` is well
/// below 0.5; picking values outside that range is the caller's problem.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Grid rows (y extent)
    pub rows: usize,
    /// Grid columns (x extent)
    pub cols: usize,
    /// Fixed physics step in seconds
    pub fixed_step: f64,
    /// Base P-wave velocity (km/s)
    pub p_wave_velocity: f64,
    /// Base S-wave velocity (km/s)
    pub s_wave_velocity: f64,
    /// Cell edge length (km)
    pub km_per_cell: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            fixed_step: FIXED_STEP,
            p_wave_velocity: P_WAVE_BASE_VELOCITY,
            s_wave_velocity: S_WAVE_BASE_VELOCITY,
            km_per_cell: KM_PER_CELL,
        }
    }
}

impl SimConfig {
    /// Default physics on a grid of the given size
    pub fn with_dimensions(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SimError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if !(self.fixed_step.is_finite() && self.fixed_step > 0.0) {
            return Err(SimError::InvalidConfiguration {
                message: format!("fixed_step must be positive, got {}", self.fixed_step),
            });
        }
        if !(self.km_per_cell.is_finite() && self.km_per_cell > 0.0) {
            return Err(SimError::InvalidConfiguration {
                message: format!("km_per_cell must be positive, got {}", self.km_per_cell),
            });
        }
        for (name, v) in [
            ("p_wave_velocity", self.p_wave_velocity),
            ("s_wave_velocity", self.s_wave_velocity),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(SimError::InvalidConfiguration {
                    message: format!("{} must be non-negative, got {}", name, v),
                });
            }
        }
        Ok(())
    }

    /// Stencil gain `(v * dt / dx)^2` for a base velocity at step `dt`
    pub fn velocity_scale(&self, velocity: f64, dt: f64) -> f64 {
        let c = velocity * dt / self.km_per_cell;
        c * c
    }
}
