//! Fixed simulation constants
//!
//! The tunable ones (base velocities, cell size, step) live in
//! [`SimConfig`](crate::SimConfig) and only provide their defaults here.

/// Base P-wave velocity (km/s)
pub const P_WAVE_BASE_VELOCITY: f64 = 6.0;
/// Base S-wave velocity (km/s)
pub const S_WAVE_BASE_VELOCITY: f64 = 3.5;
/// Physical size of one grid cell (km)
pub const KM_PER_CELL: f64 = 0.5;
/// Physics step (s)
pub const FIXED_STEP: f64 = 0.01;

/// Default grid size used by every observed configuration
pub const DEFAULT_ROWS: usize = 100;
pub const DEFAULT_COLS: usize = 100;

/// Velocity multiplier applied on reflective cells each tick
pub const REFLECTION_COEFFICIENT: f64 = -0.5;

/// Half-width of the square neighborhood an origin writes into
pub const INJECTION_RADIUS: i64 = 3;
/// S displacement injected relative to P displacement
pub const S_INJECTION_RATIO: f64 = 0.8;

/// Opacity of the wave overlay drawn over medium colors
pub const OVERLAY_ALPHA: f64 = 0.6;

/// Samples retained per seismograph
pub const SEISMOGRAPH_CAPACITY: usize = 2000;
