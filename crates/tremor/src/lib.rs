//! tremor: 2D P/S elastic-wave sandbox core
//!
//! This crate provides:
//! - A medium catalog and a per-cell medium grid with paint tools
//! - Four flat field buffers (P/S displacement and velocity)
//! - Origin injection and a finite-difference wave kernel
//! - A fixed-timestep clock and an Editing/Running session
//! - Seismograph probes, frame rendering and snapshot JSON
//!
//! The grid is `rows x cols`, indexed `y * cols + x`. One tick advances
//! simulated time by `SimConfig::fixed_step` (0.01 s by default).

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod field;
pub mod grid;
pub mod kernel;
pub mod medium;
pub mod origin;
pub mod paint;
pub mod probe;
pub mod render;
pub mod report;
pub mod session;
pub mod snapshot;

pub use clock::SimulationClock;
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use field::{Field, FieldState};
pub use grid::MediumGrid;
pub use kernel::{StepCoefficients, WaveKernel};
pub use medium::{MediumCatalog, MediumPreset, Rgb};
pub use origin::{clamp_magnitude, inject, Origin, OriginSet};
pub use paint::PaintOp;
pub use probe::{ProbeSet, Seismograph, TraceStats};
pub use render::{blend, render_frame, wave_color, Frame};
pub use report::render_report;
pub use session::{SessionState, SimulationSession};
pub use snapshot::{OriginRecord, SnapshotReport, TerrainSnapshot};
