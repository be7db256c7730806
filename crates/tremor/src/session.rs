//! Simulation session: the single owner of grid, fields, origins and probes
//!
//! A session is either [`SessionState::Editing`] (grid, origins and probes
//! may change, physics is idle) or [`SessionState::Running`] (physics ticks,
//! every mutation is refused). Transitions:
//!
//! - `start`: Editing -> Running, zero fields and inject origins
//! - `replay`: Running -> Running, zero fields and re-inject
//! - `finish`: Running -> Editing, zero fields, keep everything else
//! - `reload`: any -> Editing, everything back to a blank grid

use tracing::{debug, trace};
use crate::clock::SimulationClock;
use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::field::FieldState;
use crate::grid::MediumGrid;
use crate::kernel::WaveKernel;
use crate::medium::MediumCatalog;
use crate::origin::{inject, Origin, OriginSet};
use crate::paint::PaintOp;
use crate::probe::ProbeSet;
use crate::render::{render_frame, Frame};
use crate::snapshot::{SnapshotReport, TerrainSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Editing,
    Running,
}

#[derive(Debug, Clone)]
pub struct SimulationSession {
    config: SimConfig,
    catalog: MediumCatalog,
    kernel: WaveKernel,
    grid: MediumGrid,
    fields: FieldState,
    origins: OriginSet,
    probes: ProbeSet,
    clock: SimulationClock,
    state: SessionState,
    ticks: u64,
}

impl SimulationSession {
    /// Blank session with the standard medium catalog
    pub fn new(config: SimConfig) -> SimResult<Self> {
        Self::with_catalog(config, MediumCatalog::standard())
    }

    pub fn with_catalog(config: SimConfig, catalog: MediumCatalog) -> SimResult<Self> {
        config.validate()?;
        let grid = MediumGrid::new(config.rows, config.cols)?;
        let fields = FieldState::new(config.rows, config.cols);
        Ok(Self {
            kernel: WaveKernel::new(&config),
            clock: SimulationClock::new(config.fixed_step),
            config,
            catalog,
            grid,
            fields,
            origins: OriginSet::new(),
            probes: ProbeSet::new(),
            state: SessionState::Editing,
            ticks: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn catalog(&self) -> &MediumCatalog {
        &self.catalog
    }

    pub fn grid(&self) -> &MediumGrid {
        &self.grid
    }

    pub fn fields(&self) -> &FieldState {
        &self.fields
    }

    pub fn origins(&self) -> &OriginSet {
        &self.origins
    }

    pub fn probes(&self) -> &ProbeSet {
        &self.probes
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Fixed ticks executed since the last start or replay
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds since the last start or replay
    pub fn simulated_time(&self) -> f64 {
        self.ticks as f64 * self.config.fixed_step
    }

    fn require_editing(&self) -> SimResult<()> {
        match self.state {
            SessionState::Editing => Ok(()),
            SessionState::Running => Err(SimError::NotEditing),
        }
    }

    fn require_running(&self) -> SimResult<()> {
        match self.state {
            SessionState::Running => Ok(()),
            SessionState::Editing => Err(SimError::NotRunning),
        }
    }

    fn require_medium(&self, id: u8) -> SimResult<()> {
        if self.catalog.contains(id) {
            Ok(())
        } else {
            Err(SimError::UnknownMedium(id))
        }
    }

    fn require_cell(&self, x: usize, y: usize) -> SimResult<()> {
        if x < self.grid.cols() && y < self.grid.rows() {
            Ok(())
        } else {
            Err(SimError::OutOfBounds {
                x: x as i64,
                y: y as i64,
            })
        }
    }

    // Editing

    pub fn set_cell(&mut self, x: usize, y: usize, id: u8) -> SimResult<()> {
        self.require_editing()?;
        self.require_medium(id)?;
        self.grid.set(x, y, id)
    }

    pub fn paint(&mut self, op: PaintOp) -> SimResult<()> {
        self.require_editing()?;
        self.require_medium(op.medium())?;
        op.apply(&mut self.grid);
        Ok(())
    }

    /// Paint the outer ring with `id`
    pub fn fill_border(&mut self, id: u8) -> SimResult<()> {
        self.require_editing()?;
        self.require_medium(id)?;
        self.grid.fill_border(id);
        Ok(())
    }

    pub fn add_origin(&mut self, x: usize, y: usize, magnitude: f64) -> SimResult<()> {
        self.require_editing()?;
        self.require_cell(x, y)?;
        if !(magnitude.is_finite() && magnitude >= 0.0) {
            return Err(SimError::InvalidMagnitude(magnitude));
        }
        if !self.origins.insert(Origin::new(x, y, magnitude)) {
            return Err(SimError::OriginExists { x, y });
        }
        Ok(())
    }

    pub fn remove_origin(&mut self, x: usize, y: usize) -> SimResult<Origin> {
        self.require_editing()?;
        self.origins.remove(x, y).ok_or(SimError::NoOriginAt { x, y })
    }

    /// Change a magnitude; negative or NaN input is stored as 0
    pub fn set_origin_magnitude(&mut self, x: usize, y: usize, magnitude: f64) -> SimResult<f64> {
        self.require_editing()?;
        self.origins
            .set_magnitude(x, y, magnitude)
            .ok_or(SimError::NoOriginAt { x, y })
    }

    pub fn clear_origins(&mut self) -> SimResult<()> {
        self.require_editing()?;
        self.origins.clear();
        Ok(())
    }

    /// Place a seismograph, returning its id
    pub fn add_probe(&mut self, x: usize, y: usize) -> SimResult<u32> {
        self.require_editing()?;
        self.require_cell(x, y)?;
        self.probes
            .add(x, y)
            .map(|probe| probe.id)
            .ok_or(SimError::ProbeExists { x, y })
    }

    pub fn remove_probe(&mut self, x: usize, y: usize) -> SimResult<()> {
        self.require_editing()?;
        self.probes
            .remove(x, y)
            .map(|_| ())
            .ok_or(SimError::NoProbeAt { x, y })
    }

    /// Bulk-replace the grid; returns how many cells defaulted to medium 0
    pub fn replace_grid(&mut self, rows: &[Vec<Option<i64>>]) -> SimResult<usize> {
        self.require_editing()?;
        let catalog = &self.catalog;
        Ok(self.grid.replace_from_rows(rows, |id| catalog.contains(id)))
    }

    /// Bulk-replace the origin list, dropping invalid or duplicate entries
    ///
    /// Returns how many entries were dropped.
    pub fn replace_origins<I>(&mut self, origins: I) -> SimResult<usize>
    where
        I: IntoIterator<Item = Origin>,
    {
        self.require_editing()?;
        let (rows, cols) = self.grid.dims();
        let mut set = OriginSet::new();
        let mut dropped = 0;
        for origin in origins {
            let valid = origin.x < cols
                && origin.y < rows
                && origin.magnitude.is_finite()
                && origin.magnitude >= 0.0;
            if !(valid && set.insert(origin)) {
                dropped += 1;
            }
        }
        self.origins = set;
        Ok(dropped)
    }

    pub fn apply_snapshot(&mut self, snapshot: &TerrainSnapshot) -> SimResult<SnapshotReport> {
        self.require_editing()?;
        let catalog = &self.catalog;
        let report = snapshot.apply(&mut self.grid, &mut self.origins, |id| catalog.contains(id));
        debug!(
            "Loaded snapshot: {} origins ({} dropped), {} cells defaulted",
            report.loaded_origins, report.dropped_origins, report.defaulted_cells
        );
        Ok(report)
    }

    pub fn snapshot(&self) -> TerrainSnapshot {
        TerrainSnapshot::capture(&self.grid, &self.origins)
    }

    // Lifecycle

    fn restart_fields(&mut self) {
        self.fields.reset();
        self.probes.clear_buffers();
        inject(&mut self.fields, &self.origins);
        self.ticks = 0;
    }

    pub fn start(&mut self) -> SimResult<()> {
        self.require_editing()?;
        if self.origins.is_empty() {
            return Err(SimError::NoOrigins);
        }
        self.restart_fields();
        self.state = SessionState::Running;
        debug!("Simulation started with {} origins", self.origins.len());
        Ok(())
    }

    /// Re-inject the same origins into zeroed fields without leaving Running
    ///
    /// Carried-over clock time is kept; call [`Self::reset_clock`] to drop it.
    pub fn replay(&mut self) -> SimResult<()> {
        self.require_running()?;
        if self.origins.is_empty() {
            return Err(SimError::NoOrigins);
        }
        self.restart_fields();
        debug!("Simulation replayed after {:.2}s", self.clock.accumulated());
        Ok(())
    }

    pub fn finish(&mut self) -> SimResult<()> {
        self.require_running()?;
        self.state = SessionState::Editing;
        self.fields.reset();
        debug!("Simulation finished after {} ticks", self.ticks);
        Ok(())
    }

    /// Back to a blank Editing session with the same config and catalog
    pub fn reload(&mut self) {
        self.grid.fill(0);
        self.fields.reset();
        self.origins.clear();
        self.probes.clear();
        self.clock.reset();
        self.state = SessionState::Editing;
        self.ticks = 0;
        debug!("Session reloaded");
    }

    pub fn reset_clock(&mut self) {
        self.clock.reset();
        debug!("Clock reset");
    }

    // Physics

    /// Feed a frame delta and run every fixed tick now due
    ///
    /// Time only accumulates while running; in Editing this returns 0.
    pub fn advance(&mut self, frame_dt: f64) -> SimResult<usize> {
        if !self.is_running() {
            return Ok(0);
        }
        let due = self.clock.advance(frame_dt);
        for _ in 0..due {
            self.step()?;
        }
        trace!("Frame of {:.4}s ran {} ticks", frame_dt, due);
        Ok(due)
    }

    /// Run exactly one fixed tick
    pub fn step(&mut self) -> SimResult<()> {
        self.require_running()?;
        self.kernel
            .step(&self.grid, &self.catalog, &mut self.fields, self.config.fixed_step)?;
        self.probes.sample(&self.fields);
        self.ticks += 1;
        Ok(())
    }

    pub fn render_frame(&self) -> Frame {
        render_frame(&self.grid, &self.catalog, &self.fields)
    }
}
