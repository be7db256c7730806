//! Finite-difference P/S wave propagation
//!
//! Explicit Euler update of two independent 2D scalar wave equations that
//! share the medium grid:
//! - 5-point Laplacian on interior cells, scaled by `(v * dt / dx)^2` and the
//!   medium speed factor, then damped
//! - reflective cells (anywhere on the grid) invert and halve velocity
//! - displacement integrates the final velocity
//!
//! The outer ring never gets a stencil update. A non-reflective medium
//! painted there keeps whatever velocity it already had.
//!
//! Fields are stored as `f32`; every update is evaluated in `f64` and
//! rounded back on store.

use crate::config::SimConfig;
use crate::constants::REFLECTION_COEFFICIENT;
use crate::error::{SimError, SimResult};
use crate::field::FieldState;
use crate::grid::MediumGrid;
use crate::medium::MediumCatalog;

/// Per-id medium parameters resolved for one tick
#[derive(Debug, Clone, Copy)]
struct CellCoeffs {
    speed: f64,
    damping: f64,
    reflective: bool,
}

/// Medium parameters for every possible u8 id, unknown ids mapped to id 0
struct CoeffTable([CellCoeffs; 256]);

impl CoeffTable {
    fn new(catalog: &MediumCatalog) -> Self {
        let mut table = [CellCoeffs {
            speed: 0.0,
            damping: 0.0,
            reflective: false,
        }; 256];
        for (id, entry) in table.iter_mut().enumerate() {
            let m = catalog.lookup(id as u8);
            *entry = CellCoeffs {
                speed: m.speed_factor,
                damping: m.damping_factor,
                reflective: m.reflective,
            };
        }
        Self(table)
    }

    #[inline]
    fn get(&self, id: u8) -> CellCoeffs {
        self.0[usize::from(id)]
    }
}

/// Stencil gains for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepCoefficients {
    pub p_scale: f64,
    pub s_scale: f64,
}

/// Wave propagation kernel
#[derive(Debug, Clone, PartialEq)]
pub struct WaveKernel {
    pub p_wave_velocity: f64,
    pub s_wave_velocity: f64,
    pub km_per_cell: f64,
}

impl WaveKernel {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            p_wave_velocity: config.p_wave_velocity,
            s_wave_velocity: config.s_wave_velocity,
            km_per_cell: config.km_per_cell,
        }
    }

    pub fn coefficients(&self, dt: f64) -> StepCoefficients {
        let p = self.p_wave_velocity * dt / self.km_per_cell;
        let s = self.s_wave_velocity * dt / self.km_per_cell;
        StepCoefficients {
            p_scale: p * p,
            s_scale: s * s,
        }
    }

    /// Advance the fields by one tick of length `dt`
    ///
    /// Fails only when the grid and field shapes disagree; nothing is
    /// modified in that case.
    pub fn step(
        &self,
        grid: &MediumGrid,
        catalog: &MediumCatalog,
        fields: &mut FieldState,
        dt: f64,
    ) -> SimResult<()> {
        if grid.dims() != fields.dims() {
            return Err(SimError::DimensionMismatch {
                grid: grid.dims(),
                fields: fields.dims(),
            });
        }

        let coeffs = self.coefficients(dt);
        let table = CoeffTable::new(catalog);

        update_interior(grid, &table, fields, coeffs);
        reflect_and_integrate(grid, &table, fields);
        Ok(())
    }
}

/// 5-point Laplacian at a flat index with row stride `cols`
#[inline]
fn laplacian(u: &[f32], idx: usize, cols: usize) -> f64 {
    f64::from(u[idx + 1])
        + f64::from(u[idx - 1])
        + f64::from(u[idx + cols])
        + f64::from(u[idx - cols])
        - 4.0 * f64::from(u[idx])
}

/// Stencil + damping on every cell not on the outer ring
fn update_interior(
    grid: &MediumGrid,
    table: &CoeffTable,
    fields: &mut FieldState,
    coeffs: StepCoefficients,
) {
    let (rows, cols) = grid.dims();
    if rows < 3 || cols < 3 {
        return;
    }
    let cells = grid.cells();

    for y in 1..rows - 1 {
        for x in 1..cols - 1 {
            let idx = y * cols + x;
            let lap_p = laplacian(&fields.p_disp, idx, cols);
            let lap_s = laplacian(&fields.s_disp, idx, cols);
            let m = table.get(cells[idx]);

            let pv = (f64::from(fields.p_vel[idx]) + coeffs.p_scale * lap_p * m.speed) as f32;
            let sv = (f64::from(fields.s_vel[idx]) + coeffs.s_scale * lap_s * m.speed) as f32;
            fields.p_vel[idx] = (f64::from(pv) * m.damping) as f32;
            fields.s_vel[idx] = (f64::from(sv) * m.damping) as f32;
        }
    }
}

/// Reflection on reflective cells, then displacement integration, over
/// the whole grid
fn reflect_and_integrate(grid: &MediumGrid, table: &CoeffTable, fields: &mut FieldState) {
    for (idx, &id) in grid.cells().iter().enumerate() {
        if table.get(id).reflective {
            fields.p_vel[idx] = (f64::from(fields.p_vel[idx]) * REFLECTION_COEFFICIENT) as f32;
            fields.s_vel[idx] = (f64::from(fields.s_vel[idx]) * REFLECTION_COEFFICIENT) as f32;
        }
        fields.p_disp[idx] = (f64::from(fields.p_disp[idx]) + f64::from(fields.p_vel[idx])) as f32;
        fields.s_disp[idx] = (f64::from(fields.s_disp[idx]) + f64::from(fields.s_vel[idx])) as f32;
    }
}
