//! Paint operations over the medium grid
//!
//! Coordinates are signed so shapes may hang off the grid; anything outside
//! is clipped.

use std::f64::consts::PI;
use serde::{Deserialize, Serialize};
use crate::grid::MediumGrid;

/// A single paint stroke or shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum PaintOp {
    /// Square brush of half-width `radius` (0 paints one cell)
    Brush { x: i64, y: i64, radius: u32, medium: u8 },
    /// Brush that writes the default medium
    Erase { x: i64, y: i64, radius: u32 },
    /// 4-connected flood fill of the region sharing the seed's medium
    Fill { x: i64, y: i64, medium: u8 },
    /// Axis-aligned rectangle between two corners, inclusive
    Rect { x0: i64, y0: i64, x1: i64, y1: i64, medium: u8, hollow: bool },
    /// Ellipse centered at (x0, y0) with radii |x1 - x0| and |y1 - y0|
    Ellipse { x0: i64, y0: i64, x1: i64, y1: i64, medium: u8, hollow: bool },
}

impl PaintOp {
    /// Medium id written by this op
    pub fn medium(&self) -> u8 {
        match *self {
            PaintOp::Brush { medium, .. }
            | PaintOp::Fill { medium, .. }
            | PaintOp::Rect { medium, .. }
            | PaintOp::Ellipse { medium, .. } => medium,
            PaintOp::Erase { .. } => 0,
        }
    }

    pub fn apply(&self, grid: &mut MediumGrid) {
        match *self {
            PaintOp::Brush { x, y, radius, medium } => brush(grid, x, y, radius, medium),
            PaintOp::Erase { x, y, radius } => brush(grid, x, y, radius, 0),
            PaintOp::Fill { x, y, medium } => flood_fill(grid, x, y, medium),
            PaintOp::Rect { x0, y0, x1, y1, medium, hollow } => {
                rect(grid, x0, y0, x1, y1, medium, hollow)
            }
            PaintOp::Ellipse { x0, y0, x1, y1, medium, hollow } => {
                ellipse(grid, x0, y0, x1, y1, medium, hollow)
            }
        }
    }
}

/// Inclusive `lo..=hi` (either order) intersected with `0..len`
fn clip_span(lo: i64, hi: i64, len: usize) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let (lo, hi) = (lo.min(hi), lo.max(hi));
    let last = i64::try_from(len - 1).ok()?;
    if hi < 0 || lo > last {
        return None;
    }
    Some((lo.max(0) as usize, hi.min(last) as usize))
}

fn fill_box(
    grid: &mut MediumGrid,
    xs: Option<(usize, usize)>,
    ys: Option<(usize, usize)>,
    id: u8,
) {
    let (Some((x0, x1)), Some((y0, y1))) = (xs, ys) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            grid.set_clipped(x as i64, y as i64, id);
        }
    }
}

fn brush(grid: &mut MediumGrid, cx: i64, cy: i64, radius: u32, id: u8) {
    let r = i64::from(radius);
    let xs = clip_span(cx.saturating_sub(r), cx.saturating_add(r), grid.cols());
    let ys = clip_span(cy.saturating_sub(r), cy.saturating_add(r), grid.rows());
    fill_box(grid, xs, ys, id);
}

fn flood_fill(grid: &mut MediumGrid, x: i64, y: i64, id: u8) {
    if !grid.contains(x, y) {
        return;
    }
    let target = match grid.get(x as usize, y as usize) {
        Some(t) => t,
        None => return,
    };
    if target == id {
        return;
    }

    let mut stack = vec![(x, y)];
    while let Some((px, py)) = stack.pop() {
        if !grid.contains(px, py) || grid.get(px as usize, py as usize) != Some(target) {
            continue;
        }
        grid.set_clipped(px, py, id);
        stack.extend_from_slice(&[(px + 1, py), (px - 1, py), (px, py + 1), (px, py - 1)]);
    }
}

fn rect(grid: &mut MediumGrid, x0: i64, y0: i64, x1: i64, y1: i64, id: u8, hollow: bool) {
    let (rows, cols) = grid.dims();
    let xs = clip_span(x0, x1, cols);
    let ys = clip_span(y0, y1, rows);

    if hollow {
        // Each edge is drawn only if it lies on the grid
        for y in [y0.min(y1), y0.max(y1)] {
            fill_box(grid, xs, clip_span(y, y, rows), id);
        }
        for x in [x0.min(x1), x0.max(x1)] {
            fill_box(grid, clip_span(x, x, cols), ys, id);
        }
    } else {
        fill_box(grid, xs, ys, id);
    }
}

fn ellipse(grid: &mut MediumGrid, x0: i64, y0: i64, x1: i64, y1: i64, id: u8, hollow: bool) {
    let (rows, cols) = grid.dims();
    let rx = x1.abs_diff(x0);
    let ry = y1.abs_diff(y0);

    // Degenerate radius collapses to a line through the center
    if rx == 0 {
        fill_box(grid, clip_span(x0, x0, cols), clip_span(y0, y1, rows), id);
        return;
    }
    if ry == 0 {
        fill_box(grid, clip_span(x0, x1, cols), clip_span(y0, y0, rows), id);
        return;
    }

    let (rxf, ryf) = (rx as f64, ry as f64);
    if hollow {
        for i in 0..360 {
            let theta = f64::from(i) / 360.0 * 2.0 * PI;
            let ix = round_half_up(x0 as f64 + theta.cos() * rxf);
            let iy = round_half_up(y0 as f64 + theta.sin() * ryf);
            grid.set_clipped(ix, iy, id);
        }
    } else {
        let rx = i64::try_from(rx).unwrap_or(i64::MAX);
        let ry = i64::try_from(ry).unwrap_or(i64::MAX);
        let xs = clip_span(x0.saturating_sub(rx), x0.saturating_add(rx), cols);
        let ys = clip_span(y0.saturating_sub(ry), y0.saturating_add(ry), rows);
        let (Some((xa, xb)), Some((ya, yb))) = (xs, ys) else {
            return;
        };
        for y in ya..=yb {
            for x in xa..=xb {
                let nx = (x as f64 - x0 as f64) / rxf;
                let ny = (y as f64 - y0 as f64) / ryf;
                if nx * nx + ny * ny <= 1.0 {
                    grid.set_clipped(x as i64, y as i64, id);
                }
            }
        }
    }
}

#[inline]
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: usize, cols: usize) -> MediumGrid {
        MediumGrid::new(rows, cols).unwrap()
    }

    fn count(grid: &MediumGrid, id: u8) -> usize {
        grid.cells().iter().filter(|&&c| c == id).count()
    }

    #[test]
    fn test_brush_radius_zero_paints_one_cell() {
        let mut g = grid(10, 10);
        PaintOp::Brush { x: 4, y: 4, radius: 0, medium: 3 }.apply(&mut g);
        assert_eq!(count(&g, 3), 1);
        assert_eq!(g.get(4, 4), Some(3));
    }

    #[test]
    fn test_brush_clips_at_edges() {
        let mut g = grid(10, 10);
        PaintOp::Brush { x: 0, y: 0, radius: 2, medium: 4 }.apply(&mut g);
        assert_eq!(count(&g, 4), 9);

        PaintOp::Erase { x: 0, y: 0, radius: 1 }.apply(&mut g);
        assert_eq!(count(&g, 4), 5);
    }

    #[test]
    fn test_flood_fill_stops_at_boundaries() {
        let mut g = grid(8, 8);
        // Wall splitting the grid at x = 4
        PaintOp::Rect { x0: 4, y0: 0, x1: 4, y1: 7, medium: 1, hollow: false }.apply(&mut g);
        PaintOp::Fill { x: 1, y: 1, medium: 2 }.apply(&mut g);
        assert_eq!(count(&g, 2), 32);
        assert_eq!(count(&g, 1), 8);
        assert_eq!(g.get(6, 6), Some(0));
    }

    #[test]
    fn test_flood_fill_same_medium_is_noop() {
        let mut g = grid(5, 5);
        let before = g.clone();
        PaintOp::Fill { x: 2, y: 2, medium: 0 }.apply(&mut g);
        assert_eq!(g, before);
        PaintOp::Fill { x: -1, y: 2, medium: 3 }.apply(&mut g);
        assert_eq!(g, before);
    }

    #[test]
    fn test_rect_hollow_and_filled() {
        let mut g = grid(10, 10);
        PaintOp::Rect { x0: 6, y0: 6, x1: 2, y1: 2, medium: 5, hollow: true }.apply(&mut g);
        assert_eq!(count(&g, 5), 16);
        assert_eq!(g.get(4, 4), Some(0));

        PaintOp::Rect { x0: 2, y0: 2, x1: 6, y1: 6, medium: 5, hollow: false }.apply(&mut g);
        assert_eq!(count(&g, 5), 25);
    }

    #[test]
    fn test_filled_ellipse_is_symmetric() {
        let mut g = grid(21, 21);
        PaintOp::Ellipse { x0: 10, y0: 10, x1: 14, y1: 13, medium: 6, hollow: false }.apply(&mut g);
        assert_eq!(g.get(10, 10), Some(6));
        assert_eq!(g.get(14, 10), Some(6));
        assert_eq!(g.get(6, 10), Some(6));
        assert_eq!(g.get(15, 10), Some(0));
        for y in 0..21 {
            for x in 0..21 {
                assert_eq!(g.get(x, y), g.get(20 - x, y));
                assert_eq!(g.get(x, y), g.get(x, 20 - y));
            }
        }
    }

    #[test]
    fn test_hollow_ellipse_leaves_center() {
        let mut g = grid(21, 21);
        PaintOp::Ellipse { x0: 10, y0: 10, x1: 15, y1: 15, medium: 7, hollow: true }.apply(&mut g);
        assert_eq!(g.get(10, 10), Some(0));
        assert_eq!(g.get(15, 10), Some(7));
        assert_eq!(g.get(10, 5), Some(7));
    }

    #[test]
    fn test_degenerate_ellipse_draws_line() {
        let mut g = grid(10, 10);
        PaintOp::Ellipse { x0: 3, y0: 2, x1: 3, y1: 7, medium: 8, hollow: false }.apply(&mut g);
        assert_eq!(count(&g, 8), 6);
        assert!((2..=7).all(|y| g.get(3, y) == Some(8)));
    }

    #[test]
    fn test_far_off_grid_shapes_are_clipped() {
        let mut g = grid(10, 10);
        PaintOp::Rect { x0: -2_000_000_000, y0: 0, x1: 5, y1: 5, medium: 2, hollow: false }
            .apply(&mut g);
        assert_eq!(count(&g, 2), 36);
        assert_eq!(g.get(5, 5), Some(2));
        assert_eq!(g.get(6, 5), Some(0));

        let mut g = grid(10, 10);
        PaintOp::Brush { x: i64::MAX, y: 0, radius: 1, medium: 3 }.apply(&mut g);
        PaintOp::Brush { x: i64::MIN, y: i64::MIN, radius: u32::MAX, medium: 3 }.apply(&mut g);
        assert_eq!(count(&g, 3), 0);

        PaintOp::Brush { x: 5, y: 5, radius: 100_000, medium: 4 }.apply(&mut g);
        assert_eq!(count(&g, 4), 100);
    }

    #[test]
    fn test_hollow_rect_skips_off_grid_edges() {
        let mut g = grid(10, 10);
        PaintOp::Rect { x0: -5, y0: -5, x1: 4, y1: i64::MAX, medium: 5, hollow: true }
            .apply(&mut g);
        // Only the x = 4 edge crosses the grid
        assert_eq!(count(&g, 5), 10);
        assert!((0..10).all(|y| g.get(4, y) == Some(5)));
    }

    #[test]
    fn test_extreme_ellipses_are_clipped() {
        let mut g = grid(10, 10);
        PaintOp::Ellipse { x0: 3, y0: i64::MIN, x1: 3, y1: i64::MAX, medium: 8, hollow: false }
            .apply(&mut g);
        assert_eq!(count(&g, 8), 10);

        let mut g = grid(10, 10);
        PaintOp::Ellipse { x0: 5, y0: 5, x1: i64::MAX, y1: i64::MIN, medium: 9, hollow: false }
            .apply(&mut g);
        assert_eq!(count(&g, 9), 100);
    }
}
