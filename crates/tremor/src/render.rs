//! Field-to-color mapping and frame export
//!
//! [`wave_color`] is the exact encoding external renderers must reproduce.
//! Frames are one pixel per cell: medium color, with the wave color blended
//! on top at 60% opacity except on reflective cells.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;
use crate::constants::OVERLAY_ALPHA;
use crate::field::{Field, FieldState};
use crate::grid::MediumGrid;
use crate::medium::{MediumCatalog, Rgb};

/// Round half up, then clamp to a color channel
#[inline]
fn channel(v: f64) -> u8 {
    (v + 0.5).floor().clamp(0.0, 255.0) as u8
}

/// Color of a cell carrying P displacement `p` and S displacement `s`
pub fn wave_color(p: f32, s: f32) -> Rgb {
    let (p, s) = (f64::from(p), f64::from(s));
    Rgb::new(
        channel(128.0 + 127.0 * (p - s)),
        channel(128.0 + 127.0 * (s - p)),
        channel(128.0 - 127.0 * (p + s)),
    )
}

/// Source-over blend of `top` onto `base` at opacity `alpha`
pub fn blend(base: Rgb, top: Rgb, alpha: f64) -> Rgb {
    let mix = |b: u8, t: u8| channel(f64::from(t) * alpha + f64::from(b) * (1.0 - alpha));
    Rgb::new(mix(base.r, top.r), mix(base.g, top.g), mix(base.b, top.b))
}

/// RGB8 image, row-major, one pixel per grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        Some(Rgb::new(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    /// Binary PPM (P6)
    pub fn to_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut data = Vec::with_capacity(header.len() + self.pixels.len());
        data.extend_from_slice(header.as_bytes());
        data.extend_from_slice(&self.pixels);
        data
    }

    pub fn write_ppm(&self, path: &Path) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&self.to_ppm())?;
        writer.flush()?;
        info!("Wrote {}x{} frame to {:?}", self.width, self.height, path);
        Ok(())
    }
}

/// Compose the medium map and the wave overlay
///
/// Assumes `fields` has the grid's shape; the session guarantees it.
pub fn render_frame(grid: &MediumGrid, catalog: &MediumCatalog, fields: &FieldState) -> Frame {
    let (rows, cols) = grid.dims();
    let p = fields.slice(Field::PDisplacement);
    let s = fields.slice(Field::SDisplacement);
    let mut pixels = Vec::with_capacity(rows * cols * 3);

    for (idx, &id) in grid.cells().iter().enumerate() {
        let medium = catalog.lookup(id);
        let color = if medium.reflective {
            medium.color
        } else {
            let wave = wave_color(
                p.get(idx).copied().unwrap_or(0.0),
                s.get(idx).copied().unwrap_or(0.0),
            );
            blend(medium.color, wave, OVERLAY_ALPHA)
        };
        pixels.extend_from_slice(&[color.r, color.g, color.b]);
    }

    Frame {
        width: cols,
        height: rows,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_color_at_rest_is_mid_gray() {
        assert_eq!(wave_color(0.0, 0.0), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_wave_color_channels() {
        // p - s = 0.5, p + s = 1.5
        assert_eq!(wave_color(1.0, 0.5), Rgb::new(192, 65, 0));
        // Saturation on both ends
        assert_eq!(wave_color(3.0, -3.0), Rgb::new(255, 0, 128));
        assert_eq!(wave_color(-1.0, -1.0), Rgb::new(128, 128, 255));
    }

    #[test]
    fn test_channel_rounds_half_up() {
        assert_eq!(channel(127.5), 128);
        assert_eq!(channel(127.49), 127);
        assert_eq!(channel(-0.5), 0);
        assert_eq!(channel(300.0), 255);
    }

    #[test]
    fn test_blend() {
        let base = Rgb::new(0, 100, 200);
        assert_eq!(blend(base, Rgb::new(255, 100, 0), 0.0), base);
        assert_eq!(blend(base, Rgb::new(255, 100, 0), 1.0), Rgb::new(255, 100, 0));
        assert_eq!(blend(base, Rgb::new(100, 100, 100), 0.5), Rgb::new(50, 100, 150));
    }

    #[test]
    fn test_reflective_cells_show_base_color() {
        let catalog = MediumCatalog::standard();
        let mut grid = MediumGrid::new(3, 3).unwrap();
        grid.fill_border(1);
        let mut fields = FieldState::new(3, 3);
        fields.slice_mut(Field::PDisplacement).fill(0.7);

        let frame = render_frame(&grid, &catalog, &fields);
        assert_eq!(frame.pixel(0, 0), Some(catalog.lookup(1).color));

        let soil = catalog.lookup(0).color;
        let expected = blend(soil, wave_color(0.7, 0.0), OVERLAY_ALPHA);
        assert_eq!(frame.pixel(1, 1), Some(expected));
        assert_eq!(frame.pixel(3, 1), None);
    }

    #[test]
    fn test_ppm_layout() {
        let frame = Frame {
            width: 2,
            height: 1,
            pixels: vec![1, 2, 3, 4, 5, 6],
        };
        let ppm = frame.to_ppm();
        assert!(ppm.starts_with(b"P6\n2 1\n255\n"));
        assert_eq!(&ppm[ppm.len() - 6..], &[1, 2, 3, 4, 5, 6]);
    }
}
