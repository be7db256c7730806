//! Earthquake origins and the displacement impulse they inject

use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::constants::{INJECTION_RADIUS, S_INJECTION_RATIO};
use crate::field::FieldState;

/// Epicenter cell with a magnitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub x: usize,
    pub y: usize,
    #[serde(rename = "mag")]
    pub magnitude: f64,
}

impl Origin {
    pub fn new(x: usize, y: usize, magnitude: f64) -> Self {
        Self { x, y, magnitude }
    }

    fn is_injectable(&self, rows: usize, cols: usize) -> bool {
        self.x < cols && self.y < rows && self.magnitude.is_finite() && self.magnitude >= 0.0
    }
}

/// Magnitude as accepted by an editor: negative or NaN becomes 0
pub fn clamp_magnitude(magnitude: f64) -> f64 {
    if magnitude.is_nan() || magnitude < 0.0 {
        0.0
    } else {
        magnitude
    }
}

/// Origins keyed by cell, in placement order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OriginSet {
    origins: Vec<Origin>,
}

impl OriginSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Origin> {
        self.origins.iter()
    }

    pub fn as_slice(&self) -> &[Origin] {
        &self.origins
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Origin> {
        self.origins.iter().find(|o| o.x == x && o.y == y)
    }

    /// Add an origin; returns false (and changes nothing) if the cell is taken
    pub fn insert(&mut self, origin: Origin) -> bool {
        if self.get(origin.x, origin.y).is_some() {
            return false;
        }
        self.origins.push(origin);
        true
    }

    pub fn remove(&mut self, x: usize, y: usize) -> Option<Origin> {
        let pos = self.origins.iter().position(|o| o.x == x && o.y == y)?;
        Some(self.origins.remove(pos))
    }

    /// Update a magnitude, clamping invalid input to 0
    pub fn set_magnitude(&mut self, x: usize, y: usize, magnitude: f64) -> Option<f64> {
        let origin = self.origins.iter_mut().find(|o| o.x == x && o.y == y)?;
        origin.magnitude = clamp_magnitude(magnitude);
        Some(origin.magnitude)
    }

    pub fn clear(&mut self) {
        self.origins.clear();
    }
}

/// Add every origin's radius-3 displacement impulse to the fields
///
/// Amplitude falls off as `mag * exp(-distance)`; S receives 0.8 of P.
/// Overlapping neighborhoods accumulate. Origins off the grid or with an
/// unusable magnitude are skipped.
pub fn inject(fields: &mut FieldState, origins: &OriginSet) {
    let (rows, cols) = fields.dims();
    let r = INJECTION_RADIUS;

    for origin in origins.iter() {
        if !origin.is_injectable(rows, cols) {
            warn!(
                "Skipping origin ({}, {}) with magnitude {}",
                origin.x, origin.y, origin.magnitude
            );
            continue;
        }
        let (ox, oy) = (origin.x as i64, origin.y as i64);

        for dy in -r..=r {
            for dx in -r..=r {
                let (ix, iy) = (ox + dx, oy + dy);
                if ix < 0 || iy < 0 || ix >= cols as i64 || iy >= rows as i64 {
                    continue;
                }
                let distance = ((dx * dx + dy * dy) as f64).sqrt();
                let amplitude = origin.magnitude * (-distance).exp();

                let idx = fields.idx(ix as usize, iy as usize);
                fields.p_disp[idx] = (f64::from(fields.p_disp[idx]) + amplitude) as f32;
                fields.s_disp[idx] =
                    (f64::from(fields.s_disp[idx]) + amplitude * S_INJECTION_RATIO) as f32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    fn single(x: usize, y: usize, mag: f64) -> OriginSet {
        let mut set = OriginSet::new();
        set.insert(Origin::new(x, y, mag));
        set
    }

    #[test]
    fn test_insert_is_keyed_by_cell() {
        let mut set = OriginSet::new();
        assert!(set.insert(Origin::new(3, 4, 1.0)));
        assert!(!set.insert(Origin::new(3, 4, 9.0)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(3, 4).map(|o| o.magnitude), Some(1.0));

        assert!(set.remove(3, 4).is_some());
        assert!(set.remove(3, 4).is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn test_set_magnitude_clamps() {
        let mut set = single(1, 1, 2.0);
        assert_eq!(set.set_magnitude(1, 1, -3.0), Some(0.0));
        assert_eq!(set.set_magnitude(1, 1, f64::NAN), Some(0.0));
        assert_eq!(set.set_magnitude(1, 1, 4.5), Some(4.5));
        assert_eq!(set.set_magnitude(0, 0, 4.5), None);
    }

    #[test]
    fn test_injection_profile() {
        let mut fields = FieldState::new(20, 20);
        inject(&mut fields, &single(10, 10, 5.0));

        let p = |x, y| fields.get(Field::PDisplacement, x, y).unwrap();
        let s = |x, y| fields.get(Field::SDisplacement, x, y).unwrap();

        assert_eq!(p(10, 10), 5.0);
        assert_eq!(s(10, 10), 4.0);
        assert!((p(11, 10) - (5.0 * (-1.0f64).exp()) as f32).abs() < 1e-6);
        assert!((p(13, 13) - (5.0 * (-(18.0f64).sqrt()).exp()) as f32).abs() < 1e-6);
        assert!((s(12, 10) - (4.0 * (-2.0f64).exp()) as f32).abs() < 1e-6);
        // Outside the square neighborhood
        assert_eq!(p(14, 10), 0.0);
        // Velocities untouched
        assert_eq!(fields.peak_abs(Field::PVelocity), 0.0);
    }

    #[test]
    fn test_injection_clips_at_grid_edge() {
        let mut fields = FieldState::new(10, 10);
        inject(&mut fields, &single(0, 0, 1.0));
        let touched = fields
            .slice(Field::PDisplacement)
            .iter()
            .filter(|&&v| v != 0.0)
            .count();
        assert_eq!(touched, 16);
    }

    #[test]
    fn test_overlapping_origins_accumulate() {
        let mut set = single(5, 5, 1.0);
        set.insert(Origin::new(6, 5, 1.0));
        let mut fields = FieldState::new(12, 12);
        inject(&mut fields, &set);

        let expected = 1.0 + (-1.0f64).exp();
        let got = fields.get(Field::PDisplacement, 5, 5).unwrap();
        assert!((f64::from(got) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_origins_are_skipped() {
        let mut set = single(50, 50, 1.0);
        set.insert(Origin::new(2, 2, -1.0));
        set.insert(Origin::new(3, 3, f64::INFINITY));
        let mut fields = FieldState::new(10, 10);
        inject(&mut fields, &set);
        assert!(fields.is_zero());
    }

    #[test]
    fn test_clamp_magnitude() {
        assert_eq!(clamp_magnitude(-0.1), 0.0);
        assert_eq!(clamp_magnitude(2.5), 2.5);
    }
}
