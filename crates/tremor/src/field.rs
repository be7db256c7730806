//! P/S wave field state
//!
//! Four same-shaped scalar arrays stored flat (`y * cols + x`). They are
//! only ever allocated and cleared together.

/// One of the four field arrays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    PDisplacement,
    SDisplacement,
    PVelocity,
    SVelocity,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::PDisplacement,
        Field::SDisplacement,
        Field::PVelocity,
        Field::SVelocity,
    ];
}

/// Displacement and velocity for the P and S fields
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    rows: usize,
    cols: usize,
    pub(crate) p_disp: Vec<f32>,
    pub(crate) s_disp: Vec<f32>,
    pub(crate) p_vel: Vec<f32>,
    pub(crate) s_vel: Vec<f32>,
}

impl FieldState {
    /// Zeroed fields; dimensions come from an already validated grid
    pub fn new(rows: usize, cols: usize) -> Self {
        let n = rows * cols;
        Self {
            rows,
            cols,
            p_disp: vec![0.0; n],
            s_disp: vec![0.0; n],
            p_vel: vec![0.0; n],
            s_vel: vec![0.0; n],
        }
    }

    /// (rows, cols)
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    /// Zero all four arrays
    pub fn reset(&mut self) {
        self.p_disp.fill(0.0);
        self.s_disp.fill(0.0);
        self.p_vel.fill(0.0);
        self.s_vel.fill(0.0);
    }

    pub fn is_zero(&self) -> bool {
        Field::ALL
            .iter()
            .all(|&f| self.slice(f).iter().all(|&v| v == 0.0))
    }

    pub fn slice(&self, field: Field) -> &[f32] {
        match field {
            Field::PDisplacement => &self.p_disp,
            Field::SDisplacement => &self.s_disp,
            Field::PVelocity => &self.p_vel,
            Field::SVelocity => &self.s_vel,
        }
    }

    pub fn slice_mut(&mut self, field: Field) -> &mut [f32] {
        match field {
            Field::PDisplacement => &mut self.p_disp,
            Field::SDisplacement => &mut self.s_disp,
            Field::PVelocity => &mut self.p_vel,
            Field::SVelocity => &mut self.s_vel,
        }
    }

    pub fn get(&self, field: Field, x: usize, y: usize) -> Option<f32> {
        if x < self.cols && y < self.rows {
            Some(self.slice(field)[self.idx(x, y)])
        } else {
            None
        }
    }

    /// Combined P + S displacement at a cell (what a seismograph reads)
    pub fn ground_motion(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.cols && y < self.rows {
            let idx = self.idx(x, y);
            Some(self.p_disp[idx] + self.s_disp[idx])
        } else {
            None
        }
    }

    /// Sum of |P velocity| + |S velocity| over every cell
    pub fn velocity_l1(&self) -> f64 {
        self.p_vel
            .iter()
            .chain(self.s_vel.iter())
            .map(|&v| f64::from(v.abs()))
            .sum()
    }

    /// Largest absolute value in one array
    pub fn peak_abs(&self, field: Field) -> f32 {
        self.slice(field)
            .iter()
            .fold(0.0f32, |acc, &v| acc.max(v.abs()))
    }

    /// Row-major 2D copy of one array
    pub fn to_rows(&self, field: Field) -> Vec<Vec<f32>> {
        self.slice(field)
            .chunks(self.cols)
            .map(|row| row.to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fields_are_zero_and_shaped() {
        let fields = FieldState::new(3, 4);
        assert_eq!(fields.dims(), (3, 4));
        for f in Field::ALL {
            assert_eq!(fields.slice(f).len(), 12);
        }
        assert!(fields.is_zero());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut fields = FieldState::new(5, 5);
        for (i, f) in Field::ALL.into_iter().enumerate() {
            fields.slice_mut(f)[7] = i as f32 + 1.5;
        }
        assert!(!fields.is_zero());
        fields.reset();
        assert!(fields.is_zero());
        fields.reset();
        assert!(fields.is_zero());
    }

    #[test]
    fn test_accessors() {
        let mut fields = FieldState::new(2, 3);
        let idx = fields.idx(2, 1);
        fields.slice_mut(Field::PDisplacement)[idx] = 0.75;
        fields.slice_mut(Field::SDisplacement)[idx] = -0.25;
        fields.slice_mut(Field::SVelocity)[0] = -2.0;

        assert_eq!(fields.get(Field::PDisplacement, 2, 1), Some(0.75));
        assert_eq!(fields.get(Field::PDisplacement, 3, 1), None);
        assert_eq!(fields.ground_motion(2, 1), Some(0.5));
        assert_eq!(fields.peak_abs(Field::SVelocity), 2.0);
        assert!((fields.velocity_l1() - 2.0).abs() < 1e-12);
        assert_eq!(fields.to_rows(Field::SDisplacement)[1], vec![0.0, 0.0, -0.25]);
    }
}
