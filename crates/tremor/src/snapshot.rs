//! Terrain snapshot: the persisted medium grid and origin list
//!
//! JSON layout follows the sandbox's save file:
//! `{ "mediumGrid": [[id, ..], ..], "origins": [{ "x", "y", "mag" }, ..] }`.
//! Other keys (text overlays, icons) are accepted and ignored. Decoding is
//! lenient per entry: bad cells become medium 0, bad origins are dropped.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;
use crate::error::SimResult;
use crate::grid::MediumGrid;
use crate::origin::{Origin, OriginSet};

/// Origin record as stored; fields are optional so one bad entry cannot
/// reject the whole file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginRecord {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub mag: Option<f64>,
}

impl OriginRecord {
    /// Validated origin for a grid of `rows` x `cols`
    pub fn to_origin(&self, rows: usize, cols: usize) -> Option<Origin> {
        let cell = |v: Option<f64>, limit: usize| {
            let v = v?;
            if v.fract() != 0.0 || v < 0.0 || v >= limit as f64 {
                return None;
            }
            Some(v as usize)
        };
        let x = cell(self.x, cols)?;
        let y = cell(self.y, rows)?;
        let mag = self.mag.filter(|m| m.is_finite() && *m >= 0.0)?;
        Some(Origin::new(x, y, mag))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainSnapshot {
    /// Rows of medium ids; kept as raw JSON so malformed cells can default
    pub medium_grid: Vec<Value>,
    /// Origin records; anything but an array loads as no origins
    #[serde(default)]
    pub origins: Value,
}

/// What applying a snapshot changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnapshotReport {
    pub defaulted_cells: usize,
    pub loaded_origins: usize,
    pub dropped_origins: usize,
}

impl TerrainSnapshot {
    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Capture a grid and origin list
    pub fn capture(grid: &MediumGrid, origins: &OriginSet) -> Self {
        let medium_grid = grid
            .to_rows()
            .into_iter()
            .map(Value::from)
            .collect();
        let origins = origins
            .iter()
            .map(|o| json!({ "x": o.x, "y": o.y, "mag": o.magnitude }))
            .collect::<Vec<_>>()
            .into();
        Self {
            medium_grid,
            origins,
        }
    }

    /// Grid rows as optional integers; anything non-integral is `None`
    pub fn grid_rows(&self) -> Vec<Vec<Option<i64>>> {
        self.medium_grid
            .iter()
            .map(|row| match row.as_array() {
                Some(cells) => cells.iter().map(Value::as_i64).collect(),
                None => Vec::new(),
            })
            .collect()
    }

    /// Valid origins for a grid of the given size, first occurrence per cell
    pub fn origin_set(&self, rows: usize, cols: usize) -> (OriginSet, usize) {
        let mut set = OriginSet::new();
        let mut dropped = 0;
        let records: &[Value] = match &self.origins {
            Value::Array(records) => records.as_slice(),
            Value::Null => &[],
            other => {
                warn!("Ignoring origins that are not a list: {}", other);
                &[]
            }
        };
        for raw in records {
            let origin = serde_json::from_value::<OriginRecord>(raw.clone())
                .ok()
                .and_then(|record| record.to_origin(rows, cols));
            match origin {
                Some(origin) if set.insert(origin) => {}
                _ => {
                    warn!("Dropping origin record {}", raw);
                    dropped += 1;
                }
            }
        }
        (set, dropped)
    }

    /// Overwrite `grid` and `origins` from this snapshot
    pub fn apply<F>(
        &self,
        grid: &mut MediumGrid,
        origins: &mut OriginSet,
        is_valid_id: F,
    ) -> SnapshotReport
    where
        F: Fn(u8) -> bool,
    {
        let defaulted_cells = grid.replace_from_rows(&self.grid_rows(), is_valid_id);
        if defaulted_cells > 0 {
            warn!("{} snapshot cells defaulted to medium 0", defaulted_cells);
        }
        let (rows, cols) = grid.dims();
        let (set, dropped_origins) = self.origin_set(rows, cols);
        *origins = set;
        SnapshotReport {
            defaulted_cells,
            loaded_origins: origins.len(),
            dropped_origins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parses_sandbox_save_format() {
        let json = r##"{
            "mediumGrid": [[1, 1, 1], [1, 0, 4], [1, 1, 1]],
            "origins": [{ "x": 1, "y": 1, "mag": 5.0 }],
            "textElements": [{ "text": "Manila", "x": 3, "y": 4 }],
            "icons": []
        }"##;
        let snapshot = TerrainSnapshot::from_json(json).unwrap();
        let mut grid = MediumGrid::new(3, 3).unwrap();
        let mut origins = OriginSet::new();
        let report = snapshot.apply(&mut grid, &mut origins, |id| id < 10);

        assert_eq!(grid.to_rows(), vec![vec![1, 1, 1], vec![1, 0, 4], vec![1, 1, 1]]);
        assert_eq!(origins.as_slice(), &[Origin::new(1, 1, 5.0)]);
        assert_eq!(
            report,
            SnapshotReport {
                defaulted_cells: 0,
                loaded_origins: 1,
                dropped_origins: 0,
            }
        );
    }

    #[test]
    fn test_lenient_grid_decoding() {
        let json = r#"{ "mediumGrid": [[2, "x", null, 99], 7] }"#;
        let snapshot = TerrainSnapshot::from_json(json).unwrap();
        let mut grid = MediumGrid::new(3, 4).unwrap();
        grid.fill(3);
        let mut origins = OriginSet::new();
        origins.insert(Origin::new(0, 0, 1.0));

        let report = snapshot.apply(&mut grid, &mut origins, |id| id < 10);
        assert_eq!(grid.to_rows(), vec![vec![2, 0, 0, 0], vec![0; 4], vec![0; 4]]);
        assert_eq!(report.defaulted_cells, 11);
        // Missing origin list replaces the current one with nothing
        assert!(origins.is_empty());
    }

    #[test]
    fn test_non_list_origins_load_as_empty() {
        for origins in ["null", r#"{ "x": 1 }"#, "3", r#""0,0,5""#] {
            let json = format!(r#"{{ "mediumGrid": [[0, 1], [1, 0]], "origins": {} }}"#, origins);
            let snapshot = TerrainSnapshot::from_json(&json).unwrap();
            let mut grid = MediumGrid::new(2, 2).unwrap();
            let mut origins = OriginSet::new();
            origins.insert(Origin::new(0, 0, 1.0));

            let report = snapshot.apply(&mut grid, &mut origins, |id| id < 10);
            assert_eq!(grid.to_rows(), vec![vec![0, 1], vec![1, 0]]);
            assert!(origins.is_empty());
            assert_eq!(report.loaded_origins, 0);
            assert_eq!(report.dropped_origins, 0);
        }
    }

    #[test]
    fn test_invalid_origins_are_dropped() {
        let json = r#"{
            "mediumGrid": [],
            "origins": [
                { "x": 2, "y": 3, "mag": 1.5 },
                { "x": 2, "y": 3, "mag": 9.0 },
                { "x": -1, "y": 0, "mag": 1.0 },
                { "x": 1.5, "y": 0, "mag": 1.0 },
                { "x": 0, "y": 10, "mag": 1.0 },
                { "x": 0, "y": 0, "mag": -2.0 },
                { "x": 0, "y": 0 },
                "junk"
            ]
        }"#;
        let snapshot = TerrainSnapshot::from_json(json).unwrap();
        let (set, dropped) = snapshot.origin_set(10, 10);
        assert_eq!(set.as_slice(), &[Origin::new(2, 3, 1.5)]);
        assert_eq!(dropped, 7);
    }

    #[test]
    fn test_missing_grid_is_an_error() {
        assert!(TerrainSnapshot::from_json(r#"{ "origins": [] }"#).is_err());
        assert!(TerrainSnapshot::from_json("not json").is_err());
    }

    #[test]
    fn test_capture_round_trips() {
        let mut grid = MediumGrid::new(4, 5).unwrap();
        grid.fill_border(1);
        grid.set(2, 2, 4).unwrap();
        let mut origins = OriginSet::new();
        origins.insert(Origin::new(2, 1, 3.5));

        let json = TerrainSnapshot::capture(&grid, &origins).to_json().unwrap();
        assert!(json.contains("\"mediumGrid\""));
        assert!(json.contains("\"mag\": 3.5"));

        let mut grid2 = MediumGrid::new(4, 5).unwrap();
        let mut origins2 = OriginSet::new();
        TerrainSnapshot::from_json(&json)
            .unwrap()
            .apply(&mut grid2, &mut origins2, |id| id < 10);
        assert_eq!(grid2, grid);
        assert_eq!(origins2, origins);
    }
}
