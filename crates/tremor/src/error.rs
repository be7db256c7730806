//! Error types for the simulation core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Field arrays are {fields:?} but the medium grid is {grid:?} (rows, cols)")]
    DimensionMismatch {
        grid: (usize, usize),
        fields: (usize, usize),
    },

    #[error("Operation requires the session to be editing")]
    NotEditing,

    #[error("Operation requires the simulation to be running")]
    NotRunning,

    #[error("No origins placed")]
    NoOrigins,

    #[error("Cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i64, y: i64 },

    #[error("Unknown medium id {0}")]
    UnknownMedium(u8),

    #[error("Invalid magnitude {0}: must be finite and non-negative")]
    InvalidMagnitude(f64),

    #[error("An origin already exists at ({x}, {y})")]
    OriginExists { x: usize, y: usize },

    #[error("No origin at ({x}, {y})")]
    NoOriginAt { x: usize, y: usize },

    #[error("A seismograph already exists at ({x}, {y})")]
    ProbeExists { x: usize, y: usize },

    #[error("No seismograph at ({x}, {y})")]
    NoProbeAt { x: usize, y: usize },

    #[error("Invalid medium catalog: {message}")]
    InvalidCatalog { message: String },

    #[error("Malformed snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
