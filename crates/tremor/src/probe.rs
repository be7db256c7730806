//! Seismograph probes
//!
//! A probe records ground motion (P + S displacement) at one cell once per
//! fixed tick, keeping the most recent samples.

use std::collections::VecDeque;
use serde::Serialize;
use crate::constants::SEISMOGRAPH_CAPACITY;
use crate::field::FieldState;

#[derive(Debug, Clone, PartialEq)]
pub struct Seismograph {
    pub id: u32,
    pub x: usize,
    pub y: usize,
    pub label: String,
    samples: VecDeque<f32>,
}

/// Summary of a probe's buffer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceStats {
    pub samples: usize,
    pub latest: f32,
    pub peak: f32,
}

impl Seismograph {
    fn new(id: u32, x: usize, y: usize, label: String) -> Self {
        Self {
            id,
            x,
            y,
            label,
            samples: VecDeque::with_capacity(SEISMOGRAPH_CAPACITY),
        }
    }

    fn record(&mut self, value: f32) {
        if self.samples.len() == SEISMOGRAPH_CAPACITY {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Oldest to newest
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn stats(&self) -> TraceStats {
        TraceStats {
            samples: self.samples.len(),
            latest: self.samples.back().copied().unwrap_or(0.0),
            peak: self.samples.iter().fold(0.0f32, |acc, v| acc.max(v.abs())),
        }
    }
}

/// Probes keyed by cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeSet {
    probes: Vec<Seismograph>,
    next_id: u32,
}

impl ProbeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a probe; `None` if the cell already has one
    pub fn add(&mut self, x: usize, y: usize) -> Option<&Seismograph> {
        if self.get(x, y).is_some() {
            return None;
        }
        let label = format!("Seismo {}", self.probes.len() + 1);
        self.next_id += 1;
        self.probes.push(Seismograph::new(self.next_id, x, y, label));
        self.probes.last()
    }

    pub fn remove(&mut self, x: usize, y: usize) -> Option<Seismograph> {
        let pos = self.probes.iter().position(|p| p.x == x && p.y == y)?;
        Some(self.probes.remove(pos))
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Seismograph> {
        self.probes.iter().find(|p| p.x == x && p.y == y)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Seismograph> {
        self.probes.iter()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Append one sample per probe; probes off the grid read 0
    pub fn sample(&mut self, fields: &FieldState) {
        for probe in &mut self.probes {
            let value = fields.ground_motion(probe.x, probe.y).unwrap_or(0.0);
            probe.record(value);
        }
    }

    pub fn clear_buffers(&mut self) {
        for probe in &mut self.probes {
            probe.samples.clear();
        }
    }

    pub fn clear(&mut self) {
        self.probes.clear();
        self.next_id = 0;
    }
}
