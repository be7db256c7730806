//! Geological medium presets and the catalog the kernel indexes every tick

use serde::{Deserialize, Serialize};
use crate::error::{SimError, SimResult};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Physical preset assignable to a grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediumPreset {
    pub id: u8,
    pub name: String,
    pub color: Rgb,
    /// Multiplier on the stencil gain (> 0)
    pub speed_factor: f64,
    /// Per-tick velocity multiplier in (0, 1]
    pub damping_factor: f64,
    /// Reflective cells invert and halve their velocity every tick
    pub reflective: bool,
}

impl MediumPreset {
    pub fn new(id: u8, name: &str, color: Rgb, speed_factor: f64, damping_factor: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            color,
            speed_factor,
            damping_factor,
            reflective: false,
        }
    }

    pub fn reflective(mut self) -> Self {
        self.reflective = true;
        self
    }
}

/// Immutable table of medium presets, indexed by id
///
/// Id 0 is the default fill medium and the fallback for any id the table
/// does not contain.
#[derive(Debug, Clone, PartialEq)]
pub struct MediumCatalog {
    presets: Vec<MediumPreset>,
}

impl MediumCatalog {
    /// Build a catalog from presets whose ids are exactly `0..len`
    pub fn new(presets: Vec<MediumPreset>) -> SimResult<Self> {
        if presets.is_empty() {
            return Err(SimError::InvalidCatalog {
                message: "catalog needs at least the default medium".into(),
            });
        }
        if presets.len() > usize::from(u8::MAX) + 1 {
            return Err(SimError::InvalidCatalog {
                message: format!("{} presets exceed the 8-bit id range", presets.len()),
            });
        }
        for (i, preset) in presets.iter().enumerate() {
            if usize::from(preset.id) != i {
                return Err(SimError::InvalidCatalog {
                    message: format!(
                        "preset '{}' has id {}, expected {}",
                        preset.name, preset.id, i
                    ),
                });
            }
            if !(preset.speed_factor.is_finite() && preset.speed_factor > 0.0) {
                return Err(SimError::InvalidCatalog {
                    message: format!("preset '{}' has non-positive speed factor", preset.name),
                });
            }
            if !(preset.damping_factor > 0.0 && preset.damping_factor <= 1.0) {
                return Err(SimError::InvalidCatalog {
                    message: format!("preset '{}' has damping outside (0, 1]", preset.name),
                });
            }
        }
        Ok(Self { presets })
    }

    /// Soil types of the Metro Manila sandbox
    pub fn standard() -> Self {
        Self {
            presets: vec![
                MediumPreset::new(0, "Soft Soil", Rgb::new(0x88, 0x44, 0x00), 1.0, 0.995),
                MediumPreset::new(1, "Border", Rgb::new(0x44, 0x44, 0x44), 1.0, 0.5).reflective(),
                MediumPreset::new(2, "Water", Rgb::new(0x00, 0xaa, 0xff), 0.85, 0.995),
                MediumPreset::new(3, "Sand", Rgb::new(0xd2, 0xb4, 0x8c), 0.9, 0.99),
                MediumPreset::new(4, "Rock", Rgb::new(0x88, 0x88, 0x88), 3.0, 0.997),
                MediumPreset::new(5, "Coastal Lowland", Rgb::new(0xa0, 0xd6, 0xb4), 0.6, 0.98),
                MediumPreset::new(6, "Central Plateau", Rgb::new(0x88, 0x44, 0x00), 2.0, 0.995),
                MediumPreset::new(7, "Marikina Valley", Rgb::new(0xe0, 0xa8, 0x99), 0.5, 0.97),
                MediumPreset::new(8, "Novaliches Loam", Rgb::new(0xb5, 0x65, 0x76), 1.8, 0.994),
                MediumPreset::new(9, "San Luis Clay", Rgb::new(0xd2, 0xb4, 0x8c), 1.0, 0.99),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn contains(&self, id: u8) -> bool {
        usize::from(id) < self.presets.len()
    }

    pub fn get(&self, id: u8) -> Option<&MediumPreset> {
        self.presets.get(usize::from(id))
    }

    /// Preset for `id`, or the default medium when `id` is out of range
    #[inline]
    pub fn lookup(&self, id: u8) -> &MediumPreset {
        self.presets
            .get(usize::from(id))
            .unwrap_or(&self.presets[0])
    }

    pub fn default_medium(&self) -> &MediumPreset {
        &self.presets[0]
    }

    pub fn find_by_name(&self, name: &str) -> Option<&MediumPreset> {
        self.presets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// First reflective preset, used for border rings
    pub fn reflective_id(&self) -> Option<u8> {
        self.presets.iter().find(|p| p.reflective).map(|p| p.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediumPreset> {
        self.presets.iter()
    }
}

impl Default for MediumCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
