use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GenerationError};

/// Largest grid resolution whose vertex indices still fit in `u32`.
pub const MAX_RESOLUTION: u32 = u16::MAX as u32 - 1;

pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

// --- Config ---

/// Everything the generator needs for one call.
///
/// Grouped the same way the terrain inspector groups its fields. Every group
/// has a default, so a RON file only needs to name the values it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of cells along each side of the grid.
    pub resolution: u32,
    /// World-space edge length of the whole grid.
    pub size: f32,
    pub max_height: f32,
    pub height_source: HeightSource,
    pub noise: NoiseSettings,
    pub height_map: HeightMapSettings,
    pub triangulation: TriangulationSettings,
    pub colors: HeightColors,
    pub texture: TextureMapping,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            resolution: 50,
            size: 1000.0,
            max_height: 250.0,
            height_source: HeightSource::Noise,
            noise: NoiseSettings::default(),
            height_map: HeightMapSettings::default(),
            triangulation: TriangulationSettings::default(),
            colors: HeightColors::default(),
            texture: TextureMapping::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightSource {
    #[default]
    Noise,
    HeightMap,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub scale: f32,
    pub offset: Vec2,
    /// Seeds the diagonal randomizer. Noise heights do not depend on it.
    pub seed: u64,
    pub height_offset: f32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            scale: 5.0,
            offset: Vec2::ZERO,
            seed: 1024,
            height_offset: 50.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightMapSettings {
    /// Stretch the image's observed grayscale range to fill [0, 1].
    pub normalize: bool,
}

// --- Triangles ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagonalMode {
    /// Every cell uses `flip_diagonal`.
    #[default]
    Fixed,
    /// The flip flag toggles before every cell, carrying over between rows.
    Alternating,
    /// The flip flag toggles with 50% probability before every cell.
    Random,
    /// Both toggles, alternating first.
    AlternatingRandom,
}

impl DiagonalMode {
    pub fn alternates(self) -> bool {
        matches!(self, Self::Alternating | Self::AlternatingRandom)
    }

    pub fn randomizes(self) -> bool {
        matches!(self, Self::Random | Self::AlternatingRandom)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangulationSettings {
    pub mode: DiagonalMode,
    /// Initial diagonal state.
    pub flip_diagonal: bool,
}

// --- Colors ---

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightColors {
    pub enabled: bool,
    pub smoothing: bool,
    pub low: [f32; 4],
    pub mid: [f32; 4],
    pub high: [f32; 4],
    /// Heights strictly below this use `low`.
    pub low_level_height: f32,
    /// Heights strictly below this (and not below `low_level_height`) use `mid`.
    pub mid_level_height: f32,
}

impl Default for HeightColors {
    fn default() -> Self {
        Self {
            enabled: false,
            smoothing: false,
            low: [0.0, 0.0, 1.0, 1.0],
            mid: [1.0, 0.92, 0.016, 1.0],
            high: [1.0, 0.0, 0.0, 1.0],
            low_level_height: 50.0,
            mid_level_height: 150.0,
        }
    }
}

// --- Texture mapping ---

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureMapping {
    /// World-space size covered by one texture repeat along U and V.
    pub tile_size: Vec2,
    pub rotation_degrees: f32,
}

impl Default for TextureMapping {
    fn default() -> Self {
        Self {
            tile_size: Vec2::new(50.0, 50.0),
            rotation_degrees: 0.0,
        }
    }
}

impl GenerationConfig {
    pub fn verts_per_line(&self) -> usize {
        self.resolution as usize + 1
    }

    pub fn vertex_count(&self) -> usize {
        self.verts_per_line() * self.verts_per_line()
    }

    pub fn index_count(&self) -> usize {
        let r = self.resolution as usize;
        r * r * 6
    }

    pub fn cell_size(&self) -> f32 {
        self.size / self.resolution as f32
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.resolution < 1 {
            return Err(GenerationError::invalid("resolution must be at least 1"));
        }
        if self.resolution > MAX_RESOLUTION {
            return Err(GenerationError::invalid(format!(
                "resolution {} exceeds {} (vertex indices would overflow u32)",
                self.resolution, MAX_RESOLUTION
            )));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(GenerationError::invalid(format!(
                "size must be a positive finite number, got {}",
                self.size
            )));
        }
        if !self.max_height.is_finite() {
            return Err(GenerationError::invalid("max_height must be finite"));
        }
        if self.colors.mid_level_height <= self.colors.low_level_height {
            return Err(GenerationError::invalid(format!(
                "mid_level_height={} must be greater than low_level_height={}",
                self.colors.mid_level_height, self.colors.low_level_height
            )));
        }
        let tile = self.texture.tile_size;
        if !(tile.x > 0.0 && tile.y > 0.0) {
            return Err(GenerationError::invalid(format!(
                "texture tile size must be positive on both axes, got ({}, {})",
                tile.x, tile.y
            )));
        }
        Ok(())
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_ron_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn save_to_ron_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}
