use glam::Vec2;
use tracing::{debug, warn};

use crate::config::{GenerationConfig, HeightSource, TextureMapping};
use crate::error::GenerationError;
use crate::heightmap::{GrayscaleSource, HeightMapSampler};
use crate::mesh::MeshBuffers;
use crate::smooth_noise::SmoothNoise;
use crate::triangulation::triangulate;

/// Noise coordinates are pulled in slightly so the far edge stays off the lattice.
const NOISE_SPAN: f32 = 0.99;

/// Builds a regular grid mesh from a [`GenerationConfig`].
///
/// Holds no state between calls. The optional height map is only read, so
/// one image can back several generators running on different threads.
#[derive(Clone, Default)]
pub struct HeightfieldMeshGenerator<'a> {
    height_map: Option<&'a dyn GrayscaleSource>,
    noise: SmoothNoise,
}

impl<'a> HeightfieldMeshGenerator<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_height_map(mut self, source: &'a dyn GrayscaleSource) -> Self {
        self.height_map = Some(source);
        self
    }

    pub fn generate(&self, config: &GenerationConfig) -> Result<MeshBuffers, GenerationError> {
        config.validate()?;

        let resolution = config.resolution;
        let res_f = resolution as f32;
        let cell_size = config.cell_size();
        let half_size = config.size * 0.5;

        let sampler = self.height_map_source(config).and_then(|source| {
            HeightMapSampler::new(source, resolution, config.height_map.normalize)
                .inspect_err(|e| warn!("{e}, falling back to noise"))
                .ok()
        });

        let vertex_count = config.vertex_count();
        let mut positions = Vec::with_capacity(vertex_count);
        let mut colors = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);

        for z in 0..=resolution {
            for x in 0..=resolution {
                let fx = x as f32 / res_f;
                let fz = z as f32 / res_f;

                let height = match &sampler {
                    Some(sampler) => sampler.sample(x, z) * config.max_height,
                    None => self.noise_height(config, fx, fz),
                };

                positions.push([
                    x as f32 * cell_size - half_size,
                    height,
                    half_size - z as f32 * cell_size,
                ]);
                colors.push(config.colors.color_at(height, config.max_height));
                uvs.push(config.texture.uv_at(fx, fz, config.size));
            }
        }

        let indices = triangulate(resolution, &config.triangulation, config.noise.seed);

        debug!(
            resolution,
            vertices = positions.len(),
            indices = indices.len(),
            height_map = sampler.is_some(),
            range = ?sampler.as_ref().and_then(HeightMapSampler::range),
            "generated heightfield mesh"
        );

        Ok(MeshBuffers {
            positions,
            colors,
            uvs,
            indices,
        })
    }

    fn height_map_source(&self, config: &GenerationConfig) -> Option<&'a dyn GrayscaleSource> {
        if config.height_source != HeightSource::HeightMap {
            return None;
        }
        if self.height_map.is_none() {
            warn!("height map requested but none attached, falling back to noise");
        }
        self.height_map
    }

    fn noise_height(&self, config: &GenerationConfig, fx: f32, fz: f32) -> f32 {
        let noise = &config.noise;
        let nx = fx * noise.scale * NOISE_SPAN + noise.offset.x;
        let nz = fz * noise.scale * NOISE_SPAN + noise.offset.y;
        let centered = self.noise.sample(nx, nz) - 0.5;
        (centered * config.max_height + noise.height_offset).max(0.0)
    }
}

/// Generates a mesh with no height map attached.
pub fn generate(config: &GenerationConfig) -> Result<MeshBuffers, GenerationError> {
    HeightfieldMeshGenerator::new().generate(config)
}

impl TextureMapping {
    /// UV for the grid fraction `(fx, fz)`; one texture repeat spans `tile_size` world units.
    pub fn uv_at(&self, fx: f32, fz: f32, size: f32) -> [f32; 2] {
        let repeats = Vec2::new(size / self.tile_size.x, size / self.tile_size.y);
        let uv = Vec2::new(fx * repeats.x, 1.0 - fz * repeats.y);

        if self.rotation_degrees == 0.0 {
            return uv.to_array();
        }

        let pivot = repeats * 0.5;
        let rotation = Vec2::from_angle(self.rotation_degrees.to_radians());
        (rotation.rotate(uv - pivot) + pivot).to_array()
    }
}
