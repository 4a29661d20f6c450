pub mod assets;
pub mod color;
pub mod config;
pub mod error;
pub mod generator;
pub mod heightmap;
pub mod mesh;
pub mod normals;
pub mod render;
pub mod smooth_noise;
pub mod triangulation;

pub use config::*;
pub use error::{ConfigError, GenerationError};
pub use generator::{HeightfieldMeshGenerator, generate};
pub use heightmap::{GrayscaleGrid, GrayscaleRange, GrayscaleSource, HeightMapSampler};
pub use mesh::MeshBuffers;

use bevy::prelude::*;

/// Renders a single generated heightfield and rebuilds it on request.
pub struct TerrainPlugin {
    pub config: GenerationConfig,
    pub paths: render::TerrainAssetPaths,
}

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(render::InitialTerrainConfig(self.config.clone()))
            .insert_resource(self.paths.clone())
            .add_message::<render::RegenerateTerrain>()
            .init_asset::<assets::TerrainConfigAsset>()
            .init_asset_loader::<assets::TerrainConfigAssetLoader>()
            .add_systems(Startup, render::setup_terrain)
            .add_systems(
                Update,
                (
                    render::apply_config_asset,
                    render::watch_height_map,
                    render::regenerate_terrain,
                )
                    .chain(),
            );
    }
}
