use bevy::prelude::*;
use bevy_egui::EguiPlugin;

mod viewer;

use terrain::render::TerrainAssetPaths;
use terrain::{GenerationConfig, TerrainPlugin};
use viewer::ViewerPlugin;

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.60, 0.80, 0.95)))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 30.0,
            affects_lightmapped_meshes: false,
        })
        .add_plugins(DefaultPlugins)
        .add_plugins(EguiPlugin::default())
        .add_plugins(TerrainPlugin {
            config: GenerationConfig::default(),
            paths: TerrainAssetPaths {
                config: Some(viewer::CONFIG_ASSET.to_string()),
                // A missing file never loads, which leaves generation on noise.
                height_map: Some(viewer::HEIGHT_MAP_ASSET.to_string()),
                albedo: None,
            },
        })
        .add_plugins(ViewerPlugin)
        .run();
}
