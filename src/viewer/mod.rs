pub mod camera;
pub mod lighting;
pub mod panel;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

/// Config file the viewer loads and saves, relative to the asset root.
pub const CONFIG_ASSET: &str = "default.terrain.ron";
pub const HEIGHT_MAP_ASSET: &str = "heightmap.png";

pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(camera::OrbitCameraSettings::default())
            .insert_resource(panel::UiInputCaptureRes::default())
            .insert_resource(panel::TerrainPanelState::default())
            .add_systems(Startup, (camera::setup_viewer, lighting::setup_sun_light))
            .add_systems(
                Update,
                (
                    panel::update_ui_input_capture,
                    camera::orbit_camera_input,
                    camera::update_orbit_camera,
                )
                    .chain(),
            )
            .add_systems(EguiPrimaryContextPass, panel::terrain_panel_system);
    }
}
