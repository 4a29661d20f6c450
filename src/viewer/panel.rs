use bevy::asset::io::file::FileAssetReader;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};
use terrain::render::{RegenerateTerrain, TerrainSettings};
use terrain::{DiagonalMode, GenerationConfig, HeightSource};

use super::CONFIG_ASSET;

#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct UiInputCaptureRes {
    /// True when egui wants to consume mouse/pointer input.
    pub pointer: bool,
}

#[derive(Resource, Clone, Debug)]
pub struct TerrainPanelState {
    /// Rebuild as soon as a value changes instead of waiting for the button.
    pub auto_regenerate: bool,
}

impl Default for TerrainPanelState {
    fn default() -> Self {
        Self {
            auto_regenerate: true,
        }
    }
}

pub fn update_ui_input_capture(
    mut contexts: EguiContexts,
    mut capture: ResMut<UiInputCaptureRes>,
) {
    capture.pointer = match contexts.ctx_mut() {
        Ok(ctx) => ctx.wants_pointer_input() || ctx.is_pointer_over_area(),
        Err(_) => false,
    };
}

pub fn terrain_panel_system(
    mut contexts: EguiContexts,
    mut panel: ResMut<TerrainPanelState>,
    settings: Option<ResMut<TerrainSettings>>,
    mut regenerate: MessageWriter<RegenerateTerrain>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let Some(mut settings) = settings else {
        return Ok(());
    };

    let mut config = settings.config.clone();
    let mut regenerate_clicked = false;
    let mut save_clicked = false;

    egui::Window::new("Terrain")
        .default_pos(egui::pos2(12.0, 12.0))
        .resizable(false)
        .show(ctx, |ui| {
            scale_section(ui, &mut config);
            height_section(ui, &mut config);
            triangle_section(ui, &mut config);
            color_section(ui, &mut config);
            texture_section(ui, &mut config);

            ui.separator();
            if let Err(e) = config.validate() {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), e.to_string());
            }
            ui.checkbox(&mut panel.auto_regenerate, "Regenerate on change");
            ui.horizontal(|ui| {
                regenerate_clicked = ui.button("Regenerate").clicked();
                save_clicked = ui.button("Save").clicked();
            });
        });

    let changed = config != settings.config;
    if changed {
        settings.config = config;
    }
    if regenerate_clicked || (changed && panel.auto_regenerate) {
        regenerate.write(RegenerateTerrain);
    }
    if save_clicked {
        save_config(&settings.config);
    }

    Ok(())
}

fn save_config(config: &GenerationConfig) {
    // Same root the asset server reads from, independent of the working directory.
    let path = FileAssetReader::get_base_path()
        .join("assets")
        .join(CONFIG_ASSET);
    match config.save_to_ron_file(&path) {
        Ok(()) => info!("saved terrain config to {}", path.display()),
        Err(e) => error!("{e}"),
    }
}

fn scale_section(ui: &mut egui::Ui, config: &mut GenerationConfig) {
    egui::CollapsingHeader::new("Scale")
        .default_open(true)
        .show(ui, |ui| {
            ui.add(egui::Slider::new(&mut config.resolution, 1..=512).text("resolution"));
            ui.add(egui::Slider::new(&mut config.size, 10.0..=5000.0).text("size"));
            ui.add(egui::Slider::new(&mut config.max_height, 0.0..=1000.0).text("max height"));
        });
}

fn height_section(ui: &mut egui::Ui, config: &mut GenerationConfig) {
    egui::CollapsingHeader::new("Height")
        .default_open(true)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut config.height_source, HeightSource::Noise, "Noise");
                ui.selectable_value(
                    &mut config.height_source,
                    HeightSource::HeightMap,
                    "Height map",
                );
            });

            match config.height_source {
                HeightSource::HeightMap => {
                    ui.checkbox(&mut config.height_map.normalize, "normalize");
                }
                HeightSource::Noise => {
                    let noise = &mut config.noise;
                    ui.horizontal(|ui| {
                        ui.label("seed");
                        ui.add(egui::DragValue::new(&mut noise.seed));
                    });
                    ui.add(egui::Slider::new(&mut noise.scale, 0.1..=50.0).text("noise scale"));
                    ui.horizontal(|ui| {
                        ui.label("offset");
                        ui.add(egui::DragValue::new(&mut noise.offset.x).speed(0.05));
                        ui.add(egui::DragValue::new(&mut noise.offset.y).speed(0.05));
                    });
                    ui.add(
                        egui::Slider::new(&mut noise.height_offset, -500.0..=500.0)
                            .text("height offset"),
                    );
                }
            }
        });
}

fn triangle_section(ui: &mut egui::Ui, config: &mut GenerationConfig) {
    egui::CollapsingHeader::new("Triangles").show(ui, |ui| {
        let tri = &mut config.triangulation;
        egui::ComboBox::from_label("diagonals")
            .selected_text(format!("{:?}", tri.mode))
            .show_ui(ui, |ui| {
                for mode in [
                    DiagonalMode::Fixed,
                    DiagonalMode::Alternating,
                    DiagonalMode::Random,
                    DiagonalMode::AlternatingRandom,
                ] {
                    ui.selectable_value(&mut tri.mode, mode, format!("{mode:?}"));
                }
            });
        ui.checkbox(&mut tri.flip_diagonal, "flip diagonal");
    });
}

fn color_section(ui: &mut egui::Ui, config: &mut GenerationConfig) {
    egui::CollapsingHeader::new("Height coloring").show(ui, |ui| {
        let colors = &mut config.colors;
        ui.checkbox(&mut colors.enabled, "enabled");
        ui.checkbox(&mut colors.smoothing, "smoothing");
        ui.horizontal(|ui| {
            ui.color_edit_button_rgba_unmultiplied(&mut colors.low);
            ui.color_edit_button_rgba_unmultiplied(&mut colors.mid);
            ui.color_edit_button_rgba_unmultiplied(&mut colors.high);
        });
        ui.add(
            egui::Slider::new(&mut colors.low_level_height, 0.0..=1000.0).text("low level"),
        );
        ui.add(
            egui::Slider::new(&mut colors.mid_level_height, 0.0..=1000.0).text("mid level"),
        );
    });
}

fn texture_section(ui: &mut egui::Ui, config: &mut GenerationConfig) {
    egui::CollapsingHeader::new("Texture mapping").show(ui, |ui| {
        let texture = &mut config.texture;
        ui.horizontal(|ui| {
            ui.label("tile size");
            ui.add(egui::DragValue::new(&mut texture.tile_size.x).range(0.1..=10_000.0));
            ui.add(egui::DragValue::new(&mut texture.tile_size.y).range(0.1..=10_000.0));
        });
        ui.add(egui::Slider::new(&mut texture.rotation_degrees, 0.0..=360.0).text("rotation"));
    });
}
