use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

use crate::assets::TerrainConfigAsset;
use crate::config::GenerationConfig;
use crate::generator::HeightfieldMeshGenerator;
use crate::heightmap::{GrayscaleSource, luma};
use crate::mesh::MeshBuffers;

// --- Resources ---

/// Asset paths the terrain is built from, relative to the asset root.
#[derive(Resource, Clone, Debug, Default)]
pub struct TerrainAssetPaths {
    pub config: Option<String>,
    pub height_map: Option<String>,
    pub albedo: Option<String>,
}

/// Config used until (or instead of) the RON asset.
#[derive(Resource, Clone, Debug, Default)]
pub struct InitialTerrainConfig(pub GenerationConfig);

/// The live config plus the images it references.
#[derive(Resource, Clone, Debug, Default)]
pub struct TerrainSettings {
    pub config: GenerationConfig,
    pub config_asset: Option<Handle<TerrainConfigAsset>>,
    pub height_map: Option<Handle<Image>>,
}

#[derive(Component)]
pub struct TerrainMesh;

/// Rebuilds the terrain mesh from the current [`TerrainSettings`].
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct RegenerateTerrain;

// Bevy images store rows top-down; flip to bottom-up addressing.
impl GrayscaleSource for Image {
    fn extent(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    // Unreadable pixels read as black; `is_readable_height_map` screens those formats out.
    fn grayscale(&self, px: u32, pz: u32) -> f32 {
        let Ok(color) = self.get_color_at(px, self.height() - 1 - pz) else {
            return 0.0;
        };
        // Linear formats (R8Unorm, R16Unorm, ...) must not be gamma encoded.
        let [r, g, b] = match color {
            Color::Srgba(c) => [c.red, c.green, c.blue],
            Color::LinearRgba(c) => [c.red, c.green, c.blue],
            other => {
                let c = other.to_srgba();
                [c.red, c.green, c.blue]
            }
        };
        luma(r, g, b)
    }
}

/// True when pixel data can be read back on the CPU (not compressed, supported format).
pub fn is_readable_height_map(image: &Image) -> bool {
    image.get_color_at(0, 0).is_ok()
}

pub fn setup_terrain(
    mut commands: Commands,
    paths: Res<TerrainAssetPaths>,
    initial: Res<InitialTerrainConfig>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut regenerate: MessageWriter<RegenerateTerrain>,
) {
    let config_asset = paths
        .config
        .as_ref()
        .map(|p| asset_server.load::<TerrainConfigAsset>(p.clone()));
    let height_map = paths
        .height_map
        .as_ref()
        .map(|p| asset_server.load::<Image>(p.clone()));
    let albedo = paths.albedo.as_ref().map(|p| {
        asset_server.load_with_settings::<Image, ImageLoaderSettings>(
            p.clone(),
            |settings: &mut ImageLoaderSettings| {
                settings.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
                    address_mode_u: ImageAddressMode::Repeat,
                    address_mode_v: ImageAddressMode::Repeat,
                    ..ImageSamplerDescriptor::linear()
                });
            },
        )
    });

    // Vertex colors are multiplied into the base color by the standard shader.
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: albedo,
        perceptual_roughness: 1.0,
        ..default()
    });

    let mesh = meshes.add(mesh_from_buffers(MeshBuffers::default()));
    commands.spawn((
        TerrainMesh,
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::default(),
    ));

    commands.insert_resource(TerrainSettings {
        config: initial.0.clone(),
        config_asset,
        height_map,
    });
    regenerate.write(RegenerateTerrain);
}

pub fn apply_config_asset(
    mut events: MessageReader<AssetEvent<TerrainConfigAsset>>,
    assets: Res<Assets<TerrainConfigAsset>>,
    settings: Option<ResMut<TerrainSettings>>,
    mut regenerate: MessageWriter<RegenerateTerrain>,
) {
    let Some(mut settings) = settings else {
        return;
    };
    let Some(handle) = settings.config_asset.clone() else {
        return;
    };

    for event in events.read() {
        match event {
            AssetEvent::LoadedWithDependencies { id } | AssetEvent::Modified { id }
                if *id == handle.id() =>
            {
                let Some(asset) = assets.get(*id) else {
                    continue;
                };
                info!("terrain config loaded");
                settings.config = asset.0.clone();
                regenerate.write(RegenerateTerrain);
            }
            _ => {}
        }
    }
}

pub fn watch_height_map(
    mut events: MessageReader<AssetEvent<Image>>,
    settings: Option<Res<TerrainSettings>>,
    mut regenerate: MessageWriter<RegenerateTerrain>,
) {
    let Some(settings) = settings else {
        return;
    };
    let Some(handle) = &settings.height_map else {
        events.clear();
        return;
    };

    let changed = events.read().any(|event| match event {
        AssetEvent::LoadedWithDependencies { id } | AssetEvent::Modified { id } => {
            *id == handle.id()
        }
        _ => false,
    });
    if changed {
        regenerate.write(RegenerateTerrain);
    }
}

pub fn regenerate_terrain(
    mut requests: MessageReader<RegenerateTerrain>,
    settings: Option<Res<TerrainSettings>>,
    images: Res<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    q_terrain: Query<&Mesh3d, With<TerrainMesh>>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    let Some(settings) = settings else {
        return;
    };

    let mut generator = HeightfieldMeshGenerator::new();
    if let Some(image) = settings.height_map.as_ref().and_then(|h| images.get(h)) {
        if is_readable_height_map(image) {
            generator = generator.with_height_map(image);
        } else {
            warn!(
                texture_format = ?image.texture_descriptor.format,
                "height map pixels cannot be read, falling back to noise"
            );
        }
    }

    let buffers = match generator.generate(&settings.config) {
        Ok(buffers) => buffers,
        Err(e) => {
            error!("{e}");
            return;
        }
    };

    info!(
        "terrain regenerated: {} vertices, {} triangles",
        buffers.vertex_count(),
        buffers.triangle_count()
    );

    for mesh3d in &q_terrain {
        if let Some(mesh) = meshes.get_mut(&mesh3d.0) {
            *mesh = mesh_from_buffers(buffers.clone());
        }
    }
}

/// Uploads generator output as a triangle list with 32-bit indices and smooth normals.
pub fn mesh_from_buffers(buffers: MeshBuffers) -> Mesh {
    let normals = buffers.compute_normals();

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, buffers.positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, buffers.colors);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, buffers.uvs);
    mesh.insert_indices(Indices::U32(buffers.indices));
    mesh
}
