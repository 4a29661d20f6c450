use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use bevy::reflect::TypePath;

use crate::config::GenerationConfig;
use crate::error::ConfigError;

#[derive(Asset, TypePath, Debug, Clone)]
pub struct TerrainConfigAsset(pub GenerationConfig);

#[derive(Default)]
pub struct TerrainConfigAssetLoader;

impl AssetLoader for TerrainConfigAssetLoader {
    type Asset = TerrainConfigAsset;
    type Settings = ();
    type Error = ConfigError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let text = std::str::from_utf8(&bytes)?;
        let config = GenerationConfig::from_ron_str(text)?;

        Ok(TerrainConfigAsset(config))
    }

    fn extensions(&self) -> &[&str] {
        &["terrain.ron"]
    }
}
