use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use macroquad::{
    color::WHITE,
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use stone_defence_rendering::AssetCatalog;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Sprite keys the renderer knows how to draw, in load order.
pub(crate) const KNOWN_SPRITE_KEYS: [&str; 6] = [
    "background",
    "basic_tower",
    "cannon_tower",
    "archer_tower",
    "enemy1",
    "enemy2",
];

/// Cache of textures loaded from the optional sprite manifest.
///
/// Any key may be absent; callers draw primitive shapes for missing keys.
#[derive(Debug, Default)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<&'static str, Texture2D>,
}

impl SpriteAtlas {
    /// Atlas without any textures, used when sprites are disabled.
    #[must_use]
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    /// Loads the manifest at `path`, degrading to an empty atlas on failure.
    pub(crate) fn load_or_empty(path: &Path) -> Self {
        match Self::from_manifest_with_loader(path, default_loader) {
            Ok(atlas) => {
                log::info!(
                    "loaded {} sprite(s) from {}",
                    atlas.textures.len(),
                    path.display()
                );
                atlas
            }
            Err(error) => {
                log::warn!("{error:#}; drawing primitive shapes instead");
                Self::empty()
            }
        }
    }

    /// Draws the sprite registered under `key` covering the given screen rectangle.
    ///
    /// Returns `false` when no texture is registered so the caller can fall back.
    pub(crate) fn draw(&self, key: &str, top_left: Vec2, size: Vec2) -> bool {
        let Some(texture) = self.textures.get(key).copied() else {
            return false;
        };

        texture::draw_texture_ex(
            texture,
            top_left.x,
            top_left.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(MacroquadVec2::new(size.x, size.y)),
                ..DrawTextureParams::default()
            },
        );
        true
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(&'static str, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Ok(Self::from_entries(entries, &mut loader))
    }

    fn from_entries(
        entries: Vec<(&'static str, PathBuf)>,
        loader: &mut impl FnMut(&'static str, &Path) -> Result<Texture2D>,
    ) -> Self {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            match loader(key, &path) {
                Ok(texture) => {
                    let _ = textures.insert(key, texture);
                }
                Err(error) => {
                    log::warn!("sprite `{key}` unavailable: {error:#}");
                }
            }
        }
        Self { textures }
    }
}

impl AssetCatalog for SpriteAtlas {
    fn has_sprite(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    fn has_sound(&self, _key: &str) -> bool {
        false
    }
}

fn default_loader(_key: &'static str, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    sprites: HashMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(&'static str, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut sprites = manifest.sprites;
    let mut ordered = Vec::with_capacity(sprites.len());
    for key in KNOWN_SPRITE_KEYS {
        if let Some(relative_path) = sprites.remove(key) {
            ordered.push((key, base_path.join(relative_path)));
        }
    }

    if !sprites.is_empty() {
        let mut unexpected = sprites.into_keys().collect::<Vec<_>>();
        unexpected.sort();
        bail!(
            "sprite manifest contains unexpected keys: {}",
            unexpected.join(", ")
        );
    }

    Ok(ordered)
}
