use std::path::{Path, PathBuf};

use glam::Vec2;
use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::{FontError, FontResult};
use crate::font::atlas::KeyKind;

// ── TextStyle ─────────────────────────────────────────────────────────────────

/// Tint and scale applied to every glyph of a draw call.
///
/// Missing JSON fields take the defaults: opaque white, 1 × 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// RGBA tint multiplied into the glyph pixels.
    pub tint: [u8; 4],
    /// Per-axis glyph scale.
    pub scale: [f32; 2],
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            tint:  [0xFF, 0xFF, 0xFF, 0xFF],
            scale: [1.0, 1.0],
        }
    }
}

impl TextStyle {
    pub fn with_tint(mut self, tint: Rgba<u8>) -> Self {
        self.tint = tint.0;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale.to_array();
        self
    }

    pub fn tint(&self) -> Rgba<u8> {
        Rgba(self.tint)
    }

    pub fn scale(&self) -> Vec2 {
        Vec2::from_array(self.scale)
    }
}

// ── FontConfig ────────────────────────────────────────────────────────────────

fn default_kind() -> KeyKind {
    KeyKind::Ascii
}

/// Which bitmap to load, how to key it, and how to draw with it by default.
///
/// ```json
/// { "path": "fonts/arial.png", "kind": "unicode", "style": { "scale": [2.0, 2.0] } }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Font bitmap (PNG). Relative paths are resolved against the config
    /// file's directory by [`FontConfig::load`].
    pub path: PathBuf,
    /// Glyph keying; defaults to the 96-glyph ASCII layout.
    #[serde(default = "default_kind")]
    pub kind: KeyKind,
    #[serde(default)]
    pub style: TextStyle,
}

impl FontConfig {
    pub fn from_json(json: &str) -> FontResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a config file. A relative `path` inside it is rebased onto the
    /// file's own directory.
    pub fn load(path: impl AsRef<Path>) -> FontResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_json(&json)?;
        if config.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.path = dir.join(&config.path);
            }
        }
        Ok(config)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
