//! Configuration persistence for snipmark settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Alpha shared by every highlighter colour
pub const HIGHLIGHT_ALPHA: u8 = 80;

/// RGBA colour applied to new highlighter strokes (straight alpha)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightColour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HighlightColour {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to image crate RGBA format
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for HighlightColour {
    fn default() -> Self {
        PaletteColour::default().colour(HIGHLIGHT_ALPHA)
    }
}

/// Named highlighter colours offered in the colour menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaletteColour {
    #[default]
    Yellow,
    Blue,
    Green,
    Red,
    Orange,
    Purple,
}

impl PaletteColour {
    /// Menu order; also the order of the number-key shortcuts
    pub const ALL: [PaletteColour; 6] = [
        PaletteColour::Yellow,
        PaletteColour::Blue,
        PaletteColour::Green,
        PaletteColour::Red,
        PaletteColour::Orange,
        PaletteColour::Purple,
    ];

    pub fn rgb(self) -> [u8; 3] {
        match self {
            PaletteColour::Yellow => [255, 255, 0],
            PaletteColour::Blue => [0, 0, 255],
            PaletteColour::Green => [0, 255, 0],
            PaletteColour::Red => [255, 0, 0],
            PaletteColour::Orange => [255, 165, 0],
            PaletteColour::Purple => [128, 0, 128],
        }
    }

    pub fn colour(self, alpha: u8) -> HighlightColour {
        let [r, g, b] = self.rgb();
        HighlightColour::new(r, g, b, alpha)
    }

    /// Label shown in menus
    pub fn label(self) -> &'static str {
        match self {
            PaletteColour::Yellow => "Yellow",
            PaletteColour::Blue => "Blue",
            PaletteColour::Green => "Green",
            PaletteColour::Red => "Red",
            PaletteColour::Orange => "Orange",
            PaletteColour::Purple => "Purple",
        }
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnipConfig {
    /// Global shortcut that starts a capture, e.g. "Alt+PrintScreen"
    pub hotkey: String,
    /// Highlighter colour selected when an annotation window opens
    pub default_colour: PaletteColour,
    /// Highlighter stroke width in snip pixels
    pub stroke_width: f32,
    /// Alpha applied to every palette colour
    pub highlight_alpha: u8,
    /// JPEG quality for export (1-100)
    pub jpeg_quality: u8,
    /// Opacity of the grey veil over the desktop while selecting (0.0-1.0)
    pub selection_dim: f32,
}

impl Default for SnipConfig {
    fn default() -> Self {
        Self {
            hotkey: "Alt+PrintScreen".to_string(),
            default_colour: PaletteColour::Yellow,
            stroke_width: 15.0,
            highlight_alpha: HIGHLIGHT_ALPHA,
            jpeg_quality: 90,
            selection_dim: 0.3,
        }
    }
}

impl SnipConfig {
    /// Directory name under the platform config dir
    pub const ID: &'static str = "snipmark";

    /// Default config file location
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            // First run: write the defaults out so the hotkey can be edited
            let config = Self::default();
            config.save();
            return config;
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&data)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No config directory available, settings not saved");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data).with_context(|| format!("write config {}", path.display()))?;
        Ok(())
    }

    /// Highlighter colour an annotation session starts with
    pub fn initial_colour(&self) -> HighlightColour {
        self.default_colour.colour(self.highlight_alpha)
    }

    /// Pull out-of-range values back to something usable
    fn sanitized(mut self) -> Self {
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            self.stroke_width = Self::default().stroke_width;
        }
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        if self.highlight_alpha == 0 {
            log::warn!(
                "highlight_alpha 0 would make strokes invisible, using {}",
                HIGHLIGHT_ALPHA
            );
            self.highlight_alpha = HIGHLIGHT_ALPHA;
        }
        self.selection_dim = if self.selection_dim.is_finite() {
            self.selection_dim.clamp(0.0, 1.0)
        } else {
            Self::default().selection_dim
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_colours_share_alpha() {
        for c in PaletteColour::ALL {
            assert_eq!(c.colour(HIGHLIGHT_ALPHA).a, 80);
        }
        assert_eq!(
            PaletteColour::Orange.colour(80),
            HighlightColour::new(255, 165, 0, 80)
        );
    }

    #[test]
    fn test_default_colour_is_translucent_yellow() {
        assert_eq!(HighlightColour::default(), HighlightColour::new(255, 255, 0, 80));
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = SnipConfig {
            hotkey: "Ctrl+Shift+S".to_string(),
            default_colour: PaletteColour::Purple,
            stroke_width: 9.0,
            jpeg_quality: 75,
            ..SnipConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(SnipConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "default_colour": "Green", "jpeg_quality": 0 }"#).unwrap();

        let config = SnipConfig::load_from(&path).unwrap();
        assert_eq!(config.default_colour, PaletteColour::Green);
        assert_eq!(config.hotkey, "Alt+PrintScreen");
        assert_eq!(config.stroke_width, 15.0);
        assert_eq!(config.jpeg_quality, 1);
    }

    #[test]
    fn test_zero_highlight_alpha_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "highlight_alpha": 0 }"#).unwrap();

        let config = SnipConfig::load_from(&path).unwrap();
        assert_eq!(config.highlight_alpha, HIGHLIGHT_ALPHA);
        assert_eq!(config.initial_colour().a, HIGHLIGHT_ALPHA);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(SnipConfig::load_from(&path).is_err());
    }
}
