//! Configuration and UI preference persistence for sheetmark

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InkColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Default for InkColor {
    fn default() -> Self {
        // Red pen ink (#ef4444)
        Self::from_rgb8(0xef, 0x44, 0x44)
    }
}

impl InkColor {
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

/// Color and width of a continuous stroke tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: InkColor,
    /// Line width in surface pixels
    pub width: f32,
}

/// Styling for every annotation tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationStyle {
    pub pen: StrokeStyle,
    pub highlighter: StrokeStyle,
    pub check_color: InkColor,
    pub cross_color: InkColor,
    /// Edge length of the square a stamp glyph is drawn into
    pub stamp_size: f32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            pen: StrokeStyle {
                color: InkColor::default(),
                width: 4.0,
            },
            // Translucent yellow marker
            highlighter: StrokeStyle {
                color: InkColor::from_rgb8(255, 255, 0).with_alpha(0.4),
                width: 30.0,
            },
            check_color: InkColor::from_rgb8(0x10, 0xb9, 0x81),
            cross_color: InkColor::from_rgb8(0xef, 0x44, 0x44),
            stamp_size: 50.0,
        }
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tool styling
    #[serde(default)]
    pub annotation: AnnotationStyle,
    /// Backing resolution used before the sheet image has loaded
    #[serde(default = "default_fallback_width")]
    pub fallback_width: u32,
    #[serde(default = "default_fallback_height")]
    pub fallback_height: u32,
    /// Maximum marks for a question when the data service does not say
    #[serde(default = "default_max_marks")]
    pub default_max_marks: f64,
    /// Page count for a workbook when the data service does not say
    #[serde(default = "default_total_pages")]
    pub default_total_pages: u32,
}

fn default_fallback_width() -> u32 {
    800
}

fn default_fallback_height() -> u32 {
    600
}

fn default_max_marks() -> f64 {
    10.0
}

fn default_total_pages() -> u32 {
    4
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            annotation: AnnotationStyle::default(),
            fallback_width: default_fallback_width(),
            fallback_height: default_fallback_height(),
            default_max_marks: default_max_marks(),
            default_total_pages: default_total_pages(),
        }
    }
}

impl AppConfig {
    /// Application directory name under the platform config dir
    pub const ID: &'static str = "sheetmark";

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from the default location, or return defaults if unavailable
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("No config directory available, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match read_json::<Self>(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) {
        if let Err(err) = write_json(path, self) {
            log::error!("Failed to save config: {:?}", err);
        }
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

/// Preference key for the collapsed state of the navigation sidebar
pub const SIDEBAR_COLLAPSED: &str = "sidebarCollapsed";

/// Key-value store for UI preferences
///
/// Reads never fail: a missing or unparsable value yields `default`.
/// Writes never fail either; errors are logged and dropped.
pub trait PreferenceStore {
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T;
    fn set<T: Serialize>(&mut self, key: &str, value: T);
}

/// Preference store backed by a single JSON object file
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> anyhow::Result<serde_json::Map<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(serde_json::Map::new());
        }
        read_json(&self.path)
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let map = match self.read_map() {
            Ok(map) => map,
            Err(err) => {
                log::error!("Error reading preferences: {:?}", err);
                return default;
            }
        };
        match map.get(key) {
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|err| {
                log::warn!("Preference {key} has unexpected shape: {err}");
                default
            }),
            None => default,
        }
    }

    fn set<T: Serialize>(&mut self, key: &str, value: T) {
        let result = self.read_map().and_then(|mut map| {
            map.insert(key.to_string(), serde_json::to_value(value)?);
            write_json(&self.path, &map)
        });
        if let Err(err) = result {
            log::error!("Error writing preferences: {:?}", err);
        }
    }
}
