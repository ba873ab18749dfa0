use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::client::DEFAULT_BASE_URL;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
pub const MIN_ROTATION_MINUTES: u64 = 1;
pub const MAX_ROTATION_MINUTES: u64 = 120;

fn default_rotation_minutes() -> u64 {
    5
}
fn default_images() -> Vec<BackgroundImage> {
    vec![BackgroundImage {
        url: "https://images.unsplash.com/photo-1519817650390-64a93db51149".to_string(),
        author: "Hasan Almasi".to_string(),
        author_url: "https://unsplash.com/@hasanalmasi".to_string(),
    }]
}
fn default_true() -> bool {
    true
}

// ─── Location ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    /// myquran.com city id, e.g. "1301" for Jakarta.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

// ─── Appearance ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    Gray,
    Red,
    Yellow,
    Green,
    Blue,
    #[default]
    Indigo,
    Purple,
    Pink,
}

impl ThemeColor {
    pub const ALL: [ThemeColor; 8] = [
        ThemeColor::Gray,
        ThemeColor::Red,
        ThemeColor::Yellow,
        ThemeColor::Green,
        ThemeColor::Blue,
        ThemeColor::Indigo,
        ThemeColor::Purple,
        ThemeColor::Pink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeColor::Gray => "gray",
            ThemeColor::Red => "red",
            ThemeColor::Yellow => "yellow",
            ThemeColor::Green => "green",
            ThemeColor::Blue => "blue",
            ThemeColor::Indigo => "indigo",
            ThemeColor::Purple => "purple",
            ThemeColor::Pink => "pink",
        }
    }

    pub fn next(self) -> ThemeColor {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::str::FromStr for ThemeColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s.to_lowercase())
            .ok_or_else(|| anyhow::anyhow!("Unknown theme color '{}'", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_terbit: bool,
    #[serde(default = "default_true")]
    pub show_dhuha: bool,
    #[serde(default = "default_true")]
    pub show_next_label: bool,
    #[serde(default)]
    pub theme_color: ThemeColor,
    #[serde(default)]
    pub dark_mode: bool,
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default)]
    pub hijri_offset: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_terbit: true,
            show_dhuha: true,
            show_next_label: true,
            theme_color: ThemeColor::default(),
            dark_mode: false,
            hijri_offset: 0,
        }
    }
}

// ─── Background ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    Static,
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundImage {
    pub url: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundConfig {
    #[serde(default)]
    pub mode: BackgroundMode,
    #[serde(default = "default_images")]
    pub images: Vec<BackgroundImage>,
    #[serde(default = "default_rotation_minutes")]
    pub rotation_minutes: u64,
    #[serde(default)]
    pub current_index: usize,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            mode: BackgroundMode::default(),
            images: default_images(),
            rotation_minutes: default_rotation_minutes(),
            current_index: 0,
        }
    }
}

impl BackgroundConfig {
    pub fn current(&self) -> Option<&BackgroundImage> {
        self.images
            .get(self.current_index)
            .or_else(|| self.images.first())
    }

    /// Whether a rotation timer has anything to do.
    pub fn rotates(&self) -> bool {
        self.mode == BackgroundMode::Auto && self.images.len() > 1 && self.rotation_minutes > 0
    }

    pub fn rotation_period(&self) -> Duration {
        let minutes = self.rotation_minutes.clamp(MIN_ROTATION_MINUTES, MAX_ROTATION_MINUTES);
        Duration::from_secs(minutes.saturating_mul(60))
    }

    pub fn advance(&mut self) {
        if !self.images.is_empty() {
            self.current_index = (self.current_index + 1) % self.images.len();
        }
    }
}

// ─── API ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

// ─── Root ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub background: BackgroundConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "jam-shalat").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("jam-shalat.log"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let mut config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        // Hand-edited files may carry any interval; keep it in the range the keys allow.
        config.background.rotation_minutes = config
            .background
            .rotation_minutes
            .clamp(MIN_ROTATION_MINUTES, MAX_ROTATION_MINUTES);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
