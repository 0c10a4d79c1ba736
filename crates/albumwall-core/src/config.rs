use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::color::Color;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub composite: CompositeConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory the palette images are loaded from
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            image_dir: default_image_dir(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Direction new rows enter the wall from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    /// New rows are appended at the top and the wall moves down
    Falling,
    /// New rows are appended at the bottom and the wall moves up
    #[default]
    Rising,
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollDirection::Falling => write!(f, "falling"),
            ScrollDirection::Rising => write!(f, "rising"),
        }
    }
}

impl std::str::FromStr for ScrollDirection {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "falling" => Ok(ScrollDirection::Falling),
            "rising" => Ok(ScrollDirection::Rising),
            other => Err(crate::Error::Config(format!(
                "unknown scroll direction '{}', expected rising or falling",
                other
            ))),
        }
    }
}

/// Settings for the scrolling composite itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeConfig {
    /// Cells are approximately this many pixels wide; the actual size may be
    /// slightly larger so the columns fill the surface width exactly
    #[serde(default = "default_preferred_cell_size")]
    pub preferred_cell_size: f64,
    /// Color painted once at construction, visible until the first frame
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default)]
    pub scroll_direction: ScrollDirection,
    /// Time in milliseconds for one row to advance to the next position
    #[serde(default = "default_scroll_speed")]
    pub scroll_speed_ms: u64,
    /// Time in milliseconds between redraws
    #[serde(default = "default_redraw_rate")]
    pub redraw_rate_ms: u64,
    /// Start scrolling as soon as the wall is shown
    #[serde(default = "default_true")]
    pub start_automatically: bool,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            preferred_cell_size: default_preferred_cell_size(),
            background_color: default_background_color(),
            scroll_direction: ScrollDirection::default(),
            scroll_speed_ms: default_scroll_speed(),
            redraw_rate_ms: default_redraw_rate(),
            start_automatically: default_true(),
        }
    }
}

impl CompositeConfig {
    /// Reject values the engine cannot animate with
    pub fn validate(&self) -> crate::Result<()> {
        if !self.preferred_cell_size.is_finite() || self.preferred_cell_size <= 0.0 {
            return Err(crate::Error::Config(format!(
                "preferred_cell_size must be a positive number, got {}",
                self.preferred_cell_size
            )));
        }
        if self.redraw_rate_ms == 0 {
            return Err(crate::Error::Config(
                "redraw_rate_ms must be greater than 0".to_string(),
            ));
        }
        if self.scroll_speed_ms == 0 {
            return Err(crate::Error::Config(
                "scroll_speed_ms must be greater than 0".to_string(),
            ));
        }
        self.background()?;
        Ok(())
    }

    pub fn background(&self) -> crate::Result<Color> {
        self.background_color.parse()
    }

    pub fn redraw_interval(&self) -> Duration {
        Duration::from_millis(self.redraw_rate_ms)
    }
}

/// Defaults for the headless `render` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_render_width")]
    pub width: u32,
    #[serde(default = "default_render_height")]
    pub height: u32,
    /// Number of frames written per run
    #[serde(default = "default_render_frames")]
    pub frames: u32,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_render_width(),
            height: default_render_height(),
            frames: default_render_frames(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Input poll rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_true")]
    pub show_status_bar: bool,
    /// Preferred cell size in the terminal, measured in halfblock pixels
    /// (one column wide, half a row tall)
    #[serde(default = "default_ui_cell_size")]
    pub cell_size: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            show_status_bar: default_true(),
            cell_size: default_ui_cell_size(),
        }
    }
}

fn default_image_dir() -> PathBuf {
    dirs::picture_dir()
        .map(|dir| dir.join("albumwall"))
        .unwrap_or_else(|| PathBuf::from("~/.local/share/albumwall/images"))
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.local/share/albumwall")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_preferred_cell_size() -> f64 {
    50.0
}

fn default_background_color() -> String {
    "white".to_string()
}

fn default_scroll_speed() -> u64 {
    5000
}

fn default_redraw_rate() -> u64 {
    20
}

fn default_render_width() -> u32 {
    800
}

fn default_render_height() -> u32 {
    600
}

fn default_render_frames() -> u32 {
    250 // 5 seconds at the default redraw rate, one full row
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("frames")
}

fn default_tick_rate() -> u64 {
    50
}

fn default_ui_cell_size() -> f64 {
    16.0
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        let config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.composite.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/albumwall/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("albumwall")
            .join("config.toml")
    }

    /// Get the log file path used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("albumwall.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the image directory (with tilde expansion)
    pub fn image_dir(&self) -> PathBuf {
        expand_tilde(&self.general.image_dir)
    }
}
