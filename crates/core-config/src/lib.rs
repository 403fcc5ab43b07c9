//! Configuration loading and parsing.
//!
//! Parses `rawedit.toml` (or an override path provided by the binary).
//! Every field is optional; a missing file or a parse failure yields the
//! defaults. The raw values are retained and [`Config::effective`] clamps
//! them into usable ranges, logging each clamp under `target: "config"`.
//! Unknown fields are ignored so older binaries accept newer files.
//!
//! ```toml
//! [limits]
//! max_line_cells = 32767
//! max_lines = 65535
//! max_chars = 0          # 0 = unlimited
//!
//! [cursor]
//! blink = true
//! blink_interval_ms = 500
//!
//! [scroll]
//! wheel_lines = 3
//!
//! [clipboard]
//! max_units = 65536
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "rawedit.toml";
pub const MIN_BLINK_INTERVAL_MS: u64 = 50;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_line_cells: usize,
    pub max_lines: usize,
    pub max_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_cells: 32_767,
            max_lines: 65_535,
            max_chars: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CursorConfig {
    pub blink: bool,
    pub blink_interval_ms: u64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            blink: true,
            blink_interval_ms: 500,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ScrollConfig {
    pub wheel_lines: usize,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { wheel_lines: 3 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClipboardConfig {
    pub max_units: usize,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self { max_units: 65_536 }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Clamped values ready to hand to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub max_line_cells: usize,
    pub max_lines: usize,
    pub max_chars: usize,
    pub blink: bool,
    pub blink_interval: Duration,
    pub wheel_lines: usize,
    pub clipboard_units: usize,
}

/// Best-effort config path: working directory first, then the platform
/// config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("rawedit").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config {
            raw: Some(content),
            file,
        }),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

fn at_least<T>(name: &'static str, raw: T, min: T) -> T
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    if raw < min {
        info!(target: "config", field = name, raw = %raw, clamped = %min, "config_value_clamped");
        min
    } else {
        raw
    }
}

impl Config {
    /// Clamp the parsed values. Each adjusted field is logged at `info`.
    pub fn effective(&self) -> EffectiveConfig {
        let f = &self.file;
        EffectiveConfig {
            max_line_cells: at_least("limits.max_line_cells", f.limits.max_line_cells, 1),
            max_lines: at_least("limits.max_lines", f.limits.max_lines, 1),
            max_chars: f.limits.max_chars,
            blink: f.cursor.blink,
            blink_interval: Duration::from_millis(at_least(
                "cursor.blink_interval_ms",
                f.cursor.blink_interval_ms,
                MIN_BLINK_INTERVAL_MS,
            )),
            wheel_lines: at_least("scroll.wheel_lines", f.scroll.wheel_lines, 1),
            clipboard_units: f.clipboard.max_units,
        }
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Config::default().effective()
    }
}
