//! Configuration loading and parsing.
//!
//! Parses `eider.toml` (or an override path provided by the binary). Every
//! section and field is optional; unknown fields are ignored so older
//! binaries tolerate newer files. A missing or unparsable file yields the
//! defaults.
//!
//! ```toml
//! [editor]
//! tab_width = 2
//! expand_tab = true
//!
//! [theme]
//! name = "base16-ocean.dark"
//! path = "themes/custom.tmTheme"
//!
//! [load]
//! log_every = 0
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

/// Largest indent `<Tab>` may insert.
pub const MAX_TAB_WIDTH: usize = 16;

#[derive(Debug, Deserialize, Clone)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_width")]
    pub tab_width: usize,
    #[serde(default = "EditorConfig::default_expand_tab")]
    pub expand_tab: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
            expand_tab: Self::default_expand_tab(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_width() -> usize {
        2
    }
    const fn default_expand_tab() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeConfig {
    /// Name of a bundled theme.
    #[serde(default = "ThemeConfig::default_name")]
    pub name: String,
    /// `.tmTheme` file; takes precedence over `name` when set.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            path: None,
        }
    }
}

impl ThemeConfig {
    pub const DEFAULT_NAME: &'static str = "base16-ocean.dark";

    fn default_name() -> String {
        Self::DEFAULT_NAME.to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoadConfig {
    /// Debug-log load progress every N lines; 0 disables.
    #[serde(default)]
    pub log_every: usize,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub effective_tab_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(None, ConfigFile::default())
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("eider.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("eider").join("eider.toml");
    }
    PathBuf::from("eider.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config::from_file(Some(content), file))
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    fn from_file(raw: Option<String>, file: ConfigFile) -> Self {
        let requested = file.editor.tab_width;
        let effective_tab_width = requested.clamp(1, MAX_TAB_WIDTH);
        if effective_tab_width != requested {
            info!(
                target: "config",
                requested,
                clamped = effective_tab_width,
                max = MAX_TAB_WIDTH,
                "tab_width_clamped"
            );
        }
        Self {
            raw,
            file,
            effective_tab_width,
        }
    }

    /// Text inserted by `<Tab>` in Insert mode.
    pub fn indent_unit(&self) -> String {
        if self.file.editor.expand_tab {
            " ".repeat(self.effective_tab_width)
        } else {
            "\t".to_string()
        }
    }
}
