use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::clock::Timezone;
use crate::error::{Error, ErrorKind, Result};
use crate::gesture::DEFAULT_LONG_PRESS_MS;
use crate::hit::PanelGeometry;

const CONFIG_PATH_ENV_VAR: &str = "MONTHGRID_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    let config_dir = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(dirs::config_dir);

    if let Some(dir) = config_dir {
        locations.push(dir.join("monthgrid").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".monthgrid.toml"));
    } else {
        log::warn!("Unable to find home directory");
    }

    locations
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        let (width, height) = PanelGeometry::default().panel_size();
        PanelConfig { width, height }
    }
}

impl PanelConfig {
    pub fn geometry(&self) -> PanelGeometry {
        PanelGeometry::measure(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub today_char: Option<char>,
    pub selected_char: Option<char>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            today_char: Some('*'),
            selected_char: Some('>'),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timezone: Timezone,
    pub long_press_ms: u64,
    pub tick_rate_ms: u64,
    pub panel: PanelConfig,
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timezone: Timezone::default(),
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            tick_rate_ms: 500,
            panel: PanelConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl FromStr for Config {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        content.parse().map_err(|err: Error| {
            let msg = format!(
                "{}: {}",
                path.display(),
                err.message.as_deref().unwrap_or_default()
            );
            err.with_msg(&msg)
        })
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

/// Loads `path` if given, otherwise the first config file found in the
/// usual locations, otherwise the defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load(path);
    }

    for location in find_configfile_locations() {
        if !location.is_file() {
            continue;
        }

        match Config::load(&location) {
            Ok(config) => {
                log::info!("using configuration '{}'", location.display());
                return Ok(config);
            }
            Err(Error {
                kind: ErrorKind::IOError(err),
                ..
            }) => log::warn!("could not read '{}': {}", location.display(), err),
            Err(err) => return Err(err),
        }
    }

    log::info!("no configuration file found, using defaults");
    Ok(Config::default())
}
