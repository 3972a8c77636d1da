use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::AppError;

/// The file name of the optional config file in the app config directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Config for the Inventa Chat host.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct HostConfig {
    /// The main window.
    #[serde(rename = "window", default)]
    pub window: WindowConfig,

    /// macOS specific application behavior.
    #[serde(rename = "mac", default)]
    pub mac: MacConfig,
}

/// Config for the main window.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// The window title.
    #[serde(rename = "title", default = "title_default")]
    pub title: String,

    /// The inner width of the window, in logical pixels.
    #[serde(rename = "width", default = "width_default")]
    pub width: f64,

    /// The inner height of the window, in logical pixels.
    #[serde(rename = "height", default = "height_default")]
    pub height: f64,

    /// The path within the asset bundle the window loads.
    #[serde(rename = "url", default = "url_default")]
    pub url: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: title_default(),
            width: width_default(),
            height: height_default(),
            url: url_default(),
        }
    }
}

fn title_default() -> String {
    "Inventa Chat".to_string()
}

fn width_default() -> f64 {
    1200.0
}

fn height_default() -> f64 {
    800.0
}

fn url_default() -> String {
    "/".to_string()
}

/// macOS application behavior.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MacConfig {
    /// Quit the app once the last window has been closed.
    #[serde(
        rename = "terminateAfterLastWindowClosed",
        default = "terminate_after_last_window_closed_default"
    )]
    pub terminate_after_last_window_closed: bool,
}

impl Default for MacConfig {
    fn default() -> Self {
        Self {
            terminate_after_last_window_closed: terminate_after_last_window_closed_default(),
        }
    }
}

fn terminate_after_last_window_closed_default() -> bool {
    true
}

impl WindowConfig {
    /// Checks that a window can be opened with this config.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidWindowConfig(
                "title must not be empty".to_string(),
            ));
        }

        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value < 1.0 {
                return Err(AppError::InvalidWindowConfig(format!(
                    "{name} must be a finite number of at least 1, got {value}"
                )));
            }
        }

        if !self.url.starts_with('/') {
            return Err(AppError::InvalidWindowConfig(format!(
                "url must be an absolute path within the app, got '{}'",
                self.url
            )));
        }

        Ok(())
    }
}

impl HostConfig {
    /// Parses and validates a config from YAML.
    pub fn from_yaml(contents: &str) -> Result<Self, AppError> {
        // An empty file deserializes to `null`, which should mean "all defaults".
        let config = if contents.trim().is_empty() {
            HostConfig::default()
        } else {
            serde_yaml::from_str::<HostConfig>(contents).map_err(|e| AppError::YamlError(e))?
        };

        config.window.validate()?;

        Ok(config)
    }

    /// Loads the config from `config_dir`.
    ///
    /// Falls back to the defaults when the config file doesn't exist.
    ///
    /// # Arguments
    ///
    /// * `config_dir` - The app config directory.
    pub fn load(config_dir: &Path) -> Result<Self, AppError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");

            return Ok(HostConfig::default());
        }

        tracing::info!(path = %config_path.display(), "loading config");
        let contents = fs::read_to_string(&config_path).map_err(|e| AppError::IOError(e))?;

        Self::from_yaml(&contents)
    }
}
