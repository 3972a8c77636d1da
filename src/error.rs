use thiserror::Error;

/// Errors for the Inventa Chat host.
#[derive(Error, Debug)]
pub enum AppError {
    /// A generic error.
    #[error("An error occurred: {0}")]
    GenericError(String),

    /// An I/O operation failed.
    #[error("An I/O operation failed: {0}")]
    IOError(std::io::Error),

    /// An error occurred with Tauri.
    #[error("An error occurred with tauri: {0}")]
    TauriError(tauri::Error),

    /// An error occurred while serializing/deserializing YAML.
    #[error("YAML error: {0}")]
    YamlError(serde_yaml::Error),

    /// The window configuration can't be used to open a window.
    #[error("Invalid window configuration: {0}")]
    InvalidWindowConfig(String),
}
