use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// The error type for reading, patching and backing up game settings files.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not locate the game's settings file")]
    ConfigPathUnresolved,

    #[error("Settings file not found: {path:?}")]
    ConfigNotFound { path: PathBuf },

    #[error("Preset contains no settings")]
    EmptyPreset,

    #[error("Preset is missing required settings: {keys:?}")]
    MissingRequired { keys: Vec<String> },

    #[error("Setting {key:?} cannot be written: quotes and line breaks are not allowed in keys or values")]
    UnwritableSetting { key: String },

    #[error("Malformed settings file {path:?}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("Failed to {action} {path:?}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to modify settings without a backup: {source}")]
    BackupFailed {
        #[source]
        source: Box<SettingsError>,
    },

    #[error("Backup file not found: {path:?}")]
    BackupNotFound { path: PathBuf },

    #[error("Invalid preset {origin}: {source}")]
    PresetParse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SettingsError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SettingsError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Validation failures never touch the file or create a backup
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            SettingsError::EmptyPreset
                | SettingsError::MissingRequired { .. }
                | SettingsError::UnwritableSetting { .. }
        )
    }
}
