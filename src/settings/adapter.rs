//! Generic preset adapter: backup, restore and idempotent apply

use super::{
    document::ConfigDocument,
    error::{SettingsError, SettingsResult},
    preset::Preset,
};
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Result of a successful apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The file was written; `changed` settings were updated or inserted
    Applied { changed: usize, unchanged: usize },
    /// Every setting already matched; the file was not touched
    NoChanges { unchanged: usize },
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { .. })
    }
}

/// Current local time as a backup timestamp, falling back to UTC
pub fn backup_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()))
}

/// `YYYYMMDD_HHMMSS`
pub fn format_timestamp(at: OffsetDateTime) -> String {
    format!(
        "{:04}{:02}{:02}_{:02}{:02}{:02}",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second()
    )
}

/// Sibling backup path `<name>.backup_<timestamp>`
pub fn backup_path_for(config: &Path, timestamp: &str) -> PathBuf {
    let name = config
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    config.with_file_name(format!("{name}.backup_{timestamp}"))
}

/// Replace a file's contents via a temporary sibling and a rename
pub fn write_replacing(path: &Path, contents: &str) -> SettingsResult<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = path.with_file_name(format!("{name}.tmp"));

    fs::write(&temp, contents).map_err(|e| SettingsError::io("write", &temp, e))?;
    fs::rename(&temp, path).map_err(|e| {
        let _ = fs::remove_file(&temp);
        SettingsError::io("replace", path, e)
    })
}

/// Contract for a game's settings file
///
/// Implementors locate the file and declare the required keys; backup,
/// restore and the patching algorithm are shared.
pub trait PresetAdapter {
    /// Path of the live settings file, if one could be located
    fn config_path(&self) -> Option<&Path>;

    /// Keys every preset must define
    fn required_keys(&self) -> &[&str] {
        &[]
    }

    /// Quoted header written when creating the file from scratch
    fn document_header(&self) -> &str;

    fn require_config_path(&self) -> SettingsResult<&Path> {
        self.config_path().ok_or(SettingsError::ConfigPathUnresolved)
    }

    /// Check a preset before anything is written
    fn validate(&self, preset: &Preset) -> SettingsResult<()> {
        preset.check_writable()?;

        let missing = preset.missing_keys(self.required_keys());
        if !missing.is_empty() {
            log::error!("❌ Preset is missing required settings: {:?}", missing);
            return Err(SettingsError::MissingRequired { keys: missing });
        }
        Ok(())
    }

    /// Replace the contents of the live file
    fn write_settings(&self, config: &Path, contents: &str) -> SettingsResult<()> {
        write_replacing(config, contents)
    }

    /// Copy the live file to `target`, or to a timestamped sibling
    fn backup(&self, target: Option<&Path>) -> SettingsResult<PathBuf> {
        let config = self.require_config_path()?;
        if !config.is_file() {
            log::error!("❌ Settings file not found: {}", config.display());
            return Err(SettingsError::ConfigNotFound {
                path: config.to_path_buf(),
            });
        }

        let target = match target {
            Some(path) => path.to_path_buf(),
            None => backup_path_for(config, &backup_timestamp()),
        };

        fs::copy(config, &target).map_err(|e| {
            log::error!("❌ Failed to back up settings: {e}");
            SettingsError::io("back up to", &target, e)
        })?;
        log::info!("✅ Backed up settings to: {}", target.display());
        Ok(target)
    }

    /// Copy a backup over the live file
    fn restore(&self, backup: &Path) -> SettingsResult<()> {
        let config = self.require_config_path()?;
        if !backup.exists() {
            log::error!("❌ Backup file not found: {}", backup.display());
            return Err(SettingsError::BackupNotFound {
                path: backup.to_path_buf(),
            });
        }

        fs::copy(backup, config).map_err(|e| {
            log::error!("❌ Failed to restore settings: {e}");
            SettingsError::io("restore", config, e)
        })?;
        log::info!("✅ Restored settings from backup: {}", backup.display());
        Ok(())
    }

    /// Create the settings file from a preset
    fn initialize(&self, preset: &Preset) -> SettingsResult<ApplyOutcome> {
        let config = self.require_config_path()?;
        preset.check_writable()?;

        if let Some(parent) = config.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SettingsError::io("create directory", parent, e))?;
        }

        let doc = ConfigDocument::with_settings(
            self.document_header(),
            preset.settings().map(|(k, v)| (k, v.to_setting_string())),
        );
        self.write_settings(config, &doc.render())?;

        let changed = preset.settings_count();
        log::info!(
            "✅ Created new settings file at {} with {} preset settings",
            config.display(),
            changed
        );
        Ok(ApplyOutcome::Applied {
            changed,
            unchanged: 0,
        })
    }

    /// Apply a preset, writing only when some value differs
    ///
    /// A failure after the backup was taken restores it before the error is returned.
    fn apply_preset(&self, preset: &Preset, backup: bool) -> SettingsResult<ApplyOutcome> {
        let config = self.require_config_path()?;
        if !config.exists() {
            log::warn!("⚠️ Settings file not found: {}", config.display());
            return self.initialize(preset);
        }

        self.validate(preset)?;

        let backup_path = if backup {
            let path = self
                .backup(None)
                .map_err(|source| SettingsError::BackupFailed {
                    source: Box::new(source),
                })?;
            Some(path)
        } else {
            None
        };

        match patch_file(self, config, preset) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                log::error!("❌ Failed to apply preset: {e}");
                if let Some(path) = &backup_path {
                    log::info!("🔄 Attempting to restore backup after failure");
                    if let Err(restore_err) = self.restore(path) {
                        log::error!("❌ Restore after failed apply also failed: {restore_err}");
                    }
                }
                Err(e)
            }
        }
    }
}

/// Read, patch and (only if needed) rewrite a settings file
fn patch_file<A: PresetAdapter + ?Sized>(
    adapter: &A,
    config: &Path,
    preset: &Preset,
) -> SettingsResult<ApplyOutcome> {
    let text = fs::read_to_string(config).map_err(|e| SettingsError::io("read", config, e))?;
    let mut doc = ConfigDocument::parse(&text).map_err(|reason| SettingsError::Malformed {
        path: config.to_path_buf(),
        reason,
    })?;

    let (mut changed, mut unchanged) = (0, 0);
    for (key, value) in preset.settings() {
        if doc.set(key, &value.to_setting_string()).is_change() {
            changed += 1;
        } else {
            unchanged += 1;
        }
    }

    if changed == 0 {
        log::info!(
            "✓ All {} settings already match preset - no changes needed",
            unchanged
        );
        return Ok(ApplyOutcome::NoChanges { unchanged });
    }

    adapter.write_settings(config, &doc.render())?;
    log::info!(
        "✅ Applied preset: {} settings updated, {} already matched",
        changed,
        unchanged
    );
    Ok(ApplyOutcome::Applied { changed, unchanged })
}
