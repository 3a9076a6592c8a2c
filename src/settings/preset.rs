//! Video settings presets

use super::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Keys that describe a preset rather than configure the game
pub const METADATA_KEYS: [&str; 2] = ["name", "description"];

/// Characters that would end a quoted token or its line
const UNQUOTABLE: [char; 3] = ['"', '\r', '\n'];

/// Value of a single setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PresetValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PresetValue {
    /// Text written to the settings file; booleans become "1"/"0"
    pub fn to_setting_string(&self) -> String {
        match self {
            PresetValue::Bool(true) => "1".to_string(),
            PresetValue::Bool(false) => "0".to_string(),
            PresetValue::Int(v) => v.to_string(),
            PresetValue::Float(v) => v.to_string(),
            PresetValue::Text(v) => v.clone(),
        }
    }
}

impl fmt::Display for PresetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_setting_string())
    }
}

impl From<bool> for PresetValue {
    fn from(v: bool) -> Self {
        PresetValue::Bool(v)
    }
}

impl From<i64> for PresetValue {
    fn from(v: i64) -> Self {
        PresetValue::Int(v)
    }
}

impl From<i32> for PresetValue {
    fn from(v: i32) -> Self {
        PresetValue::Int(v.into())
    }
}

impl From<u32> for PresetValue {
    fn from(v: u32) -> Self {
        PresetValue::Int(v.into())
    }
}

impl From<f64> for PresetValue {
    fn from(v: f64) -> Self {
        PresetValue::Float(v)
    }
}

impl From<&str> for PresetValue {
    fn from(v: &str) -> Self {
        PresetValue::Text(v.to_string())
    }
}

impl From<String> for PresetValue {
    fn from(v: String) -> Self {
        PresetValue::Text(v)
    }
}

/// Ordered mapping of setting keys to target values
///
/// `name` and `description` entries are kept as metadata and never written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preset {
    entries: Vec<(String, PresetValue)>,
}

impl Preset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PresetValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace a value, keeping first-insertion order
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PresetValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PresetValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn name(&self) -> Option<&str> {
        match self.get("name") {
            Some(PresetValue::Text(name)) => Some(name),
            _ => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self.get("description") {
            Some(PresetValue::Text(description)) => Some(description),
            _ => None,
        }
    }

    pub fn is_metadata_key(key: &str) -> bool {
        METADATA_KEYS.contains(&key)
    }

    /// Entries that are written to the settings file
    pub fn settings(&self) -> impl Iterator<Item = (&str, &PresetValue)> {
        self.entries
            .iter()
            .filter(|(k, _)| !Self::is_metadata_key(k))
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn settings_count(&self) -> usize {
        self.settings().count()
    }

    /// Required keys absent from this preset
    pub fn missing_keys(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|key| !self.contains_key(key))
            .map(|key| key.to_string())
            .collect()
    }

    /// Key of the first setting whose key or value cannot sit inside quotes
    pub fn unwritable_key(&self) -> Option<&str> {
        self.settings()
            .find(|(key, value)| {
                key.contains(UNQUOTABLE) || value.to_setting_string().contains(UNQUOTABLE)
            })
            .map(|(key, _)| key)
    }

    /// Reject empty presets and settings that cannot be written
    pub fn check_writable(&self) -> SettingsResult<()> {
        if self.settings_count() == 0 {
            log::error!("❌ Empty preset data");
            return Err(SettingsError::EmptyPreset);
        }
        if let Some(key) = self.unwritable_key() {
            log::error!("❌ Preset setting {:?} contains a quote or line break", key);
            return Err(SettingsError::UnwritableSetting {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    /// Parse a JSON object of key to bool/number/string
    pub fn from_json(json: &str) -> SettingsResult<Self> {
        Self::parse_json(json, "<inline>")
    }

    /// Load a preset from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::io("read preset", path, e))?;
        Self::parse_json(&json, &path.display().to_string())
    }

    fn parse_json(json: &str, origin: &str) -> SettingsResult<Self> {
        let map: BTreeMap<String, PresetValue> =
            serde_json::from_str(json).map_err(|source| SettingsError::PresetParse {
                origin: origin.to_string(),
                source,
            })?;
        Ok(Self {
            entries: map.into_iter().collect(),
        })
    }
}

impl<K: Into<String>, V: Into<PresetValue>> FromIterator<(K, V)> for Preset {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut preset = Preset::new();
        for (k, v) in iter {
            preset.set(k, v);
        }
        preset
    }
}
