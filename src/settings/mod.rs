//! Game settings adapter
//!
//! Applies presets to a game's `"key"  "value"` video settings file with
//! backup-protected, idempotent patching. `PresetAdapter` carries the shared
//! algorithm; each game supplies its file location and required keys.

pub mod adapter;
pub mod cs2;
pub mod document;
pub mod error;
pub mod preset;
pub mod probe;


pub use adapter::{ApplyOutcome, PresetAdapter, backup_path_for, backup_timestamp};
pub use cs2::Cs2PresetAdapter;
pub use document::{Change, ConfigDocument};
pub use error::{SettingsError, SettingsResult};
pub use preset::{Preset, PresetValue};
pub use probe::{ProbeStrategy, steam_probes};
