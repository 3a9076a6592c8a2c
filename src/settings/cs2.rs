//! Counter-Strike 2 video settings adapter

use super::{
    adapter::PresetAdapter,
    preset::Preset,
    probe::{self, ProbeStrategy},
};
use std::fs;
use std::path::{Path, PathBuf};

/// Steam app id of CS2
pub const CS2_APP_ID: &str = "730";

/// File names CS2 has used for its video settings, most recent first
pub const CONFIG_FILE_NAMES: [&str; 3] = ["cs2_video.txt", "video.cfg", "video.txt"];

pub const REQUIRED_KEYS: [&str; 2] = ["setting.defaultres", "setting.defaultresheight"];

/// Names accepted by [`Cs2PresetAdapter::builtin_preset`]
pub const BUILTIN_PRESETS: [&str; 3] = ["low", "medium", "high"];

/// `userdata/<user>/730/local/cfg`
fn cfg_dir(user_dir: &Path) -> PathBuf {
    user_dir.join(CS2_APP_ID).join("local").join("cfg")
}

/// Locate the video settings file under a Steam root
///
/// Prefers an existing file, then a user whose cfg directory exists, then
/// creates the cfg directory for the first user. User directories are
/// visited in name order.
pub fn locate_config_in(steam_root: &Path) -> Option<PathBuf> {
    let userdata = steam_root.join("userdata");
    let Ok(entries) = fs::read_dir(&userdata) else {
        log::warn!("⚠️ Steam userdata directory not found: {}", userdata.display());
        return None;
    };

    let mut users: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    users.sort();

    for user in &users {
        let dir = cfg_dir(user);
        if let Some(existing) = CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
        {
            return Some(existing);
        }
        if dir.is_dir() {
            return Some(dir.join(CONFIG_FILE_NAMES[0]));
        }
    }

    let first = users.first()?;
    let dir = cfg_dir(first);
    log::warn!("⚠️ Creating new CS2 config directory structure at {}", dir.display());
    match fs::create_dir_all(&dir) {
        Ok(()) => Some(dir.join(CONFIG_FILE_NAMES[0])),
        Err(e) => {
            log::error!("❌ Could not create {}: {e}", dir.display());
            None
        }
    }
}

/// Resolve the CS2 settings file via the given Steam-root probes
pub fn resolve_config_path(probes: &[Box<dyn ProbeStrategy>]) -> Option<PathBuf> {
    let Some(steam_root) = probe::first_match(probes) else {
        log::warn!("⚠️ Could not find Steam path automatically");
        return None;
    };
    locate_config_in(&steam_root)
}

/// Preset adapter for `cs2_video.txt`
#[derive(Debug, Clone)]
pub struct Cs2PresetAdapter {
    config_path: Option<PathBuf>,
}

impl Cs2PresetAdapter {
    /// Use an explicit settings path, or discover it through the default Steam probes
    pub fn new(config_path: Option<PathBuf>) -> Self {
        match config_path {
            Some(path) => Self::resolved(Some(path)),
            None => Self::from_probes(&probe::steam_probes()),
        }
    }

    /// Discover the settings path through the given Steam-root probes only
    pub fn from_probes(probes: &[Box<dyn ProbeStrategy>]) -> Self {
        Self::resolved(resolve_config_path(probes))
    }

    fn resolved(config_path: Option<PathBuf>) -> Self {
        match &config_path {
            Some(path) => log::info!("🎮 CS2 config path: {}", path.display()),
            None => log::warn!("⚠️ CS2 config path not found"),
        }
        Self { config_path }
    }

    pub fn with_config_path(config_path: impl Into<PathBuf>) -> Self {
        Self::new(Some(config_path.into()))
    }

    /// Built-in quality presets at the given resolution
    pub fn builtin_preset(name: &str, width: u32, height: u32) -> Option<Preset> {
        let base = Preset::new()
            .with("setting.defaultres", width)
            .with("setting.defaultresheight", height)
            .with("setting.fullscreen", true)
            .with("setting.mat_vsync", false)
            .with("setting.r_low_latency", 1);

        let preset = match name.to_lowercase().as_str() {
            "low" => base
                .with("name", "Low")
                .with("description", "Lowest quality, CPU-bound measurements")
                .with("setting.msaa_samples", 0)
                .with("setting.r_csgo_cmaa_enable", false)
                .with("setting.videocfg_shadow_quality", 0)
                .with("setting.videocfg_dynamic_shadows", false)
                .with("setting.videocfg_texture_detail", 0)
                .with("setting.r_texturefilteringquality", 0)
                .with("setting.shaderquality", 0)
                .with("setting.videocfg_particle_detail", 0)
                .with("setting.videocfg_ao_detail", 0)
                .with("setting.videocfg_hdr_detail", 3)
                .with("setting.videocfg_fsr_detail", 0),
            "medium" => base
                .with("name", "Medium")
                .with("description", "Balanced quality")
                .with("setting.msaa_samples", 2)
                .with("setting.r_csgo_cmaa_enable", false)
                .with("setting.videocfg_shadow_quality", 1)
                .with("setting.videocfg_dynamic_shadows", true)
                .with("setting.videocfg_texture_detail", 1)
                .with("setting.r_texturefilteringquality", 3)
                .with("setting.shaderquality", 0)
                .with("setting.videocfg_particle_detail", 1)
                .with("setting.videocfg_ao_detail", 1)
                .with("setting.videocfg_hdr_detail", 3)
                .with("setting.videocfg_fsr_detail", 0),
            "high" => base
                .with("name", "High")
                .with("description", "Highest quality, GPU-bound measurements")
                .with("setting.msaa_samples", 8)
                .with("setting.r_csgo_cmaa_enable", false)
                .with("setting.videocfg_shadow_quality", 3)
                .with("setting.videocfg_dynamic_shadows", true)
                .with("setting.videocfg_texture_detail", 2)
                .with("setting.r_texturefilteringquality", 5)
                .with("setting.shaderquality", 1)
                .with("setting.videocfg_particle_detail", 2)
                .with("setting.videocfg_ao_detail", 2)
                .with("setting.videocfg_hdr_detail", -1)
                .with("setting.videocfg_fsr_detail", 0),
            _ => return None,
        };
        Some(preset)
    }
}

impl PresetAdapter for Cs2PresetAdapter {
    fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn required_keys(&self) -> &[&str] {
        &REQUIRED_KEYS
    }

    fn document_header(&self) -> &str {
        "video.cfg"
    }
}
