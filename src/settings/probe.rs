//! Install-location probes, tried in order until one finds a directory

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Environment variable overriding the Steam install location
pub const STEAM_PATH_ENV: &str = "KATANA_STEAM_PATH";

/// One way of locating an installation directory
pub trait ProbeStrategy: fmt::Debug {
    fn name(&self) -> &str;

    /// An existing directory, or `None`
    fn probe(&self) -> Option<PathBuf>;
}

/// Reads a variable from some environment
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<OsString> + Send + Sync>;

/// Directory named by an environment variable
#[derive(Clone)]
pub struct EnvVarProbe {
    var: String,
    lookup: EnvLookup,
}

impl EnvVarProbe {
    /// Read `var` from the process environment
    pub fn new(var: impl Into<String>) -> Self {
        Self::with_lookup(var, Arc::new(|name: &str| std::env::var_os(name)))
    }

    /// Read `var` through `lookup` instead of the process environment
    pub fn with_lookup(var: impl Into<String>, lookup: EnvLookup) -> Self {
        Self {
            var: var.into(),
            lookup,
        }
    }
}

impl fmt::Debug for EnvVarProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarProbe").field("var", &self.var).finish_non_exhaustive()
    }
}

impl ProbeStrategy for EnvVarProbe {
    fn name(&self) -> &str {
        &self.var
    }

    fn probe(&self) -> Option<PathBuf> {
        let path = PathBuf::from((self.lookup)(&self.var)?);
        path.is_dir().then_some(path)
    }
}

/// Subdirectories of the user's home directory
#[derive(Debug, Clone)]
pub struct HomeRelativeProbe {
    home: Option<PathBuf>,
    candidates: Vec<PathBuf>,
}

impl HomeRelativeProbe {
    pub fn new(candidates: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            home: dirs::home_dir(),
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// Use an explicit home directory instead of the current user's
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }
}

impl ProbeStrategy for HomeRelativeProbe {
    fn name(&self) -> &str {
        "home"
    }

    fn probe(&self) -> Option<PathBuf> {
        let home = self.home.as_ref()?;
        self.candidates
            .iter()
            .map(|c| home.join(c))
            .find(|p| p.is_dir())
    }
}

/// Fixed absolute install directories
#[derive(Debug, Clone)]
pub struct FixedPathProbe {
    paths: Vec<PathBuf>,
}

impl FixedPathProbe {
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl ProbeStrategy for FixedPathProbe {
    fn name(&self) -> &str {
        "fixed"
    }

    fn probe(&self) -> Option<PathBuf> {
        self.paths.iter().find(|p| p.is_dir()).cloned()
    }
}

/// Default probes for a Steam installation on Linux, macOS and Windows
pub fn steam_probes() -> Vec<Box<dyn ProbeStrategy>> {
    vec![
        Box::new(EnvVarProbe::new(STEAM_PATH_ENV)),
        Box::new(HomeRelativeProbe::new([
            ".steam/steam",
            ".local/share/Steam",
            "Library/Application Support/Steam",
        ])),
        Box::new(FixedPathProbe::new([
            "C:/Program Files (x86)/Steam",
            "C:/Program Files/Steam",
            "D:/Program Files (x86)/Steam",
            "D:/Program Files/Steam",
        ])),
    ]
}

/// First directory found by the probes, in order
pub fn first_match(probes: &[Box<dyn ProbeStrategy>]) -> Option<PathBuf> {
    probes.iter().find_map(|probe| {
        let found = probe.probe();
        match &found {
            Some(path) => log::debug!("🔍 Probe '{}' found {}", probe.name(), path.display()),
            None => log::debug!("🔍 Probe '{}' found nothing", probe.name()),
        }
        found
    })
}
