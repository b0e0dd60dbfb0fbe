//! Tool configuration (`main.yaml`).
//!
//! Looked up at, in order: the `--config` flag, `$CFTOOL_CONFIG`, then
//! `$HOME/.config/cftool/main.yaml`. A missing default file is fine; a
//! missing file the user pointed at is not.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::utils::file_io::read_file;

pub const CONFIG_ENV_VAR: &str = "CFTOOL_CONFIG";
pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Named credentials profile
    pub profile: String,
    pub region: String,
    /// Resource specification JSON file
    pub specification: Option<PathBuf>,
    /// Directory holding one `<region>.json` specification per region
    pub specification_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: DEFAULT_PROFILE.to_string(),
            region: DEFAULT_REGION.to_string(),
            specification: None,
            specification_dir: None,
        }
    }
}

/// Values given on the command line, taking precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub specification: Option<PathBuf>,
}

/// Where a configuration file came from. Decides whether a missing file is
/// an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Default(PathBuf),
}

impl ConfigSource {
    /// Pick the file to read.
    ///
    /// Takes the environment values as arguments so callers (and tests)
    /// decide where they come from.
    pub fn resolve(
        explicit: Option<&Path>,
        env_path: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Option<Self> {
        if let Some(path) = explicit {
            return Some(ConfigSource::Explicit(path.to_path_buf()));
        }
        if let Some(path) = env_path.filter(|p| !p.as_os_str().is_empty()) {
            return Some(ConfigSource::Explicit(path));
        }
        home.map(|home| ConfigSource::Default(home.join(".config").join("cftool").join("main.yaml")))
    }

    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::Default(path) => path,
        }
    }
}

impl Config {
    /// Load configuration using the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let home = env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .map(PathBuf::from);
        let env_path = env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        Self::load_from(ConfigSource::resolve(explicit, env_path, home))
    }

    pub fn load_from(source: Option<ConfigSource>) -> Result<Self> {
        let Some(source) = source else {
            tracing::debug!("No configuration location, using defaults");
            return Ok(Self::default());
        };

        let path = source.path();
        if !path.exists() {
            if let ConfigSource::Explicit(_) = source {
                bail!("Configuration file not found: {}", path.display());
            }
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = read_file(path)?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse `main.yaml` content. An empty file yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(profile) = overrides.profile {
            self.profile = profile;
        }
        if let Some(region) = overrides.region {
            self.region = region;
        }
        if let Some(specification) = overrides.specification {
            self.specification = Some(specification);
        }
    }

    /// Resource specification to validate against, if one is configured.
    pub fn specification_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.specification {
            return Some(path.clone());
        }
        self.specification_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", self.region)))
    }
}
