use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SfwrError};
use crate::versioning::DEFAULT_MARKER;

/// File name of the per-store config file.
pub const PROJECT_CONFIG_FILE: &str = "sfwr.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub git: GitConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SFWR_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("sfwr/config.toml"))
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&root.join(PROJECT_CONFIG_FILE))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| SfwrError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| SfwrError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.store {
            self.store.merge(patch);
        }
        if let Some(patch) = patch.checkpoint {
            self.checkpoint.merge(patch);
        }
        if let Some(patch) = patch.publish {
            self.publish.merge(patch);
        }
        if let Some(patch) = patch.git {
            self.git.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("SFWR_STORE_DATABASE") {
            self.store.database = value;
        }
        if let Some(value) = env_string("SFWR_STORE_ASSETS") {
            self.store.assets = value;
        }

        if let Some(value) = env_string("SFWR_CHECKPOINT_MARKER") {
            self.checkpoint.marker = value;
        }
        if let Some(value) = env_usize("SFWR_CHECKPOINT_HISTORY_LIMIT")? {
            self.checkpoint.history_limit = value;
        }

        if let Some(value) = env_string("SFWR_PUBLISH_REMOTE") {
            self.publish.remote = value;
        }
        if let Some(value) = env_string("SFWR_PUBLISH_BRANCH") {
            self.publish.branch = value;
        }

        if let Some(value) = env_string("SFWR_GIT_BIN") {
            self.git.binary = value;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.store.database.trim().is_empty() {
            return Err(SfwrError::Config("store.database must not be empty".to_string()));
        }
        if Path::new(&self.store.database).is_absolute() || Path::new(&self.store.assets).is_absolute() {
            return Err(SfwrError::Config(
                "store paths must be relative to the store root".to_string(),
            ));
        }
        if self.checkpoint.marker.trim().is_empty() {
            return Err(SfwrError::Config("checkpoint.marker must not be empty".to_string()));
        }
        if self.checkpoint.history_limit == 0 {
            return Err(SfwrError::Config(
                "checkpoint.history_limit must be at least 1".to_string(),
            ));
        }
        if self.publish.remote.trim().is_empty() || self.publish.branch.trim().is_empty() {
            return Err(SfwrError::Config(
                "publish.remote and publish.branch must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file, relative to the store root.
    #[serde(default = "default_database")]
    pub database: String,
    /// Cover image directory, relative to the store root.
    #[serde(default = "default_assets")]
    pub assets: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            assets: default_assets(),
        }
    }
}

impl StoreConfig {
    fn merge(&mut self, patch: StorePatch) {
        if let Some(value) = patch.database {
            self.database = value;
        }
        if let Some(value) = patch.assets {
            self.assets = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            history_limit: default_history_limit(),
        }
    }
}

impl CheckpointConfig {
    fn merge(&mut self, patch: CheckpointPatch) {
        if let Some(value) = patch.marker {
            self.marker = value;
        }
        if let Some(value) = patch.history_limit {
            self.history_limit = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default = "default_remote")]
    pub remote: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            branch: default_branch(),
        }
    }
}

impl PublishConfig {
    fn merge(&mut self, patch: PublishPatch) {
        if let Some(value) = patch.remote {
            self.remote = value;
        }
        if let Some(value) = patch.branch {
            self.branch = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    #[serde(default = "default_git_binary")]
    pub binary: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: default_git_binary(),
        }
    }
}

impl GitConfig {
    fn merge(&mut self, patch: GitPatch) {
        if let Some(value) = patch.binary {
            self.binary = value;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    store: Option<StorePatch>,
    checkpoint: Option<CheckpointPatch>,
    publish: Option<PublishPatch>,
    git: Option<GitPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StorePatch {
    database: Option<String>,
    assets: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CheckpointPatch {
    marker: Option<String>,
    history_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct PublishPatch {
    remote: Option<String>,
    branch: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GitPatch {
    binary: Option<String>,
}

fn default_database() -> String {
    "sfwr_database.db".to_string()
}

fn default_assets() -> String {
    "saved_cover_images".to_string()
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

const fn default_history_limit() -> usize {
    20
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_git_binary() -> String {
    "git".to_string()
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value.trim().parse::<usize>().map(Some).map_err(|err| {
            SfwrError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}
