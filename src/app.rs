use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::{Result, SfwrError};
use crate::storage::Database;
use crate::versioning::{GitCli, RollbackOutcome, StoreLayout, Versioning};

pub struct AppContext {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let root = Self::find_root(cli.root.as_deref())?;
        let config_path = cli
            .config
            .clone()
            .or_else(|| std::env::var_os("SFWR_CONFIG").map(PathBuf::from))
            .unwrap_or_else(|| root.join(PROJECT_CONFIG_FILE));
        let config = Config::load(cli.config.as_deref(), &root)?;

        Ok(Self {
            root,
            config_path,
            config,
            output_format: cli.output_format(),
        })
    }

    fn find_root(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(root) = explicit {
            return Ok(root.to_path_buf());
        }
        if let Ok(root) = std::env::var("SFWR_ROOT") {
            return Ok(PathBuf::from(root));
        }
        std::env::current_dir()
            .map_err(|err| SfwrError::MissingConfig(format!("store root not found: {err}")))
    }

    pub fn layout(&self) -> StoreLayout {
        StoreLayout::from_config(&self.root, &self.config)
    }

    pub fn versioning(&self) -> Versioning<GitCli> {
        Versioning::git(&self.root, &self.config)
    }

    /// Open the catalog, failing if it has not been created yet.
    pub fn open_catalog(&self) -> Result<Database> {
        let path = self.layout().database_path();
        if !path.exists() {
            return Err(SfwrError::MissingConfig(format!(
                "catalog database {} not found (run `sfwr init` first)",
                path.display()
            )));
        }
        Database::open(path)
    }
}

/// Roll the catalog back to `target`, managing the handle around it.
///
/// The open handle is closed before the database file is replaced and a fresh
/// one is opened afterwards. On failure the file is untouched and the caller
/// may reopen it with [`Database::open`].
pub fn rollback_catalog(
    versioning: &Versioning<impl crate::versioning::VersionControlBackend>,
    db: Database,
    target: &str,
) -> Result<(Database, RollbackOutcome)> {
    let path = db.path().to_path_buf();
    db.close()?;
    let outcome = versioning.rollback(target)?;
    let reopened = Database::open(&path)?;
    Ok((reopened, outcome))
}
