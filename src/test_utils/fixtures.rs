use std::path::{Path, PathBuf};

use git2::Repository;
use tempfile::TempDir;

use crate::config::Config;
use crate::storage::{Database, NewBook, StoreRepository};
use crate::versioning::{GitCli, StoreLayout, Versioning};

/// Whether a `git` executable is on `PATH`.
#[must_use]
pub fn git_available() -> bool {
    which::which("git").is_ok()
}

/// Isolated store root with a committable identity and a bare mirror
/// registered as `origin`.
pub struct StoreFixture {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub mirror: Option<PathBuf>,
    pub config: Config,
}

impl StoreFixture {
    /// Store with a local bare mirror to publish to.
    #[must_use]
    pub fn new() -> Self {
        let mut fixture = Self::without_remote();
        let mirror = fixture.temp_dir.path().join("mirror.git");
        Repository::init_bare(&mirror).expect("Failed to init bare mirror");
        StoreRepository::open_or_init(&fixture.root, &fixture.config.publish.branch)
            .expect("Failed to open store repository")
            .ensure_remote(&fixture.config.publish.remote, &mirror.to_string_lossy())
            .expect("Failed to add remote");
        println!("[FIXTURE] Mirror: {mirror:?}");
        fixture.mirror = Some(mirror);
        fixture
    }

    /// Store with no remote, so every publish fails.
    #[must_use]
    pub fn without_remote() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join("store");
        let config = Config::default();

        let store = StoreRepository::open_or_init(&root, &config.publish.branch)
            .expect("Failed to init store repository");
        store
            .set_identity("Catalog Tester", "tester@example.com")
            .expect("Failed to set identity");
        store
            .repo()
            .config()
            .and_then(|mut cfg| cfg.set_bool("commit.gpgsign", false))
            .expect("Failed to disable signing");

        Database::open(root.join(&config.store.database))
            .and_then(Database::close)
            .expect("Failed to create catalog");

        println!("[FIXTURE] Store root: {root:?}");
        Self {
            temp_dir,
            root,
            mirror: None,
            config,
        }
    }

    #[must_use]
    pub fn layout(&self) -> StoreLayout {
        StoreLayout::from_config(&self.root, &self.config)
    }

    #[must_use]
    pub fn versioning(&self) -> Versioning<GitCli> {
        Versioning::git(&self.root, &self.config)
    }

    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.layout().database_path()
    }

    #[must_use]
    pub fn open_db(&self) -> Database {
        Database::open(self.database_path()).expect("Failed to open catalog")
    }

    /// Add books titled `titles`, each by its own author. Returns the new
    /// book count.
    pub fn add_books(&self, titles: &[&str]) -> u64 {
        let db = self.open_db();
        for (i, title) in titles.iter().enumerate() {
            let author = db
                .find_or_create_author(&format!("Author {title} {i}"))
                .expect("Failed to add author");
            db.add_book(&NewBook::titled(*title), Some(author))
                .expect("Failed to add book");
        }
        let count = db.book_count().expect("Failed to count books");
        db.close().expect("Failed to close catalog");
        count
    }

    /// Titles currently in the catalog, in id order.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        let db = self.open_db();
        let titles = db
            .list_books()
            .expect("Failed to list books")
            .into_iter()
            .map(|book| book.main_title)
            .collect();
        db.close().expect("Failed to close catalog");
        titles
    }

    #[must_use]
    pub fn database_bytes(&self) -> Vec<u8> {
        std::fs::read(self.database_path()).expect("Failed to read catalog")
    }

    /// Write a cover image under the assets directory.
    pub fn write_cover(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let dir = self.layout().assets_path();
        std::fs::create_dir_all(&dir).expect("Failed to create assets dir");
        let path = dir.join(name);
        std::fs::write(&path, bytes).expect("Failed to write cover");
        path
    }

    /// Branch head of the mirror, if anything has been published.
    #[must_use]
    pub fn mirror_head(&self) -> Option<String> {
        let mirror = Repository::open_bare(self.mirror.as_deref()?).ok()?;
        let reference = mirror
            .find_reference(&format!("refs/heads/{}", self.config.publish.branch))
            .ok()?;
        reference.target().map(|oid| oid.to_string())
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for StoreFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StoreFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.temp_dir.path());
    }
}
