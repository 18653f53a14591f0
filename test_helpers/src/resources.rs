//! Temporary directories of message resource files.

use std::fs;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A temporary directory holding `.properties` resources.
///
/// The directory and its files are removed when the tree drops.
///
/// ```
/// use test_helpers::resources::ResourceTree;
///
/// let tree = ResourceTree::new()?
///     .with_file("common/messages_en.properties", "greeting = Hi\n")?;
/// assert_eq!(tree.read("common/messages_en.properties")?, "greeting = Hi\n");
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct ResourceTree {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl ResourceTree {
    /// Creates an empty tree.
    ///
    /// # Errors
    ///
    /// Fails when the temporary directory cannot be created or its path is
    /// not UTF-8.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create resource directory")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow!("non UTF-8 temporary path: {}", path.display()))?;
        Ok(Self { _dir: dir, root })
    }

    /// Writes `contents` to `relative`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written.
    pub fn write(&self, relative: &str, contents: &str) -> Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {path}"))
    }

    /// Builder form of [`Self::write`].
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written.
    pub fn with_file(self, relative: &str, contents: &str) -> Result<Self> {
        self.write(relative, contents)?;
        Ok(self)
    }

    /// Reads `relative` back as text.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read.
    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.root.join(relative);
        fs::read_to_string(&path).with_context(|| format!("read {path}"))
    }

    /// Removes `relative`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be removed.
    pub fn remove(&self, relative: &str) -> Result<()> {
        let path = self.root.join(relative);
        fs::remove_file(&path).with_context(|| format!("remove {path}"))
    }

    /// Root directory of the tree.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}
