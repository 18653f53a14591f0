//! Resource store over a capability-scoped directory.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use super::{MessageMap, ResourceStore, properties};
use crate::ResourceError;

/// Resource store reading `.properties`-style documents below a root
/// directory.
///
/// Resource identifiers are paths relative to the root, for example
/// `i18n/common/messages_zh_CN.properties`. Access is confined to the root
/// through `cap-std`, so identifiers cannot escape it with `..` or absolute
/// paths. Writes go to a sibling temporary file that is then renamed over
/// the target, so readers never see a half-written document.
pub struct DirResourceStore {
    root: Utf8PathBuf,
    dir: Dir,
}

impl DirResourceStore {
    /// Opens the store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when the directory cannot be opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> Result<Self, ResourceError> {
        let root_path = root.as_ref();
        let dir = Dir::open_ambient_dir(root_path, ambient_authority())
            .map_err(|cause| ResourceError::io(root_path, cause))?;
        Ok(Self {
            root: root_path.to_owned(),
            dir,
        })
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl ResourceStore for DirResourceStore {
    fn load(&self, resource: &str) -> Result<MessageMap, ResourceError> {
        let text = self
            .dir
            .read_to_string(resource)
            .map_err(|cause| ResourceError::io(Utf8Path::new(resource), cause))?;
        properties::parse(resource, &text)
    }

    fn write(&self, resource: &str, messages: &MessageMap) -> Result<(), ResourceError> {
        let target = Utf8Path::new(resource);
        if let Some(parent) = target.parent().filter(|parent| !parent.as_str().is_empty()) {
            self.dir
                .create_dir_all(parent)
                .map_err(|cause| ResourceError::io(parent, cause))?;
        }

        let staging = Utf8PathBuf::from(format!("{resource}.tmp"));
        self.dir
            .write(&staging, properties::render(messages))
            .map_err(|cause| ResourceError::io(&staging, cause))?;
        self.dir
            .rename(&staging, &self.dir, target)
            .map_err(|cause| ResourceError::io(target, cause))?;
        tracing::debug!(root = %self.root, resource, "wrote message resource");
        Ok(())
    }
}

impl fmt::Debug for DirResourceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirResourceStore")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
