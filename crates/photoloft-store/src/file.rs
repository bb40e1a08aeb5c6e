//! JSON file persistence for non-secret state such as the current session.

use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use photoloft_core::ports::ObjectPersistence;

/// Stores the item as pretty-printed JSON at a fixed path.
///
/// A missing file means "no item"; an unreadable or unparseable file is
/// treated the same way after a warning, so a corrupted session file leads
/// to a fresh login instead of a hard failure.
pub struct JsonFilePersistence<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFilePersistence<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl<T> ObjectPersistence<T> for JsonFilePersistence<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn has_item(&self) -> bool {
        self.path.is_file()
    }

    fn load_item(&self) -> anyhow::Result<Option<T>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(item) => Ok(Some(item)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "stored item is unreadable, ignoring it");
                Ok(None)
            }
        }
    }

    fn save_item(&self, item: &T) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(item)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
