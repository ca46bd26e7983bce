//! Directory-backed storage.

use std::{
    fmt::Write as _,
    fs,
    io::{self, ErrorKind, Write as _},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{CartStorage, StorageError};

/// Stores each key as `<dir>/<key>.json`.
///
/// Bytes outside `[A-Za-z0-9_-]` are percent-encoded in the file name, so
/// any non-empty key maps onto exactly one file inside `dir`. Writes go to a
/// uniquely named sibling file that is renamed over the target, so a crash
/// or a concurrent writer never leaves a partial document behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();

        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        Ok(self.dir.join(format!("{}.json", file_stem(key)?)))
    }
}

fn file_stem(key: &str) -> Result<String, StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey(key.to_string()));
    }

    let mut stem = String::with_capacity(key.len());

    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            let _infallible = write!(stem, "%{byte:02X}");
        }
    }

    Ok(stem)
}

impl CartStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        let mut staging = NamedTempFile::new_in(&self.dir)?;

        staging.write_all(value.as_bytes())?;
        staging.persist(&path).map_err(io::Error::from)?;

        debug!(path = %path.display(), bytes = value.len(), "wrote cart document");

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn round_trips_documents_through_files() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::open(dir.path().join("carts"))?;

        assert_eq!(storage.get("cart_u1")?, None);

        storage.set("cart_u1", r#"{"items":[]}"#)?;

        assert!(dir.path().join("carts").join("cart_u1.json").exists());
        assert_eq!(storage.get("cart_u1")?.as_deref(), Some(r#"{"items":[]}"#));

        storage.remove("cart_u1")?;

        assert_eq!(storage.get("cart_u1")?, None);

        Ok(())
    }

    #[test]
    fn removing_missing_key_succeeds() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::open(dir.path())?;

        storage.remove("cart")?;

        Ok(())
    }

    #[test]
    fn encodes_unsafe_key_bytes() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::open(dir.path())?;

        storage.set("cart_alice@example.com", "{}")?;
        storage.set("../escape", "{}")?;

        assert!(dir.path().join("cart_alice%40example%2Ecom.json").exists());
        assert!(dir.path().join("%2E%2E%2Fescape.json").exists());
        assert_eq!(storage.get("cart_alice@example.com")?.as_deref(), Some("{}"));

        Ok(())
    }

    #[test]
    fn leaves_no_staging_files_behind() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::open(dir.path())?;

        storage.set("cart", "{}")?;
        storage.set("cart", r#"{"items":[]}"#)?;

        let names = fs::read_dir(dir.path())?
            .map(|entry| entry.map(|entry| entry.file_name().to_string_lossy().into_owned()))
            .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(names, vec!["cart.json"]);
        assert_eq!(storage.get("cart")?.as_deref(), Some(r#"{"items":[]}"#));

        Ok(())
    }

    #[test]
    fn rejects_empty_key() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::open(dir.path())?;

        let result = storage.set("", "{}");

        assert!(
            matches!(result, Err(StorageError::InvalidKey(_))),
            "expected InvalidKey, got {result:?}"
        );

        Ok(())
    }
}
