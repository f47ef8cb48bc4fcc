/// Memoized loading of exported asset files and resolution of object paths
pub mod assets;
/// Typed `"<path>.<index>"` references between asset files
pub mod object_path;
/// `DataTable` exports (`[{ "Rows": { ... } }]`)
pub mod table;

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ErrorKind;

/// Source of raw file bytes addressed by a path relative to the export root.
pub trait DataFileLoader {
    fn get(&self, path: &str) -> Result<Cow<'static, [u8]>, ErrorKind>;
}

/// Reads files from an exported content tree on disk.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        DirectoryLoader {
            root: root.as_ref().into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DataFileLoader for DirectoryLoader {
    fn get(&self, path: &str) -> Result<Cow<'static, [u8]>, ErrorKind> {
        // Object paths are written with a leading slash in some exports.
        let full_path = self.root.join(path.trim_start_matches('/'));
        debug!("reading {}", full_path.display());

        if !full_path.is_file() {
            return Err(ErrorKind::MissingFile {
                path: full_path.display().to_string(),
            });
        }

        Ok(Cow::Owned(std::fs::read(full_path)?))
    }
}

pub struct DataFileWithCallback<F> {
    callback: F,
}

impl<F> DataFileWithCallback<F>
where
    F: Fn(&str) -> Result<Cow<'static, [u8]>, ErrorKind>,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> DataFileLoader for DataFileWithCallback<F>
where
    F: Fn(&str) -> Result<Cow<'static, [u8]>, ErrorKind>,
{
    fn get(&self, path: &str) -> Result<Cow<'static, [u8]>, ErrorKind> {
        (self.callback)(path)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn directory_loader_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("present.json"), b"[]").unwrap();

        let loader = DirectoryLoader::new(dir.path());
        assert_eq!(&*loader.get("/present.json").unwrap(), b"[]");
        assert!(matches!(
            loader.get("absent.json"),
            Err(ErrorKind::MissingFile { .. })
        ));
    }
}
