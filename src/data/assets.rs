use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tracing::debug;

use crate::data::DataFileLoader;
use crate::data::object_path::ObjectPath;
use crate::data_asset::types::Component;
use crate::error::ErrorKind;

/// A parsed asset file: the flat array of records the exporter writes per package.
#[derive(Debug)]
pub struct AssetFile {
    path: String,
    records: Vec<Component>,
}

impl AssetFile {
    pub fn new(path: impl Into<String>, records: Vec<Component>) -> Self {
        AssetFile {
            path: path.into(),
            records,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn records(&self) -> &[Component] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Result<&Component, ErrorKind> {
        self.records
            .get(index)
            .ok_or_else(|| ErrorKind::IndexOutOfRange {
                path: self.path.clone(),
                index,
                len: self.records.len(),
            })
    }
}

/// A resolved [`ObjectPath`]: the loaded file plus the index of the record in it.
#[derive(Debug, Clone)]
pub struct Resolved {
    file: Arc<AssetFile>,
    index: usize,
}

impl Resolved {
    pub fn file(&self) -> &Arc<AssetFile> {
        &self.file
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn record(&self) -> &Component {
        // `resolve` only builds a `Resolved` after checking the index.
        &self.file.records[self.index]
    }
}

/// `AssetResolver` loads the asset files that object paths point into, parsing
/// each file at most once per run. Cached files are shared read-only, so rows
/// can be resolved from several threads.
pub struct AssetResolver<L> {
    loader: L,
    files: RwLock<HashMap<String, Arc<AssetFile>>>,
}

impl<L: DataFileLoader> AssetResolver<L> {
    pub fn new(loader: L) -> Self {
        AssetResolver {
            loader,
            files: Default::default(),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Load `<path>.json`, reusing the cached parse when the file was seen before.
    pub fn file(&self, path: &str) -> Result<Arc<AssetFile>, ErrorKind> {
        if let Some(file) = self.read_cache().get(path) {
            return Ok(Arc::clone(file));
        }

        let file_name = format!("{path}.json");
        debug!("loading asset file {file_name}");
        let data = self.loader.get(&file_name)?;
        let records: Vec<Component> = serde_json::from_slice(&data)?;
        let file = Arc::new(AssetFile::new(file_name, records));

        // Another thread may have loaded the same file meanwhile; keep the first.
        let mut files = self
            .files
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(Arc::clone(files.entry(path.to_string()).or_insert(file)))
    }

    /// Resolve an object path to the record it names.
    pub fn resolve(&self, reference: &ObjectPath) -> Result<Resolved, ErrorKind> {
        let file = self.file(reference.path())?;
        file.get(reference.index())?;

        Ok(Resolved {
            file,
            index: reference.index(),
        })
    }

    /// Number of distinct files parsed so far.
    pub fn cached_files(&self) -> usize {
        self.read_cache().len()
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<AssetFile>>> {
        self.files
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod test {
    use std::borrow::Cow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::data::DataFileWithCallback;
    use crate::data_asset::types::ComponentKind;

    const CLASS_FILE: &str = r#"[
        { "Type": "BlueprintGeneratedClass", "Name": "Bongo_C",
          "ClassDefaultObject": { "ObjectPath": "Cars/Bongo.1" } },
        { "Type": "Bongo_C", "Name": "Default__Bongo_C", "Properties": { "AirDragCoeff": 0.4 } }
    ]"#;

    fn counting_resolver(
        reads: &AtomicUsize,
    ) -> AssetResolver<impl DataFileLoader + '_> {
        AssetResolver::new(DataFileWithCallback::new(move |path: &str| {
            reads.fetch_add(1, Ordering::SeqCst);
            match path {
                "Cars/Bongo.json" => Ok(Cow::Borrowed(CLASS_FILE.as_bytes())),
                _ => Err(ErrorKind::MissingFile {
                    path: path.to_string(),
                }),
            }
        }))
    }

    #[test]
    fn files_are_read_once() {
        let reads = AtomicUsize::new(0);
        let resolver = counting_resolver(&reads);

        let class = resolver.resolve(&ObjectPath::new("Cars/Bongo", 0)).unwrap();
        let ComponentKind::Class(cdo_path) = &class.record().kind else {
            panic!("expected a class record, got {:?}", class.record().kind);
        };
        let cdo = resolver.resolve(cdo_path).unwrap();

        assert_eq!(cdo.record().properties.air_drag_coeff, Some(0.4));
        assert!(Arc::ptr_eq(class.file(), cdo.file()));
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.cached_files(), 1);
    }

    #[test]
    fn reports_missing_files_and_bad_indices() {
        let reads = AtomicUsize::new(0);
        let resolver = counting_resolver(&reads);

        assert!(matches!(
            resolver.resolve(&ObjectPath::new("Cars/Missing", 0)),
            Err(ErrorKind::MissingFile { .. })
        ));
        assert!(matches!(
            resolver.resolve(&ObjectPath::new("Cars/Bongo", 7)),
            Err(ErrorKind::IndexOutOfRange { index: 7, len: 2, .. })
        ));
    }
}
