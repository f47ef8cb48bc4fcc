//! Localization tables and display-name resolution.
//!
//! The game ships one `Localization/Game/<lang>/Game.json` per language, each a
//! `namespace -> key -> string` map. Lookups fall back to English and finally to
//! the literal string embedded in the data asset.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::ErrorKind;

use super::keys::{DEFAULT_LANGUAGE, LOCALIZATION_FILE};
use super::types::TextRef;

/// Strings for a single language: namespace -> key -> string.
pub type Catalog = HashMap<String, HashMap<String, String>>;

/// Every loaded language's catalog, keyed by language code.
#[derive(Debug, Clone, Default)]
pub struct LocalizationTable {
    languages: BTreeMap<String, Catalog>,
}

impl LocalizationTable {
    pub fn new(languages: BTreeMap<String, Catalog>) -> Self {
        LocalizationTable { languages }
    }

    /// Load every `<dir>/<lang>/Game.json`.
    ///
    /// A language whose file is absent is skipped; one whose file fails to parse is
    /// logged and left out. Only an unreadable `dir` is an error.
    pub fn load_dir(dir: &Path) -> Result<LocalizationTable, ErrorKind> {
        if !dir.is_dir() {
            return Err(ErrorKind::MissingFile {
                path: dir.display().to_string(),
            });
        }

        let mut languages = BTreeMap::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }

            let lang = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path().join(LOCALIZATION_FILE);
            if !path.is_file() {
                debug!("no {LOCALIZATION_FILE} for {lang}");
                continue;
            }

            let catalog = std::fs::read(&path)
                .map_err(ErrorKind::from)
                .and_then(|data| serde_json::from_slice::<Catalog>(&data).map_err(ErrorKind::from));
            match catalog {
                Ok(catalog) => {
                    debug!("loaded {} namespaces for {lang}", catalog.len());
                    languages.insert(lang, catalog);
                }
                Err(err) => warn!("failed to load localization for {lang}: {err}"),
            }
        }

        Ok(LocalizationTable { languages })
    }

    /// Language codes in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// The loaded languages plus the default language, sorted.
    pub fn requested_languages(&self) -> BTreeSet<&str> {
        self.languages()
            .chain(std::iter::once(DEFAULT_LANGUAGE))
            .collect()
    }

    pub fn catalog(&self, lang: &str) -> Option<&Catalog> {
        self.languages.get(lang)
    }

    /// Look up `namespace`/`key` in `lang` only. Empty strings count as absent.
    pub fn get(&self, lang: &str, namespace: &str, key: &str) -> Option<&str> {
        self.languages
            .get(lang)?
            .get(namespace)?
            .get(key)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Look up `namespace`/`key` in `lang`, falling back to the default language.
    pub fn resolve(&self, namespace: &str, key: &str, lang: &str) -> Option<&str> {
        self.resolve_in(&[namespace], key, lang)
    }

    /// Like [`Self::resolve`], trying each namespace in turn in `lang` before
    /// trying them all again in the default language.
    pub fn resolve_in(&self, namespaces: &[&str], key: &str, lang: &str) -> Option<&str> {
        let lookup = |lang: &str| {
            namespaces
                .iter()
                .find_map(|namespace| self.get(lang, namespace, key))
        };

        lookup(lang).or_else(|| {
            if lang == DEFAULT_LANGUAGE {
                None
            } else {
                lookup(DEFAULT_LANGUAGE)
            }
        })
    }

    /// Union of every key in `namespace` across all languages, sorted.
    pub fn namespace_keys(&self, namespace: &str) -> BTreeSet<&str> {
        self.languages
            .values()
            .filter_map(|catalog| catalog.get(namespace))
            .flat_map(|entries| entries.keys().map(String::as_str))
            .collect()
    }
}

/// Resolves display names made of localizable text fragments.
///
/// `default_namespaces` is used for fragments that carry no namespace of their own.
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    localization: &'a LocalizationTable,
    default_namespaces: &'a [&'a str],
}

impl<'a> NameResolver<'a> {
    pub fn new(localization: &'a LocalizationTable, default_namespaces: &'a [&'a str]) -> Self {
        NameResolver {
            localization,
            default_namespaces,
        }
    }

    pub fn localization(&self) -> &'a LocalizationTable {
        self.localization
    }

    /// Localize one fragment, falling back to its embedded literal.
    pub fn text(&self, text: &TextRef, lang: &str) -> Option<String> {
        let localized = text.key.as_deref().and_then(|key| {
            match text.namespace() {
                "" => self.localization.resolve_in(self.default_namespaces, key, lang),
                namespace => self.localization.resolve(namespace, key, lang),
            }
        });

        if localized.is_none() {
            debug!("no {lang} localization for {:?}", text.key);
        }

        localized.or_else(|| text.literal()).map(str::to_string)
    }

    /// Resolve a name: the fragments localized one by one and space-joined, or when
    /// there are none, the single `name` text.
    pub fn name(&self, fragments: &[TextRef], name: Option<&TextRef>, lang: &str) -> Option<String> {
        if !fragments.is_empty() {
            let joined = fragments
                .iter()
                .filter_map(|text| self.text(text, lang))
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if !joined.is_empty() {
                return Some(joined);
            }
        }

        name.and_then(|name| self.text(name, lang))
            .filter(|name| !name.is_empty())
    }

    /// The name in every requested language.
    pub fn names(
        &self,
        fragments: &[TextRef],
        name: Option<&TextRef>,
    ) -> BTreeMap<String, String> {
        self.localization
            .requested_languages()
            .into_iter()
            .filter_map(|lang| Some((lang.to_string(), self.name(fragments, name, lang)?)))
            .collect()
    }
}

/// Remove every non-English entry whose text is identical to the English one.
/// Returns how many were removed; maps without English are left alone.
pub fn drop_english_duplicates(names: &mut BTreeMap<String, String>) -> usize {
    let Some(english) = names.get(DEFAULT_LANGUAGE).cloned() else {
        return 0;
    };

    let before = names.len();
    names.retain(|lang, name| lang == DEFAULT_LANGUAGE || *name != english);
    let removed = before - names.len();
    if removed > 0 {
        debug!("dropped {removed} translations identical to \"{english}\"");
    }
    removed
}

#[cfg(test)]
mod test {
    use super::*;

    fn catalog(entries: &[(&str, &str, &str)]) -> Catalog {
        let mut catalog = Catalog::new();
        for (namespace, key, value) in entries {
            catalog
                .entry(namespace.to_string())
                .or_default()
                .insert(key.to_string(), value.to_string());
        }
        catalog
    }

    fn table() -> LocalizationTable {
        LocalizationTable::new(BTreeMap::from([
            (
                "en".to_string(),
                catalog(&[
                    ("VehicleName", "Truck1", "Truck"),
                    ("Vehicle", "Bus1", "Bus"),
                    ("CargoType", "Food", "Food"),
                ]),
            ),
            (
                "fr".to_string(),
                catalog(&[("Vehicle", "Bus1", "Autobus"), ("VehicleName", "Empty", "")]),
            ),
        ]))
    }

    fn text(key: &str, literal: &str) -> TextRef {
        TextRef {
            key: Some(key.to_string()),
            culture_invariant_string: Some(literal.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn falls_back_to_english() {
        let table = table();
        assert_eq!(table.resolve("VehicleName", "Truck1", "fr"), Some("Truck"));
        assert_eq!(table.resolve("Vehicle", "Bus1", "fr"), Some("Autobus"));
        assert_eq!(table.resolve("VehicleName", "Truck1", "de"), Some("Truck"));
        assert_eq!(table.resolve("VehicleName", "Nope", "fr"), None);
        assert_eq!(table.get("fr", "VehicleName", "Empty"), None);
    }

    #[test]
    fn requested_languages_always_include_default() {
        let table = LocalizationTable::new(BTreeMap::from([("ko".to_string(), Catalog::new())]));
        assert_eq!(table.requested_languages().into_iter().collect::<Vec<_>>(), ["en", "ko"]);
    }

    #[test]
    fn fragments_use_default_namespaces_then_literal() {
        let table = table();
        let resolver = NameResolver::new(&table, &["VehicleName", "Vehicle"]);

        let fragments = [text("Bus1", "Coach"), text("Unknown", "XL")];
        assert_eq!(resolver.name(&fragments, None, "fr").as_deref(), Some("Autobus XL"));
        assert_eq!(resolver.name(&fragments, None, "en").as_deref(), Some("Bus XL"));
    }

    #[test]
    fn single_name_used_when_no_fragments() {
        let table = table();
        let resolver = NameResolver::new(&table, &["VehicleName", "Vehicle"]);
        let name = text("Truck1", "Fallback");

        assert_eq!(resolver.name(&[], Some(&name), "fr").as_deref(), Some("Truck"));
        assert_eq!(resolver.name(&[], None, "fr"), None);
    }

    #[test]
    fn explicit_namespace_is_not_widened() {
        let table = table();
        let resolver = NameResolver::new(&table, &["VehicleName", "Vehicle"]);
        let scoped = TextRef {
            namespace: Some("Vehicle".to_string()),
            ..text("Truck1", "Literal")
        };
        assert_eq!(resolver.text(&scoped, "en").as_deref(), Some("Literal"));
    }

    #[test]
    fn malformed_language_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        for (lang, contents) in [
            ("en", r#"{ "VehicleName": { "Truck1": "Truck" } }"#),
            ("fr", "{ not json"),
        ] {
            std::fs::create_dir(dir.path().join(lang)).unwrap();
            std::fs::write(dir.path().join(lang).join("Game.json"), contents).unwrap();
        }
        std::fs::create_dir(dir.path().join("de")).unwrap();

        let table = LocalizationTable::load_dir(dir.path()).unwrap();
        assert_eq!(table.languages().collect::<Vec<_>>(), ["en"]);
        assert_eq!(table.resolve("VehicleName", "Truck1", "fr"), Some("Truck"));
        assert_eq!(table.namespace_keys("VehicleName").into_iter().collect::<Vec<_>>(), ["Truck1"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            LocalizationTable::load_dir(&dir.path().join("nope")),
            Err(ErrorKind::MissingFile { .. })
        ));
    }

    #[test]
    fn english_duplicates_are_dropped() {
        let mut names = BTreeMap::from([
            ("de".to_string(), "Lebensmittel".to_string()),
            ("en".to_string(), "Food".to_string()),
            ("fr".to_string(), "Food".to_string()),
            ("ko".to_string(), "Food".to_string()),
        ]);
        assert_eq!(drop_english_duplicates(&mut names), 2);
        assert_eq!(names.keys().collect::<Vec<_>>(), ["de", "en"]);

        let mut no_english = BTreeMap::from([("fr".to_string(), "Food".to_string())]);
        assert_eq!(drop_english_duplicates(&mut no_english), 0);
        assert_eq!(no_english.len(), 1);
    }
}
