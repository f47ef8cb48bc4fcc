//! URL-safe page identifiers for vehicles.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_]").expect("valid regex"));

/// Vehicles whose English name collides with another vehicle's and whose page
/// is named after the row key instead.
pub const DEFAULT_SLUG_OVERRIDES: &[(&str, &str)] =
    &[("Bongo_Bus", "bongo_bus"), ("Nimo_Taxi", "nimo_taxi")];

/// Turn a display name into a slug: ASCII-folded, lowercased, whitespace runs
/// replaced by `_`, hyphens and anything else outside `[a-z0-9_]` dropped.
pub fn slugify(name: &str) -> String {
    let folded = unidecode::unidecode(name).to_lowercase();
    let underscored = WHITESPACE.replace_all(folded.trim(), "_");
    DISALLOWED.replace_all(&underscored, "").into_owned()
}

/// Fixed row-key -> slug assignments checked before a slug is derived from the name.
#[derive(Debug, Clone)]
pub struct SlugOverrides {
    by_key: HashMap<String, String>,
}

impl SlugOverrides {
    pub fn new<K: Into<String>, S: Into<String>>(entries: impl IntoIterator<Item = (K, S)>) -> Self {
        SlugOverrides {
            by_key: entries
                .into_iter()
                .map(|(key, slug)| (key.into(), slug.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_key.iter().map(|(key, slug)| (key.as_str(), slug.as_str()))
    }

    /// The slug for a row: its override if it has one, else derived from `english_name`,
    /// else derived from the row key.
    pub fn slug_for(&self, key: &str, english_name: Option<&str>) -> String {
        if let Some(slug) = self.get(key) {
            return slug.to_string();
        }

        english_name
            .map(slugify)
            .filter(|slug| !slug.is_empty())
            .unwrap_or_else(|| slugify(&key.replace('_', " ")))
    }
}

impl Default for SlugOverrides {
    fn default() -> Self {
        SlugOverrides::new(DEFAULT_SLUG_OVERRIDES.iter().copied())
    }
}

/// Hands out slugs that are unique within one run.
///
/// Override slugs of the keys being processed are reserved up front, so a row whose
/// name happens to derive an override's slug cannot take it. Any other clash gets a
/// numeric suffix.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    owners: HashMap<String, String>,
}

impl SlugRegistry {
    pub fn new<'k>(overrides: &SlugOverrides, keys: impl IntoIterator<Item = &'k str>) -> Self {
        SlugRegistry {
            owners: keys
                .into_iter()
                .filter_map(|key| Some((overrides.get(key)?.to_string(), key.to_string())))
                .collect(),
        }
    }

    /// Claim `candidate` for `key`, returning the slug actually assigned.
    pub fn claim(&mut self, key: &str, candidate: String) -> String {
        match self.owners.get(&candidate) {
            None => {
                self.owners.insert(candidate.clone(), key.to_string());
                return candidate;
            }
            Some(owner) if owner == key => return candidate,
            Some(owner) => warn!("slug {candidate} for {key} is already used by {owner}"),
        }

        let mut n = 2;
        let slug = loop {
            let slug = format!("{candidate}_{n}");
            if !self.owners.contains_key(&slug) {
                break slug;
            }
            n += 1;
        };
        self.owners.insert(slug.clone(), key.to_string());
        slug
    }
}
