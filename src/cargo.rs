//! Cargo definitions from `DataAsset/Cargos.json` and the lookup maps built from them.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data_asset::keys::{CARGO_TYPE_KEY_PREFIX, CARGO_TYPE_NAMESPACE};
use crate::data_asset::translations::LocalizationTable;
use crate::data_asset::types::{CargoRow, literal_name};
use crate::error::{ErrorKind, IResult};

/// A normalized cargo row. The key is carried alongside but written as the map key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    #[serde(skip)]
    key: String,
    #[serde(rename = "type")]
    cargo_type: String,
    #[serde(rename = "minDist", default, skip_serializing_if = "Option::is_none")]
    min_dist: Option<f64>,
    #[serde(rename = "maxDist", default, skip_serializing_if = "Option::is_none")]
    max_dist: Option<f64>,
}

impl Cargo {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn cargo_type(&self) -> &str {
        &self.cargo_type
    }

    pub fn min_dist(&self) -> Option<f64> {
        self.min_dist
    }

    pub fn max_dist(&self) -> Option<f64> {
        self.max_dist
    }
}

/// A zero distance bound is how the export spells "unbounded".
fn distance_bound(value: Option<f64>) -> Option<f64> {
    value.filter(|d| *d != 0.0 && !d.is_nan())
}

pub fn normalize_cargo(key: &str, row: &CargoRow) -> Cargo {
    Cargo {
        key: key.to_string(),
        cargo_type: row.cargo_type.clone(),
        min_dist: distance_bound(row.min_delivery_distance),
        max_dist: distance_bound(row.max_delivery_distance),
    }
}

/// `out_cargo_key.json` and `out_cargo_metadata.json`.
#[derive(Debug, Clone, Default)]
pub struct CargoMaps {
    /// Cargo type -> cargo keys, both in first-seen order.
    pub keys_by_type: IndexMap<String, Vec<String>>,
    /// Cargo key -> metadata, in row order.
    pub metadata: IndexMap<String, Cargo>,
}

impl CargoMaps {
    pub fn new(cargo: impl IntoIterator<Item = Cargo>) -> Self {
        let mut maps = CargoMaps::default();
        for cargo in cargo {
            maps.keys_by_type
                .entry(cargo.cargo_type.clone())
                .or_default()
                .push(cargo.key.clone());
            maps.metadata.insert(cargo.key.clone(), cargo);
        }
        maps
    }
}

/// Display name embedded in a cargo row: the `Name2` fragments, else `Name`.
pub fn cargo_name(row: &CargoRow) -> Option<String> {
    literal_name(row.name2.as_ref(), row.name.as_ref())
}

/// `"T::<key>"` -> language -> display name for every key of the `CargoType`
/// namespace found in any language. Missing translations fall back to English,
/// then to the key itself.
pub fn cargo_type_names(
    localization: &LocalizationTable,
) -> IResult<BTreeMap<String, BTreeMap<String, String>>> {
    let keys = localization.namespace_keys(CARGO_TYPE_NAMESPACE);
    if keys.is_empty() {
        return Err(ErrorKind::EmptyNamespace {
            namespace: CARGO_TYPE_NAMESPACE,
        });
    }

    Ok(keys
        .into_iter()
        .map(|key| {
            let names = localization
                .languages()
                .map(|lang| {
                    let name = localization
                        .resolve(CARGO_TYPE_NAMESPACE, key, lang)
                        .unwrap_or(key);
                    (lang.to_string(), name.to_string())
                })
                .collect();
            (format!("{CARGO_TYPE_KEY_PREFIX}{key}"), names)
        })
        .collect())
}
