//! Whole-table drivers: decode every row, normalize it, and keep table order.
//!
//! Rows are independent, so vehicles are normalized on the rayon pool. The
//! first failing row aborts the run with an error naming that row.

use indexmap::IndexMap;
use rayon::prelude::*;
use serde_json::Value;
use tracing::{error, info};

use crate::cargo::{self, Cargo};
use crate::data::DataFileLoader;
use crate::data::table::{DataTable, decode_row};
use crate::data_asset::types::{CargoRow, VehicleNameRow, VehicleRow, literal_name};
use crate::error::{ErrorKind, IResult};
use crate::slug::{SlugOverrides, SlugRegistry};
use crate::vehicle::{Vehicle, VehicleNormalizer};

fn row_failed(key: &str, err: ErrorKind) -> ErrorKind {
    error!("failed to process row {key}: {err}");
    err.in_row(key)
}

/// Normalize every vehicle row, then make slugs unique in row order.
pub fn extract_vehicles<L>(
    table: &DataTable,
    normalizer: &VehicleNormalizer<'_, L>,
    overrides: &SlugOverrides,
) -> IResult<Vec<Vehicle>>
where
    L: DataFileLoader + Sync,
{
    let rows: Vec<(&str, &Value)> = table.rows().collect();

    let mut vehicles = rows
        .par_iter()
        .map(|(key, row)| {
            decode_row::<VehicleRow>(key, row)
                .and_then(|row| normalizer.normalize(key, &row))
                .map_err(|err| row_failed(key, err))
        })
        .collect::<IResult<Vec<Vehicle>>>()?;

    let mut slugs = SlugRegistry::new(overrides, vehicles.iter().map(Vehicle::key));
    for vehicle in &mut vehicles {
        let slug = slugs.claim(vehicle.key(), vehicle.slug().to_string());
        vehicle.set_slug(slug);
    }

    Ok(vehicles)
}

/// Row key -> the name embedded in the row, for every row that has one.
fn embedded_names<R, F>(table: &DataTable, name_of: F) -> IResult<IndexMap<String, String>>
where
    R: serde::de::DeserializeOwned,
    F: Fn(&R) -> Option<String>,
{
    let mut out = IndexMap::with_capacity(table.len());
    for (key, row) in table.rows() {
        let row: R = decode_row(key, row).map_err(|err| row_failed(key, err))?;
        if let Some(name) = name_of(&row) {
            out.insert(key.to_string(), name);
        }
    }

    info!("found {} of {} names", out.len(), table.len());
    Ok(out)
}

pub fn vehicle_names(table: &DataTable) -> IResult<IndexMap<String, String>> {
    embedded_names(table, |row: &VehicleNameRow| {
        literal_name(row.vehicle_name2.as_ref(), row.vehicle_name.as_ref())
    })
}

pub fn cargo_names(table: &DataTable) -> IResult<IndexMap<String, String>> {
    embedded_names(table, cargo::cargo_name)
}

pub fn extract_cargo(table: &DataTable) -> IResult<Vec<Cargo>> {
    let cargo = table
        .rows()
        .map(|(key, row)| {
            let row: CargoRow = decode_row(key, row).map_err(|err| row_failed(key, err))?;
            Ok(cargo::normalize_cargo(key, &row))
        })
        .collect::<IResult<Vec<_>>>()?;

    info!("normalized {} cargo rows", cargo.len());
    Ok(cargo)
}
