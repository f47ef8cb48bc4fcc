//! Access to an exported Motor Town content tree.
//!
//! The exporter writes every package as JSON under `MotorTown/Content/...`.
//! Object paths inside those files are relative to the export root, so the
//! same root serves both the fixed data tables and everything they reference.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::info;

use crate::batch;
use crate::cargo::{self, Cargo};
use crate::data::DataFileLoader;
use crate::data::DirectoryLoader;
use crate::data::assets::AssetResolver;
use crate::data::table::DataTable;
use crate::data_asset::keys::VEHICLE_NAME_NAMESPACES;
use crate::data_asset::translations::{LocalizationTable, NameResolver};
use crate::error::IResult;
use crate::slug::SlugOverrides;
use crate::vehicle::{Vehicle, VehicleNormalizer};

pub const VEHICLES_TABLE_PATH: &str = "MotorTown/Content/DataAsset/Vehicles/Vehicles.json";
pub const ENGINES_TABLE_PATH: &str = "MotorTown/Content/DataAsset/VehicleParts/Engines.json";
pub const CARGOS_TABLE_PATH: &str = "MotorTown/Content/DataAsset/Cargos.json";
pub const LOCALIZATION_DIR: &str = "MotorTown/Content/Localization/Game";

/// Where each input lives, relative to the export root.
#[derive(Debug, Clone)]
pub struct GameLayout {
    root: PathBuf,
}

impl GameLayout {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        GameLayout {
            root: root.as_ref().into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn vehicles_table(&self) -> &'static str {
        VEHICLES_TABLE_PATH
    }

    pub fn engines_table(&self) -> &'static str {
        ENGINES_TABLE_PATH
    }

    pub fn cargos_table(&self) -> &'static str {
        CARGOS_TABLE_PATH
    }

    pub fn localization_dir(&self) -> PathBuf {
        self.root.join(LOCALIZATION_DIR)
    }
}

/// An opened export tree: a shared asset resolver plus loaders for the data
/// tables and localization.
pub struct GameData {
    layout: GameLayout,
    resolver: AssetResolver<DirectoryLoader>,
}

impl GameData {
    pub fn open<P: AsRef<Path>>(root: P) -> Self {
        let layout = GameLayout::new(root);
        let resolver = AssetResolver::new(DirectoryLoader::new(layout.root()));
        GameData { layout, resolver }
    }

    pub fn layout(&self) -> &GameLayout {
        &self.layout
    }

    pub fn resolver(&self) -> &AssetResolver<DirectoryLoader> {
        &self.resolver
    }

    /// Read a data table given its path relative to the root.
    pub fn table(&self, path: &str) -> IResult<DataTable> {
        let data = self.resolver.loader().get(path)?;
        let table = DataTable::from_slice(&data)?;
        info!("loaded {} rows from {path}", table.len());
        Ok(table)
    }

    pub fn localization(&self) -> IResult<LocalizationTable> {
        let localization = LocalizationTable::load_dir(&self.layout.localization_dir())?;
        info!(
            "loaded localization for {} languages",
            localization.languages().count()
        );
        Ok(localization)
    }

    /// Every vehicle in table order with run-unique slugs.
    pub fn vehicles(&self, overrides: &SlugOverrides) -> IResult<Vec<Vehicle>> {
        let vehicles = self.table(self.layout.vehicles_table())?;
        let engines = self.table(self.layout.engines_table())?;
        let localization = self.localization()?;

        let normalizer = VehicleNormalizer::new(
            &self.resolver,
            &engines,
            NameResolver::new(&localization, VEHICLE_NAME_NAMESPACES),
            overrides,
        );
        let vehicles = batch::extract_vehicles(&vehicles, &normalizer, overrides)?;
        info!(
            "normalized {} vehicles from {} asset files",
            vehicles.len(),
            self.resolver.cached_files()
        );
        Ok(vehicles)
    }

    /// Vehicle key -> the display name written in its row.
    pub fn vehicle_names(&self) -> IResult<IndexMap<String, String>> {
        batch::vehicle_names(&self.table(self.layout.vehicles_table())?)
    }

    pub fn cargo(&self) -> IResult<Vec<Cargo>> {
        let cargos = self.table(self.layout.cargos_table())?;
        batch::extract_cargo(&cargos)
    }

    /// Cargo key -> the display name written in its row.
    pub fn cargo_names(&self) -> IResult<IndexMap<String, String>> {
        batch::cargo_names(&self.table(self.layout.cargos_table())?)
    }

    pub fn cargo_type_names(&self) -> IResult<BTreeMap<String, BTreeMap<String, String>>> {
        cargo::cargo_type_names(&self.localization()?)
    }
}
