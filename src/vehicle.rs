//! Normalized vehicle records and the derivations that build them from a
//! `Vehicles` row plus the vehicle's class and engine asset files.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bon::Builder;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::DataFileLoader;
use crate::data::assets::{AssetFile, AssetResolver, Resolved};
use crate::data::object_path::ObjectPath;
use crate::data::table::DataTable;
use crate::data_asset::keys::{self, DEFAULT_LANGUAGE, Role};
use crate::data_asset::translations::NameResolver;
use crate::data_asset::types::{
    Component, ComponentKind, EngineRow, LiftAxle, VehicleRow, WheelComponent,
};
use crate::error::{ErrorKind, IResult};
use crate::recognized::Recognized;
use crate::slug::SlugOverrides;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    Gasoline,
    Diesel,
    Electric,
}

impl TryFrom<&str> for FuelType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Gasoline" => Ok(FuelType::Gasoline),
            "Diesel" => Ok(FuelType::Diesel),
            "Electric" => Ok(FuelType::Electric),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelType::Gasoline => write!(f, "Gasoline"),
            FuelType::Diesel => write!(f, "Diesel"),
            FuelType::Electric => write!(f, "Electric"),
        }
    }
}

/// Tank (or battery) capacity and the kind of energy it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fuel {
    cap: f64,
    #[serde(rename = "type")]
    fuel_type: Recognized<FuelType>,
}

impl Fuel {
    pub fn new(cap: f64, fuel_type: Recognized<FuelType>) -> Self {
        Fuel { cap, fuel_type }
    }

    /// Liters, or kWh for electric vehicles.
    pub fn cap(&self) -> f64 {
        self.cap
    }

    pub fn fuel_type(&self) -> &Recognized<FuelType> {
        &self.fuel_type
    }

    pub fn is_electric(&self) -> bool {
        self.fuel_type.known() == Some(&FuelType::Electric)
    }

    /// Unit `cap` is measured in.
    pub fn unit(&self) -> &'static str {
        if self.is_electric() { "kWh" } else { "L" }
    }
}

/// One axle, built from a front-to-rear pair of wheel components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axle {
    pub index: usize,
    pub lift: bool,
    pub dual: bool,
    pub driven: bool,
    /// Sum of both wheels' brake ratios. The field name matches the published data.
    #[serde(rename = "breakRatio")]
    pub break_ratio: f64,
}

impl Axle {
    pub fn new(index: usize) -> Self {
        Axle {
            index,
            lift: false,
            dual: false,
            driven: false,
            break_ratio: 0.0,
        }
    }
}

/// A normalized vehicle as written to `vehicles.json`.
///
/// Every field is always present; `fuel` is `null` when the vehicle has no engine.
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[builder(into)]
    key: String,
    #[builder(into)]
    slug: String,
    name: BTreeMap<String, String>,
    cost: i64,
    comfort: i64,
    fuel: Option<Fuel>,
    drag: f64,
    weight: f64,
    #[serde(rename = "type")]
    #[builder(default)]
    types: Vec<String>,
    seats: usize,
    #[builder(default)]
    level: BTreeMap<Role, i64>,
    #[builder(default)]
    axles: Vec<Axle>,
}

impl Vehicle {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }

    /// Display names keyed by language code.
    pub fn name(&self) -> &BTreeMap<String, String> {
        &self.name
    }

    /// English display name, falling back to the row key.
    pub fn english_name(&self) -> &str {
        self.name
            .get(DEFAULT_LANGUAGE)
            .map(String::as_str)
            .unwrap_or(&self.key)
    }

    pub fn cost(&self) -> i64 {
        self.cost
    }

    pub fn comfort(&self) -> i64 {
        self.comfort
    }

    pub fn fuel(&self) -> Option<&Fuel> {
        self.fuel.as_ref()
    }

    pub fn drag(&self) -> f64 {
        self.drag
    }

    /// Kilograms.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Vehicle type followed by truck class, e.g. `["Truck", "Heavy"]`.
    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn has_type(&self, ty: &str) -> bool {
        self.types.iter().any(|t| t == ty)
    }

    pub fn seats(&self) -> usize {
        self.seats
    }

    pub fn level(&self) -> &BTreeMap<Role, i64> {
        &self.level
    }

    pub fn axles(&self) -> &[Axle] {
        &self.axles
    }
}

/// Pair wheel components into axles.
///
/// Wheels are ordered by the single character at [`keys::WHEEL_ORDER_CHAR_OFFSET`]
/// of their name (`Wheel0`, `Wheel1`, ...). This is a character comparison, so
/// `Wheel10` sorts next to `Wheel1`; the sort is stable to keep that deterministic.
/// An axle takes the dual and driven flags of its later wheel and the sum of both
/// brake ratios. An odd wheel count leaves a single-wheel last axle.
pub fn derive_axles(records: &[Component]) -> Vec<Axle> {
    let wheels = records
        .iter()
        .filter_map(|record| {
            let wheel = record.kind.wheel_ref()?;
            let order = record.name.chars().nth(keys::WHEEL_ORDER_CHAR_OFFSET);
            Some((order, wheel))
        })
        .sorted_by_key(|(order, _)| *order)
        .map(|(_, wheel)| wheel)
        .collect::<Vec<&WheelComponent>>();

    wheels
        .chunks(2)
        .enumerate()
        .map(|(index, pair)| {
            pair.iter().fold(Axle::new(index), |mut axle, wheel| {
                axle.dual = wheel.dual_rear;
                axle.driven = wheel.driven;
                axle.break_ratio += wheel.brake_ratio;
                axle
            })
        })
        .collect()
}

/// Mark axles liftable from the class default object's `LiftAxles`: wheel index
/// `i` with a positive height lifts axle `i / 2`.
pub fn apply_lift(axles: &mut [Axle], lift_axles: &[LiftAxle], vehicle: &str) {
    for entry in lift_axles.iter().flat_map(|lift| &lift.wheel_index_to_height) {
        if entry.value <= 0.0 {
            continue;
        }

        let axle = usize::try_from(entry.key)
            .ok()
            .and_then(|wheel| axles.get_mut(wheel / 2));
        match axle {
            Some(axle) => axle.lift = true,
            None => warn!(
                "{vehicle}: lift entry for wheel {} has no matching axle ({} axles)",
                entry.key,
                axles.len()
            ),
        }
    }
}

/// Sum of every record's mass override in kilograms.
pub fn total_mass(records: &[Component]) -> f64 {
    records.iter().map(Component::mass_override).sum()
}

pub fn seat_count(records: &[Component]) -> usize {
    records.iter().filter(|record| record.kind.is_seat()).count()
}

/// Vehicle type and truck class enum members, skipping unset ones.
pub fn vehicle_types(row: &VehicleRow) -> Vec<String> {
    [row.vehicle_type.as_deref(), row.truck_class.as_deref()]
        .into_iter()
        .flatten()
        .map(keys::enum_value)
        .filter(|value| !value.is_empty() && *value != keys::NONE_LITERAL)
        .map(str::to_string)
        .collect()
}

/// Level requirement per role; roles the row does not mention are left out.
pub fn level_requirements(row: &VehicleRow) -> BTreeMap<Role, i64> {
    Role::ALL
        .iter()
        .filter_map(|role| {
            row.level_requirement_to_drive
                .iter()
                .find(|req| req.key == role.key())
                .map(|req| (*role, req.value))
        })
        .collect()
}

/// Fuel type from an engine asset's first record, defaulting to gasoline.
pub fn engine_fuel_type(engine: &AssetFile) -> IResult<Recognized<FuelType>> {
    let literal = engine
        .get(0)?
        .fuel_type()
        .and_then(|literal| literal.split_once("::"))
        .map(|(_, value)| value)
        .unwrap_or(keys::DEFAULT_FUEL_TYPE);

    Ok(Recognized::parse(literal))
}

/// A vehicle's class asset file together with its class default object.
#[derive(Debug, Clone)]
pub struct VehicleClass {
    file: Arc<AssetFile>,
    default_object: Resolved,
}

impl VehicleClass {
    /// Resolve the class record `reference` points at, then its class default object.
    pub fn load<L: DataFileLoader>(
        resolver: &AssetResolver<L>,
        reference: &ObjectPath,
    ) -> IResult<VehicleClass> {
        let class = resolver.resolve(reference)?;
        let ComponentKind::Class(default_object) = &class.record().kind else {
            return Err(ErrorKind::MissingField {
                key: reference.to_string(),
                field: "ClassDefaultObject",
            });
        };
        let default_object = resolver.resolve(default_object)?;

        Ok(VehicleClass {
            file: Arc::clone(class.file()),
            default_object,
        })
    }

    pub fn records(&self) -> &[Component] {
        self.file.records()
    }

    pub fn default_object(&self) -> &Component {
        self.default_object.record()
    }

    pub fn drag(&self) -> f64 {
        self.default_object()
            .properties
            .air_drag_coeff
            .unwrap_or(keys::DEFAULT_AIR_DRAG_COEFF)
    }

    pub fn fuel_capacity(&self) -> f64 {
        self.default_object()
            .properties
            .fuel_tank_capacity_in_liter
            .unwrap_or(keys::DEFAULT_FUEL_TANK_CAPACITY)
    }

    pub fn axles(&self, vehicle: &str) -> Vec<Axle> {
        let mut axles = derive_axles(self.records());
        apply_lift(&mut axles, &self.default_object().properties.lift_axles, vehicle);
        axles
    }
}

/// Builds [`Vehicle`]s from `Vehicles` rows. Shared read-only across worker threads.
pub struct VehicleNormalizer<'a, L> {
    resolver: &'a AssetResolver<L>,
    engines: &'a DataTable,
    names: NameResolver<'a>,
    overrides: &'a SlugOverrides,
}

impl<'a, L: DataFileLoader> VehicleNormalizer<'a, L> {
    pub fn new(
        resolver: &'a AssetResolver<L>,
        engines: &'a DataTable,
        names: NameResolver<'a>,
        overrides: &'a SlugOverrides,
    ) -> Self {
        VehicleNormalizer {
            resolver,
            engines,
            names,
            overrides,
        }
    }

    /// Normalize one row. The slug is the row's candidate slug; uniqueness across
    /// a run is enforced by the batch driver.
    pub fn normalize(&self, key: &str, row: &VehicleRow) -> IResult<Vehicle> {
        let name = self.names.names(row.name_fragments(), row.vehicle_name.as_ref());
        let Some(english) = name.get(DEFAULT_LANGUAGE) else {
            return Err(ErrorKind::MissingField {
                key: key.to_string(),
                field: "VehicleName",
            });
        };
        let slug = self.overrides.slug_for(key, Some(english));

        let class = VehicleClass::load(self.resolver, &row.vehicle_class.object_path)?;
        let fuel = self.fuel(row, &class)?;
        debug!("{key}: {} records in class file", class.records().len());

        Ok(Vehicle::builder()
            .key(key)
            .slug(slug)
            .name(name)
            .cost(row.cost)
            .comfort(row.comfort)
            .maybe_fuel(fuel)
            .drag(class.drag())
            .weight(total_mass(class.records()))
            .types(vehicle_types(row))
            .seats(seat_count(class.records()))
            .level(level_requirements(row))
            .axles(class.axles(key))
            .build())
    }

    fn fuel(&self, row: &VehicleRow, class: &VehicleClass) -> IResult<Option<Fuel>> {
        let Some(engine_key) = row.engine_key() else {
            return Ok(None);
        };

        let engine: EngineRow =
            self.engines
                .row(engine_key)?
                .ok_or_else(|| ErrorKind::MissingRow {
                    table: keys::ENGINES_TABLE,
                    key: engine_key.to_string(),
                })?;
        let engine_file = self.resolver.file(engine.engine_asset.object_path.path())?;

        Ok(Some(Fuel::new(
            class.fuel_capacity(),
            engine_fuel_type(&engine_file)?,
        )))
    }
}

#[cfg(test)]
mod test {
    use std::borrow::Cow;
    use std::collections::HashMap;

    use serde_json::{Value, json};

    use super::*;
    use crate::data::DataFileWithCallback;
    use crate::data_asset::translations::{Catalog, LocalizationTable};

    fn wheel(name: &str, dual: bool, driven: bool, brake: f64) -> Value {
        let mut properties = json!({ "BrakeRatio": brake });
        if dual {
            properties["WheelFlags"] = json!(["EMTWheelFlags::DualRearWheel"]);
        }
        if driven {
            properties["DifferentialComponentName"] = json!("Diff");
        }
        json!({ "Type": "MHWheelComponent", "Name": name, "Properties": properties })
    }

    fn components(value: Value) -> Vec<Component> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn axles_pair_wheels_front_to_rear() {
        let records = components(json!([
            wheel("Wheel3", true, true, 0.2),
            wheel("Wheel0", false, false, 0.3),
            { "Type": "MTSeatComponent", "Name": "Seat" },
            wheel("Wheel2", false, true, 0.2),
            wheel("Wheel1", false, false, 0.3),
        ]));

        let axles = derive_axles(&records);
        assert_eq!(axles.len(), 2);
        assert_eq!(axles[0].index, 0);
        assert!(!axles[0].driven && !axles[0].dual);
        assert!((axles[0].break_ratio - 0.6).abs() < 1e-9);
        assert_eq!(axles[1].index, 1);
        // Flags come from the later wheel of the pair.
        assert!(axles[1].driven && axles[1].dual);
        assert!((axles[1].break_ratio - 0.4).abs() < 1e-9);
    }

    #[test]
    fn axle_count_rounds_up() {
        for count in 0usize..7 {
            let records = components(Value::Array(
                (0..count)
                    .map(|i| wheel(&format!("Wheel{i}"), false, false, 0.0))
                    .collect(),
            ));
            assert_eq!(derive_axles(&records).len(), count.div_ceil(2), "{count} wheels");
        }
    }

    #[test]
    fn wheel_order_compares_single_character() {
        let records = components(json!([
            wheel("Wheel10", false, true, 0.1),
            wheel("Wheel2", false, false, 0.2),
            wheel("Wheel1", false, false, 0.3),
            wheel("Wheel0", false, false, 0.4),
        ]));

        // `Wheel10` and `Wheel1` share the character `1` and keep their input order,
        // so `Wheel10` ends up paired with `Wheel0`.
        let axles = derive_axles(&records);
        assert!((axles[0].break_ratio - 0.5).abs() < 1e-9);
        assert!(axles[0].driven);
        assert!(!axles[1].driven);
    }

    #[test]
    fn lift_marks_axle_of_wheel_index() {
        let mut axles = (0..3).map(Axle::new).collect::<Vec<_>>();
        let lift: Vec<LiftAxle> = serde_json::from_value(json!([
            { "WheelIndexToHeight": [ { "Key": 2, "Value": 0.0 }, { "Key": 5, "Value": 12.5 } ] },
            { "WheelIndexToHeight": [ { "Key": 9, "Value": 3.0 } ] }
        ]))
        .unwrap();

        apply_lift(&mut axles, &lift, "Test");
        assert_eq!(axles.iter().map(|a| a.lift).collect::<Vec<_>>(), [false, false, true]);
    }

    #[test]
    fn types_and_levels() {
        let row: VehicleRow = serde_json::from_value(json!({
            "VehicleClass": { "ObjectPath": "Cars/A.0" },
            "VehicleType": "EMTVehicleType::Truck",
            "TruckClass": "EMTTruckClass::None",
            "LevelRequirementToDrive": [
                { "Key": "CL_Truck", "Value": 10 },
                { "Key": "CL_Driver", "Value": 3 },
                { "Key": "CL_Unknown", "Value": 99 }
            ]
        }))
        .unwrap();

        assert_eq!(vehicle_types(&row), ["Truck"]);
        assert_eq!(
            level_requirements(&row),
            BTreeMap::from([(Role::Driver, 3), (Role::Truck, 10)])
        );
    }

    fn class_file(cdo_properties: Value) -> String {
        json!([
            { "Type": "BlueprintGeneratedClass", "Name": "Van_C",
              "ClassDefaultObject": { "ObjectPath": "Cars/Van.1" } },
            { "Type": "Van_C", "Name": "Default__Van_C", "Properties": cdo_properties },
            { "Type": "StaticMeshComponent", "Name": "Body", "Properties": { "BodyInstance": { "MassInKgOverride": 1200.0 } } },
            { "Type": "StaticMeshComponent", "Name": "Box", "Properties": { "BodyInstance": { "MassInKgOverride": 300.5 } } },
            { "Type": "MTSeatComponent", "Name": "Seat0" },
            { "Type": "MTSeatComponent", "Name": "Seat1" },
            wheel("Wheel0", false, false, 0.25),
            wheel("Wheel1", false, false, 0.25),
            wheel("Wheel2", false, true, 0.25),
            wheel("Wheel3", false, true, 0.25)
        ])
        .to_string()
    }

    fn fixture_files(cdo_properties: Value) -> HashMap<String, String> {
        HashMap::from([
            ("Cars/Van.json".to_string(), class_file(cdo_properties)),
            (
                "Engines/Electric.json".to_string(),
                json!([{ "Type": "MTEngineDataAsset", "Name": "Electric",
                         "Properties": { "EngineProperty": { "FuelType": "EMTFuelType::Electric" } } }])
                .to_string(),
            ),
            (
                "Engines/I4.json".to_string(),
                json!([{ "Type": "MTEngineDataAsset", "Name": "I4", "Properties": { "EngineProperty": {} } }])
                    .to_string(),
            ),
        ])
    }

    fn resolver(files: HashMap<String, String>) -> AssetResolver<impl DataFileLoader> {
        AssetResolver::new(DataFileWithCallback::new(move |path: &str| {
            files
                .get(path)
                .map(|data| Cow::Owned(data.clone().into_bytes()))
                .ok_or_else(|| ErrorKind::MissingFile {
                    path: path.to_string(),
                })
        }))
    }

    fn engines() -> DataTable {
        DataTable::from_value(json!([{ "Rows": {
            "E_Motor": { "EngineAsset": { "ObjectPath": "Engines/Electric.0" } },
            "I4_90HP": { "EngineAsset": { "ObjectPath": "Engines/I4.0" } }
        } }]))
        .unwrap()
    }

    fn localization() -> LocalizationTable {
        let mut en = Catalog::new();
        en.entry("VehicleName".to_string())
            .or_default()
            .insert("Van".to_string(), "Cargo Van".to_string());
        LocalizationTable::new(BTreeMap::from([("en".to_string(), en)]))
    }

    fn row(engine: Option<&str>) -> VehicleRow {
        let mut row = json!({
            "VehicleName": { "Key": "Van", "CultureInvariantString": "Van" },
            "VehicleClass": { "ObjectPath": "Cars/Van.0" },
            "Cost": 18000,
            "Comport": 2,
            "VehicleType": "EMTVehicleType::Small",
            "TruckClass": "EMTTruckClass::None"
        });
        if let Some(engine) = engine {
            row["Parts"] = json!([{ "Key": "EMTVehiclePartSlot::Engine", "Value": engine }]);
        }
        serde_json::from_value(row).unwrap()
    }

    #[test]
    fn normalizes_a_full_row() {
        let resolver = resolver(fixture_files(json!({
            "AirDragCoeff": 0.35,
            "FuelTankCapacityInLiter": 80.0,
            "LiftAxles": [ { "WheelIndexToHeight": [ { "Key": 3, "Value": 10.0 } ] } ]
        })));
        let engines = engines();
        let localization = localization();
        let overrides = SlugOverrides::default();
        let normalizer = VehicleNormalizer::new(
            &resolver,
            &engines,
            NameResolver::new(&localization, keys::VEHICLE_NAME_NAMESPACES),
            &overrides,
        );

        let vehicle = normalizer.normalize("Van", &row(Some("E_Motor"))).unwrap();
        assert_eq!(vehicle.english_name(), "Cargo Van");
        assert_eq!(vehicle.slug(), "cargo_van");
        assert_eq!(vehicle.cost(), 18000);
        assert_eq!(vehicle.comfort(), 2);
        assert_eq!(vehicle.drag(), 0.35);
        assert_eq!(vehicle.weight(), 1500.5);
        assert_eq!(vehicle.seats(), 2);
        assert_eq!(vehicle.types(), ["Small"]);
        assert!(vehicle.level().is_empty());

        let fuel = vehicle.fuel().unwrap();
        assert_eq!(fuel.cap(), 80.0);
        assert!(fuel.is_electric());
        assert_eq!(fuel.unit(), "kWh");

        let axles = vehicle.axles();
        assert_eq!(axles.len(), 2);
        assert!(!axles[0].driven && axles[1].driven);
        assert!(!axles[0].lift && axles[1].lift);
        // Both class and engine files were parsed exactly once.
        assert_eq!(resolver.cached_files(), 2);
    }

    #[test]
    fn defaults_apply_when_properties_are_missing() {
        let resolver = resolver(fixture_files(json!({})));
        let engines = engines();
        let localization = localization();
        let overrides = SlugOverrides::default();
        let normalizer = VehicleNormalizer::new(
            &resolver,
            &engines,
            NameResolver::new(&localization, keys::VEHICLE_NAME_NAMESPACES),
            &overrides,
        );

        let vehicle = normalizer.normalize("Van", &row(Some("I4_90HP"))).unwrap();
        assert_eq!(vehicle.drag(), 1.0);
        let fuel = vehicle.fuel().unwrap();
        assert_eq!(fuel.cap(), 50.0);
        assert_eq!(fuel.fuel_type(), &Recognized::Known(FuelType::Gasoline));

        let no_engine = normalizer.normalize("Van", &row(None)).unwrap();
        assert_eq!(no_engine.fuel(), None);

        let serialized = serde_json::to_value(&no_engine).unwrap();
        assert_eq!(serialized["fuel"], Value::Null);
        assert_eq!(
            serialized.as_object().unwrap().keys().collect::<Vec<_>>(),
            [
                "key", "slug", "name", "cost", "comfort", "fuel", "drag", "weight", "type",
                "seats", "level", "axles"
            ]
        );
    }

    #[test]
    fn missing_references_are_errors() {
        let resolver = resolver(fixture_files(json!({})));
        let engines = engines();
        let localization = localization();
        let overrides = SlugOverrides::default();
        let normalizer = VehicleNormalizer::new(
            &resolver,
            &engines,
            NameResolver::new(&localization, keys::VEHICLE_NAME_NAMESPACES),
            &overrides,
        );

        assert!(matches!(
            normalizer.normalize("Van", &row(Some("V8_Missing"))),
            Err(ErrorKind::MissingRow { .. })
        ));

        let mut moved = row(None);
        moved.vehicle_class.object_path = ObjectPath::new("Cars/Gone", 0);
        assert!(matches!(
            normalizer.normalize("Van", &moved),
            Err(ErrorKind::MissingFile { .. })
        ));

        let mut nameless = row(None);
        nameless.vehicle_name = None;
        assert!(matches!(
            normalizer.normalize("Van", &nameless),
            Err(ErrorKind::MissingField { field: "VehicleName", .. })
        ));
    }
}
