//! Typed views over the records found in exported data tables and asset files.
//!
//! Only the fields the extractors read are modelled; everything else in a record
//! is ignored during deserialization.

use itertools::Itertools;
use serde::Deserialize;
use variantly::Variantly;

use crate::data::object_path::ObjectPath;

use super::keys;

/// A localizable text value (`FText`) as written by the exporter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TextRef {
    pub namespace: Option<String>,
    pub table_id: Option<String>,
    pub key: Option<String>,
    pub source_string: Option<String>,
    pub localized_string: Option<String>,
    pub culture_invariant_string: Option<String>,
}

impl TextRef {
    /// The localization namespace: the explicit `Namespace`, else the second
    /// dot-separated segment of `TableId`, else the empty string.
    pub fn namespace(&self) -> &str {
        if let Some(namespace) = self.namespace.as_deref().filter(|ns| !ns.is_empty()) {
            return namespace;
        }

        self.table_id
            .as_deref()
            .and_then(|table_id| table_id.split('.').nth(1))
            .unwrap_or("")
    }

    /// The literal string embedded in the export, used when no localization applies.
    pub fn literal(&self) -> Option<&str> {
        [
            &self.localized_string,
            &self.culture_invariant_string,
            &self.source_string,
        ]
        .into_iter()
        .filter_map(|s| s.as_deref())
        .find(|s| !s.is_empty())
    }

    /// `LocalizedString`, else `CultureInvariantString`.
    pub fn embedded(&self) -> Option<&str> {
        [&self.localized_string, &self.culture_invariant_string]
            .into_iter()
            .filter_map(|s| s.as_deref())
            .find(|s| !s.is_empty())
    }
}

/// A name made of several text fragments (`VehicleName2`, `Name2`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TextGroup {
    pub texts: Vec<TextRef>,
}

/// The name spelled out in the row itself, without consulting any localization.
///
/// A non-empty fragment list always wins, even when none of its fragments carry
/// a string; only a missing or empty list falls through to `name`.
pub fn literal_name(fragments: Option<&TextGroup>, name: Option<&TextRef>) -> Option<String> {
    let joined = match fragments.filter(|group| !group.texts.is_empty()) {
        Some(group) => group.texts.iter().filter_map(TextRef::embedded).join(" "),
        None => name.and_then(TextRef::embedded).unwrap_or_default().to_string(),
    };
    Some(joined).filter(|name| !name.is_empty())
}

/// A `{ "Key": ..., "Value": ... }` pair as exported for maps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyValue<K, V> {
    pub key: K,
    pub value: V,
}

/// A reference to another object as written by the exporter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectRef {
    #[serde(default)]
    pub object_name: Option<String>,
    pub object_path: ObjectPath,
}

/// One row of `DataAsset/Vehicles/Vehicles.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VehicleRow {
    #[serde(default)]
    pub vehicle_name: Option<TextRef>,
    #[serde(default)]
    pub vehicle_name2: Option<TextGroup>,
    pub vehicle_class: ObjectRef,
    #[serde(default)]
    pub cost: i64,
    // The export spells it this way.
    #[serde(rename = "Comport", default)]
    pub comfort: i64,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub truck_class: Option<String>,
    #[serde(default)]
    pub level_requirement_to_drive: Vec<KeyValue<String, i64>>,
    #[serde(default)]
    pub parts: Vec<KeyValue<String, String>>,
}

impl VehicleRow {
    /// Row key of the engine fitted in the engine part slot, if any.
    pub fn engine_key(&self) -> Option<&str> {
        self.parts
            .iter()
            .find(|part| part.key == keys::ENGINE_PART_SLOT)
            .map(|part| part.value.as_str())
            .filter(|key| !key.is_empty() && *key != keys::NONE_LITERAL)
    }

    /// Name fragments from `VehicleName2`; empty when the row has none.
    pub fn name_fragments(&self) -> &[TextRef] {
        self.vehicle_name2
            .as_ref()
            .map(|group| group.texts.as_slice())
            .unwrap_or_default()
    }
}

/// Just the name fields of a vehicle row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VehicleNameRow {
    pub vehicle_name: Option<TextRef>,
    pub vehicle_name2: Option<TextGroup>,
}

/// One row of `DataAsset/VehicleParts/Engines.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EngineRow {
    pub engine_asset: ObjectRef,
}

/// One row of `DataAsset/Cargos.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CargoRow {
    pub cargo_type: String,
    pub min_delivery_distance: Option<f64>,
    pub max_delivery_distance: Option<f64>,
    pub name: Option<TextRef>,
    pub name2: Option<TextGroup>,
}

impl CargoRow {
    pub fn name_fragments(&self) -> &[TextRef] {
        self.name2
            .as_ref()
            .map(|group| group.texts.as_slice())
            .unwrap_or_default()
    }
}

/// Wheel flags are exported either as a list of literals or as one
/// `"A | B"` string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WheelFlags {
    List(Vec<String>),
    Joined(String),
}

impl WheelFlags {
    pub fn contains(&self, flag: &str) -> bool {
        match self {
            WheelFlags::List(flags) => flags.iter().any(|f| f == flag),
            WheelFlags::Joined(flags) => flags.contains(flag),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BodyInstance {
    pub mass_in_kg_override: Option<f64>,
}

/// One entry of a class default object's `LiftAxles`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LiftAxle {
    pub wheel_index_to_height: Vec<KeyValue<i64, f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EngineProperty {
    pub fuel_type: Option<String>,
}

/// The subset of a component's `Properties` read by the extractors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ComponentProperties {
    pub body_instance: Option<BodyInstance>,
    pub wheel_flags: Option<WheelFlags>,
    pub differential_component_name: Option<serde_json::Value>,
    pub brake_ratio: Option<f64>,
    pub fuel_tank_capacity_in_liter: Option<f64>,
    pub air_drag_coeff: Option<f64>,
    pub lift_axles: Vec<LiftAxle>,
    pub engine_property: Option<EngineProperty>,
}

/// Per-wheel data decoded from an `MHWheelComponent`.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelComponent {
    pub dual_rear: bool,
    pub driven: bool,
    pub brake_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Variantly)]
pub enum ComponentKind {
    Wheel(WheelComponent),
    Seat,
    /// A generated class whose `ClassDefaultObject` holds per-vehicle properties.
    Class(ObjectPath),
    Other,
}

/// One record of an exported asset file, classified once at load time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawComponent")]
pub struct Component {
    pub type_name: String,
    pub name: String,
    pub kind: ComponentKind,
    pub properties: ComponentProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawComponent {
    #[serde(rename = "Type", default)]
    type_name: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    class_default_object: Option<ObjectRef>,
    #[serde(default)]
    properties: Option<ComponentProperties>,
}

impl From<RawComponent> for Component {
    fn from(raw: RawComponent) -> Self {
        let properties = raw.properties.unwrap_or_default();

        let kind = match (raw.type_name.as_str(), raw.class_default_object) {
            (keys::WHEEL_COMPONENT, _) => ComponentKind::Wheel(WheelComponent {
                dual_rear: properties
                    .wheel_flags
                    .as_ref()
                    .is_some_and(|flags| flags.contains(keys::DUAL_REAR_WHEEL_FLAG)),
                driven: properties.differential_component_name.is_some(),
                brake_ratio: properties.brake_ratio.unwrap_or(0.0),
            }),
            (keys::SEAT_COMPONENT, _) => ComponentKind::Seat,
            (_, Some(cdo)) => ComponentKind::Class(cdo.object_path),
            _ => ComponentKind::Other,
        };

        Component {
            type_name: raw.type_name,
            name: raw.name,
            kind,
            properties,
        }
    }
}

impl Component {
    /// `BodyInstance.MassInKgOverride`, zero when absent.
    pub fn mass_override(&self) -> f64 {
        self.properties
            .body_instance
            .as_ref()
            .and_then(|body| body.mass_in_kg_override)
            .unwrap_or(0.0)
    }

    /// Fuel type literal from an engine asset's `EngineProperty`.
    pub fn fuel_type(&self) -> Option<&str> {
        self.properties
            .engine_property
            .as_ref()
            .and_then(|engine| engine.fuel_type.as_deref())
    }
}
