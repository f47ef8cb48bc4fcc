//! Constants for the string keys and enum literals found in Motor Town's
//! exported data assets.

// Component `Type` discriminators
pub const WHEEL_COMPONENT: &str = "MHWheelComponent";
pub const SEAT_COMPONENT: &str = "MTSeatComponent";

// Enum literals
pub const DUAL_REAR_WHEEL_FLAG: &str = "EMTWheelFlags::DualRearWheel";
pub const ENGINE_PART_SLOT: &str = "EMTVehiclePartSlot::Engine";
/// Placeholder value for an unset enum (`EMTTruckClass::None`).
pub const NONE_LITERAL: &str = "None";

// Defaults applied when the class default object leaves a property unset
pub const DEFAULT_FUEL_TANK_CAPACITY: f64 = 50.0;
pub const DEFAULT_AIR_DRAG_COEFF: f64 = 1.0;
pub const DEFAULT_FUEL_TYPE: &str = "Gasoline";

/// Wheel components are named `Wheel0`, `Wheel1`, ...; the character at this
/// offset orders them front to rear.
pub const WHEEL_ORDER_CHAR_OFFSET: usize = 5;

// Localization
pub const DEFAULT_LANGUAGE: &str = "en";
pub const LOCALIZATION_FILE: &str = "Game.json";
pub const VEHICLE_NAME_NAMESPACES: &[&str] = &["VehicleName", "Vehicle"];
pub const CARGO_TYPE_NAMESPACE: &str = "CargoType";
pub const CARGO_TYPE_KEY_PREFIX: &str = "T::";

// Table names used in error messages
pub const ENGINES_TABLE: &str = "Engines";

/// Returns the member name of an exported enum literal
/// (`"EMTVehicleType::Truck"` -> `"Truck"`).
pub fn enum_value(literal: &str) -> &str {
    literal
        .split_once("::")
        .map(|(_, value)| value)
        .unwrap_or(literal)
}

/// Job roles that can gate driving a vehicle behind a level requirement.
///
/// Ordering follows declaration order, which is the order roles are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Driver,
    Taxi,
    Bus,
    Truck,
    Racer,
    Wrecker,
    Police,
}

impl Role {
    /// All known roles.
    pub const ALL: &[Role] = &[
        Self::Driver,
        Self::Taxi,
        Self::Bus,
        Self::Truck,
        Self::Racer,
        Self::Wrecker,
        Self::Police,
    ];

    /// The key used in a row's `LevelRequirementToDrive` list.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Driver => "CL_Driver",
            Self::Taxi => "CL_Taxi",
            Self::Bus => "CL_Bus",
            Self::Truck => "CL_Truck",
            Self::Racer => "CL_Racer",
            Self::Wrecker => "CL_Wrecker",
            Self::Police => "CL_Police",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Driver => write!(f, "Driver"),
            Self::Taxi => write!(f, "Taxi"),
            Self::Bus => write!(f, "Bus"),
            Self::Truck => write!(f, "Truck"),
            Self::Racer => write!(f, "Racer"),
            Self::Wrecker => write!(f, "Wrecker"),
            Self::Police => write!(f, "Police"),
        }
    }
}
