//! DokuWiki pages for vehicles.
//!
//! A page is an `{{infobox> ... }}` block followed by a heading, a one-line
//! description, the axle table, and the vehicle's name in every other language.
//! The comparison page is one table row per vehicle.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use convert_case::{Case, Casing};
use itertools::Itertools;
use tracing::debug;

use crate::data_asset::keys::DEFAULT_LANGUAGE;
use crate::error::IResult;
use crate::vehicle::{Axle, Vehicle};

const TRAILER_TYPES: &[&str] = &["SmallTrailer", "SemiTrailer"];
/// Only these types show whether any axle can be lifted.
const LIFT_AXLE_TYPES: &[&str] = &["Truck", "SemiTractor"];

/// Comparison rows whose link text is not the English name, by slug.
const COMPARISON_DISPLAY_NAMES: &[(&str, &str)] = &[("bongo_bus", "Bongo (Bus)")];

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("cs", "Czech"),
    ("de", "German"),
    ("en", "English"),
    ("es-419", "Spanish (Latin America)"),
    ("es-ES", "Spanish (Spain)"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("hu", "Hungarian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("lt", "Lithuanian"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt-BR", "Portuguese (Brazil)"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("zh-Hans", "Chinese (Simplified)"),
    ("zh-Hant", "Chinese (Traditional)"),
];

/// English name of a language code, or the code itself when unknown.
pub fn language_name(code: &str) -> &str {
    LANGUAGE_NAMES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// en-US number formatting: comma thousands separators and at most three
/// fraction digits.
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && (int != "0" || !frac.is_empty()) {
        out.push('-');
    }
    for (i, digit) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// `["SemiTractor", "Heavy"]` -> `"Semi tractor, Heavy"`.
pub fn format_types(types: &[String]) -> String {
    if types.is_empty() {
        return "vehicle".to_string();
    }
    types.iter().map(|ty| ty.to_case(Case::Sentence)).join(", ")
}

/// Types as a noun phrase: the class word goes before the vehicle type
/// (`["Truck", "Heavy"]` -> `"heavy truck"`).
pub fn describe_types(types: &[String]) -> String {
    let words = types
        .iter()
        .map(|ty| ty.to_case(Case::Lower))
        .collect::<Vec<_>>();

    match words.as_slice() {
        [] => "vehicle".to_string(),
        [vehicle_type, class] => format!("{class} {vehicle_type}"),
        [only] if only == "small" => "small vehicle".to_string(),
        words => words.join(" "),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drivetrain {
    NoDrivenAxle,
    FrontWheel,
    RearWheel,
    AllWheel,
}

impl Drivetrain {
    /// `None` when the vehicle has no axles at all.
    pub fn of(axles: &[Axle]) -> Option<Drivetrain> {
        if axles.is_empty() {
            return None;
        }

        let driven = axles.iter().filter(|axle| axle.driven).collect::<Vec<_>>();
        let front = driven.iter().any(|axle| axle.index == 0);
        let rear = driven.iter().any(|axle| axle.index > 0);

        Some(if driven.is_empty() {
            Drivetrain::NoDrivenAxle
        } else if driven.len() == axles.len() || (front && rear) {
            Drivetrain::AllWheel
        } else if front {
            Drivetrain::FrontWheel
        } else {
            Drivetrain::RearWheel
        })
    }
}

impl Drivetrain {
    /// `FWD`, `RWD` or `AWD`; empty without a driven axle.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Drivetrain::NoDrivenAxle => "",
            Drivetrain::FrontWheel => "FWD",
            Drivetrain::RearWheel => "RWD",
            Drivetrain::AllWheel => "AWD",
        }
    }
}

impl fmt::Display for Drivetrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Drivetrain::NoDrivenAxle => write!(f, "No driven axle"),
            Drivetrain::FrontWheel => write!(f, "Front-wheel drive"),
            Drivetrain::RearWheel => write!(f, "Rear-wheel drive"),
            Drivetrain::AllWheel => write!(f, "All-wheel drive"),
        }
    }
}

/// Positional name of axle `index` out of `total`.
pub fn axle_name(index: usize, total: usize) -> Cow<'static, str> {
    let name = match (total, index) {
        (1, _) => "Single",
        (_, 0) => "Front",
        (_, i) if i + 1 == total => "Rear",
        (3, _) => "Middle",
        (4, 1) => "Front Middle",
        (4, _) => "Rear Middle",
        (_, i) => return Cow::Owned(format!("Middle {i}")),
    };
    Cow::Borrowed(name)
}

fn yes_no(value: bool) -> &'static str {
    if value { "**Yes**" } else { "No" }
}

fn break_ratio(ratio: f64) -> String {
    if ratio == 0.0 {
        "0%".to_string()
    } else {
        format!("{:.1}%", ratio * 100.0)
    }
}

fn is_trailer(vehicle: &Vehicle) -> bool {
    TRAILER_TYPES.iter().any(|ty| vehicle.has_type(ty))
}

fn level_requirement(vehicle: &Vehicle) -> String {
    vehicle
        .level()
        .iter()
        .map(|(role, level)| format!("{role}: {level}"))
        .join(", ")
}

/// A vehicle's wiki page; render it with `to_string()`.
pub struct VehiclePage<'a>(pub &'a Vehicle);

impl VehiclePage<'_> {
    fn write_infobox(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vehicle = self.0;
        let trailer = is_trailer(vehicle);

        writeln!(f, "{{{{infobox>")?;
        writeln!(f, "name = {}", vehicle.english_name())?;
        writeln!(f, "Internal key = {}", vehicle.key())?;
        writeln!(f, "Type = {}", format_types(vehicle.types()))?;
        writeln!(f, "Cost = {}", format_number(vehicle.cost() as f64))?;

        if !vehicle.level().is_empty() {
            writeln!(f, "Level requirement = {}", level_requirement(vehicle))?;
        }

        if !trailer {
            match usize::try_from(vehicle.comfort()) {
                Ok(stars) if stars > 0 => writeln!(f, "Comfort = {}", "⭐".repeat(stars))?,
                _ => writeln!(f, "Comfort = No comfort")?,
            }

            if let Some(fuel) = vehicle.fuel() {
                if fuel.cap() != 0.0 {
                    writeln!(f, "Fuel = {}{} ({})", fuel.cap(), fuel.unit(), fuel.fuel_type())?;
                } else {
                    writeln!(f, "Fuel = 0{}", fuel.unit())?;
                }
            }

            writeln!(f, "Seats = {}", vehicle.seats())?;
        }

        writeln!(f, "Weight = {}kg", format_number(vehicle.weight()))?;

        if let Some(drivetrain) = Drivetrain::of(vehicle.axles()) {
            if !trailer {
                writeln!(f, "Drivetrain = {drivetrain}")?;
            }
            writeln!(f, "Drag coefficient = {}", vehicle.drag())?;

            if LIFT_AXLE_TYPES.iter().any(|ty| vehicle.has_type(ty)) {
                let lift = vehicle.axles().iter().any(|axle| axle.lift);
                writeln!(f, "Axle lift = {}", if lift { "Yes" } else { "No" })?;
            }
        }

        writeln!(f, "}}}}")
    }

    fn write_axles(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axles = self.0.axles();

        writeln!(f, "===== Axle info =====")?;
        if axles.is_empty() {
            return writeln!(f, "No axle information available.");
        }

        writeln!(f, "^ Axle ^ Break Ratio ^ Driven ^ Dual Wheels ^ Liftable ^")?;
        for (index, axle) in axles.iter().enumerate() {
            writeln!(
                f,
                "| {} | {} | {} | {} | {} |",
                axle_name(index, axles.len()),
                break_ratio(axle.break_ratio),
                yes_no(axle.driven),
                yes_no(axle.dual),
                yes_no(axle.lift)
            )?;
        }
        Ok(())
    }

    fn write_languages(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== In other languages =====")?;
        writeln!(f, "^ Language ^ Name ^")?;
        for (lang, name) in self.0.name() {
            if lang != DEFAULT_LANGUAGE {
                writeln!(f, "| {} | {name} |", language_name(lang))?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for VehiclePage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.0.english_name();

        self.write_infobox(f)?;
        writeln!(f)?;
        writeln!(f, "====== {name} ======")?;
        writeln!(
            f,
            "**{name}** is a {} in [[:motor_town|Motor Town]]",
            describe_types(self.0.types())
        )?;
        writeln!(f)?;
        self.write_axles(f)?;
        writeln!(f)?;
        self.write_languages(f)
    }
}

pub fn render_vehicle_page(vehicle: &Vehicle) -> String {
    VehiclePage(vehicle).to_string()
}

/// Write `<dir>/<slug>.txt`, returning the path written.
pub fn write_vehicle_page(dir: &Path, vehicle: &Vehicle) -> IResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.txt", vehicle.slug()));
    std::fs::write(&path, render_vehicle_page(vehicle))?;
    debug!("wrote {}", path.display());
    Ok(path)
}

/// The vehicle comparison page: every vehicle as one row of a sortable table.
pub struct ComparisonTable<'a>(pub &'a [Vehicle]);

impl ComparisonTable<'_> {
    fn write_row(f: &mut fmt::Formatter<'_>, vehicle: &Vehicle) -> fmt::Result {
        let display_name = COMPARISON_DISPLAY_NAMES
            .iter()
            .find(|(slug, _)| *slug == vehicle.slug())
            .map(|(_, name)| *name)
            .unwrap_or_else(|| vehicle.english_name());

        // Trailers have no drivetrain or tank of their own.
        let (drivetrain, fuel, fuel_type) = if is_trailer(vehicle) {
            ("", String::new(), String::new())
        } else {
            let fuel = vehicle.fuel();
            (
                Drivetrain::of(vehicle.axles()).map_or("", |d| d.abbreviation()),
                fuel.map(|fuel| format!("{}{}", fuel.cap(), fuel.unit()))
                    .unwrap_or_default(),
                fuel.map(|fuel| fuel.fuel_type().to_string())
                    .unwrap_or_default(),
            )
        };

        writeln!(
            f,
            "| [[:vehicles:{}|{display_name}]] | {} | {} | {} | {drivetrain} | {}kg | {fuel} | {fuel_type} | {} |",
            vehicle.slug(),
            format_types(vehicle.types()),
            level_requirement(vehicle),
            format_number(vehicle.cost() as f64),
            format_number(vehicle.weight()),
            vehicle.drag()
        )
    }
}

impl fmt::Display for ComparisonTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "====== Vehicle Comparison Table ======")?;
        writeln!(
            f,
            "^ Name ^ Type ^ Level Requirement ^ Cost ^ Drivetrain ^ Weight ^ Fuel ^ Fuel Type ^ Drag ^"
        )?;
        for vehicle in self.0 {
            Self::write_row(f, vehicle)?;
        }
        Ok(())
    }
}

pub fn render_comparison_table(vehicles: &[Vehicle]) -> String {
    ComparisonTable(vehicles).to_string()
}

/// Write the comparison page to `path`, creating its directory.
pub fn write_comparison_table(path: &Path, vehicles: &[Vehicle]) -> IResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_comparison_table(vehicles))?;
    debug!("wrote {}", path.display());
    Ok(())
}
