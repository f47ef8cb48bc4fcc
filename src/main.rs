use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use mtdata::cargo::CargoMaps;
use mtdata::data_asset::translations::drop_english_duplicates;
use mtdata::export::wiki;
use mtdata::game_data::GameData;
use mtdata::serialization::write_pretty_json;
use mtdata::slug::SlugOverrides;
use mtdata::vehicle::Vehicle;
use rootcause::prelude::*;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Extract Motor Town vehicle and cargo data from an exported content tree
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the exported `MotorTown/Content` tree
    #[clap(short, long, env = "MTDATA_ROOT", default_value = ".", global = true)]
    root: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[clap(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize every vehicle into a single JSON array
    Vehicles {
        #[clap(short, long, default_value = "vehicles.json")]
        out: PathBuf,
    },
    /// Map each vehicle key to its English name
    VehicleNames {
        #[clap(short, long, default_value = "vehicles_name.json")]
        out: PathBuf,
    },
    /// Write the cargo type -> keys and key -> metadata maps
    Cargo {
        #[clap(long, default_value = "out_cargo_key.json")]
        keys_out: PathBuf,
        #[clap(long, default_value = "out_cargo_metadata.json")]
        metadata_out: PathBuf,
    },
    /// Map each cargo key to its English name
    CargoNames {
        #[clap(short, long, default_value = "cargo_name.json")]
        out: PathBuf,
    },
    /// Localize every cargo type in every language
    CargoTypeNames {
        #[clap(short, long, default_value = "out_cargo_type_name.json")]
        out: PathBuf,
        /// Leave out translations identical to the English text
        #[clap(long)]
        prune_duplicates: bool,
    },
    /// Render a DokuWiki page per vehicle from a vehicles JSON file
    Wiki {
        #[clap(short, long, default_value = "vehicles.json")]
        input: PathBuf,
        #[clap(short, long, default_value = "wiki/vehicles")]
        out_dir: PathBuf,
    },
    /// Render the vehicle comparison table from a vehicles JSON file
    WikiComparison {
        #[clap(short, long, default_value = "vehicles.json")]
        input: PathBuf,
        #[clap(short, long, default_value = "wiki/vehicle_comparison.txt")]
        out: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "mtdata=debug" } else { "mtdata=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_vehicles(input: &Path) -> Result<Vec<Vehicle>, Report> {
    let data = std::fs::read(input)
        .context_with(|| format!("Failed to read vehicles file: {}", input.display()))?;
    let vehicles: Vec<Vehicle> =
        serde_json::from_slice(&data).context("Failed to parse vehicles file")?;
    if vehicles.is_empty() {
        bail!("No vehicles found in {}", input.display());
    }
    Ok(vehicles)
}

fn write_wiki_pages(input: &Path, out_dir: &Path) -> Result<(), Report> {
    let vehicles = read_vehicles(input)?;

    let pb = ProgressBar::new(vehicles.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress template")?
            .progress_chars("#>-"),
    );

    for vehicle in &vehicles {
        pb.set_message(vehicle.slug().to_string());
        wiki::write_vehicle_page(out_dir, vehicle)
            .context_with(|| format!("Failed to write wiki page for {}", vehicle.key()))?;
        pb.inc(1);
    }
    pb.finish_with_message("Done");

    info!("wrote {} pages to {}", vehicles.len(), out_dir.display());
    Ok(())
}

fn main() -> Result<(), Report> {
    let args = Args::parse();
    init_logging(args.verbose);

    let game = GameData::open(&args.root);

    match args.command {
        Command::Vehicles { out } => {
            let vehicles = game
                .vehicles(&SlugOverrides::default())
                .context("Failed to extract vehicles")?;
            write_pretty_json(&out, &vehicles).context("Failed to write vehicles")?;
            info!("wrote {} vehicles to {}", vehicles.len(), out.display());
        }
        Command::VehicleNames { out } => {
            let names = game
                .vehicle_names()
                .context("Failed to resolve vehicle names")?;
            write_pretty_json(&out, &names).context("Failed to write vehicle names")?;
            info!("wrote {} vehicle names to {}", names.len(), out.display());
        }
        Command::Cargo {
            keys_out,
            metadata_out,
        } => {
            let maps = CargoMaps::new(game.cargo().context("Failed to extract cargo")?);
            write_pretty_json(&keys_out, &maps.keys_by_type)
                .context_with(|| format!("Failed to write {}", keys_out.display()))?;
            write_pretty_json(&metadata_out, &maps.metadata)
                .context_with(|| format!("Failed to write {}", metadata_out.display()))?;
            info!(
                "wrote {} cargo types and {} cargo rows",
                maps.keys_by_type.len(),
                maps.metadata.len()
            );
        }
        Command::CargoNames { out } => {
            let names = game.cargo_names().context("Failed to resolve cargo names")?;
            write_pretty_json(&out, &names).context("Failed to write cargo names")?;
            info!("wrote {} cargo names to {}", names.len(), out.display());
        }
        Command::CargoTypeNames {
            out,
            prune_duplicates,
        } => {
            let mut names = game
                .cargo_type_names()
                .context("Failed to localize cargo types")?;
            if prune_duplicates {
                let removed: usize = names.values_mut().map(drop_english_duplicates).sum();
                info!("dropped {removed} translations identical to English");
            }
            write_pretty_json(&out, &names).context("Failed to write cargo type names")?;
            info!("wrote {} cargo types to {}", names.len(), out.display());
        }
        Command::Wiki { input, out_dir } => write_wiki_pages(&input, &out_dir)?,
        Command::WikiComparison { input, out } => {
            let vehicles = read_vehicles(&input)?;
            wiki::write_comparison_table(&out, &vehicles)
                .context_with(|| format!("Failed to write {}", out.display()))?;
            info!("wrote {} comparison rows to {}", vehicles.len(), out.display());
        }
    }

    Ok(())
}
