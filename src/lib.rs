/// Whole-table extraction drivers
pub mod batch;
/// Cargo definitions and the lookup maps built from them
pub mod cargo;
/// Utilities for reading the exported content tree
pub mod data;
/// Typed views and constants for Motor Town's exported data assets
pub mod data_asset;
/// Error definitions
pub mod error;
/// Renderers that turn extracted data into wiki markup
pub mod export;
/// Utilities for opening an exported Motor Town content tree.
pub mod game_data;
/// Generic wrapper for values that may or may not match a known variant.
pub mod recognized;
/// Output file helpers
pub mod serialization;
/// URL-safe identifiers for vehicle pages
pub mod slug;
/// Normalized vehicles and the derivations behind them
pub mod vehicle;
