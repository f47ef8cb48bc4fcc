/// String keys and enum literals used by the exported data assets
pub mod keys;
/// Localization tables and display-name resolution
pub mod translations;
/// Typed records for data tables and asset files
pub mod types;
