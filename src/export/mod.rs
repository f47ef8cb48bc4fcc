/// DokuWiki rendering of normalized vehicles
pub mod wiki;
