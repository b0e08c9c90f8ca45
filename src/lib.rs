//! ip2as - IP prefix to AS attribution tables
//!
//! This library merges exchange-point, routing-table and registry prefix
//! data into a single longest-prefix-match table that attributes every
//! covered prefix to exactly one AS (or exchange point, or private space).

pub mod asn;
pub mod config;
pub mod datasets;
pub mod error;
pub mod inputs;
pub mod output;
pub mod sources;
pub mod table;

// Re-export core types for library users
pub use asn::{is_valid_asn, resolve_origin, select_registry_origin, Attribution, OriginToken};
pub use config::{BuildConfig, BuildConfigBuilder, RirFormat};
pub use datasets::{As2Org, AsGraph, ExchangePoints};
pub use error::{Ip2AsError, Result};
pub use inputs::{InputFiles, Inputs};
pub use table::{create_table, BuildStats, Ip2AsTable, Layer, TableEntry};
