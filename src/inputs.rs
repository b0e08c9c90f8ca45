//! Loading every input the table builder needs

use crate::config::BuildConfig;
use crate::datasets::{As2Org, AsGraph, ExchangePoints};
use crate::error::Result;
use crate::sources::{read_prefixes, read_rir, RegistryPrefix, RoutedPrefix};
use crate::table::{create_table, BuildStats, Ip2AsTable};
use std::path::PathBuf;
use tracing::info;

/// Paths of the six input files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFiles {
    /// Routing-table prefix-to-AS file
    pub prefixes: PathBuf,
    /// PeeringDB JSON dump
    pub peeringdb: PathBuf,
    /// Registry delegation file
    pub rir: PathBuf,
    /// AS relationships file
    pub rels: PathBuf,
    /// Customer cone file
    pub cone: PathBuf,
    /// AS-to-organization file
    pub as2org: PathBuf,
}

/// Every input, fully read into memory
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    /// Exchange-point prefixes
    pub exchange_points: ExchangePoints,
    /// Routing-table prefixes with origin tokens
    pub routed: Vec<RoutedPrefix>,
    /// Registry delegations
    pub registry: Vec<RegistryPrefix>,
    /// Relationships and customer cones
    pub graph: AsGraph,
    /// AS-to-organization mapping
    pub orgs: As2Org,
}

impl InputFiles {
    /// Read all inputs; any missing or malformed file aborts the load
    pub fn load(&self, config: &BuildConfig) -> Result<Inputs> {
        config.validate()?;
        let exchange_points = ExchangePoints::load(&self.peeringdb)?;
        let graph = AsGraph::load(&self.rels, &self.cone)?;
        let orgs = As2Org::load(&self.as2org)?;
        let routed = read_prefixes(&self.prefixes)?;
        let registry = read_rir(&self.rir, config)?;
        info!("all inputs loaded");
        Ok(Inputs {
            exchange_points,
            routed,
            registry,
            graph,
            orgs,
        })
    }
}

impl Inputs {
    /// Build the attribution table from these inputs
    pub fn build(&self, config: &BuildConfig) -> (Ip2AsTable, BuildStats) {
        create_table(self, config)
    }
}
