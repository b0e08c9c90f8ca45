//! Layered construction of the attribution table
//!
//! Layers are applied in fixed priority order: private reservation,
//! exchange points, routing origins, registry delegations. Each layer is
//! first filtered against the table as it stands before the layer starts;
//! a prefix that already has a best match (equal or covering) is dropped.
//! Only then are the survivors inserted, so a layer never shadows its own
//! prefixes and never overrides an earlier layer.

use super::{Ip2AsTable, Layer, TableEntry};
use crate::asn::{resolve_origin_with_rule, select_registry_origin, Attribution, Rule};
use crate::config::BuildConfig;
use crate::inputs::Inputs;
use ipnet::IpNet;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Counts for one input layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayerStats {
    /// Prefixes added to the table
    pub inserted: usize,
    /// Prefixes dropped because an earlier layer already covered them
    pub shadowed: usize,
}

/// Summary of a table build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Private and special-use blocks reserved
    pub reserved: usize,
    /// Exchange-point layer
    pub exchange_point: LayerStats,
    /// Routing layer
    pub routing: LayerStats,
    /// Registry layer
    pub registry: LayerStats,
    /// How many routing prefixes each disambiguation rule decided
    pub rules: BTreeMap<String, usize>,
}

/// Keep the items whose prefix has no best match in `table` yet
fn uncovered<T>(
    table: &Ip2AsTable,
    items: impl IntoIterator<Item = (IpNet, T)>,
) -> (Vec<(IpNet, T)>, usize) {
    let mut shadowed = 0;
    let kept = items
        .into_iter()
        .filter(|(prefix, _)| {
            let covered = table.is_covered(prefix);
            if covered {
                shadowed += 1;
            }
            !covered
        })
        .collect();
    (kept, shadowed)
}

fn insert_layer(
    table: &mut Ip2AsTable,
    layer: Layer,
    items: Vec<(IpNet, Attribution)>,
    shadowed: usize,
) -> LayerStats {
    let stats = LayerStats {
        inserted: items.len(),
        shadowed,
    };
    for (prefix, attribution) in items {
        table.insert(
            prefix,
            TableEntry {
                attribution,
                source: layer,
            },
        );
    }
    info!(
        "{:?} layer: {} prefixes inserted, {} already covered",
        layer, stats.inserted, stats.shadowed
    );
    stats
}

/// Build the attribution table from loaded inputs
pub fn create_table(inputs: &Inputs, config: &BuildConfig) -> (Ip2AsTable, BuildStats) {
    let mut table = Ip2AsTable::new();
    let mut stats = BuildStats::default();

    if config.reserve_private {
        stats.reserved = table.add_private();
        debug!("reserved {} private and special-use blocks", stats.reserved);
    }

    let (kept, shadowed) = uncovered(&table, inputs.exchange_points.iter());
    let items = kept
        .into_iter()
        .map(|(prefix, ix_id)| (prefix, Attribution::ExchangePoint(ix_id)))
        .collect();
    stats.exchange_point = insert_layer(&mut table, Layer::ExchangePoint, items, shadowed);

    let (kept, shadowed) = uncovered(
        &table,
        inputs.routed.iter().map(|routed| (routed.prefix, &routed.origin)),
    );
    let items = kept
        .into_iter()
        .map(|(prefix, origin)| {
            let resolution = resolve_origin_with_rule(origin, &inputs.orgs, &inputs.graph);
            if resolution.rule != Rule::SingleCandidate {
                *stats.rules.entry(format!("{:?}", resolution.rule)).or_default() += 1;
            }
            (prefix, Attribution::Public(resolution.asn))
        })
        .collect();
    stats.routing = insert_layer(&mut table, Layer::Routing, items, shadowed);

    let (kept, shadowed) = uncovered(
        &table,
        inputs
            .registry
            .iter()
            .map(|delegation| (delegation.prefix, &delegation.candidates)),
    );
    let items = kept
        .into_iter()
        .map(|(prefix, candidates)| {
            let asn = select_registry_origin(candidates, &inputs.graph);
            (prefix, Attribution::Public(asn))
        })
        .collect();
    stats.registry = insert_layer(&mut table, Layer::Registry, items, shadowed);

    info!("table has {} prefixes", table.len());
    (table, stats)
}
