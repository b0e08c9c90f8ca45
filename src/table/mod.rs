//! Longest-prefix-match table of prefix attributions

pub mod builder;

use crate::asn::Attribution;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use prefix_trie::PrefixMap;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

pub use builder::{create_table, BuildStats, LayerStats};

/// Input layer an entry came from, in decreasing priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Private and special-use reservation
    Reserved,
    /// Exchange-point registry
    ExchangePoint,
    /// Routing-table origins
    Routing,
    /// Registry delegations
    Registry,
}

/// Value stored for each prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    /// Who the prefix is attributed to
    pub attribution: Attribution,
    /// Layer that inserted it
    pub source: Layer,
}

/// Blocks attributed to private address space
const PRIVATE_BLOCKS: &[&str] = &[
    "10.0.0.0/8",
    "100.64.0.0/10",
    "127.0.0.0/8",
    "169.254.0.0/16",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "::1/128",
    "fc00::/7",
    "fe80::/10",
];

/// Blocks attributed to reserved or special-use space
const RESERVED_BLOCKS: &[&str] = &[
    "0.0.0.0/8",
    "192.0.0.0/24",
    "192.0.2.0/24",
    "198.18.0.0/15",
    "198.51.100.0/24",
    "203.0.113.0/24",
    "224.0.0.0/4",
    "240.0.0.0/4",
    "::/128",
    "2001:db8::/32",
    "ff00::/8",
];

/// Prefix-to-attribution table with longest-prefix-match lookups
pub struct Ip2AsTable {
    v4: PrefixMap<Ipv4Net, TableEntry>,
    v6: PrefixMap<Ipv6Net, TableEntry>,
    len: usize,
}

impl Ip2AsTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            v4: PrefixMap::new(),
            v6: PrefixMap::new(),
            len: 0,
        }
    }

    /// Insert or replace the entry for `prefix`; host bits are ignored
    pub fn insert(&mut self, prefix: IpNet, entry: TableEntry) -> Option<TableEntry> {
        let previous = match prefix.trunc() {
            IpNet::V4(net) => self.v4.insert(net, entry),
            IpNet::V6(net) => self.v6.insert(net, entry),
        };
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Longest stored prefix covering `prefix` (an equal prefix counts)
    pub fn search_best_prefix(&self, prefix: &IpNet) -> Option<(IpNet, &TableEntry)> {
        match prefix.trunc() {
            IpNet::V4(net) => self
                .v4
                .get_lpm(&net)
                .map(|(p, entry)| (IpNet::V4(*p), entry)),
            IpNet::V6(net) => self
                .v6
                .get_lpm(&net)
                .map(|(p, entry)| (IpNet::V6(*p), entry)),
        }
    }

    /// Longest stored prefix containing `addr`
    pub fn lookup_addr(&self, addr: IpAddr) -> Option<(IpNet, &TableEntry)> {
        let max_len = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        let host = IpNet::new(addr, max_len).ok()?;
        self.search_best_prefix(&host)
    }

    /// Whether some stored prefix covers `prefix`
    pub fn is_covered(&self, prefix: &IpNet) -> bool {
        self.search_best_prefix(prefix).is_some()
    }

    /// Reserve private and special-use blocks.
    ///
    /// Returns the number of blocks added.
    pub fn add_private(&mut self) -> usize {
        let blocks = PRIVATE_BLOCKS
            .iter()
            .map(|block| (block, Attribution::Private))
            .chain(RESERVED_BLOCKS.iter().map(|block| (block, Attribution::Reserved)));
        let mut added = 0;
        for (block, attribution) in blocks {
            if let Ok(prefix) = block.parse::<IpNet>() {
                self.insert(
                    prefix,
                    TableEntry {
                        attribution,
                        source: Layer::Reserved,
                    },
                );
                added += 1;
            }
        }
        added
    }

    /// All entries, IPv4 before IPv6, each in trie order
    pub fn entries(&self) -> impl Iterator<Item = (IpNet, &TableEntry)> + '_ {
        self.v4
            .iter()
            .map(|(p, entry)| (IpNet::V4(*p), entry))
            .chain(self.v6.iter().map(|(p, entry)| (IpNet::V6(*p), entry)))
    }

    /// Number of stored prefixes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Ip2AsTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ip2AsTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ip2AsTable").field("len", &self.len).finish()
    }
}
