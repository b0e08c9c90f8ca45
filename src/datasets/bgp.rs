//! AS relationships and customer cones
//!
//! Relationships come from a CAIDA `as-rel` file (`a|b|rel[|source]`, where
//! `-1` means `a` is a provider of `b` and `0` means peers). Cones come from a
//! CAIDA `ppdc-ases` file (`asn member member ...`). An AS that only appears
//! in the relationships gets a cone derived from its customer links.

use crate::error::{Ip2AsError, Result};
use crate::sources::{open, DataLines};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info};

/// Business relationship between two ASes, as seen from the first one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// First AS sells transit to the second
    ProviderToCustomer,
    /// Settlement-free peers
    Peer,
}

/// Read-only relationship graph and customer cones
#[derive(Debug, Clone, Default)]
pub struct AsGraph {
    customers: HashMap<u32, BTreeSet<u32>>,
    providers: HashMap<u32, BTreeSet<u32>>,
    peers: HashMap<u32, BTreeSet<u32>>,
    cones: HashMap<u32, HashSet<u32>>,
}

impl AsGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from explicit cones, with no relationships
    pub fn from_cones<I, C>(cones: I) -> Self
    where
        I: IntoIterator<Item = (u32, C)>,
        C: IntoIterator<Item = u32>,
    {
        Self {
            cones: cones
                .into_iter()
                .map(|(asn, members)| (asn, members.into_iter().collect()))
                .collect(),
            ..Self::default()
        }
    }

    /// Load relationships and cones, deriving cones for ASes the cone file lacks
    pub fn load(rels_path: &Path, cone_path: &Path) -> Result<Self> {
        let mut graph = Self::new();
        graph.parse_relationships(open(rels_path)?, rels_path)?;
        graph.parse_cones(open(cone_path)?, cone_path)?;
        let derived = graph.derive_missing_cones();
        info!(
            "loaded {} ASes with relationships and {} cones ({} derived)",
            graph.relationship_asns().len(),
            graph.cones.len(),
            derived
        );
        Ok(graph)
    }

    /// Add relationship records from `reader`
    pub fn parse_relationships<R: BufRead>(&mut self, reader: R, path: &Path) -> Result<()> {
        for line in DataLines::new(reader) {
            let (line_number, line) = line.map_err(|e| Ip2AsError::io(path, e))?;
            let fields: Vec<&str> = line.split('|').collect();
            if fields.len() < 3 {
                return Err(Ip2AsError::parse(
                    path,
                    line_number,
                    format!("expected at least 3 '|'-separated fields, found {}", fields.len()),
                ));
            }
            let parse_asn = |s: &str| {
                s.parse::<u32>().map_err(|_| {
                    Ip2AsError::parse(path, line_number, format!("invalid AS number {s:?}"))
                })
            };
            let a = parse_asn(fields[0])?;
            let b = parse_asn(fields[1])?;
            let rel = match fields[2] {
                "-1" => Relationship::ProviderToCustomer,
                "0" => Relationship::Peer,
                other => {
                    return Err(Ip2AsError::parse(
                        path,
                        line_number,
                        format!("unknown relationship {other:?}"),
                    ))
                }
            };
            self.add_relationship(a, b, rel);
        }
        Ok(())
    }

    /// Add cone records from `reader`; a later record for the same AS replaces it
    pub fn parse_cones<R: BufRead>(&mut self, reader: R, path: &Path) -> Result<()> {
        for line in DataLines::new(reader) {
            let (line_number, line) = line.map_err(|e| Ip2AsError::io(path, e))?;
            let mut asns = line.split_whitespace().map(|s| {
                s.parse::<u32>().map_err(|_| {
                    Ip2AsError::parse(path, line_number, format!("invalid AS number {s:?}"))
                })
            });
            let Some(owner) = asns.next() else {
                continue;
            };
            let owner = owner?;
            let members = asns.collect::<Result<HashSet<u32>>>()?;
            self.cones.insert(owner, members);
        }
        Ok(())
    }

    /// Record one relationship
    pub fn add_relationship(&mut self, a: u32, b: u32, rel: Relationship) {
        match rel {
            Relationship::ProviderToCustomer => {
                self.customers.entry(a).or_default().insert(b);
                self.providers.entry(b).or_default().insert(a);
            }
            Relationship::Peer => {
                self.peers.entry(a).or_default().insert(b);
                self.peers.entry(b).or_default().insert(a);
            }
        }
    }

    /// Derive cones for every AS with relationships but no cone record.
    ///
    /// The derived cone is the AS plus everything reachable over
    /// provider-to-customer links. Returns how many cones were added.
    pub fn derive_missing_cones(&mut self) -> usize {
        let missing: Vec<u32> = self
            .relationship_asns()
            .into_iter()
            .filter(|asn| !self.cones.contains_key(asn))
            .collect();
        for &asn in &missing {
            let cone = self.customer_closure(asn);
            debug!("derived cone of size {} for AS{}", cone.len(), asn);
            self.cones.insert(asn, cone);
        }
        missing.len()
    }

    fn customer_closure(&self, asn: u32) -> HashSet<u32> {
        let mut cone = HashSet::from([asn]);
        let mut stack = vec![asn];
        while let Some(current) = stack.pop() {
            for &customer in self.customers.get(&current).into_iter().flatten() {
                if cone.insert(customer) {
                    stack.push(customer);
                }
            }
        }
        cone
    }

    fn relationship_asns(&self) -> BTreeSet<u32> {
        self.customers
            .keys()
            .chain(self.providers.keys())
            .chain(self.peers.keys())
            .copied()
            .collect()
    }

    /// Customer cone of `asn`, if known
    pub fn cone(&self, asn: u32) -> Option<&HashSet<u32>> {
        self.cones.get(&asn)
    }

    /// Whether `member` is in the customer cone of `owner`
    pub fn in_cone(&self, owner: u32, member: u32) -> bool {
        self.cones
            .get(&owner)
            .is_some_and(|cone| cone.contains(&member))
    }

    /// Size of the customer cone of `asn`; 0 when unknown
    pub fn cone_size(&self, asn: u32) -> usize {
        self.cones.get(&asn).map_or(0, HashSet::len)
    }

    /// Direct customers of `asn`
    pub fn customers(&self, asn: u32) -> impl Iterator<Item = u32> + '_ {
        self.customers.get(&asn).into_iter().flatten().copied()
    }

    /// Direct providers of `asn`
    pub fn providers(&self, asn: u32) -> impl Iterator<Item = u32> + '_ {
        self.providers.get(&asn).into_iter().flatten().copied()
    }

    /// Peers of `asn`
    pub fn peers(&self, asn: u32) -> impl Iterator<Item = u32> + '_ {
        self.peers.get(&asn).into_iter().flatten().copied()
    }
}
