//! Exchange-point prefixes from a PeeringDB dump

use crate::error::{Ip2AsError, Result};
use crate::sources::{open, parse_prefix};
use ipnet::IpNet;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct Table<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct IxPrefix {
    prefix: String,
    ixlan_id: u32,
}

#[derive(Debug, Deserialize)]
struct IxLan {
    id: u32,
    ix_id: u32,
}

#[derive(Debug, Deserialize)]
struct Dump {
    ixpfx: Table<IxPrefix>,
    ixlan: Table<IxLan>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Dump(Dump),
    Flat(BTreeMap<String, u32>),
}

/// Prefixes assigned to exchange-point fabrics, keyed by PeeringDB `ix_id`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangePoints {
    prefixes: BTreeMap<IpNet, u32>,
}

impl ExchangePoints {
    /// Build from `(prefix, ix_id)` pairs; the first id seen for a prefix is kept
    pub fn from_pairs<I: IntoIterator<Item = (IpNet, u32)>>(pairs: I) -> Self {
        let mut prefixes = BTreeMap::new();
        for (prefix, ix_id) in pairs {
            prefixes.entry(prefix.trunc()).or_insert(ix_id);
        }
        Self { prefixes }
    }

    /// Load the registry from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let points = Self::parse(open(path)?, path)?;
        info!(
            "loaded {} exchange-point prefixes from {}",
            points.len(),
            path.display()
        );
        Ok(points)
    }

    /// Parse either a full PeeringDB dump or a flat `{"prefix": ix_id}` object
    pub fn parse<R: BufRead>(reader: R, path: &Path) -> Result<Self> {
        let document: Document = serde_json::from_reader(reader).map_err(|source| Ip2AsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: Vec<(String, u32)> = match document {
            Document::Flat(map) => map.into_iter().collect(),
            Document::Dump(dump) => {
                let ixlans: HashMap<u32, u32> =
                    dump.ixlan.data.iter().map(|lan| (lan.id, lan.ix_id)).collect();
                dump.ixpfx
                    .data
                    .into_iter()
                    .filter_map(|pfx| match ixlans.get(&pfx.ixlan_id) {
                        Some(&ix_id) => Some((pfx.prefix, ix_id)),
                        None => {
                            warn!("prefix {} refers to unknown ixlan {}", pfx.prefix, pfx.ixlan_id);
                            None
                        }
                    })
                    .collect()
            }
        };

        let pairs = raw.into_iter().filter_map(|(prefix, ix_id)| match parse_prefix(&prefix) {
            Some(net) => Some((net, ix_id)),
            None => {
                warn!("skipping invalid exchange-point prefix {:?}", prefix);
                None
            }
        });
        Ok(Self::from_pairs(pairs))
    }

    /// Prefixes and their exchange ids, in prefix order
    pub fn iter(&self) -> impl Iterator<Item = (IpNet, u32)> + '_ {
        self.prefixes.iter().map(|(&prefix, &ix_id)| (prefix, ix_id))
    }

    /// Number of prefixes
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether there are no prefixes
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(input: &str) -> Result<ExchangePoints> {
        ExchangePoints::parse(Cursor::new(input), Path::new("peeringdb.json"))
    }

    #[test]
    fn test_parse_dump() {
        let json = r#"{
            "ixlan": {"data": [{"id": 1, "ix_id": 26, "name": ""}, {"id": 2, "ix_id": 31}]},
            "ixpfx": {"data": [
                {"id": 10, "ixlan_id": 1, "protocol": "IPv4", "prefix": "80.249.208.0/21"},
                {"id": 11, "ixlan_id": 1, "protocol": "IPv6", "prefix": "2001:7f8:1::/64"},
                {"id": 12, "ixlan_id": 2, "protocol": "IPv4", "prefix": "206.126.236.0/22"},
                {"id": 13, "ixlan_id": 9, "protocol": "IPv4", "prefix": "192.0.2.0/24"}
            ]},
            "net": {"data": []}
        }"#;
        let points = parse(json).unwrap();
        let pairs: Vec<(String, u32)> = points.iter().map(|(p, id)| (p.to_string(), id)).collect();
        assert_eq!(
            pairs,
            vec![
                ("80.249.208.0/21".to_string(), 26),
                ("206.126.236.0/22".to_string(), 31),
                ("2001:7f8:1::/64".to_string(), 26),
            ]
        );
    }

    #[test]
    fn test_parse_flat_object() {
        let points = parse(r#"{"80.249.208.0/21": 26, "not a prefix": 3}"#).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(
            points.iter().next().unwrap(),
            ("80.249.208.0/21".parse().unwrap(), 26)
        );
    }

    #[test]
    fn test_invalid_json() {
        let err = parse("[1, 2").unwrap_err();
        assert!(matches!(err, Ip2AsError::Json { .. }));

        let err = parse(r#"{"ixpfx": "missing ixlan"}"#).unwrap_err();
        assert!(matches!(err, Ip2AsError::Json { .. }));
    }

    #[test]
    fn test_from_pairs_keeps_first() {
        let prefix: IpNet = "185.1.0.0/24".parse().unwrap();
        let points = ExchangePoints::from_pairs([(prefix, 1), (prefix, 2)]);
        assert_eq!(points.iter().collect::<Vec<_>>(), vec![(prefix, 1)]);
    }
}
