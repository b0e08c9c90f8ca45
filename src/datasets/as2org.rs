//! AS-to-organization mapping (CAIDA as2org format)
//!
//! The file has two kinds of records sharing one `|`-separated layout:
//!
//! ```text
//! # format:org_id|changed|org_name|country|source
//! LVLT-ARIN|20120130|Level 3 Parent, LLC|US|ARIN
//! # format:aut|changed|aut_name|org_id|opaque_id|source
//! 3356|20120130|LEVEL3|LVLT-ARIN||ARIN
//! ```

use crate::error::{Ip2AsError, Result};
use crate::sources::{open, DataLines};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use tracing::info;

/// Organization identity of an AS.
///
/// An AS missing from the mapping is its own organization, so two unmapped
/// ASes never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrgKey<'a> {
    /// Mapped to an organization id
    Org(&'a str),
    /// Not present in the mapping
    Unmapped(u32),
}

/// Read-only AS-to-organization lookup
#[derive(Debug, Clone, Default)]
pub struct As2Org {
    asn_org: HashMap<u32, String>,
    org_names: HashMap<String, String>,
}

impl As2Org {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from `(asn, org_id)` pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        Self {
            asn_org: pairs.into_iter().map(|(asn, org)| (asn, org.into())).collect(),
            org_names: HashMap::new(),
        }
    }

    /// Load the mapping from disk
    pub fn load(path: &Path) -> Result<Self> {
        let mapping = Self::parse(open(path)?, path)?;
        info!(
            "loaded {} AS and {} organization records from {}",
            mapping.asn_org.len(),
            mapping.org_names.len(),
            path.display()
        );
        Ok(mapping)
    }

    /// Parse as2org records from `reader`
    pub fn parse<R: BufRead>(reader: R, path: &Path) -> Result<Self> {
        let mut mapping = Self::new();
        for line in DataLines::new(reader) {
            let (line_number, line) = line.map_err(|e| Ip2AsError::io(path, e))?;
            let fields: Vec<&str> = line.split('|').collect();
            match fields.len() {
                5 => {
                    mapping
                        .org_names
                        .insert(fields[0].to_string(), fields[2].to_string());
                }
                6 => {
                    let asn = fields[0].parse::<u32>().map_err(|_| {
                        Ip2AsError::parse(path, line_number, format!("invalid AS number {:?}", fields[0]))
                    })?;
                    mapping.asn_org.insert(asn, fields[3].to_string());
                }
                n => {
                    return Err(Ip2AsError::parse(
                        path,
                        line_number,
                        format!("expected 5 or 6 '|'-separated fields, found {n}"),
                    ))
                }
            }
        }
        Ok(mapping)
    }

    /// Organization identity of `asn`
    pub fn org(&self, asn: u32) -> OrgKey<'_> {
        match self.asn_org.get(&asn) {
            Some(org) => OrgKey::Org(org),
            None => OrgKey::Unmapped(asn),
        }
    }

    /// Human-readable name of an organization id, if known
    pub fn org_name(&self, org_id: &str) -> Option<&str> {
        self.org_names.get(org_id).map(String::as_str)
    }

    /// Number of mapped AS numbers
    pub fn len(&self) -> usize {
        self.asn_org.len()
    }

    /// Whether no AS is mapped
    pub fn is_empty(&self) -> bool {
        self.asn_org.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
# format:org_id|changed|org_name|country|source
LVLT-ARIN|20120130|Level 3 Parent, LLC|US|ARIN
# format:aut|changed|aut_name|org_id|opaque_id|source
3356|20120130|LEVEL3|LVLT-ARIN||ARIN
3549|20120130|LVLT-3549|LVLT-ARIN||ARIN
174|20120130|COGENT-174|COGC-ARIN||ARIN
";

    #[test]
    fn test_parse_sample() {
        let mapping = As2Org::parse(Cursor::new(SAMPLE), Path::new("as2org.txt")).unwrap();
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.org(3356), OrgKey::Org("LVLT-ARIN"));
        assert_eq!(mapping.org(3356), mapping.org(3549));
        assert_ne!(mapping.org(3356), mapping.org(174));
        assert_eq!(mapping.org_name("LVLT-ARIN"), Some("Level 3 Parent, LLC"));
        assert_eq!(mapping.org_name("COGC-ARIN"), None);
    }

    #[test]
    fn test_unmapped_asns_are_distinct() {
        let mapping = As2Org::new();
        assert!(mapping.is_empty());
        assert_eq!(mapping.org(1), OrgKey::Unmapped(1));
        assert_ne!(mapping.org(1), mapping.org(2));
    }

    #[test]
    fn test_malformed_records() {
        let err = As2Org::parse(Cursor::new("x|y|z\n"), Path::new("as2org.txt")).unwrap_err();
        assert!(matches!(err, Ip2AsError::Parse { line: 1, .. }));

        let err = As2Org::parse(
            Cursor::new("AS3356|20120130|LEVEL3|LVLT-ARIN||ARIN\n"),
            Path::new("as2org.txt"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid AS number"));
    }

    #[test]
    fn test_from_pairs() {
        let mapping = As2Org::from_pairs([(64500, "OrgX"), (64501, "OrgX")]);
        assert_eq!(mapping.org(64500), mapping.org(64501));
    }
}
