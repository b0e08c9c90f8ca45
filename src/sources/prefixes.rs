//! Reader for routing-table prefix-to-AS dumps (`<prefix> <origin-token>`)

use super::{open, parse_prefix, DataLines};
use crate::asn::OriginToken;
use crate::error::{Ip2AsError, Result};
use ipnet::IpNet;
use std::io::BufRead;
use std::path::Path;
use tracing::info;

/// A prefix together with its (possibly multi-origin) origin token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedPrefix {
    /// Announced prefix
    pub prefix: IpNet,
    /// Candidate origin ASes
    pub origin: OriginToken,
}

/// Read a two-field prefix file from disk
pub fn read_prefixes(path: &Path) -> Result<Vec<RoutedPrefix>> {
    let prefixes = parse_prefixes(open(path)?, path)?;
    info!("loaded {} prefixes from {}", prefixes.len(), path.display());
    Ok(prefixes)
}

/// Parse two-field prefix lines from `reader`.
///
/// Any line that is not exactly `<prefix> <token>` is an error; `path` is only
/// used to label it.
pub fn parse_prefixes<R: BufRead>(reader: R, path: &Path) -> Result<Vec<RoutedPrefix>> {
    let mut prefixes = Vec::new();
    for line in DataLines::new(reader) {
        let (line_number, line) = line.map_err(|e| Ip2AsError::io(path, e))?;
        prefixes.push(parse_line(&line).map_err(|msg| Ip2AsError::parse(path, line_number, msg))?);
    }
    Ok(prefixes)
}

pub(crate) fn parse_line(line: &str) -> std::result::Result<RoutedPrefix, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [prefix, token] = fields[..] else {
        return Err(format!("expected 2 fields, found {}", fields.len()));
    };
    let prefix = parse_prefix(prefix).ok_or_else(|| format!("invalid prefix {prefix:?}"))?;
    let origin = token.parse::<OriginToken>().map_err(|e| e.to_string())?;
    Ok(RoutedPrefix { prefix, origin })
}
