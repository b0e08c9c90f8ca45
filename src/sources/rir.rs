//! Reader for registry delegation files
//!
//! Two layouts are understood:
//!
//! - delegation records, `<address> <prefix-length> <as-set>`, which are
//!   normalized: AS numbers failing [`is_valid_asn`] are dropped, records
//!   with no valid AS left are skipped, and delegations more specific than
//!   the configured length cap are skipped
//! - plain `<prefix> <origin-token>` lines, taken as-is
//!
//! Which one applies is chosen by [`RirFormat`]; `Auto` decides per line by
//! field count.

use super::prefixes::parse_line;
use super::{open, DataLines};
use crate::asn::{is_valid_asn, OriginToken};
use crate::config::{BuildConfig, RirFormat};
use crate::error::{Ip2AsError, Result};
use ipnet::IpNet;
use std::io::BufRead;
use std::net::IpAddr;
use std::path::Path;
use tracing::{debug, info};

/// A registry-delegated prefix with its candidate holder ASes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryPrefix {
    /// Delegated block
    pub prefix: IpNet,
    /// Candidate AS numbers, in file order
    pub candidates: OriginToken,
}

/// Outcome of normalizing one delegation record
#[derive(Debug, PartialEq, Eq)]
enum Delegation {
    Keep(RegistryPrefix),
    NoValidAsn,
    TooSpecific,
}

/// Read a registry file from disk
pub fn read_rir(path: &Path, config: &BuildConfig) -> Result<Vec<RegistryPrefix>> {
    let prefixes = parse_rir(open(path)?, path, config)?;
    info!("loaded {} registry prefixes from {}", prefixes.len(), path.display());
    Ok(prefixes)
}

/// Parse registry lines from `reader` according to `config.rir_format`
pub fn parse_rir<R: BufRead>(
    reader: R,
    path: &Path,
    config: &BuildConfig,
) -> Result<Vec<RegistryPrefix>> {
    let mut prefixes = Vec::new();
    let mut no_valid_asn = 0usize;
    let mut too_specific = 0usize;

    for line in DataLines::new(reader) {
        let (line_number, line) = line.map_err(|e| Ip2AsError::io(path, e))?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        let delegation = match (config.rir_format, fields.len()) {
            (RirFormat::Delegation, _) | (RirFormat::Auto, 3) => {
                normalize_delegation(&fields, config)
            }
            (RirFormat::Prefix, _) | (RirFormat::Auto, 2) => parse_line(&line).map(|routed| {
                Delegation::Keep(RegistryPrefix {
                    prefix: routed.prefix,
                    candidates: routed.origin,
                })
            }),
            (RirFormat::Auto, n) => Err(format!("expected 2 or 3 fields, found {n}")),
        }
        .map_err(|msg| Ip2AsError::parse(path, line_number, msg))?;

        match delegation {
            Delegation::Keep(prefix) => prefixes.push(prefix),
            Delegation::NoValidAsn => {
                debug!("{}:{}: no valid AS in {:?}", path.display(), line_number, line);
                no_valid_asn += 1;
            }
            Delegation::TooSpecific => {
                debug!("{}:{}: delegation too specific: {:?}", path.display(), line_number, line);
                too_specific += 1;
            }
        }
    }

    if no_valid_asn + too_specific > 0 {
        info!(
            "skipped {} delegations without a valid AS and {} more specific than /{} (v4) or /{} (v6)",
            no_valid_asn, too_specific, config.ipv4_max_prefix_len, config.ipv6_max_prefix_len
        );
    }
    Ok(prefixes)
}

fn normalize_delegation(
    fields: &[&str],
    config: &BuildConfig,
) -> std::result::Result<Delegation, String> {
    let [address, length, as_set] = fields[..] else {
        return Err(format!("expected 3 fields, found {}", fields.len()));
    };
    let address: IpAddr = address
        .parse()
        .map_err(|_| format!("invalid address {address:?}"))?;
    let length: u8 = length
        .parse()
        .map_err(|_| format!("invalid prefix length {length:?}"))?;

    let valid: Vec<u32> = as_set
        .split(['_', ','])
        .map(|member| member.trim_matches(|c| c == '{' || c == '}'))
        .filter_map(|member| member.parse::<u32>().ok())
        .filter(|&asn| is_valid_asn(asn))
        .collect();
    let Some(candidates) = OriginToken::from_candidates(valid) else {
        return Ok(Delegation::NoValidAsn);
    };

    let cap = match address {
        IpAddr::V4(_) => config.ipv4_max_prefix_len,
        IpAddr::V6(_) => config.ipv6_max_prefix_len,
    };
    if length > cap {
        return Ok(Delegation::TooSpecific);
    }

    let prefix = IpNet::new(address, length)
        .map_err(|_| format!("prefix length {length} out of range for {address}"))?
        .trunc();
    Ok(Delegation::Keep(RegistryPrefix { prefix, candidates }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_with(input: &str, config: &BuildConfig) -> Result<Vec<RegistryPrefix>> {
        parse_rir(Cursor::new(input), Path::new("delegated.txt"), config)
    }

    fn parse(input: &str) -> Result<Vec<RegistryPrefix>> {
        parse_with(input, &BuildConfig::default())
    }

    #[test]
    fn test_delegation_records_become_cidrs() {
        let prefixes = parse("# rir\n41.0.0.0 11 36864\n2c0f:f000:: 32 37100\n").unwrap();
        assert_eq!(prefixes.len(), 2);
        assert_eq!(prefixes[0].prefix, "41.0.0.0/11".parse::<IpNet>().unwrap());
        assert_eq!(prefixes[0].candidates.candidates(), &[36864]);
        assert_eq!(prefixes[1].prefix, "2c0f:f000::/32".parse::<IpNet>().unwrap());
    }

    #[test]
    fn test_invalid_asns_filtered() {
        let prefixes = parse("5.0.0.0 16 23456_3320_64512_0\n").unwrap();
        assert_eq!(prefixes.len(), 1);
        assert_eq!(prefixes[0].candidates.candidates(), &[3320]);
    }

    #[test]
    fn test_entry_without_valid_asn_skipped() {
        let prefixes = parse("5.0.0.0 16 23456_65000\n6.0.0.0 8 junk\n7.0.0.0 8 668\n").unwrap();
        assert_eq!(prefixes.len(), 1);
        assert_eq!(prefixes[0].prefix, "7.0.0.0/8".parse::<IpNet>().unwrap());
    }

    #[test]
    fn test_length_cap() {
        let prefixes = parse(
            "1.0.0.0 24 13335\n1.0.1.0 25 13335\n2001:db8:: 48 3333\n2001:db8:1:: 49 3333\n",
        )
        .unwrap();
        let kept: Vec<String> = prefixes.iter().map(|p| p.prefix.to_string()).collect();
        assert_eq!(kept, vec!["1.0.0.0/24", "2001:db8::/48"]);
    }

    #[test]
    fn test_custom_length_cap() {
        let config = BuildConfig::builder().ipv4_max_prefix_len(16).build().unwrap();
        let prefixes = parse_with("1.0.0.0 16 13335\n1.0.0.0 20 13335\n", &config).unwrap();
        assert_eq!(prefixes.len(), 1);
    }

    #[test]
    fn test_two_field_lines_in_auto_mode() {
        let prefixes = parse("1.0.0.0/24 13335_64512\n2.0.0.0 8 3215\n").unwrap();
        assert_eq!(prefixes.len(), 2);
        // plain lines are not validated
        assert_eq!(prefixes[0].candidates.candidates(), &[13335, 64512]);
    }

    #[test]
    fn test_prefix_format_rejects_delegation_lines() {
        let config = BuildConfig::builder()
            .rir_format(RirFormat::Prefix)
            .build()
            .unwrap();
        let err = parse_with("2.0.0.0 8 3215\n", &config).unwrap_err();
        assert!(matches!(err, Ip2AsError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_malformed_delegation_is_fatal() {
        assert!(matches!(
            parse("not.an.ip 8 3215\n").unwrap_err(),
            Ip2AsError::Parse { line: 1, .. }
        ));
        assert!(matches!(
            parse("2.0.0.0 x 3215\n").unwrap_err(),
            Ip2AsError::Parse { line: 1, .. }
        ));
        assert!(matches!(
            parse("2.0.0.0 8 3215 extra stuff\n").unwrap_err(),
            Ip2AsError::Parse { line: 1, .. }
        ));
    }
}
