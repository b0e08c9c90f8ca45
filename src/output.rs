//! Writing the finished table

use crate::table::{Ip2AsTable, Layer};
use serde::Serialize;
use std::io::Write;

/// JSON form of one table entry
#[derive(Debug, Serialize)]
struct JsonEntry {
    prefix: String,
    asn: i64,
    source: Layer,
}

/// Write `<prefix> <asn>` lines, with the legacy signed AS encoding
pub fn write_text<W: Write>(table: &Ip2AsTable, mut out: W) -> std::io::Result<()> {
    for (prefix, entry) in table.entries() {
        writeln!(out, "{} {}", prefix, entry.attribution.legacy_value())?;
    }
    out.flush()
}

/// Write the table as one JSON array of `{prefix, asn, source}` objects
pub fn write_json<W: Write>(table: &Ip2AsTable, mut out: W) -> std::io::Result<()> {
    let entries: Vec<JsonEntry> = table
        .entries()
        .map(|(prefix, entry)| JsonEntry {
            prefix: prefix.to_string(),
            asn: entry.attribution.legacy_value(),
            source: entry.source,
        })
        .collect();
    serde_json::to_writer_pretty(&mut out, &entries)?;
    writeln!(out)?;
    out.flush()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::asn::Attribution;
    use crate::table::TableEntry;

    fn sample() -> Ip2AsTable {
        let mut table = Ip2AsTable::new();
        table.insert(
            "185.1.0.0/24".parse().unwrap(),
            TableEntry {
                attribution: Attribution::ExchangePoint(3),
                source: Layer::ExchangePoint,
            },
        );
        table.insert(
            "2606:4700::/32".parse().unwrap(),
            TableEntry {
                attribution: Attribution::Public(13335),
                source: Layer::Routing,
            },
        );
        table
    }

    #[test]
    fn test_write_text() {
        let mut buf = Vec::new();
        write_text(&sample(), &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "185.1.0.0/24 -103\n2606:4700::/32 13335\n"
        );
    }

    #[test]
    fn test_write_json() {
        let mut buf = Vec::new();
        write_json(&sample(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["prefix"], "185.1.0.0/24");
        assert_eq!(entries[0]["asn"], -103);
        assert_eq!(entries[0]["source"], "exchangepoint");
        assert_eq!(entries[1]["source"], "routing");
    }
}
