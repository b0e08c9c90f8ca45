//! Line-oriented input readers
//!
//! Every input is a plain or gzip-compressed text file. Readers skip blank
//! lines and `#` comments and hand out 1-based line numbers for errors.

pub mod prefixes;
pub mod rir;

use crate::error::{Ip2AsError, Result};
use flate2::read::GzDecoder;
use ipnet::IpNet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

pub use prefixes::{parse_prefixes, read_prefixes, RoutedPrefix};
pub use rir::{parse_rir, read_rir, RegistryPrefix};

/// Open `path` for buffered reading, decompressing `.gz` files on the fly
pub fn open(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| Ip2AsError::io(path, e))?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        debug!("reading {} as gzip", path.display());
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Iterator over the data lines of a reader.
///
/// Yields `(line_number, trimmed_line)`, skipping blank and `#` lines.
pub struct DataLines<R> {
    reader: R,
    line_number: usize,
    buf: String,
}

impl<R: BufRead> DataLines<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for DataLines<R> {
    type Item = std::io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let line = self.buf.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    return Some(Ok((self.line_number, line.to_string())));
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Parse a CIDR prefix, truncating any host bits
pub fn parse_prefix(s: &str) -> Option<IpNet> {
    let net: IpNet = s.parse().ok()?;
    let trunc = net.trunc();
    if trunc != net {
        debug!("prefix {} has host bits set, using {}", net, trunc);
    }
    Some(trunc)
}
