//! Parser for multi-origin AS tokens
//!
//! Routing dumps encode the origin of a prefix as a single field. Multiple
//! origins are separated by `_`, and an AS confederation set is written as
//! `{a,b,c}`. For example `{64500,64501}_64502` has three candidates.

use crate::error::{Ip2AsError, Result};
use std::str::FromStr;

/// An ordered, non-empty list of candidate origin AS numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OriginToken {
    candidates: Vec<u32>,
}

impl OriginToken {
    /// Build a token from candidates that were already parsed.
    ///
    /// Returns `None` when `candidates` is empty.
    pub fn from_candidates(candidates: Vec<u32>) -> Option<Self> {
        if candidates.is_empty() {
            None
        } else {
            Some(Self { candidates })
        }
    }

    /// Candidates in the order they appeared
    pub fn candidates(&self) -> &[u32] {
        &self.candidates
    }

    /// First candidate in original order
    pub fn first(&self) -> u32 {
        self.candidates[0]
    }

    /// Whether the token names a single origin
    pub fn is_single(&self) -> bool {
        self.candidates.len() == 1
    }
}

impl FromStr for OriginToken {
    type Err = Ip2AsError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Ip2AsError::InvalidToken(s.to_string());
        let mut candidates = Vec::new();
        for segment in s.split('_') {
            let members = match segment.strip_prefix('{') {
                Some(rest) => rest.strip_suffix('}').ok_or_else(invalid)?,
                None if segment.contains('}') => return Err(invalid()),
                // A bare comma list is a set written without braces.
                None => segment,
            };
            for member in members.split(',') {
                let asn = member.trim().parse::<u32>().map_err(|_| invalid())?;
                candidates.push(asn);
            }
        }
        Self::from_candidates(candidates).ok_or_else(invalid)
    }
}

impl std::fmt::Display for OriginToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.candidates.iter().map(u32::to_string).collect();
        write!(f, "{}", parts.join("_"))
    }
}
