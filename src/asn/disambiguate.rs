//! Choosing one origin AS out of several candidates
//!
//! Routing dumps can list several origins for one prefix (MOAS) or an AS
//! confederation set. [`resolve_origin`] reduces such a token to a single AS:
//!
//! 1. a single candidate is returned as-is
//! 2. if every candidate belongs to the same organization, the first one wins
//! 3. a candidate inside the customer cone of every other candidate wins
//!    (first such candidate in token order)
//! 4. otherwise the candidate with the largest customer cone wins, ties going
//!    to the smallest AS number
//! 5. with no cone data at all, the first candidate wins
//!
//! Registry delegations use the simpler [`select_registry_origin`], which
//! only compares cone sizes and breaks ties toward the *larger* AS number.

use super::OriginToken;
use crate::datasets::{As2Org, AsGraph};
use std::collections::HashSet;
use tracing::trace;

/// Which step of the resolution produced the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Only one candidate
    SingleCandidate,
    /// All candidates share an organization
    SameOrganization,
    /// Candidate sits in every other candidate's customer cone
    ConeContainment,
    /// Largest customer cone, smallest AS number on ties
    LargestCone,
    /// No usable cone data; first candidate
    FirstCandidate,
}

/// Result of resolving an origin token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Chosen AS number
    pub asn: u32,
    /// Rule that chose it
    pub rule: Rule,
}

/// Resolve a routing origin token to exactly one AS number
pub fn resolve_origin(token: &OriginToken, orgs: &As2Org, graph: &AsGraph) -> u32 {
    resolve_origin_with_rule(token, orgs, graph).asn
}

/// Like [`resolve_origin`], also reporting which rule decided
pub fn resolve_origin_with_rule(
    token: &OriginToken,
    orgs: &As2Org,
    graph: &AsGraph,
) -> Resolution {
    let resolution = resolve(token, orgs, graph);
    if !token.is_single() {
        trace!("{} -> AS{} ({:?})", token, resolution.asn, resolution.rule);
    }
    resolution
}

fn resolve(token: &OriginToken, orgs: &As2Org, graph: &AsGraph) -> Resolution {
    let candidates = token.candidates();
    let first = Resolution {
        asn: token.first(),
        rule: Rule::FirstCandidate,
    };

    if token.is_single() {
        return Resolution {
            rule: Rule::SingleCandidate,
            ..first
        };
    }

    let distinct_orgs: HashSet<_> = candidates.iter().map(|&asn| orgs.org(asn)).collect();
    if distinct_orgs.len() == 1 {
        return Resolution {
            rule: Rule::SameOrganization,
            ..first
        };
    }

    let contained = candidates.iter().copied().find(|&asn| {
        candidates
            .iter()
            .filter(|&&other| other != asn)
            .all(|&other| graph.in_cone(other, asn))
    });
    if let Some(asn) = contained {
        return Resolution {
            asn,
            rule: Rule::ConeContainment,
        };
    }

    let largest = candidates
        .iter()
        .map(|&asn| graph.cone_size(asn))
        .max()
        .unwrap_or(0);
    if largest == 0 {
        return first;
    }
    candidates
        .iter()
        .copied()
        .filter(|&asn| graph.cone_size(asn) == largest)
        .min()
        .map_or(first, |asn| Resolution {
            asn,
            rule: Rule::LargestCone,
        })
}

/// Pick the holder of a registry delegation: largest cone, ties to the larger AS number
pub fn select_registry_origin(candidates: &OriginToken, graph: &AsGraph) -> u32 {
    candidates
        .candidates()
        .iter()
        .copied()
        .max_by_key(|&asn| (graph.cone_size(asn), asn))
        .unwrap_or_else(|| candidates.first())
}
