//! Read-only reference datasets consulted while building the table

pub mod as2org;
pub mod bgp;
pub mod peeringdb;

pub use as2org::{As2Org, OrgKey};
pub use bgp::{AsGraph, Relationship};
pub use peeringdb::ExchangePoints;
