//! AS numbers, attribution values and origin disambiguation

pub mod disambiguate;
pub mod token;

use serde::{Deserialize, Serialize};

pub use disambiguate::{
    resolve_origin, resolve_origin_with_rule, select_registry_origin, Resolution, Rule,
};
pub use token::OriginToken;

/// AS_TRANS, the placeholder used for 16/32-bit AS number compatibility
pub const AS_TRANS: u32 = 23456;

/// First AS number of the documentation/reserved band
pub const RESERVED_BAND_START: u32 = 64496;

/// Last AS number of the documentation/reserved band
pub const RESERVED_BAND_END: u32 = 131_071;

/// Exclusive upper bound of usable AS numbers
pub const ASN_UPPER_BOUND: u32 = 4_200_000_000;

/// Legacy value written for private address space
pub const LEGACY_PRIVATE: i64 = -1;

/// Legacy value written for reserved/special-use address space
pub const LEGACY_RESERVED: i64 = -2;

/// Offset of the legacy exchange-point encoding (`-100 - id`)
pub const LEGACY_IXP_BASE: i64 = -100;

/// Checks whether an AS number is usable as an attribution target.
///
/// Accepts `0 < asn < 64496` and `131071 < asn < 4200000000`, excluding AS_TRANS.
pub fn is_valid_asn(asn: u32) -> bool {
    if asn == AS_TRANS {
        return false;
    }
    (asn > 0 && asn < RESERVED_BAND_START) || (asn > RESERVED_BAND_END && asn < ASN_UPPER_BOUND)
}

/// Who an address block is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribution {
    /// Originated by a real AS
    Public(u32),
    /// Address space of an exchange-point fabric, by PeeringDB exchange id
    ExchangePoint(u32),
    /// Private address space (RFC 1918, CGNAT, ULA, loopback, link-local)
    Private,
    /// Reserved or special-use address space
    Reserved,
}

impl Attribution {
    /// Signed-integer encoding used by the output format.
    ///
    /// Exchange points become `-100 - id`, private space `-1` and reserved space `-2`.
    pub fn legacy_value(&self) -> i64 {
        match *self {
            Attribution::Public(asn) => i64::from(asn),
            Attribution::ExchangePoint(id) => LEGACY_IXP_BASE - i64::from(id),
            Attribution::Private => LEGACY_PRIVATE,
            Attribution::Reserved => LEGACY_RESERVED,
        }
    }

    /// Decode a legacy signed value back into an attribution
    pub fn from_legacy(value: i64) -> Option<Self> {
        match value {
            LEGACY_PRIVATE => Some(Attribution::Private),
            LEGACY_RESERVED => Some(Attribution::Reserved),
            v if v <= LEGACY_IXP_BASE => u32::try_from(LEGACY_IXP_BASE - v)
                .ok()
                .map(Attribution::ExchangePoint),
            v => u32::try_from(v).ok().map(Attribution::Public),
        }
    }

    /// The AS number, if this is a real AS
    pub fn asn(&self) -> Option<u32> {
        match *self {
            Attribution::Public(asn) => Some(asn),
            _ => None,
        }
    }
}

impl std::fmt::Display for Attribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.legacy_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_validity_boundaries() {
        assert!(!is_valid_asn(0));
        assert!(is_valid_asn(1));
        assert!(!is_valid_asn(23456));
        assert!(is_valid_asn(23455));
        assert!(is_valid_asn(23457));
        assert!(is_valid_asn(64495));
        assert!(!is_valid_asn(64496));
        assert!(!is_valid_asn(65000));
        assert!(!is_valid_asn(131071));
        assert!(is_valid_asn(131072));
        assert!(is_valid_asn(4_199_999_999));
        assert!(!is_valid_asn(4_200_000_000));
        assert!(!is_valid_asn(u32::MAX));
    }

    #[test]
    fn test_legacy_encoding() {
        assert_eq!(Attribution::Public(13335).legacy_value(), 13335);
        assert_eq!(Attribution::ExchangePoint(0).legacy_value(), -100);
        assert_eq!(Attribution::ExchangePoint(26).legacy_value(), -126);
        assert_eq!(Attribution::Private.legacy_value(), -1);
        assert_eq!(Attribution::Reserved.legacy_value(), -2);
        assert_eq!(Attribution::Public(4_294_967_295).legacy_value(), 4_294_967_295);
    }

    #[test]
    fn test_legacy_sign_identifies_layer() {
        for attribution in [
            Attribution::Public(3356),
            Attribution::ExchangePoint(1),
            Attribution::ExchangePoint(4242),
            Attribution::Private,
            Attribution::Reserved,
        ] {
            assert_eq!(
                Attribution::from_legacy(attribution.legacy_value()),
                Some(attribution)
            );
        }
        assert_eq!(Attribution::from_legacy(-50), None);
    }

    #[test]
    fn test_display_uses_legacy_value() {
        assert_eq!(Attribution::ExchangePoint(5).to_string(), "-105");
        assert_eq!(Attribution::Public(174).to_string(), "174");
        assert_eq!(Attribution::Public(174).asn(), Some(174));
        assert_eq!(Attribution::Private.asn(), None);
    }
}
