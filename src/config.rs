//! Configuration for table construction

use crate::error::{Ip2AsError, Result};
use serde::{Deserialize, Serialize};

/// Default cap on IPv4 registry delegation length
pub const DEFAULT_IPV4_MAX_PREFIX_LEN: u8 = 24;
/// Default cap on IPv6 registry delegation length
pub const DEFAULT_IPV6_MAX_PREFIX_LEN: u8 = 48;

/// Layout of the registry delegation file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RirFormat {
    /// Decide per line: three fields is a delegation, two is a prefix line
    #[default]
    Auto,
    /// `<address> <prefix-length> <as-set>` records
    Delegation,
    /// `<prefix> <origin-token>` lines
    Prefix,
}

/// Configuration for building an attribution table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Longest IPv4 registry delegation kept (default: 24)
    pub ipv4_max_prefix_len: u8,
    /// Longest IPv6 registry delegation kept (default: 48)
    pub ipv6_max_prefix_len: u8,
    /// Layout of the registry file (default: auto)
    pub rir_format: RirFormat,
    /// Reserve private and special-use blocks before any other layer (default: true)
    pub reserve_private: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            ipv4_max_prefix_len: DEFAULT_IPV4_MAX_PREFIX_LEN,
            ipv6_max_prefix_len: DEFAULT_IPV6_MAX_PREFIX_LEN,
            rir_format: RirFormat::Auto,
            reserve_private: true,
        }
    }
}

impl BuildConfig {
    /// Create a new BuildConfig builder
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.ipv4_max_prefix_len > 32 {
            return Err(Ip2AsError::Config(format!(
                "ipv4_max_prefix_len must be at most 32, got {}",
                self.ipv4_max_prefix_len
            )));
        }
        if self.ipv6_max_prefix_len > 128 {
            return Err(Ip2AsError::Config(format!(
                "ipv6_max_prefix_len must be at most 128, got {}",
                self.ipv6_max_prefix_len
            )));
        }
        Ok(())
    }
}

/// Builder for BuildConfig
pub struct BuildConfigBuilder {
    config: BuildConfig,
}

impl BuildConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: BuildConfig::default(),
        }
    }

    /// Set the IPv4 delegation length cap
    pub fn ipv4_max_prefix_len(mut self, len: u8) -> Self {
        self.config.ipv4_max_prefix_len = len;
        self
    }

    /// Set the IPv6 delegation length cap
    pub fn ipv6_max_prefix_len(mut self, len: u8) -> Self {
        self.config.ipv6_max_prefix_len = len;
        self
    }

    /// Set the registry file layout
    pub fn rir_format(mut self, format: RirFormat) -> Self {
        self.config.rir_format = format;
        self
    }

    /// Enable or disable the private address reservation
    pub fn reserve_private(mut self, enable: bool) -> Self {
        self.config.reserve_private = enable;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<BuildConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for BuildConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
