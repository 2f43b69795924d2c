// Probe Options Domain Model

use serde::{Deserialize, Serialize};

fn default_numeric() -> bool {
    true
}

/// Per-probe configuration. Immutable once a probe starts.
///
/// Every field has a default so callers can deserialize a partial
/// document from their own configuration source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOptions {
    /// Seconds to wait for each echo reply
    #[serde(default)]
    pub timeout: Option<u32>,

    /// Number of echoes to send (platform default when unset)
    #[serde(default)]
    pub packets_to_send: Option<u32>,

    /// Address the target over IPv6
    #[serde(default, alias = "v6")]
    pub use_ipv6: bool,

    /// Raw arguments passed through to the ping executable
    #[serde(default)]
    pub extra: Vec<String>,

    /// Skip reverse DNS lookups of reply addresses (default: true)
    #[serde(default = "default_numeric")]
    pub numeric: bool,

    /// Seconds before ping exits regardless of replies
    #[serde(default)]
    pub deadline: Option<u32>,

    /// ICMP payload size in bytes
    #[serde(default)]
    pub packet_size: Option<u32>,

    /// Source address or interface for outgoing echoes
    #[serde(default)]
    pub source_addr: Option<String>,

    /// Seconds between echoes
    #[serde(default)]
    pub interval: Option<f64>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            packets_to_send: None,
            use_ipv6: false,
            extra: Vec::new(),
            numeric: true,
            deadline: None,
            packet_size: None,
            source_addr: None,
            interval: None,
        }
    }
}

impl ProbeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, secs: u32) -> Self {
        self.timeout = Some(secs);
        self
    }

    pub fn with_packets(mut self, count: u32) -> Self {
        self.packets_to_send = Some(count);
        self
    }

    pub fn with_ipv6(mut self, use_ipv6: bool) -> Self {
        self.use_ipv6 = use_ipv6;
        self
    }

    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra = extra.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_numeric(mut self, numeric: bool) -> Self {
        self.numeric = numeric;
        self
    }

    pub fn with_deadline(mut self, secs: u32) -> Self {
        self.deadline = Some(secs);
        self
    }

    pub fn with_packet_size(mut self, bytes: u32) -> Self {
        self.packet_size = Some(bytes);
        self
    }

    pub fn with_source_addr(mut self, addr: impl Into<String>) -> Self {
        self.source_addr = Some(addr.into());
        self
    }

    pub fn with_interval(mut self, secs: f64) -> Self {
        self.interval = Some(secs);
        self
    }
}
