// Executable Path Resolver
// Pure lookup: which binary to run per platform

use crate::domain::Platform;
use crate::error::{ProbeError, Result};

/// Resolve the ping executable for `platform`
///
/// Linux and Windows select IPv6 with a flag on the same binary; the
/// BSD family and Android ship a separate `ping6`.
///
/// # Errors
/// - ProbeError::UnsupportedPlatform for `Platform::Other`
pub fn resolve(platform: &Platform, use_ipv6: bool) -> Result<&'static str> {
    let path = match (platform, use_ipv6) {
        (Platform::Linux, _) => "ping",
        (Platform::Windows, _) => "ping",
        (Platform::Android, false) => "/system/bin/ping",
        (Platform::Android, true) => "/system/bin/ping6",
        (Platform::Darwin | Platform::FreeBsd, false) => "/sbin/ping",
        (Platform::Darwin | Platform::FreeBsd, true) => "/sbin/ping6",
        (Platform::Other(name), _) => return Err(ProbeError::UnsupportedPlatform(name.clone())),
    };
    Ok(path)
}

/// Whether `platform` selects IPv6 via a flag rather than a separate binary
pub fn has_unified_ipv6_flag(platform: &Platform) -> bool {
    matches!(platform, Platform::Linux | Platform::Windows)
}
