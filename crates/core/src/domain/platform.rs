// Platform Domain Model

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;

/// Host operating system family, as far as ping grammars are concerned
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Android,
    Darwin,
    FreeBsd,
    Windows,
    /// Anything else; every builder and resolver rejects it
    Other(String),
}

impl Platform {
    /// Platform of the running process
    pub fn current() -> Self {
        std::env::consts::OS
            .parse()
            .unwrap_or_else(|_| Platform::Other(std::env::consts::OS.to_string()))
    }

    /// Fail with `UnsupportedPlatform` for `Other`
    pub fn ensure_supported(&self) -> crate::error::Result<()> {
        match self {
            Platform::Other(name) => Err(ProbeError::UnsupportedPlatform(name.clone())),
            _ => Ok(()),
        }
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    /// Accepts both `std::env::consts::OS` values and Node-style identifiers
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let platform = match s.to_ascii_lowercase().as_str() {
            "linux" => Platform::Linux,
            "android" => Platform::Android,
            "macos" | "darwin" => Platform::Darwin,
            "freebsd" => Platform::FreeBsd,
            "windows" | "win32" => Platform::Windows,
            other => Platform::Other(other.to_string()),
        };
        Ok(platform)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::Android => write!(f, "android"),
            Platform::Darwin => write!(f, "darwin"),
            Platform::FreeBsd => write!(f, "freebsd"),
            Platform::Windows => write!(f, "windows"),
            Platform::Other(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rust_and_node_identifiers() {
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::Darwin);
        assert_eq!("darwin".parse::<Platform>().unwrap(), Platform::Darwin);
        assert_eq!("win32".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!("Linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!(
            "plan9".parse::<Platform>().unwrap(),
            Platform::Other("plan9".to_string())
        );
    }

    #[test]
    fn test_other_is_unsupported() {
        let platform = Platform::Other("haiku".to_string());
        assert!(matches!(
            platform.ensure_supported(),
            Err(ProbeError::UnsupportedPlatform(name)) if name == "haiku"
        ));
        assert!(Platform::FreeBsd.ensure_supported().is_ok());
    }

    #[test]
    fn test_current_matches_build_target() {
        let current = Platform::current();
        if cfg!(target_os = "linux") {
            assert_eq!(current, Platform::Linux);
        } else if cfg!(target_os = "windows") {
            assert_eq!(current, Platform::Windows);
        } else if cfg!(target_os = "macos") {
            assert_eq!(current, Platform::Darwin);
        }
    }
}
