// Output Parsers - one small grammar per platform family

mod bsd;
mod fields;
mod linux;
mod state;
mod windows;

pub use bsd::BsdParser;
pub use linux::LinuxParser;
pub use state::{ParseState, ParserPhase, RttSummary};
pub use windows::WindowsParser;

use crate::domain::{Platform, ProbeOptions};
use crate::error::{ProbeError, Result};
use crate::port::OutputParser;

/// Selects the grammar variant for a platform
pub struct ParserFactory;

impl ParserFactory {
    /// Create a single-use parser bound to `platform`'s grammar
    ///
    /// `options` is accepted so variants can key on probe settings; the
    /// current grammars do not need it.
    ///
    /// # Errors
    /// - ProbeError::UnsupportedPlatform for `Platform::Other`
    pub fn create(
        platform: &Platform,
        host: &str,
        _options: &ProbeOptions,
    ) -> Result<Box<dyn OutputParser>> {
        let parser: Box<dyn OutputParser> = match platform {
            Platform::Linux | Platform::Android => Box::new(LinuxParser::new(host)),
            Platform::Darwin | Platform::FreeBsd => Box::new(BsdParser::new(host)),
            Platform::Windows => Box::new(WindowsParser::new(host)),
            Platform::Other(name) => return Err(ProbeError::UnsupportedPlatform(name.clone())),
        };
        Ok(parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINUX_FOUR_ECHOES: &str = "PING 192.0.2.7 (192.0.2.7) 56(84) bytes of data.
64 bytes from 192.0.2.7: icmp_seq=1 ttl=64 time=10.0 ms
64 bytes from 192.0.2.7: icmp_seq=2 ttl=64 time=12.0 ms
64 bytes from 192.0.2.7: icmp_seq=3 ttl=64 time=11.0 ms
64 bytes from 192.0.2.7: icmp_seq=4 ttl=64 time=9.5 ms

--- 192.0.2.7 ping statistics ---
4 packets transmitted, 4 received, 0% packet loss, time 3004ms
rtt min/avg/max/mdev = 9.500/10.625/12.000/0.960 ms
";

    #[test]
    fn test_factory_rejects_unknown_platform() {
        let result = ParserFactory::create(
            &Platform::Other("qnx".to_string()),
            "h",
            &ProbeOptions::default(),
        );
        assert!(matches!(result, Err(ProbeError::UnsupportedPlatform(_))));
    }

    #[test]
    fn test_four_echo_exchange() {
        let mut parser =
            ParserFactory::create(&Platform::Linux, "192.0.2.7", &ProbeOptions::default()).unwrap();
        for line in LINUX_FOUR_ECHOES.lines() {
            parser.ingest(line).unwrap();
        }
        let result = parser.finalize().unwrap();

        assert!(result.alive);
        assert_eq!(result.packets_sent, 4);
        assert_eq!(result.packets_received, 4);
        assert_eq!(result.packet_loss, Some(0.0));
        assert_eq!(result.times, vec![10.0, 12.0, 11.0, 9.5]);
        assert!((result.avg.unwrap() - 10.625).abs() < 1e-9);
    }

    #[test]
    fn test_ingest_after_finalize_fails() {
        for platform in [Platform::Linux, Platform::Darwin, Platform::Windows] {
            let mut parser =
                ParserFactory::create(&platform, "h", &ProbeOptions::default()).unwrap();
            parser.finalize().unwrap();

            assert!(matches!(
                parser.ingest("64 bytes from h: icmp_seq=1 time=1 ms"),
                Err(ProbeError::InvalidParserState { .. })
            ));
            assert!(matches!(
                parser.finalize(),
                Err(ProbeError::InvalidParserState { .. })
            ));
        }
    }
}
