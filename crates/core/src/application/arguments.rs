// Argument Builder
// Pure: (platform, target, options) -> argv for the system ping

use super::constants::{DEFAULT_PACKETS_TO_SEND, MILLIS_PER_SECOND};
use super::executable::has_unified_ipv6_flag;
use crate::domain::{Platform, ProbeOptions};
use crate::error::{ProbeError, Result};

/// Flag spellings of one ping implementation. `None` = not supported.
struct Grammar {
    numeric: Option<&'static str>,
    count: &'static str,
    timeout: &'static str,
    /// Multiplier from seconds to the unit `timeout` expects
    timeout_scale: u32,
    deadline: Option<&'static str>,
    interval: Option<&'static str>,
    packet_size: &'static str,
    source: &'static str,
}

const LINUX: Grammar = Grammar {
    numeric: Some("-n"),
    count: "-c",
    timeout: "-W",
    timeout_scale: 1,
    deadline: Some("-w"),
    interval: Some("-i"),
    packet_size: "-s",
    source: "-I",
};

const BSD: Grammar = Grammar {
    numeric: Some("-n"),
    count: "-c",
    timeout: "-W",
    timeout_scale: MILLIS_PER_SECOND,
    deadline: Some("-t"),
    interval: Some("-i"),
    packet_size: "-s",
    source: "-S",
};

const WINDOWS: Grammar = Grammar {
    numeric: None,
    count: "-n",
    timeout: "-w",
    timeout_scale: MILLIS_PER_SECOND,
    deadline: None,
    interval: None,
    packet_size: "-l",
    source: "-S",
};

impl Grammar {
    fn for_platform(platform: &Platform) -> Result<&'static Grammar> {
        match platform {
            Platform::Linux | Platform::Android => Ok(&LINUX),
            Platform::Darwin | Platform::FreeBsd => Ok(&BSD),
            Platform::Windows => Ok(&WINDOWS),
            Platform::Other(name) => Err(ProbeError::UnsupportedPlatform(name.clone())),
        }
    }
}

/// A flag claimed by a structured option; `extra` may not repeat it
struct Claimed {
    flag: &'static str,
    takes_value: bool,
}

#[derive(Default)]
struct Argv {
    args: Vec<String>,
    claimed: Vec<Claimed>,
}

impl Argv {
    fn flag(&mut self, flag: &'static str, value: Option<String>) {
        self.args.push(flag.to_string());
        self.claim(flag, value.is_some());
        if let Some(value) = value {
            self.args.push(value);
        }
    }

    /// Emit a default that `extra` is still free to override
    fn unclaimed(&mut self, flag: &'static str, value: String) {
        self.args.push(flag.to_string());
        self.args.push(value);
    }

    fn claim(&mut self, flag: &'static str, takes_value: bool) {
        self.claimed.push(Claimed { flag, takes_value });
    }
}

/// Build the argument vector for one probe
///
/// Order: structured flags, surviving `extra` entries verbatim, target.
/// An `extra` entry that repeats a flag a structured option already
/// emitted is dropped together with its value.
///
/// # Errors
/// - ProbeError::UnsupportedPlatform for `Platform::Other`
pub fn build(platform: &Platform, target: &str, options: &ProbeOptions) -> Result<Vec<String>> {
    let grammar = Grammar::for_platform(platform)?;
    let mut argv = Argv::default();

    if options.numeric {
        if let Some(flag) = grammar.numeric {
            argv.flag(flag, None);
        }
    }

    match options.packets_to_send {
        Some(count) => argv.flag(grammar.count, Some(count.to_string())),
        // a count passed through `extra` replaces the default
        None if !mentions_flag(&options.extra, grammar.count) => {
            argv.unclaimed(grammar.count, DEFAULT_PACKETS_TO_SEND.to_string());
        }
        None => {}
    }

    if let Some(secs) = options.timeout {
        let value = secs.saturating_mul(grammar.timeout_scale);
        argv.flag(grammar.timeout, Some(value.to_string()));
    }

    if let (Some(secs), Some(flag)) = (options.deadline, grammar.deadline) {
        argv.flag(flag, Some(secs.to_string()));
    }

    if let (Some(secs), Some(flag)) = (options.interval, grammar.interval) {
        argv.flag(flag, Some(secs.to_string()));
    }

    if let Some(bytes) = options.packet_size {
        argv.flag(grammar.packet_size, Some(bytes.to_string()));
    }

    if let Some(addr) = &options.source_addr {
        argv.flag(grammar.source, Some(addr.clone()));
    }

    if options.use_ipv6 {
        if has_unified_ipv6_flag(platform) {
            argv.flag("-6", None);
        } else {
            // the ping6 binary implies it
            argv.claim("-6", false);
        }
        argv.claim("-4", false);
    }

    let Argv { mut args, claimed } = argv;
    args.extend(filter_extra(&options.extra, &claimed));
    args.push(target.to_string());
    Ok(args)
}

/// Whether `extra` carries `flag`, separate or with an attached value
fn mentions_flag(extra: &[String], flag: &str) -> bool {
    extra.iter().any(|arg| arg.starts_with(flag))
}

/// Drop `extra` entries that conflict with claimed flags
fn filter_extra(extra: &[String], claimed: &[Claimed]) -> Vec<String> {
    let mut kept = Vec::with_capacity(extra.len());
    let mut iter = extra.iter();

    while let Some(arg) = iter.next() {
        let conflict = claimed.iter().find(|c| {
            arg == c.flag || (c.takes_value && arg.len() > c.flag.len() && arg.starts_with(c.flag))
        });

        match conflict {
            Some(c) if c.takes_value && arg == c.flag => {
                // separate value token
                iter.next();
            }
            Some(_) => {}
            None => kept.push(arg.clone()),
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported() -> [Platform; 5] {
        [
            Platform::Linux,
            Platform::Android,
            Platform::Darwin,
            Platform::FreeBsd,
            Platform::Windows,
        ]
    }

    #[test]
    fn test_linux_defaults() {
        let args = build(&Platform::Linux, "example.com", &ProbeOptions::default()).unwrap();
        assert_eq!(args, vec!["-n", "-c", "1", "example.com"]);
    }

    #[test]
    fn test_linux_full_options() {
        let options = ProbeOptions::new()
            .with_packets(4)
            .with_timeout(2)
            .with_deadline(10)
            .with_interval(0.5)
            .with_packet_size(100)
            .with_source_addr("eth0")
            .with_ipv6(true);

        let args = build(&Platform::Linux, "::1", &options).unwrap();

        assert_eq!(
            args,
            vec![
                "-n", "-c", "4", "-W", "2", "-w", "10", "-i", "0.5", "-s", "100", "-I", "eth0",
                "-6", "::1"
            ]
        );
    }

    #[test]
    fn test_darwin_timeout_in_millis_and_no_ipv6_flag() {
        let options = ProbeOptions::new().with_timeout(3).with_ipv6(true);
        let args = build(&Platform::Darwin, "::1", &options).unwrap();

        assert_eq!(args, vec!["-n", "-c", "1", "-W", "3000", "::1"]);
    }

    #[test]
    fn test_windows_grammar() {
        let options = ProbeOptions::new()
            .with_packets(4)
            .with_timeout(2)
            .with_deadline(30)
            .with_packet_size(64)
            .with_ipv6(true);

        let args = build(&Platform::Windows, "example.com", &options).unwrap();

        // deadline has no Windows equivalent
        assert_eq!(
            args,
            vec!["-n", "4", "-w", "2000", "-l", "64", "-6", "example.com"]
        );
    }

    #[test]
    fn test_extra_passthrough_before_target() {
        let options = ProbeOptions::new().with_extra(["-D", "-O"]);
        let args = build(&Platform::Linux, "10.0.0.1", &options).unwrap();

        assert_eq!(args, vec!["-n", "-c", "1", "-D", "-O", "10.0.0.1"]);
    }

    #[test]
    fn test_structured_options_beat_extra() {
        let options = ProbeOptions::new()
            .with_packets(4)
            .with_timeout(2)
            .with_ipv6(true)
            .with_extra(["-c", "10", "-W5", "-4", "-q"]);

        for platform in [Platform::Linux, Platform::Darwin] {
            let args = build(&platform, "host", &options).unwrap();
            assert!(!args.contains(&"10".to_string()), "{}: {:?}", platform, args);
            assert!(!args.contains(&"-W5".to_string()), "{}: {:?}", platform, args);
            assert!(!args.contains(&"-4".to_string()), "{}: {:?}", platform, args);
            assert!(args.contains(&"-q".to_string()), "{}: {:?}", platform, args);
            assert_eq!(args.iter().filter(|a| *a == "-c").count(), 1);
        }

        let windows = ProbeOptions::new()
            .with_packets(4)
            .with_extra(["-n", "10", "-t"]);
        let args = build(&Platform::Windows, "host", &windows).unwrap();
        assert_eq!(args, vec!["-n", "4", "-t", "host"]);
    }

    #[test]
    fn test_extra_kept_when_option_unset() {
        let options = ProbeOptions::new().with_extra(["-W", "5"]);
        let args = build(&Platform::Linux, "host", &options).unwrap();

        assert_eq!(args, vec!["-n", "-c", "1", "-W", "5", "host"]);
    }

    #[test]
    fn test_extra_count_replaces_default() {
        let options = ProbeOptions::new().with_extra(["-c", "10"]);
        let args = build(&Platform::Linux, "host", &options).unwrap();
        assert_eq!(args, vec!["-n", "-c", "10", "host"]);

        let attached = ProbeOptions::new().with_extra(["-c3"]);
        let args = build(&Platform::Darwin, "host", &attached).unwrap();
        assert_eq!(args, vec!["-n", "-c3", "host"]);

        let windows = ProbeOptions::new().with_extra(["-n", "5"]);
        let args = build(&Platform::Windows, "host", &windows).unwrap();
        assert_eq!(args, vec!["-n", "5", "host"]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let options = ProbeOptions::new()
            .with_packets(3)
            .with_timeout(1)
            .with_extra(["-v"]);

        for platform in supported() {
            let first = build(&platform, "example.com", &options).unwrap();
            let second = build(&platform, "example.com", &options.clone()).unwrap();
            assert_eq!(first, second, "{}", platform);
            assert_eq!(first.last().map(String::as_str), Some("example.com"));
        }
    }

    #[test]
    fn test_unknown_platform_rejected() {
        let err = build(
            &Platform::Other("sunos".to_string()),
            "host",
            &ProbeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ProbeError::UnsupportedPlatform(_)));
    }
}
