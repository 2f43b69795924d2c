// Linux grammar (iputils, BusyBox/Android)
//
// PING example.com (93.184.216.34) 56(84) bytes of data.
// 64 bytes from 93.184.216.34: icmp_seq=1 ttl=56 time=10.0 ms
// From 10.0.0.1 icmp_seq=2 Destination Host Unreachable
// --- example.com ping statistics ---
// 2 packets transmitted, 1 received, +1 errors, 50% packet loss, time 1001ms
// rtt min/avg/max/mdev = 10.000/10.000/10.000/0.000 ms

use super::fields;
use super::state::ParseState;
use crate::domain::ProbeResult;
use crate::error::Result;
use crate::port::OutputParser;

pub struct LinuxParser {
    state: ParseState,
}

impl LinuxParser {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            state: ParseState::new(host),
        }
    }
}

/// iputils prints `icmp_seq=`, old iputils `icmp_req=`, BusyBox `seq=`
fn is_echo_line(line: &str) -> bool {
    line.contains("seq=") || line.contains("icmp_req=")
}

fn is_statistics_line(line: &str) -> bool {
    line.starts_with("rtt ") || line.starts_with("round-trip ")
}

impl OutputParser for LinuxParser {
    fn ingest(&mut self, line: &str) -> Result<()> {
        self.state.begin_line(line)?;
        let line = line.trim();

        if line.starts_with("PING ") {
            if let Some(addr) = fields::innermost_parens(line) {
                self.state.numeric_host = Some(addr.to_string());
            }
        } else if let Some((sent, received, loss)) = fields::transmit_summary(line) {
            self.state.summary_sent = Some(sent);
            self.state.summary_received = Some(received);
            self.state.summary_loss = loss;
        } else if is_statistics_line(line) {
            self.state.summary_rtt = fields::slash_statistics(line);
        } else if is_echo_line(line) {
            match fields::number_after(line, "time=") {
                Some(rtt) => self.state.times.push(rtt),
                None => self.state.lost += 1,
            }
        }

        Ok(())
    }

    fn finalize(&mut self) -> Result<ProbeResult> {
        self.state.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(host: &str, text: &str) -> ProbeResult {
        let mut parser = LinuxParser::new(host);
        for line in text.lines() {
            parser.ingest(line).unwrap();
        }
        parser.finalize().unwrap()
    }

    #[test]
    fn test_partial_loss_with_unreachable() {
        let result = parse(
            "10.0.0.9",
            "PING 10.0.0.9 (10.0.0.9) 56(84) bytes of data.\n\
             64 bytes from 10.0.0.9: icmp_seq=1 ttl=64 time=0.412 ms\n\
             From 10.0.0.1 icmp_seq=2 Destination Host Unreachable\n\
             \n\
             --- 10.0.0.9 ping statistics ---\n\
             2 packets transmitted, 1 received, +1 errors, 50% packet loss, time 1001ms\n\
             rtt min/avg/max/mdev = 0.412/0.412/0.412/0.000 ms\n",
        );

        assert!(result.alive);
        assert_eq!(result.numeric_host.as_deref(), Some("10.0.0.9"));
        assert_eq!(result.times, vec![0.412]);
        assert_eq!(result.packets_sent, 2);
        assert_eq!(result.packets_received, 1);
        assert_eq!(result.packet_loss, Some(50.0));
        assert_eq!(result.stddev, Some(0.0));
    }

    #[test]
    fn test_ipv6_hostname_header() {
        let result = parse(
            "google.com",
            "PING google.com(2a00:1450:4001:82b::200e (2a00:1450:4001:82b::200e)) 56 data bytes\n\
             64 bytes from 2a00:1450:4001:82b::200e: icmp_seq=1 ttl=117 time=14.2 ms\n",
        );

        assert_eq!(
            result.numeric_host.as_deref(),
            Some("2a00:1450:4001:82b::200e")
        );
        assert_eq!(result.times, vec![14.2]);
    }

    #[test]
    fn test_busybox_three_field_statistics() {
        let result = parse(
            "router",
            "PING router (192.168.1.1): 56 data bytes\n\
             64 bytes from 192.168.1.1: seq=0 ttl=64 time=1.000 ms\n\
             64 bytes from 192.168.1.1: seq=1 ttl=64 time=3.000 ms\n\
             \n\
             --- router ping statistics ---\n\
             2 packets transmitted, 2 packets received, 0% packet loss\n\
             round-trip min/avg/max = 1.000/2.000/3.000 ms\n",
        );

        assert_eq!(result.packets_received, 2);
        assert_eq!(result.avg, Some(2.0));
        // not printed by BusyBox, derived from echoes
        assert_eq!(result.stddev, Some(1.0));
    }

    #[test]
    fn test_no_answer_yet_counts_as_lost() {
        let result = parse(
            "10.255.255.1",
            "PING 10.255.255.1 (10.255.255.1) 56(84) bytes of data.\n\
             no answer yet for icmp_seq=1\n\
             no answer yet for icmp_seq=2\n",
        );

        assert!(!result.alive);
        assert_eq!(result.packets_sent, 2);
        assert_eq!(result.packet_loss, Some(100.0));
    }

    #[test]
    fn test_unrecognized_lines_only_kept_raw() {
        let result = parse("h", "WARNING: pinging broadcast address\nsomething else entirely");

        assert!(!result.alive);
        assert_eq!(result.packets_sent, 0);
        assert!(result.raw_output.contains("broadcast"));
    }
}
