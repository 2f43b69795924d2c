// BSD grammar (macOS, FreeBSD)
//
// PING example.com (93.184.216.34): 56 data bytes
// 64 bytes from 93.184.216.34: icmp_seq=0 ttl=56 time=10.000 ms
// Request timeout for icmp_seq 1
// --- example.com ping statistics ---
// 2 packets transmitted, 1 packets received, 50.0% packet loss
// round-trip min/avg/max/stddev = 10.000/10.000/10.000/0.000 ms

use super::fields;
use super::state::ParseState;
use crate::domain::ProbeResult;
use crate::error::Result;
use crate::port::OutputParser;

pub struct BsdParser {
    state: ParseState,
}

impl BsdParser {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            state: ParseState::new(host),
        }
    }
}

/// Per-echo failures. Unreachable replies are followed by an IP header
/// dump which carries no sequence marker and is ignored.
fn is_lost_echo(line: &str) -> bool {
    line.starts_with("Request timeout") || line.contains("Host Unreachable")
}

impl OutputParser for BsdParser {
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
        } else if line.starts_with("round-trip") {
            self.state.summary_rtt = fields::slash_statistics(line);
        } else if is_lost_echo(line) {
            self.state.lost += 1;
        } else if line.contains("icmp_seq=") {
            if let Some(rtt) = fields::number_after(line, "time=") {
                self.state.times.push(rtt);
            }
        }

        Ok(())
    }

    fn finalize(&mut self) -> Result<ProbeResult> {
        self.state.finalize()
    }
}
