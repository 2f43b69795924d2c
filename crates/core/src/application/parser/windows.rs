// Windows grammar, locale tolerant
//
// Wording is translated per display language, so lines are classified
// by shape only:
//
// Pinging example.com [93.184.216.34] with 32 bytes of data:   <- header
// Reply from 93.184.216.34: bytes=32 time=10ms TTL=56          <- echo, label=Nms
// Request timed out.                                           <- echo, no RTT
//                                                              <- blank ends echoes
// Ping statistics for 93.184.216.34:
//     Packets: Sent = 2, Received = 1, Lost = 1 (50% loss),    <- three "= N" + "%"
// Approximate round trip times in milli-seconds:
//     Minimum = 10ms, Maximum = 10ms, Average = 10ms           <- three "= Nms"

use super::fields;
use super::state::{ParseState, RttSummary};
use crate::domain::ProbeResult;
use crate::error::Result;
use crate::port::OutputParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Before the header line
    Preamble,
    /// One line per echo until a blank line
    Echoes,
    Statistics,
}

pub struct WindowsParser {
    state: ParseState,
    section: Section,
    echo_lines: u32,
}

impl WindowsParser {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            state: ParseState::new(host),
            section: Section::Preamble,
            echo_lines: 0,
        }
    }

    fn ingest_header(&mut self, line: &str) {
        if let Some(addr) = fields::between(line, '[', ']') {
            self.state.numeric_host = Some(addr.to_string());
        }
        self.section = Section::Echoes;
    }

    fn ingest_echo(&mut self, line: &str) {
        self.echo_lines += 1;
        match fields::marked_millis(line) {
            Some(rtt) => self.state.times.push(rtt),
            None => self.state.lost += 1,
        }
    }

    fn ingest_statistics(&mut self, line: &str) {
        let values = fields::equals_values(line);
        if values.len() < 3 {
            return;
        }

        if values.iter().all(|v| !v.millis) {
            // sent, received, lost; some languages wrap the "(N% ...)" part
            self.state.summary_sent = Some(values[0].value as u32);
            self.state.summary_received = Some(values[1].value as u32);
            self.state.summary_loss = fields::percentage(line);
        } else if values.len() == 3 && values.iter().all(|v| v.millis) {
            // min, max, avg regardless of language
            self.state.summary_rtt = Some(RttSummary {
                min: Some(values[0].value),
                max: Some(values[1].value),
                avg: Some(values[2].value),
                stddev: None,
            });
        }
    }
}

impl OutputParser for WindowsParser {
    fn ingest(&mut self, line: &str) -> Result<()> {
        self.state.begin_line(line)?;
        let line = line.trim();

        match self.section {
            Section::Preamble if !line.is_empty() => self.ingest_header(line),
            Section::Preamble => {}
            Section::Echoes if line.is_empty() => {
                if self.echo_lines > 0 {
                    self.section = Section::Statistics;
                }
            }
            Section::Echoes => self.ingest_echo(line),
            Section::Statistics => self.ingest_statistics(line),
        }

        Ok(())
    }

    fn finalize(&mut self) -> Result<ProbeResult> {
        // "Destination host unreachable" replies are counted as received
        // in the summary; echo lines are authoritative when present.
        if self.echo_lines > 0 {
            self.state.summary_received = Some(self.state.times.len() as u32);
            self.state.summary_loss = None;
        }
        self.state.finalize()
    }
}
