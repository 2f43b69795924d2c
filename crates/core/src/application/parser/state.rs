// Parse State - accumulator shared by every grammar variant

use std::net::IpAddr;

use crate::domain::ProbeResult;
use crate::error::{ProbeError, Result};

/// Parser lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserPhase {
    Collecting,
    Finalized,
}

impl ParserPhase {
    fn as_str(self) -> &'static str {
        match self {
            ParserPhase::Collecting => "collecting",
            ParserPhase::Finalized => "finalized",
        }
    }
}

/// Round-trip statistics as printed by a summary line
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RttSummary {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
    pub stddev: Option<f64>,
}

/// Everything a parser has learned so far about one probe
#[derive(Debug)]
pub struct ParseState {
    phase: ParserPhase,
    host: String,
    pub numeric_host: Option<String>,
    /// RTTs of echoes that got a reply, in arrival order
    pub times: Vec<f64>,
    /// Echoes reported lost (timeout, unreachable)
    pub lost: u32,
    pub summary_sent: Option<u32>,
    pub summary_received: Option<u32>,
    pub summary_loss: Option<f64>,
    pub summary_rtt: Option<RttSummary>,
    raw: Vec<String>,
}

impl ParseState {
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        // an IP literal target is its own numeric host until a header says otherwise
        let numeric_host = host.parse::<IpAddr>().is_ok().then(|| host.clone());

        Self {
            phase: ParserPhase::Collecting,
            host,
            numeric_host,
            times: Vec::new(),
            lost: 0,
            summary_sent: None,
            summary_received: None,
            summary_loss: None,
            summary_rtt: None,
            raw: Vec::new(),
        }
    }

    /// Guard + raw retention shared by every `ingest`
    pub fn begin_line(&mut self, line: &str) -> Result<()> {
        self.require_collecting("ingest")?;
        self.raw.push(line.to_string());
        Ok(())
    }

    fn require_collecting(&self, operation: &'static str) -> Result<()> {
        if self.phase != ParserPhase::Collecting {
            return Err(ProbeError::InvalidParserState {
                operation,
                state: self.phase.as_str(),
            });
        }
        Ok(())
    }

    /// Collecting -> Finalized, then derive the result
    ///
    /// Summary-line values win when present; otherwise each figure is
    /// derived from the per-echo observations.
    pub fn finalize(&mut self) -> Result<ProbeResult> {
        self.require_collecting("finalize")?;
        self.phase = ParserPhase::Finalized;

        let replies = self.times.len() as u32;
        let packets_sent = self.summary_sent.unwrap_or(replies + self.lost);
        let packets_received = self.summary_received.unwrap_or(replies);

        let packet_loss = self.summary_loss.or_else(|| {
            (packets_sent > 0).then(|| {
                let lost = packets_sent.saturating_sub(packets_received);
                f64::from(lost) * 100.0 / f64::from(packets_sent)
            })
        });

        let derived = derive_rtt(&self.times);
        let rtt = match self.summary_rtt {
            Some(summary) => RttSummary {
                min: summary.min.or(derived.min),
                avg: summary.avg.or(derived.avg),
                max: summary.max.or(derived.max),
                stddev: summary.stddev.or(derived.stddev),
            },
            None => derived,
        };

        Ok(ProbeResult {
            host: self.host.clone(),
            numeric_host: self.numeric_host.clone(),
            alive: packets_received > 0 || !self.times.is_empty(),
            packets_sent,
            packets_received,
            packet_loss,
            times: self.times.clone(),
            min: rtt.min,
            avg: rtt.avg,
            max: rtt.max,
            stddev: rtt.stddev,
            raw_output: self.raw.join("\n"),
        })
    }
}

/// min/avg/max/population stddev of the observed RTTs
fn derive_rtt(times: &[f64]) -> RttSummary {
    if times.is_empty() {
        return RttSummary::default();
    }

    let n = times.len() as f64;
    let min = times.iter().copied().fold(f64::INFINITY, f64::min);
    let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = times.iter().sum::<f64>() / n;
    let variance = times.iter().map(|t| (t - avg).powi(2)).sum::<f64>() / n;

    RttSummary {
        min: Some(min),
        avg: Some(avg),
        max: Some(max),
        stddev: Some(variance.sqrt()),
    }
}
