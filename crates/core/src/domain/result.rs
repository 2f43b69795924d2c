// Probe Result Domain Model

use serde::{Deserialize, Serialize};

/// Final, immutable outcome of one probe
///
/// Field names serialize in camelCase and form a stable shape for
/// downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    /// Target exactly as the caller passed it
    pub host: String,
    /// Address ping resolved the target to, when it printed one
    pub numeric_host: Option<String>,
    pub alive: bool,
    pub packets_sent: u32,
    pub packets_received: u32,
    /// 0-100, `None` when undetermined
    pub packet_loss: Option<f64>,
    /// Per-echo RTTs in ms, in reply order
    pub times: Vec<f64>,
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
    pub stddev: Option<f64>,
    /// Raw output retained for diagnostics
    pub raw_output: String,
}

impl ProbeResult {
    /// Append text the process wrote outside stdout (e.g. stderr)
    pub fn with_diagnostics(mut self, diagnostics: &str) -> Self {
        let diagnostics = diagnostics.trim_end();
        if diagnostics.is_empty() {
            return self;
        }
        if !self.raw_output.is_empty() && !self.raw_output.ends_with('\n') {
            self.raw_output.push('\n');
        }
        self.raw_output.push_str(diagnostics);
        self
    }
}
