// Deadline - externally built timeout for a probe
// kill() is the only cancellation primitive; this races it against a timer

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::{ProbeOptions, ProbeResult};
use crate::error::{ProbeError, Result};
use crate::port::Prober;

/// Run a probe, killing it if it has not settled after `deadline`
///
/// After the kill the probe is still awaited, so the caller receives
/// its settlement (usually a partial result) rather than a timeout.
pub async fn probe_with_deadline(
    prober: &dyn Prober,
    target: &str,
    options: &ProbeOptions,
    deadline: Duration,
) -> Result<ProbeResult> {
    let probe = prober.probe(target, options);
    tokio::pin!(probe);

    tokio::select! {
        outcome = &mut probe => outcome,
        _ = sleep(deadline) => {
            debug!(host = %target, deadline_ms = deadline.as_millis() as u64, "Probe deadline elapsed, killing");
            match prober.kill().await {
                Ok(confirmation) => debug!(%confirmation, "Probe killed"),
                // settled between the timer firing and the kill
                Err(ProbeError::NoActiveProcess) => {}
                Err(e) => warn!(error = %e, "Failed to kill probe after deadline"),
            }
            probe.await
        }
    }
}
