// Process controller
// reason: tokio for async child processes, nix for SIGTERM on Unix
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use sysping_core::application::constants::READ_CHUNK_SIZE;
use sysping_core::application::{LineAssembler, ParserFactory, SystemSpawnPlanner};
use sysping_core::domain::{ProbeOptions, ProbeResult};
use sysping_core::port::{KillConfirmation, OutputParser, Prober, SpawnPlan, SpawnPlanner};
use sysping_core::{ProbeError, Result};

/// The in-flight probe's process reference
#[derive(Debug)]
struct ProbeHandle {
    id: u64,
    /// None until the child has been spawned
    pid: Option<u32>,
    /// Wakes the streaming loop so it can kill the child itself
    cancel: Arc<Notify>,
}

impl ProbeHandle {
    fn terminate(&self) -> Result<()> {
        match self.pid {
            #[cfg(unix)]
            Some(pid) => send_sigterm(pid),
            _ => {
                self.cancel.notify_one();
                Ok(())
            }
        }
    }
}

#[cfg(unix)]
fn send_sigterm(pid: u32) -> Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let raw = i32::try_from(pid)
        .map_err(|_| ProbeError::Process(format!("pid {} out of range", pid)))?;

    info!(pid = %pid, "Sending SIGTERM to ping process");
    kill(Pid::from_raw(raw), Signal::SIGTERM)
        .map_err(|e| ProbeError::Process(format!("SIGTERM failed: {}", e)))
}

type Slot = Mutex<Option<ProbeHandle>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<ProbeHandle>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the slot when the probe settles, errors, or is dropped
struct SlotGuard<'a> {
    slot: &'a Slot,
    id: u64,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        let mut slot = lock(self.slot);
        if slot.as_ref().is_some_and(|handle| handle.id == self.id) {
            *slot = None;
        }
    }
}

/// Runs the system ping, one probe at a time
///
/// A second `probe()` while one is in flight is rejected with
/// `ProbeAlreadyRunning`; `kill()` only ever targets the current probe.
pub struct ProcessController {
    planner: Arc<dyn SpawnPlanner>,
    slot: Slot,
    next_id: AtomicU64,
}

impl ProcessController {
    /// Create a controller that spawns whatever `planner` decides
    ///
    /// # Example
    /// ```ignore
    /// let controller = ProcessController::new(Arc::new(SystemSpawnPlanner::new(Platform::Linux)));
    /// let result = controller.probe("example.com", &ProbeOptions::new().with_packets(4)).await?;
    /// ```
    pub fn new(planner: Arc<dyn SpawnPlanner>) -> Self {
        Self {
            planner,
            slot: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Controller for the system ping of the running platform
    pub fn for_current_platform() -> Self {
        Self::new(Arc::new(SystemSpawnPlanner::for_current_platform()))
    }

    /// Whether a probe currently holds the slot
    pub fn is_busy(&self) -> bool {
        lock(&self.slot).is_some()
    }

    fn reserve(&self) -> Result<(SlotGuard<'_>, Arc<Notify>)> {
        let mut slot = lock(&self.slot);
        if slot.is_some() {
            return Err(ProbeError::ProbeAlreadyRunning);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let cancel = Arc::new(Notify::new());
        *slot = Some(ProbeHandle {
            id,
            pid: None,
            cancel: Arc::clone(&cancel),
        });

        Ok((SlotGuard { slot: &self.slot, id }, cancel))
    }

    fn record_pid(&self, id: u64, pid: Option<u32>) {
        if let Some(handle) = lock(&self.slot).as_mut().filter(|h| h.id == id) {
            handle.pid = pid;
        }
    }

    fn signal_current(&self) -> Result<KillConfirmation> {
        let slot = lock(&self.slot);
        let handle = slot.as_ref().ok_or(ProbeError::NoActiveProcess)?;
        handle.terminate()?;
        Ok(KillConfirmation { pid: handle.pid })
    }

    /// Spawn the planned process with piped output
    fn spawn(plan: &SpawnPlan) -> Result<Child> {
        Command::new(&plan.program)
            .args(&plan.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProbeError::Spawn {
                program: plan.program.clone(),
                source,
            })
    }

    /// Stream stdout into the parser until end-of-stream, then reap the child
    async fn run(
        &self,
        id: u64,
        child: &mut Child,
        parser: &mut dyn OutputParser,
        cancel: &Notify,
    ) -> Result<ProbeResult> {
        let stderr = child.stderr.take();
        let (streamed, diagnostics) = tokio::join!(
            stream_stdout(child, parser, cancel),
            read_diagnostics(stderr)
        );
        streamed?;

        // the pid may be reused once reaped; kill() falls back to the notifier
        self.record_pid(id, None);
        let status = loop {
            tokio::select! {
                status = child.wait() => {
                    break status.map_err(|e| ProbeError::Process(format!("waiting for ping: {}", e)))?;
                }
                _ = cancel.notified() => {
                    info!(pid = ?child.id(), "Killing ping process");
                    child
                        .start_kill()
                        .map_err(|e| ProbeError::Process(format!("kill failed: {}", e)))?;
                }
            }
        };
        debug!(status = %status, "Ping process exited");

        Ok(parser.finalize()?.with_diagnostics(&diagnostics))
    }
}

/// Feed every complete stdout line to the parser, in order
async fn stream_stdout(
    child: &mut Child,
    parser: &mut dyn OutputParser,
    cancel: &Notify,
) -> Result<()> {
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| ProbeError::Process("stdout was not captured".to_string()))?;

    let mut assembler = LineAssembler::new();
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];
    let mut kill_requested = false;

    loop {
        tokio::select! {
            read = stdout.read(&mut chunk) => {
                let n = read.map_err(|e| ProbeError::Process(format!("reading ping output: {}", e)))?;
                if n == 0 {
                    break;
                }
                for line in assembler.push(&chunk[..n]) {
                    parser.ingest(&line)?;
                }
            }
            _ = cancel.notified(), if !kill_requested => {
                kill_requested = true;
                info!(pid = ?child.id(), "Killing ping process");
                child
                    .start_kill()
                    .map_err(|e| ProbeError::Process(format!("kill failed: {}", e)))?;
            }
        }
    }

    if let Some(line) = assembler.finish() {
        parser.ingest(&line)?;
    }
    Ok(())
}

/// Collect stderr as diagnostic text; it is never parsed
async fn read_diagnostics<R: AsyncRead + Unpin>(stderr: Option<R>) -> String {
    let Some(mut stderr) = stderr else {
        return String::new();
    };

    let mut buf = Vec::new();
    if let Err(e) = stderr.read_to_end(&mut buf).await {
        warn!(error = %e, "Failed to read ping stderr");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[async_trait]
impl Prober for ProcessController {
    async fn probe(&self, target: &str, options: &ProbeOptions) -> Result<ProbeResult> {
        let (guard, cancel) = self.reserve()?;

        let plan = self
            .planner
            .plan(target, options)
            .map_err(ProbeError::spawn_configuration)?;
        let mut parser = ParserFactory::create(&plan.platform, target, options)
            .map_err(ProbeError::spawn_configuration)?;

        info!(
            program = %plan.program,
            args = ?plan.args,
            platform = %plan.platform,
            "Starting ping probe"
        );

        let mut child = Self::spawn(&plan)?;
        self.record_pid(guard.id, child.id());

        let outcome = self
            .run(guard.id, &mut child, parser.as_mut(), &cancel)
            .await;

        match &outcome {
            Ok(result) => info!(
                host = %result.host,
                alive = result.alive,
                sent = result.packets_sent,
                received = result.packets_received,
                avg_ms = ?result.avg,
                "Ping probe completed"
            ),
            Err(e) => warn!(host = %target, error = %e, "Ping probe failed"),
        }

        drop(guard);
        outcome
    }

    async fn kill(&self) -> Result<KillConfirmation> {
        self.signal_current()
    }
}
