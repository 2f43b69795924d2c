// Prober Port
// Abstraction over "run one ping and give me a structured answer"

use crate::domain::{ProbeOptions, ProbeResult};
use crate::error::Result;
use async_trait::async_trait;

/// Acknowledgement that a termination signal was delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillConfirmation {
    /// Pid of the signalled process, if it had been spawned yet
    pub pid: Option<u32>,
}

impl std::fmt::Display for KillConfirmation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "Ping process {} killed", pid),
            None => write!(f, "Ping process killed before it started"),
        }
    }
}

/// Prober trait
///
/// Implementations:
/// - ProcessController: spawns the system ping executable
/// - MockProber: scripted outcomes for tests
#[async_trait]
pub trait Prober: Send + Sync {
    /// Run one probe against `target`
    ///
    /// An unreachable host is a successful result with `alive = false`.
    ///
    /// # Errors
    /// - ProbeError::SpawnConfiguration if arguments/executable cannot be chosen
    /// - ProbeError::Spawn if the process cannot be started
    /// - ProbeError::Process if the OS reports a fault after spawn
    /// - ProbeError::ProbeAlreadyRunning if another probe holds the slot
    async fn probe(&self, target: &str, options: &ProbeOptions) -> Result<ProbeResult>;

    /// Terminate the in-flight probe's process
    ///
    /// Returns once the signal is sent; the probe settles on its own.
    ///
    /// # Errors
    /// - ProbeError::NoActiveProcess if nothing is in flight
    async fn kill(&self) -> Result<KillConfirmation>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::ProbeError;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Mock prober behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Settle after the delay with this result
        Reply(Duration, ProbeResult),
        /// Never settle until killed, then resolve with this partial result
        HangUntilKilled(ProbeResult),
        /// Fail immediately
        FailSpawn(String),
    }

    /// Mock Prober for testing
    pub struct MockProber {
        behavior: Arc<Mutex<MockBehavior>>,
        killed: Arc<Notify>,
        kill_count: Arc<Mutex<usize>>,
        in_flight: Arc<Mutex<bool>>,
    }

    impl MockProber {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                killed: Arc::new(Notify::new()),
                kill_count: Arc::new(Mutex::new(0)),
                in_flight: Arc::new(Mutex::new(false)),
            }
        }

        pub fn kill_count(&self) -> usize {
            *self.kill_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl Prober for MockProber {
        async fn probe(&self, _target: &str, _options: &ProbeOptions) -> Result<ProbeResult> {
            let behavior = self.behavior.lock().unwrap().clone();
            *self.in_flight.lock().unwrap() = true;

            let outcome = match behavior {
                MockBehavior::Reply(delay, result) => {
                    tokio::time::sleep(delay).await;
                    Ok(result)
                }
                MockBehavior::HangUntilKilled(partial) => {
                    self.killed.notified().await;
                    Ok(partial)
                }
                MockBehavior::FailSpawn(program) => Err(ProbeError::Spawn {
                    program,
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            };

            *self.in_flight.lock().unwrap() = false;
            outcome
        }

        async fn kill(&self) -> Result<KillConfirmation> {
            if !*self.in_flight.lock().unwrap() {
                return Err(ProbeError::NoActiveProcess);
            }
            *self.kill_count.lock().unwrap() += 1;
            self.killed.notify_one();
            Ok(KillConfirmation { pid: None })
        }
    }
}
