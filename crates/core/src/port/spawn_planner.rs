// Spawn Planner Port
// Decides what to execute for a probe; no I/O

use crate::domain::{Platform, ProbeOptions};
use crate::error::Result;

/// Everything needed to start one ping process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnPlan {
    /// Grammar the process output follows
    pub platform: Platform,
    pub program: String,
    pub args: Vec<String>,
}

/// Spawn planner port
///
/// Implementations:
/// - SystemSpawnPlanner: ArgumentBuilder + ExecutablePathResolver for a platform
/// - scripted planners in tests
pub trait SpawnPlanner: Send + Sync {
    /// # Errors
    /// - ProbeError::UnsupportedPlatform if no grammar exists for the platform
    fn plan(&self, target: &str, options: &ProbeOptions) -> Result<SpawnPlan>;
}
