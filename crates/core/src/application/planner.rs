// System Spawn Planner
// Production SpawnPlanner: argument builder + executable resolver for one platform

use super::{arguments, executable};
use crate::domain::{Platform, ProbeOptions};
use crate::error::Result;
use crate::port::{SpawnPlan, SpawnPlanner};

/// Plans spawns of the platform's own ping executable
#[derive(Debug, Clone)]
pub struct SystemSpawnPlanner {
    platform: Platform,
}

impl SystemSpawnPlanner {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Planner for the platform this process runs on
    pub fn for_current_platform() -> Self {
        Self::new(Platform::current())
    }
}

impl SpawnPlanner for SystemSpawnPlanner {
    fn plan(&self, target: &str, options: &ProbeOptions) -> Result<SpawnPlan> {
        self.platform.ensure_supported()?;
        let program = executable::resolve(&self.platform, options.use_ipv6)?;
        let args = arguments::build(&self.platform, target, options)?;

        Ok(SpawnPlan {
            platform: self.platform.clone(),
            program: program.to_string(),
            args,
        })
    }
}
