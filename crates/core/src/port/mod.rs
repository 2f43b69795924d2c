// Port Layer - Interfaces between core logic and the OS

pub mod output_parser;
pub mod prober;
pub mod spawn_planner;

// Re-exports
pub use output_parser::OutputParser;
pub use prober::{KillConfirmation, Prober};
pub use spawn_planner::{SpawnPlan, SpawnPlanner};
