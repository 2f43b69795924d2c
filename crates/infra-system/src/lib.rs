// sysping Infrastructure - System Adapters
// Implements: Prober (child process lifecycle)

pub mod process_controller;

pub use process_controller::ProcessController;
