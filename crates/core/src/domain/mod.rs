// Domain Layer - Pure data types

pub mod options;
pub mod platform;
pub mod result;

// Re-exports
pub use options::ProbeOptions;
pub use platform::Platform;
pub use result::ProbeResult;
