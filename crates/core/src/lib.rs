// sysping Core - Domain, Ports, Parsers
// NO process spawning here: the infra-system crate owns the child process

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{ProbeError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
