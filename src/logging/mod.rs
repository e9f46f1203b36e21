//! Logger setup for the demo and tests.
//!
//! The library itself only talks to the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};
