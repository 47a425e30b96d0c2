//! Logger initialization for hosts.
//!
//! The engine itself only talks to the `log` facade; this module wires the
//! `env_logger` backend for binaries that want it.

mod init;

pub use init::{LoggingConfig, init_logging};
