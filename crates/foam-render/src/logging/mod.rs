//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only talks to the `log`
//! facade; `env_logger` is installed here when the host asks for it.

mod init;

pub use init::{init_logging, LoggingConfig};
