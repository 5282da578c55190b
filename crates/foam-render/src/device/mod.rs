//! Headless GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a surface
//! - reporting shader compilation diagnostics

mod gpu;
mod init;

pub use gpu::{log_compilation_info, Gpu};
pub use init::GpuInit;
