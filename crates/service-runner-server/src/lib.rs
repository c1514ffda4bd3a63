mod bridge;
pub use bridge::*;

mod service_error;
pub use service_error::*;

mod workload;
pub use workload::*;

pub mod platform;

#[cfg(target_os = "linux")]
pub use sd_notify;
pub use tokio;
#[cfg(windows)]
pub use windows_service;
