mod lifecycle;
pub use lifecycle::*;

mod manager;
pub use manager::*;

mod platform;
pub use platform::*;

pub mod systemd;
