mod logger_builder;
mod timezone;
mod user_config;

pub use logger_builder::*;
pub use timezone::*;
pub use user_config::*;
pub use {time, tracing_subscriber};
