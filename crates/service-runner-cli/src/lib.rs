mod dispatcher;

pub use clap;
pub use dispatcher::*;
