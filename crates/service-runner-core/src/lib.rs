mod action;
pub use action::*;

mod configuration;
pub use configuration::*;

mod identity;
pub use identity::*;

use std::error::Error;

pub type BoxedError = Box<dyn Error + Send + Sync + 'static>;
