//! Board configuration loading and validation.

mod loader;
mod types;
mod validator;

pub use loader::ConfigLoader;
pub use types::*;
pub use validator::ConfigValidator;
