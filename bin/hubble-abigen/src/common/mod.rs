mod error;
mod logging;
mod manifest;

pub use error::*;
pub use logging::*;
pub use manifest::*;
