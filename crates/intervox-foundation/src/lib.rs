pub mod error;
pub mod phase;
pub mod types;

pub use error::*;
pub use phase::*;
pub use types::*;
