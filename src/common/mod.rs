pub mod error;
pub mod mask;
pub mod matrix;
pub mod metadata;

pub use error::*;
pub use mask::*;
pub use matrix::*;
pub use metadata::*;
