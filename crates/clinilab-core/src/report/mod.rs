//! Reports and display transforms.

mod format;
mod participation;

pub use format::*;
pub use participation::*;
