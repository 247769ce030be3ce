//! Domain models for the administrative core.

mod insurer;
mod ledger;
mod patient;
mod register;
mod sample;

pub use insurer::*;
pub use ledger::*;
pub use patient::*;
pub use register::*;
pub use sample::*;
