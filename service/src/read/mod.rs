//! Read entities definitions.

pub mod contract;
pub mod rental;
pub mod schedule;
pub mod settlement;

pub use self::{rental::Session, schedule::Schedule};
