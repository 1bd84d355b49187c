//! [`Gateway`] implementations of the remote services.
//!
//! [`Gateway`]: crate::infra::Gateway

mod contract;
mod fleet;
mod payment;
mod penalty;
mod rental;
mod user;
mod workforce;
