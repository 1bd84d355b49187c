//! Domain definitions.

pub mod branch;
pub mod contract;
pub mod payment;
pub mod penalty;
pub mod rental;
pub mod settlement;
pub mod trip;
pub mod user;
pub mod vehicle;
pub mod vehicle_type;
pub mod workforce;

pub use self::{
    branch::Branch, contract::Contract, payment::Payment, penalty::Penalty,
    rental::Rental, settlement::Settlement, user::User, vehicle::Vehicle,
    vehicle_type::VehicleType,
};
