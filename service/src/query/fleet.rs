//! [`Query`] collection related to [`Branch`]es and their vehicles.

use common::operations::By;

use crate::domain::{vehicle, vehicle_type, Branch, Vehicle, VehicleType};
#[cfg(doc)]
use crate::Query;

use super::GatewayQuery;

/// Queries all the [`Branch`]es.
pub type Branches = GatewayQuery<By<Vec<Branch>, ()>>;

/// Queries all the [`Vehicle`]s.
pub type Vehicles = GatewayQuery<By<Vec<Vehicle>, ()>>;

/// Queries a [`Vehicle`] by its [`vehicle::Id`].
pub type VehicleById = GatewayQuery<By<Option<Vehicle>, vehicle::Id>>;

/// Queries all the [`VehicleType`]s.
pub type VehicleTypes = GatewayQuery<By<Vec<VehicleType>, ()>>;

/// Queries a [`VehicleType`] by its [`vehicle_type::Id`].
pub type VehicleTypeById =
    GatewayQuery<By<Option<VehicleType>, vehicle_type::Id>>;
