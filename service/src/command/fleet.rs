//! [`Command`] collection related to vehicles.

use common::operations::{By, Delete, Insert, Update};

use crate::domain::{vehicle, vehicle_type, Vehicle, VehicleType};
#[cfg(doc)]
use crate::Command;

use super::GatewayCommand;

/// Creates a new [`Vehicle`].
pub type CreateVehicle = GatewayCommand<Insert<vehicle::Draft>>;

/// Updates an existing [`Vehicle`].
pub type UpdateVehicle = GatewayCommand<Update<vehicle::Edit>>;

/// Deletes a [`Vehicle`] by its [`vehicle::Id`].
pub type DeleteVehicle = GatewayCommand<Delete<By<Vehicle, vehicle::Id>>>;

/// Creates a new [`VehicleType`].
pub type CreateVehicleType = GatewayCommand<Insert<vehicle_type::Draft>>;

/// Updates an existing [`VehicleType`].
pub type UpdateVehicleType = GatewayCommand<Update<vehicle_type::Edit>>;

/// Deletes a [`VehicleType`] by its [`vehicle_type::Id`].
pub type DeleteVehicleType =
    GatewayCommand<Delete<By<VehicleType, vehicle_type::Id>>>;
