//! Fleet definitions: `Branch`es, `Vehicle`s and their `VehicleType`s.

use common::Money;
use derive_more::{AsRef, Display, From, Into};
use juniper::{GraphQLEnum, GraphQLInputObject, GraphQLObject, GraphQLScalar};
use service::domain::{self, trip, vehicle, vehicle_type};

use crate::{api::scalar, define_error, Context, Error};

/// Branch of the rental platform.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Branch {
    /// Unique identifier of this `Branch`.
    pub id: BranchId,

    /// Name of this `Branch`.
    pub name: String,

    /// Address of this `Branch`, if known.
    pub address: Option<String>,

    /// Phone number of this `Branch`, if known.
    pub phone: Option<String>,
}

impl From<domain::Branch> for Branch {
    fn from(branch: domain::Branch) -> Self {
        Self {
            id: branch.id.into(),
            name: branch.name,
            address: branch.address,
            phone: branch.phone,
        }
    }
}

/// Unique identifier of a `Branch`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "BranchId", with = scalar::Via::<domain::branch::Id>)]
pub struct BranchId(domain::branch::Id);

/// Rentable vehicle.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Vehicle {
    /// Unique identifier of this `Vehicle`.
    pub id: VehicleId,

    /// License plate of this `Vehicle`.
    pub license_plate: String,

    /// Model of this `Vehicle`, if known.
    pub model: Option<String>,

    /// `VehicleType` of this `Vehicle`, if assigned.
    pub vehicle_type_id: Option<VehicleTypeId>,

    /// `Branch` this `Vehicle` is parked at, if assigned.
    pub branch_id: Option<BranchId>,

    /// Availability status of this `Vehicle`.
    pub status: VehicleStatus,

    /// Battery level in percent, if reported.
    pub battery_level: Option<i32>,
}

impl From<domain::Vehicle> for Vehicle {
    fn from(v: domain::Vehicle) -> Self {
        Self {
            id: v.id.into(),
            license_plate: v.license_plate,
            model: v.model,
            vehicle_type_id: v.vehicle_type_id.map(Into::into),
            branch_id: v.branch_id.map(Into::into),
            status: v.status.into(),
            battery_level: v.battery_level.map(|b| b.value().into()),
        }
    }
}

/// Unique identifier of a `Vehicle`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "VehicleId", with = scalar::Via::<vehicle::Id>)]
pub struct VehicleId(vehicle::Id);

/// Availability status of a `Vehicle`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum VehicleStatus {
    /// Ready to be rented.
    Available,

    /// Rented out.
    Rented,

    /// Under maintenance.
    Maintenance,

    /// Charging.
    Charging,
}

impl From<vehicle::Status> for VehicleStatus {
    fn from(status: vehicle::Status) -> Self {
        use vehicle::Status as S;

        match status {
            S::Available => Self::Available,
            S::Rented => Self::Rented,
            S::Maintenance => Self::Maintenance,
            S::Charging => Self::Charging,
        }
    }
}

impl From<VehicleStatus> for vehicle::Status {
    fn from(status: VehicleStatus) -> Self {
        match status {
            VehicleStatus::Available => Self::Available,
            VehicleStatus::Rented => Self::Rented,
            VehicleStatus::Maintenance => Self::Maintenance,
            VehicleStatus::Charging => Self::Charging,
        }
    }
}

/// `Vehicle` to create or to update with.
#[derive(Clone, Debug, GraphQLInputObject)]
pub struct VehicleInput {
    /// License plate of the `Vehicle`.
    pub license_plate: String,

    /// Model of the `Vehicle`.
    pub model: Option<String>,

    /// `VehicleType` of the `Vehicle`.
    pub vehicle_type_id: Option<VehicleTypeId>,

    /// `Branch` the `Vehicle` is parked at.
    pub branch_id: Option<BranchId>,

    /// Availability status of the `Vehicle`.
    pub status: VehicleStatus,

    /// Battery level in percent, within `0..=100`.
    pub battery_level: Option<i32>,
}

impl TryFrom<VehicleInput> for vehicle::Draft {
    type Error = Error;

    fn try_from(input: VehicleInput) -> Result<Self, Self::Error> {
        let battery_level = input
            .battery_level
            .map(|b| {
                i16::try_from(b)
                    .map(trip::BatteryLevel::from)
                    .ok()
                    .filter(|b| b.is_in_range())
                    .ok_or(FleetError::InvalidBatteryLevel)
            })
            .transpose()?;
        Ok(Self {
            license_plate: input.license_plate,
            model: input.model,
            vehicle_type_id: input.vehicle_type_id.map(Into::into),
            branch_id: input.branch_id.map(Into::into),
            status: input.status.into(),
            battery_level,
        })
    }
}

/// Type of `Vehicle`s along with its pricing.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct VehicleType {
    /// Unique identifier of this `VehicleType`.
    pub id: VehicleTypeId,

    /// Name of this `VehicleType`.
    pub name: String,

    /// Description of this `VehicleType`, if any.
    pub description: Option<String>,

    /// Rental price per hour, if set.
    pub price_per_hour: Option<Money>,

    /// Number of seats, if known.
    pub seats: Option<i32>,

    /// Driving range on a full battery in kilometers, if known.
    pub range_km: Option<i32>,
}

impl From<domain::VehicleType> for VehicleType {
    fn from(t: domain::VehicleType) -> Self {
        Self {
            id: t.id.into(),
            name: t.name,
            description: t.description,
            price_per_hour: t.price_per_hour,
            seats: t.seats.map(Into::into),
            range_km: t.range_km.map(|r| i32::try_from(r).unwrap_or(i32::MAX)),
        }
    }
}

/// Unique identifier of a `VehicleType`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "VehicleTypeId", with = scalar::Via::<vehicle_type::Id>)]
pub struct VehicleTypeId(vehicle_type::Id);

/// `VehicleType` to create or to update with.
#[derive(Clone, Debug, GraphQLInputObject)]
pub struct VehicleTypeInput {
    /// Name of the `VehicleType`.
    pub name: String,

    /// Description of the `VehicleType`.
    pub description: Option<String>,

    /// Rental price per hour.
    pub price_per_hour: Option<Money>,

    /// Number of seats.
    pub seats: Option<i32>,

    /// Driving range on a full battery in kilometers.
    pub range_km: Option<i32>,
}

impl TryFrom<VehicleTypeInput> for vehicle_type::Draft {
    type Error = Error;

    fn try_from(input: VehicleTypeInput) -> Result<Self, Self::Error> {
        if input.price_per_hour.is_some_and(|p| p.is_negative()) {
            return Err(FleetError::InvalidVehicleType.into());
        }
        let seats = input
            .seats
            .map(u16::try_from)
            .transpose()
            .map_err(|_| FleetError::InvalidVehicleType)?;
        let range_km = input
            .range_km
            .map(u32::try_from)
            .transpose()
            .map_err(|_| FleetError::InvalidVehicleType)?;
        Ok(Self {
            name: input.name,
            description: input.description,
            price_per_hour: input.price_per_hour,
            seats,
            range_km,
        })
    }
}

define_error! {
    enum FleetError {
        #[code = "VEHICLE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Vehicle` with the provided ID does not exist"]
        VehicleNotExists,

        #[code = "VEHICLE_TYPE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`VehicleType` with the provided ID does not exist"]
        VehicleTypeNotExists,

        #[code = "INVALID_BATTERY_LEVEL"]
        #[status = BAD_REQUEST]
        #[message = "Battery level must be within 0..=100"]
        InvalidBatteryLevel,

        #[code = "INVALID_VEHICLE_TYPE"]
        #[status = BAD_REQUEST]
        #[message = "Price, seats and range must not be negative"]
        InvalidVehicleType,
    }
}

#[cfg(test)]
mod spec {
    use service::domain::{vehicle, vehicle_type};

    use super::{VehicleInput, VehicleStatus, VehicleTypeInput};

    fn input(battery_level: Option<i32>) -> VehicleInput {
        VehicleInput {
            license_plate: "51A-123.45".into(),
            model: Some("VF e34".into()),
            vehicle_type_id: None,
            branch_id: None,
            status: VehicleStatus::Charging,
            battery_level,
        }
    }

    #[test]
    fn status_round_trips_through_domain() {
        for &s in vehicle::Status::ALL {
            assert_eq!(vehicle::Status::from(VehicleStatus::from(s)), s);
        }
    }

    #[test]
    fn validates_battery_level() {
        let draft = vehicle::Draft::try_from(input(Some(40))).unwrap();
        assert_eq!(draft.battery_level.map(|b| b.value()), Some(40));
        assert_eq!(draft.status, vehicle::Status::Charging);

        assert!(vehicle::Draft::try_from(input(None)).is_ok());

        let err = vehicle::Draft::try_from(input(Some(120))).unwrap_err();
        assert_eq!(err.code, "INVALID_BATTERY_LEVEL");
    }

    #[test]
    fn rejects_negative_seats() {
        let err = vehicle_type::Draft::try_from(VehicleTypeInput {
            name: "Scooter".into(),
            description: None,
            price_per_hour: None,
            seats: Some(-2),
            range_km: None,
        })
        .unwrap_err();

        assert_eq!(err.code, "INVALID_VEHICLE_TYPE");
    }
}
