//! [`Vehicle`] definitions.

use common::{define_id, define_kind};
use serde::{Deserialize, Serialize};

use crate::domain::{branch, trip, vehicle_type};
#[cfg(doc)]
use crate::domain::{Branch, VehicleType};

/// Electric vehicle of the rental fleet.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// ID of this [`Vehicle`].
    pub id: Id,

    /// License plate of this [`Vehicle`].
    pub license_plate: String,

    /// Model name of this [`Vehicle`].
    #[serde(default)]
    pub model: Option<String>,

    /// ID of the [`VehicleType`] of this [`Vehicle`].
    #[serde(default)]
    pub vehicle_type_id: Option<vehicle_type::Id>,

    /// ID of the [`Branch`] this [`Vehicle`] is stationed at.
    #[serde(default)]
    pub branch_id: Option<branch::Id>,

    /// [`Status`] of this [`Vehicle`].
    pub status: Status,

    /// Last known battery level of this [`Vehicle`].
    #[serde(default)]
    pub battery_level: Option<trip::BatteryLevel>,
}

define_id! {
    #[doc = "ID of a [`Vehicle`]."]
    Id
}

define_kind! {
    #[doc = "Availability status of a [`Vehicle`]."]
    enum Status {
        #[doc = "Ready to be rented."]
        Available = "Available",

        #[doc = "Rented out."]
        Rented = "Rented",

        #[doc = "Under maintenance."]
        Maintenance = "Maintenance",

        #[doc = "Charging."]
        Charging = "Charging",
    }
}

/// Attributes of a [`Vehicle`] to be created or updated.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// License plate.
    pub license_plate: String,

    /// Model name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// ID of the [`VehicleType`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type_id: Option<vehicle_type::Id>,

    /// ID of the [`Branch`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<branch::Id>,

    /// Availability [`Status`].
    pub status: Status,

    /// Battery level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<trip::BatteryLevel>,
}

/// Update of an existing [`Vehicle`].
#[derive(Clone, Debug)]
pub struct Edit {
    /// ID of the updated [`Vehicle`].
    pub id: Id,

    /// New attributes of the [`Vehicle`].
    pub draft: Draft,
}
