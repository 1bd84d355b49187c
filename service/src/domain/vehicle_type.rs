//! [`VehicleType`] definitions.

use common::{define_id, Money};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::Vehicle;

/// Type of a [`Vehicle`], defining its pricing and capabilities.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleType {
    /// ID of this [`VehicleType`].
    pub id: Id,

    /// Name of this [`VehicleType`].
    #[serde(alias = "typeName")]
    pub name: String,

    /// Description of this [`VehicleType`].
    #[serde(default)]
    pub description: Option<String>,

    /// Hourly rental price.
    #[serde(default, with = "common::money::serde::option")]
    pub price_per_hour: Option<Money>,

    /// Number of seats.
    #[serde(default)]
    pub seats: Option<u16>,

    /// Driving range on a full charge, in kilometers.
    #[serde(default)]
    pub range_km: Option<u32>,
}

define_id! {
    #[doc = "ID of a [`VehicleType`]."]
    Id
}

/// Attributes of a [`VehicleType`] to be created or updated.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// Name.
    pub name: String,

    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Hourly rental price.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "common::money::serde::option"
    )]
    pub price_per_hour: Option<Money>,

    /// Number of seats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<u16>,

    /// Driving range on a full charge, in kilometers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_km: Option<u32>,
}

/// Update of an existing [`VehicleType`].
#[derive(Clone, Debug)]
pub struct Edit {
    /// ID of the updated [`VehicleType`].
    pub id: Id,

    /// New attributes of the [`VehicleType`].
    pub draft: Draft,
}
