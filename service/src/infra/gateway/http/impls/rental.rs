//! [`Rental`]-related [`Gateway`] implementations.

use common::operations::{By, Insert, Select, Update};
use reqwest::Method;
use serde::Serialize;
use tracerr::Traced;

use crate::{
    domain::{
        rental,
        trip::{BatteryLevel, Mileage, PhotoSlot},
        Rental,
    },
    infra::{
        gateway::{self, Http},
        Gateway,
    },
};

impl Gateway<Select<By<Option<Rental>, rental::Id>>> for Http {
    type Ok = Option<Rental>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Self::fetch_optional(
            self.request(Method::GET, &format!("/rental/orders/{id}")),
        )
        .await
    }
}

impl Gateway<Update<rental::StatusChange>> for Http {
    type Ok = ();
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Update(change): Update<rental::StatusChange>,
    ) -> Result<Self::Ok, Self::Err> {
        #[derive(Serialize)]
        struct Body {
            status: rental::Status,
        }

        let rental::StatusChange { rental_id, status } = change;
        Self::perform(
            self.request(
                Method::PATCH,
                &format!("/rental/orders/{rental_id}/status"),
            )
            .json(&Body { status }),
        )
        .await
    }
}

impl Gateway<Insert<rental::Checkout>> for Http {
    type Ok = ();
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Insert(checkout): Insert<rental::Checkout>,
    ) -> Result<Self::Ok, Self::Err> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            end_battery: BatteryLevel,
            end_mileage: Mileage,
            damage_notes: Option<&'a str>,
            photos: Vec<Photo<'a>>,
        }

        #[derive(Serialize)]
        struct Photo<'a> {
            slot: PhotoSlot,
            url: &'a str,
        }

        let body = Body {
            end_battery: checkout.readings.battery,
            end_mileage: checkout.readings.mileage,
            damage_notes: checkout.damage_notes.as_deref(),
            photos: checkout
                .photos
                .captured()
                .map(|(slot, url)| Photo { slot, url })
                .collect(),
        };
        Self::perform(
            self.request(
                Method::POST,
                &format!("/rental/orders/{}/checkout", checkout.rental_id),
            )
            .json(&body),
        )
        .await
    }
}
