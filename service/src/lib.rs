//! Service contains the rental workflow logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

#[cfg(test)]
use tempfile as _;

pub mod command;
pub mod domain;
pub mod inflight;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use common::{
    operations::{By, Start},
    pagination,
};
use derive_more::{Debug, Error};

use crate::domain::{payment::intent, trip};
#[cfg(doc)]
use crate::infra::{Gateway, Scratch};

pub use self::{
    command::Command, inflight::InFlight, query::Query, task::Task,
};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Page size of the lists fetched from the remote services.
    pub list_page_size: u32,

    /// [`trip::Validation`] of the return readings.
    pub return_validation: trip::Validation,

    /// [`task::ExpirePaymentIntents`] configuration.
    pub expire_payment_intents: task::expire_payment_intents::Config,
}

impl Config {
    /// Returns the [`pagination::Request`] of the first page of a list.
    #[must_use]
    pub const fn first_page(&self) -> pagination::Request {
        pagination::Request::first(self.list_page_size)
    }
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Gw, Sc> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Gateway`] of this [`Service`].
    gateway: Gw,

    /// [`Scratch`] store of this [`Service`].
    scratch: Sc,

    /// [`InFlight`] submissions of this [`Service`].
    in_flight: InFlight,
}

impl<Gw, Sc> Service<Gw, Sc> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(
        config: Config,
        gateway: Gw,
        scratch: Sc,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::ExpirePaymentIntents<Self>,
                        task::expire_payment_intents::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            gateway,
            scratch,
            in_flight: InFlight::default(),
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn("ExpirePaymentIntents", async move {
            svc.execute(Start(By::new(svc.config().expire_payment_intents)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Gateway`] of this [`Service`].
    #[must_use]
    pub fn gateway(&self) -> &Gw {
        &self.gateway
    }

    /// Returns [`Scratch`] store of this [`Service`].
    #[must_use]
    pub fn scratch(&self) -> &Sc {
        &self.scratch
    }

    /// Returns [`InFlight`] submissions of this [`Service`].
    #[must_use]
    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Returns a copy of this [`Service`] talking through the provided
    /// [`Gateway`] instead.
    ///
    /// The [`Scratch`] store and the [`InFlight`] submissions stay shared.
    #[must_use]
    pub fn with_gateway<G>(&self, gateway: G) -> Service<G, Sc>
    where
        Sc: Clone,
    {
        Service {
            config: self.config,
            gateway,
            scratch: self.scratch.clone(),
            in_flight: self.in_flight.clone(),
        }
    }

    /// Returns the deadline a payment [`intent::Intent`] must be issued
    /// after to be still valid.
    fn intent_deadline(&self) -> intent::IssuanceDateTime {
        intent::IssuanceDateTime::now()
            - self.config.expire_payment_intents.timeout
    }
}

#[cfg(test)]
mod testing {
    //! Helpers for testing [`Command`]s and [`Query`]s.

    use common::Money;
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            payment::{self, Payment, TransactionRef},
            rental, trip, Rental,
        },
        infra::{gateway::Fake, scratch::Store},
        task, Config, InFlight, Service,
    };

    /// Creates a new [`Service`] over the provided [`Fake`] and an in-memory
    /// [`Store`].
    pub(crate) fn service(gateway: Fake) -> Service<Fake, Store> {
        Service {
            config: Config {
                list_page_size: 100,
                return_validation: trip::Validation::default(),
                expire_payment_intents: task::expire_payment_intents::Config {
                    interval: std::time::Duration::from_secs(60),
                    timeout: std::time::Duration::from_secs(300),
                },
            },
            gateway,
            scratch: Store::in_memory(),
            in_flight: InFlight::default(),
        }
    }

    /// Creates a [`Money`] amount in the default currency.
    pub(crate) fn vnd(amount: i64) -> Money {
        Money::new(Decimal::from(amount))
    }

    /// Creates a [`Rental`] with the provided ID, estimated cost and
    /// [`rental::Status`].
    pub(crate) fn rental(
        id: &str,
        estimated_cost: i64,
        status: rental::Status,
    ) -> Rental {
        Rental {
            id: id.parse().unwrap(),
            renter_id: "u-1".parse().unwrap(),
            vehicle_id: "v-1".parse().unwrap(),
            start_time: rental::StartDateTime::now(),
            end_time: None,
            estimated_cost: vnd(estimated_cost),
            actual_cost: None,
            status,
            start_battery: None,
            start_mileage: None,
        }
    }

    /// Creates a [`Payment`] of the provided [`Rental`].
    pub(crate) fn payment(
        rental_id: &str,
        amount: i64,
        tag: &str,
        status: payment::Status,
    ) -> Payment {
        let transaction_ref = TransactionRef::from(tag.to_owned());
        Payment {
            id: format!("{tag}-{rental_id}").into(),
            rental_id: rental_id.parse().unwrap(),
            amount: vnd(amount),
            method: payment::Method::Cash,
            role: transaction_ref.role(),
            transaction_ref,
            status,
        }
    }
}
