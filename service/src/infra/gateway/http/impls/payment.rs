//! [`Payment`]-related [`Gateway`] implementations.

use common::{
    operations::{By, Insert, Select},
    pagination,
};
use reqwest::Method;
use tracerr::Traced;

use crate::{
    domain::{payment, rental, Payment},
    infra::{
        gateway::{self, Http},
        Gateway,
    },
};

impl Gateway<Insert<payment::New>> for Http {
    type Ok = Payment;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<payment::New>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::fetch(
            self.request(Method::POST, "/payment/payments").json(&payment),
        )
        .await
    }
}

impl
    Gateway<
        Select<
            By<pagination::Page<Payment>, (rental::Id, pagination::Request)>,
        >,
    > for Http
{
    type Ok = pagination::Page<Payment>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<pagination::Page<Payment>, (rental::Id, pagination::Request)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (rental_id, page) = by.into_inner();
        Self::fetch(
            self.request(
                Method::GET,
                &format!("/payment/payments/rental/{rental_id}"),
            )
            .query(&page),
        )
        .await
    }
}

impl Gateway<Insert<payment::GatewayCheckout>> for Http {
    type Ok = payment::RedirectUrl;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Insert(checkout): Insert<payment::GatewayCheckout>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::fetch(
            self.request(Method::POST, "/payment/vnpay/create-url")
                .json(&checkout),
        )
        .await
    }
}
