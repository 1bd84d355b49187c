//! [`Contract`]-related [`Gateway`] implementations.

use common::operations::{By, Select, Update};
use reqwest::Method;
use tracerr::Traced;

use crate::{
    domain::{contract, rental, Contract},
    infra::{
        gateway::{self, Http},
        Gateway,
    },
};

impl Gateway<Select<By<Option<Contract>, rental::Id>>> for Http {
    type Ok = Option<Contract>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let rental_id = by.into_inner();
        Self::fetch_optional(self.request(
            Method::GET,
            &format!("/rental/contracts/rental/{rental_id}"),
        ))
        .await
    }
}

impl Gateway<Update<contract::Sign>> for Http {
    type Ok = Contract;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Update(sign): Update<contract::Sign>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::fetch(
            self.request(
                Method::PATCH,
                &format!("/rental/contracts/{}/sign", sign.contract_id),
            )
            .json(&contract::Sign::BODY),
        )
        .await
    }
}
