//! [`Penalty`]-related [`Gateway`] implementations.

use common::{
    operations::{By, Select},
    pagination,
};
use reqwest::Method;
use tracerr::Traced;

use crate::{
    domain::{rental, Penalty},
    infra::{
        gateway::{self, Http},
        Gateway,
    },
};

impl
    Gateway<
        Select<
            By<pagination::Page<Penalty>, (rental::Id, pagination::Request)>,
        >,
    > for Http
{
    type Ok = pagination::Page<Penalty>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<pagination::Page<Penalty>, (rental::Id, pagination::Request)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (rental_id, page) = by.into_inner();
        Self::fetch(
            self.request(
                Method::GET,
                &format!("/rental/penalties/rental/{rental_id}"),
            )
            .query(&page),
        )
        .await
    }
}
