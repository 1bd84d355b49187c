//! [`Query`] previewing the settlement of a [`Rental`].

use tracerr::Traced;

use crate::{
    domain::rental,
    read::{settlement::Preview, Session},
    Service,
};
#[cfg(doc)]
use crate::domain::Rental;

use super::{rental_session, Query, RentalSession};

/// [`Query`] previewing the settlement of a [`Rental`].
#[derive(Clone, Debug)]
pub struct SettlementPreview {
    /// ID of the [`Rental`] to preview the settlement of.
    pub rental_id: rental::Id,
}

impl<Gw, Sc> Query<SettlementPreview> for Service<Gw, Sc>
where
    Self: Query<
        RentalSession,
        Ok = Session,
        Err = Traced<rental_session::ExecutionError>,
    >,
{
    type Ok = Preview;
    type Err = Traced<rental_session::ExecutionError>;

    async fn execute(
        &self,
        query: SettlementPreview,
    ) -> Result<Self::Ok, Self::Err> {
        let SettlementPreview { rental_id } = query;

        let session = self
            .execute(RentalSession { rental_id })
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Preview::of(&session))
    }
}
