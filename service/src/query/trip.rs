//! [`Query`] previewing the [`trip::Summary`] of a [`Rental`].

use common::{
    operations::{By, Select},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::{rental, trip, Rental},
    infra::{gateway, Gateway},
    Service,
};

use super::{rental_session::ExecutionError, Query};

/// [`Query`] previewing the [`trip::Summary`] of a [`Rental`] without
/// checking it out.
#[derive(Clone, Debug)]
pub struct TripSummary {
    /// ID of the [`Rental`] to summarize the trip of.
    pub rental_id: rental::Id,

    /// [`trip::Readings`] taken at return.
    pub readings: trip::Readings,
}

impl<Gw, Sc> Query<TripSummary> for Service<Gw, Sc>
where
    Gw: Gateway<
        Select<By<Option<Rental>, rental::Id>>,
        Ok = Option<Rental>,
        Err = Traced<gateway::Error>,
    >,
{
    /// [`None`] if the handover [`trip::Readings`] are unknown.
    type Ok = Option<trip::Summary>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: TripSummary,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let TripSummary {
            rental_id,
            readings,
        } = query;

        let rental = self
            .gateway()
            .execute(Select(By::<Option<Rental>, _>::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(rental_id))
            .map_err(tracerr::wrap!())?;

        Ok(rental.start_readings().map(|start| {
            trip::Summary::new(
                start,
                readings,
                rental.start_time,
                DateTime::now(),
            )
        }))
    }
}
