//! [`Command`] for abandoning a payment made through the external gateway.

use common::operations::{By, Delete};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{payment::Intent, rental},
    infra::{scratch, Scratch},
    Service,
};

use super::Command;

/// [`Command`] for abandoning a payment the external gateway reported as
/// failed.
///
/// Clears the pending [`Intent`] of the [`Rental`] and returns it, if any.
/// The [`Rental`] itself stays untouched.
///
/// [`Rental`]: crate::domain::Rental
#[derive(Clone, Debug)]
pub struct FailGatewayPayment {
    /// ID of the [`Rental`] the gateway reported the payment of.
    pub rental_id: rental::Id,
}

impl<Gw, Sc> Command<FailGatewayPayment> for Service<Gw, Sc>
where
    Sc: Scratch<
        Delete<By<Option<Intent>, rental::Id>>,
        Ok = Option<Intent>,
        Err = Traced<scratch::Error>,
    >,
{
    type Ok = Option<Intent>;
    type Err = Traced<scratch::Error>;

    async fn execute(
        &self,
        cmd: FailGatewayPayment,
    ) -> Result<Self::Ok, Self::Err> {
        let abandoned = self
            .scratch()
            .execute(Delete(By::<Option<Intent>, _>::new(cmd.rental_id)))
            .await
            .map_err(tracerr::wrap!())?;

        if let Some(intent) = &abandoned {
            log::info!(
                "abandoned `{}` payment of `Rental(id: {})`",
                intent.kind,
                intent.rental_id,
            );
        }

        Ok(abandoned)
    }
}
