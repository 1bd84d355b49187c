//! [`Command`] for redirecting a renter to the external payment gateway.

use common::{operations::Insert, Money};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        payment::{intent, GatewayCheckout, Intent, RedirectUrl},
        rental,
    },
    infra::{gateway, scratch, Gateway, Scratch},
    Service,
};
#[cfg(doc)]
use crate::domain::Rental;

use super::{transition::Outcome, Command};

/// [`Command`] for redirecting a renter to the external payment gateway.
///
/// Replaces the pending payment [`Intent`] of the [`Rental`], so the gateway
/// callback knows where to move it once the payment succeeds.
#[derive(Clone, Debug)]
pub struct RequestGatewayPayment {
    /// ID of the [`Rental`] being paid.
    pub rental_id: rental::Id,

    /// [`intent::Kind`] of the payment.
    pub kind: intent::Kind,

    /// Amount to be paid.
    pub amount: Money,
}

impl<Gw, Sc> Command<RequestGatewayPayment> for Service<Gw, Sc>
where
    Gw: Gateway<
        Insert<GatewayCheckout>,
        Ok = RedirectUrl,
        Err = Traced<gateway::Error>,
    >,
    Sc: Scratch<Insert<Intent>, Ok = (), Err = Traced<scratch::Error>>,
{
    type Ok = Outcome;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RequestGatewayPayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RequestGatewayPayment {
            rental_id,
            kind,
            amount,
        } = cmd;

        let url = self
            .gateway()
            .execute(Insert(GatewayCheckout {
                rental_id: rental_id.clone(),
                amount,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.scratch()
            .execute(Insert(Intent::issue(rental_id, kind, amount)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(Outcome::Redirect(url))
    }
}

/// Error of [`RequestGatewayPayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    #[from]
    Gateway(gateway::Error),

    /// [`Scratch`] store error.
    #[display("`Scratch` operation failed: {_0}")]
    #[from]
    Scratch(scratch::Error),
}
