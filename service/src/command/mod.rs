//! [`Command`] definition.

pub mod check_out_rental;
pub mod complete_gateway_payment;
pub mod fail_gateway_payment;
pub mod fleet;
pub mod pay_deposit;
pub mod request_gateway_payment;
pub mod resume_transition;
pub mod settle_rental;
pub mod sign_contract;
pub mod transition;
pub mod user;
pub mod workforce;

use common::operations::{Delete, Insert, Update};
use tracerr::Traced;

use crate::{
    infra::{gateway, Gateway},
    Service,
};

/// [`Command`] of the [`Service`].
pub use common::Handler as Command;

pub use self::{
    check_out_rental::CheckOutRental,
    complete_gateway_payment::CompleteGatewayPayment,
    fail_gateway_payment::FailGatewayPayment, pay_deposit::PayDeposit,
    request_gateway_payment::RequestGatewayPayment,
    resume_transition::{Resume, ResumeTransition},
    settle_rental::SettleRental,
    sign_contract::SignContract,
    transition::{Outcome, Transition},
};

/// [`Command`] passing an operation through to a [`Gateway`] as is.
#[derive(Clone, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct GatewayCommand<Op>(Op);

impl<T> GatewayCommand<Insert<T>> {
    /// Creates a new [`GatewayCommand`] [`Insert`]ing the provided `T`.
    #[must_use]
    pub const fn insert(value: T) -> Self {
        Self(Insert(value))
    }
}

impl<T> GatewayCommand<Update<T>> {
    /// Creates a new [`GatewayCommand`] [`Update`]ing the provided `T`.
    #[must_use]
    pub const fn update(value: T) -> Self {
        Self(Update(value))
    }
}

impl<T> GatewayCommand<Delete<T>> {
    /// Creates a new [`GatewayCommand`] [`Delete`]ing the provided `T`.
    #[must_use]
    pub const fn delete(value: T) -> Self {
        Self(Delete(value))
    }
}

impl<Gw, Sc, Op> Command<GatewayCommand<Op>> for Service<Gw, Sc>
where
    Gw: Gateway<Op, Err = Traced<gateway::Error>>,
{
    type Ok = <Gw as Gateway<Op>>::Ok;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        GatewayCommand(op): GatewayCommand<Op>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gateway().execute(op).await.map_err(tracerr::wrap!())
    }
}
