//! In-memory [`Gateway`] fake.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use common::{
    operations::{By, Insert, Select, Update},
    pagination::{Page, Request},
};
use tracerr::Traced;

use crate::{
    domain::{
        contract::{self, Signature},
        payment, rental, Contract, Payment, Penalty, Rental,
    },
    infra::gateway::{self, Gateway},
};

/// In-memory [`Gateway`] fake recording the calls made to it.
#[derive(Clone, Debug, Default)]
pub struct Fake(Arc<Mutex<State>>);

/// State of a [`Fake`].
#[derive(Debug, Default)]
pub struct State {
    /// Known [`Rental`]s.
    pub rentals: Vec<Rental>,

    /// Known [`Payment`]s.
    pub payments: Vec<Payment>,

    /// Known [`Penalty`]s.
    pub penalties: Vec<Penalty>,

    /// Known [`Contract`]s.
    pub contracts: Vec<Contract>,

    /// Applied [`rental::StatusChange`]s.
    pub status_changes: Vec<rental::StatusChange>,

    /// Submitted [`rental::Checkout`]s.
    pub checkouts: Vec<rental::Checkout>,

    /// Requested [`payment::GatewayCheckout`]s.
    pub gateway_checkouts: Vec<payment::GatewayCheckout>,

    /// Number of [`Contract`] signing calls.
    pub signs: usize,

    /// Operations failing on purpose.
    pub failing: Failing,
}

/// Operations of a [`Fake`] failing on purpose.
#[derive(Clone, Copy, Debug, Default)]
pub struct Failing {
    /// Fetching a [`Rental`].
    pub rental: bool,

    /// Updating a [`rental::Status`].
    pub status_update: bool,

    /// Recording a [`Payment`].
    pub payment_insert: bool,

    /// Listing [`Payment`]s.
    pub payments: bool,

    /// Listing [`Penalty`]s.
    pub penalties: bool,
}

impl Fake {
    /// Creates a new [`Fake`] knowing the provided [`Rental`].
    #[must_use]
    pub fn with_rental(rental: Rental) -> Self {
        let fake = Self::default();
        fake.state().rentals.push(rental);
        fake
    }

    /// Locks the [`State`] of this [`Fake`].
    pub fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current [`rental::Status`] of the provided [`Rental`].
    #[must_use]
    pub fn status_of(&self, id: &rental::Id) -> Option<rental::Status> {
        self.state()
            .rentals
            .iter()
            .find(|r| &r.id == id)
            .map(|r| r.status)
    }
}

/// Creates an [`gateway::Error`] of an unavailable remote service.
fn unavailable() -> Traced<gateway::Error> {
    tracerr::new!(gateway::Error::Status {
        status: 503,
        body: "service unavailable".into(),
    })
}

/// Creates an [`gateway::Error`] of a rejected request.
fn rejected(body: impl Into<String>) -> Traced<gateway::Error> {
    tracerr::new!(gateway::Error::Status {
        status: 409,
        body: body.into(),
    })
}

impl Gateway<Select<By<Option<Rental>, rental::Id>>> for Fake {
    type Ok = Option<Rental>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.state();
        if state.failing.rental {
            return Err(unavailable());
        }
        Ok(state.rentals.iter().find(|r| &r.id == by.as_inner()).cloned())
    }
}

impl Gateway<Update<rental::StatusChange>> for Fake {
    type Ok = ();
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Update(change): Update<rental::StatusChange>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        if state.failing.status_update {
            return Err(unavailable());
        }
        let rental = state
            .rentals
            .iter_mut()
            .find(|r| r.id == change.rental_id)
            .ok_or_else(|| rejected("unknown rental"))?;
        if !rental.status.can_transition_to(change.status) {
            return Err(rejected(format!(
                "cannot move from {} to {}",
                rental.status, change.status,
            )));
        }
        rental.status = change.status;
        state.status_changes.push(change);
        Ok(())
    }
}

impl Gateway<Insert<rental::Checkout>> for Fake {
    type Ok = ();
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Insert(checkout): Insert<rental::Checkout>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        if let Some(r) =
            state.rentals.iter_mut().find(|r| r.id == checkout.rental_id)
        {
            r.status = rental::Status::Completed;
        }
        state.checkouts.push(checkout);
        Ok(())
    }
}

impl Gateway<Insert<payment::New>> for Fake {
    type Ok = Payment;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Insert(new): Insert<payment::New>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        if state.failing.payment_insert {
            return Err(unavailable());
        }
        let payment = Payment {
            id: format!("pay-{}", state.payments.len() + 1).into(),
            rental_id: new.rental_id,
            amount: new.amount,
            method: new.method,
            role: new.transaction_ref.role(),
            transaction_ref: new.transaction_ref,
            status: payment::Status::Paid,
        };
        state.payments.push(payment.clone());
        Ok(payment)
    }
}

impl Gateway<Select<By<Page<Payment>, (rental::Id, Request)>>> for Fake {
    type Ok = Page<Payment>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Page<Payment>, (rental::Id, Request)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.state();
        if state.failing.payments {
            return Err(unavailable());
        }
        let (rental_id, _) = by.into_inner();
        Ok(Page {
            items: state
                .payments
                .iter()
                .filter(|p| p.rental_id == rental_id)
                .cloned()
                .collect(),
            total: None,
        })
    }
}

impl Gateway<Insert<payment::GatewayCheckout>> for Fake {
    type Ok = payment::RedirectUrl;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Insert(checkout): Insert<payment::GatewayCheckout>,
    ) -> Result<Self::Ok, Self::Err> {
        let url = format!(
            "https://sandbox.vnpay.test/pay?rental={}&amount={}",
            checkout.rental_id, checkout.amount.amount,
        );
        self.state().gateway_checkouts.push(checkout);
        Ok(url.into())
    }
}

impl Gateway<Select<By<Page<Penalty>, (rental::Id, Request)>>> for Fake {
    type Ok = Page<Penalty>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Page<Penalty>, (rental::Id, Request)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.state();
        if state.failing.penalties {
            return Err(unavailable());
        }
        let (rental_id, _) = by.into_inner();
        Ok(Page {
            items: state
                .penalties
                .iter()
                .filter(|p| p.rental_id == rental_id)
                .cloned()
                .collect(),
            total: None,
        })
    }
}

impl Gateway<Select<By<Option<Contract>, rental::Id>>> for Fake {
    type Ok = Option<Contract>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .state()
            .contracts
            .iter()
            .find(|c| &c.rental_id == by.as_inner())
            .cloned())
    }
}

impl Gateway<Update<contract::Sign>> for Fake {
    type Ok = Contract;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Update(sign): Update<contract::Sign>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        state.signs += 1;
        let contract = state
            .contracts
            .iter_mut()
            .find(|c| c.id == sign.contract_id)
            .ok_or_else(|| rejected("unknown contract"))?;
        contract.signed_by_renter = Signature::Signed;
        Ok(contract.clone())
    }
}
