//! [`Command`]s for completing an interrupted [`Transition`].

use common::{
    operations::{By, Delete, Select, Update},
    pagination::{self, Page},
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{payment::Checkpoint, rental, Payment, Rental},
    infra::{gateway, scratch, Gateway, Scratch},
    inflight::{AlreadyInFlight, Stage},
    Service,
};
#[cfg(doc)]
use crate::InFlight;

use super::{
    transition::{Outcome, StatusUpdateFailed, TransitionNotAllowed},
    Command,
};
#[cfg(doc)]
use super::Transition;

/// [`Command`] for completing an interrupted [`Transition`] of a
/// [`Rental`].
///
/// Never records a [`Payment`] again: only the missing
/// [`rental::Status`] update is performed.
#[derive(Clone, Debug)]
pub struct ResumeTransition {
    /// ID of the [`Rental`] to complete the [`Transition`] of.
    pub rental_id: rental::Id,
}

/// [`Command`] for completing the provided [`Checkpoint`].
///
/// Acquires no [`InFlight`] guard, so the caller must hold the one of the
/// [`Checkpoint`]'s [`Stage`].
///
/// Returns [`None`] if the [`Payment`] of the [`Checkpoint`] has never been
/// recorded, discarding the [`Checkpoint`].
#[derive(Clone, Debug)]
pub struct Resume(pub Checkpoint);

impl<Gw, Sc> Command<ResumeTransition> for Service<Gw, Sc>
where
    Sc: Scratch<
        Select<By<Option<Checkpoint>, rental::Id>>,
        Ok = Option<Checkpoint>,
        Err = Traced<scratch::Error>,
    >,
    Self: Command<Resume, Ok = Option<Outcome>, Err = Traced<ExecutionError>>,
{
    type Ok = Outcome;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ResumeTransition,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ResumeTransition { rental_id } = cmd;

        let checkpoint = self
            .checkpoint_of(&rental_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::NoPendingTransition(rental_id.clone()))
            .map_err(tracerr::wrap!())?;

        let _guard = self
            .in_flight()
            .acquire(&rental_id, Stage::from(&checkpoint))
            .map_err(tracerr::from_and_wrap!(=> E))?;

        // Might be completed by the stage submission released just before.
        let checkpoint = self
            .checkpoint_of(&rental_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::NoPendingTransition(rental_id.clone()))
            .map_err(tracerr::wrap!())?;

        self.execute(Resume(checkpoint))
            .await
            .map_err(tracerr::wrap!())?
            .ok_or_else(|| E::NoPendingTransition(rental_id))
            .map_err(tracerr::wrap!())
    }
}

impl<Gw, Sc> Command<Resume> for Service<Gw, Sc>
where
    Gw: Gateway<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<gateway::Error>,
        > + Gateway<
            Select<By<Page<Payment>, (rental::Id, pagination::Request)>>,
            Ok = Page<Payment>,
            Err = Traced<gateway::Error>,
        > + Gateway<
            Update<rental::StatusChange>,
            Ok = (),
            Err = Traced<gateway::Error>,
        >,
    Sc: Scratch<
        Delete<By<Option<Checkpoint>, rental::Id>>,
        Ok = Option<Checkpoint>,
        Err = Traced<scratch::Error>,
    >,
{
    type Ok = Option<Outcome>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Resume(checkpoint): Resume,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let rental_id = checkpoint.rental_id.clone();

        if !checkpoint.payment_recorded {
            let recorded = self
                .gateway()
                .execute(Select(By::<Page<Payment>, _>::new((
                    rental_id.clone(),
                    self.config().first_page(),
                ))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .into_iter()
                .any(|p| p.transaction_ref == checkpoint.transaction_ref);
            if !recorded {
                log::warn!(
                    "discarding unrecorded `Checkpoint(token: {})` of \
                     `Rental(id: {rental_id})`",
                    checkpoint.token,
                );
                self.forget(&rental_id)
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
                return Ok(None);
            }
            log::info!(
                "`Payment({})` of `Checkpoint(token: {})` is recorded already",
                checkpoint.transaction_ref,
                checkpoint.token,
            );
        }

        let rental = self
            .gateway()
            .execute(Select(By::<Option<Rental>, _>::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::RentalNotExists(rental_id.clone()))
            .map_err(tracerr::wrap!())?;

        let target = checkpoint.target_status;
        if rental.status.has_reached(target) {
            self.forget(&rental_id)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            log::info!(
                "`Rental(id: {rental_id})` is `{}` already, `{target}` is \
                 reached",
                rental.status,
            );
            return Ok(Some(Outcome::Resumed(rental.status)));
        }

        if let Err(e) =
            TransitionNotAllowed::check(&rental_id, rental.status, target)
        {
            log::warn!(
                "discarding `Checkpoint(token: {})` which cannot be \
                 completed: {e}",
                checkpoint.token,
            );
            self.forget(&rental_id)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            return Err(tracerr::new!(E::TransitionNotAllowed(e)));
        }

        self.gateway()
            .execute(Update(checkpoint.status_change()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> StatusUpdateFailed))
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.forget(&rental_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "`Rental(id: {rental_id})` moved into `{target}` after resuming",
        );

        Ok(Some(Outcome::Resumed(target)))
    }
}

impl<Gw, Sc> Service<Gw, Sc> {
    /// Returns the [`Checkpoint`] of the provided [`Rental`], if any.
    async fn checkpoint_of(
        &self,
        rental_id: &rental::Id,
    ) -> Result<Option<Checkpoint>, Traced<scratch::Error>>
    where
        Sc: Scratch<
            Select<By<Option<Checkpoint>, rental::Id>>,
            Ok = Option<Checkpoint>,
            Err = Traced<scratch::Error>,
        >,
    {
        self.scratch()
            .execute(Select(By::<Option<Checkpoint>, _>::new(
                rental_id.clone(),
            )))
            .await
            .map_err(tracerr::wrap!())
    }

    /// Removes the [`Checkpoint`] of the provided [`Rental`].
    async fn forget(
        &self,
        rental_id: &rental::Id,
    ) -> Result<(), Traced<scratch::Error>>
    where
        Sc: Scratch<
            Delete<By<Option<Checkpoint>, rental::Id>>,
            Ok = Option<Checkpoint>,
            Err = Traced<scratch::Error>,
        >,
    {
        self.scratch()
            .execute(Delete(By::<Option<Checkpoint>, _>::new(
                rental_id.clone(),
            )))
            .await
            .map(drop)
    }
}

/// Error of [`ResumeTransition`] and [`Resume`] [`Command`]s execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Another submission of the [`Checkpoint`]'s [`Stage`] is in flight.
    #[display("{_0}")]
    #[from]
    AlreadyInFlight(AlreadyInFlight),

    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    #[from]
    Gateway(gateway::Error),

    /// No interrupted [`Transition`] exists for the [`Rental`].
    #[display("`Rental(id: {_0})` has no pending transition")]
    NoPendingTransition(#[error(not(source))] rental::Id),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),

    /// [`Scratch`] store error.
    #[display("`Scratch` operation failed: {_0}")]
    #[from]
    Scratch(scratch::Error),

    /// [`rental::Status`] update failed again.
    #[display("{_0}")]
    #[from]
    StatusUpdateFailed(StatusUpdateFailed),

    /// [`Rental`] has moved where the [`Transition`] cannot be completed.
    #[display("{_0}")]
    #[from]
    TransitionNotAllowed(TransitionNotAllowed),
}
