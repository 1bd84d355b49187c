//! GraphQL [`Mutation`]s definitions.

use common::operations::By;
use juniper::graphql_object;
use service::{
    command,
    domain::{trip, user, vehicle, vehicle_type, workforce},
    Command as _,
};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Pays the deposit of the `Rental` with the specified ID.
    ///
    /// Paying with `VNPAY` returns a `PaymentRedirect` to the payment page.
    /// Otherwise, the `Payment` is recorded right away and the `Rental` is
    /// confirmed. If an earlier attempt recorded the `Payment`, but failed to
    /// confirm the `Rental`, only the confirmation is retried.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the specified ID does not
    ///                         exist;
    /// - `ORDER_NOT_AWAITING_DEPOSIT` - the `Rental` is not awaiting a
    ///                                  deposit;
    /// - `ALREADY_IN_FLIGHT` - the same deposit is being paid already;
    /// - `STATUS_UPDATE_FAILED` - the `Payment` is recorded, but the `Rental`
    ///                            is not confirmed;
    /// - `TRANSITION_NOT_ALLOWED` - an unfinished deposit can no longer
    ///                              confirm the `Rental`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "payDeposit",
            method = ?method,
            otel.name = Self::SPAN_NAME,
            rental.id = %rental_id,
        ),
    )]
    pub async fn pay_deposit(
        rental_id: api::rental::Id,
        method: api::payment::Method,
        ctx: &Context,
    ) -> Result<api::payment::Outcome, Error> {
        ctx.service()
            .execute(command::PayDeposit {
                rental_id: rental_id.into(),
                method: method.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Signs the `Contract` of the `Rental` with the specified ID on behalf
    /// of the renter.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the specified ID does not
    ///                         exist;
    /// - `CONTRACT_NOT_EXISTS` - the `Rental` has no `Contract`;
    /// - `AGREEMENT_REQUIRED` - the terms are not agreed to;
    /// - `ALREADY_SIGNED` - the renter has signed the `Contract` already;
    /// - `DEPOSIT_NOT_PAID` - the deposit of the `Rental` is not paid yet;
    /// - `ALREADY_IN_FLIGHT` - the `Contract` is being signed already.
    #[tracing::instrument(
        skip_all,
        fields(
            agreed = agreed,
            gql.name = "signContract",
            otel.name = Self::SPAN_NAME,
            rental.id = %rental_id,
        ),
    )]
    pub async fn sign_contract(
        rental_id: api::rental::Id,
        agreed: bool,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        ctx.service()
            .execute(command::SignContract {
                rental_id: rental_id.into(),
                agreed,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Checks out the vehicle of the `Rental` with the specified ID on
    /// return.
    ///
    /// Returns the `TripSummary`, or `null` if the handover readings of the
    /// `Rental` are unknown.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the specified ID does not
    ///                         exist;
    /// - `ORDER_NOT_ACTIVE` - the `Rental` is not active;
    /// - `INVALID_READINGS` - the provided readings are rejected;
    /// - `PHOTOS_MISSING` - some inspection photos are not provided;
    /// - `ALREADY_IN_FLIGHT` - the `Rental` is being checked out already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "checkOutRental",
            otel.name = Self::SPAN_NAME,
            photos = photos.len(),
            rental.id = %rental_id,
        ),
    )]
    pub async fn check_out_rental(
        rental_id: api::rental::Id,
        readings: api::trip::Readings,
        photos: Vec<api::trip::Photo>,
        damage_notes: Option<String>,
        ctx: &Context,
    ) -> Result<Option<api::trip::Summary>, Error> {
        let readings =
            trip::Readings::try_from(readings).map_err(ctx.error())?;
        ctx.service()
            .execute(command::CheckOutRental {
                rental_id: rental_id.into(),
                readings,
                damage_notes: damage_notes.filter(|n| !n.trim().is_empty()),
                photos: api::trip::checklist(photos),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| s.map(Into::into))
    }

    /// Settles the completed `Rental` with the specified ID.
    ///
    /// A refund or a zero amount is recorded without any `method`. Paying
    /// the due amount requires one, and paying with `VNPAY` returns a
    /// `PaymentRedirect` to the payment page.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the specified ID does not
    ///                         exist;
    /// - `NOT_COMPLETED` - the `Rental` is not completed yet;
    /// - `ALREADY_SETTLED` - the `Rental` is settled already;
    /// - `PAYMENT_METHOD_REQUIRED` - the due amount requires a `method`;
    /// - `ALREADY_IN_FLIGHT` - the `Rental` is being settled already;
    /// - `STATUS_UPDATE_FAILED` - the `Payment` is recorded, but the `Rental`
    ///                            is not closed;
    /// - `TRANSITION_NOT_ALLOWED` - an unfinished settlement can no longer
    ///                              close the `Rental`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "settleRental",
            method = ?method,
            otel.name = Self::SPAN_NAME,
            rental.id = %rental_id,
        ),
    )]
    pub async fn settle_rental(
        rental_id: api::rental::Id,
        method: Option<api::payment::Method>,
        ctx: &Context,
    ) -> Result<api::payment::Outcome, Error> {
        ctx.service()
            .execute(command::SettleRental {
                rental_id: rental_id.into(),
                method: method.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Completes the `Rental` status update left unfinished by an earlier
    /// payment step of the `Rental` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the specified ID does not
    ///                         exist;
    /// - `NO_PENDING_TRANSITION` - nothing is left unfinished;
    /// - `ALREADY_IN_FLIGHT` - the same payment step is being processed;
    /// - `TRANSITION_NOT_ALLOWED` - the `Rental` moved where the status update
    ///                              cannot be applied anymore;
    /// - `STATUS_UPDATE_FAILED` - the `Rental` status update failed again.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "resumeTransition",
            otel.name = Self::SPAN_NAME,
            rental.id = %rental_id,
        ),
    )]
    pub async fn resume_transition(
        rental_id: api::rental::Id,
        ctx: &Context,
    ) -> Result<api::payment::Outcome, Error> {
        ctx.service()
            .execute(command::ResumeTransition {
                rental_id: rental_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Approves or rejects the identity documents of the `User` with the
    /// specified ID.
    ///
    /// Returns the resulting `Verification`, if reported.
    #[tracing::instrument(
        skip_all,
        fields(
            approved = approved,
            gql.name = "verifyUser",
            otel.name = Self::SPAN_NAME,
            user.id = %user_id,
        ),
    )]
    pub async fn verify_user(
        user_id: api::user::Id,
        approved: bool,
        note: Option<String>,
        ctx: &Context,
    ) -> Result<Option<api::user::Verification>, Error> {
        let user_id = user::Id::from(user_id);
        ctx.service()
            .execute(command::user::Verify::insert(user::Verify {
                user_id: user_id.clone(),
                approved,
                note,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        api::Query::verification(user_id.into(), ctx).await
    }

    /// Creates a new `Shift`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_SHIFT` - the `Shift` ends before it starts.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createShift",
            name = %shift.name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_shift(
        shift: api::workforce::ShiftInput,
        ctx: &Context,
    ) -> Result<api::workforce::Shift, Error> {
        let draft =
            workforce::shift::Draft::try_from(shift).map_err(ctx.error())?;
        ctx.service()
            .execute(command::workforce::CreateShift::insert(draft))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Shift` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_SHIFT` - the `Shift` ends before it starts.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateShift",
            otel.name = Self::SPAN_NAME,
            shift.id = %id,
        ),
    )]
    pub async fn update_shift(
        id: api::workforce::ShiftId,
        shift: api::workforce::ShiftInput,
        ctx: &Context,
    ) -> Result<api::workforce::Shift, Error> {
        let draft =
            workforce::shift::Draft::try_from(shift).map_err(ctx.error())?;
        ctx.service()
            .execute(command::workforce::UpdateShift::update(
                workforce::shift::Edit {
                    id: id.into(),
                    draft,
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Shift` with the specified ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteShift",
            otel.name = Self::SPAN_NAME,
            shift.id = %id,
        ),
    )]
    pub async fn delete_shift(
        id: api::workforce::ShiftId,
        ctx: &Context,
    ) -> Result<bool, Error> {
        ctx.service()
            .execute(command::workforce::DeleteShift::delete(By::new(
                id.into(),
            )))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }

    /// Assigns a `Shift` to several staff members on several `Date`s at
    /// once.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMPTY_ASSIGNMENT` - no staff members or `Date`s are provided.
    #[tracing::instrument(
        skip_all,
        fields(
            dates = assignment.dates.len(),
            gql.name = "createBulkAssignment",
            otel.name = Self::SPAN_NAME,
            shift.id = %assignment.shift_id,
            staff = assignment.staff_ids.len(),
        ),
    )]
    pub async fn create_bulk_assignment(
        assignment: api::workforce::BulkAssignmentInput,
        ctx: &Context,
    ) -> Result<bool, Error> {
        let bulk = workforce::workday::assignment::Bulk::try_from(assignment)
            .map_err(ctx.error())?;
        ctx.service()
            .execute(command::workforce::CreateBulkAssignment::insert(bulk))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }

    /// Registers a new `Vehicle`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_BATTERY_LEVEL` - the battery level is out of range.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createVehicle",
            license_plate = %vehicle.license_plate,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_vehicle(
        vehicle: api::fleet::VehicleInput,
        ctx: &Context,
    ) -> Result<api::fleet::Vehicle, Error> {
        let draft = vehicle::Draft::try_from(vehicle).map_err(ctx.error())?;
        ctx.service()
            .execute(command::fleet::CreateVehicle::insert(draft))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Vehicle` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_BATTERY_LEVEL` - the battery level is out of range.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateVehicle",
            otel.name = Self::SPAN_NAME,
            vehicle.id = %id,
        ),
    )]
    pub async fn update_vehicle(
        id: api::fleet::VehicleId,
        vehicle: api::fleet::VehicleInput,
        ctx: &Context,
    ) -> Result<api::fleet::Vehicle, Error> {
        let draft = vehicle::Draft::try_from(vehicle).map_err(ctx.error())?;
        ctx.service()
            .execute(command::fleet::UpdateVehicle::update(vehicle::Edit {
                id: id.into(),
                draft,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Vehicle` with the specified ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteVehicle",
            otel.name = Self::SPAN_NAME,
            vehicle.id = %id,
        ),
    )]
    pub async fn delete_vehicle(
        id: api::fleet::VehicleId,
        ctx: &Context,
    ) -> Result<bool, Error> {
        ctx.service()
            .execute(command::fleet::DeleteVehicle::delete(By::new(id.into())))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }

    /// Creates a new `VehicleType`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_VEHICLE_TYPE` - the price, seats or range is negative.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createVehicleType",
            name = %vehicle_type.name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_vehicle_type(
        vehicle_type: api::fleet::VehicleTypeInput,
        ctx: &Context,
    ) -> Result<api::fleet::VehicleType, Error> {
        let draft = vehicle_type::Draft::try_from(vehicle_type)
            .map_err(ctx.error())?;
        ctx.service()
            .execute(command::fleet::CreateVehicleType::insert(draft))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `VehicleType` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_VEHICLE_TYPE` - the price, seats or range is negative.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateVehicleType",
            otel.name = Self::SPAN_NAME,
            vehicle_type.id = %id,
        ),
    )]
    pub async fn update_vehicle_type(
        id: api::fleet::VehicleTypeId,
        vehicle_type: api::fleet::VehicleTypeInput,
        ctx: &Context,
    ) -> Result<api::fleet::VehicleType, Error> {
        let draft = vehicle_type::Draft::try_from(vehicle_type)
            .map_err(ctx.error())?;
        ctx.service()
            .execute(command::fleet::UpdateVehicleType::update(
                vehicle_type::Edit {
                    id: id.into(),
                    draft,
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `VehicleType` with the specified ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteVehicleType",
            otel.name = Self::SPAN_NAME,
            vehicle_type.id = %id,
        ),
    )]
    pub async fn delete_vehicle_type(
        id: api::fleet::VehicleTypeId,
        ctx: &Context,
    ) -> Result<bool, Error> {
        ctx.service()
            .execute(command::fleet::DeleteVehicleType::delete(By::new(
                id.into(),
            )))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }
}

impl AsError for command::request_gateway_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Gateway(e) => e.try_as_error(),
            Self::Scratch(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::transition::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Gateway(e) => e.try_as_error(),
            Self::Scratch(e) => e.try_as_error(),
            Self::StatusUpdateFailed(e) => e.try_as_error(),
            Self::TransitionNotAllowed(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::resume_transition::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::AlreadyInFlight(e) => e.try_as_error(),
            Self::Gateway(e) => e.try_as_error(),
            Self::NoPendingTransition(_) => {
                Some(api::rental::RentalError::NoPendingTransition.into())
            }
            Self::RentalNotExists(_) => {
                Some(api::rental::RentalError::NotExists.into())
            }
            Self::Scratch(e) => e.try_as_error(),
            Self::StatusUpdateFailed(e) => e.try_as_error(),
            Self::TransitionNotAllowed(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::pay_deposit::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::AlreadyInFlight(e) => e.try_as_error(),
            Self::Gateway(e) => e.try_as_error(),
            Self::OrderNotAwaitingDeposit(..) => {
                Some(api::rental::RentalError::NotAwaitingDeposit.into())
            }
            Self::Redirect(e) => e.try_as_error(),
            Self::RentalNotExists(_) => {
                Some(api::rental::RentalError::NotExists.into())
            }
            Self::Resume(e) => e.try_as_error(),
            Self::Scratch(e) => e.try_as_error(),
            Self::Transition(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::sign_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use api::contract::ContractError;

        match self {
            Self::AgreementRequired(_) => {
                Some(ContractError::AgreementRequired.into())
            }
            Self::AlreadyInFlight(e) => e.try_as_error(),
            Self::AlreadySigned(_) => Some(ContractError::AlreadySigned.into()),
            Self::ContractNotExists(_) => Some(ContractError::NotExists.into()),
            Self::DepositNotPaid(_) => Some(ContractError::DepositNotPaid.into()),
            Self::Gateway(e) => e.try_as_error(),
            Self::RentalNotExists(_) => {
                Some(api::rental::RentalError::NotExists.into())
            }
        }
    }
}

impl AsError for command::check_out_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use api::trip::TripError;

        match self {
            Self::AlreadyInFlight(e) => e.try_as_error(),
            Self::Gateway(e) => e.try_as_error(),
            Self::InvalidReadings(v) => Some(match v {
                trip::Violation::PhotosMissing(_) => {
                    TripError::PhotosMissing.into()
                }
                trip::Violation::BatteryOutOfRange(_)
                | trip::Violation::MileageDecreased { .. } => {
                    TripError::InvalidReadings.into()
                }
            }),
            Self::OrderNotActive(..) => {
                Some(api::rental::RentalError::NotActive.into())
            }
            Self::PhotosMissing(_) => Some(TripError::PhotosMissing.into()),
            Self::RentalNotExists(_) => {
                Some(api::rental::RentalError::NotExists.into())
            }
        }
    }
}

impl AsError for command::settle_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use api::settlement::SettlementError;

        match self {
            Self::AlreadyInFlight(e) => e.try_as_error(),
            Self::AlreadySettled(_) => {
                Some(SettlementError::AlreadySettled.into())
            }
            Self::NotCompleted(..) => {
                Some(api::rental::RentalError::NotCompleted.into())
            }
            Self::PaymentMethodRequired(_) => {
                Some(SettlementError::PaymentMethodRequired.into())
            }
            Self::Redirect(e) => e.try_as_error(),
            Self::Resume(e) => e.try_as_error(),
            Self::Scratch(e) => e.try_as_error(),
            Self::Session(e) => e.try_as_error(),
            Self::Transition(e) => e.try_as_error(),
        }
    }
}
