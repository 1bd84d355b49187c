//! GraphQL [`Query`]s definitions.

use common::Date;
use juniper::graphql_object;
use service::{
    domain::{trip, user, workforce},
    query, Query as _,
};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Loads the `RentalSession` of the `Rental` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "rentalSession",
            otel.name = Self::SPAN_NAME,
            rental.id = %rental_id,
        ),
    )]
    pub async fn rental_session(
        rental_id: api::rental::Id,
        ctx: &Context,
    ) -> Result<api::rental::Session, Error> {
        ctx.service()
            .execute(query::RentalSession {
                rental_id: rental_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Previews the `Settlement` of the `Rental` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "settlementPreview",
            otel.name = Self::SPAN_NAME,
            rental.id = %rental_id,
        ),
    )]
    pub async fn settlement_preview(
        rental_id: api::rental::Id,
        ctx: &Context,
    ) -> Result<api::settlement::Preview, Error> {
        ctx.service()
            .execute(query::SettlementPreview {
                rental_id: rental_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Contract` of the `Rental` with the specified ID along
    /// with its signing stage.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the specified ID does not
    ///                         exist;
    /// - `CONTRACT_NOT_EXISTS` - the `Rental` has no `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "contractOverview",
            otel.name = Self::SPAN_NAME,
            rental.id = %rental_id,
        ),
    )]
    pub async fn contract_overview(
        rental_id: api::rental::Id,
        ctx: &Context,
    ) -> Result<api::contract::Overview, Error> {
        ctx.service()
            .execute(query::ContractOverview {
                rental_id: rental_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Previews the `TripSummary` of the `Rental` with the specified ID as if
    /// the vehicle was returned now with the provided readings.
    ///
    /// `null` if the handover readings of the `Rental` are unknown.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the specified ID does not
    ///                         exist;
    /// - `INVALID_READINGS` - the provided readings are out of range.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "tripSummary",
            otel.name = Self::SPAN_NAME,
            rental.id = %rental_id,
        ),
    )]
    pub async fn trip_summary(
        rental_id: api::rental::Id,
        readings: api::trip::Readings,
        ctx: &Context,
    ) -> Result<Option<api::trip::Summary>, Error> {
        let readings =
            trip::Readings::try_from(readings).map_err(ctx.error())?;
        ctx.service()
            .execute(query::TripSummary {
                rental_id: rental_id.into(),
                readings,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| s.map(Into::into))
    }

    /// Returns the `User` the request is authorized as.
    ///
    /// `null` if the request carries no credentials.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "me",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn me(ctx: &Context) -> Result<Option<api::User>, Error> {
        ctx.service()
            .execute(query::user::Current::by(user::Current))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|u| u.map(Into::into))
    }

    /// Returns the `User` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "user",
            otel.name = Self::SPAN_NAME,
            user.id = %id,
        ),
    )]
    pub async fn user(
        id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        ctx.service()
            .execute(query::user::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::user::UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches a page of `User`s having the specified role.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PAGE` - the page arguments are negative.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "usersByRole",
            otel.name = Self::SPAN_NAME,
            page = ?page,
            page_size = ?page_size,
            role = ?role,
        ),
    )]
    pub async fn users_by_role(
        role: api::user::Role,
        page: Option<i32>,
        page_size: Option<i32>,
        ctx: &Context,
    ) -> Result<api::user::list::Page, Error> {
        let request = api::user::page_request(ctx, page, page_size)
            .map_err(ctx.error())?;
        ctx.service()
            .execute(query::user::ByRole::by((role.into(), request)))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|p| api::user::list::Page::new(p, request))
    }

    /// Returns the identity `Verification` of the `User` with the specified
    /// ID.
    ///
    /// `null` if the `User` has never submitted any documents.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "verification",
            otel.name = Self::SPAN_NAME,
            user.id = %user_id,
        ),
    )]
    pub async fn verification(
        user_id: api::user::Id,
        ctx: &Context,
    ) -> Result<Option<api::user::Verification>, Error> {
        ctx.service()
            .execute(query::user::Verification::by(user_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|v| v.map(Into::into))
    }

    /// Lists all the `Shift`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "shifts",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn shifts(
        ctx: &Context,
    ) -> Result<Vec<api::workforce::Shift>, Error> {
        ctx.service()
            .execute(query::workforce::Shifts::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| s.into_iter().map(Into::into).collect())
    }

    /// Returns the `Shift` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SHIFT_NOT_EXISTS` - the `Shift` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "shift",
            otel.name = Self::SPAN_NAME,
            shift.id = %id,
        ),
    )]
    pub async fn shift(
        id: api::workforce::ShiftId,
        ctx: &Context,
    ) -> Result<api::workforce::Shift, Error> {
        ctx.service()
            .execute(query::workforce::ShiftById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::workforce::WorkforceError::ShiftNotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the schedule of the `Branch` with the specified ID between the
    /// provided `Date`s, inclusive.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_DATE_RANGE` - the `start` is after the `end`.
    #[tracing::instrument(
        skip_all,
        fields(
            branch.id = %branch_id,
            end = %end,
            gql.name = "branchSchedule",
            otel.name = Self::SPAN_NAME,
            start = %start,
        ),
    )]
    pub async fn branch_schedule(
        branch_id: api::fleet::BranchId,
        start: Date,
        end: Date,
        ctx: &Context,
    ) -> Result<Vec<api::workforce::ScheduleDay>, Error> {
        let range =
            api::workforce::date_range(start, end).map_err(ctx.error())?;
        ctx.service()
            .execute(query::workforce::ScheduleOf(workforce::BranchSchedule {
                branch_id: branch_id.into(),
                range,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| api::workforce::schedule_days(&s))
    }

    /// Returns the schedule of the staff member with the specified ID between
    /// the provided `Date`s, inclusive.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_DATE_RANGE` - the `start` is after the `end`.
    #[tracing::instrument(
        skip_all,
        fields(
            end = %end,
            gql.name = "staffSchedule",
            otel.name = Self::SPAN_NAME,
            start = %start,
            user.id = %staff_id,
        ),
    )]
    pub async fn staff_schedule(
        staff_id: api::user::Id,
        start: Date,
        end: Date,
        ctx: &Context,
    ) -> Result<Vec<api::workforce::ScheduleDay>, Error> {
        let range =
            api::workforce::date_range(start, end).map_err(ctx.error())?;
        ctx.service()
            .execute(query::workforce::ScheduleOf(workforce::StaffSchedule {
                staff_id: staff_id.into(),
                range,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| api::workforce::schedule_days(&s))
    }

    /// Lists all the `Branch`es.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "branches",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn branches(
        ctx: &Context,
    ) -> Result<Vec<api::fleet::Branch>, Error> {
        ctx.service()
            .execute(query::fleet::Branches::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|b| b.into_iter().map(Into::into).collect())
    }

    /// Lists all the `Vehicle`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "vehicles",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn vehicles(
        ctx: &Context,
    ) -> Result<Vec<api::fleet::Vehicle>, Error> {
        ctx.service()
            .execute(query::fleet::Vehicles::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|v| v.into_iter().map(Into::into).collect())
    }

    /// Returns the `Vehicle` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VEHICLE_NOT_EXISTS` - the `Vehicle` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "vehicle",
            otel.name = Self::SPAN_NAME,
            vehicle.id = %id,
        ),
    )]
    pub async fn vehicle(
        id: api::fleet::VehicleId,
        ctx: &Context,
    ) -> Result<api::fleet::Vehicle, Error> {
        ctx.service()
            .execute(query::fleet::VehicleById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::fleet::FleetError::VehicleNotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists all the `VehicleType`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "vehicleTypes",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn vehicle_types(
        ctx: &Context,
    ) -> Result<Vec<api::fleet::VehicleType>, Error> {
        ctx.service()
            .execute(query::fleet::VehicleTypes::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|t| t.into_iter().map(Into::into).collect())
    }

    /// Returns the `VehicleType` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VEHICLE_TYPE_NOT_EXISTS` - the `VehicleType` with the specified ID
    ///                               does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "vehicleType",
            otel.name = Self::SPAN_NAME,
            vehicle_type.id = %id,
        ),
    )]
    pub async fn vehicle_type(
        id: api::fleet::VehicleTypeId,
        ctx: &Context,
    ) -> Result<api::fleet::VehicleType, Error> {
        ctx.service()
            .execute(query::fleet::VehicleTypeById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::fleet::FleetError::VehicleTypeNotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for query::rental_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use query::rental_session::ExecutionError as E;

        match self {
            E::Gateway(e) => e.try_as_error(),
            E::RentalNotExists(_) => {
                Some(api::rental::RentalError::NotExists.into())
            }
        }
    }
}

impl AsError for query::contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use query::contract::ExecutionError as E;

        match self {
            E::ContractNotExists(_) => {
                Some(api::contract::ContractError::NotExists.into())
            }
            E::Gateway(e) => e.try_as_error(),
            E::Session(e) => e.try_as_error(),
        }
    }
}
