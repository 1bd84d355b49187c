//! Routes the payment gateway redirects the browser back to.

use axum::{extract::Query, Extension, Json};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, complete_gateway_payment},
    domain::{payment::Intent, rental},
    infra::gateway::Token,
    Command as _,
};
use tracing as log;

use crate::{define_error, AsError, Error, Service};

/// Result of processing a payment gateway callback.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum Processed {
    /// Payment is completed and the `Rental` is moved to the `status`.
    #[serde(rename_all = "camelCase")]
    Completed {
        /// Completed payment [`Intent`].
        intent: Intent,

        /// New [`rental::Status`].
        status: rental::Status,
    },

    /// Payment is abandoned.
    #[serde(rename_all = "camelCase")]
    Abandoned {
        /// Abandoned payment [`Intent`], if there was a pending one.
        intent: Option<Intent>,
    },
}

/// Query parameters the gateway redirects back with.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Callback {
    /// ID of the `Rental` the payment was made for.
    pub rental_id: rental::Id,
}

/// Handler of the gateway's success redirect.
///
/// # Errors
///
/// Possible error codes:
/// - `NO_PENDING_INTENT` - the `Rental` has no fresh payment intent;
/// - `ALREADY_IN_FLIGHT` - the same payment is being submitted already;
/// - `RENTAL_NOT_EXISTS` - the `Rental` does not exist;
/// - `TRANSITION_NOT_ALLOWED` - the `Rental` moved where the payment cannot
///   complete it;
/// - `STATUS_UPDATE_FAILED` - the `Rental` status could not be updated.
#[tracing::instrument(skip_all, fields(otel.name = "Payment callback"))]
pub async fn payment_success(
    Extension(service): Extension<Service>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Query(callback): Query<Callback>,
) -> Result<Json<Processed>, Error> {
    let intent = authorized(&service, bearer)
        .execute(command::CompleteGatewayPayment {
            rental_id: callback.rental_id,
        })
        .await
        .map_err(AsError::into_error)?;
    let status = intent.target_status();

    log::info!(
        "completed `{}` payment of `Rental(id: {})`",
        intent.kind,
        intent.rental_id,
    );

    Ok(Json(Processed::Completed { intent, status }))
}

/// Handler of the gateway's failure redirect.
///
/// # Errors
///
/// If the scratch store cannot be modified.
#[tracing::instrument(skip_all, fields(otel.name = "Payment callback"))]
pub async fn payment_fail(
    Extension(service): Extension<Service>,
    Query(callback): Query<Callback>,
) -> Result<Json<Processed>, Error> {
    let intent = service
        .execute(command::FailGatewayPayment {
            rental_id: callback.rental_id,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Processed::Abandoned { intent }))
}

/// Returns the provided [`Service`] forwarding the bearer token, if any.
fn authorized(
    service: &Service,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Service {
    let token = bearer.map(|TypedHeader(Authorization(b))| {
        Token::new(b.token())
    });
    service.with_gateway(service.gateway().authorized(token))
}

impl AsError for complete_gateway_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NO_PENDING_INTENT"]
                #[status = CONFLICT]
                #[message = "There is no pending payment to complete"]
                NoPendingIntent,
            }
        }

        match self {
            Self::AlreadyInFlight(e) => e.try_as_error(),
            Self::Gateway(e) => e.try_as_error(),
            Self::NoPendingIntent(_) => Some(Error::NoPendingIntent.into()),
            Self::RentalNotExists(_) => {
                Some(crate::api::rental::RentalError::NotExists.into())
            }
            Self::Scratch(e) => e.try_as_error(),
            Self::StatusUpdateFailed(e) => e.try_as_error(),
            Self::TransitionNotAllowed(e) => e.try_as_error(),
        }
    }
}
