//! [`User`]-related definitions.

use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLObject, GraphQLScalar};
use service::{domain, query, Query as _};

use crate::{
    api::{self, scalar},
    define_error, AsError, Context, Error,
};

/// A [`User`] of the rental platform.
#[derive(Clone, Debug, From)]
pub struct User(domain::User);

/// A `User` of the rental platform.
#[graphql_object(context = Context)]
impl User {
    /// Unique identifier of this `User`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.clone().into()
    }

    /// Email of this `User`, if known.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.0.email.as_deref()
    }

    /// Full name of this `User`, if known.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.0.full_name.as_deref()
    }

    /// Phone number of this `User`, if known.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.0.phone.as_deref()
    }

    /// Role of this `User`.
    #[must_use]
    pub fn role(&self) -> Role {
        self.0.role.into()
    }

    /// Identity verification status of this `User`.
    ///
    /// Requested separately, unless reported along with the profile.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.verificationStatus",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn verification_status(
        &self,
        ctx: &Context,
    ) -> Result<Option<VerificationStatus>, Error> {
        if let Some(status) = self.0.verification_status {
            return Ok(Some(status.into()));
        }
        ctx.service()
            .execute(query::user::Verification::by(self.0.id.clone()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|v| v.map(|v| v.status.into()))
    }
}

/// Unique identifier of a `User`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "UserId", with = scalar::Via::<domain::user::Id>)]
pub struct Id(domain::user::Id);

/// Role of a `User`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "UserRole")]
pub enum Role {
    /// Renter of vehicles.
    Customer,

    /// Staff member of a branch.
    Staff,

    /// Administrator of the platform.
    Admin,
}

impl From<domain::user::Role> for Role {
    fn from(role: domain::user::Role) -> Self {
        use domain::user::Role as R;

        match role {
            R::Customer => Self::Customer,
            R::Staff => Self::Staff,
            R::Admin => Self::Admin,
        }
    }
}

impl From<Role> for domain::user::Role {
    fn from(role: Role) -> Self {
        match role {
            Role::Customer => Self::Customer,
            Role::Staff => Self::Staff,
            Role::Admin => Self::Admin,
        }
    }
}

/// Status of a `User`'s identity verification.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "VerificationStatus")]
pub enum VerificationStatus {
    /// No documents submitted.
    Unverified,

    /// Documents submitted and awaiting review.
    Pending,

    /// Documents approved.
    Verified,

    /// Documents rejected.
    Rejected,
}

impl From<domain::user::VerificationStatus> for VerificationStatus {
    fn from(status: domain::user::VerificationStatus) -> Self {
        use domain::user::VerificationStatus as S;

        match status {
            S::Unverified => Self::Unverified,
            S::Pending => Self::Pending,
            S::Verified => Self::Verified,
            S::Rejected => Self::Rejected,
        }
    }
}

/// Identity verification state of a `User`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Verification {
    /// Verified `User`.
    pub user_id: Id,

    /// Current status of the verification.
    pub status: VerificationStatus,

    /// Note of the reviewer, if any.
    pub note: Option<String>,
}

impl From<domain::user::Verification> for Verification {
    fn from(v: domain::user::Verification) -> Self {
        Self {
            user_id: v.user_id.into(),
            status: v.status.into(),
            note: v.note,
        }
    }
}

pub mod list {
    //! Definitions related to [`User`] list.

    use common::pagination::{self, Page as Remote};
    use juniper::GraphQLObject;
    use service::domain;

    use crate::Context;

    use super::User;

    /// Page of the `User` list.
    #[derive(Clone, Debug, GraphQLObject)]
    #[graphql(name = "UserPage", context = Context)]
    pub struct Page {
        /// `User`s on this page.
        pub items: Vec<User>,

        /// Total number of the listed `User`s, if reported.
        pub total: Option<f64>,

        /// Indicator whether more `User`s exist after this page.
        pub has_more: bool,
    }

    impl Page {
        /// Converts the provided remote [`Page`] fetched with the provided
        /// [`pagination::Request`].
        ///
        /// [`Page`]: Remote
        #[must_use]
        pub fn new(
            page: Remote<domain::User>,
            request: pagination::Request,
        ) -> Self {
            let has_more = page.has_more(request);
            #[expect(
                clippy::cast_precision_loss,
                reason = "totals never exceed 2^52"
            )]
            let total = page.total.map(|t| t as f64);
            Self {
                items: page.into_iter().map(Into::into).collect(),
                total,
                has_more,
            }
        }
    }
}

/// Converts the provided GraphQL page arguments into a
/// [`pagination::Request`], falling back to the configured page size.
///
/// # Errors
///
/// With an `INVALID_PAGE` error if any of the arguments is negative.
///
/// [`pagination::Request`]: common::pagination::Request
pub(crate) fn page_request(
    ctx: &Context,
    page: Option<i32>,
    page_size: Option<i32>,
) -> Result<common::pagination::Request, Error> {
    let first = ctx.service().config().first_page();
    let page = page.map_or(Ok(first.page), u32::try_from);
    let page_size = page_size.map_or(Ok(first.page_size), u32::try_from);
    match (page, page_size) {
        (Ok(page), Ok(page_size)) => Ok(common::pagination::Request {
            page,
            ..common::pagination::Request::first(page_size)
        }),
        (Err(_), _) | (_, Err(_)) => Err(UserError::InvalidPage.into()),
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the provided ID does not exist"]
        NotExists,

        #[code = "INVALID_PAGE"]
        #[status = BAD_REQUEST]
        #[message = "Page arguments must not be negative"]
        InvalidPage,
    }
}
