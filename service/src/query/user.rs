//! [`Query`] collection related to [`User`]s.

use common::{
    operations::By,
    pagination::{self, Page},
};

use crate::domain::{user, User};
#[cfg(doc)]
use crate::Query;

use super::GatewayQuery;

/// Queries the [`User`] the request is authorized as.
pub type Current = GatewayQuery<By<Option<User>, user::Current>>;

/// Queries a [`User`] by its [`user::Id`].
pub type ById = GatewayQuery<By<Option<User>, user::Id>>;

/// Queries a [`Page`] of [`User`]s having the provided [`user::Role`].
pub type ByRole =
    GatewayQuery<By<Page<User>, (user::Role, pagination::Request)>>;

/// Queries a [`user::Verification`] of a [`User`] by its [`user::Id`].
pub type Verification =
    GatewayQuery<By<Option<user::Verification>, user::Id>>;
