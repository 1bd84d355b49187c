//! [`Command`] collection related to [`User`]s.

use common::operations::Insert;

use crate::domain::user;
#[cfg(doc)]
use crate::{domain::User, Command};

use super::GatewayCommand;

/// Approves or rejects the identity verification of a [`User`].
pub type Verify = GatewayCommand<Insert<user::Verify>>;
