//! [`Command`] collection related to staff scheduling.

use common::operations::{By, Delete, Insert, Update};

use crate::domain::workforce::{shift, workday::assignment, Shift};
#[cfg(doc)]
use crate::Command;

use super::GatewayCommand;

/// Creates a new [`Shift`].
pub type CreateShift = GatewayCommand<Insert<shift::Draft>>;

/// Updates an existing [`Shift`].
pub type UpdateShift = GatewayCommand<Update<shift::Edit>>;

/// Deletes a [`Shift`] by its [`shift::Id`].
pub type DeleteShift = GatewayCommand<Delete<By<Shift, shift::Id>>>;

/// Assigns a [`Shift`] to several staff members over several days at once.
pub type CreateBulkAssignment = GatewayCommand<Insert<assignment::Bulk>>;
