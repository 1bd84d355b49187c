//! [`Query`] collection related to staff scheduling.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::workforce::{shift, BranchSchedule, Shift, StaffSchedule, Workday},
    infra::{gateway, Gateway},
    read::Schedule,
    Service,
};

use super::{GatewayQuery, Query};

/// Queries all the [`Shift`]s.
pub type Shifts = GatewayQuery<By<Vec<Shift>, ()>>;

/// Queries a [`Shift`] by its [`shift::Id`].
pub type ShiftById = GatewayQuery<By<Option<Shift>, shift::Id>>;

/// [`Query`] of a [`Schedule`] selected by `B`.
///
/// Either a [`BranchSchedule`] or a [`StaffSchedule`].
#[derive(Clone, Debug)]
pub struct ScheduleOf<B>(pub B);

/// Queries a [`Schedule`] of a branch.
pub type OfBranch = ScheduleOf<BranchSchedule>;

/// Queries a [`Schedule`] of a staff member.
pub type OfStaff = ScheduleOf<StaffSchedule>;

impl<Gw, Sc, B> Query<ScheduleOf<B>> for Service<Gw, Sc>
where
    Gw: Gateway<
        Select<By<Vec<Workday>, B>>,
        Ok = Vec<Workday>,
        Err = Traced<gateway::Error>,
    >,
{
    type Ok = Schedule;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        ScheduleOf(by): ScheduleOf<B>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gateway()
            .execute(Select(By::new(by)))
            .await
            .map(Schedule::from_iter)
            .map_err(tracerr::wrap!())
    }
}
