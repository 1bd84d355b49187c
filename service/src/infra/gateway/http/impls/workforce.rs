//! Staff scheduling [`Gateway`] implementations.

use common::{
    operations::{By, Delete, Insert, Select, Update},
    pagination::Page,
    Date,
};
use reqwest::Method;
use serde::Serialize;
use tracerr::Traced;

use crate::{
    domain::workforce::{
        shift,
        workday::{assignment, BranchSchedule, StaffSchedule},
        DateRange, Shift, Workday,
    },
    infra::{
        gateway::{self, Http},
        Gateway,
    },
};

/// Query string of a schedule request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleQuery {
    /// First [`Date`] of the schedule.
    start_date: Date,

    /// Last [`Date`] of the schedule.
    end_date: Date,
}

impl From<DateRange> for ScheduleQuery {
    fn from(range: DateRange) -> Self {
        Self {
            start_date: range.start(),
            end_date: range.end(),
        }
    }
}

impl Gateway<Select<By<Vec<Shift>, ()>>> for Http {
    type Ok = Vec<Shift>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Shift>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::fetch::<Page<Shift>>(
            self.request(Method::GET, "/workforce/shifts"),
        )
        .await
        .map(|p| p.items)
    }
}

impl Gateway<Select<By<Option<Shift>, shift::Id>>> for Http {
    type Ok = Option<Shift>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Shift>, shift::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Self::fetch_optional(
            self.request(Method::GET, &format!("/workforce/shifts/{id}")),
        )
        .await
    }
}

impl Gateway<Insert<shift::Draft>> for Http {
    type Ok = Shift;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<shift::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::fetch(
            self.request(Method::POST, "/workforce/shifts").json(&draft),
        )
        .await
    }
}

impl Gateway<Update<shift::Edit>> for Http {
    type Ok = Shift;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Update(edit): Update<shift::Edit>,
    ) -> Result<Self::Ok, Self::Err> {
        let shift::Edit { id, draft } = edit;
        Self::fetch(
            self.request(Method::PUT, &format!("/workforce/shifts/{id}"))
                .json(&draft),
        )
        .await
    }
}

impl Gateway<Delete<By<Shift, shift::Id>>> for Http {
    type Ok = ();
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Shift, shift::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Self::perform(
            self.request(Method::DELETE, &format!("/workforce/shifts/{id}")),
        )
        .await
    }
}

impl Gateway<Insert<assignment::Bulk>> for Http {
    type Ok = ();
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Insert(bulk): Insert<assignment::Bulk>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::perform(
            self.request(Method::POST, "/workforce/assignments/bulk")
                .json(&bulk),
        )
        .await
    }
}

impl Gateway<Select<By<Vec<Workday>, BranchSchedule>>> for Http {
    type Ok = Vec<Workday>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Workday>, BranchSchedule>>,
    ) -> Result<Self::Ok, Self::Err> {
        let BranchSchedule { branch_id, range } = by.into_inner();
        Self::fetch::<Page<Workday>>(
            self.request(
                Method::GET,
                &format!("/workforce/schedules/branch/{branch_id}"),
            )
            .query(&ScheduleQuery::from(range)),
        )
        .await
        .map(|p| p.items)
    }
}

impl Gateway<Select<By<Vec<Workday>, StaffSchedule>>> for Http {
    type Ok = Vec<Workday>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Workday>, StaffSchedule>>,
    ) -> Result<Self::Ok, Self::Err> {
        let StaffSchedule { staff_id, range } = by.into_inner();
        Self::fetch::<Page<Workday>>(
            self.request(
                Method::GET,
                &format!("/workforce/schedules/staff/{staff_id}"),
            )
            .query(&ScheduleQuery::from(range)),
        )
        .await
        .map(|p| p.items)
    }
}
