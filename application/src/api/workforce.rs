//! Staff scheduling definitions.

use common::Date;
use derive_more::{AsRef, Display, From, Into};
use juniper::{GraphQLInputObject, GraphQLObject, GraphQLScalar};
use service::{domain::workforce, read};

use crate::{
    api::{self, scalar},
    define_error, Context, Error,
};

/// Working shift of a staff member.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Shift {
    /// Unique identifier of this `Shift`.
    pub id: ShiftId,

    /// Name of this `Shift`.
    pub name: String,

    /// Time of day this `Shift` starts at.
    pub start_time: TimeOfDay,

    /// Time of day this `Shift` ends at.
    pub end_time: TimeOfDay,
}

impl From<workforce::Shift> for Shift {
    fn from(shift: workforce::Shift) -> Self {
        Self {
            id: shift.id.into(),
            name: shift.name,
            start_time: shift.hours.start().into(),
            end_time: shift.hours.end().into(),
        }
    }
}

/// Unique identifier of a `Shift`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "ShiftId", with = scalar::Via::<workforce::shift::Id>)]
pub struct ShiftId(workforce::shift::Id);

/// Time of day in `HH:MM:SS` format.
///
/// `HH:MM` is accepted on input as well.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = scalar::Via::<workforce::TimeOfDay>)]
pub struct TimeOfDay(workforce::TimeOfDay);

/// Name and hours of a `Shift` to create or update.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "ShiftInput")]
pub struct ShiftInput {
    /// Name of the `Shift`.
    pub name: String,

    /// Time of day the `Shift` starts at.
    pub start_time: TimeOfDay,

    /// Time of day the `Shift` ends at, after the `startTime`.
    pub end_time: TimeOfDay,
}

impl TryFrom<ShiftInput> for workforce::shift::Draft {
    type Error = Error;

    fn try_from(input: ShiftInput) -> Result<Self, Self::Error> {
        let hours = workforce::shift::Hours::new(
            input.start_time.into(),
            input.end_time.into(),
        )
        .map_err(|_| WorkforceError::InvalidShift)?;
        Ok(Self {
            name: input.name,
            hours,
        })
    }
}

/// `Shift` assigned to a staff member on a `Workday`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Assignment {
    /// Unique identifier of this `Assignment`.
    pub id: AssignmentId,

    /// Assigned `Shift`.
    pub shift: Shift,

    /// Task to do during the `Shift`, if specified.
    pub task: Option<String>,
}

impl From<workforce::Assignment> for Assignment {
    fn from(a: workforce::Assignment) -> Self {
        Self {
            id: a.id.into(),
            shift: a.shift.into(),
            task: a.task,
        }
    }
}

/// Unique identifier of an `Assignment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "AssignmentId",
    with = scalar::Via::<workforce::workday::AssignmentId>,
)]
pub struct AssignmentId(workforce::workday::AssignmentId);

/// Working day of a staff member.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Workday {
    /// Unique identifier of this `Workday`.
    pub id: WorkdayId,

    /// Working staff member.
    pub staff_id: api::user::Id,

    /// `Branch` the staff member works at, if specified.
    pub branch_id: Option<api::fleet::BranchId>,

    /// `Date` of this `Workday`.
    pub date: Date,

    /// `Assignment`s of this `Workday`, ordered by their start.
    pub assignments: Vec<Assignment>,

    /// Indicator whether any `Assignment`s of this `Workday` overlap.
    pub has_overlaps: bool,
}

impl From<&workforce::Workday> for Workday {
    fn from(day: &workforce::Workday) -> Self {
        Self {
            id: day.id.clone().into(),
            staff_id: day.staff_id.clone().into(),
            branch_id: day.branch_id.clone().map(Into::into),
            date: day.date,
            assignments: day
                .assignments_by_start()
                .into_iter()
                .cloned()
                .map(Into::into)
                .collect(),
            has_overlaps: !day.overlapping().is_empty(),
        }
    }
}

/// Unique identifier of a `Workday`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "WorkdayId", with = scalar::Via::<workforce::workday::Id>)]
pub struct WorkdayId(workforce::workday::Id);

/// `Workday`s falling on a single `Date`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct ScheduleDay {
    /// `Date` of this `ScheduleDay`.
    pub date: Date,

    /// `Workday`s on this `Date`.
    pub workdays: Vec<Workday>,
}

/// Converts the provided [`read::Schedule`] into [`ScheduleDay`]s ordered by
/// their [`Date`].
#[must_use]
pub fn schedule_days(schedule: &read::Schedule) -> Vec<ScheduleDay> {
    schedule
        .days()
        .map(|(date, workdays)| ScheduleDay {
            date,
            workdays: workdays.iter().map(Into::into).collect(),
        })
        .collect()
}

/// Creates a [`workforce::DateRange`] out of the provided boundaries.
///
/// # Errors
///
/// With an `INVALID_DATE_RANGE` error if the `start` is after the `end`.
pub(crate) fn date_range(
    start: Date,
    end: Date,
) -> Result<workforce::DateRange, Error> {
    workforce::DateRange::new(start, end)
        .map_err(|_| WorkforceError::InvalidDateRange.into())
}

/// `Shift` assignment of several staff members on several `Date`s.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "BulkAssignmentInput")]
pub struct BulkAssignmentInput {
    /// Assigned `Shift`.
    pub shift_id: ShiftId,

    /// Assigned staff members.
    pub staff_ids: Vec<api::user::Id>,

    /// `Date`s of the assignment.
    pub dates: Vec<Date>,

    /// `Branch` to assign the staff members at, if any.
    pub branch_id: Option<api::fleet::BranchId>,

    /// Task to do during the `Shift`, if any.
    pub task: Option<String>,
}

impl TryFrom<BulkAssignmentInput> for workforce::workday::assignment::Bulk {
    type Error = Error;

    fn try_from(input: BulkAssignmentInput) -> Result<Self, Self::Error> {
        if input.staff_ids.is_empty() || input.dates.is_empty() {
            return Err(WorkforceError::EmptyAssignment.into());
        }
        Ok(Self {
            shift_id: input.shift_id.into(),
            staff_ids: input.staff_ids.into_iter().map(Into::into).collect(),
            dates: input.dates,
            branch_id: input.branch_id.map(Into::into),
            task: input.task,
        })
    }
}

define_error! {
    enum WorkforceError {
        #[code = "SHIFT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Shift` with the provided ID does not exist"]
        ShiftNotExists,

        #[code = "INVALID_SHIFT"]
        #[status = BAD_REQUEST]
        #[message = "`Shift` must end after it starts"]
        InvalidShift,

        #[code = "INVALID_DATE_RANGE"]
        #[status = BAD_REQUEST]
        #[message = "Date range must not start after it ends"]
        InvalidDateRange,

        #[code = "EMPTY_ASSIGNMENT"]
        #[status = BAD_REQUEST]
        #[message = "At least one staff member and date must be provided"]
        EmptyAssignment,
    }
}

#[cfg(test)]
mod spec {
    use common::Date;
    use service::domain::workforce;

    use super::{date_range, ShiftInput};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn time(s: &str) -> super::TimeOfDay {
        s.parse::<workforce::TimeOfDay>().unwrap().into()
    }

    #[test]
    fn rejects_shift_ending_before_start() {
        let err = workforce::shift::Draft::try_from(ShiftInput {
            name: "Night".into(),
            start_time: time("22:00"),
            end_time: time("06:00"),
        })
        .unwrap_err();

        assert_eq!(err.code, "INVALID_SHIFT");
    }

    #[test]
    fn accepts_shift_hours() {
        let draft = workforce::shift::Draft::try_from(ShiftInput {
            name: "Morning".into(),
            start_time: time("08:00"),
            end_time: time("12:30"),
        })
        .unwrap();

        assert_eq!(draft.hours.start().to_string(), "08:00:00");
        assert_eq!(draft.hours.end().to_string(), "12:30:00");
    }

    #[test]
    fn rejects_reversed_range() {
        assert!(date_range(date("2024-05-01"), date("2024-05-07")).is_ok());

        let err =
            date_range(date("2024-05-07"), date("2024-05-01")).unwrap_err();
        assert_eq!(err.code, "INVALID_DATE_RANGE");
    }
}
