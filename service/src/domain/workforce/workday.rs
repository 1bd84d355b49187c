//! [`Workday`] definitions.

use common::{define_id, Date};
use itertools::Itertools as _;
use serde::Deserialize;

use crate::domain::{branch, user};
#[cfg(doc)]
use crate::domain::{Branch, User};

use super::{DateRange, Shift};

/// Calendar day of a staff member with the [`Shift`]s assigned to it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workday {
    /// ID of this [`Workday`].
    pub id: Id,

    /// ID of the [`User`] working on this [`Workday`].
    pub staff_id: user::Id,

    /// ID of the [`Branch`] this [`Workday`] is scheduled at.
    #[serde(default)]
    pub branch_id: Option<branch::Id>,

    /// Calendar [`Date`] of this [`Workday`].
    #[serde(alias = "workDate")]
    pub date: Date,

    /// [`Assignment`]s of this [`Workday`].
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl Workday {
    /// Returns [`Assignment`]s of this [`Workday`] ordered by their
    /// [`Shift`] start.
    #[must_use]
    pub fn assignments_by_start(&self) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .sorted_by_key(|a| (a.shift.hours.start(), a.shift.hours.end()))
            .collect()
    }

    /// Returns pairs of [`Assignment`]s of this [`Workday`] whose [`Shift`]s
    /// overlap in time.
    #[must_use]
    pub fn overlapping(&self) -> Vec<(&Assignment, &Assignment)> {
        self.assignments
            .iter()
            .tuple_combinations()
            .filter(|(a, b)| a.shift.hours.overlaps(&b.shift.hours))
            .collect()
    }
}

define_id! {
    #[doc = "ID of a [`Workday`]."]
    Id
}

/// [`Shift`] assigned to a staff member on a [`Workday`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// ID of this [`Assignment`].
    pub id: AssignmentId,

    /// Assigned [`Shift`].
    pub shift: Shift,

    /// Task description of this [`Assignment`].
    #[serde(default)]
    pub task: Option<String>,
}

define_id! {
    #[doc = "ID of an [`Assignment`]."]
    AssignmentId
}

pub mod assignment {
    //! [`Assignment`] operations.
    //!
    //! [`Assignment`]: super::Assignment

    use common::Date;
    use serde::Serialize;

    use crate::domain::{branch, user, workforce::shift};

    /// Assignment of one [`Shift`] to several staff members over several
    /// [`Date`]s at once.
    ///
    /// [`Shift`]: crate::domain::workforce::Shift
    #[derive(Clone, Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Bulk {
        /// ID of the assigned [`Shift`].
        ///
        /// [`Shift`]: crate::domain::workforce::Shift
        pub shift_id: shift::Id,

        /// IDs of the assigned staff members.
        pub staff_ids: Vec<user::Id>,

        /// [`Date`]s of the assignment.
        pub dates: Vec<Date>,

        /// ID of the branch the staff members work at.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub branch_id: Option<branch::Id>,

        /// Task description.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub task: Option<String>,
    }
}

/// Schedule of a [`Branch`] over a [`DateRange`].
#[derive(Clone, Debug)]
pub struct BranchSchedule {
    /// ID of the [`Branch`].
    pub branch_id: branch::Id,

    /// Requested [`DateRange`].
    pub range: DateRange,
}

/// Schedule of a staff member over a [`DateRange`].
#[derive(Clone, Debug)]
pub struct StaffSchedule {
    /// ID of the staff member.
    pub staff_id: user::Id,

    /// Requested [`DateRange`].
    pub range: DateRange,
}
