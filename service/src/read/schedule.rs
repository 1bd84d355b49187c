//! [`Schedule`] read model definition.

use std::collections::BTreeMap;

use common::Date;

use crate::domain::workforce::Workday;

/// [`Workday`]s grouped by their calendar [`Date`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schedule(BTreeMap<Date, Vec<Workday>>);

impl Schedule {
    /// Returns the [`Workday`]s of the provided [`Date`].
    #[must_use]
    pub fn on(&self, date: Date) -> &[Workday] {
        self.0.get(&date).map_or(&[], Vec::as_slice)
    }

    /// Iterates over the scheduled [`Date`]s in order, along with their
    /// [`Workday`]s.
    pub fn days(&self) -> impl Iterator<Item = (Date, &[Workday])> + '_ {
        self.0.iter().map(|(d, w)| (*d, w.as_slice()))
    }

    /// Indicates whether this [`Schedule`] has no [`Workday`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Workday> for Schedule {
    fn from_iter<I: IntoIterator<Item = Workday>>(iter: I) -> Self {
        let mut days = BTreeMap::<_, Vec<_>>::new();
        for workday in iter {
            days.entry(workday.date).or_default().push(workday);
        }
        Self(days)
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::workforce::Workday;

    use super::Schedule;

    fn workday(id: &str, staff: &str, date: &str) -> Workday {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "staffId": staff,
            "workDate": date,
        }))
        .unwrap()
    }

    #[test]
    fn groups_workdays_by_date() {
        let schedule: Schedule = [
            workday("w-3", "s-1", "2024-05-03"),
            workday("w-1", "s-1", "2024-05-01"),
            workday("w-2", "s-2", "2024-05-01"),
        ]
        .into_iter()
        .collect();

        let days = schedule.days().collect::<Vec<_>>();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].0.to_string(), "2024-05-01");
        assert_eq!(days[0].1.len(), 2);
        assert_eq!(schedule.on(days[1].0)[0].id.to_string(), "w-3");
    }
}
