use crate::models::{ContributionCalendar, ContributionDay, ContributionWeek};
use chrono::{Months, NaiveDate};
use serde::Serialize;

/// What the activity widget shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionSummary {
    pub weeks: Vec<ContributionWeek>,
    /// Total for the whole calendar, not just the kept weeks
    pub total: u32,
    pub today_count: u32,
}

/// Keep weeks whose last day falls on or after `today - months`
///
/// Weeks with unparsable or missing dates are dropped.
pub fn summarize(calendar: ContributionCalendar, months: u32, today: NaiveDate) -> ContributionSummary {
    let cutoff = today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN);

    let weeks: Vec<ContributionWeek> = calendar
        .weeks
        .into_iter()
        .filter(|week| {
            week.contribution_days
                .last()
                .and_then(|day| parse_date(&day.date))
                .is_some_and(|date| date >= cutoff)
        })
        .collect();

    let today_count = count_for(weeks.iter().flat_map(|w| &w.contribution_days), today);

    ContributionSummary {
        weeks,
        total: calendar.total_contributions,
        today_count,
    }
}

fn count_for<'a>(days: impl Iterator<Item = &'a ContributionDay>, date: NaiveDate) -> u32 {
    days.into_iter()
        .find(|day| parse_date(&day.date) == Some(date))
        .map(|day| day.contribution_count)
        .unwrap_or(0)
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
