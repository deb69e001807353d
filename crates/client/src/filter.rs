//! Read-side partitioning of a fetched reminder list.
//!
//! The horizon filters only ever look at non-completed reminders; completed
//! ones always render as their own section. Nothing here mutates a
//! reminder, so the partition stays disjoint and exhaustive over whatever
//! the last fetch returned.

use chrono::{DateTime, Duration, Months, Utc};

use crate::types::Reminder;

/// Horizon applied to the upcoming section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    /// Next 7 days (default view).
    #[default]
    SevenDays,
    /// One calendar month out.
    OneMonth,
    /// No cutoff.
    All,
}

impl ListFilter {
    fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            ListFilter::SevenDays => Some(now + Duration::days(7)),
            // Calendar month, not 30 days; falls back to a plain span only
            // if the date arithmetic overflows.
            ListFilter::OneMonth => Some(
                now.checked_add_months(Months::new(1))
                    .unwrap_or(now + Duration::days(31)),
            ),
            ListFilter::All => None,
        }
    }
}

/// Non-completed reminders within the filter horizon, soonest first.
pub fn upcoming(reminders: &[Reminder], filter: ListFilter, now: DateTime<Utc>) -> Vec<Reminder> {
    let cutoff = filter.cutoff(now);
    let mut items: Vec<Reminder> = reminders
        .iter()
        .filter(|r| !r.is_completed())
        .filter(|r| cutoff.map_or(true, |c| r.next_trigger_at <= c))
        .cloned()
        .collect();
    items.sort_by_key(|r| r.next_trigger_at);
    items
}

/// Completed reminders in fetch order.
pub fn completed(reminders: &[Reminder]) -> Vec<Reminder> {
    reminders.iter().filter(|r| r.is_completed()).cloned().collect()
}
