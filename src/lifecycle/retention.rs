//! Calendar arithmetic for retention cutoffs and pre-creation targets.
//!
//! Steps use real calendar arithmetic, not fixed-size durations: one month
//! back from March 31 lands on the last day of February, never on an
//! invalid day-31 date. Results are encoded with [`Periodicity::encode`] so
//! they compare directly against values extracted from partition names.

use chrono::Datelike;
use chrono::Days;
use chrono::Months;
use chrono::NaiveDate;

use super::Periodicity;
use crate::errors::LifecycleError;
use crate::Result;

/// Encoded date of the newest partition old enough to delete.
///
/// Partitions whose embedded date is `<=` this value have fallen out of the
/// retention window of `retention_count` periods.
pub fn past_cutoff(
    today: NaiveDate,
    periodicity: Periodicity,
    retention_count: u32,
) -> Result<u32> {
    let date = step(today, periodicity, retention_count, Direction::Back)?;
    Ok(periodicity.encode(date))
}

/// Encoded date of the next period's partition, the pre-creation target.
pub fn future_date(
    today: NaiveDate,
    periodicity: Periodicity,
) -> Result<u32> {
    let date = step(today, periodicity, 1, Direction::Forward)?;
    Ok(periodicity.encode(date))
}

#[derive(Clone, Copy)]
enum Direction {
    Back,
    Forward,
}

fn step(
    date: NaiveDate,
    periodicity: Periodicity,
    count: u32,
    direction: Direction,
) -> Result<NaiveDate> {
    let stepped = match (periodicity, direction) {
        (Periodicity::Daily, Direction::Back) => date.checked_sub_days(Days::new(u64::from(count))),
        (Periodicity::Daily, Direction::Forward) => date.checked_add_days(Days::new(u64::from(count))),
        (Periodicity::Weekly, Direction::Back) => date.checked_sub_days(Days::new(7 * u64::from(count))),
        (Periodicity::Weekly, Direction::Forward) => date.checked_add_days(Days::new(7 * u64::from(count))),
        (Periodicity::Monthly, Direction::Back) => date.checked_sub_months(Months::new(count)),
        (Periodicity::Monthly, Direction::Forward) => date.checked_add_months(Months::new(count)),
        (Periodicity::Yearly, Direction::Back) => count
            .checked_mul(12)
            .and_then(|months| date.checked_sub_months(Months::new(months))),
        (Periodicity::Yearly, Direction::Forward) => count
            .checked_mul(12)
            .and_then(|months| date.checked_add_months(Months::new(months))),
    };

    // Years outside 0..=9999 cannot round-trip through a fixed-width suffix.
    stepped
        .filter(|stepped| (0..=9999).contains(&stepped.year()))
        .ok_or_else(|| {
            LifecycleError::CalendarOverflow {
                date,
                periods: count,
                unit: periodicity.unit_name(),
            }
            .into()
        })
}
