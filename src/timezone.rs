//! Resolves the server's canonical timezone into concrete local dates.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the current UTC offset for a canonical timezone name, e.g.
/// "Pacific/Auckland".
///
/// Returns `None` if the timezone name is not recognized.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get today's date in the given canonical timezone.
///
/// The date filter presets ("this month", "last month") are anchored on this
/// date, so the ledger rolls over at local midnight rather than UTC midnight.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a valid
/// canonical timezone name.
pub fn current_local_date(local_timezone: &str) -> Result<Date, Error> {
    let Some(local_offset) = get_local_offset(local_timezone) else {
        tracing::error!("Invalid timezone {}", local_timezone);
        return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
    };

    Ok(OffsetDateTime::now_utc().to_offset(local_offset).date())
}
