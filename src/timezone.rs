use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date in `canonical_timezone`, e.g. "Asia/Kolkata".
pub fn local_today(canonical_timezone: &str) -> Option<Date> {
    get_local_offset(canonical_timezone)
        .map(|offset| OffsetDateTime::now_utc().to_offset(offset).date())
}

#[cfg(test)]
mod tests {
    use super::{get_local_offset, local_today};

    #[test]
    fn resolves_canonical_names() {
        assert_eq!(get_local_offset("Etc/UTC"), Some(time::UtcOffset::UTC));
        assert!(local_today("Asia/Kolkata").is_some());
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(get_local_offset("Middle/Earth"), None);
        assert_eq!(local_today("Middle/Earth"), None);
    }
}
