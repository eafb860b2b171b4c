use jiff::{Timestamp, Zoned, civil::Date, tz};

/// The clinic's own UTC offset (Indochina Time, no DST). Appointment times
/// are shown in it regardless of where the browser is.
pub const CLINIC_UTC_OFFSET_HOURS: i8 = 7;

pub fn clinic_timezone() -> tz::TimeZone {
    tz::TimeZone::fixed(tz::offset(CLINIC_UTC_OFFSET_HOURS))
}

/// Localize a timestamp to clinic time.
pub fn localize_timestamp(timestamp: Timestamp) -> Zoned {
    timestamp.to_zoned(clinic_timezone())
}

/// Format a zoned timestamp for tables, e.g. "Mon, 03 Mar 2025 09:30".
pub fn format_zoned_timestamp(zoned: &Zoned) -> String {
    zoned.strftime("%a, %d %b %Y %H:%M").to_string()
}

pub fn format_timestamp(timestamp: Timestamp) -> String {
    format_zoned_timestamp(&localize_timestamp(timestamp))
}

pub fn format_date(date: Date) -> String {
    date.strftime("%d/%m/%Y").to_string()
}

/// Today's date in clinic time.
pub fn clinic_today() -> Date {
    localize_timestamp(Timestamp::now()).date()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_show_in_clinic_time() {
        let ts: Timestamp = "2025-03-03T02:30:00Z".parse().unwrap();
        assert_eq!(format_timestamp(ts), "Mon, 03 Mar 2025 09:30");
    }

    #[test]
    fn late_utc_evening_is_next_clinic_day() {
        let ts: Timestamp = "2025-03-03T18:00:00Z".parse().unwrap();
        assert_eq!(
            localize_timestamp(ts).date(),
            "2025-03-04".parse::<Date>().unwrap()
        );
    }

    #[test]
    fn dates_are_day_first() {
        let date: Date = "2025-03-09".parse().unwrap();
        assert_eq!(format_date(date), "09/03/2025");
    }
}
