use thiserror::Error;
use time::{util::days_in_year_month, Date, Duration, Month, Weekday};

/// Pagination ran off the edge of the representable calendar.
#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

pub(crate) trait WeekdayExt {
    /// 0 = Sunday .. 6 = Saturday
    fn index0(&self) -> u8;
    /// 1 = Monday .. 7 = Sunday (the convention of the text channel)
    fn display_number(&self) -> u8;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u8 {
        self.number_days_from_sunday()
    }

    fn display_number(&self) -> u8 {
        self.number_from_monday()
    }
}

pub(crate) fn weekday_from_index0(index: u8) -> Weekday {
    match index % 7 {
        0 => Weekday::Sunday,
        1 => Weekday::Monday,
        2 => Weekday::Tuesday,
        3 => Weekday::Wednesday,
        4 => Weekday::Thursday,
        5 => Weekday::Friday,
        _ => Weekday::Saturday,
    }
}

pub(crate) fn weekday_from_display_number(number: u8) -> Option<Weekday> {
    (1..=7).contains(&number).then(|| weekday_from_index0(number % 7))
}

pub(crate) fn add_days(date: Date, days: i64) -> Option<Date> {
    date.checked_add(Duration::days(days))
}

// The day of month is clamped to the length of the target month, so e.g.
// January 31 plus one month is February 28/29.  Months that would leave the
// representable year range return the input unchanged.
pub(crate) fn add_months(date: Date, delta: i32) -> Date {
    let total = date.year() * 12 + i32::from(u8::from(date.month())) - 1 + delta;
    let year = total.div_euclid(12);
    let Ok(month) = Month::try_from(u8::try_from(total.rem_euclid(12) + 1).unwrap_or(1)) else {
        return date;
    };
    let day = date.day().min(days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).unwrap_or(date)
}

pub(crate) fn start_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

pub(crate) fn end_of_month(date: Date) -> Date {
    date.replace_day(days_in_year_month(date.year(), date.month()))
        .unwrap_or(date)
}

pub(crate) fn start_of_week(date: Date, first_weekday: Weekday) -> Date {
    let back = (date.weekday().index0() + 7 - first_weekday.index0()) % 7;
    add_days(date, -i64::from(back)).unwrap_or(date)
}

pub(crate) fn end_of_week(date: Date, first_weekday: Weekday) -> Date {
    let start = start_of_week(date, first_weekday);
    add_days(start, 6).unwrap_or(date)
}

/// Round to the nearest multiple of `step`, ties rounding down, with 60
/// wrapping to 0.  A step of zero disables snapping.
pub(crate) fn clamp_minute_to_step(minute: u8, step: u8) -> u8 {
    if step == 0 {
        return minute;
    }
    let rem = minute % step;
    let down = minute - rem;
    let snapped = if u16::from(rem) * 2 > u16::from(step) {
        down + step
    } else {
        down
    };
    snapped % 60
}

/// Inclusive min/max date limits.  Either side may be absent.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Bounds {
    pub(crate) min: Option<Date>,
    pub(crate) max: Option<Date>,
}

impl Bounds {
    pub(crate) fn new(min: Option<Date>, max: Option<Date>) -> Bounds {
        Bounds { min, max }
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        self.min.map_or(true, |min| date >= min) && self.max.map_or(true, |max| date <= max)
    }
}

pub(crate) fn today() -> Date {
    time::OffsetDateTime::now_local()
        .unwrap_or_else(|_| time::OffsetDateTime::now_utc())
        .date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(date!(2024 - 01 - 31), 1), date!(2024 - 02 - 29));
        assert_eq!(add_months(date!(2023 - 01 - 31), 1), date!(2023 - 02 - 28));
        assert_eq!(add_months(date!(2024 - 03 - 31), -1), date!(2024 - 02 - 29));
    }

    #[test]
    fn test_add_months_across_year() {
        assert_eq!(add_months(date!(2024 - 11 - 15), 3), date!(2025 - 02 - 15));
        assert_eq!(add_months(date!(2024 - 02 - 15), -14), date!(2022 - 12 - 15));
    }

    #[test]
    fn test_month_edges() {
        assert_eq!(start_of_month(date!(2024 - 03 - 15)), date!(2024 - 03 - 01));
        assert_eq!(end_of_month(date!(2024 - 02 - 10)), date!(2024 - 02 - 29));
        assert_eq!(end_of_month(date!(2024 - 04 - 01)), date!(2024 - 04 - 30));
    }

    #[test]
    fn test_start_of_week_sunday_first() {
        // 2024-03-15 is a Friday
        let start = start_of_week(date!(2024 - 03 - 15), Weekday::Sunday);
        assert_eq!(start, date!(2024 - 03 - 10));
        assert_eq!(start.weekday(), Weekday::Sunday);
    }

    #[test]
    fn test_start_of_week_monday_first() {
        let start = start_of_week(date!(2024 - 03 - 15), Weekday::Monday);
        assert_eq!(start, date!(2024 - 03 - 11));
        // A Monday is already the start of its own week
        assert_eq!(
            start_of_week(date!(2024 - 03 - 11), Weekday::Monday),
            date!(2024 - 03 - 11)
        );
    }

    #[test]
    fn test_end_of_week() {
        assert_eq!(
            end_of_week(date!(2024 - 03 - 15), Weekday::Sunday),
            date!(2024 - 03 - 16)
        );
        assert_eq!(
            end_of_week(date!(2024 - 03 - 15), Weekday::Monday),
            date!(2024 - 03 - 17)
        );
    }

    #[test]
    fn test_clamp_minute_rounds_to_nearest() {
        assert_eq!(clamp_minute_to_step(7, 5), 5);
        assert_eq!(clamp_minute_to_step(8, 5), 10);
        assert_eq!(clamp_minute_to_step(0, 15), 0);
        assert_eq!(clamp_minute_to_step(52, 15), 45);
        assert_eq!(clamp_minute_to_step(53, 15), 60 % 60);
    }

    #[test]
    fn test_clamp_minute_ties_round_down() {
        assert_eq!(clamp_minute_to_step(5, 10), 0);
        assert_eq!(clamp_minute_to_step(15, 30), 0);
        assert_eq!(clamp_minute_to_step(45, 30), 30);
    }

    #[test]
    fn test_clamp_minute_wraps_to_zero() {
        assert_eq!(clamp_minute_to_step(58, 5), 0);
        assert_eq!(clamp_minute_to_step(59, 2), 0);
    }

    #[test]
    fn test_clamp_minute_step_zero_is_identity() {
        for m in 0..60 {
            assert_eq!(clamp_minute_to_step(m, 0), m);
        }
    }

    #[test]
    fn test_clamp_minute_laws() {
        for step in [1u8, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30] {
            for m in 0..60u8 {
                let snapped = clamp_minute_to_step(m, step);
                assert_eq!(snapped % step, 0, "m={m} step={step} snapped={snapped}");
                // Distance measured on the minute circle, since 60 wraps to 0
                let diff = m.abs_diff(if snapped == 0 && m * 2 > 60 { 60 } else { snapped });
                assert!(diff * 2 <= step, "m={m} step={step} snapped={snapped}");
            }
        }
    }

    #[test]
    fn test_bounds() {
        let bounds = Bounds::new(Some(date!(2024 - 01 - 01)), Some(date!(2024 - 12 - 31)));
        assert!(bounds.contains(date!(2024 - 01 - 01)));
        assert!(bounds.contains(date!(2024 - 12 - 31)));
        assert!(bounds.contains(date!(2024 - 06 - 15)));
        assert!(!bounds.contains(date!(2023 - 12 - 31)));
        assert!(!bounds.contains(date!(2025 - 01 - 01)));
        assert!(Bounds::default().contains(date!(1000 - 01 - 01)));
    }

    #[test]
    fn test_weekday_numbering() {
        assert_eq!(Weekday::Sunday.index0(), 0);
        assert_eq!(Weekday::Saturday.index0(), 6);
        assert_eq!(Weekday::Monday.display_number(), 1);
        assert_eq!(Weekday::Sunday.display_number(), 7);
        assert_eq!(weekday_from_index0(0), Weekday::Sunday);
        assert_eq!(weekday_from_display_number(7), Some(Weekday::Sunday));
        assert_eq!(weekday_from_display_number(1), Some(Weekday::Monday));
        assert_eq!(weekday_from_display_number(0), None);
        assert_eq!(weekday_from_display_number(8), None);
    }
}
