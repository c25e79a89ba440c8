use super::pattern::Pattern;
use super::timeofday::{DateTime, TimeOfDay};
use time::Date;

/// Selected weekdays, 0 = Sunday .. 6 = Saturday.
// Invariant: only bits 0..7 are ever set
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct WeekdaySet(u8);

impl WeekdaySet {
    pub(crate) fn contains(&self, index0: u8) -> bool {
        index0 < 7 && self.0 & (1 << index0) != 0
    }

    pub(crate) fn insert(&mut self, index0: u8) {
        if index0 < 7 {
            self.0 |= 1 << index0;
        }
    }

    pub(crate) fn remove(&mut self, index0: u8) {
        self.0 &= !(1u8 << (index0 % 7));
    }

    pub(crate) fn clear(&mut self) {
        self.0 = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Toggle under multi-select; clear-then-insert otherwise, so the set
    /// never holds more than one element.
    pub(crate) fn toggle(&mut self, index0: u8, multi: bool) {
        if multi {
            if self.contains(index0) {
                self.remove(index0);
            } else {
                self.insert(index0);
            }
        } else {
            self.clear();
            self.insert(index0);
        }
    }

    /// Sorted display numbers, 1 = Monday .. 7 = Sunday.
    pub(crate) fn display_numbers(&self) -> Vec<u8> {
        (1..=7).filter(|n| self.contains(n % 7)).collect()
    }
}

/// Selected days of the month, 1–31.
// Invariant: only bits 0..31 are ever set
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct MonthDaySet(u32);

impl MonthDaySet {
    pub(crate) fn contains(&self, day: u8) -> bool {
        (1..=31).contains(&day) && self.0 & (1 << (day - 1)) != 0
    }

    pub(crate) fn insert(&mut self, day: u8) {
        if (1..=31).contains(&day) {
            self.0 |= 1 << (day - 1);
        }
    }

    pub(crate) fn remove(&mut self, day: u8) {
        if (1..=31).contains(&day) {
            self.0 &= !(1u32 << (day - 1));
        }
    }

    pub(crate) fn clear(&mut self) {
        self.0 = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub(crate) fn toggle(&mut self, day: u8, multi: bool) {
        if multi {
            if self.contains(day) {
                self.remove(day);
            } else {
                self.insert(day);
            }
        } else {
            self.clear();
            self.insert(day);
        }
    }

    pub(crate) fn days(&self) -> Vec<u8> {
        (1..=31).filter(|&d| self.contains(d)).collect()
    }
}

/// Two-endpoint interval under construction or complete.  `hover` is the
/// transient preview of the provisional end while waiting for the second
/// click; it is never serialized.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct RangeSelection {
    pub(crate) start: Option<DateTime>,
    pub(crate) end: Option<DateTime>,
    pub(crate) hover: Option<Date>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RangePhase {
    Started,
    Completed,
}

impl RangeSelection {
    /// The two-phase click protocol.  A click with no start, with both
    /// endpoints already set, or on the pending start's own date begins a
    /// new range; otherwise it completes the pending one, swapping the
    /// endpoints when the candidate end precedes the start.
    pub(crate) fn click(
        &mut self,
        date: Date,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
    ) -> RangePhase {
        self.hover = None;
        match (self.start, self.end) {
            (Some(start), None) if start.date != date => {
                let candidate = DateTime::new(date, end_time);
                if candidate < start {
                    self.start = Some(candidate);
                    self.end = Some(start);
                } else {
                    self.end = Some(candidate);
                }
                RangePhase::Completed
            }
            _ => {
                self.start = Some(DateTime::new(date, start_time));
                self.end = None;
                RangePhase::Started
            }
        }
    }

    /// True while a start is pending its second click.
    pub(crate) fn is_picking(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    /// Bulk assignment; endpoints are reordered so that start <= end.
    pub(crate) fn set(&mut self, start: Option<DateTime>, end: Option<DateTime>) {
        let (start, end) = match (start, end) {
            (Some(a), Some(b)) if b < a => (Some(b), Some(a)),
            (None, Some(b)) => (Some(b), None),
            other => other,
        };
        self.start = start;
        self.end = end;
        self.hover = None;
    }
}

/// The one selection truth, tagged by mode; operations on a mismatched
/// variant are no-ops at the call sites in `state`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Selection {
    Single(Option<DateTime>),
    Range(RangeSelection),
    Weekly(WeekdaySet),
    Monthly(MonthDaySet),
}

impl Selection {
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Selection::Single(value) => value.is_none(),
            Selection::Range(range) => range.start.is_none(),
            Selection::Weekly(set) => set.is_empty(),
            Selection::Monthly(set) => set.is_empty(),
        }
    }

    pub(crate) fn reset(&mut self) {
        match self {
            Selection::Single(value) => *value = None,
            Selection::Range(range) => *range = RangeSelection::default(),
            Selection::Weekly(set) => set.clear(),
            Selection::Monthly(set) => set.clear(),
        }
    }

    /// The externally observable serialization of the selection.
    pub(crate) fn to_field_text(&self, pattern: &Pattern, separator: &str) -> String {
        match self {
            Selection::Single(None) => String::new(),
            Selection::Single(Some(value)) => pattern.format(*value),
            Selection::Range(range) => match (range.start, range.end) {
                (None, _) => String::new(),
                (Some(start), None) => pattern.format(start),
                (Some(start), Some(end)) => {
                    format!("{}{separator}{}", pattern.format(start), pattern.format(end))
                }
            },
            Selection::Weekly(set) => join_numbers(&set.display_numbers()),
            Selection::Monthly(set) => join_numbers(&set.days()),
        }
    }
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits range text on the separator; endpoints that fail to parse drop
/// to empty instead of erroring.
pub(crate) fn parse_range_text(
    text: &str,
    pattern: &Pattern,
    separator: &str,
) -> (Option<DateTime>, Option<DateTime>) {
    let text = text.trim();
    if text.is_empty() {
        return (None, None);
    }
    match text.split_once(separator) {
        Some((first, second)) => (pattern.parse(first.trim()), pattern.parse(second.trim())),
        None => (pattern.parse(text), None),
    }
}

/// Parses the schedule text channel: a bare comma-joined list, or the
/// legacy `weekly:`/`monthly:`-prefixed form.  A prefix for the other
/// sub-mode means the text is not ours and yields nothing.  Unparsable
/// entries are skipped.
pub(crate) fn parse_schedule_text(text: &str, prefix: &str, other_prefix: &str) -> Vec<u8> {
    let text = text.trim();
    let body = if let Some(rest) = text.strip_prefix(prefix).and_then(|r| r.strip_prefix(':')) {
        rest
    } else if text
        .strip_prefix(other_prefix)
        .and_then(|r| r.strip_prefix(':'))
        .is_some()
    {
        return Vec::new();
    } else {
        text
    };
    body.split(',')
        .filter_map(|part| part.trim().parse::<u8>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn at(date: Date) -> DateTime {
        DateTime::at_midnight(date)
    }

    #[test]
    fn test_two_clicks_any_order_give_ordered_range() {
        let zero = TimeOfDay::default();
        let mut range = RangeSelection::default();
        assert_eq!(
            range.click(date!(2024 - 03 - 20), zero, zero),
            RangePhase::Started
        );
        assert_eq!(
            range.click(date!(2024 - 03 - 10), zero, zero),
            RangePhase::Completed
        );
        assert_eq!(range.start, Some(at(date!(2024 - 03 - 10))));
        assert_eq!(range.end, Some(at(date!(2024 - 03 - 20))));

        let mut range = RangeSelection::default();
        range.click(date!(2024 - 03 - 10), zero, zero);
        range.click(date!(2024 - 03 - 20), zero, zero);
        assert_eq!(range.start, Some(at(date!(2024 - 03 - 10))));
        assert_eq!(range.end, Some(at(date!(2024 - 03 - 20))));
    }

    #[test]
    fn test_third_click_starts_over() {
        let zero = TimeOfDay::default();
        let mut range = RangeSelection::default();
        range.click(date!(2024 - 03 - 10), zero, zero);
        range.click(date!(2024 - 03 - 20), zero, zero);
        assert_eq!(
            range.click(date!(2024 - 03 - 15), zero, zero),
            RangePhase::Started
        );
        assert_eq!(range.start, Some(at(date!(2024 - 03 - 15))));
        assert_eq!(range.end, None);
    }

    #[test]
    fn test_same_cell_twice_restarts_instead_of_closing() {
        let zero = TimeOfDay::default();
        let mut range = RangeSelection::default();
        range.click(date!(2024 - 03 - 15), zero, zero);
        assert_eq!(
            range.click(date!(2024 - 03 - 15), zero, zero),
            RangePhase::Started
        );
        assert_eq!(range.start, Some(at(date!(2024 - 03 - 15))));
        assert_eq!(range.end, None);
    }

    #[test]
    fn test_click_carries_endpoint_times() {
        let start_time = TimeOfDay::new(9, 0);
        let end_time = TimeOfDay::new(17, 30);
        let mut range = RangeSelection::default();
        range.click(date!(2024 - 03 - 10), start_time, end_time);
        range.click(date!(2024 - 03 - 20), start_time, end_time);
        assert_eq!(
            range.start,
            Some(DateTime::new(date!(2024 - 03 - 10), start_time))
        );
        assert_eq!(
            range.end,
            Some(DateTime::new(date!(2024 - 03 - 20), end_time))
        );
    }

    #[test]
    fn test_hover_cleared_by_click() {
        let zero = TimeOfDay::default();
        let mut range = RangeSelection::default();
        range.click(date!(2024 - 03 - 10), zero, zero);
        range.hover = Some(date!(2024 - 03 - 14));
        range.click(date!(2024 - 03 - 20), zero, zero);
        assert_eq!(range.hover, None);
    }

    #[test]
    fn test_set_normalizes_order() {
        let mut range = RangeSelection::default();
        range.set(Some(at(date!(2024 - 05 - 20))), Some(at(date!(2024 - 05 - 01))));
        assert_eq!(range.start, Some(at(date!(2024 - 05 - 01))));
        assert_eq!(range.end, Some(at(date!(2024 - 05 - 20))));
        range.set(None, Some(at(date!(2024 - 05 - 20))));
        assert_eq!(range.start, Some(at(date!(2024 - 05 - 20))));
        assert_eq!(range.end, None);
    }

    #[test]
    fn test_weekday_set_toggle_multi() {
        let mut set = WeekdaySet::default();
        set.toggle(1, true);
        set.toggle(5, true);
        assert_eq!(set.display_numbers(), vec![1, 5]);
        set.toggle(1, true);
        assert_eq!(set.display_numbers(), vec![5]);
    }

    #[test]
    fn test_weekday_set_single_select() {
        let mut set = WeekdaySet::default();
        set.toggle(2, false);
        set.toggle(4, false);
        assert_eq!(set.display_numbers(), vec![4]);
        // Re-toggling the sole member keeps it selected
        set.toggle(4, false);
        assert_eq!(set.display_numbers(), vec![4]);
    }

    #[test]
    fn test_weekday_display_convention() {
        let mut set = WeekdaySet::default();
        set.insert(0); // Sunday
        set.insert(1); // Monday
        set.insert(6); // Saturday
        assert_eq!(set.display_numbers(), vec![1, 6, 7]);
    }

    #[test]
    fn test_month_day_set() {
        let mut set = MonthDaySet::default();
        set.toggle(10, false);
        set.toggle(20, false);
        assert_eq!(set.days(), vec![20]);
        set.toggle(31, true);
        set.toggle(1, true);
        assert_eq!(set.days(), vec![1, 20, 31]);
        set.insert(0);
        set.insert(32);
        assert_eq!(set.days(), vec![1, 20, 31]);
    }

    #[test]
    fn test_field_text_single() {
        let pattern = Pattern::compile("yyyy-MM-dd");
        let sel = Selection::Single(Some(at(date!(2024 - 03 - 15))));
        assert_eq!(sel.to_field_text(&pattern, " - "), "2024-03-15");
        assert_eq!(
            Selection::Single(None).to_field_text(&pattern, " - "),
            ""
        );
    }

    #[test]
    fn test_field_text_range() {
        let pattern = Pattern::compile("yyyy-MM-dd");
        let mut range = RangeSelection::default();
        range.set(Some(at(date!(2024 - 03 - 10))), Some(at(date!(2024 - 03 - 20))));
        assert_eq!(
            Selection::Range(range).to_field_text(&pattern, " - "),
            "2024-03-10 - 2024-03-20"
        );
        range.set(Some(at(date!(2024 - 03 - 10))), None);
        assert_eq!(
            Selection::Range(range).to_field_text(&pattern, " - "),
            "2024-03-10"
        );
    }

    #[test]
    fn test_field_text_schedules() {
        let pattern = Pattern::compile("yyyy-MM-dd");
        let mut days = WeekdaySet::default();
        days.insert(1);
        days.insert(5);
        assert_eq!(Selection::Weekly(days).to_field_text(&pattern, " - "), "1,5");
        let mut mdays = MonthDaySet::default();
        mdays.insert(15);
        mdays.insert(1);
        assert_eq!(
            Selection::Monthly(mdays).to_field_text(&pattern, " - "),
            "1,15"
        );
    }

    #[test]
    fn test_parse_range_text() {
        let pattern = Pattern::compile("yyyy-MM-dd");
        assert_eq!(
            parse_range_text("2024-03-10 - 2024-03-20", &pattern, " - "),
            (
                Some(at(date!(2024 - 03 - 10))),
                Some(at(date!(2024 - 03 - 20)))
            )
        );
        assert_eq!(
            parse_range_text("2024-03-10", &pattern, " - "),
            (Some(at(date!(2024 - 03 - 10))), None)
        );
        assert_eq!(parse_range_text("", &pattern, " - "), (None, None));
        assert_eq!(
            parse_range_text("garbage - 2024-03-20", &pattern, " - "),
            (None, Some(at(date!(2024 - 03 - 20))))
        );
    }

    #[test]
    fn test_parse_schedule_text() {
        assert_eq!(parse_schedule_text("1,3,5", "weekly", "monthly"), vec![1, 3, 5]);
        assert_eq!(
            parse_schedule_text("weekly:1,3,5", "weekly", "monthly"),
            vec![1, 3, 5]
        );
        assert_eq!(
            parse_schedule_text("monthly:1,15", "monthly", "weekly"),
            vec![1, 15]
        );
        assert_eq!(
            parse_schedule_text("monthly:1,15", "weekly", "monthly"),
            Vec::<u8>::new()
        );
        assert_eq!(
            parse_schedule_text("1, junk, 15", "monthly", "weekly"),
            vec![1, 15]
        );
        assert_eq!(parse_schedule_text("", "weekly", "monthly"), Vec::<u8>::new());
    }
}
