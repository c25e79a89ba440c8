mod clock;
mod dateutil;
mod grid;
mod locale;
mod pattern;
mod selection;
mod state;
mod timeofday;
mod widget;
pub(crate) use self::clock::{now_time, ClockTicker};
pub(crate) use self::dateutil::{today, weekday_from_index0, Bounds, WeekdayExt};
pub(crate) use self::grid::day_number_list;
pub(crate) use self::locale::Locale;
pub(crate) use self::selection::Selection;
pub(crate) use self::state::{HitTarget, Mode, PickerOptions, PickerState, Source};
pub(crate) use self::widget::PickerWidget;
use time::Date;

/// Consumer-supplied predicate deciding which concrete dates may not be
/// selected.  Applied on top of the min/max bounds in single and range
/// modes; schedule modes select weekdays and day numbers, not dates, and
/// never consult it.
pub(crate) trait DateFilter {
    fn is_disabled(&self, date: Date) -> bool;
}

/// Filter that allows every date.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Unrestricted;

impl DateFilter for Unrestricted {
    fn is_disabled(&self, _date: Date) -> bool {
        false
    }
}
