use super::dateutil::{add_days, start_of_month, start_of_week, Bounds};
use super::selection::{MonthDaySet, Selection};
use super::DateFilter;
use time::{Date, Weekday};

/// Calendar modes always derive a fixed six-week window.
pub(crate) const GRID_CELLS: usize = 42;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Cell {
    pub(crate) date: Date,
    pub(crate) in_month: bool,
    pub(crate) disabled: bool,
    pub(crate) today: bool,
    pub(crate) focused: bool,
    pub(crate) selected: bool,
    pub(crate) in_range: bool,
    pub(crate) range_start: bool,
    pub(crate) range_end: bool,
}

/// Derives the 42-cell grid for the month containing `month`.  Pure: the
/// same inputs always produce the same cells.
pub(crate) fn month_grid<F: DateFilter>(
    month: Date,
    today: Date,
    focused: Option<Date>,
    selection: &Selection,
    bounds: &Bounds,
    filter: &F,
    first_weekday: Weekday,
) -> Vec<Cell> {
    let month_start = start_of_month(month);
    let first = start_of_week(month_start, first_weekday);
    let single = match selection {
        Selection::Single(value) => value.map(|v| v.date),
        _ => None,
    };
    let (range_start, range_end, hover) = match selection {
        Selection::Range(range) => (
            range.start.map(|v| v.date),
            range.end.map(|v| v.date),
            range.hover,
        ),
        _ => (None, None, None),
    };
    // The provisional span while hovering for the second click
    let span = match (range_start, range_end, hover) {
        (Some(s), Some(e), _) => Some((s, e)),
        (Some(s), None, Some(h)) => Some((s.min(h), s.max(h))),
        _ => None,
    };
    let check_bounds = matches!(selection, Selection::Single(_) | Selection::Range(_));
    let mut cells = Vec::with_capacity(GRID_CELLS);
    let mut date = first;
    for _ in 0..GRID_CELLS {
        cells.push(Cell {
            date,
            in_month: date.month() == month_start.month() && date.year() == month_start.year(),
            disabled: check_bounds && (!bounds.contains(date) || filter.is_disabled(date)),
            today: date == today,
            focused: focused == Some(date),
            selected: single == Some(date),
            in_range: span.is_some_and(|(lo, hi)| lo <= date && date <= hi),
            range_start: range_start == Some(date),
            range_end: range_end == Some(date),
        });
        let Some(next) = add_days(date, 1) else {
            break;
        };
        date = next;
    }
    cells
}

/// The degenerate monthly-schedule grid: a fixed 1–31 day-number list with
/// no month or today concept.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DayNumberCell {
    pub(crate) day: u8,
    pub(crate) selected: bool,
}

pub(crate) fn day_number_list(days: &MonthDaySet) -> Vec<DayNumberCell> {
    (1..=31)
        .map(|day| DayNumberCell {
            day,
            selected: days.contains(day),
        })
        .collect()
}
