use super::clock::HandAngles;
use super::state::{weekday_row, HitGrid, Mode, PickerState};
use super::timeofday::{Endpoint, TimeField, TimeOfDay, TimePanel};
use super::{day_number_list, DateFilter, WeekdayExt};
use crate::theme::{
    time_row, BASE_STYLE, DISABLED_STYLE, HEADER_STYLE, HINT_STYLE, IN_RANGE_STYLE, OUTSIDE_STYLE,
    SELECTED_STYLE, TODAY_STYLE, WEEKDAY_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Text,
    widgets::{Paragraph, StatefulWidget, Widget},
};
use std::marker::PhantomData;

/// Columns per grid cell
const DAY_WIDTH: u16 = 5;

const GRID_COLS: u16 = 7;

const GRID_WIDTH: u16 = DAY_WIDTH * GRID_COLS;

/// Lines taken by the title and (in calendar modes) the weekday header
const HEADER_LINES: u16 = 2;

/// Renders the derived picker data.  Pure reader: the only state it
/// writes back is the grid geometry used for pointer hit-testing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct PickerWidget<F> {
    clock: Option<TimeOfDay>,
    _data: PhantomData<F>,
}

impl<F> PickerWidget<F> {
    pub(crate) fn new() -> PickerWidget<F> {
        PickerWidget {
            clock: None,
            _data: PhantomData,
        }
    }

    pub(crate) fn clock(mut self, now: Option<TimeOfDay>) -> PickerWidget<F> {
        self.clock = now;
        self
    }
}

impl<F: DateFilter> StatefulWidget for PickerWidget<F> {
    type State = PickerState<F>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let left = area.width.saturating_sub(GRID_WIDTH) / 2;
        let panel = Rect {
            x: area.x + left,
            y: area.y,
            width: GRID_WIDTH.min(area.width),
            height: area.height,
        };
        let mut canvas = Canvas::new(panel, buf);
        let rows_drawn = match state.mode() {
            Mode::Single | Mode::Range => render_calendar(&mut canvas, state),
            Mode::WeeklySchedule => render_weekday_row(&mut canvas, state),
            Mode::MonthlySchedule => render_day_numbers(&mut canvas, state),
        };
        let hit = grid_geometry(panel, state.mode());
        state.set_hit_grid(Some(hit));
        let mut y = HEADER_LINES + rows_drawn + 1;
        if state.options().enable_time {
            render_time_panel(&mut canvas, state, self.clock, y);
            y += 2;
        }
        render_hints(&mut canvas, state, y);
    }
}

fn grid_geometry(panel: Rect, mode: Mode) -> HitGrid {
    let rows = match mode {
        Mode::Single | Mode::Range => 6,
        Mode::WeeklySchedule => 1,
        Mode::MonthlySchedule => 5,
    };
    HitGrid {
        x: panel.x,
        y: panel.y + HEADER_LINES,
        cell_w: DAY_WIDTH,
        cell_h: 1,
        cols: GRID_COLS,
        rows,
    }
}

fn render_calendar<F: DateFilter>(canvas: &mut Canvas<'_>, state: &PickerState<F>) -> u16 {
    let month = state.view().month;
    let title = format!(
        "{} {}",
        state.texts().month_name(month.month()),
        month.year()
    );
    canvas.title(&title);
    for (i, weekday) in weekday_row(state.options().first_weekday).iter().enumerate() {
        canvas.mvprint(
            1,
            u16::try_from(i).unwrap_or(0) * DAY_WIDTH + 1,
            state.texts().weekday_short_of(*weekday),
            WEEKDAY_STYLE,
        );
    }
    let show_outside = state.options().show_outside_days;
    for (i, cell) in state.grid().iter().enumerate() {
        let i = u16::try_from(i).unwrap_or(0);
        let (row, col) = (i / GRID_COLS, i % GRID_COLS);
        if !cell.in_month && !show_outside {
            continue;
        }
        let style = if cell.selected || cell.range_start || cell.range_end {
            SELECTED_STYLE
        } else if cell.in_range {
            IN_RANGE_STYLE
        } else if cell.disabled {
            DISABLED_STYLE
        } else if cell.today {
            TODAY_STYLE
        } else if !cell.in_month {
            OUTSIDE_STYLE
        } else {
            BASE_STYLE
        };
        canvas.cell(HEADER_LINES + row, col, cell.date.day(), cell.focused, style);
    }
    6
}

fn render_weekday_row<F: DateFilter>(canvas: &mut Canvas<'_>, state: &PickerState<F>) -> u16 {
    canvas.title(state.texts().label_weekly.as_str());
    let selection = state.selection();
    for (i, weekday) in weekday_row(state.options().first_weekday).iter().enumerate() {
        let selected = match selection {
            super::Selection::Weekly(set) => set.contains(weekday.index0()),
            _ => false,
        };
        let style = if selected { SELECTED_STYLE } else { BASE_STYLE };
        let focused = state.sched_focus() == weekday.index0();
        let name = state.texts().weekday_short_of(*weekday);
        let text = if focused {
            format!("[{name:^2}]")
        } else {
            format!(" {name:^2} ")
        };
        canvas.mvprint(
            HEADER_LINES,
            u16::try_from(i).unwrap_or(0) * DAY_WIDTH,
            &text,
            style,
        );
    }
    1
}

fn render_day_numbers<F: DateFilter>(canvas: &mut Canvas<'_>, state: &PickerState<F>) -> u16 {
    canvas.title(state.texts().label_monthly.as_str());
    let days = match state.selection() {
        super::Selection::Monthly(set) => *set,
        _ => Default::default(),
    };
    for cell in day_number_list(&days) {
        let i = u16::from(cell.day - 1);
        let (row, col) = (i / GRID_COLS, i % GRID_COLS);
        let style = if cell.selected { SELECTED_STYLE } else { BASE_STYLE };
        canvas.cell(
            HEADER_LINES + row,
            col,
            cell.day,
            state.sched_focus() == cell.day,
            style,
        );
    }
    5
}

fn render_time_panel<F: DateFilter>(
    canvas: &mut Canvas<'_>,
    state: &PickerState<F>,
    clock: Option<TimeOfDay>,
    y: u16,
) {
    let hour12 = state.options().hour12;
    let cursor = state.time_cursor();
    let panel = state.time_panel();
    let endpoints: &[Endpoint] = match panel {
        TimePanel::Single(_) => &[Endpoint::Start],
        TimePanel::Pair { .. } => &[Endpoint::Start, Endpoint::End],
    };
    let mut x = 1;
    for (i, &endpoint) in endpoints.iter().enumerate() {
        if i > 0 {
            canvas.mvprint(y, x, "..", HINT_STYLE);
            x += 4;
        }
        let value = panel.get(endpoint);
        let segment = |field: TimeField| -> Style {
            match cursor {
                Some(c) if c.endpoint == endpoint && c.field == field => {
                    time_row::ACTIVE_SEGMENT_STYLE
                }
                _ => time_row::SEGMENT_STYLE,
            }
        };
        let hour = if hour12 { value.display_hour() } else { value.hour };
        canvas.mvprint(y, x, &format!("{hour:02}"), segment(TimeField::Hour));
        x += 2;
        canvas.mvprint(y, x, ":", time_row::SEGMENT_STYLE);
        x += 1;
        canvas.mvprint(y, x, &format!("{:02}", value.minute), segment(TimeField::Minute));
        x += 2;
        if hour12 {
            x += 1;
            canvas.mvprint(y, x, value.meridiem().as_str(), segment(TimeField::Meridiem));
            x += 2;
        }
    }
    if let Some(now) = clock {
        let angles = HandAngles::at(now);
        let text = format!("{} {:02}:{:02}", angles.glyph(), now.hour, now.minute);
        let x = GRID_WIDTH.saturating_sub(u16::try_from(text.chars().count()).unwrap_or(0) + 1);
        canvas.mvprint(y, x, &text, HINT_STYLE);
    }
}

fn render_hints<F: DateFilter>(canvas: &mut Canvas<'_>, state: &PickerState<F>, y: u16) {
    let texts = state.texts();
    let mut hint = format!("t {}  c {}", texts.label_today, texts.label_clear);
    if state.options().confirm {
        hint.push_str(&format!("  d {}", texts.label_done));
    }
    hint.push_str("  ? help");
    canvas.mvprint(y, 0, &hint, HINT_STYLE);
}

// Buffer access helper in panel-local coordinates, truncating at the
// panel edge.
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> Canvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Canvas<'a> {
        Canvas { area, buf }
    }

    fn title(&mut self, text: &str) {
        let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        let x = self.area.width.saturating_sub(width) / 2;
        self.mvprint(0, 0, "\u{2039}", HINT_STYLE);
        self.mvprint(0, x, text, HEADER_STYLE);
        self.mvprint(0, self.area.width.saturating_sub(1), "\u{203A}", HINT_STYLE);
    }

    fn cell(&mut self, y: u16, col: u16, day: u8, focused: bool, style: Style) {
        let text = if focused {
            format!("[{day:>2}]")
        } else {
            format!(" {day:>2} ")
        };
        self.mvprint(y, col * DAY_WIDTH, &text, style);
    }

    fn mvprint(&mut self, y: u16, x: u16, s: &str, style: Style) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.to_owned(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }
}
