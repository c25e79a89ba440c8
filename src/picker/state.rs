use super::dateutil::{
    add_days, add_months, end_of_week, start_of_month, start_of_week,
    weekday_from_display_number, weekday_from_index0, Bounds, OutOfTimeError, WeekdayExt,
};
use super::grid::{month_grid, Cell};
use super::locale::Locale;
use super::pattern::Pattern;
use super::selection::{parse_range_text, parse_schedule_text, RangePhase, Selection};
use super::timeofday::{DateTime, Endpoint, TimeCursor, TimeField, TimePanel};
use super::DateFilter;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use time::{Date, Weekday};
use tracing::{debug, trace, warn};

/// The four mutually exclusive interaction modes, fixed at construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Mode {
    Single,
    Range,
    WeeklySchedule,
    MonthlySchedule,
}

impl Mode {
    pub(crate) fn is_schedule(self) -> bool {
        matches!(self, Mode::WeeklySchedule | Mode::MonthlySchedule)
    }

    pub(crate) fn is_calendar(self) -> bool {
        matches!(self, Mode::Single | Mode::Range)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PickerOptions {
    pub(crate) mode: Mode,
    pub(crate) pattern: String,
    pub(crate) separator: String,
    pub(crate) first_weekday: Weekday,
    pub(crate) enable_time: bool,
    pub(crate) hour12: bool,
    pub(crate) step: u8,
    pub(crate) confirm: bool,
    pub(crate) multi_select: bool,
    pub(crate) show_outside_days: bool,
    pub(crate) inline: bool,
    pub(crate) auto_close: bool,
    pub(crate) open_on_focus: bool,
}

impl Default for PickerOptions {
    fn default() -> PickerOptions {
        PickerOptions {
            mode: Mode::Single,
            pattern: "yyyy-MM-dd".into(),
            separator: " - ".into(),
            first_weekday: Weekday::Sunday,
            enable_time: false,
            hour12: false,
            step: 1,
            confirm: false,
            multi_select: true,
            show_outside_days: true,
            inline: false,
            auto_close: true,
            open_on_focus: false,
        }
    }
}

impl PickerOptions {
    // Schedule modes select weekdays or day numbers, never instants, so
    // the time features are force-disabled there.
    fn normalized(mut self) -> PickerOptions {
        if self.mode.is_schedule() {
            self.enable_time = false;
            self.hour12 = false;
        }
        self
    }
}

/// The displayed month (day pinned to 1) and the keyboard focus, both
/// independent of the selection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ViewState {
    pub(crate) month: Date,
    pub(crate) focused: Option<Date>,
}

/// Structured form of the committed selection, as handed to callbacks and
/// the bulk getters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum PickerValue {
    Single(DateTime),
    Range {
        start: Option<DateTime>,
        end: Option<DateTime>,
    },
    /// Sorted display numbers, 1 = Monday .. 7 = Sunday
    Weekly(Vec<u8>),
    /// Sorted day numbers 1–31
    Monthly(Vec<u8>),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Source {
    User,
    Api,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ChangeContext {
    pub(crate) text: String,
    pub(crate) source: Source,
}

type ChangeFn = dyn FnMut(Option<&PickerValue>, &ChangeContext);

#[derive(Default)]
struct Observer(Option<Box<ChangeFn>>);

impl Observer {
    fn notify(&mut self, value: Option<&PickerValue>, ctx: &ChangeContext) {
        if let Some(callback) = self.0.as_mut() {
            // A panicking consumer must not poison picker state
            if catch_unwind(AssertUnwindSafe(|| callback(value, ctx))).is_err() {
                warn!("change callback panicked; ignored");
            }
        }
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0.is_some() {
            "Observer(set)"
        } else {
            "Observer(none)"
        })
    }
}

/// Pixel-space geometry of the rendered grid, written back by the widget
/// so pointer events can be resolved to cells.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct HitGrid {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) cell_w: u16,
    pub(crate) cell_h: u16,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum HitTarget {
    Day(Date),
    Weekday(u8),
    MonthDay(u8),
}

/// Owner of the selection truth.  Every mutation funnels through the
/// named operations below; the grid builder and the widget only read.
#[derive(Debug)]
pub(crate) struct PickerState<F> {
    options: PickerOptions,
    pattern: Pattern,
    locale: Locale,
    bounds: Bounds,
    filter: F,
    selection: Selection,
    view: ViewState,
    times: TimePanel,
    time_cursor: Option<TimeCursor>,
    sched_focus: u8,
    field: String,
    pending: Option<Source>,
    today: Date,
    observer: Observer,
    hit: Option<HitGrid>,
}

impl<F: DateFilter> PickerState<F> {
    pub(crate) fn new(options: PickerOptions, filter: F, today: Date) -> PickerState<F> {
        let options = options.normalized();
        let pattern = Pattern::compile(&options.pattern);
        let selection = match options.mode {
            Mode::Single => Selection::Single(None),
            Mode::Range => Selection::Range(Default::default()),
            Mode::WeeklySchedule => Selection::Weekly(Default::default()),
            Mode::MonthlySchedule => Selection::Monthly(Default::default()),
        };
        let times = TimePanel::for_range(options.mode == Mode::Range);
        let time_cursor = options.enable_time.then(TimeCursor::new);
        let sched_focus = match options.mode {
            Mode::MonthlySchedule => 1,
            _ => 0,
        };
        PickerState {
            pattern,
            locale: Locale::default(),
            bounds: Bounds::default(),
            filter,
            selection,
            view: ViewState {
                month: start_of_month(today),
                focused: None,
            },
            times,
            time_cursor,
            sched_focus,
            field: String::new(),
            pending: None,
            today,
            observer: Observer::default(),
            hit: None,
            options,
        }
    }

    pub(crate) fn bounds(mut self, bounds: Bounds) -> PickerState<F> {
        self.bounds = bounds;
        self
    }

    pub(crate) fn locale(mut self, locale: Locale) -> PickerState<F> {
        self.locale = locale;
        self
    }

    /// Seeds the selection from initial field text without notifying; the
    /// field is rewritten in canonical form.
    pub(crate) fn initial_text(mut self, text: &str) -> PickerState<F> {
        self.apply_text(text);
        self.field = self.formatted();
        self
    }

    pub(crate) fn observe<C>(&mut self, callback: C)
    where
        C: FnMut(Option<&PickerValue>, &ChangeContext) + 'static,
    {
        self.observer = Observer(Some(Box::new(callback)));
    }

    pub(crate) fn options(&self) -> &PickerOptions {
        &self.options
    }

    pub(crate) fn texts(&self) -> &Locale {
        &self.locale
    }

    pub(crate) fn mode(&self) -> Mode {
        self.options.mode
    }

    pub(crate) fn field_text(&self) -> &str {
        &self.field
    }

    pub(crate) fn view(&self) -> ViewState {
        self.view
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub(crate) fn selection(&self) -> &Selection {
        &self.selection
    }

    pub(crate) fn time_panel(&self) -> TimePanel {
        self.times
    }

    pub(crate) fn time_cursor(&self) -> Option<TimeCursor> {
        self.time_cursor
    }

    pub(crate) fn sched_focus(&self) -> u8 {
        self.sched_focus
    }

    pub(crate) fn formatted(&self) -> String {
        self.selection
            .to_field_text(&self.pattern, &self.options.separator)
    }

    pub(crate) fn current_value(&self) -> Option<PickerValue> {
        if self.selection.is_empty() {
            return None;
        }
        Some(match &self.selection {
            Selection::Single(value) => PickerValue::Single((*value)?),
            Selection::Range(range) => PickerValue::Range {
                start: range.start,
                end: range.end,
            },
            Selection::Weekly(set) => PickerValue::Weekly(set.display_numbers()),
            Selection::Monthly(set) => PickerValue::Monthly(set.days()),
        })
    }

    /// Derives the 42 cells for the displayed month.
    pub(crate) fn grid(&self) -> Vec<Cell> {
        month_grid(
            self.view.month,
            self.today,
            self.view.focused,
            &self.selection,
            &self.bounds,
            &self.filter,
            self.options.first_weekday,
        )
    }

    fn date_allowed(&self, date: Date) -> bool {
        self.bounds.contains(date) && !self.filter.is_disabled(date)
    }

    // Confirm mode holds interactive changes in memory until an explicit
    // commit; everything else writes through immediately.
    fn changed(&mut self, source: Source) {
        if self.options.confirm && source == Source::User {
            self.pending = Some(source);
            trace!("change held for commit");
            return;
        }
        self.write_through(source);
    }

    fn write_through(&mut self, source: Source) {
        self.pending = None;
        self.field = self.formatted();
        let value = self.current_value();
        let ctx = ChangeContext {
            text: self.field.clone(),
            source,
        };
        debug!(text = %ctx.text, ?source, "selection committed");
        self.observer.notify(value.as_ref(), &ctx);
    }

    pub(crate) fn select_date(&mut self, date: Date, source: Source) -> bool {
        if self.options.mode != Mode::Single {
            return false;
        }
        if !self.date_allowed(date) {
            trace!(%date, "date rejected by bounds");
            return false;
        }
        let value = if self.options.enable_time {
            DateTime::new(date, self.times.get(Endpoint::Start))
        } else {
            DateTime::at_midnight(date)
        };
        self.selection = Selection::Single(Some(value));
        self.view.month = start_of_month(date);
        self.view.focused = Some(date);
        self.changed(source);
        true
    }

    /// Two-phase range protocol; returns true when the second click
    /// completed the range.
    pub(crate) fn handle_range_click(&mut self, date: Date) -> bool {
        if self.options.mode != Mode::Range || !self.date_allowed(date) {
            return false;
        }
        let start_time = self.times.get(Endpoint::Start);
        let end_time = self.times.get(Endpoint::End);
        let Selection::Range(range) = &mut self.selection else {
            return false;
        };
        let phase = range.click(date, start_time, end_time);
        self.view.month = start_of_month(date);
        self.view.focused = Some(date);
        match phase {
            RangePhase::Completed => {
                self.changed(Source::User);
                true
            }
            RangePhase::Started => false,
        }
    }

    /// Visual feedback only; meaningful while exactly one endpoint is
    /// pending.
    pub(crate) fn update_hover_preview(&mut self, date: Date) {
        if let Selection::Range(range) = &mut self.selection {
            if range.is_picking() {
                range.hover = Some(date);
            }
        }
    }

    pub(crate) fn clear_hover(&mut self) {
        if let Selection::Range(range) = &mut self.selection {
            range.hover = None;
        }
    }

    pub(crate) fn toggle_weekly_day(&mut self, index0: u8, source: Source) -> bool {
        let multi = self.options.multi_select;
        let Selection::Weekly(set) = &mut self.selection else {
            return false;
        };
        if index0 > 6 {
            return false;
        }
        set.toggle(index0, multi);
        self.changed(source);
        true
    }

    pub(crate) fn toggle_monthly_day(&mut self, day: u8, source: Source) -> bool {
        let multi = self.options.multi_select;
        let Selection::Monthly(set) = &mut self.selection else {
            return false;
        };
        if !(1..=31).contains(&day) {
            return false;
        }
        set.toggle(day, multi);
        self.changed(source);
        true
    }

    /// Resets the active mode's selection.  Always writes through, even
    /// under confirm.
    pub(crate) fn clear(&mut self, source: Source) {
        self.selection.reset();
        self.write_through(source);
    }

    /// Flushes the held change in confirm mode; a no-op otherwise.
    pub(crate) fn commit(&mut self) -> bool {
        if !self.options.confirm {
            return false;
        }
        let source = self.pending.take().unwrap_or(Source::User);
        self.write_through(source);
        true
    }

    /// The today button reuses the mode's own selection protocol on the
    /// resolved date.
    pub(crate) fn today_action(&mut self) -> bool {
        let today = self.today;
        self.view.month = start_of_month(today);
        if self.options.mode.is_calendar() {
            self.view.focused = Some(today);
        }
        match self.options.mode {
            Mode::Single => self.select_date(today, Source::User),
            Mode::Range => self.handle_range_click(today),
            _ => false,
        }
    }

    /// Bulk range setter; out-of-bounds endpoints drop to empty, ordering
    /// is normalized.
    pub(crate) fn set_range(
        &mut self,
        start: Option<DateTime>,
        end: Option<DateTime>,
        source: Source,
    ) -> bool {
        if self.options.mode != Mode::Range {
            return false;
        }
        let step = self.options.step;
        let admit = |value: Option<DateTime>, state: &Self| {
            value
                .filter(|dt| state.date_allowed(dt.date))
                .map(|dt| DateTime::new(dt.date, dt.time.snapped(step)))
        };
        let start = admit(start, self);
        let end = admit(end, self);
        let Selection::Range(range) = &mut self.selection else {
            return false;
        };
        range.set(start, end);
        if let Some(dt) = range.start {
            self.times.set(Endpoint::Start, dt.time);
            self.view.month = start_of_month(dt.date);
        }
        if let Some(dt) = self.range_end() {
            self.times.set(Endpoint::End, dt.time);
        }
        self.changed(source);
        true
    }

    /// Bulk schedule setter taking display numbers (weekly 1–7, monthly
    /// 1–31); invalid entries are dropped.
    pub(crate) fn set_schedule(&mut self, days: &[u8], source: Source) -> bool {
        let multi = self.options.multi_select;
        match &mut self.selection {
            Selection::Weekly(set) => {
                set.clear();
                for &number in days {
                    if let Some(weekday) = weekday_from_display_number(number) {
                        if !multi {
                            set.clear();
                        }
                        set.insert(weekday.index0());
                    }
                }
            }
            Selection::Monthly(set) => {
                set.clear();
                for &day in days {
                    if (1..=31).contains(&day) {
                        if !multi {
                            set.clear();
                        }
                        set.insert(day);
                    }
                }
            }
            _ => return false,
        }
        self.changed(source);
        true
    }

    pub(crate) fn get_single(&self) -> Option<DateTime> {
        match &self.selection {
            Selection::Single(value) => *value,
            _ => None,
        }
    }

    pub(crate) fn get_range(&self) -> (Option<DateTime>, Option<DateTime>) {
        match &self.selection {
            Selection::Range(range) => (range.start, range.end),
            _ => (None, None),
        }
    }

    fn range_end(&self) -> Option<DateTime> {
        match &self.selection {
            Selection::Range(range) => range.end,
            _ => None,
        }
    }

    /// Display numbers of the active schedule set.
    pub(crate) fn get_schedule(&self) -> Vec<u8> {
        match &self.selection {
            Selection::Weekly(set) => set.display_numbers(),
            Selection::Monthly(set) => set.days(),
            _ => Vec::new(),
        }
    }

    /// The text channel: parse, apply with the usual filtering, notify.
    pub(crate) fn set_text(&mut self, text: &str, source: Source) {
        self.apply_text(text);
        self.changed(source);
    }

    fn apply_text(&mut self, text: &str) {
        let step = self.options.step;
        match self.options.mode {
            Mode::Single => {
                let value = self
                    .pattern
                    .parse(text.trim())
                    .filter(|dt| self.date_allowed(dt.date))
                    .map(|dt| DateTime::new(dt.date, dt.time.snapped(step)));
                if let Some(dt) = value {
                    self.times.set(Endpoint::Start, dt.time);
                    self.view.month = start_of_month(dt.date);
                    self.view.focused = Some(dt.date);
                }
                self.selection = Selection::Single(value);
            }
            Mode::Range => {
                let (start, end) = parse_range_text(text, &self.pattern, &self.options.separator);
                let admit = |value: Option<DateTime>, state: &Self| {
                    value
                        .filter(|dt| state.date_allowed(dt.date))
                        .map(|dt| DateTime::new(dt.date, dt.time.snapped(step)))
                };
                let start = admit(start, self);
                let end = admit(end, self);
                if let Selection::Range(range) = &mut self.selection {
                    range.set(start, end);
                    if let Some(dt) = range.start {
                        self.view.month = start_of_month(dt.date);
                        self.view.focused = Some(dt.date);
                    }
                }
                if let Some(dt) = start {
                    self.times.set(Endpoint::Start, dt.time);
                }
                if let Some(dt) = end {
                    self.times.set(Endpoint::End, dt.time);
                }
            }
            Mode::WeeklySchedule => {
                let numbers = parse_schedule_text(text, "weekly", "monthly");
                let multi = self.options.multi_select;
                if let Selection::Weekly(set) = &mut self.selection {
                    set.clear();
                    for number in numbers {
                        if let Some(weekday) = weekday_from_display_number(number) {
                            if !multi {
                                set.clear();
                            }
                            set.insert(weekday.index0());
                        }
                    }
                }
            }
            Mode::MonthlySchedule => {
                let numbers = parse_schedule_text(text, "monthly", "weekly");
                let multi = self.options.multi_select;
                if let Selection::Monthly(set) = &mut self.selection {
                    set.clear();
                    for day in numbers {
                        if (1..=31).contains(&day) {
                            if !multi {
                                set.clear();
                            }
                            set.insert(day);
                        }
                    }
                }
            }
        }
    }

    // -- pagination ------------------------------------------------------

    pub(crate) fn page_months(&mut self, delta: i32) -> Result<(), OutOfTimeError> {
        let next = start_of_month(add_months(self.view.month, delta));
        if delta != 0 && next == self.view.month {
            return Err(OutOfTimeError);
        }
        self.view.month = next;
        Ok(())
    }

    pub(crate) fn page_years(&mut self, delta: i32) -> Result<(), OutOfTimeError> {
        self.page_months(delta * 12)
    }

    // -- keyboard navigation ---------------------------------------------

    /// The effective focus: the explicit one, else today when displayed,
    /// else the first of the displayed month.
    pub(crate) fn focus(&self) -> Date {
        self.view.focused.unwrap_or_else(|| {
            if start_of_month(self.today) == self.view.month {
                self.today
            } else {
                self.view.month
            }
        })
    }

    fn set_focus(&mut self, date: Date) {
        self.view.focused = Some(date);
        if start_of_month(date) != self.view.month {
            self.view.month = start_of_month(date);
        }
    }

    pub(crate) fn focus_move_days(&mut self, delta: i64) {
        if let Some(next) = add_days(self.focus(), delta) {
            self.set_focus(next);
        }
    }

    pub(crate) fn focus_week_start(&mut self) {
        self.set_focus(start_of_week(self.focus(), self.options.first_weekday));
    }

    pub(crate) fn focus_week_end(&mut self) {
        self.set_focus(end_of_week(self.focus(), self.options.first_weekday));
    }

    pub(crate) fn focus_move_months(&mut self, delta: i32) {
        self.set_focus(add_months(self.focus(), delta));
    }

    /// Wrapping focus motion over the weekday row / day-number list in
    /// schedule modes.
    pub(crate) fn sched_focus_move(&mut self, delta: i16) {
        match self.options.mode {
            Mode::WeeklySchedule => {
                let next = (i16::from(self.sched_focus) + delta).rem_euclid(7);
                self.sched_focus = u8::try_from(next).unwrap_or(0);
            }
            Mode::MonthlySchedule => {
                let next = (i16::from(self.sched_focus) - 1 + delta).rem_euclid(31) + 1;
                self.sched_focus = u8::try_from(next).unwrap_or(1);
            }
            _ => {}
        }
    }

    pub(crate) fn sched_focus_edge(&mut self, end: bool) {
        self.sched_focus = match (self.options.mode, end) {
            (Mode::WeeklySchedule, false) => 0,
            (Mode::WeeklySchedule, true) => 6,
            (Mode::MonthlySchedule, false) => 1,
            (Mode::MonthlySchedule, true) => 31,
            _ => return,
        };
    }

    /// Enter/Space: the mode-appropriate action on the focused target.
    pub(crate) fn activate_focused(&mut self) -> bool {
        match self.options.mode {
            Mode::Single => {
                let date = self.focus();
                self.select_date(date, Source::User)
            }
            Mode::Range => {
                let date = self.focus();
                self.handle_range_click(date)
            }
            Mode::WeeklySchedule => self.toggle_weekly_day(self.sched_focus, Source::User),
            Mode::MonthlySchedule => self.toggle_monthly_day(self.sched_focus, Source::User),
        }
    }

    /// Pointer activation resolved by the shell from hit-testing.
    pub(crate) fn activate(&mut self, target: HitTarget) -> bool {
        match target {
            HitTarget::Day(date) => match self.options.mode {
                Mode::Single => self.select_date(date, Source::User),
                Mode::Range => self.handle_range_click(date),
                _ => false,
            },
            HitTarget::Weekday(index0) => self.toggle_weekly_day(index0, Source::User),
            HitTarget::MonthDay(day) => self.toggle_monthly_day(day, Source::User),
        }
    }

    /// Whether the popover should close after a completing selection.
    pub(crate) fn close_after_pick(&self, completed: bool) -> bool {
        completed
            && self.options.auto_close
            && !self.options.confirm
            && !self.options.inline
            && !(self.options.mode == Mode::Single && self.options.enable_time)
    }

    // -- time-of-day -----------------------------------------------------

    pub(crate) fn time_cycle_field(&mut self) {
        let hour12 = self.options.hour12;
        let paired = self.times.is_paired();
        if let Some(cursor) = self.time_cursor.as_mut() {
            cursor.cycle(hour12, paired);
        }
    }

    /// Adjusts the segment under the time cursor; an edit on an existing
    /// endpoint behaves like a full re-selection.
    pub(crate) fn time_adjust(&mut self, delta: i16) -> bool {
        let Some(cursor) = self.time_cursor else {
            return false;
        };
        let current = self.times.get(cursor.endpoint);
        let next = match cursor.field {
            TimeField::Hour => current.add_hours(delta),
            TimeField::Minute => current.add_minutes(delta, self.options.step),
            TimeField::Meridiem => current.with_meridiem(current.meridiem().toggled()),
        };
        self.times.set(cursor.endpoint, next);
        self.merge_time(cursor.endpoint);
        true
    }

    /// Partial configuration update: a new step re-snaps held minutes
    /// immediately and merges into any existing endpoints.
    pub(crate) fn set_step(&mut self, step: u8) {
        self.options.step = step;
        self.times.resnap(step);
        let mut touched = self.sync_selection_time(Endpoint::Start);
        if self.times.is_paired() {
            touched |= self.sync_selection_time(Endpoint::End);
        }
        if touched {
            self.changed(Source::Api);
        }
    }

    fn merge_time(&mut self, endpoint: Endpoint) {
        if self.sync_selection_time(endpoint) {
            self.changed(Source::User);
        }
    }

    fn sync_selection_time(&mut self, endpoint: Endpoint) -> bool {
        let time = self.times.get(endpoint);
        match &mut self.selection {
            Selection::Single(Some(value)) if value.time != time => {
                value.time = time;
                true
            }
            Selection::Range(range) => {
                let slot = match endpoint {
                    Endpoint::Start => &mut range.start,
                    Endpoint::End => &mut range.end,
                };
                match slot {
                    Some(value) if value.time != time => {
                        value.time = time;
                        // Times may have crossed on a same-day range
                        if let (Some(start), Some(end)) = (range.start, range.end) {
                            if end < start {
                                range.start = Some(end);
                                range.end = Some(start);
                            }
                        }
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    // -- pointer hit-testing ---------------------------------------------

    pub(crate) fn set_hit_grid(&mut self, hit: Option<HitGrid>) {
        self.hit = hit;
    }

    /// Resolves terminal coordinates to the cell under them, if any.
    pub(crate) fn hit_test(&self, x: u16, y: u16) -> Option<HitTarget> {
        let hit = self.hit?;
        if x < hit.x || y < hit.y {
            return None;
        }
        let col = (x - hit.x) / hit.cell_w.max(1);
        let row = (y - hit.y) / hit.cell_h.max(1);
        if col >= hit.cols || row >= hit.rows {
            return None;
        }
        let index = usize::from(row * hit.cols + col);
        match self.options.mode {
            Mode::Single | Mode::Range => {
                let cells = self.grid();
                let cell = cells.get(index)?;
                if !cell.in_month && !self.options.show_outside_days {
                    return None;
                }
                Some(HitTarget::Day(cell.date))
            }
            Mode::WeeklySchedule => {
                let index0 =
                    (self.options.first_weekday.index0() + u8::try_from(index).ok()?) % 7;
                (index < 7).then_some(HitTarget::Weekday(index0))
            }
            Mode::MonthlySchedule => {
                let day = u8::try_from(index + 1).ok()?;
                (1..=31).contains(&day).then_some(HitTarget::MonthDay(day))
            }
        }
    }
}

// Re-exported so the widget can name the weekday order it draws
pub(crate) fn weekday_row(first_weekday: Weekday) -> [Weekday; 7] {
    let mut row = [first_weekday; 7];
    for (i, slot) in row.iter_mut().enumerate() {
        *slot = weekday_from_index0((first_weekday.index0() + u8::try_from(i).unwrap_or(0)) % 7);
    }
    row
}
