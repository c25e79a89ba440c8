use crate::help::Help;
use crate::picker::{now_time, ClockTicker, DateFilter, Mode, PickerState, PickerWidget, Source};
use crate::theme::{BASE_STYLE, FIELD_EDIT_STYLE, FIELD_STYLE, HINT_STYLE};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Terminal,
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    text::Span,
    widgets::{Paragraph, StatefulWidget, Widget},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Lines above the popover: margin, the bound field, a spacer
const FIELD_LINES: u16 = 3;

#[derive(Debug)]
pub(crate) struct App<F> {
    picker: PickerState<F>,
    ticker: ClockTicker,
    state: AppState,
}

impl<F: DateFilter> App<F> {
    pub(crate) fn new(mut picker: PickerState<F>) -> App<F> {
        let open = picker.options().inline || picker.options().open_on_focus;
        let timed = picker.options().enable_time;
        let mut ticker = ClockTicker::new();
        if open && timed {
            ticker.start(Instant::now());
        }
        if !open {
            picker.set_hit_grid(None);
        }
        App {
            picker,
            ticker,
            state: if open { AppState::Picker } else { AppState::Field },
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let now = Instant::now();
        let timeout = self
            .ticker
            .timeout(now)
            .unwrap_or(Duration::from_secs(3600));
        if !event::poll(timeout)? {
            // Nothing pending: redraw the clock if its interval elapsed
            self.ticker.due(Instant::now());
            return Ok(());
        }
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        let evt = event::read()?;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = evt.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        } else if let Event::Mouse(mouse) = evt {
            self.handle_mouse(mouse);
        }
        // else: Redraw on resize, and we might as well redraw on other
        // stuff too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Field => match key {
                KeyCode::Char('o') | KeyCode::Enter | KeyCode::Down => {
                    self.open_picker();
                    true
                }
                KeyCode::Char('i') => {
                    self.state = AppState::Editing(EditState {
                        buffer: self.picker.field_text().to_owned(),
                        back_to_picker: false,
                    });
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Picker => self.handle_picker_key(key),
            AppState::Editing(edit) => match key {
                KeyCode::Esc => {
                    let reopen = edit.back_to_picker;
                    self.state = if reopen {
                        AppState::Picker
                    } else {
                        AppState::Field
                    };
                    true
                }
                KeyCode::Enter => {
                    let text = edit.buffer.clone();
                    let reopen = edit.back_to_picker;
                    self.picker.set_text(&text, Source::User);
                    self.state = if reopen {
                        AppState::Picker
                    } else {
                        AppState::Field
                    };
                    true
                }
                KeyCode::Backspace | KeyCode::Delete => {
                    edit.buffer.pop();
                    true
                }
                KeyCode::Char(c) => {
                    edit.buffer.push(c);
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Picker;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn handle_picker_key(&mut self, key: KeyCode) -> bool {
        let mode = self.picker.mode();
        match key {
            KeyCode::Left => self.move_focus(-1),
            KeyCode::Right => self.move_focus(1),
            KeyCode::Up => self.move_focus_row(-1),
            KeyCode::Down => self.move_focus_row(1),
            KeyCode::Home => {
                if mode.is_calendar() {
                    self.picker.focus_week_start();
                } else {
                    self.picker.sched_focus_edge(false);
                }
                true
            }
            KeyCode::End => {
                if mode.is_calendar() {
                    self.picker.focus_week_end();
                } else {
                    self.picker.sched_focus_edge(true);
                }
                true
            }
            KeyCode::PageUp if mode.is_calendar() => {
                self.picker.focus_move_months(-1);
                true
            }
            KeyCode::PageDown if mode.is_calendar() => {
                self.picker.focus_move_months(1);
                true
            }
            KeyCode::Char('<') if mode.is_calendar() => self.picker.page_months(-1).is_ok(),
            KeyCode::Char('>') if mode.is_calendar() => self.picker.page_months(1).is_ok(),
            KeyCode::Char('{') if mode.is_calendar() => self.picker.page_years(-1).is_ok(),
            KeyCode::Char('}') if mode.is_calendar() => self.picker.page_years(1).is_ok(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let completed = self.picker.activate_focused();
                self.maybe_close(completed);
                true
            }
            KeyCode::Tab if self.picker.options().enable_time => {
                self.picker.time_cycle_field();
                true
            }
            KeyCode::Char('+') if self.picker.options().enable_time => {
                self.picker.time_adjust(1)
            }
            KeyCode::Char('-') if self.picker.options().enable_time => {
                self.picker.time_adjust(-1)
            }
            KeyCode::Char('t') => {
                let completed = self.picker.today_action();
                self.maybe_close(completed);
                true
            }
            KeyCode::Char('c') => {
                self.picker.clear(Source::User);
                true
            }
            KeyCode::Char('d') => {
                if self.picker.commit() {
                    self.close_picker();
                    true
                } else {
                    false
                }
            }
            KeyCode::Char('i') => {
                self.state = AppState::Editing(EditState {
                    buffer: self.picker.field_text().to_owned(),
                    back_to_picker: true,
                });
                true
            }
            KeyCode::Char('?') => {
                self.state = AppState::Helping;
                true
            }
            KeyCode::Esc => {
                self.picker.clear_hover();
                if self.picker.options().inline {
                    self.state = AppState::Quitting;
                } else {
                    self.close_picker();
                }
                true
            }
            KeyCode::Char('q') => {
                self.state = AppState::Quitting;
                true
            }
            _ => false,
        }
    }

    fn move_focus(&mut self, delta: i64) -> bool {
        if self.picker.mode().is_calendar() {
            self.picker.focus_move_days(delta);
        } else {
            self.picker.sched_focus_move(i16::try_from(delta).unwrap_or(0));
        }
        true
    }

    fn move_focus_row(&mut self, direction: i64) -> bool {
        match self.picker.mode() {
            Mode::Single | Mode::Range => {
                self.picker.focus_move_days(direction * 7);
                true
            }
            Mode::MonthlySchedule => {
                self.picker
                    .sched_focus_move(i16::try_from(direction * 7).unwrap_or(0));
                true
            }
            Mode::WeeklySchedule => false,
        }
    }

    fn handle_mouse(&mut self, mouse: event::MouseEvent) {
        if self.state != AppState::Picker {
            return;
        }
        match mouse.kind {
            event::MouseEventKind::Down(event::MouseButton::Left) => {
                if let Some(target) = self.picker.hit_test(mouse.column, mouse.row) {
                    let completed = self.picker.activate(target);
                    self.maybe_close(completed);
                }
            }
            event::MouseEventKind::Moved => {
                match self.picker.hit_test(mouse.column, mouse.row) {
                    Some(crate::picker::HitTarget::Day(date)) => {
                        self.picker.update_hover_preview(date);
                    }
                    // Pointer left the grid
                    _ => self.picker.clear_hover(),
                }
            }
            _ => {}
        }
    }

    fn maybe_close(&mut self, completed: bool) {
        if self.picker.close_after_pick(completed) {
            self.close_picker();
        }
    }

    fn open_picker(&mut self) {
        self.state = AppState::Picker;
        if self.picker.options().enable_time {
            self.ticker.start(Instant::now());
        }
    }

    fn close_picker(&mut self) {
        self.state = AppState::Field;
        self.picker.clear_hover();
        self.picker.set_hit_grid(None);
        self.ticker.stop();
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    #[cfg(test)]
    fn picker(&self) -> &PickerState<F> {
        &self.picker
    }

    #[cfg(test)]
    fn state(&self) -> &AppState {
        &self.state
    }
}

impl<F: DateFilter> Widget for &mut App<F> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let field_area = Rect {
            x: area.x + 1,
            y: area.y + 1,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        let (text, style) = match &self.state {
            AppState::Editing(edit) => (format!("{}_", edit.buffer), FIELD_EDIT_STYLE),
            _ => (self.picker.field_text().to_owned(), FIELD_STYLE),
        };
        Paragraph::new(Span::styled(format!("> {text}"), style)).render(field_area, buf);
        let body = Rect {
            x: area.x,
            y: area.y + FIELD_LINES,
            width: area.width,
            height: area.height.saturating_sub(FIELD_LINES),
        };
        let open = matches!(
            self.state,
            AppState::Picker | AppState::Helping | AppState::Editing(EditState { back_to_picker: true, .. })
        );
        if open {
            let clock = (self.picker.options().enable_time && self.ticker.is_running())
                .then(now_time);
            PickerWidget::new()
                .clock(clock)
                .render(body, buf, &mut self.picker);
        } else {
            Paragraph::new(Span::styled("o open  i edit  q quit", HINT_STYLE))
                .render(field_area.offset_y(2), buf);
        }
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

trait RectExt {
    fn offset_y(self, dy: u16) -> Rect;
}

impl RectExt for Rect {
    fn offset_y(self, dy: u16) -> Rect {
        Rect {
            y: self.y + dy,
            ..self
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Field,
    Picker,
    Editing(EditState),
    Helping,
    Quitting,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct EditState {
    buffer: String,
    back_to_picker: bool,
}
