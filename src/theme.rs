use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const FIELD_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const FIELD_EDIT_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Gray);

pub(crate) const HEADER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const TODAY_STYLE: Style = Style::new()
    .fg(Color::LightYellow)
    .bg(Color::Black)
    .add_modifier(Modifier::BOLD);

pub(crate) const SELECTED_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::LightBlue)
    .add_modifier(Modifier::BOLD);

pub(crate) const IN_RANGE_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Blue);

pub(crate) const OUTSIDE_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const DISABLED_STYLE: Style = BASE_STYLE
    .fg(Color::DarkGray)
    .add_modifier(Modifier::CROSSED_OUT);

pub(crate) const HINT_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) mod time_row {
    use super::*;

    pub(crate) const SEGMENT_STYLE: Style = BASE_STYLE;

    pub(crate) const ACTIVE_SEGMENT_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
