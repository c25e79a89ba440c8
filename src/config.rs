use crate::picker::{weekday_from_index0, Bounds, Locale, Mode, PickerOptions};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use time::{format_description::FormatItem, macros::format_description, Date};
use xdg::BaseDirectories;

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) log_level: String,
    pub(crate) log_file: String,
    pub(crate) format: String,
    pub(crate) separator: String,
    /// 0 = Sunday .. 6 = Saturday; out-of-range values fall back to 0
    pub(crate) first_day_of_week: u8,
    pub(crate) min_date: Option<String>,
    pub(crate) max_date: Option<String>,
    pub(crate) range: bool,
    /// "none", "weekly", or "monthly"
    pub(crate) schedule: String,
    pub(crate) enable_time: bool,
    pub(crate) confirm: bool,
    pub(crate) hour12: bool,
    pub(crate) show_outside_days: bool,
    pub(crate) inline: bool,
    pub(crate) auto_close: bool,
    pub(crate) open_on_focus: bool,
    pub(crate) multi_select: bool,
    pub(crate) step: u8,
    pub(crate) locale: Locale,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            log_file: "/dev/null".to_string(),
            format: "yyyy-MM-dd".to_string(),
            separator: " - ".to_string(),
            first_day_of_week: 0,
            min_date: None,
            max_date: None,
            range: false,
            schedule: "none".to_string(),
            enable_time: false,
            confirm: false,
            hour12: false,
            show_outside_days: true,
            inline: false,
            auto_close: true,
            open_on_focus: false,
            multi_select: true,
            step: 1,
            locale: Locale::default(),
        }
    }
}

impl Config {
    /// The interaction mode implied by the flags; schedule sub-modes win
    /// over range.
    pub(crate) fn mode(&self) -> Mode {
        match self.schedule.as_str() {
            "weekly" => Mode::WeeklySchedule,
            "monthly" => Mode::MonthlySchedule,
            _ if self.range => Mode::Range,
            _ => Mode::Single,
        }
    }

    pub(crate) fn picker_options(&self) -> PickerOptions {
        PickerOptions {
            mode: self.mode(),
            pattern: self.format.clone(),
            separator: self.separator.clone(),
            first_weekday: weekday_from_index0(if self.first_day_of_week < 7 {
                self.first_day_of_week
            } else {
                0
            }),
            enable_time: self.enable_time,
            hour12: self.hour12,
            step: self.step,
            confirm: self.confirm,
            multi_select: self.multi_select,
            show_outside_days: self.show_outside_days,
            inline: self.inline,
            auto_close: self.auto_close,
            open_on_focus: self.open_on_focus,
        }
    }

    /// Unparsable limits are ignored rather than raised.
    pub(crate) fn bounds(&self) -> Bounds {
        Bounds::new(parse_ymd(&self.min_date), parse_ymd(&self.max_date))
    }
}

fn parse_ymd(value: &Option<String>) -> Option<Date> {
    value
        .as_deref()
        .and_then(|text| Date::parse(text.trim(), &YMD_FMT).ok())
}

pub(crate) fn get_config_path() -> Option<PathBuf> {
    let pgm = env!("CARGO_PKG_NAME");
    let xdg_dirs = BaseDirectories::with_prefix(pgm);
    let config_home = xdg_dirs.get_config_home()?;
    Some(config_home.join("config.toml"))
}

pub(crate) fn read() -> Config {
    let config_path = match get_config_path() {
        Some(path) => path,
        None => return Config::default(),
    };

    if !config_path.exists() {
        return Config::default();
    }

    let content = match fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };

    toml::from_str(&content).unwrap_or_else(|_| Config::default())
}
