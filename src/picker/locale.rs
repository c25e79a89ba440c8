use serde::Deserialize;
use time::{Month, Weekday};

static MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// Sunday-first, matching the 0 = Sunday weekday indexing
static WEEKDAY_SHORT: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Injected display text.  Lists shorter than expected fall back to the
/// built-in English entries instead of erroring.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub(crate) struct Locale {
    pub(crate) month_names: Vec<String>,
    pub(crate) weekday_short: Vec<String>,
    pub(crate) label_today: String,
    pub(crate) label_clear: String,
    pub(crate) label_done: String,
    pub(crate) label_weekly: String,
    pub(crate) label_monthly: String,
    pub(crate) label_time: String,
}

impl Default for Locale {
    fn default() -> Locale {
        Locale {
            month_names: Vec::new(),
            weekday_short: Vec::new(),
            label_today: "today".into(),
            label_clear: "clear".into(),
            label_done: "done".into(),
            label_weekly: "pick weekdays".into(),
            label_monthly: "pick days of month".into(),
            label_time: "time".into(),
        }
    }
}

impl Locale {
    pub(crate) fn month_name(&self, month: Month) -> &str {
        let index = usize::from(u8::from(month)) - 1;
        match self.month_names.get(index) {
            Some(name) if !name.is_empty() => name,
            _ => MONTH_NAMES[index],
        }
    }

    /// Short weekday name by 0 = Sunday index.
    pub(crate) fn weekday_short(&self, index0: u8) -> &str {
        let index = usize::from(index0 % 7);
        match self.weekday_short.get(index) {
            Some(name) if !name.is_empty() => name,
            _ => WEEKDAY_SHORT[index],
        }
    }

    pub(crate) fn weekday_short_of(&self, weekday: Weekday) -> &str {
        self.weekday_short(weekday.number_days_from_sunday())
    }
}
