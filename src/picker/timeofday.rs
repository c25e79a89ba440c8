use super::dateutil::clamp_minute_to_step;
use time::Date;

/// Wall-clock time of day.  The canonical representation is always
/// 24-hour; the 12-hour projection exists only at the display/input edge.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct TimeOfDay {
    pub(crate) hour: u8,
    pub(crate) minute: u8,
}

impl TimeOfDay {
    pub(crate) fn new(hour: u8, minute: u8) -> TimeOfDay {
        TimeOfDay {
            hour: hour % 24,
            minute: minute % 60,
        }
    }

    pub(crate) fn snapped(self, step: u8) -> TimeOfDay {
        TimeOfDay {
            minute: clamp_minute_to_step(self.minute, step),
            ..self
        }
    }

    /// Hour as shown on a 12-hour clock face: 1–12.
    pub(crate) fn display_hour(self) -> u8 {
        match self.hour % 12 {
            0 => 12,
            h => h,
        }
    }

    pub(crate) fn meridiem(self) -> Meridiem {
        if self.hour >= 12 {
            Meridiem::Pm
        } else {
            Meridiem::Am
        }
    }

    /// Reconstructs the canonical 24-hour value from a displayed
    /// (hour, meridiem) pair: 12 AM is 0, 12 PM is 12.
    pub(crate) fn from_display(display_hour: u8, minute: u8, meridiem: Meridiem) -> TimeOfDay {
        let base = display_hour % 12;
        let hour = match meridiem {
            Meridiem::Am => base,
            Meridiem::Pm => base + 12,
        };
        TimeOfDay::new(hour, minute)
    }

    pub(crate) fn with_meridiem(self, meridiem: Meridiem) -> TimeOfDay {
        TimeOfDay::from_display(self.display_hour(), self.minute, meridiem)
    }

    pub(crate) fn add_hours(self, delta: i16) -> TimeOfDay {
        let hour = (i16::from(self.hour) + delta).rem_euclid(24);
        TimeOfDay {
            hour: u8::try_from(hour).unwrap_or(0),
            ..self
        }
    }

    /// Steps the minute up or down by one snap interval, wrapping within
    /// the hour.  A zero step moves by single minutes.
    pub(crate) fn add_minutes(self, delta: i16, step: u8) -> TimeOfDay {
        let unit = i16::from(step.max(1));
        let minute = (i16::from(self.minute) + delta * unit).rem_euclid(60);
        TimeOfDay {
            minute: u8::try_from(minute).unwrap_or(0),
            ..self
        }
        .snapped(step)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        }
    }

    pub(crate) fn toggled(self) -> Meridiem {
        match self {
            Meridiem::Am => Meridiem::Pm,
            Meridiem::Pm => Meridiem::Am,
        }
    }
}

/// A calendar date plus time of day, compared date-first.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct DateTime {
    pub(crate) date: Date,
    pub(crate) time: TimeOfDay,
}

impl DateTime {
    pub(crate) fn new(date: Date, time: TimeOfDay) -> DateTime {
        DateTime { date, time }
    }

    pub(crate) fn at_midnight(date: Date) -> DateTime {
        DateTime {
            date,
            time: TimeOfDay::default(),
        }
    }
}

/// The time-of-day sub-model: one pair outside range mode, independent
/// start/end pairs inside it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TimePanel {
    Single(TimeOfDay),
    Pair { start: TimeOfDay, end: TimeOfDay },
}

impl TimePanel {
    pub(crate) fn for_range(ranged: bool) -> TimePanel {
        if ranged {
            TimePanel::Pair {
                start: TimeOfDay::default(),
                end: TimeOfDay::default(),
            }
        } else {
            TimePanel::Single(TimeOfDay::default())
        }
    }

    pub(crate) fn is_paired(&self) -> bool {
        matches!(self, TimePanel::Pair { .. })
    }

    pub(crate) fn get(&self, endpoint: Endpoint) -> TimeOfDay {
        match (self, endpoint) {
            (TimePanel::Single(t), _) => *t,
            (TimePanel::Pair { start, .. }, Endpoint::Start) => *start,
            (TimePanel::Pair { end, .. }, Endpoint::End) => *end,
        }
    }

    pub(crate) fn set(&mut self, endpoint: Endpoint, value: TimeOfDay) {
        match (self, endpoint) {
            (TimePanel::Single(t), _) => *t = value,
            (TimePanel::Pair { start, .. }, Endpoint::Start) => *start = value,
            (TimePanel::Pair { end, .. }, Endpoint::End) => *end = value,
        }
    }

    /// Re-snaps every held minute value; called when the step changes.
    pub(crate) fn resnap(&mut self, step: u8) {
        match self {
            TimePanel::Single(t) => *t = t.snapped(step),
            TimePanel::Pair { start, end } => {
                *start = start.snapped(step);
                *end = end.snapped(step);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Endpoint {
    Start,
    End,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TimeField {
    Hour,
    Minute,
    Meridiem,
}

/// Which time segment keyboard edits currently address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct TimeCursor {
    pub(crate) endpoint: Endpoint,
    pub(crate) field: TimeField,
}

impl TimeCursor {
    pub(crate) fn new() -> TimeCursor {
        TimeCursor {
            endpoint: Endpoint::Start,
            field: TimeField::Hour,
        }
    }

    pub(crate) fn cycle(&mut self, hour12: bool, paired: bool) {
        self.field = match self.field {
            TimeField::Hour => TimeField::Minute,
            TimeField::Minute if hour12 => TimeField::Meridiem,
            TimeField::Minute | TimeField::Meridiem => {
                if paired {
                    self.endpoint = match self.endpoint {
                        Endpoint::Start => Endpoint::End,
                        Endpoint::End => Endpoint::Start,
                    };
                }
                TimeField::Hour
            }
        };
    }
}
