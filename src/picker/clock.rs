use super::timeofday::TimeOfDay;
use std::time::{Duration, Instant};
use time::OffsetDateTime;

const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

// One glyph per clock-face hour, U+1F550 onwards
static FACES: [char; 12] = [
    '\u{1F55B}', '\u{1F550}', '\u{1F551}', '\u{1F552}', '\u{1F553}', '\u{1F554}', '\u{1F555}',
    '\u{1F556}', '\u{1F557}', '\u{1F558}', '\u{1F559}', '\u{1F55A}',
];

/// Analog clock hand positions, in degrees clockwise from 12 o'clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct HandAngles {
    pub(crate) hour: f32,
    pub(crate) minute: f32,
}

impl HandAngles {
    pub(crate) fn at(time: TimeOfDay) -> HandAngles {
        HandAngles {
            hour: f32::from(time.hour % 12) * 30.0 + f32::from(time.minute) * 0.5,
            minute: f32::from(time.minute) * 6.0,
        }
    }

    /// The clock-face glyph nearest the hour hand.
    pub(crate) fn glyph(&self) -> char {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = ((self.hour / 30.0).round() as usize) % 12;
        FACES[index]
    }
}

pub(crate) fn now_time() -> TimeOfDay {
    let now = OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .time();
    TimeOfDay::new(now.hour(), now.minute())
}

/// Low-frequency redraw pacing for the clock display.  Mutates no picker
/// state; it only answers "is a refresh due".  Starting while running and
/// stopping while stopped are both safe no-ops.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ClockTicker {
    last_tick: Option<Instant>,
}

impl ClockTicker {
    pub(crate) fn new() -> ClockTicker {
        ClockTicker { last_tick: None }
    }

    pub(crate) fn start(&mut self, now: Instant) {
        if self.last_tick.is_none() {
            self.last_tick = Some(now);
        }
    }

    pub(crate) fn stop(&mut self) {
        self.last_tick = None;
    }

    pub(crate) fn is_running(&self) -> bool {
        self.last_tick.is_some()
    }

    /// True when the interval has elapsed; advances the tick when it has.
    pub(crate) fn due(&mut self, now: Instant) -> bool {
        match self.last_tick {
            Some(last) if now.duration_since(last) >= REFRESH_INTERVAL => {
                self.last_tick = Some(now);
                true
            }
            _ => false,
        }
    }

    /// How long the event loop may sleep before the next refresh.
    pub(crate) fn timeout(&self, now: Instant) -> Option<Duration> {
        self.last_tick.map(|last| {
            REFRESH_INTERVAL.saturating_sub(now.duration_since(last))
        })
    }
}
