use super::timeofday::{DateTime, Meridiem, TimeOfDay};
use time::{Date, Month};

/// A compiled field pattern.  Tokens `yyyy`, `MM`, `dd`, `HH`, `hh`, `mm`
/// are matched longest-first; `a` is a meridiem marker only at word
/// boundaries; every other character is a literal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Pattern {
    tokens: Vec<Token>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Token {
    Year,
    Month,
    Day,
    Hour24,
    Hour12,
    Minute,
    Meridiem,
    Literal(char),
}

impl Token {
    fn is_time(self) -> bool {
        matches!(
            self,
            Token::Hour24 | Token::Hour12 | Token::Minute | Token::Meridiem
        )
    }
}

impl Pattern {
    pub(crate) fn compile(text: &str) -> Pattern {
        let chars = text.chars().collect::<Vec<_>>();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let (token, len) = match &chars[i..] {
                ['y', 'y', 'y', 'y', ..] => (Token::Year, 4),
                ['M', 'M', ..] => (Token::Month, 2),
                ['d', 'd', ..] => (Token::Day, 2),
                ['H', 'H', ..] => (Token::Hour24, 2),
                ['h', 'h', ..] => (Token::Hour12, 2),
                ['m', 'm', ..] => (Token::Minute, 2),
                ['a', ..] if word_boundary(&chars, i) => (Token::Meridiem, 1),
                [c, ..] => (Token::Literal(*c), 1),
                [] => break,
            };
            tokens.push(token);
            i += len;
        }
        Pattern { tokens }
    }

    pub(crate) fn has_time(&self) -> bool {
        self.tokens.iter().any(|t| t.is_time())
    }

    pub(crate) fn format(&self, value: DateTime) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Year => out.push_str(&format!("{:04}", value.date.year())),
                Token::Month => out.push_str(&format!("{:02}", u8::from(value.date.month()))),
                Token::Day => out.push_str(&format!("{:02}", value.date.day())),
                Token::Hour24 => out.push_str(&format!("{:02}", value.time.hour)),
                Token::Hour12 => out.push_str(&format!("{:02}", value.time.display_hour())),
                Token::Minute => out.push_str(&format!("{:02}", value.time.minute)),
                Token::Meridiem => out.push_str(value.time.meridiem().as_str()),
                Token::Literal(c) => out.push(*c),
            }
        }
        out
    }

    /// Anchored full-string match.  Non-conforming text is a normal "no
    /// value" outcome, never an error.
    pub(crate) fn parse(&self, text: &str) -> Option<DateTime> {
        let chars = text.chars().collect::<Vec<_>>();
        let mut pos = 0;
        let mut fields = Fields::default();
        for token in &self.tokens {
            match token {
                Token::Year => fields.year = Some(take_number(&chars, &mut pos, 4)?),
                Token::Month => fields.month = Some(take_small(&chars, &mut pos)?),
                Token::Day => fields.day = Some(take_small(&chars, &mut pos)?),
                Token::Hour24 => fields.hour24 = Some(take_small(&chars, &mut pos)?),
                Token::Hour12 => fields.hour12 = Some(take_small(&chars, &mut pos)?),
                Token::Minute => fields.minute = Some(take_small(&chars, &mut pos)?),
                Token::Meridiem => fields.meridiem = Some(take_meridiem(&chars, &mut pos)?),
                Token::Literal(c) => {
                    if chars.get(pos) != Some(c) {
                        return None;
                    }
                    pos += 1;
                }
            }
        }
        if pos != chars.len() {
            return None;
        }
        fields.into_value()
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct Fields {
    year: Option<i32>,
    month: Option<u8>,
    day: Option<u8>,
    hour24: Option<u8>,
    hour12: Option<u8>,
    minute: Option<u8>,
    meridiem: Option<Meridiem>,
}

impl Fields {
    fn into_value(self) -> Option<DateTime> {
        let month = Month::try_from(self.month?).ok()?;
        let date = Date::from_calendar_date(self.year?, month, self.day?).ok()?;
        let hour = match (self.hour24, self.hour12) {
            (Some(h), _) => (h <= 23).then_some(h)?,
            (None, Some(h)) => {
                if !(1..=12).contains(&h) {
                    return None;
                }
                // 12 AM is midnight, 12 PM is noon; missing meridiem reads
                // as AM.
                match self.meridiem.unwrap_or(Meridiem::Am) {
                    Meridiem::Am => h % 12,
                    Meridiem::Pm => h % 12 + 12,
                }
            }
            (None, None) => 0,
        };
        let minute = self.minute.unwrap_or(0);
        if minute > 59 {
            return None;
        }
        Some(DateTime::new(date, TimeOfDay::new(hour, minute)))
    }
}

// `a` is only a meridiem token when not glued to other letters or digits,
// so "May" and "at" keep their literal meaning.
fn word_boundary(chars: &[char], i: usize) -> bool {
    let before = i == 0 || !chars[i - 1].is_ascii_alphanumeric();
    let after = i + 1 >= chars.len() || !chars[i + 1].is_ascii_alphanumeric();
    before && after
}

fn take_number(chars: &[char], pos: &mut usize, max_digits: usize) -> Option<i32> {
    let mut value = 0i32;
    let mut taken = 0;
    while taken < max_digits {
        let Some(d) = chars.get(*pos).and_then(|c| c.to_digit(10)) else {
            break;
        };
        value = value.checked_mul(10)?.checked_add(i32::try_from(d).ok()?)?;
        *pos += 1;
        taken += 1;
    }
    (taken > 0).then_some(value)
}

fn take_small(chars: &[char], pos: &mut usize) -> Option<u8> {
    take_number(chars, pos, 2).and_then(|n| u8::try_from(n).ok())
}

fn take_meridiem(chars: &[char], pos: &mut usize) -> Option<Meridiem> {
    let first = chars.get(*pos)?.to_ascii_lowercase();
    let second = chars.get(*pos + 1)?.to_ascii_lowercase();
    if second != 'm' {
        return None;
    }
    let meridiem = match first {
        'a' => Meridiem::Am,
        'p' => Meridiem::Pm,
        _ => return None,
    };
    *pos += 2;
    Some(meridiem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn dt(date: Date, hour: u8, minute: u8) -> DateTime {
        DateTime::new(date, TimeOfDay::new(hour, minute))
    }

    #[test]
    fn test_format_date_only() {
        let pattern = Pattern::compile("yyyy-MM-dd");
        assert_eq!(
            pattern.format(dt(date!(2024 - 03 - 15), 0, 0)),
            "2024-03-15"
        );
        assert_eq!(pattern.format(dt(date!(0987 - 01 - 05), 0, 0)), "0987-01-05");
    }

    #[test]
    fn test_format_24h() {
        let pattern = Pattern::compile("yyyy-MM-dd HH:mm");
        assert_eq!(
            pattern.format(dt(date!(2024 - 03 - 15), 9, 5)),
            "2024-03-15 09:05"
        );
        assert_eq!(
            pattern.format(dt(date!(2024 - 03 - 15), 23, 59)),
            "2024-03-15 23:59"
        );
    }

    #[test]
    fn test_format_12h() {
        let pattern = Pattern::compile("hh:mm a");
        assert_eq!(pattern.format(dt(date!(2024 - 01 - 01), 0, 0)), "12:00 AM");
        assert_eq!(pattern.format(dt(date!(2024 - 01 - 01), 12, 0)), "12:00 PM");
        assert_eq!(pattern.format(dt(date!(2024 - 01 - 01), 15, 30)), "03:30 PM");
        assert_eq!(pattern.format(dt(date!(2024 - 01 - 01), 11, 59)), "11:59 AM");
    }

    #[test]
    fn test_unrecognized_chars_pass_through() {
        let pattern = Pattern::compile("dd/MM/yyyy!");
        assert_eq!(
            pattern.format(dt(date!(2024 - 03 - 05), 0, 0)),
            "05/03/2024!"
        );
    }

    #[test]
    fn test_meridiem_word_boundary() {
        // "a" glued to letters stays literal; the lone "a" is the token
        let pattern = Pattern::compile("dd at a");
        assert_eq!(pattern.format(dt(date!(2024 - 03 - 05), 13, 0)), "05 at PM");
    }

    #[test]
    fn test_parse_date_only() {
        let pattern = Pattern::compile("yyyy-MM-dd");
        assert_eq!(
            pattern.parse("2024-03-15"),
            Some(dt(date!(2024 - 03 - 15), 0, 0))
        );
        // Unpadded hand-typed values parse too
        assert_eq!(
            pattern.parse("2024-3-5"),
            Some(dt(date!(2024 - 03 - 05), 0, 0))
        );
    }

    #[test]
    fn test_parse_rejects_nonconforming() {
        let pattern = Pattern::compile("yyyy-MM-dd");
        assert_eq!(pattern.parse(""), None);
        assert_eq!(pattern.parse("2024-03"), None);
        assert_eq!(pattern.parse("2024-03-15x"), None);
        assert_eq!(pattern.parse("2024/03/15"), None);
        assert_eq!(pattern.parse("2024-13-01"), None);
        assert_eq!(pattern.parse("2024-02-30"), None);
        assert_eq!(pattern.parse("not a date"), None);
    }

    #[test]
    fn test_parse_24h() {
        let pattern = Pattern::compile("yyyy-MM-dd HH:mm");
        assert_eq!(
            pattern.parse("2024-03-15 23:59"),
            Some(dt(date!(2024 - 03 - 15), 23, 59))
        );
        assert_eq!(pattern.parse("2024-03-15 24:00"), None);
        assert_eq!(pattern.parse("2024-03-15 12:60"), None);
    }

    #[test]
    fn test_parse_12h() {
        let pattern = Pattern::compile("yyyy-MM-dd hh:mm a");
        assert_eq!(
            pattern.parse("2024-03-15 12:00 AM"),
            Some(dt(date!(2024 - 03 - 15), 0, 0))
        );
        assert_eq!(
            pattern.parse("2024-03-15 12:00 PM"),
            Some(dt(date!(2024 - 03 - 15), 12, 0))
        );
        assert_eq!(
            pattern.parse("2024-03-15 03:30 pm"),
            Some(dt(date!(2024 - 03 - 15), 15, 30))
        );
        assert_eq!(pattern.parse("2024-03-15 00:30 PM"), None);
        assert_eq!(pattern.parse("2024-03-15 13:30 PM"), None);
    }

    #[test]
    fn test_round_trip() {
        let patterns = [
            "yyyy-MM-dd",
            "dd/MM/yyyy",
            "MM.dd.yyyy",
            "yyyy-MM-dd HH:mm",
            "yyyy-MM-dd hh:mm a",
        ];
        let samples = [
            dt(date!(2024 - 03 - 15), 0, 0),
            dt(date!(2024 - 12 - 31), 23, 45),
            dt(date!(2025 - 01 - 01), 12, 0),
            dt(date!(1999 - 06 - 07), 1, 5),
        ];
        for p in patterns {
            let pattern = Pattern::compile(p);
            for sample in samples {
                let text = pattern.format(sample);
                let parsed = pattern.parse(&text).unwrap();
                assert_eq!(parsed.date, sample.date, "{p} / {text}");
                if pattern.has_time() {
                    assert_eq!(parsed.time, sample.time, "{p} / {text}");
                }
            }
        }
    }

    #[test]
    fn test_has_time() {
        assert!(!Pattern::compile("yyyy-MM-dd").has_time());
        assert!(Pattern::compile("yyyy-MM-dd HH:mm").has_time());
        assert!(Pattern::compile("hh a").has_time());
    }
}
