use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};

/// Format of the display date and time joined by a space, e.g.
/// `March 15, 2024 6:00 PM`.
const DISPLAY_FORMAT: &str = "%B %d, %Y %I:%M %p";
const STARTED_LABEL: &str = "Event Started";

#[derive(Debug, thiserror::Error)]
pub enum CountdownError {
    #[error("cannot parse event start '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Parses the display strings an event is listed with into a local timestamp.
pub fn parse_event_start(date: &str, time: &str) -> Result<NaiveDateTime, CountdownError> {
    let input = format!("{} {}", date.trim(), time.trim());
    NaiveDateTime::parse_from_str(&input, DISPLAY_FORMAT)
        .map_err(|source| CountdownError::Parse { input, source })
}

/// Parses an ISO-style `YYYY-MM-DDTHH:MM:SS` local timestamp.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, CountdownError> {
    input
        .trim()
        .parse::<NaiveDateTime>()
        .map_err(|source| CountdownError::Parse {
            input: input.to_string(),
            source,
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining {
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    Started,
}

impl Countdown {
    pub fn until(target: NaiveDateTime, now: NaiveDateTime) -> Self {
        Self::from_remaining(target - now)
    }

    pub fn from_remaining(remaining: TimeDelta) -> Self {
        if remaining <= TimeDelta::zero() {
            return Countdown::Started;
        }
        let total = remaining.num_seconds();
        Countdown::Remaining {
            days: total / 86_400,
            hours: total % 86_400 / 3_600,
            minutes: total % 3_600 / 60,
            seconds: total % 60,
        }
    }

    pub fn has_started(&self) -> bool {
        matches!(self, Countdown::Started)
    }

    /// Days, hours, minutes and seconds padded to at least two digits.
    pub fn digits(&self) -> Option<[String; 4]> {
        match *self {
            Countdown::Remaining {
                days,
                hours,
                minutes,
                seconds,
            } => Some([
                format!("{days:02}"),
                format!("{hours:02}"),
                format!("{minutes:02}"),
                format!("{seconds:02}"),
            ]),
            Countdown::Started => None,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.digits() {
            Some([days, hours, minutes, seconds]) => {
                write!(f, "{days}d {hours}h {minutes}m {seconds}s")
            }
            None => f.write_str(STARTED_LABEL),
        }
    }
}

/// Every countdown on the page, recomputed together once per tick.
#[derive(Debug, Clone, Default)]
pub struct CountdownBoard {
    targets: Vec<(u32, NaiveDateTime)>,
    current: Vec<(u32, Countdown)>,
}

impl CountdownBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u32, target: NaiveDateTime) {
        match self.targets.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = target,
            None => self.targets.push((id, target)),
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn tick(&mut self, now: NaiveDateTime) -> &[(u32, Countdown)] {
        self.current = self
            .targets
            .iter()
            .map(|(id, target)| (*id, Countdown::until(*target, now)))
            .collect();
        tracing::trace!(entries = self.current.len(), "countdowns refreshed");
        &self.current
    }

    /// Value from the most recent tick.
    pub fn get(&self, id: u32) -> Option<Countdown> {
        self.current
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, countdown)| *countdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[test]
    fn one_hour_two_minutes_three_seconds() {
        let now = at(15, 12, 0, 0);
        let countdown = Countdown::until(at(15, 13, 2, 3), now);
        assert_eq!(
            countdown.digits(),
            Some(["00".into(), "01".into(), "02".into(), "03".into()])
        );
        assert_eq!(countdown.to_string(), "00d 01h 02m 03s");
    }

    #[test]
    fn days_are_floored_and_not_truncated_to_two_digits() {
        let countdown =
            Countdown::from_remaining(TimeDelta::days(120) + TimeDelta::milliseconds(999));
        assert_eq!(
            countdown,
            Countdown::Remaining {
                days: 120,
                hours: 0,
                minutes: 0,
                seconds: 0
            }
        );
        assert_eq!(countdown.digits().unwrap()[0], "120");
    }

    #[test]
    fn past_or_present_targets_have_started() {
        let now = at(20, 16, 0, 0);
        assert_eq!(Countdown::until(at(20, 15, 59, 59), now), Countdown::Started);
        assert_eq!(Countdown::until(now, now), Countdown::Started);
        assert_eq!(Countdown::Started.to_string(), "Event Started");
        assert_eq!(Countdown::Started.digits(), None);
    }

    #[test]
    fn parses_display_strings() {
        assert_eq!(
            parse_event_start("March 15, 2024", "6:00 PM").unwrap(),
            at(15, 18, 0, 0)
        );
        assert_eq!(
            parse_event_start("March 5, 2024", "11:00 AM").unwrap(),
            at(5, 11, 0, 0)
        );
        assert!(matches!(
            parse_event_start("someday", "soon"),
            Err(CountdownError::Parse { .. })
        ));
        assert_eq!(parse_timestamp("2024-03-20T14:00:00").unwrap(), at(20, 14, 0, 0));
    }

    #[test]
    fn board_refreshes_all_entries() {
        let mut board = CountdownBoard::new();
        board.insert(1, at(15, 18, 0, 0));
        board.insert(2, at(20, 16, 0, 0));
        board.insert(1, at(15, 19, 0, 0));
        assert_eq!(board.len(), 2);

        let entries = board.tick(at(15, 18, 30, 0)).to_vec();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            board.get(1),
            Some(Countdown::Remaining {
                days: 0,
                hours: 0,
                minutes: 30,
                seconds: 0
            })
        );

        board.tick(at(15, 19, 0, 0));
        assert!(board.get(1).unwrap().has_started());
        assert!(!board.get(2).unwrap().has_started());
        assert_eq!(board.get(3), None);
    }
}
