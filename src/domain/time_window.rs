use crate::utils::error::{BookingError, Result};
use std::fmt;
use std::str::FromStr;

/// A time of day with minute precision, e.g. `11:30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: u16::from(hour) * 60 + u16::from(minute),
        })
    }

    /// Accepts `H:mm` and `HH:mm`. Surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || BookingError::InvalidTimeFormat {
            value: value.to_string(),
        };

        let (hour, minute) = value.trim().split_once(':').ok_or_else(invalid)?;
        let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if !digits(hour) || hour.len() > 2 || !digits(minute) || minute.len() != 2 {
            return Err(invalid());
        }

        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }

    pub fn hour(&self) -> u8 {
        (self.minutes / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.minutes % 60) as u8
    }
}

impl FromStr for ClockTime {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Inclusive range of acceptable slot times within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    from: ClockTime,
    to: ClockTime,
}

impl TimeWindow {
    pub fn new(from: ClockTime, to: ClockTime) -> Result<Self> {
        if from > to {
            return Err(BookingError::InvalidTimeWindow {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(Self { from, to })
    }

    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Self::new(ClockTime::parse(from)?, ClockTime::parse(to)?)
    }

    pub fn contains(&self, time: ClockTime) -> bool {
        self.from <= time && time <= self.to
    }

    pub fn from(&self) -> ClockTime {
        self.from
    }

    pub fn to(&self) -> ClockTime {
        self.to
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.from, self.to)
    }
}
