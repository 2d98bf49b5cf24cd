use crate::utils::error::{BookingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque reference to a live element on the page, issued by a `PageDriver`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    pub id: String,
}

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Pure, side-effect free projections a driver can run against an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// Value of one attribute, `null` when absent.
    Attribute(String),
    /// Object of `name -> value|null` for each attribute.
    Attributes(Vec<String>),
    /// Whether the element's parent carries the given CSS class.
    ParentHasClass(String),
}

/// A calendar day as the page reports it. Month and day may or may not be zero padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl CalendarDay {
    pub fn new(year: impl Into<String>, month: impl Into<String>, day: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            month: month.into(),
            day: day.into(),
        }
    }

    /// `YYYY-MM-DD` with month and day padded to two digits.
    pub fn normalized(&self) -> String {
        normalize_date(&self.year, &self.month, &self.day)
    }
}

/// The padding rule shared by both sides of every date comparison.
pub fn normalize_date(year: &str, month: &str, day: &str) -> String {
    format!("{}-{}-{}", year.trim(), pad2(month), pad2(day))
}

fn pad2(value: &str) -> String {
    format!("{:0>2}", value.trim())
}

/// The matched calendar day together with its booking state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAvailability {
    pub element: ElementHandle,
    pub day: CalendarDay,
    pub bookable: bool,
}

/// Answer given on the questionnaire for why a test is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingReason {
    /// Red warning in the exposure notification app. The option is currently not offered by the site.
    CoronaWarnApp,
    ContactPerson,
}

impl BookingReason {
    pub const ALL: [BookingReason; 2] = [BookingReason::CoronaWarnApp, BookingReason::ContactPerson];

    pub fn name(&self) -> &'static str {
        match self {
            BookingReason::CoronaWarnApp => "coronaWarnApp",
            BookingReason::ContactPerson => "contactPerson",
        }
    }
}

impl FromStr for BookingReason {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|reason| reason.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BookingError::UnsupportedReason {
                reason: s.to_string(),
            })
    }
}

impl fmt::Display for BookingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one pass over the booking page that does not abort polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success { slot: String },
    DayNotBookable,
    NoSlotInWindow,
    SubmitUnavailable,
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success { .. })
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::Success { slot } => write!(f, "booked slot {}", slot),
            AttemptOutcome::DayNotBookable => f.write_str("no appointments available yet"),
            AttemptOutcome::NoSlotInWindow => f.write_str("no time slot within the window"),
            AttemptOutcome::SubmitUnavailable => f.write_str("submit button not available"),
        }
    }
}

/// Data typed into the booking form. Passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInformation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub title: String,
    pub gender: String,
    /// `DD.MM.YYYY`
    pub birth_date: String,
    pub id_number: String,
    pub street: String,
    pub street_number: String,
    pub zip: String,
    pub city: String,
    #[serde(default)]
    pub additional_address: String,
    #[serde(default)]
    pub telephone: String,
    pub mobile: String,
    #[serde(default)]
    pub business_number: String,
    #[serde(default)]
    pub fax: String,
    #[serde(default)]
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pads_month_and_day() {
        assert_eq!(CalendarDay::new("2021", "1", "5").normalized(), "2021-01-05");
        assert_eq!(CalendarDay::new("2021", "01", "05").normalized(), "2021-01-05");
        assert_eq!(CalendarDay::new("2021", "12", "24").normalized(), "2021-12-24");
        assert_eq!(normalize_date("2021", "12", "24"), "2021-12-24");
    }

    #[test]
    fn test_reason_from_str() {
        assert_eq!(
            "contactPerson".parse::<BookingReason>().unwrap(),
            BookingReason::ContactPerson
        );
        assert_eq!(
            "coronawarnapp".parse::<BookingReason>().unwrap(),
            BookingReason::CoronaWarnApp
        );

        let err = "travel".parse::<BookingReason>().unwrap_err();
        assert!(matches!(err, BookingError::UnsupportedReason { reason } if reason == "travel"));
    }

    #[test]
    fn test_only_success_is_terminal() {
        assert!(AttemptOutcome::Success {
            slot: "11:30".to_string()
        }
        .is_success());
        assert!(!AttemptOutcome::DayNotBookable.is_success());
        assert!(!AttemptOutcome::NoSlotInWindow.is_success());
        assert!(!AttemptOutcome::SubmitUnavailable.is_success());
    }
}
