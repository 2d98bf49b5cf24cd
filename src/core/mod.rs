pub mod attempt;
pub mod availability;
pub mod form;
pub mod reason;
pub mod retry;
pub mod selectors;
pub mod slot;

pub use crate::domain::model::{AttemptOutcome, BookingReason, CalendarDay, DayAvailability};
pub use crate::domain::ports::{Attempt, PageDriver, Sleeper};
pub use crate::utils::error::Result;
