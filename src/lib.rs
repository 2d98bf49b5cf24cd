pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{sleeper::TokioSleeper, webdriver::WebDriverPage};
pub use config::{toml_config::TomlConfig, BookingConfig};
pub use core::{attempt::BookingAttempt, retry::RetryLoop};
pub use domain::model::{AttemptOutcome, BookingReason, PersonalInformation};
pub use domain::time_window::{ClockTime, TimeWindow};
pub use utils::error::{BookingError, Result};
