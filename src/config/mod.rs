pub mod stations;
pub mod toml_config;

use crate::domain::model::{BookingReason, PersonalInformation};
use crate::domain::time_window::TimeWindow;
use crate::utils::error::{BookingError, Result};
use chrono::NaiveDate;
use std::str::FromStr;
use std::time::Duration;

/// Validated settings for one booking run. Built once at startup and only lent out.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub day: NaiveDate,
    pub window: TimeWindow,
    pub station_url: String,
    pub reason: BookingReason,
    pub share_with_warn_app: bool,
    pub refresh_interval: Duration,
    pub max_attempts: Option<u32>,
    pub show_browser_ui: bool,
    pub webdriver: WebDriverSettings,
    pub monitoring: bool,
    pub personal: PersonalInformation,
}

impl BookingConfig {
    /// Target day as `YYYY-MM-DD`.
    pub fn target_day(&self) -> String {
        self.day.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Chrome,
    Firefox,
}

impl FromStr for BrowserKind {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            _ => Err(BookingError::InvalidConfigValueError {
                field: "browser.kind".to_string(),
                value: s.to_string(),
                reason: "Supported browsers: chrome, firefox".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebDriverSettings {
    pub url: String,
    pub kind: BrowserKind,
    pub headless: bool,
    /// How long the page must stay without new network requests to count as idle.
    pub idle_quiet_period: Duration,
}
