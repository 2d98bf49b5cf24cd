use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Day {day} not found, make sure to follow the YYYY-MM-DD format. Days of the currently shown month may not be listed yet")]
    DayNotFound { day: String },

    #[error("Booking reason '{reason}' is not supported")]
    UnsupportedReason { reason: String },

    #[error("Invalid time format: '{value}' (expected HH:mm)")]
    InvalidTimeFormat { value: String },

    #[error("Invalid time window: {from} is after {to}")]
    InvalidTimeWindow { from: String, to: String },

    #[error("Gave up after {attempts} attempts without a booking")]
    AttemptsExhausted { attempts: u32 },

    #[error("Page driver command '{command}' failed: {message}")]
    Driver { command: String, message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Calendar,
    Driver,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BookingError {
    pub fn driver(command: &str, message: impl Into<String>) -> Self {
        BookingError::Driver {
            command: command.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BookingError::UnsupportedReason { .. }
            | BookingError::InvalidTimeFormat { .. }
            | BookingError::InvalidTimeWindow { .. }
            | BookingError::ConfigValidationError { .. }
            | BookingError::InvalidConfigValueError { .. }
            | BookingError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BookingError::DayNotFound { .. } | BookingError::AttemptsExhausted { .. } => {
                ErrorCategory::Calendar
            }
            BookingError::Driver { .. } | BookingError::HttpError(_) => ErrorCategory::Driver,
            BookingError::IoError(_) | BookingError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Calendar => ErrorSeverity::Medium,
            ErrorCategory::Driver => ErrorSeverity::Critical,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BookingError::DayNotFound { .. } => {
                "Check booking.day and open the station page to confirm the day is shown in the calendar"
            }
            BookingError::UnsupportedReason { .. } => {
                "Use one of the supported reasons: contactPerson, coronaWarnApp"
            }
            BookingError::InvalidTimeFormat { .. } | BookingError::InvalidTimeWindow { .. } => {
                "Use HH:mm for booking.from and booking.to, with from not later than to"
            }
            BookingError::AttemptsExhausted { .. } => {
                "Raise polling.max_attempts or remove it to poll until a slot opens"
            }
            BookingError::Driver { .. } | BookingError::HttpError(_) => {
                "Make sure the WebDriver server is running and the station page layout has not changed"
            }
            BookingError::IoError(_) => "Check that the configuration file exists and is readable",
            BookingError::SerializationError(_) => "Check the WebDriver server version",
            BookingError::ConfigValidationError { .. }
            | BookingError::InvalidConfigValueError { .. }
            | BookingError::MissingConfigError { .. } => {
                "Fix the configuration file and run again with --dry-run to verify it"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Calendar => format!("Booking stopped: {}", self),
            ErrorCategory::Driver => format!("Browser automation failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
