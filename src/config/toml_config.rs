use crate::config::stations::Station;
use crate::config::{BookingConfig, BrowserKind, WebDriverSettings};
use crate::domain::model::{BookingReason, PersonalInformation};
use crate::domain::time_window::TimeWindow;
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::{
    validate_date, validate_non_empty_string, validate_one_of, validate_positive_number,
    validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 60;
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub const DEFAULT_IDLE_QUIET_MS: u64 = 500;
pub const SUPPORTED_TESTS: [&str; 1] = ["pcr"];
/// Option values of the gender select on the booking form.
pub const SUPPORTED_GENDERS: [&str; 3] = ["m", "w", "d"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub booking: BookingSection,
    pub station: StationSection,
    pub polling: Option<PollingSection>,
    pub browser: Option<BrowserSection>,
    pub monitoring: Option<MonitoringSection>,
    pub personal: Option<PersonalInformation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSection {
    /// YYYY-MM-DD
    pub day: String,
    /// HH:mm
    pub from: String,
    /// HH:mm
    pub to: String,
    pub test: Option<String>,
    pub reason: String,
    pub share_with_warn_app: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationSection {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSection {
    pub refresh_interval_seconds: Option<u64>,
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowserSection {
    pub show_ui: Option<bool>,
    pub webdriver_url: Option<String>,
    pub kind: Option<String>,
    pub idle_quiet_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSection {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BookingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BookingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BOOKING_EMAIL})，個人資料不必寫進檔案
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BookingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 取得測試站網址，明確的 url 優先於站名
    pub fn station_url(&self) -> Result<String> {
        if let Some(url) = &self.station.url {
            return Ok(url.clone());
        }
        let name = validate_required_field("station.name", &self.station.name)?;
        Ok(name.parse::<Station>()?.url().to_string())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(
            self.polling
                .as_ref()
                .and_then(|p| p.refresh_interval_seconds)
                .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECONDS),
        )
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.polling.as_ref().and_then(|p| p.max_attempts)
    }

    pub fn show_browser_ui(&self) -> bool {
        self.browser
            .as_ref()
            .and_then(|b| b.show_ui)
            .unwrap_or(false)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    fn webdriver_settings(&self) -> Result<WebDriverSettings> {
        let browser = self.browser.as_ref();
        let kind = match browser.and_then(|b| b.kind.as_deref()) {
            Some(kind) => kind.parse::<BrowserKind>()?,
            None => BrowserKind::Chrome,
        };

        Ok(WebDriverSettings {
            url: browser
                .and_then(|b| b.webdriver_url.clone())
                .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string()),
            kind,
            headless: !self.show_browser_ui(),
            idle_quiet_period: Duration::from_millis(
                browser
                    .and_then(|b| b.idle_quiet_ms)
                    .unwrap_or(DEFAULT_IDLE_QUIET_MS),
            ),
        })
    }

    fn validate_personal(personal: &PersonalInformation) -> Result<()> {
        let required = [
            ("personal.first_name", &personal.first_name),
            ("personal.last_name", &personal.last_name),
            ("personal.email", &personal.email),
            ("personal.gender", &personal.gender),
            ("personal.birth_date", &personal.birth_date),
            ("personal.id_number", &personal.id_number),
            ("personal.street", &personal.street),
            ("personal.street_number", &personal.street_number),
            ("personal.zip", &personal.zip),
            ("personal.city", &personal.city),
            ("personal.mobile", &personal.mobile),
        ];
        for (field, value) in required {
            validate_non_empty_string(field, value)?;
            if value.contains("${") {
                return Err(BookingError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }
        // 表單選項不存在時 select 會失敗，啟動時就先擋下
        validate_one_of("personal.gender", &personal.gender, &SUPPORTED_GENDERS)?;
        Ok(())
    }

    /// 驗證後轉成執行期使用的 BookingConfig
    pub fn resolve(&self) -> Result<BookingConfig> {
        let day = validate_date("booking.day", &self.booking.day)?;
        let window = TimeWindow::parse(&self.booking.from, &self.booking.to)?;
        let reason: BookingReason = self.booking.reason.parse()?;

        let test = self.booking.test.as_deref().unwrap_or("pcr");
        validate_one_of("booking.test", test, &SUPPORTED_TESTS)?;

        let station_url = self.station_url()?;
        validate_url("station.url", &station_url)?;

        let refresh_interval = self.refresh_interval();
        validate_positive_number(
            "polling.refresh_interval_seconds",
            refresh_interval.as_secs(),
            1,
        )?;
        if let Some(max_attempts) = self.max_attempts() {
            validate_positive_number("polling.max_attempts", u64::from(max_attempts), 1)?;
        }

        let webdriver = self.webdriver_settings()?;
        validate_url("browser.webdriver_url", &webdriver.url)?;

        let personal = validate_required_field("personal", &self.personal)?;
        Self::validate_personal(personal)?;

        Ok(BookingConfig {
            day,
            window,
            station_url,
            reason,
            share_with_warn_app: self.booking.share_with_warn_app.unwrap_or(true),
            refresh_interval,
            max_attempts: self.max_attempts(),
            show_browser_ui: self.show_browser_ui(),
            webdriver,
            monitoring: self.monitoring_enabled(),
            personal: personal.clone(),
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.resolve().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PERSONAL: &str = r#"
[personal]
first_name = "Erika"
last_name = "Mustermann"
email = "erika@example.com"
gender = "w"
birth_date = "12.08.1964"
id_number = "T22000129"
street = "Heidestrasse"
street_number = "17"
zip = "51147"
city = "Koeln"
mobile = "0151 1234567"
"#;

    fn config_with(booking_and_station: &str) -> String {
        format!("{}\n{}", booking_and_station, PERSONAL)
    }

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = config_with(
            r#"
[booking]
day = "2021-12-24"
from = "11:00"
to = "14:00"
reason = "contactPerson"

[station]
name = "deutsches-museum"

[polling]
refresh_interval_seconds = 30
"#,
        );

        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        let resolved = config.resolve().unwrap();

        assert_eq!(resolved.target_day(), "2021-12-24");
        assert_eq!(resolved.window.to_string(), "11:00 - 14:00");
        assert_eq!(resolved.reason, BookingReason::ContactPerson);
        assert_eq!(resolved.station_url, Station::DeutschesMuseum.url());
        assert_eq!(resolved.refresh_interval, Duration::from_secs(30));
        assert!(resolved.share_with_warn_app);
        assert!(resolved.webdriver.headless);
        assert_eq!(resolved.max_attempts, None);
    }

    #[test]
    fn test_explicit_url_overrides_station_name() {
        let toml_content = config_with(
            r#"
[booking]
day = "2021-12-24"
from = "11:00"
to = "14:00"
reason = "coronaWarnApp"

[station]
name = "neuperlach"
url = "https://booking.example.com/calendar"

[browser]
show_ui = true
kind = "firefox"
"#,
        );

        let resolved = TomlConfig::from_toml_str(&toml_content)
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(resolved.station_url, "https://booking.example.com/calendar");
        assert_eq!(resolved.webdriver.kind, BrowserKind::Firefox);
        assert!(!resolved.webdriver.headless);
        assert!(resolved.show_browser_ui);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TERMIN_TEST_STATION_URL", "https://env.example.com/calendar");

        let toml_content = config_with(
            r#"
[booking]
day = "2021-12-24"
from = "11:00"
to = "14:00"
reason = "contactPerson"

[station]
url = "${TERMIN_TEST_STATION_URL}"
"#,
        );

        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(
            config.station.url.as_deref(),
            Some("https://env.example.com/calendar")
        );

        std::env::remove_var("TERMIN_TEST_STATION_URL");
    }

    #[test]
    fn test_unknown_reason_is_rejected() {
        let toml_content = config_with(
            r#"
[booking]
day = "2021-12-24"
from = "11:00"
to = "14:00"
reason = "travel"

[station]
name = "haidhausen"
"#,
        );

        let err = TomlConfig::from_toml_str(&toml_content)
            .unwrap()
            .validate()
            .unwrap_err();
        assert!(matches!(err, BookingError::UnsupportedReason { .. }));
    }

    #[test]
    fn test_config_validation() {
        let cases = [
            ("2021-12-24", "11:00", "14:00", "pcr", "\"deutsches-museum\""),
            ("24.12.2021", "11:00", "14:00", "pcr", "\"deutsches-museum\""),
            ("2021-12-24", "11:00", "25:00", "pcr", "\"deutsches-museum\""),
            ("2021-12-24", "14:00", "11:00", "pcr", "\"deutsches-museum\""),
            ("2021-12-24", "11:00", "14:00", "antigen", "\"deutsches-museum\""),
            ("2021-12-24", "11:00", "14:00", "pcr", "\"schwabing\""),
        ];

        for (index, (day, from, to, test, station)) in cases.iter().enumerate() {
            let toml_content = config_with(&format!(
                r#"
[booking]
day = "{}"
from = "{}"
to = "{}"
test = "{}"
reason = "contactPerson"

[station]
name = {}
"#,
                day, from, to, test, station
            ));
            let config = TomlConfig::from_toml_str(&toml_content).unwrap();
            assert_eq!(config.validate().is_ok(), index == 0, "case {}", index);
        }
    }

    #[test]
    fn test_missing_personal_section() {
        let toml_content = r#"
[booking]
day = "2021-12-24"
from = "11:00"
to = "14:00"
reason = "contactPerson"

[station]
name = "ramersdorf"
"#;

        let err = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .resolve()
            .unwrap_err();
        assert!(matches!(err, BookingError::MissingConfigError { field } if field == "personal"));
    }

    #[test]
    fn test_unset_personal_variable_is_rejected() {
        let toml_content = config_with(
            r#"
[booking]
day = "2021-12-24"
from = "11:00"
to = "14:00"
reason = "contactPerson"

[station]
name = "ramersdorf"
"#,
        )
        .replace("\"Erika\"", "\"${TERMIN_TEST_UNSET_FIRST_NAME}\"");

        let err = TomlConfig::from_toml_str(&toml_content)
            .unwrap()
            .resolve()
            .unwrap_err();
        assert!(
            matches!(err, BookingError::InvalidConfigValueError { field, .. } if field == "personal.first_name")
        );
    }

    #[test]
    fn test_unknown_gender_is_rejected() {
        let booking = r#"
[booking]
day = "2021-12-24"
from = "11:00"
to = "14:00"
reason = "contactPerson"

[station]
name = "ramersdorf"
"#;

        for gender in ["m", "w", "d"] {
            let toml_content =
                config_with(booking).replace("gender = \"w\"", &format!("gender = \"{}\"", gender));
            let config = TomlConfig::from_toml_str(&toml_content).unwrap();
            assert!(config.resolve().is_ok(), "gender {}", gender);
        }

        let toml_content = config_with(booking).replace("gender = \"w\"", "gender = \"f\"");
        let err = TomlConfig::from_toml_str(&toml_content)
            .unwrap()
            .resolve()
            .unwrap_err();
        assert!(
            matches!(err, BookingError::InvalidConfigValueError { field, value, .. } if field == "personal.gender" && value == "f")
        );
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = config_with(
            r#"
[booking]
day = "2022-01-03"
from = "08:00"
to = "09:30"
reason = "contactPerson"

[station]
name = "verkehrszentrum"

[polling]
max_attempts = 10
"#,
        );

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.max_attempts(), Some(10));
        assert_eq!(config.resolve().unwrap().max_attempts, Some(10));
    }
}
