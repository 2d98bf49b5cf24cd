use crate::utils::error::{BookingError, Result};
use chrono::NaiveDate;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(BookingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn validate_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    let well_formed = value.len() == 10
        && value
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });

    let parsed = if well_formed {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    } else {
        None
    };

    parsed.ok_or_else(|| BookingError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: "Expected a calendar date in YYYY-MM-DD format".to_string(),
    })
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| BookingError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Supported values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("station.url", "https://example.com").is_ok());
        assert!(validate_url("station.url", "http://example.com").is_ok());
        assert!(validate_url("station.url", "").is_err());
        assert!(validate_url("station.url", "invalid-url").is_err());
        assert!(validate_url("station.url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_date() {
        let date = validate_date("booking.day", "2021-12-24").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 12, 24).unwrap());

        assert!(validate_date("booking.day", "2021-2-4").is_err());
        assert!(validate_date("booking.day", "24.12.2021").is_err());
        assert!(validate_date("booking.day", "2021-02-30").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("polling.refresh_interval_seconds", 60, 1).is_ok());
        assert!(validate_positive_number("polling.refresh_interval_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("booking.test", "pcr", &["pcr"]).is_ok());
        assert!(validate_one_of("booking.test", "antigen", &["pcr"]).is_err());
    }
}
