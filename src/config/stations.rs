use crate::utils::error::{BookingError, Result};
use std::fmt;
use std::str::FromStr;

/// Test stations in Munich that share the same booking page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Station {
    DeutschesMuseum,
    VerkehrsZentrum,
    Haidhausen,
    Ramersdorf,
    Neuperlach,
}

impl Station {
    pub const ALL: [Station; 5] = [
        Station::DeutschesMuseum,
        Station::VerkehrsZentrum,
        Station::Haidhausen,
        Station::Ramersdorf,
        Station::Neuperlach,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Station::DeutschesMuseum => "deutsches-museum",
            Station::VerkehrsZentrum => "verkehrszentrum",
            Station::Haidhausen => "haidhausen",
            Station::Ramersdorf => "ramersdorf",
            Station::Neuperlach => "neuperlach",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Station::DeutschesMuseum => {
                "https://www.corona-teststelle.de/standorte/muenchen-deutsches-museum"
            }
            Station::VerkehrsZentrum => {
                "https://www.corona-teststelle.de/standorte/verkehrszentrum-deutsches-museum"
            }
            Station::Haidhausen => "https://www.corona-teststelle.de/standorte/muenchen-haidhausen",
            Station::Ramersdorf => "https://www.corona-teststelle.de/standorte/muenchen-ramersdorf",
            Station::Neuperlach => "https://www.corona-teststelle.de/standorte/muenchen-neuperlach",
        }
    }
}

impl FromStr for Station {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|station| station.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BookingError::InvalidConfigValueError {
                field: "station.name".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Unknown station. Known stations: {}",
                    Self::ALL.map(|station| station.name()).join(", ")
                ),
            })
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_lookup() {
        let station: Station = "Haidhausen".parse().unwrap();
        assert_eq!(station, Station::Haidhausen);
        assert!(station.url().ends_with("muenchen-haidhausen"));
        assert!("schwabing".parse::<Station>().is_err());
    }

    #[test]
    fn test_every_station_url_is_valid() {
        for station in Station::ALL {
            assert!(crate::utils::validation::validate_url("station.url", station.url()).is_ok());
        }
    }
}
