//! Transmission - Gearbox type of a listed vehicle

use serde::{Deserialize, Serialize};

/// Gearbox type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub enum Transmission {
    #[default]
    Manual,
    Automatic,
    #[serde(rename = "CVT")]
    Cvt,
}

impl std::fmt::Display for Transmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transmission::Manual => write!(f, "Manual"),
            Transmission::Automatic => write!(f, "Automatic"),
            Transmission::Cvt => write!(f, "CVT"),
        }
    }
}

impl std::str::FromStr for Transmission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(Transmission::Manual),
            "automatic" => Ok(Transmission::Automatic),
            "cvt" => Ok(Transmission::Cvt),
            _ => Err(format!("Unknown transmission: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cvt_wire_name() {
        assert_eq!(serde_json::to_string(&Transmission::Cvt).unwrap(), "\"CVT\"");
        assert_eq!(
            serde_json::from_str::<Transmission>("\"CVT\"").unwrap(),
            Transmission::Cvt
        );
        assert_eq!("cvt".parse::<Transmission>(), Ok(Transmission::Cvt));
    }

    #[test]
    fn test_rejects_unknown_values() {
        assert!("Sequential".parse::<Transmission>().is_err());
        assert!(serde_json::from_str::<Transmission>("\"Sequential\"").is_err());
    }
}
