//! FuelType - What a listed vehicle runs on

use serde::{Deserialize, Serialize};

/// Fuel type of a listed vehicle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub enum FuelType {
    #[default]
    Petrol,
    Diesel,
    Electric,
    Hybrid,
    Other,
}

impl FuelType {
    pub const ALL: [FuelType; 5] = [
        FuelType::Petrol,
        FuelType::Diesel,
        FuelType::Electric,
        FuelType::Hybrid,
        FuelType::Other,
    ];
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FuelType::Petrol => write!(f, "Petrol"),
            FuelType::Diesel => write!(f, "Diesel"),
            FuelType::Electric => write!(f, "Electric"),
            FuelType::Hybrid => write!(f, "Hybrid"),
            FuelType::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for FuelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "petrol" => Ok(FuelType::Petrol),
            "diesel" => Ok(FuelType::Diesel),
            "electric" => Ok(FuelType::Electric),
            "hybrid" => Ok(FuelType::Hybrid),
            "other" => Ok(FuelType::Other),
            _ => Err(format!("Unknown fuel type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parses_back() {
        for fuel in FuelType::ALL {
            assert_eq!(fuel.to_string().parse::<FuelType>(), Ok(fuel));
        }
    }

    #[test]
    fn test_rejects_unknown_values() {
        assert!("Steam".parse::<FuelType>().is_err());
        assert!(serde_json::from_str::<FuelType>("\"Steam\"").is_err());
        // The wire format is the exact variant name
        assert!(serde_json::from_str::<FuelType>("\"petrol\"").is_err());
        assert_eq!(
            serde_json::from_str::<FuelType>("\"Electric\"").unwrap(),
            FuelType::Electric
        );
    }
}
