//! Vehicle - The single listed entity
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{FuelType, Transmission};

/// Earliest model year accepted for a listing
pub const MIN_YEAR: i32 = 1900;

/// Latest model year accepted at `now` (next year's models are allowed)
pub fn max_year(now: DateTime<Utc>) -> i32 {
    now.year() + 1
}

/// Creation payload for a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub title: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mileage: i32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub fuel_type: FuelType,
    #[serde(default)]
    pub transmission: Transmission,
    #[serde(default)]
    pub seller_phone: String,
    #[serde(default)]
    pub sold: bool,
}

impl NewVehicle {
    /// Create a payload with the required fields and defaults for the rest
    pub fn new(
        title: impl Into<String>,
        make: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        price: f64,
    ) -> Self {
        Self {
            title: title.into(),
            make: make.into(),
            model: model.into(),
            year,
            price,
            images: Vec::new(),
            description: String::new(),
            mileage: 0,
            color: String::new(),
            fuel_type: FuelType::default(),
            transmission: Transmission::default(),
            seller_phone: String::new(),
            sold: false,
        }
    }

    /// Trim and check every field against the write-time rules
    pub fn validate(self) -> Result<Self, DomainError> {
        self.validate_at(Utc::now())
    }

    /// Same as [`NewVehicle::validate`] with an explicit clock
    pub fn validate_at(self, now: DateTime<Utc>) -> Result<Self, DomainError> {
        check_year(self.year, now)?;
        check_price(self.price)?;
        check_mileage(self.mileage)?;

        Ok(Self {
            title: required_text("title", &self.title)?,
            make: required_text("make", &self.make)?,
            model: required_text("model", &self.model)?,
            year: self.year,
            price: self.price,
            images: clean_images(self.images),
            description: self.description,
            mileage: self.mileage,
            color: self.color.trim().to_string(),
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            seller_phone: self.seller_phone.trim().to_string(),
            sold: self.sold,
        })
    }
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePatch {
    pub title: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub mileage: Option<i32>,
    pub color: Option<String>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub seller_phone: Option<String>,
    pub sold: Option<bool>,
}

impl VehiclePatch {
    /// Patch that only flips the sold flag
    pub fn sold(sold: bool) -> Self {
        Self {
            sold: Some(sold),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(self) -> Result<Self, DomainError> {
        self.validate_at(Utc::now())
    }

    /// Apply the creation rules to whichever fields are present
    pub fn validate_at(self, now: DateTime<Utc>) -> Result<Self, DomainError> {
        if self.is_empty() {
            return Err(DomainError::validation("update contains no fields"));
        }
        if let Some(year) = self.year {
            check_year(year, now)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(mileage) = self.mileage {
            check_mileage(mileage)?;
        }

        Ok(Self {
            title: self.title.map(|t| required_text("title", &t)).transpose()?,
            make: self.make.map(|m| required_text("make", &m)).transpose()?,
            model: self.model.map(|m| required_text("model", &m)).transpose()?,
            year: self.year,
            price: self.price,
            images: self.images.map(clean_images),
            description: self.description,
            mileage: self.mileage,
            color: self.color.map(|c| c.trim().to_string()),
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            seller_phone: self.seller_phone.map(|p| p.trim().to_string()),
            sold: self.sold,
        })
    }
}

/// A listing as held by the store.
///
/// `record_id` is the store's own key; it is turned into the public `id`
/// by the query translator and never serialized as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRecord {
    pub record_id: Uuid,
    pub title: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub images: Vec<String>,
    pub description: String,
    pub mileage: i32,
    pub color: String,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub seller_phone: String,
    pub sold: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VehicleRecord {
    /// Build a fresh row from a validated payload
    pub fn from_new(record_id: Uuid, vehicle: NewVehicle, now: DateTime<Utc>) -> Self {
        Self {
            record_id,
            title: vehicle.title,
            make: vehicle.make,
            model: vehicle.model,
            year: vehicle.year,
            price: vehicle.price,
            images: vehicle.images,
            description: vehicle.description,
            mileage: vehicle.mileage,
            color: vehicle.color,
            fuel_type: vehicle.fuel_type,
            transmission: vehicle.transmission,
            seller_phone: vehicle.seller_phone,
            sold: vehicle.sold,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a validated patch and refresh `updated_at`
    pub fn apply(&mut self, patch: &VehiclePatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(make) = &patch.make {
            self.make = make.clone();
        }
        if let Some(model) = &patch.model {
            self.model = model.clone();
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(images) = &patch.images {
            self.images = images.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(mileage) = patch.mileage {
            self.mileage = mileage;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(fuel_type) = patch.fuel_type {
            self.fuel_type = fuel_type;
        }
        if let Some(transmission) = patch.transmission {
            self.transmission = transmission;
        }
        if let Some(seller_phone) = &patch.seller_phone {
            self.seller_phone = seller_phone.clone();
        }
        if let Some(sold) = patch.sold {
            self.sold = sold;
        }
        self.updated_at = now;
    }
}

/// Public listing shape. `id` is the only identifier field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub title: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub images: Vec<String>,
    pub description: String,
    pub mileage: i32,
    pub color: String,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub seller_phone: String,
    pub sold: bool,
    /// ISO-8601, millisecond precision, UTC (`2024-05-01T09:30:00.000Z`)
    pub created_at: String,
    pub updated_at: String,
}

fn required_text(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn check_year(year: i32, now: DateTime<Utc>) -> Result<(), DomainError> {
    let max = max_year(now);
    if !(MIN_YEAR..=max).contains(&year) {
        return Err(DomainError::validation(format!(
            "year must be between {} and {}, got {}",
            MIN_YEAR, max, year
        )));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), DomainError> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation(format!(
            "price must be a non-negative number, got {}",
            price
        )));
    }
    Ok(())
}

fn check_mileage(mileage: i32) -> Result<(), DomainError> {
    if mileage < 0 {
        return Err(DomainError::validation(format!(
            "mileage must be non-negative, got {}",
            mileage
        )));
    }
    Ok(())
}

fn clean_images(images: Vec<String>) -> Vec<String> {
    images
        .into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_2024() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults_from_minimal_json() {
        let json = serde_json::json!({
            "title": "2020 Toyota Camry SE",
            "make": "Toyota",
            "model": "Camry",
            "year": 2020,
            "price": 25000.0
        });
        let vehicle: NewVehicle = serde_json::from_value(json).unwrap();

        assert!(vehicle.images.is_empty());
        assert_eq!(vehicle.mileage, 0);
        assert_eq!(vehicle.fuel_type, FuelType::Petrol);
        assert_eq!(vehicle.transmission, Transmission::Manual);
        assert!(!vehicle.sold);
        assert_eq!(vehicle.seller_phone, "");
    }

    #[test]
    fn test_validate_trims_text_fields() {
        let mut vehicle = NewVehicle::new("  Civic LX ", " Honda", "Civic ", 2019, 22000.0);
        vehicle.color = " White ".to_string();
        vehicle.images = vec![" https://img/1.jpg ".to_string(), "   ".to_string()];

        let vehicle = vehicle.validate_at(at_2024()).unwrap();
        assert_eq!(vehicle.title, "Civic LX");
        assert_eq!(vehicle.make, "Honda");
        assert_eq!(vehicle.model, "Civic");
        assert_eq!(vehicle.color, "White");
        assert_eq!(vehicle.images, vec!["https://img/1.jpg".to_string()]);
    }

    #[test]
    fn test_year_bounds() {
        let now = at_2024();
        assert!(NewVehicle::new("a", "b", "c", 1900, 1.0).validate_at(now).is_ok());
        assert!(NewVehicle::new("a", "b", "c", 2025, 1.0).validate_at(now).is_ok());
        assert!(matches!(
            NewVehicle::new("a", "b", "c", 1899, 1.0).validate_at(now),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            NewVehicle::new("a", "b", "c", 2026, 1.0).validate_at(now),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_negative_price_and_mileage() {
        let now = at_2024();
        assert!(NewVehicle::new("a", "b", "c", 2020, -1.0).validate_at(now).is_err());
        assert!(NewVehicle::new("a", "b", "c", 2020, f64::NAN).validate_at(now).is_err());

        let mut vehicle = NewVehicle::new("a", "b", "c", 2020, 0.0);
        vehicle.mileage = -5;
        assert!(vehicle.validate_at(now).is_err());
    }

    #[test]
    fn test_rejects_blank_required_text() {
        let err = NewVehicle::new("   ", "Ford", "F-150", 2021, 45000.0)
            .validate_at(at_2024())
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: title is required");
    }

    #[test]
    fn test_empty_patch_is_rejected() {
        assert!(VehiclePatch::default().validate_at(at_2024()).is_err());
        assert!(VehiclePatch::sold(true).validate_at(at_2024()).is_ok());
    }

    #[test]
    fn test_patch_checks_present_fields_only() {
        let patch = VehiclePatch {
            year: Some(1850),
            ..VehiclePatch::default()
        };
        assert!(patch.validate_at(at_2024()).is_err());

        let patch = VehiclePatch {
            make: Some("  Tesla ".to_string()),
            ..VehiclePatch::default()
        };
        assert_eq!(
            patch.validate_at(at_2024()).unwrap().make.as_deref(),
            Some("Tesla")
        );
    }

    #[test]
    fn test_apply_patch_refreshes_updated_at() {
        let created = at_2024();
        let later = created + chrono::Duration::hours(3);
        let mut record = VehicleRecord::from_new(
            Uuid::new_v4(),
            NewVehicle::new("2022 Tesla Model 3", "Tesla", "Model 3", 2022, 42000.0),
            created,
        );

        record.apply(&VehiclePatch::sold(true), later);

        assert!(record.sold);
        assert_eq!(record.title, "2022 Tesla Model 3");
        assert_eq!(record.created_at, created);
        assert_eq!(record.updated_at, later);
    }
}
