//! Vehicle listing DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use autolot::{FuelType, ListFilters, NewVehicle, RawListFilters, Transmission, Vehicle, VehiclePatch};

/// Vehicle listing as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
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
    #[schema(value_type = String, example = "Petrol")]
    pub fuel_type: FuelType,
    #[schema(value_type = String, example = "Automatic")]
    pub transmission: Transmission,
    pub seller_phone: String,
    pub sold: bool,
    /// ISO-8601, millisecond precision, UTC
    pub created_at: String,
    pub updated_at: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            title: v.title,
            make: v.make,
            model: v.model,
            year: v.year,
            price: v.price,
            images: v.images,
            description: v.description,
            mileage: v.mileage,
            color: v.color,
            fuel_type: v.fuel_type,
            transmission: v.transmission,
            seller_phone: v.seller_phone,
            sold: v.sold,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

/// Create listing request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
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
    #[schema(value_type = Option<String>, example = "Petrol")]
    pub fuel_type: FuelType,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Manual")]
    pub transmission: Transmission,
    #[serde(default)]
    pub seller_phone: String,
    #[serde(default)]
    pub sold: bool,
}

impl From<CreateVehicleRequest> for NewVehicle {
    fn from(req: CreateVehicleRequest) -> Self {
        NewVehicle {
            title: req.title,
            make: req.make,
            model: req.model,
            year: req.year,
            price: req.price,
            images: req.images,
            description: req.description,
            mileage: req.mileage,
            color: req.color,
            fuel_type: req.fuel_type,
            transmission: req.transmission,
            seller_phone: req.seller_phone,
            sold: req.sold,
        }
    }
}

/// Partial update request. Omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    pub title: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub mileage: Option<i32>,
    pub color: Option<String>,
    #[schema(value_type = Option<String>)]
    pub fuel_type: Option<FuelType>,
    #[schema(value_type = Option<String>)]
    pub transmission: Option<Transmission>,
    pub seller_phone: Option<String>,
    pub sold: Option<bool>,
}

impl From<UpdateVehicleRequest> for VehiclePatch {
    fn from(req: UpdateVehicleRequest) -> Self {
        VehiclePatch {
            title: req.title,
            make: req.make,
            model: req.model,
            year: req.year,
            price: req.price,
            images: req.images,
            description: req.description,
            mileage: req.mileage,
            color: req.color,
            fuel_type: req.fuel_type,
            transmission: req.transmission,
            seller_phone: req.seller_phone,
            sold: req.sold,
        }
    }
}

/// Listing filters in a query string. Year values are checked by the handler
/// so a bad number gets a message naming the field.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VehicleListParams {
    /// Substring of title, make, model or description (case-insensitive)
    pub search: Option<String>,
    /// Exact make (case-insensitive)
    pub make: Option<String>,
    /// Exact model year; ignored when minYear or maxYear is given
    pub year: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
}

impl From<VehicleListParams> for RawListFilters {
    fn from(p: VehicleListParams) -> Self {
        RawListFilters {
            search: p.search,
            make: p.make,
            year: p.year,
            min_year: p.min_year,
            max_year: p.max_year,
        }
    }
}

/// Typed listing filters for `POST /api/vehicles/search`
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFilterRequest {
    pub search: Option<String>,
    pub make: Option<String>,
    pub year: Option<i32>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

impl From<VehicleFilterRequest> for ListFilters {
    fn from(req: VehicleFilterRequest) -> Self {
        ListFilters {
            search: req.search,
            make: req.make,
            year: req.year,
            min_year: req.min_year,
            max_year: req.max_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults_optional_fields() {
        let req: CreateVehicleRequest = serde_json::from_str(
            r#"{"title":"2019 Honda Civic","make":"Honda","model":"Civic","year":2019,"price":18500}"#,
        )
        .unwrap();
        let vehicle = NewVehicle::from(req);
        assert_eq!(vehicle.fuel_type, FuelType::Petrol);
        assert_eq!(vehicle.transmission, Transmission::Manual);
        assert!(vehicle.images.is_empty());
        assert!(!vehicle.sold);
    }

    #[test]
    fn test_update_request_keeps_omitted_fields_absent() {
        let req: UpdateVehicleRequest =
            serde_json::from_str(r#"{"sold":true,"transmission":"CVT"}"#).unwrap();
        let patch = VehiclePatch::from(req);
        assert_eq!(patch.sold, Some(true));
        assert_eq!(patch.transmission, Some(Transmission::Cvt));
        assert!(patch.title.is_none());
        assert!(patch.price.is_none());
    }

    #[test]
    fn test_response_uses_camel_case() {
        let vehicle = Vehicle {
            id: "abc".into(),
            title: "t".into(),
            make: "m".into(),
            model: "m".into(),
            year: 2020,
            price: 1.0,
            images: vec![],
            description: String::new(),
            mileage: 0,
            color: String::new(),
            fuel_type: FuelType::Hybrid,
            transmission: Transmission::Automatic,
            seller_phone: String::new(),
            sold: false,
            created_at: "2024-05-01T09:30:00.000Z".into(),
            updated_at: "2024-05-01T09:30:00.000Z".into(),
        };
        let json = serde_json::to_value(VehicleResponse::from(vehicle)).unwrap();
        assert_eq!(json["fuelType"], "Hybrid");
        assert_eq!(json["sellerPhone"], "");
        assert_eq!(json["createdAt"], "2024-05-01T09:30:00.000Z");
        assert!(json.get("record_id").is_none());
    }
}
