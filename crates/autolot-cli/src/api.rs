//! Autolot API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// API Client for Autolot
pub struct AutolotClient {
    client: Client,
    base_url: String,
}

// ============================================
// API Types
// ============================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub id: String,
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
    pub fuel_type: String,
    pub transmission: String,
    #[serde(default)]
    pub seller_phone: String,
    pub sold: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
}

impl AutolotClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = request
            .send()
            .await
            .context("Failed to connect to Autolot API")?;
        Self::parse(resp).await
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        tracing::debug!("GET /api/health");
        self.send(self.client.get(self.url("/api/health"))).await
    }

    pub async fn list_vehicles(&self, params: &ListParams) -> Result<Vec<VehicleResponse>> {
        tracing::debug!(?params, "GET /api/vehicles");
        self.send(self.client.get(self.url("/api/vehicles")).query(params))
            .await
    }

    pub async fn get_vehicle(&self, id: &str) -> Result<VehicleResponse> {
        tracing::debug!(id, "GET /api/vehicles/{{id}}");
        self.send(self.client.get(self.url(&format!("/api/vehicles/{}", id))))
            .await
    }

    /// Create a listing from a raw JSON body; the server validates it
    pub async fn create_vehicle(&self, body: &serde_json::Value) -> Result<VehicleResponse> {
        tracing::debug!("POST /api/vehicles");
        self.send(self.client.post(self.url("/api/vehicles")).json(body))
            .await
    }

    pub async fn set_sold(&self, id: &str, sold: bool) -> Result<VehicleResponse> {
        tracing::debug!(id, sold, "PATCH /api/vehicles/{{id}}");
        let body = serde_json::json!({ "sold": sold });
        self.send(
            self.client
                .patch(self.url(&format!("/api/vehicles/{}", id)))
                .json(&body),
        )
        .await
    }

    pub async fn makes(&self) -> Result<Vec<String>> {
        tracing::debug!("GET /api/filters/makes");
        self.send(self.client.get(self.url("/api/filters/makes"))).await
    }

    pub async fn years(&self) -> Result<Vec<i32>> {
        tracing::debug!("GET /api/filters/years");
        self.send(self.client.get(self.url("/api/filters/years"))).await
    }
}
