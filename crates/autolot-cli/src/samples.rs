//! Sample catalogue for `autolot seed`

use anyhow::{Context, Result};

const SAMPLES_JSON: &str = include_str!("samples.json");

/// Sample listings as create-request bodies
pub fn sample_vehicles() -> Result<Vec<serde_json::Value>> {
    serde_json::from_str(SAMPLES_JSON).context("Failed to parse bundled samples")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_complete_listings() {
        let samples = sample_vehicles().unwrap();
        assert_eq!(samples.len(), 8);
        for sample in &samples {
            for field in ["title", "make", "model", "year", "price", "fuelType", "transmission"] {
                assert!(sample.get(field).is_some(), "missing {} in {}", field, sample);
            }
        }
    }
}
