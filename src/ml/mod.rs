//! Boundary to the external consumption-prediction service.
//!
//! The service itself is a collaborator outside this crate; what lives here
//! is its request/response contract, the HTTP client, and the fallback
//! composition that keeps predictions flowing when the service is down.

pub mod client;
pub mod fallback;

pub use client::*;
pub use fallback::*;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{total_active_power, Device};

/// Request accepted by the prediction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub hours_ahead: u32,
    /// A specific device type, or `"aggregate"` for the whole household.
    pub device_type: String,
    pub temperature: f64,
    pub humidity: f64,
    pub occupancy: u32,
    pub house_size: f64,
    /// Sum of rated power across active devices, in watts.
    pub total_device_power: f64,
}

impl Default for PredictionRequest {
    fn default() -> Self {
        Self {
            hours_ahead: 24,
            device_type: "aggregate".to_string(),
            temperature: 20.0,
            humidity: 60.0,
            occupancy: 2,
            house_size: 100.0,
            total_device_power: 0.0,
        }
    }
}

impl PredictionRequest {
    /// An aggregate request for the given device snapshot.
    pub fn for_devices(devices: &[Device], hours_ahead: u32) -> Self {
        Self {
            hours_ahead,
            total_device_power: total_active_power(devices).as_watts(),
            ..Self::default()
        }
    }
}

/// One predicted hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub timestamp: DateTime<Utc>,
    /// kWh expected over the hour starting at `timestamp`.
    pub predicted_consumption: f64,
}

/// Response shape shared by the external service and the heuristic fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionForecast {
    pub predictions: Vec<PredictionPoint>,
    pub model_type: String,
}

impl PredictionForecast {
    pub fn total_kwh(&self) -> f64 {
        self.predictions
            .iter()
            .map(|p| p.predicted_consumption)
            .sum()
    }
}

/// Anything that can answer a prediction request: the remote service, the
/// heuristic estimator, or a composition of the two.
#[async_trait]
pub trait PredictionProvider: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionForecast>;
}
