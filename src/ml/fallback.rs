use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::{PredictionForecast, PredictionPoint, PredictionProvider, PredictionRequest};
use crate::domain::{tariff, Device, EnergyRate};
use crate::engine::estimator::estimate;

/// Model tag reported by heuristic forecasts, so consumers can tell them
/// apart from the trained models.
pub const HEURISTIC_MODEL_TYPE: &str = "heuristic_estimator";

/// Drop-in replacement for the prediction service, built on the consumption
/// estimator. Constructed per request with the snapshot the caller already
/// holds.
pub struct HeuristicPredictor {
    devices: Vec<Device>,
}

impl HeuristicPredictor {
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }
}

#[async_trait]
impl PredictionProvider for HeuristicPredictor {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionForecast> {
        // the rate only affects cost, which a forecast does not carry
        let rate = EnergyRate::eur_per_kwh(tariff::DEFAULT_RATE_EUR_PER_KWH);
        let est = estimate(&self.devices, request.hours_ahead as f64, rate)?;

        let hourly_kwh = if request.hours_ahead == 0 {
            0.0
        } else {
            est.energy.as_kilowatt_hours() / request.hours_ahead as f64
        };

        let start = Utc::now();
        let predictions = (0..request.hours_ahead)
            .map(|i| PredictionPoint {
                timestamp: start + Duration::hours(i as i64),
                predicted_consumption: hourly_kwh,
            })
            .collect();

        Ok(PredictionForecast {
            predictions,
            model_type: HEURISTIC_MODEL_TYPE.to_string(),
        })
    }
}

/// Primary-then-fallback composition.
///
/// Tries the primary provider once; on any failure (timeout included, via
/// the client's own deadline) it answers from the fallback instead. This is
/// where the service's unavailability is absorbed; nothing below this layer
/// retries or falls back on its own.
pub struct FallbackPredictor {
    primary: Box<dyn PredictionProvider>,
    fallback: Box<dyn PredictionProvider>,
}

impl FallbackPredictor {
    pub fn new(primary: Box<dyn PredictionProvider>, fallback: Box<dyn PredictionProvider>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl PredictionProvider for FallbackPredictor {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionForecast> {
        match self.primary.predict(request).await {
            Ok(forecast) => Ok(forecast),
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "prediction service unavailable, answering from the heuristic estimator"
                );
                self.fallback.predict(request).await
            }
        }
    }
}
