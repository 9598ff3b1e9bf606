//! Consumption estimation.
//!
//! Pure arithmetic over a device snapshot: no I/O, no clock, no randomness.
//! Given the same inputs the estimate is always the same; simulated jitter,
//! if a deployment wants it, lives in the [`noise`](crate::engine::noise)
//! decorator at the presentation boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::{Device, DeviceType, Energy, EnergyRate, TariffPeriod};
use crate::engine::usage::usage_hours;

pub const HOURS_PER_DAY: f64 = 24.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimateError {
    #[error("device '{name}' has non-positive rated power ({watts} W)")]
    NonPositivePower { name: String, watts: f64 },

    #[error("horizon must be a non-negative number of hours, got {0}")]
    InvalidHorizon(f64),

    #[error("tariff rate must be a non-negative number, got {0} EUR/kWh")]
    InvalidRate(f64),
}

/// Estimated consumption over a horizon, with the breakdowns the dashboard
/// and the recommender consume. Ephemeral: recomputed per request, never
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionEstimate {
    pub horizon_hours: f64,
    pub energy: Energy,
    pub cost_eur: f64,
    pub rate: EnergyRate,
    pub by_device: BTreeMap<Uuid, Energy>,
    pub by_type: BTreeMap<DeviceType, Energy>,
}

impl ConsumptionEstimate {
    /// A device's contribution scaled back to one day and priced, for
    /// per-device saving figures. `None` when the device was not part of the
    /// estimated snapshot.
    pub fn daily_cost_of(&self, device_id: Uuid) -> Option<f64> {
        let contribution = self.by_device.get(&device_id)?;
        if self.horizon_hours <= 0.0 {
            return Some(0.0);
        }
        let daily_kwh = contribution.as_kilowatt_hours() * HOURS_PER_DAY / self.horizon_hours;
        Some(self.rate * Energy::kilowatt_hours(daily_kwh))
    }

    /// Bucket the estimate's energy into the three tariff periods, assuming
    /// a uniform hourly spread across the day.
    pub fn period_breakdown(&self) -> BTreeMap<TariffPeriod, Energy> {
        [
            TariffPeriod::Peak,
            TariffPeriod::Standard,
            TariffPeriod::OffPeak,
        ]
        .into_iter()
        .map(|period| {
            let share =
                self.energy.as_kilowatt_hours() * period.hours_per_day() as f64 / HOURS_PER_DAY;
            (period, Energy::kilowatt_hours(share))
        })
        .collect()
    }
}

/// Estimate consumption and cost for a device snapshot over `horizon_hours`.
///
/// Only `Active` devices contribute; inactive ones count for zero, always.
/// Each active device contributes
/// `rated_kw * usage_hours(type) * horizon_hours / 24`, and the total cost is
/// exactly `energy * rate`. An empty or all-inactive snapshot yields a zero
/// estimate, not an error; "no data" versus "zero consumption" is the
/// presentation layer's distinction to draw.
pub fn estimate(
    devices: &[Device],
    horizon_hours: f64,
    rate: EnergyRate,
) -> Result<ConsumptionEstimate, EstimateError> {
    if !horizon_hours.is_finite() || horizon_hours < 0.0 {
        return Err(EstimateError::InvalidHorizon(horizon_hours));
    }
    let rate_value = rate.as_eur_per_kwh();
    if !rate_value.is_finite() || rate_value < 0.0 {
        return Err(EstimateError::InvalidRate(rate_value));
    }
    for device in devices {
        let watts = device.rated_power.as_watts();
        if !watts.is_finite() || watts <= 0.0 {
            return Err(EstimateError::NonPositivePower {
                name: device.name.clone(),
                watts,
            });
        }
    }

    let mut by_device = BTreeMap::new();
    let mut by_type: BTreeMap<DeviceType, Energy> = BTreeMap::new();
    let mut total_kwh = 0.0;

    for device in devices.iter().filter(|d| d.is_active()) {
        let daily_kwh = device.rated_power.as_kilowatts() * usage_hours(device.device_type);
        let contribution = daily_kwh * horizon_hours / HOURS_PER_DAY;

        total_kwh += contribution;
        by_device.insert(device.id, Energy::kilowatt_hours(contribution));
        let slot = by_type.entry(device.device_type).or_insert(Energy::ZERO);
        *slot = *slot + Energy::kilowatt_hours(contribution);
    }

    let energy = Energy::kilowatt_hours(total_kwh);
    Ok(ConsumptionEstimate {
        horizon_hours,
        energy,
        cost_eur: rate * energy,
        rate,
        by_device,
        by_type,
    })
}
