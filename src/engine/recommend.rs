//! Rule-based saving recommendations.
//!
//! Three rule groups run in a fixed order: device-specific immediate
//! actions, off-peak scheduling advice, and long-term structural
//! suggestions. The generator is deterministic and emits nothing when no
//! rule fires; "you are in good standing" messaging belongs to the
//! presentation layer.
//!
//! Precondition: `devices` must be the same snapshot the estimate was
//! computed from. The generator does not cross-check the two.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{tariff, Device, DeviceType};
use crate::engine::estimator::ConsumptionEstimate;
use crate::engine::usage::saving_factor;

/// Wattage at or above which an air conditioner triggers an immediate
/// recommendation of its own.
pub const AC_IMMEDIATE_THRESHOLD_W: f64 = 1000.0;

/// Types that draw power around the clock and reward standby discipline.
pub const ALWAYS_ON_TYPES: &[DeviceType] = &[
    DeviceType::Computer,
    DeviceType::Television,
    DeviceType::Router,
];

/// Types worth shifting into the off-peak window.
pub const SHIFTABLE_TYPES: &[DeviceType] = &[DeviceType::WashingMachine, DeviceType::Dishwasher];

/// Total rated power above which the household gets structural advice.
pub const CAPACITY_THRESHOLD_W: f64 = 8000.0;

/// Daily saving at or above which an immediate recommendation is ranked
/// high priority rather than medium.
pub const HIGH_PRIORITY_SAVING_EUR_PER_DAY: f64 = 0.50;

/// Total rated power above which the long-term recommendation itself is
/// urgent.
pub const CAPACITY_URGENT_W: f64 = 12000.0;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecommendationCategory {
    Immediate,
    Scheduling,
    LongTerm,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One piece of advice. Ephemeral: regenerated from the current snapshot,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: Priority,
    pub message: String,
    /// Point estimate in EUR/day where the rule can price one; `None` for
    /// qualitative advice like load shifting.
    pub estimated_saving_eur_per_day: Option<f64>,
    /// Set when the advice targets one specific device.
    pub device_id: Option<Uuid>,
}

/// Generate ranked recommendations for a device snapshot and its estimate.
pub fn recommend(devices: &[Device], estimate: &ConsumptionEstimate) -> Vec<Recommendation> {
    let mut out = Vec::new();
    immediate_actions(devices, estimate, &mut out);
    scheduling_advice(devices, &mut out);
    long_term_advice(devices, &mut out);
    out
}

fn immediate_actions(
    devices: &[Device],
    estimate: &ConsumptionEstimate,
    out: &mut Vec<Recommendation>,
) {
    let mut candidates: Vec<(f64, &Device)> = devices
        .iter()
        .filter(|d| d.is_active() && qualifies_for_immediate(d))
        .map(|d| {
            let daily_cost = estimate.daily_cost_of(d.id).unwrap_or(0.0);
            (saving_factor(d.device_type) * daily_cost, d)
        })
        .collect();

    // rank by what the advice is worth; name breaks ties so equal savings
    // still order the same way on every call
    candidates.sort_by(|(a_saving, a), (b_saving, b)| {
        b_saving
            .total_cmp(a_saving)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    for (saving, device) in candidates {
        let priority = if saving >= HIGH_PRIORITY_SAVING_EUR_PER_DAY {
            Priority::High
        } else {
            Priority::Medium
        };
        out.push(Recommendation {
            category: RecommendationCategory::Immediate,
            priority,
            message: immediate_message(device, saving),
            estimated_saving_eur_per_day: Some(saving),
            device_id: Some(device.id),
        });
    }
}

fn qualifies_for_immediate(device: &Device) -> bool {
    match device.device_type {
        DeviceType::AirConditioning => device.rated_power.as_watts() >= AC_IMMEDIATE_THRESHOLD_W,
        t => ALWAYS_ON_TYPES.contains(&t),
    }
}

fn immediate_message(device: &Device, saving: f64) -> String {
    match device.device_type {
        DeviceType::AirConditioning => format!(
            "{} draws {}; raising the set point to 25-26 C and using eco mode \
             could recover about {:.2} EUR/day",
            device.name, device.rated_power, saving
        ),
        DeviceType::Computer => format!(
            "{} runs long hours; suspend after 30 min idle to recover about \
             {:.2} EUR/day",
            device.name, saving
        ),
        DeviceType::Television => format!(
            "{} spends hours in standby; cutting standby and lowering brightness \
             could recover about {:.2} EUR/day",
            device.name, saving
        ),
        _ => format!(
            "{} is always on; a smart plug with a schedule could recover about \
             {:.2} EUR/day",
            device.name, saving
        ),
    }
}

fn scheduling_advice(devices: &[Device], out: &mut Vec<Recommendation>) {
    for device in devices
        .iter()
        .filter(|d| d.is_active() && SHIFTABLE_TYPES.contains(&d.device_type))
    {
        out.push(Recommendation {
            category: RecommendationCategory::Scheduling,
            priority: Priority::Medium,
            message: format!(
                "Run {} in the off-peak window ({}) to move its consumption out \
                 of the expensive hours",
                device.name,
                tariff::OFF_PEAK_WINDOW
            ),
            estimated_saving_eur_per_day: None,
            device_id: Some(device.id),
        });
    }
}

fn long_term_advice(devices: &[Device], out: &mut Vec<Recommendation>) {
    // aggregate rule over the whole registry, active or not
    let total_w: f64 = devices.iter().map(|d| d.rated_power.as_watts()).sum();
    if total_w < CAPACITY_THRESHOLD_W {
        return;
    }
    let priority = if total_w >= CAPACITY_URGENT_W {
        Priority::High
    } else {
        Priority::Low
    };
    out.push(Recommendation {
        category: RecommendationCategory::LongTerm,
        priority,
        message: format!(
            "Total installed capacity is {:.1} kW; an insulation audit or \
             rooftop solar would cut the baseline bill",
            total_w / 1000.0
        ),
        estimated_saving_eur_per_day: None,
        device_id: None,
    });
}
