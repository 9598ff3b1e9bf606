//! Usage profiles per device type.
//!
//! These two tables are the tunables the whole estimator hangs off. They
//! exist exactly once; every consumer (estimator, recommender, UI) goes
//! through the accessors rather than restating the numbers.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::domain::DeviceType;

/// Assumed daily hours of operation for device types without a profile.
/// This default is deliberate, not a fallthrough: unknown appliances are
/// treated as moderate-use (4 h/day).
pub const DEFAULT_USAGE_HOURS: f64 = 4.0;

/// Fraction of a device's own cost assumed recoverable when no type-specific
/// saving factor is known.
pub const DEFAULT_SAVING_FACTOR: f64 = 0.15;

static USAGE_HOURS: Lazy<HashMap<DeviceType, f64>> = Lazy::new(|| {
    HashMap::from([
        (DeviceType::Refrigerator, 24.0),
        (DeviceType::Television, 6.0),
        (DeviceType::WashingMachine, 1.0),
        (DeviceType::AirConditioning, 4.0),
        (DeviceType::Computer, 8.0),
        (DeviceType::Oven, 0.5),
        (DeviceType::Lighting, 8.0),
        (DeviceType::Dishwasher, 1.0),
        (DeviceType::Router, 24.0),
    ])
});

static SAVING_FACTORS: Lazy<HashMap<DeviceType, f64>> = Lazy::new(|| {
    HashMap::from([
        (DeviceType::Refrigerator, 0.10),
        (DeviceType::WashingMachine, 0.25),
        (DeviceType::Television, 0.15),
        (DeviceType::AirConditioning, 0.30),
        (DeviceType::Computer, 0.20),
        (DeviceType::Lighting, 0.40),
        (DeviceType::Oven, 0.15),
        (DeviceType::Dishwasher, 0.20),
    ])
});

/// Assumed daily usage hours for a device type.
pub fn usage_hours(device_type: DeviceType) -> f64 {
    USAGE_HOURS
        .get(&device_type)
        .copied()
        .unwrap_or(DEFAULT_USAGE_HOURS)
}

/// Fraction of a device's own daily cost recoverable through the
/// type-specific advice the recommender emits.
pub fn saving_factor(device_type: DeviceType) -> f64 {
    SAVING_FACTORS
        .get(&device_type)
        .copied()
        .unwrap_or(DEFAULT_SAVING_FACTOR)
}
