use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

// ============================================================================
// Physical Unit Newtypes
// ============================================================================

/// Power in Watts (W)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Power(pub f64);

impl Power {
    pub fn watts(w: f64) -> Self {
        Self(w)
    }

    pub fn kilowatts(kw: f64) -> Self {
        Self(kw * 1000.0)
    }

    pub fn as_watts(&self) -> f64 {
        self.0
    }

    pub fn as_kilowatts(&self) -> f64 {
        self.0 / 1000.0
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.abs() >= 1000.0 {
            write!(f, "{:.2} kW", self.as_kilowatts())
        } else {
            write!(f, "{:.1} W", self.0)
        }
    }
}

impl Add for Power {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Power {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Energy in kilowatt-hours (kWh)
///
/// Stored in kWh because every consumption figure in the system (estimates,
/// predictions, tariff maths) is expressed in kWh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Energy(pub f64);

impl Energy {
    pub const ZERO: Energy = Energy(0.0);

    pub fn kilowatt_hours(kwh: f64) -> Self {
        Self(kwh)
    }

    pub fn watt_hours(wh: f64) -> Self {
        Self(wh / 1000.0)
    }

    pub fn as_kilowatt_hours(&self) -> f64 {
        self.0
    }

    pub fn as_watt_hours(&self) -> f64 {
        self.0 * 1000.0
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.abs() >= 1.0 {
            write!(f, "{:.2} kWh", self.0)
        } else {
            write!(f, "{:.1} Wh", self.as_watt_hours())
        }
    }
}

impl Add for Energy {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Energy {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Percentage (0-100%)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Percentage(pub f64);

impl Percentage {
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 100.0))
    }

    pub fn from_ratio(ratio: f64) -> Self {
        Self((ratio * 100.0).clamp(0.0, 100.0))
    }

    pub fn as_percent(&self) -> f64 {
        self.0
    }

    pub fn as_ratio(&self) -> f64 {
        self.0 / 100.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

/// Tariff rate in EUR per kilowatt-hour (EUR/kWh)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct EnergyRate(pub f64);

impl EnergyRate {
    pub fn eur_per_kwh(rate: f64) -> Self {
        Self(rate)
    }

    pub fn as_eur_per_kwh(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for EnergyRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} EUR/kWh", self.0)
    }
}

impl Mul<Energy> for EnergyRate {
    type Output = f64; // Cost in EUR
    fn mul(self, energy: Energy) -> Self::Output {
        self.0 * energy.as_kilowatt_hours()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_conversions() {
        let power = Power::kilowatts(2.0);
        assert_eq!(power.as_watts(), 2000.0);
        assert_eq!(power.as_kilowatts(), 2.0);

        let power2 = Power::watts(150.0);
        assert_eq!(power2.as_kilowatts(), 0.15);
    }

    #[test]
    fn test_power_arithmetic() {
        let p1 = Power::watts(1500.0);
        let p2 = Power::watts(500.0);

        assert_eq!((p1 + p2).as_watts(), 2000.0);
        assert_eq!((p1 - p2).as_watts(), 1000.0);
    }

    #[test]
    fn test_power_display() {
        assert_eq!(format!("{}", Power::watts(150.0)), "150.0 W");
        assert_eq!(format!("{}", Power::watts(2000.0)), "2.00 kW");
    }

    #[test]
    fn test_energy_conversions() {
        let energy = Energy::kilowatt_hours(5.6);
        assert_eq!(energy.as_watt_hours(), 5600.0);

        let energy2 = Energy::watt_hours(500.0);
        assert_eq!(energy2.as_kilowatt_hours(), 0.5);
    }

    #[test]
    fn test_energy_arithmetic() {
        let e1 = Energy::kilowatt_hours(3.6);
        let e2 = Energy::kilowatt_hours(2.0);

        assert_eq!((e1 + e2).as_kilowatt_hours(), 5.6);
        assert!(((e1 - e2).as_kilowatt_hours() - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_energy_display() {
        assert_eq!(format!("{}", Energy::kilowatt_hours(5.6)), "5.60 kWh");
        assert_eq!(format!("{}", Energy::watt_hours(500.0)), "500.0 Wh");
    }

    #[test]
    fn test_percentage_clamping() {
        assert_eq!(Percentage::new(88.9).as_percent(), 88.9);
        assert_eq!(Percentage::new(150.0).as_percent(), 100.0);
        assert_eq!(Percentage::new(-10.0).as_percent(), 0.0);
        assert_eq!(Percentage::from_ratio(0.5).as_percent(), 50.0);
    }

    #[test]
    fn test_rate_energy_multiplication() {
        let rate = EnergyRate::eur_per_kwh(0.15);
        let energy = Energy::kilowatt_hours(10.0);
        let cost = rate * energy;
        assert!((cost - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_serialization() {
        let energy = Energy::kilowatt_hours(5.6);
        let json = serde_json::to_string(&energy).unwrap();
        assert_eq!(json, "5.6");
        let deserialized: Energy = serde_json::from_str(&json).unwrap();
        assert_eq!(energy, deserialized);

        let rate = EnergyRate::eur_per_kwh(0.15);
        let json = serde_json::to_string(&rate).unwrap();
        let deserialized: EnergyRate = serde_json::from_str(&json).unwrap();
        assert_eq!(rate, deserialized);
    }
}
