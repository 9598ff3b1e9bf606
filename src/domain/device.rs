use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::types::Power;

/// Kinds of household devices the monitor knows usage patterns for.
///
/// `Other` is the catch-all for anything a user registers that has no
/// dedicated usage profile; the estimator falls back to the documented
/// default daily hours for it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceType {
    Refrigerator,
    WashingMachine,
    AirConditioning,
    Television,
    Oven,
    Computer,
    Lighting,
    Dishwasher,
    Router,
    Other,
}

/// On/off state of a device. Transitions happen only through an explicit
/// toggle, never as a side effect of an edit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceStatus {
    Active,
    Inactive,
}

impl DeviceStatus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

/// EU energy efficiency label, A+++ (best) down to G.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EfficiencyRating {
    #[serde(rename = "A+++")]
    APlusPlusPlus,
    #[serde(rename = "A++")]
    APlusPlus,
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl std::fmt::Display for EfficiencyRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::APlusPlusPlus => "A+++",
            Self::APlusPlus => "A++",
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
        };
        write!(f, "{s}")
    }
}

/// A registered device, as stored by the registry and snapshot-read by the
/// estimator. Rated power is always strictly positive (enforced on insert).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub device_type: DeviceType,
    pub rated_power: Power,
    pub status: DeviceStatus,
    pub controllable: bool,
    pub efficiency: EfficiencyRating,
}

impl Device {
    pub fn is_active(&self) -> bool {
        self.status == DeviceStatus::Active
    }

    /// Flip the on/off state. This is the only sanctioned status transition.
    pub fn toggle(&mut self) {
        self.status = self.status.toggled();
    }
}

/// Payload for registering a device. Validated before a [`Device`] is built.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewDevice {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub device_type: DeviceType,
    #[validate(range(exclusive_min = 0.0))]
    pub rated_power_watts: f64,
    #[serde(default)]
    pub controllable: bool,
    pub efficiency: EfficiencyRating,
}

impl NewDevice {
    /// Build the stored device. New devices start `Active`, matching the
    /// behaviour users expect when they register something that is plugged in.
    pub fn into_device(self, user_id: Uuid) -> Device {
        Device {
            id: Uuid::new_v4(),
            user_id,
            name: self.name,
            device_type: self.device_type,
            rated_power: Power::watts(self.rated_power_watts),
            status: DeviceStatus::Active,
            controllable: self.controllable,
            efficiency: self.efficiency,
        }
    }
}

/// Partial edit of a device. Absent fields are left untouched; status is not
/// editable here at all; it only moves through the explicit toggle.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DeviceUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub device_type: Option<DeviceType>,
    #[validate(range(exclusive_min = 0.0))]
    pub rated_power_watts: Option<f64>,
    pub controllable: Option<bool>,
    pub efficiency: Option<EfficiencyRating>,
}

impl DeviceUpdate {
    pub fn apply(self, device: &mut Device) {
        if let Some(name) = self.name {
            device.name = name;
        }
        if let Some(device_type) = self.device_type {
            device.device_type = device_type;
        }
        if let Some(watts) = self.rated_power_watts {
            device.rated_power = Power::watts(watts);
        }
        if let Some(controllable) = self.controllable {
            device.controllable = controllable;
        }
        if let Some(efficiency) = self.efficiency {
            device.efficiency = efficiency;
        }
    }
}

/// Sum of rated power across active devices, used when building requests for
/// the external prediction service.
pub fn total_active_power(devices: &[Device]) -> Power {
    Power::watts(
        devices
            .iter()
            .filter(|d| d.is_active())
            .map(|d| d.rated_power.as_watts())
            .sum(),
    )
}
