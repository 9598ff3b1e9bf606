//! Tariff period classification.
//!
//! Spanish-style three-band tariff: the day is partitioned into peak
//! (punta), standard (llano) and off-peak (valle) hours. The bands cover
//! all 24 hours with no gaps or overlaps, 8 hours each.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Default tariff applied when a user has not configured their own rate.
pub const DEFAULT_RATE_EUR_PER_KWH: f64 = 0.15;

/// Household timezone used to resolve an instant to an hour of day when the
/// caller has not configured one. Hours are always classified in local time,
/// never in UTC.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Madrid;

/// The off-peak window, for user-facing scheduling advice.
pub const OFF_PEAK_WINDOW: &str = "00:00-08:00";

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
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TariffPeriod {
    Peak,
    Standard,
    OffPeak,
}

impl TariffPeriod {
    /// How many of the day's 24 hours fall in this period.
    pub fn hours_per_day(self) -> u32 {
        match self {
            // [10,14) and [18,22)
            Self::Peak => 8,
            // [8,10), [14,18) and [22,24)
            Self::Standard => 8,
            // [0,8)
            Self::OffPeak => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TariffError {
    #[error("hour of day out of range: {hour} (expected 0..=23)")]
    InvalidHour { hour: u32 },
}

/// Classify an hour of day into its tariff period.
///
/// Input is validated strictly: hours outside `0..=23` are rejected rather
/// than normalized, so a caller passing a raw offset by mistake fails loudly.
pub fn classify(hour: u32) -> Result<TariffPeriod, TariffError> {
    let period = match hour {
        10..=13 | 18..=21 => TariffPeriod::Peak,
        8..=9 | 14..=17 | 22..=23 => TariffPeriod::Standard,
        0..=7 => TariffPeriod::OffPeak,
        _ => return Err(TariffError::InvalidHour { hour }),
    };
    Ok(period)
}

/// Classify an instant by its local hour of day in the given timezone.
///
/// Consumption records carry UTC instants; the tariff bands are defined on
/// the household clock, so the conversion happens here and nowhere else.
pub fn classify_at(instant: DateTime<Utc>, tz: Tz) -> TariffPeriod {
    let hour = instant.with_timezone(&tz).hour();
    // chrono guarantees hour() is in 0..=23
    classify(hour).unwrap_or(TariffPeriod::OffPeak)
}
