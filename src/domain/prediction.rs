//! Prediction bookkeeping.
//!
//! A stored prediction starts `Pending` and is later reconciled against the
//! measured consumption, which computes its precision and may validate or
//! invalidate it. Independently of reconciliation, every prediction expires
//! once its target time plus a horizon-dependent grace window has passed.
//! `Expired` is terminal.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{Energy, Percentage};

/// Precision at or above which a reconciled prediction is considered correct.
pub const VALIDATION_THRESHOLD_PERCENT: f64 = 85.0;

/// Precision below which a reconciled prediction is considered wrong.
/// Between the two thresholds the record stays `Pending`: the measurement
/// neither confirmed nor refuted it, and a later reading may settle it.
pub const REJECTION_THRESHOLD_PERCENT: f64 = 60.0;

/// Time span a prediction covers.
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
pub enum Horizon {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl Horizon {
    /// Last instant at which a prediction targeting `target_time` can still
    /// be reconciled. Monthly predictions use calendar months, not a fixed
    /// number of days.
    pub fn expiry_deadline(self, target_time: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Hourly => target_time + Duration::hours(2),
            Self::Daily => target_time + Duration::days(1),
            Self::Weekly => target_time + Duration::days(7),
            Self::Monthly => target_time
                .checked_add_months(Months::new(1))
                .unwrap_or_else(|| target_time + Duration::days(31)),
        }
    }
}

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
pub enum PredictionState {
    Pending,
    Validated,
    Incorrect,
    Expired,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("predicted consumption must be non-negative, got {0} kWh")]
    NegativePrediction(f64),

    #[error("measured consumption must be non-negative, got {0} kWh")]
    NegativeMeasurement(f64),

    #[error("prediction {id} is {state} and can no longer be reconciled")]
    AlreadyResolved { id: Uuid, state: PredictionState },
}

/// A stored prediction and its reconciliation state.
///
/// Records are historical: they are never deleted, only moved through the
/// state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub predicted: Energy,
    pub real: Option<Energy>,
    pub state: PredictionState,
    pub horizon: Horizon,
    pub created_at: DateTime<Utc>,
    pub target_time: DateTime<Utc>,
    /// Only set once a real measurement has been reconciled.
    pub precision: Option<Percentage>,
    /// Which model produced the prediction (external model tag or the
    /// heuristic estimator's).
    pub model: String,
}

impl PredictionRecord {
    pub fn new(
        predicted: Energy,
        horizon: Horizon,
        target_time: DateTime<Utc>,
        model: impl Into<String>,
    ) -> Result<Self, PredictionError> {
        let kwh = predicted.as_kilowatt_hours();
        if !kwh.is_finite() || kwh < 0.0 {
            return Err(PredictionError::NegativePrediction(kwh));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            predicted,
            real: None,
            state: PredictionState::Pending,
            horizon,
            created_at: Utc::now(),
            target_time,
            precision: None,
            model: model.into(),
        })
    }

    /// Record the measured consumption and settle the prediction.
    ///
    /// Precision is `max(0, 100 - |real - predicted| / real * 100)`. At or
    /// above [`VALIDATION_THRESHOLD_PERCENT`] the record becomes `Validated`;
    /// below [`REJECTION_THRESHOLD_PERCENT`] it becomes `Incorrect`; in
    /// between it stays `Pending` and may be reconciled again with a later
    /// measurement.
    ///
    /// Reconciling a record that has already been settled or has expired is
    /// rejected with [`PredictionError::AlreadyResolved`]; measurements
    /// never silently rewrite history.
    pub fn reconcile(&mut self, real: Energy) -> Result<(), PredictionError> {
        if self.state != PredictionState::Pending {
            return Err(PredictionError::AlreadyResolved {
                id: self.id,
                state: self.state,
            });
        }
        let real_kwh = real.as_kilowatt_hours();
        if !real_kwh.is_finite() || real_kwh < 0.0 {
            return Err(PredictionError::NegativeMeasurement(real_kwh));
        }

        let precision = precision_of(self.predicted, real);
        self.real = Some(real);
        self.precision = Some(precision);
        self.state = if precision.as_percent() >= VALIDATION_THRESHOLD_PERCENT {
            PredictionState::Validated
        } else if precision.as_percent() < REJECTION_THRESHOLD_PERCENT {
            PredictionState::Incorrect
        } else {
            PredictionState::Pending
        };
        Ok(())
    }

    /// Expire the record if its grace window has passed.
    ///
    /// Applies from any state, is idempotent, and `Expired` is sticky. Safe
    /// to run lazily on read or from a periodic sweep. Returns whether the
    /// record transitioned on this call.
    pub fn check_expiry(&mut self, now: DateTime<Utc>) -> bool {
        if self.state == PredictionState::Expired {
            return false;
        }
        if self.horizon.expiry_deadline(self.target_time) < now {
            self.state = PredictionState::Expired;
            return true;
        }
        false
    }
}

/// Precision of a prediction against a measurement, on the 0-100 scale.
///
/// The formula divides by the real value, so the zero-measurement edge is
/// settled explicitly: a zero prediction against a zero measurement is a
/// perfect hit, any other prediction against a zero measurement scores 0.
fn precision_of(predicted: Energy, real: Energy) -> Percentage {
    let p = predicted.as_kilowatt_hours();
    let r = real.as_kilowatt_hours();
    if r == 0.0 {
        return if p == 0.0 {
            Percentage::new(100.0)
        } else {
            Percentage::new(0.0)
        };
    }
    Percentage::new(100.0 - (r - p).abs() / r * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(predicted_kwh: f64, horizon: Horizon) -> PredictionRecord {
        PredictionRecord::new(
            Energy::kilowatt_hours(predicted_kwh),
            horizon,
            Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
            "uk_dale_trained",
        )
        .unwrap()
    }

    #[test]
    fn test_new_record_is_pending() {
        let rec = record(10.0, Horizon::Hourly);
        assert_eq!(rec.state, PredictionState::Pending);
        assert!(rec.real.is_none());
        assert!(rec.precision.is_none());
    }

    #[test]
    fn test_negative_prediction_rejected() {
        let err = PredictionRecord::new(
            Energy::kilowatt_hours(-1.0),
            Horizon::Daily,
            Utc::now(),
            "heuristic",
        )
        .unwrap_err();
        assert_eq!(err, PredictionError::NegativePrediction(-1.0));
    }

    #[test]
    fn test_accurate_reconciliation_validates() {
        // predicted 10, real 9: precision = 100 - 1/9*100 ~= 88.9 -> validated
        let mut rec = record(10.0, Horizon::Daily);
        rec.reconcile(Energy::kilowatt_hours(9.0)).unwrap();
        assert_eq!(rec.state, PredictionState::Validated);
        let precision = rec.precision.unwrap().as_percent();
        assert!((precision - 88.888).abs() < 0.01, "precision {precision}");
    }

    #[test]
    fn test_wild_reconciliation_invalidates() {
        // predicted 10, real 5: precision = 100 - 5/5*100 = 0 -> incorrect
        let mut rec = record(10.0, Horizon::Daily);
        rec.reconcile(Energy::kilowatt_hours(5.0)).unwrap();
        assert_eq!(rec.state, PredictionState::Incorrect);
        assert_eq!(rec.precision.unwrap().as_percent(), 0.0);
    }

    #[test]
    fn test_middle_band_stays_pending_and_can_retry() {
        // predicted 10, real 8: precision = 100 - 2/8*100 = 75 -> still pending
        let mut rec = record(10.0, Horizon::Daily);
        rec.reconcile(Energy::kilowatt_hours(8.0)).unwrap();
        assert_eq!(rec.state, PredictionState::Pending);
        assert_eq!(rec.precision.unwrap().as_percent(), 75.0);

        // a later, closer measurement settles it
        rec.reconcile(Energy::kilowatt_hours(9.5)).unwrap();
        assert_eq!(rec.state, PredictionState::Validated);
    }

    #[test]
    fn test_settled_record_rejects_reconciliation() {
        let mut rec = record(10.0, Horizon::Daily);
        rec.reconcile(Energy::kilowatt_hours(10.0)).unwrap();
        assert_eq!(rec.state, PredictionState::Validated);

        let err = rec.reconcile(Energy::kilowatt_hours(2.0)).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::AlreadyResolved {
                state: PredictionState::Validated,
                ..
            }
        ));
        // the stored measurement is untouched
        assert_eq!(rec.real, Some(Energy::kilowatt_hours(10.0)));
    }

    #[test]
    fn test_zero_measurement_edges() {
        let mut hit = record(0.0, Horizon::Hourly);
        hit.reconcile(Energy::ZERO).unwrap();
        assert_eq!(hit.state, PredictionState::Validated);
        assert_eq!(hit.precision.unwrap().as_percent(), 100.0);

        let mut miss = record(3.0, Horizon::Hourly);
        miss.reconcile(Energy::ZERO).unwrap();
        assert_eq!(miss.state, PredictionState::Incorrect);
        assert_eq!(miss.precision.unwrap().as_percent(), 0.0);
    }

    #[test]
    fn test_grace_windows() {
        let target = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(
            Horizon::Hourly.expiry_deadline(target),
            Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap()
        );
        assert_eq!(
            Horizon::Daily.expiry_deadline(target),
            Utc.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap()
        );
        assert_eq!(
            Horizon::Weekly.expiry_deadline(target),
            Utc.with_ymd_and_hms(2024, 3, 17, 12, 0, 0).unwrap()
        );
        // calendar month, not 30 days
        assert_eq!(
            Horizon::Monthly.expiry_deadline(target),
            Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_expiry_applies_from_any_state_and_sticks() {
        let target = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 3, 10, 13, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap();

        let mut rec = record(10.0, Horizon::Hourly);
        assert!(!rec.check_expiry(before));
        assert_eq!(rec.state, PredictionState::Pending);

        rec.reconcile(Energy::kilowatt_hours(10.0)).unwrap();
        assert!(rec.check_expiry(after));
        assert_eq!(rec.state, PredictionState::Expired);

        // idempotent, and no way back out
        assert!(!rec.check_expiry(after));
        assert_eq!(rec.state, PredictionState::Expired);
        assert!(rec.reconcile(Energy::kilowatt_hours(10.0)).is_err());
    }

    #[test]
    fn test_expired_record_rejects_reconciliation() {
        let after = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let mut rec = record(10.0, Horizon::Hourly);
        rec.check_expiry(after);
        assert_eq!(rec.state, PredictionState::Expired);

        let err = rec.reconcile(Energy::kilowatt_hours(9.0)).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::AlreadyResolved {
                state: PredictionState::Expired,
                ..
            }
        ));
        assert!(rec.real.is_none());
    }
}
