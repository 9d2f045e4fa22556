//! Threshold-based risk assessment over a single set of vitals.

use crate::record::{BloodPressure, HealthRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown when no risk factor is raised.
pub const NORMAL_RANGES_MESSAGE: &str = "Your health metrics are within normal ranges. Keep it up!";

/// Systolic pressure above this is hypertensive (mmHg).
pub const SYSTOLIC_LIMIT: u32 = 140;
/// Diastolic pressure above this is hypertensive (mmHg).
pub const DIASTOLIC_LIMIT: u32 = 90;
/// Blood sugar above this is hyperglycemic (mg/dL).
pub const BLOOD_SUGAR_LIMIT: u32 = 140;
/// Heart rate below this is abnormal (bpm).
pub const HEART_RATE_LOW: u32 = 60;
/// Heart rate above this is abnormal (bpm).
pub const HEART_RATE_HIGH: u32 = 100;

/// A named condition flagged by one of the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Hypertension,
    Hyperglycemia,
    AbnormalHeartRate,
}

impl RiskFactor {
    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::Hypertension => "High Blood Pressure (Hypertension)",
            RiskFactor::Hyperglycemia => "High Blood Sugar (Hyperglycemia)",
            RiskFactor::AbnormalHeartRate => "Abnormal Heart Rate",
        }
    }

    /// Advisory text paired with this factor.
    pub fn precaution(&self) -> &'static str {
        match self {
            RiskFactor::Hypertension => "Consider reducing salt intake and consult a doctor.",
            RiskFactor::Hyperglycemia => {
                "Maintain a balanced diet and consult a healthcare provider."
            }
            RiskFactor::AbnormalHeartRate => {
                "Engage in regular exercise and check with a physician."
            }
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of evaluating one set of vitals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Raised factors, always in blood pressure, sugar, heart rate order
    pub factors: Vec<RiskFactor>,
    /// Blood pressure could not be read, so it was not checked
    pub blood_pressure_unreadable: bool,
}

impl RiskReport {
    /// True when no factor was raised.
    pub fn is_normal(&self) -> bool {
        self.factors.is_empty()
    }

    /// `(factor, precaution)` pairs in rule order.
    pub fn findings(&self) -> Vec<(&'static str, &'static str)> {
        self.factors
            .iter()
            .map(|f| (f.label(), f.precaution()))
            .collect()
    }
}

impl fmt::Display for RiskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_normal() {
            return f.write_str(NORMAL_RANGES_MESSAGE);
        }

        writeln!(f, "Risk Factors:")?;
        for factor in &self.factors {
            writeln!(f, "  - {}.", factor.label())?;
        }
        writeln!(f)?;
        writeln!(f, "Precautions:")?;
        for factor in &self.factors {
            writeln!(f, "  - {}", factor.precaution())?;
        }
        Ok(())
    }
}

/// Evaluate the three vitals against the fixed rule table.
///
/// An unreadable blood pressure raises no factor; the report notes it
/// instead.
pub fn evaluate(blood_pressure: &str, blood_sugar: u32, heart_rate: u32) -> RiskReport {
    let mut factors = Vec::new();

    let blood_pressure_unreadable = match BloodPressure::parse(blood_pressure) {
        Ok(bp) => {
            if bp.systolic > SYSTOLIC_LIMIT || bp.diastolic > DIASTOLIC_LIMIT {
                factors.push(RiskFactor::Hypertension);
            }
            false
        }
        Err(e) => {
            tracing::warn!("Skipping blood pressure check: {e}");
            true
        }
    };

    if blood_sugar > BLOOD_SUGAR_LIMIT {
        factors.push(RiskFactor::Hyperglycemia);
    }

    if !(HEART_RATE_LOW..=HEART_RATE_HIGH).contains(&heart_rate) {
        factors.push(RiskFactor::AbnormalHeartRate);
    }

    RiskReport {
        factors,
        blood_pressure_unreadable,
    }
}

/// Evaluate a stored record.
pub fn evaluate_record(record: &HealthRecord) -> RiskReport {
    evaluate(
        record.blood_pressure(),
        record.blood_sugar(),
        record.heart_rate(),
    )
}
