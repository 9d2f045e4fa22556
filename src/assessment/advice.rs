//! Static diet and activity suggestions keyed on a single vital.

use serde::{Deserialize, Serialize};

/// Blood sugar above this gets the low-glycemic diet (mg/dL).
pub const DIET_SUGAR_LIMIT: u32 = 140;
/// Heart rate below this gets the aerobic activity plan (bpm).
pub const ACTIVITY_HEART_RATE_LOW: u32 = 60;

const LOW_GLYCEMIC_DIET: &str = "Focus on low-glycemic foods: leafy greens, whole grains, and legumes. Avoid sugary snacks and drinks.";
const BALANCED_DIET: &str =
    "Maintain a balanced diet with plenty of fruits, vegetables, and whole grains.";
const AEROBIC_ACTIVITY: &str = "Engage in moderate aerobic activities like brisk walking or cycling for at least 150 minutes a week.";
const STRENGTH_ACTIVITY: &str =
    "Incorporate strength training exercises at least twice a week along with aerobic activities.";

/// Diet suggestion for a blood sugar reading.
pub fn diet_advice(blood_sugar: u32) -> &'static str {
    if blood_sugar > DIET_SUGAR_LIMIT {
        LOW_GLYCEMIC_DIET
    } else {
        BALANCED_DIET
    }
}

/// Activity suggestion for a heart rate reading.
///
/// Only a low heart rate changes the plan; high and normal rates share one.
pub fn activity_advice(heart_rate: u32) -> &'static str {
    if heart_rate < ACTIVITY_HEART_RATE_LOW {
        AEROBIC_ACTIVITY
    } else {
        STRENGTH_ACTIVITY
    }
}

/// Both suggestions for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub diet: String,
    pub activity: String,
}

impl Advice {
    pub fn for_vitals(blood_sugar: u32, heart_rate: u32) -> Self {
        Self {
            diet: diet_advice(blood_sugar).to_string(),
            activity: activity_advice(heart_rate).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diet_boundary() {
        assert_ne!(diet_advice(141), diet_advice(140));
        assert_eq!(diet_advice(140), BALANCED_DIET);
        assert_eq!(diet_advice(141), LOW_GLYCEMIC_DIET);
        assert_eq!(diet_advice(0), BALANCED_DIET);
    }

    #[test]
    fn test_activity_boundary() {
        assert_ne!(activity_advice(59), activity_advice(60));
        assert_eq!(activity_advice(59), AEROBIC_ACTIVITY);
        assert_eq!(activity_advice(60), STRENGTH_ACTIVITY);
    }

    #[test]
    fn test_high_heart_rate_gets_normal_plan() {
        assert_eq!(activity_advice(130), activity_advice(75));
    }

    #[test]
    fn test_advice_bundle() {
        let advice = Advice::for_vitals(150, 50);
        assert!(advice.diet.contains("low-glycemic"));
        assert!(advice.activity.contains("brisk walking"));
    }
}
