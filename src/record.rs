//! Health record value type and blood pressure parsing.
//!
//! A [`HealthRecord`] is created once per submission and never mutated.
//! Its JSON shape is the storage format, so field names are camelCase.

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Storage key of the shared history log. No user may take this id.
pub const HISTORY_KEY: &str = "healthHistory";

/// Display format for `recordedAt` (e.g. `3/14/2024, 9:05:07 AM`).
pub const RECORDED_AT_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Reasons a record cannot be created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("user id must not be empty")]
    EmptyUserId,
    #[error("user id '{0}' is reserved")]
    ReservedUserId(String),
}

/// A single vitals submission.
///
/// Deserialization goes through the same user id checks as construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredRecord")]
pub struct HealthRecord {
    user_id: String,
    blood_pressure: String,
    blood_sugar: u32,
    heart_rate: u32,
    recorded_at: String,
}

/// Record as found in storage, before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    user_id: String,
    blood_pressure: String,
    blood_sugar: u32,
    heart_rate: u32,
    #[serde(alias = "dateTime")]
    recorded_at: String,
}

impl TryFrom<StoredRecord> for HealthRecord {
    type Error = RecordError;

    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        Self::with_timestamp(
            stored.user_id,
            stored.blood_pressure,
            stored.blood_sugar,
            stored.heart_rate,
            stored.recorded_at,
        )
    }
}

impl HealthRecord {
    /// Create a record stamped with the current time on `clock`.
    pub fn new(
        user_id: impl Into<String>,
        blood_pressure: impl Into<String>,
        blood_sugar: u32,
        heart_rate: u32,
        clock: &Clock,
    ) -> Result<Self, RecordError> {
        Self::with_timestamp(
            user_id,
            blood_pressure,
            blood_sugar,
            heart_rate,
            clock.now_label(),
        )
    }

    /// Create a record with an explicit `recordedAt` label.
    pub fn with_timestamp(
        user_id: impl Into<String>,
        blood_pressure: impl Into<String>,
        blood_sugar: u32,
        heart_rate: u32,
        recorded_at: impl Into<String>,
    ) -> Result<Self, RecordError> {
        let user_id = user_id.into();
        validate_user_id(&user_id)?;

        Ok(Self {
            user_id,
            blood_pressure: blood_pressure.into(),
            blood_sugar,
            heart_rate,
            recorded_at: recorded_at.into(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Blood pressure as entered, `"<systolic>/<diastolic>"`.
    pub fn blood_pressure(&self) -> &str {
        &self.blood_pressure
    }

    /// Blood sugar in mg/dL.
    pub fn blood_sugar(&self) -> u32 {
        self.blood_sugar
    }

    /// Heart rate in beats per minute.
    pub fn heart_rate(&self) -> u32 {
        self.heart_rate
    }

    pub fn recorded_at(&self) -> &str {
        &self.recorded_at
    }

    /// Parse the stored blood pressure string.
    pub fn parsed_blood_pressure(&self) -> Result<BloodPressure, BloodPressureError> {
        self.blood_pressure.parse()
    }
}

/// Check that a user id can own a latest-record slot.
pub fn validate_user_id(user_id: &str) -> Result<(), RecordError> {
    if user_id.trim().is_empty() {
        return Err(RecordError::EmptyUserId);
    }
    if user_id == HISTORY_KEY {
        return Err(RecordError::ReservedUserId(user_id.to_string()));
    }
    Ok(())
}

/// A parsed blood pressure reading in mmHg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: u32,
    pub diastolic: u32,
}

/// Why a blood pressure string could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BloodPressureError {
    #[error("expected '<systolic>/<diastolic>', got '{0}'")]
    MissingSeparator(String),
    #[error("'{0}' is not a whole number")]
    InvalidComponent(String),
}

impl BloodPressure {
    /// Parse `"<systolic>/<diastolic>"`. Both halves are required.
    pub fn parse(input: &str) -> Result<Self, BloodPressureError> {
        let mut parts = input.split('/');
        let (Some(systolic), Some(diastolic), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(BloodPressureError::MissingSeparator(input.to_string()));
        };

        Ok(Self {
            systolic: parse_component(systolic)?,
            diastolic: parse_component(diastolic)?,
        })
    }
}

fn parse_component(part: &str) -> Result<u32, BloodPressureError> {
    let part = part.trim();
    part.parse::<u32>()
        .map_err(|_| BloodPressureError::InvalidComponent(part.to_string()))
}

impl FromStr for BloodPressure {
    type Err = BloodPressureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// Source of `recordedAt` labels.
#[derive(Debug, Clone, Default)]
pub enum Clock {
    /// The machine's local timezone.
    #[default]
    Local,
    /// A fixed IANA timezone.
    Zone(Tz),
}

impl Clock {
    /// Label for the current instant.
    pub fn now_label(&self) -> String {
        self.label(Utc::now())
    }

    /// Label for a given instant.
    pub fn label(&self, at: DateTime<Utc>) -> String {
        match self {
            Clock::Local => at.with_timezone(&Local).format(RECORDED_AT_FORMAT).to_string(),
            Clock::Zone(tz) => at.with_timezone(tz).format(RECORDED_AT_FORMAT).to_string(),
        }
    }
}
