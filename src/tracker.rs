//! Submission and dashboard flows over a record store.
//!
//! ```text
//! submit ──▶ RecordStore::save ──┬──▶ risk::evaluate
//!                                ├──▶ Advice::for_vitals
//!                                ├──▶ HospitalDirectory::suggest
//!                                └──▶ ChartSeries::build (user history)
//! ```

use crate::assessment::{evaluate, Advice, RiskReport};
use crate::directory::{Directory, Hospital};
use crate::record::{Clock, HealthRecord, RecordError};
use crate::store::{KeyValueStore, RecordStore, StoreError};
use crate::trend::ChartSeries;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown in place of a latest record when a user has none.
pub const NO_DATA_MESSAGE: &str = "No data yet.";

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TrackerError {
    /// Whether the caller supplied bad input rather than storage failing.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            TrackerError::Record(_) | TrackerError::Store(StoreError::InvalidRecord(_))
        )
    }
}

/// Raw form inputs for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub user_id: String,
    pub blood_pressure: String,
    pub blood_sugar: u32,
    pub heart_rate: u32,
}

/// Risk report and advice for one set of vitals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub risk: RiskReport,
    pub advice: Advice,
    pub hospitals: Vec<Hospital>,
}

impl Assessment {
    /// Evaluate vitals and pick hospitals from `directory`.
    pub fn new(
        blood_pressure: &str,
        blood_sugar: u32,
        heart_rate: u32,
        directory: &Directory,
    ) -> Self {
        Self {
            risk: evaluate(blood_pressure, blood_sugar, heart_rate),
            advice: Advice::for_vitals(blood_sugar, heart_rate),
            hospitals: directory.hospitals.suggest(blood_pressure, blood_sugar).to_vec(),
        }
    }
}

/// Everything produced by a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub record: HealthRecord,
    pub assessment: Assessment,
    pub trend: ChartSeries,
}

/// Latest record for a user, or nothing yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "record", rename_all = "snake_case")]
pub enum LatestRecord {
    Found(HealthRecord),
    NoData,
}

impl LatestRecord {
    pub fn as_record(&self) -> Option<&HealthRecord> {
        match self {
            LatestRecord::Found(r) => Some(r),
            LatestRecord::NoData => None,
        }
    }
}

/// Initial-load view for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub user_id: String,
    pub latest: LatestRecord,
    pub trend: ChartSeries,
}

/// Ties the store, rules and directory together.
pub struct HealthTracker<S> {
    store: RecordStore<S>,
    directory: Directory,
    clock: Clock,
}

impl<S: KeyValueStore> HealthTracker<S> {
    pub fn new(backend: S, directory: Directory, clock: Clock) -> Self {
        Self {
            store: RecordStore::new(backend),
            directory,
            clock,
        }
    }

    /// Store a submission and assess it.
    pub fn submit(&mut self, submission: Submission) -> Result<SubmissionOutcome, TrackerError> {
        let record = HealthRecord::new(
            submission.user_id,
            submission.blood_pressure,
            submission.blood_sugar,
            submission.heart_rate,
            &self.clock,
        )?;

        self.store.save(&record)?;

        let assessment = self.assess(
            record.blood_pressure(),
            record.blood_sugar(),
            record.heart_rate(),
        );
        let trend = ChartSeries::build(&self.store.history_for(record.user_id())?);

        Ok(SubmissionOutcome {
            record,
            assessment,
            trend,
        })
    }

    /// Assess vitals without storing them.
    pub fn assess(&self, blood_pressure: &str, blood_sugar: u32, heart_rate: u32) -> Assessment {
        Assessment::new(blood_pressure, blood_sugar, heart_rate, &self.directory)
    }

    /// Latest record and trend for `user_id`.
    pub fn dashboard(&self, user_id: &str) -> Result<Dashboard, TrackerError> {
        let latest = match self.store.latest(user_id) {
            Ok(record) => LatestRecord::Found(record),
            Err(StoreError::NotFound(_)) => LatestRecord::NoData,
            Err(e) => return Err(e.into()),
        };

        Ok(Dashboard {
            user_id: user_id.to_string(),
            latest,
            trend: self.trend(user_id)?,
        })
    }

    /// Chart series over the user's history.
    pub fn trend(&self, user_id: &str) -> Result<ChartSeries, TrackerError> {
        Ok(ChartSeries::build(&self.store.history_for(user_id)?))
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }
}
