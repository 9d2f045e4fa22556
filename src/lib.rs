//! Vitals Tracker - store vitals, flag risks, chart trends.
//!
//! This library keeps a history of blood pressure, blood sugar and heart
//! rate submissions and interprets each one against fixed thresholds.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Vitals Tracker                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │ Submission  │──▶│ RecordStore │──▶│   Trend     │        │
//! │  │  (CLI/HTTP) │   │ (key-value) │   │  (series)   │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │         │                                    │              │
//! │         ▼                                    ▼              │
//! │  ┌─────────────┐                     ┌─────────────┐        │
//! │  │ Risk/Advice │                     │ Chart slot  │        │
//! │  │   (rules)   │                     │ (renderer)  │        │
//! │  └─────────────┘                     └─────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use vitals_tracker::{Clock, Directory, HealthTracker, MemoryStore, Submission};
//!
//! let mut tracker = HealthTracker::new(MemoryStore::new(), Directory::default(), Clock::Local);
//! let outcome = tracker
//!     .submit(Submission {
//!         user_id: "user123".to_string(),
//!         blood_pressure: "150/95".to_string(),
//!         blood_sugar: 150,
//!         heart_rate: 110,
//!     })
//!     .expect("in-memory save");
//!
//! assert_eq!(outcome.assessment.risk.factors.len(), 3);
//! ```

pub mod assessment;
pub mod config;
pub mod directory;
pub mod record;
pub mod store;
pub mod tracker;
pub mod trend;

#[cfg(feature = "server")]
pub mod server;

// Re-export key types at crate root for convenience
pub use assessment::{activity_advice, diet_advice, evaluate, Advice, RiskFactor, RiskReport};
pub use config::{Config, ConfigError};
pub use directory::{Directory, Doctor, Hospital, HospitalDirectory};
pub use record::{BloodPressure, BloodPressureError, Clock, HealthRecord, RecordError};
pub use store::{FileStore, KeyValueStore, MemoryStore, RecordStore, StoreError};
pub use tracker::{Dashboard, HealthTracker, LatestRecord, Submission, SubmissionOutcome, TrackerError};
pub use trend::{ChartSeries, ChartSlot, ChartSpec};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Notice shown with every assessment.
pub const MEDICAL_DISCLAIMER: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║                VITALS TRACKER - MEDICAL DISCLAIMER               ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  Assessments are simple threshold checks, NOT a diagnosis.       ║
║                                                                  ║
║  ✓ WHAT WE CHECK:                                                ║
║    • Blood pressure above 140/90 mmHg                            ║
║    • Blood sugar above 140 mg/dL                                 ║
║    • Heart rate outside 60-100 bpm                               ║
║                                                                  ║
║  ✗ WHAT WE DO NOT DO:                                            ║
║    • Account for age, medication or medical history              ║
║    • Replace advice from a qualified healthcare provider         ║
║                                                                  ║
║  All records are stored locally on this machine.                 ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;
