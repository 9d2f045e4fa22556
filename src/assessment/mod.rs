//! Rule-based interpretation of vitals.
//!
//! This module contains:
//! - Risk assessment against fixed clinical thresholds
//! - Diet and activity suggestions

pub mod advice;
pub mod risk;

// Re-export commonly used types
pub use advice::{activity_advice, diet_advice, Advice};
pub use risk::{evaluate, evaluate_record, RiskFactor, RiskReport, NORMAL_RANGES_MESSAGE};
