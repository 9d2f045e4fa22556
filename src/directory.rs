//! Static doctor and hospital listings.
//!
//! These are configuration constants for the presentation layer. They are
//! not derived from stored records.

use crate::assessment::risk::BLOOD_SUGAR_LIMIT;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub name: String,
    pub specialty: String,
    pub experience: String,
    pub contact: String,
}

impl Doctor {
    fn new(name: &str, specialty: &str, experience: &str, contact: &str) -> Self {
        Self {
            name: name.to_string(),
            specialty: specialty.to_string(),
            experience: experience.to_string(),
            contact: contact.to_string(),
        }
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({})\n  Contact: {}",
            self.name, self.specialty, self.experience, self.contact
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    pub name: String,
    pub contact: String,
    pub address: String,
}

impl Hospital {
    fn new(name: &str, contact: &str, address: &str) -> Self {
        Self {
            name: name.to_string(),
            contact: contact.to_string(),
            address: address.to_string(),
        }
    }
}

impl fmt::Display for Hospital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n  Contact: {}\n  Address: {}",
            self.name, self.contact, self.address
        )
    }
}

/// Two fixed hospital lists, picked by a coarse check on the vitals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalDirectory {
    /// Suggested when blood sugar is high or a blood pressure was given
    pub elevated: Vec<Hospital>,
    /// Suggested otherwise
    pub routine: Vec<Hospital>,
}

impl Default for HospitalDirectory {
    fn default() -> Self {
        Self {
            elevated: vec![
                Hospital::new("City Hospital", "555-1234", "123 Main St"),
                Hospital::new("Health Center", "555-5678", "456 Elm St"),
            ],
            routine: vec![
                Hospital::new("General Hospital", "555-8765", "789 Oak St"),
                Hospital::new("Community Clinic", "555-4321", "321 Pine St"),
            ],
        }
    }
}

impl HospitalDirectory {
    /// Pick the hospital list for a submission.
    ///
    /// Any blood pressure containing a `/` selects the elevated list,
    /// whatever its values.
    pub fn suggest(&self, blood_pressure: &str, blood_sugar: u32) -> &[Hospital] {
        if blood_sugar > BLOOD_SUGAR_LIMIT || blood_pressure.contains('/') {
            &self.elevated
        } else {
            &self.routine
        }
    }
}

/// Everything listed alongside an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub doctors: Vec<Doctor>,
    pub hospitals: HospitalDirectory,
}

impl Default for Directory {
    fn default() -> Self {
        Self {
            doctors: vec![
                Doctor::new(
                    "Dr. John Smith",
                    "Cardiologist",
                    "10 years",
                    "john.smith@example.com",
                ),
                Doctor::new(
                    "Dr. Jane Doe",
                    "Endocrinologist",
                    "8 years",
                    "jane.doe@example.com",
                ),
                Doctor::new(
                    "Dr. Emily Johnson",
                    "Nutritionist",
                    "5 years",
                    "emily.johnson@example.com",
                ),
            ],
            hospitals: HospitalDirectory::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_doctors() {
        let directory = Directory::default();
        assert_eq!(directory.doctors.len(), 3);
        assert_eq!(directory.doctors[0].specialty, "Cardiologist");
        assert!(directory.doctors[1]
            .to_string()
            .contains("Contact: jane.doe@example.com"));
    }

    #[test]
    fn test_hospital_suggestion() {
        let hospitals = HospitalDirectory::default();

        assert_eq!(hospitals.suggest("120/80", 100)[0].name, "City Hospital");
        assert_eq!(hospitals.suggest("", 150)[0].name, "City Hospital");
        assert_eq!(hospitals.suggest("", 140)[0].name, "General Hospital");
        assert_eq!(hospitals.suggest("unknown", 100)[1].name, "Community Clinic");
    }
}
