//! Patient feature set consumed by the scoring engine.
//!
//! A [`PatientFeatures`] value is always the product of validation: build one from an untyped
//! JSON payload with [`PatientFeatures::from_json`] or from typed values with
//! [`PatientFeatures::new`]. Either way, the required subset (age, gender, primary diagnosis,
//! length of stay, previous admissions) has been checked.

use crate::validation::{
    as_object, optional_count, optional_flag, optional_text_list, required_count, required_text,
};
use crate::{ValidationError, ValidationResult};
use serde::Serialize;
use serde_json::Value;

/// Wire names of the patient feature fields.
pub mod fields {
    pub const AGE: &str = "age";
    pub const GENDER: &str = "gender";
    pub const PRIMARY_DIAGNOSIS: &str = "primaryDiagnosis";
    pub const LENGTH_OF_STAY: &str = "lengthOfStay";
    pub const PREVIOUS_ADMISSIONS: &str = "previousAdmissions";
    pub const EMERGENCY_ADMISSION: &str = "emergencyAdmission";
    pub const MEDICATION_COUNT: &str = "medicationCount";
    pub const COMORBIDITIES: &str = "comorbidities";
    pub const SOCIAL_RISK_FACTORS: &str = "socialRiskFactors";

    /// Fields that must be present for a payload to be scored, in the order they are checked.
    pub const REQUIRED: [&str; 5] = [
        AGE,
        GENDER,
        PRIMARY_DIAGNOSIS,
        LENGTH_OF_STAY,
        PREVIOUS_ADMISSIONS,
    ];
}

/// Clinical and administrative attributes of a discharged patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientFeatures {
    /// Age in whole years.
    pub age: u32,
    /// Informational only; never used for scoring.
    pub gender: String,
    /// Free-text primary diagnosis.
    pub primary_diagnosis: String,
    /// Length of the index stay in days.
    pub length_of_stay: u32,
    /// Admissions in the trailing 12 months.
    pub previous_admissions: u32,
    pub emergency_admission: bool,
    pub medication_count: Option<u32>,
    pub comorbidities: Vec<String>,
    pub social_risk_factors: Vec<String>,
}

impl PatientFeatures {
    /// Creates a feature set from the required fields. Optional fields start empty.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] if `gender` or `primary_diagnosis` is blank.
    pub fn new(
        age: u32,
        gender: impl Into<String>,
        primary_diagnosis: impl Into<String>,
        length_of_stay: u32,
        previous_admissions: u32,
    ) -> ValidationResult<Self> {
        let gender = non_blank(gender.into(), fields::GENDER)?;
        let primary_diagnosis = non_blank(primary_diagnosis.into(), fields::PRIMARY_DIAGNOSIS)?;

        Ok(Self {
            age,
            gender,
            primary_diagnosis,
            length_of_stay,
            previous_admissions,
            emergency_admission: false,
            medication_count: None,
            comorbidities: Vec::new(),
            social_risk_factors: Vec::new(),
        })
    }

    pub fn with_emergency_admission(mut self, emergency_admission: bool) -> Self {
        self.emergency_admission = emergency_admission;
        self
    }

    pub fn with_medication_count(mut self, medication_count: u32) -> Self {
        self.medication_count = Some(medication_count);
        self
    }

    pub fn with_comorbidities(mut self, comorbidities: Vec<String>) -> Self {
        self.comorbidities = comorbidities;
        self
    }

    pub fn with_social_risk_factors(mut self, social_risk_factors: Vec<String>) -> Self {
        self.social_risk_factors = social_risk_factors;
        self
    }

    /// Validates an untyped JSON payload and builds a feature set from it.
    ///
    /// Required fields are checked in [`fields::REQUIRED`] order and the first failure is
    /// returned. Unknown keys (such as a `patientId` passthrough) are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first field that is missing, `null`, blank,
    /// negative or of the wrong type.
    pub fn from_json(payload: &Value) -> ValidationResult<Self> {
        let obj = as_object(payload)?;

        Ok(Self {
            age: required_count(obj, fields::AGE)?,
            gender: required_text(obj, fields::GENDER)?,
            primary_diagnosis: required_text(obj, fields::PRIMARY_DIAGNOSIS)?,
            length_of_stay: required_count(obj, fields::LENGTH_OF_STAY)?,
            previous_admissions: required_count(obj, fields::PREVIOUS_ADMISSIONS)?,
            emergency_admission: optional_flag(obj, fields::EMERGENCY_ADMISSION)?,
            medication_count: optional_count(obj, fields::MEDICATION_COUNT)?,
            comorbidities: optional_text_list(obj, fields::COMORBIDITIES)?,
            social_risk_factors: optional_text_list(obj, fields::SOCIAL_RISK_FACTORS)?,
        })
    }
}

impl TryFrom<&Value> for PatientFeatures {
    type Error = ValidationError;

    fn try_from(payload: &Value) -> ValidationResult<Self> {
        Self::from_json(payload)
    }
}

fn non_blank(value: String, field: &str) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(trimmed.to_owned())
}
