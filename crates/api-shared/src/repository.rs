//! Patient record store used by the API layer.
//!
//! The scoring core never touches storage; handlers look patients up through
//! [`PatientRepository`] and hand the engine a [`PatientFeatures`] value. Records are immutable
//! display data: the stored risk score and category, LACE score and Charlson index are passed
//! through as recorded, not recomputed.

use readmit_core::{PatientFeatures, RiskCategory, ValidationResult};
use serde::Serialize;
use utoipa::ToSchema;

/// Feature fields recorded with a stored patient.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredFeatures {
    pub length_of_stay: u32,
    pub emergency_admission: bool,
    pub previous_admissions: u32,
    pub medication_count: u32,
    pub social_risk_factors: Vec<String>,
    pub vital_trends: String,
    pub lab_trends: String,
}

/// A discharged patient as held by the store.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    /// `YYYY-MM-DD`.
    pub admission_date: String,
    /// `YYYY-MM-DD`.
    pub discharge_date: String,
    pub primary_diagnosis: String,
    pub comorbidities: Vec<String>,
    pub risk_score: f64,
    #[schema(value_type = String)]
    pub risk_category: RiskCategory,
    /// Out of 19.
    pub lace_score: u32,
    pub charlson_index: u32,
    pub features: StoredFeatures,
    pub interventions: Vec<String>,
    /// Filled in 30 days after discharge.
    pub actual_outcome: Option<String>,
}

/// The columns of the patient list view.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub primary_diagnosis: String,
    pub risk_score: f64,
    #[schema(value_type = String)]
    pub risk_category: RiskCategory,
    pub discharge_date: String,
}

impl PatientRecord {
    pub fn summary(&self) -> PatientSummary {
        PatientSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            age: self.age,
            gender: self.gender.clone(),
            primary_diagnosis: self.primary_diagnosis.clone(),
            risk_score: self.risk_score,
            risk_category: self.risk_category,
            discharge_date: self.discharge_date.clone(),
        }
    }

    /// The scoring inputs held in this record.
    pub fn features(&self) -> ValidationResult<PatientFeatures> {
        Ok(PatientFeatures::new(
            self.age,
            &self.gender,
            &self.primary_diagnosis,
            self.features.length_of_stay,
            self.features.previous_admissions,
        )?
        .with_emergency_admission(self.features.emergency_admission)
        .with_medication_count(self.features.medication_count)
        .with_comorbidities(self.comorbidities.clone())
        .with_social_risk_factors(self.features.social_risk_factors.clone()))
    }
}

/// Read access to stored patients.
pub trait PatientRepository: Send + Sync {
    fn find(&self, id: &str) -> Option<PatientRecord>;

    /// All patients, in store order.
    fn list(&self) -> Vec<PatientRecord>;
}

/// A fixed set of patients held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPatientRepository {
    patients: Vec<PatientRecord>,
}

impl InMemoryPatientRepository {
    pub fn new(patients: Vec<PatientRecord>) -> Self {
        Self { patients }
    }

    /// The three reference patients shown on the demo dashboard.
    pub fn seeded() -> Self {
        Self::new(vec![
            PatientRecord {
                id: "P001".into(),
                name: "Patient A".into(),
                age: 67,
                gender: "Female".into(),
                admission_date: "2024-12-15".into(),
                discharge_date: "2024-12-20".into(),
                primary_diagnosis: "Heart Failure with Reduced Ejection Fraction".into(),
                comorbidities: strings(&["Diabetes Type 2", "Hypertension", "CKD Stage 3"]),
                risk_score: 0.78,
                risk_category: RiskCategory::High,
                lace_score: 12,
                charlson_index: 4,
                features: StoredFeatures {
                    length_of_stay: 5,
                    emergency_admission: true,
                    previous_admissions: 3,
                    medication_count: 12,
                    social_risk_factors: strings(&["Lives alone", "Limited transportation"]),
                    vital_trends: "Improving".into(),
                    lab_trends: "Stable".into(),
                },
                interventions: strings(&[
                    "Discharge planning",
                    "Home health referral",
                    "48hr follow-up call",
                ]),
                actual_outcome: None,
            },
            PatientRecord {
                id: "P002".into(),
                name: "Patient B".into(),
                age: 45,
                gender: "Male".into(),
                admission_date: "2024-12-18".into(),
                discharge_date: "2024-12-19".into(),
                primary_diagnosis: "Pneumonia".into(),
                comorbidities: strings(&["Asthma"]),
                risk_score: 0.23,
                risk_category: RiskCategory::Low,
                lace_score: 4,
                charlson_index: 1,
                features: StoredFeatures {
                    length_of_stay: 1,
                    emergency_admission: false,
                    previous_admissions: 0,
                    medication_count: 4,
                    social_risk_factors: Vec::new(),
                    vital_trends: "Normal".into(),
                    lab_trends: "Improving".into(),
                },
                interventions: strings(&["Standard discharge"]),
                actual_outcome: None,
            },
            PatientRecord {
                id: "P003".into(),
                name: "Patient C".into(),
                age: 82,
                gender: "Female".into(),
                admission_date: "2024-12-10".into(),
                discharge_date: "2024-12-16".into(),
                primary_diagnosis: "COPD Exacerbation".into(),
                comorbidities: strings(&["Heart Failure", "Osteoporosis", "Depression"]),
                risk_score: 0.85,
                risk_category: RiskCategory::High,
                lace_score: 15,
                charlson_index: 6,
                features: StoredFeatures {
                    length_of_stay: 6,
                    emergency_admission: true,
                    previous_admissions: 5,
                    medication_count: 15,
                    social_risk_factors: strings(&[
                        "Frail",
                        "Cognitive impairment",
                        "Polypharmacy",
                    ]),
                    vital_trends: "Concerning".into(),
                    lab_trends: "Variable".into(),
                },
                interventions: strings(&[
                    "Geriatrics consult",
                    "Medication reconciliation",
                    "SNF placement",
                ]),
                actual_outcome: Some("Readmitted Day 14".into()),
            },
        ])
    }
}

fn strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

impl PatientRepository for InMemoryPatientRepository {
    fn find(&self, id: &str) -> Option<PatientRecord> {
        self.patients.iter().find(|p| p.id == id).cloned()
    }

    fn list(&self) -> Vec<PatientRecord> {
        self.patients.clone()
    }
}
