//! Readmission risk scoring.
//!
//! The engine is a fixed, versioned rule set: each rule that applies adds a number of points to a
//! base score, the sum is clamped, and the result is banded into a [`RiskCategory`] that selects
//! the recommended interventions. Points are summed as integer thousandths so every score is
//! exact at three decimal places.

use crate::constants::*;
use crate::features::PatientFeatures;
use crate::{ValidationError, ValidationResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

// ============================================================================
// Risk factors and global feature importance
// ============================================================================

/// A named factor that contributes to the risk score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum RiskFactor {
    #[serde(rename = "Previous Admissions")]
    PreviousAdmissions,
    #[serde(rename = "Length of Stay")]
    LengthOfStay,
    #[serde(rename = "Age")]
    Age,
    #[serde(rename = "Primary Diagnosis")]
    PrimaryDiagnosis,
    #[serde(rename = "Emergency Admission")]
    EmergencyAdmission,
}

impl RiskFactor {
    pub fn label(self) -> &'static str {
        match self {
            RiskFactor::PreviousAdmissions => "Previous Admissions",
            RiskFactor::LengthOfStay => "Length of Stay",
            RiskFactor::Age => "Age",
            RiskFactor::PrimaryDiagnosis => "Primary Diagnosis",
            RiskFactor::EmergencyAdmission => "Emergency Admission",
        }
    }
}

impl std::fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

const REFERENCE_FEATURE_IMPORTANCE: [(RiskFactor, f64); 5] = [
    (RiskFactor::PreviousAdmissions, 0.24),
    (RiskFactor::LengthOfStay, 0.18),
    (RiskFactor::Age, 0.12),
    (RiskFactor::PrimaryDiagnosis, 0.15),
    (RiskFactor::EmergencyAdmission, 0.10),
];

/// Global weights of the model's factors.
///
/// These describe the rule set as a whole and are identical for every patient; they are not a
/// per-patient attribution. See [`ScoringEngine::breakdown`] for the rules that fired for one
/// patient. Serialises as a JSON object keyed by factor label, in reference order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureImportance(&'static [(RiskFactor, f64)]);

impl FeatureImportance {
    /// The reference weights every assessment carries.
    pub const fn reference() -> Self {
        Self(&REFERENCE_FEATURE_IMPORTANCE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RiskFactor, f64)> + '_ {
        self.0.iter().copied()
    }

    pub fn get(&self, factor: RiskFactor) -> Option<f64> {
        self.iter().find(|(f, _)| *f == factor).map(|(_, w)| w)
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, w)| w).sum()
    }
}

impl Serialize for FeatureImportance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (factor, weight) in self.iter() {
            map.serialize_entry(factor.label(), &weight)?;
        }
        map.end()
    }
}

// ============================================================================
// Categories and thresholds
// ============================================================================

/// Banding of the continuous risk score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    /// Bands a score with the default thresholds.
    pub fn from_score(score: f64) -> Self {
        RiskThresholds::default().categorize(score)
    }

    /// Recommended interventions for this category, in presentation order.
    pub fn interventions(self) -> &'static [&'static str] {
        match self {
            RiskCategory::High => &[
                "Enhanced discharge planning",
                "Home health referral",
                "48hr follow-up call",
            ],
            RiskCategory::Medium => &["Standard discharge planning", "7-day follow-up call"],
            RiskCategory::Low => &["Standard discharge"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        match s {
            "Low" => Ok(RiskCategory::Low),
            "Medium" => Ok(RiskCategory::Medium),
            "High" => Ok(RiskCategory::High),
            other => Err(ValidationError::out_of_range(
                "riskCategory",
                format!("unknown risk category {other:?}"),
            )),
        }
    }
}

/// Score cut-offs used to band scores into categories.
///
/// Fixed for the lifetime of an engine; the defaults are [`HIGH_RISK_THRESHOLD`] and
/// [`MEDIUM_RISK_THRESHOLD`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiskThresholds {
    high: f64,
    medium: f64,
}

impl RiskThresholds {
    /// Creates a validated threshold pair.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] if `high` is outside
    /// `[MIN_CONFIGURABLE_HIGH_THRESHOLD, MAX_CONFIGURABLE_HIGH_THRESHOLD]` or if `medium` is not
    /// strictly between zero and `high`.
    pub fn new(high: f64, medium: f64) -> ValidationResult<Self> {
        let high = crate::validation::ensure_finite(high, "highRiskThreshold")?;
        let medium = crate::validation::ensure_finite(medium, "mediumRiskThreshold")?;

        if !(MIN_CONFIGURABLE_HIGH_THRESHOLD..=MAX_CONFIGURABLE_HIGH_THRESHOLD).contains(&high) {
            return Err(ValidationError::out_of_range(
                "highRiskThreshold",
                format!(
                    "{high} is outside {MIN_CONFIGURABLE_HIGH_THRESHOLD}..={MAX_CONFIGURABLE_HIGH_THRESHOLD}"
                ),
            ));
        }
        if medium <= 0.0 || medium >= high {
            return Err(ValidationError::out_of_range(
                "mediumRiskThreshold",
                format!("{medium} must be above 0 and below the high threshold {high}"),
            ));
        }

        Ok(Self { high, medium })
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn medium(&self) -> f64 {
        self.medium
    }

    /// `score >= high` is High, `medium <= score < high` is Medium, anything lower is Low.
    pub fn categorize(&self, score: f64) -> RiskCategory {
        if score >= self.high {
            RiskCategory::High
        } else if score >= self.medium {
            RiskCategory::Medium
        } else {
            RiskCategory::Low
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: HIGH_RISK_THRESHOLD,
            medium: MEDIUM_RISK_THRESHOLD,
        }
    }
}

// ============================================================================
// Rule set
// ============================================================================

struct Rule {
    factor: RiskFactor,
    description: &'static str,
    points: u32,
    applies: fn(&PatientFeatures) -> bool,
}

fn is_senior(f: &PatientFeatures) -> bool {
    f.age > SENIOR_AGE_YEARS
}

fn is_elderly(f: &PatientFeatures) -> bool {
    f.age > ELDERLY_AGE_YEARS
}

fn has_long_stay(f: &PatientFeatures) -> bool {
    f.length_of_stay > LONG_STAY_DAYS
}

fn has_extended_stay(f: &PatientFeatures) -> bool {
    f.length_of_stay > EXTENDED_STAY_DAYS
}

fn has_frequent_admissions(f: &PatientFeatures) -> bool {
    f.previous_admissions > FREQUENT_ADMISSIONS
}

fn has_very_frequent_admissions(f: &PatientFeatures) -> bool {
    f.previous_admissions > VERY_FREQUENT_ADMISSIONS
}

fn was_emergency_admission(f: &PatientFeatures) -> bool {
    f.emergency_admission
}

fn has_high_risk_diagnosis_rule(f: &PatientFeatures) -> bool {
    is_high_risk_diagnosis(&f.primary_diagnosis)
}

/// True when the diagnosis contains any of [`HIGH_RISK_DIAGNOSES`], ignoring case.
pub fn is_high_risk_diagnosis(primary_diagnosis: &str) -> bool {
    let diagnosis = primary_diagnosis.to_lowercase();
    HIGH_RISK_DIAGNOSES
        .iter()
        .any(|term| diagnosis.contains(&term.to_lowercase()))
}

// Independent rules; every one that applies is added.
const RULES: [Rule; 8] = [
    Rule {
        factor: RiskFactor::Age,
        description: "age over 65",
        points: AGE_OVER_65_MILLIS,
        applies: is_senior,
    },
    Rule {
        factor: RiskFactor::Age,
        description: "age over 80",
        points: AGE_OVER_80_MILLIS,
        applies: is_elderly,
    },
    Rule {
        factor: RiskFactor::LengthOfStay,
        description: "length of stay over 7 days",
        points: STAY_OVER_7_DAYS_MILLIS,
        applies: has_long_stay,
    },
    Rule {
        factor: RiskFactor::LengthOfStay,
        description: "length of stay over 14 days",
        points: STAY_OVER_14_DAYS_MILLIS,
        applies: has_extended_stay,
    },
    Rule {
        factor: RiskFactor::PreviousAdmissions,
        description: "more than 2 previous admissions",
        points: ADMISSIONS_OVER_2_MILLIS,
        applies: has_frequent_admissions,
    },
    Rule {
        factor: RiskFactor::PreviousAdmissions,
        description: "more than 5 previous admissions",
        points: ADMISSIONS_OVER_5_MILLIS,
        applies: has_very_frequent_admissions,
    },
    Rule {
        factor: RiskFactor::PrimaryDiagnosis,
        description: "high-risk primary diagnosis",
        points: HIGH_RISK_DIAGNOSIS_MILLIS,
        applies: has_high_risk_diagnosis_rule,
    },
    Rule {
        factor: RiskFactor::EmergencyAdmission,
        description: "emergency admission",
        points: EMERGENCY_ADMISSION_MILLIS,
        applies: was_emergency_admission,
    },
];

fn millis_to_score(millis: u32) -> f64 {
    f64::from(millis) / 1000.0
}

// ============================================================================
// Outputs
// ============================================================================

/// One rule that fired for a patient.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub factor: RiskFactor,
    pub rule: &'static str,
    pub points: f64,
}

/// Per-patient account of how a score was reached.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub base: f64,
    pub contributions: Vec<Contribution>,
    /// Sum before clamping; may exceed the maximum score.
    pub raw_total: f64,
    pub score: f64,
    pub clamped: bool,
}

/// The result of scoring one patient.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// In `[0.0, 0.95]`, exact at three decimals.
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub interventions: Vec<String>,
    pub confidence: f64,
    pub model_version: &'static str,
    #[serde(serialize_with = "serialize_timestamp")]
    pub prediction_timestamp: DateTime<Utc>,
    pub feature_importance: FeatureImportance,
}

fn serialize_timestamp<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

// ============================================================================
// Engine
// ============================================================================

/// Stateless readmission risk scorer.
///
/// Cheap to copy and safe to share across threads; scoring reads nothing but its arguments and
/// the clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoringEngine {
    thresholds: RiskThresholds,
}

impl ScoringEngine {
    /// Creates an engine with the default category thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine that bands scores with `thresholds` instead of the defaults.
    pub fn with_thresholds(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> RiskThresholds {
        self.thresholds
    }

    /// Scores a validated feature set, stamping the assessment with the current time.
    pub fn score(&self, features: &PatientFeatures) -> RiskAssessment {
        self.score_at(features, Utc::now())
    }

    /// Validates an untyped payload and scores it.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] from [`PatientFeatures::from_json`]; no assessment is
    /// produced in that case.
    pub fn score_json(&self, payload: &Value) -> ValidationResult<RiskAssessment> {
        let features = PatientFeatures::from_json(payload)?;
        Ok(self.score(&features))
    }

    /// Scores a validated feature set with an explicit timestamp.
    pub fn score_at(
        &self,
        features: &PatientFeatures,
        prediction_timestamp: DateTime<Utc>,
    ) -> RiskAssessment {
        let millis = self.total_millis(features).min(MAX_SCORE_MILLIS);
        let risk_score = millis_to_score(millis);
        let risk_category = self.thresholds.categorize(risk_score);

        tracing::debug!(
            risk_score,
            risk_category = risk_category.as_str(),
            "scored patient features"
        );

        RiskAssessment {
            risk_score,
            risk_category,
            interventions: risk_category
                .interventions()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            confidence: MODEL_CONFIDENCE,
            model_version: MODEL_VERSION,
            prediction_timestamp,
            feature_importance: FeatureImportance::reference(),
        }
    }

    /// Lists the rules that fired for `features` and how the final score was reached.
    pub fn breakdown(&self, features: &PatientFeatures) -> ScoreBreakdown {
        let contributions: Vec<Contribution> = RULES
            .iter()
            .filter(|rule| (rule.applies)(features))
            .map(|rule| Contribution {
                factor: rule.factor,
                rule: rule.description,
                points: millis_to_score(rule.points),
            })
            .collect();

        let raw_millis = self.total_millis(features);
        let clamped = raw_millis > MAX_SCORE_MILLIS;

        ScoreBreakdown {
            base: millis_to_score(BASE_SCORE_MILLIS),
            contributions,
            raw_total: millis_to_score(raw_millis),
            score: millis_to_score(raw_millis.min(MAX_SCORE_MILLIS)),
            clamped,
        }
    }

    fn total_millis(&self, features: &PatientFeatures) -> u32 {
        RULES
            .iter()
            .filter(|rule| (rule.applies)(features))
            .fold(BASE_SCORE_MILLIS, |acc, rule| acc + rule.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn patient(age: u32, diagnosis: &str, stay: u32, admissions: u32) -> PatientFeatures {
        PatientFeatures::new(age, "Female", diagnosis, stay, admissions).expect("valid features")
    }

    #[test]
    fn reference_example_is_clamped_and_high() {
        let engine = ScoringEngine::new();
        let payload = json!({
            "age": 67,
            "gender": "Female",
            "primaryDiagnosis": "Heart Failure with Reduced Ejection Fraction",
            "lengthOfStay": 5,
            "previousAdmissions": 3,
            "emergencyAdmission": true
        });

        let assessment = engine.score_json(&payload).expect("valid payload");
        assert_eq!(assessment.risk_score, 0.95);
        assert_eq!(assessment.risk_category, RiskCategory::High);
        assert_eq!(
            assessment.interventions,
            vec![
                "Enhanced discharge planning",
                "Home health referral",
                "48hr follow-up call"
            ]
        );
        assert_eq!(assessment.confidence, 0.85);
        assert_eq!(assessment.model_version, "v2.1.3");

        let breakdown = engine.breakdown(&PatientFeatures::from_json(&payload).expect("valid"));
        assert_eq!(breakdown.raw_total, 1.0);
        assert!(breakdown.clamped);
        assert_eq!(breakdown.contributions.len(), 4);
    }

    #[test]
    fn base_patient_scores_low() {
        let assessment = ScoringEngine::new().score(&patient(45, "Pneumonia", 1, 0));
        assert_eq!(assessment.risk_score, 0.3);
        assert_eq!(assessment.risk_category, RiskCategory::Low);
        assert_eq!(assessment.interventions, vec!["Standard discharge"]);
    }

    #[test]
    fn age_rules_accumulate() {
        let engine = ScoringEngine::new();
        assert_eq!(engine.score(&patient(65, "Pneumonia", 0, 0)).risk_score, 0.3);
        assert_eq!(engine.score(&patient(66, "Pneumonia", 0, 0)).risk_score, 0.45);
        assert_eq!(engine.score(&patient(80, "Pneumonia", 0, 0)).risk_score, 0.45);
        assert_eq!(engine.score(&patient(85, "Pneumonia", 0, 0)).risk_score, 0.55);
    }

    #[test]
    fn stay_and_admission_rules_accumulate() {
        let engine = ScoringEngine::new();
        assert_eq!(engine.score(&patient(40, "Pneumonia", 8, 0)).risk_score, 0.5);
        assert_eq!(engine.score(&patient(40, "Pneumonia", 15, 0)).risk_score, 0.65);
        assert_eq!(engine.score(&patient(40, "Pneumonia", 0, 3)).risk_score, 0.55);
        assert_eq!(engine.score(&patient(40, "Pneumonia", 0, 6)).risk_score, 0.75);
    }

    #[test]
    fn category_boundaries_are_inclusive_at_threshold() {
        let engine = ScoringEngine::new();

        // 0.30 + 0.15 + 0.25
        let exactly_high = engine.score(&patient(67, "Pneumonia", 0, 3));
        assert_eq!(exactly_high.risk_score, 0.7);
        assert_eq!(exactly_high.risk_category, RiskCategory::High);

        // 0.30 + 0.10
        let exactly_medium = engine
            .score(&patient(40, "Pneumonia", 0, 0).with_emergency_admission(true));
        assert_eq!(exactly_medium.risk_score, 0.4);
        assert_eq!(exactly_medium.risk_category, RiskCategory::Medium);

        assert_eq!(RiskCategory::from_score(0.70), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(0.699), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(0.40), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(0.399), RiskCategory::Low);
    }

    #[test]
    fn diagnosis_match_is_case_insensitive_substring() {
        assert!(is_high_risk_diagnosis("chronic kidney disease"));
        assert!(is_high_risk_diagnosis("KIDNEY DISEASE STAGE 4"));
        assert!(is_high_risk_diagnosis("COPD Exacerbation"));
        assert!(is_high_risk_diagnosis(
            "Heart Failure with Reduced Ejection Fraction"
        ));
        assert!(!is_high_risk_diagnosis("Pneumonia"));
        assert!(!is_high_risk_diagnosis("CKD Stage 3"));
    }

    #[test]
    fn diagnosis_bump_applies_once_for_multiple_terms() {
        let engine = ScoringEngine::new();
        let assessment = engine.score(&patient(40, "Diabetes and COPD with heart failure", 0, 0));
        assert_eq!(assessment.risk_score, 0.5);
    }

    #[test]
    fn feature_importance_is_static_reference() {
        let engine = ScoringEngine::new();
        let a = engine.score(&patient(90, "COPD", 20, 9));
        let b = engine.score(&patient(20, "Fracture", 0, 0));
        assert_eq!(a.feature_importance, b.feature_importance);

        let importance = FeatureImportance::reference();
        assert_eq!(importance.get(RiskFactor::PreviousAdmissions), Some(0.24));
        assert_eq!(importance.get(RiskFactor::LengthOfStay), Some(0.18));
        assert_eq!(importance.get(RiskFactor::Age), Some(0.12));
        assert_eq!(importance.get(RiskFactor::PrimaryDiagnosis), Some(0.15));
        assert_eq!(importance.get(RiskFactor::EmergencyAdmission), Some(0.10));
        assert!(importance.total() <= 1.0);
    }

    #[test]
    fn assessment_serialises_with_camel_case_and_iso_timestamp() {
        let timestamp = DateTime::parse_from_rfc3339("2024-12-20T10:15:30.123Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        let assessment = ScoringEngine::new().score_at(&patient(45, "Pneumonia", 1, 0), timestamp);

        let value = serde_json::to_value(&assessment).expect("serialise");
        assert_eq!(value["riskScore"], json!(0.3));
        assert_eq!(value["riskCategory"], json!("Low"));
        assert_eq!(value["modelVersion"], json!("v2.1.3"));
        assert_eq!(value["predictionTimestamp"], json!("2024-12-20T10:15:30.123Z"));
        assert_eq!(value["featureImportance"]["Previous Admissions"], json!(0.24));
        assert_eq!(value["featureImportance"]["Emergency Admission"], json!(0.1));
    }

    #[test]
    fn custom_thresholds_rebands_without_changing_score() {
        let thresholds = RiskThresholds::new(0.5, 0.35).expect("valid thresholds");
        let engine = ScoringEngine::with_thresholds(thresholds);
        let assessment = engine.score(&patient(40, "Pneumonia", 8, 0));
        assert_eq!(assessment.risk_score, 0.5);
        assert_eq!(assessment.risk_category, RiskCategory::High);
    }

    #[test]
    fn thresholds_reject_invalid_pairs() {
        assert!(RiskThresholds::new(0.95, 0.4).is_err());
        assert!(RiskThresholds::new(0.45, 0.4).is_err());
        assert!(RiskThresholds::new(0.7, 0.7).is_err());
        assert!(RiskThresholds::new(0.7, 0.0).is_err());
        assert!(RiskThresholds::new(f64::NAN, 0.4).is_err());
        assert_eq!(
            RiskThresholds::new(0.7, 0.4).expect("defaults are valid"),
            RiskThresholds::default()
        );
    }

    #[test]
    fn score_json_returns_no_assessment_on_missing_field() {
        let payload = json!({
            "gender": "Female",
            "primaryDiagnosis": "COPD",
            "lengthOfStay": 3,
            "previousAdmissions": 1
        });
        let err = ScoringEngine::new()
            .score_json(&payload)
            .expect_err("age is required");
        assert_eq!(err, ValidationError::missing("age"));
    }

    #[test]
    fn risk_category_parses_its_own_display() {
        for category in [RiskCategory::Low, RiskCategory::Medium, RiskCategory::High] {
            assert_eq!(category.to_string().parse::<RiskCategory>(), Ok(category));
        }
        assert!("Critical".parse::<RiskCategory>().is_err());
    }

    fn features_strategy() -> impl Strategy<Value = PatientFeatures> {
        (
            0u32..110,
            prop::sample::select(vec![
                "Pneumonia",
                "Heart Failure",
                "copd exacerbation",
                "Hip Fracture",
                "chronic kidney disease",
            ]),
            0u32..30,
            0u32..10,
            any::<bool>(),
        )
            .prop_map(|(age, diagnosis, stay, admissions, emergency)| {
                PatientFeatures::new(age, "Male", diagnosis, stay, admissions)
                    .expect("strategy produces valid features")
                    .with_emergency_admission(emergency)
            })
    }

    proptest! {
        /// Property: scoring is deterministic apart from the timestamp.
        #[test]
        fn scoring_is_deterministic(features in features_strategy()) {
            let engine = ScoringEngine::new();
            let a = engine.score(&features);
            let b = engine.score(&features);
            prop_assert_eq!(a.risk_score, b.risk_score);
            prop_assert_eq!(a.risk_category, b.risk_category);
            prop_assert_eq!(a.interventions, b.interventions);
            prop_assert_eq!(a.feature_importance, b.feature_importance);
        }

        /// Property: the score stays within [0.30, 0.95] and matches the breakdown.
        #[test]
        fn score_is_bounded(features in features_strategy()) {
            let engine = ScoringEngine::new();
            let assessment = engine.score(&features);
            prop_assert!(assessment.risk_score >= 0.3);
            prop_assert!(assessment.risk_score <= 0.95);
            prop_assert_eq!(engine.breakdown(&features).score, assessment.risk_score);
        }

        /// Property: any raw total above the clamp yields exactly 0.95.
        #[test]
        fn clamp_is_exact(features in features_strategy()) {
            let engine = ScoringEngine::new();
            let breakdown = engine.breakdown(&features);
            if breakdown.raw_total > 0.95 {
                prop_assert!(breakdown.clamped);
                prop_assert_eq!(engine.score(&features).risk_score, 0.95);
            }
        }

        /// Property: raising age, stay or admissions never lowers the score.
        #[test]
        fn score_is_monotonic(features in features_strategy(), bump in 1u32..20) {
            let engine = ScoringEngine::new();
            let before = engine.score(&features).risk_score;

            let mut older = features.clone();
            older.age += bump;
            prop_assert!(engine.score(&older).risk_score >= before);

            let mut longer = features.clone();
            longer.length_of_stay += bump;
            prop_assert!(engine.score(&longer).risk_score >= before);

            let mut readmitted = features.clone();
            readmitted.previous_admissions += bump;
            prop_assert!(engine.score(&readmitted).risk_score >= before);
        }

        /// Property: interventions depend on the category alone.
        #[test]
        fn interventions_follow_category(features in features_strategy()) {
            let assessment = ScoringEngine::new().score(&features);
            let expected: Vec<String> = assessment
                .risk_category
                .interventions()
                .iter()
                .map(|s| s.to_string())
                .collect();
            prop_assert_eq!(assessment.interventions, expected);
        }
    }
}
