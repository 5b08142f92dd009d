//! Subgroup fairness classification.
//!
//! Fairness ratios are computed upstream by model monitoring; this module only classifies each
//! subgroup against the acceptable band and summarises the result for the dashboard.

use crate::constants::{FAIRNESS_RATIO_MAX, FAIRNESS_RATIO_MIN};
use crate::validation::{as_object, ensure_finite, ensure_percentage, required_number};
use crate::{ValidationError, ValidationResult};
use serde::Serialize;
use serde_json::Value;

/// Model performance for one demographic subgroup.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubgroupMetric {
    pub group: String,
    /// Percentage in `[0, 100]`.
    pub precision: f64,
    /// Percentage in `[0, 100]`.
    pub recall: f64,
    /// Group performance divided by the overall average performance.
    pub fairness_ratio: f64,
}

impl SubgroupMetric {
    pub fn new(group: impl Into<String>, precision: f64, recall: f64, fairness_ratio: f64) -> Self {
        Self {
            group: group.into(),
            precision,
            recall,
            fairness_ratio,
        }
    }

    /// Parses one metric from JSON. Both `fairness_ratio` and `fairnessRatio` are accepted.
    ///
    /// `index` qualifies the field names reported in errors (`metrics[index].<field>`).
    pub fn from_json(value: &Value, index: usize) -> ValidationResult<Self> {
        let label = |field: &str| format!("metrics[{index}].{field}");
        let obj = as_object(value)?;

        let group = obj
            .get("group")
            .filter(|v| !v.is_null())
            .ok_or_else(|| ValidationError::missing(label("group")))?
            .as_str()
            .ok_or_else(|| ValidationError::invalid_type(label("group"), "string"))?
            .to_owned();

        let ratio_key = if obj.contains_key("fairness_ratio") {
            "fairness_ratio"
        } else {
            "fairnessRatio"
        };

        let metric = Self {
            group,
            precision: required_number(obj, "precision", &label("precision"))?,
            recall: required_number(obj, "recall", &label("recall"))?,
            fairness_ratio: required_number(obj, ratio_key, &label("fairness_ratio"))?,
        };
        metric.validate(index)?;
        Ok(metric)
    }

    fn validate(&self, index: usize) -> ValidationResult<()> {
        let label = |field: &str| format!("metrics[{index}].{field}");
        ensure_percentage(self.precision, &label("precision"))?;
        ensure_percentage(self.recall, &label("recall"))?;
        ensure_finite(self.fairness_ratio, &label("fairness_ratio"))?;
        Ok(())
    }
}

/// Outcome of classifying a subgroup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FairnessStatus {
    Fair,
    Review,
}

impl FairnessStatus {
    /// Fair iff `ratio` lies in `[FAIRNESS_RATIO_MIN, FAIRNESS_RATIO_MAX]`, bounds included.
    pub fn classify(ratio: f64) -> Self {
        if (FAIRNESS_RATIO_MIN..=FAIRNESS_RATIO_MAX).contains(&ratio) {
            FairnessStatus::Fair
        } else {
            FairnessStatus::Review
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FairnessStatus::Fair => "Fair",
            FairnessStatus::Review => "Review",
        }
    }
}

impl std::fmt::Display for FairnessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subgroup metric with its classification.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FairnessVerdict {
    #[serde(flatten)]
    pub metric: SubgroupMetric,
    pub status: FairnessStatus,
}

/// Counts across a set of verdicts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FairnessSummary {
    pub total: usize,
    pub fair: usize,
    pub review: usize,
    /// Labels of groups needing review, in input order.
    pub groups_for_review: Vec<String>,
}

/// Stateless classifier for subgroup fairness metrics.
#[derive(Clone, Copy, Debug, Default)]
pub struct FairnessAggregator;

impl FairnessAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Classifies each metric independently; output has the same length and order as input.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming `metrics[i].<field>` for the first metric with a
    /// non-finite ratio or a precision/recall outside `[0, 100]`. No verdicts are returned in
    /// that case.
    pub fn evaluate(&self, metrics: &[SubgroupMetric]) -> ValidationResult<Vec<FairnessVerdict>> {
        metrics
            .iter()
            .enumerate()
            .map(|(index, metric)| {
                metric.validate(index)?;
                Ok(FairnessVerdict {
                    metric: metric.clone(),
                    status: FairnessStatus::classify(metric.fairness_ratio),
                })
            })
            .collect()
    }

    /// Parses a JSON array of metrics and classifies them.
    pub fn evaluate_json(&self, payload: &Value) -> ValidationResult<Vec<FairnessVerdict>> {
        let items = payload
            .as_array()
            .ok_or_else(|| ValidationError::invalid_type("metrics", "array"))?;

        let metrics = items
            .iter()
            .enumerate()
            .map(|(index, item)| SubgroupMetric::from_json(item, index))
            .collect::<ValidationResult<Vec<_>>>()?;

        self.evaluate(&metrics)
    }

    pub fn summarise(&self, verdicts: &[FairnessVerdict]) -> FairnessSummary {
        verdicts
            .iter()
            .fold(FairnessSummary::default(), |mut summary, verdict| {
                summary.total += 1;
                match verdict.status {
                    FairnessStatus::Fair => summary.fair += 1,
                    FairnessStatus::Review => {
                        summary.review += 1;
                        summary.groups_for_review.push(verdict.metric.group.clone());
                    }
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn metric(group: &str, ratio: f64) -> SubgroupMetric {
        SubgroupMetric::new(group, 75.0, 68.0, ratio)
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        assert_eq!(FairnessStatus::classify(0.95), FairnessStatus::Fair);
        assert_eq!(FairnessStatus::classify(0.949), FairnessStatus::Review);
        assert_eq!(FairnessStatus::classify(1.05), FairnessStatus::Fair);
        assert_eq!(FairnessStatus::classify(1.051), FairnessStatus::Review);
        assert_eq!(FairnessStatus::classify(1.0), FairnessStatus::Fair);
    }

    #[test]
    fn test_evaluate_preserves_order_and_length() {
        let metrics = vec![
            metric("Medicaid", 0.94),
            metric("Female", 1.01),
            metric("Commercial", 1.05),
        ];

        let verdicts = FairnessAggregator::new()
            .evaluate(&metrics)
            .expect("valid metrics");

        let statuses: Vec<_> = verdicts.iter().map(|v| v.status).collect();
        let groups: Vec<_> = verdicts.iter().map(|v| v.metric.group.as_str()).collect();
        assert_eq!(
            statuses,
            vec![
                FairnessStatus::Review,
                FairnessStatus::Fair,
                FairnessStatus::Fair
            ]
        );
        assert_eq!(groups, vec!["Medicaid", "Female", "Commercial"]);
    }

    #[test]
    fn test_evaluate_rejects_nan_ratio() {
        let metrics = vec![metric("Male", 0.99), metric("White", f64::NAN)];
        let err = FairnessAggregator::new()
            .evaluate(&metrics)
            .expect_err("NaN ratio must fail");
        assert_eq!(err.field(), Some("metrics[1].fairness_ratio"));
    }

    #[test]
    fn test_evaluate_rejects_out_of_range_precision() {
        let metrics = vec![SubgroupMetric::new("Male", 120.0, 68.0, 1.0)];
        let err = FairnessAggregator::new()
            .evaluate(&metrics)
            .expect_err("precision above 100");
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
        assert_eq!(err.field(), Some("metrics[0].precision"));
    }

    #[test]
    fn test_evaluate_json_accepts_both_ratio_spellings() {
        let payload = json!([
            {"group": "Age 65+", "precision": 74.2, "recall": 71.8, "fairness_ratio": 0.96},
            {"group": "Medicaid", "precision": 73.5, "recall": 65.2, "fairnessRatio": 0.94}
        ]);
        let verdicts = FairnessAggregator::new()
            .evaluate_json(&payload)
            .expect("valid payload");
        assert_eq!(verdicts[0].status, FairnessStatus::Fair);
        assert_eq!(verdicts[1].status, FairnessStatus::Review);
        assert_eq!(verdicts[1].metric.fairness_ratio, 0.94);
    }

    #[test]
    fn test_evaluate_json_names_missing_ratio() {
        let payload = json!([
            {"group": "Male", "precision": 75.6, "recall": 68.3, "fairness_ratio": 0.99},
            {"group": "White", "precision": 77.2, "recall": 70.1}
        ]);
        let err = FairnessAggregator::new()
            .evaluate_json(&payload)
            .expect_err("missing ratio");
        assert_eq!(err, ValidationError::missing("metrics[1].fairness_ratio"));
    }

    #[test]
    fn test_evaluate_json_names_non_numeric_ratio() {
        let payload = json!([
            {"group": "Male", "precision": 75.6, "recall": 68.3, "fairness_ratio": "0.99"}
        ]);
        let err = FairnessAggregator::new()
            .evaluate_json(&payload)
            .expect_err("string ratio");
        assert!(matches!(err, ValidationError::InvalidType { .. }));
        assert_eq!(err.field(), Some("metrics[0].fairness_ratio"));
    }

    #[test]
    fn test_verdict_serialises_flat() {
        let verdicts = FairnessAggregator::new()
            .evaluate(&[metric("Male", 0.99)])
            .expect("valid");
        let value = serde_json::to_value(&verdicts[0]).expect("serialise");
        assert_eq!(
            value,
            json!({
                "group": "Male",
                "precision": 75.0,
                "recall": 68.0,
                "fairness_ratio": 0.99,
                "status": "Fair"
            })
        );
    }

    #[test]
    fn test_summarise_counts_and_lists_review_groups() {
        let aggregator = FairnessAggregator::new();
        let verdicts = aggregator
            .evaluate(&[
                metric("Medicaid", 0.94),
                metric("Male", 0.99),
                metric("Outlier", 1.2),
            ])
            .expect("valid");

        assert_eq!(
            aggregator.summarise(&verdicts),
            FairnessSummary {
                total: 3,
                fair: 1,
                review: 2,
                groups_for_review: vec!["Medicaid".into(), "Outlier".into()],
            }
        );
        assert_eq!(aggregator.summarise(&[]), FairnessSummary::default());
    }
}
