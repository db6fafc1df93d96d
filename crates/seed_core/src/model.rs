//! Typed result model and validation of the inference service response.

use crate::error::UploadError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A label the service may send either as a JSON string or a JSON number.
///
/// The value is kept verbatim so that display and export reproduce exactly what the
/// server sent (`1` stays `1`, `"High"` stays `High`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Number(serde_json::Number),
    Text(String),
}

impl Label {
    pub fn text(value: impl Into<String>) -> Self {
        Label::Text(value.into())
    }

    pub fn number(value: u64) -> Self {
        Label::Number(value.into())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Integral floats print without a fraction, `2.0` as `2`.
            Label::Number(n) => match n.as_f64() {
                Some(value) if n.is_f64() && value.is_finite() => write!(f, "{value}"),
                _ => write!(f, "{n}"),
            },
            Label::Text(s) => f.write_str(s),
        }
    }
}

/// One classified seed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedResult {
    pub seed_id: Label,
    pub filename: String,
    pub classification: String,
    /// Model confidence in [0,1].
    pub confidence: f64,
    pub severity: Label,
    pub pest_count: u32,
    pub holes_detected: u32,
}

/// Aggregate figures over one analyzed batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_seeds: u64,
    pub damaged_percentage: f64,
    pub avg_pest_count: f64,
    /// Severity label to count. Sorted so every render sees the same order.
    pub severity_distribution: BTreeMap<String, u64>,
}

/// A validated response: a non-empty result list together with its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisBatch {
    results: Vec<SeedResult>,
    summary: Summary,
}

impl AnalysisBatch {
    /// Pair results with their summary. Rejects empty result lists and confidences
    /// outside [0,1].
    pub fn new(results: Vec<SeedResult>, summary: Summary) -> Result<Self, UploadError> {
        if results.is_empty() {
            return Err(UploadError::MalformedResponse(
                "response contained no results".into(),
            ));
        }
        for (idx, r) in results.iter().enumerate() {
            if !r.confidence.is_finite() || !(0.0..=1.0).contains(&r.confidence) {
                return Err(UploadError::MalformedResponse(format!(
                    "results[{idx}].confidence out of range: {}",
                    r.confidence
                )));
            }
        }
        Ok(Self { results, summary })
    }

    pub fn results(&self) -> &[SeedResult] {
        &self.results
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn into_parts(self) -> (Vec<SeedResult>, Summary) {
        (self.results, self.summary)
    }
}

#[derive(Deserialize)]
struct WireResponse {
    results: Vec<SeedResult>,
    summary: Summary,
}

/// Parse a 2xx response body.
///
/// A body that is not JSON at all is a transport-level failure; JSON that does not match
/// the result model is a malformed response.
pub fn parse_response(body: &[u8]) -> Result<AnalysisBatch, UploadError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| UploadError::UploadFailed(format!("response body is not JSON: {e}")))?;
    if !value.get("results").is_some_and(|v| v.is_array()) {
        return Err(UploadError::MalformedResponse(
            "missing `results` array".into(),
        ));
    }
    if !value.get("summary").is_some_and(|v| v.is_object()) {
        return Err(UploadError::MalformedResponse(
            "missing `summary` object".into(),
        ));
    }
    let wire: WireResponse = serde_json::from_value(value)
        .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

    let mut seen = HashSet::new();
    for r in &wire.results {
        if !seen.insert(&r.seed_id) {
            tracing::warn!("duplicate seed_id {} in response", r.seed_id);
        }
    }

    AnalysisBatch::new(wire.results, wire.summary)
}

/// Difference between a server-reported aggregate and the value derived from the results.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryDrift {
    TotalSeeds { reported: u64, derived: u64 },
    AvgPestCount { reported: f64, derived: f64 },
    SeverityDistribution {
        reported: BTreeMap<String, u64>,
        derived: BTreeMap<String, u64>,
    },
}

impl fmt::Display for SummaryDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryDrift::TotalSeeds { reported, derived } => {
                write!(f, "total_seeds reported {reported}, derived {derived}")
            }
            SummaryDrift::AvgPestCount { reported, derived } => {
                write!(f, "avg_pest_count reported {reported}, derived {derived}")
            }
            SummaryDrift::SeverityDistribution { reported, derived } => write!(
                f,
                "severity_distribution reported {reported:?}, derived {derived:?}"
            ),
        }
    }
}

// Servers commonly round the mean to two decimals.
const AVG_TOLERANCE: f64 = 0.005;

/// Severity label to count, derived from the results.
pub fn derive_severity_distribution(results: &[SeedResult]) -> BTreeMap<String, u64> {
    let mut dist = BTreeMap::new();
    for r in results {
        *dist.entry(r.severity.to_string()).or_insert(0) += 1;
    }
    dist
}

/// Mean pest count, 0 for an empty slice.
pub fn derive_avg_pest_count(results: &[SeedResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: u64 = results.iter().map(|r| u64::from(r.pest_count)).sum();
    total as f64 / results.len() as f64
}

/// Compare the server summary with aggregates recomputed from the results.
pub fn check_summary(batch: &AnalysisBatch) -> Vec<SummaryDrift> {
    let results = batch.results();
    let summary = batch.summary();
    let mut drift = Vec::new();

    let derived_total = results.len() as u64;
    if summary.total_seeds != derived_total {
        drift.push(SummaryDrift::TotalSeeds {
            reported: summary.total_seeds,
            derived: derived_total,
        });
    }

    let derived_avg = derive_avg_pest_count(results);
    if (summary.avg_pest_count - derived_avg).abs() > AVG_TOLERANCE {
        drift.push(SummaryDrift::AvgPestCount {
            reported: summary.avg_pest_count,
            derived: derived_avg,
        });
    }

    let derived_dist = derive_severity_distribution(results);
    if summary.severity_distribution != derived_dist {
        drift.push(SummaryDrift::SeverityDistribution {
            reported: summary.severity_distribution.clone(),
            derived: derived_dist,
        });
    }

    drift
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    const FLOAT_LABEL_JSON: &str = r#"{"results":[
        {"seed_id":1.0,"filename":"x.png","classification":"Broken","confidence":1,
         "severity":2.0,"pest_count":1,"holes_detected":4}],
      "summary":{"total_seeds":1,"damaged_percentage":100,"avg_pest_count":1,
         "severity_distribution":{"2":1}}}"#;

    #[test]
    fn integral_float_labels_print_as_integers() {
        let batch = parse_response(FLOAT_LABEL_JSON.as_bytes()).unwrap();
        let result = &batch.results()[0];
        assert_eq!(result.seed_id.to_string(), "1");
        assert_eq!(result.severity.to_string(), "2");
        assert!(check_summary(&batch).is_empty());
    }

    #[test]
    fn fractional_float_label_keeps_its_fraction() {
        let label: Label = serde_json::from_str("2.5").unwrap();
        assert_eq!(label.to_string(), "2.5");
    }

    #[test]
    fn parses_well_formed_response() {
        let batch = parse_response(TWO_SEED_JSON.as_bytes()).unwrap();
        assert_eq!(batch, two_seed_batch());
        assert_eq!(batch.results()[1].severity.to_string(), "High");
        assert_relative_eq!(batch.summary().damaged_percentage, 50.0);
    }

    #[test]
    fn numeric_severity_and_string_seed_id_are_kept_verbatim() {
        let body = r#"{"results":[{"seed_id":"s-7","filename":"x.png","classification":"Broken",
            "confidence":1,"severity":2,"pest_count":1,"holes_detected":4}],
            "summary":{"total_seeds":1,"damaged_percentage":100,"avg_pest_count":1,
            "severity_distribution":{"2":1}}}"#;
        let batch = parse_response(body.as_bytes()).unwrap();
        let r = &batch.results()[0];
        assert_eq!(r.seed_id, Label::text("s-7"));
        assert_eq!(r.severity.to_string(), "2");
        assert!(check_summary(&batch).is_empty());
    }

    #[test]
    fn non_json_body_is_upload_failure() {
        let err = parse_response(b"<html>502</html>").unwrap_err();
        assert!(matches!(err, UploadError::UploadFailed(_)));
    }

    #[rstest]
    #[case::missing_summary(r#"{"results": []}"#)]
    #[case::summary_not_object(r#"{"results": [], "summary": 3}"#)]
    #[case::missing_results(r#"{"summary": {"total_seeds": 0, "damaged_percentage": 0,
        "avg_pest_count": 0, "severity_distribution": {}}}"#)]
    #[case::missing_pest_count(r#"{"results":[{"seed_id":1,"filename":"a.jpg",
        "classification":"Healthy","confidence":0.9,"severity":"None","holes_detected":0}],
        "summary":{"total_seeds":1,"damaged_percentage":0,"avg_pest_count":0,
        "severity_distribution":{"None":1}}}"#)]
    #[case::negative_pest_count(r#"{"results":[{"seed_id":1,"filename":"a.jpg",
        "classification":"Healthy","confidence":0.9,"severity":"None","pest_count":-1,
        "holes_detected":0}],"summary":{"total_seeds":1,"damaged_percentage":0,
        "avg_pest_count":0,"severity_distribution":{"None":1}}}"#)]
    #[case::confidence_out_of_range(r#"{"results":[{"seed_id":1,"filename":"a.jpg",
        "classification":"Healthy","confidence":97,"severity":"None","pest_count":0,
        "holes_detected":0}],"summary":{"total_seeds":1,"damaged_percentage":0,
        "avg_pest_count":0,"severity_distribution":{"None":1}}}"#)]
    #[case::empty_results(r#"{"results": [], "summary": {"total_seeds": 0,
        "damaged_percentage": 0, "avg_pest_count": 0, "severity_distribution": {}}}"#)]
    fn shape_violations_are_malformed(#[case] body: &str) {
        let err = parse_response(body.as_bytes()).unwrap_err();
        assert!(
            matches!(err, UploadError::MalformedResponse(_)),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn consistent_summary_has_no_drift() {
        assert!(check_summary(&two_seed_batch()).is_empty());
    }

    #[test]
    fn drift_is_reported_per_aggregate() {
        let (results, mut summary) = two_seed_batch().into_parts();
        summary.total_seeds = 3;
        summary.avg_pest_count = 2.0;
        summary.severity_distribution.insert("Low".into(), 1);
        let batch = AnalysisBatch::new(results, summary).unwrap();

        let drift = check_summary(&batch);
        assert_eq!(drift.len(), 3);
        assert_eq!(
            drift[0],
            SummaryDrift::TotalSeeds {
                reported: 3,
                derived: 2
            }
        );
        assert!(matches!(drift[1], SummaryDrift::AvgPestCount { .. }));
        assert!(matches!(drift[2], SummaryDrift::SeverityDistribution { .. }));
    }

    #[test]
    fn rounded_server_average_is_tolerated() {
        let results = vec![
            seed(1, "a.jpg", "Damaged", 0.5, "Low", 1, 0),
            seed(2, "b.jpg", "Damaged", 0.5, "Low", 1, 0),
            seed(3, "c.jpg", "Damaged", 0.5, "Low", 2, 0),
        ];
        assert_relative_eq!(derive_avg_pest_count(&results), 4.0 / 3.0);
        let summary = Summary {
            total_seeds: 3,
            damaged_percentage: 100.0,
            avg_pest_count: 1.33,
            severity_distribution: BTreeMap::from([("Low".into(), 3)]),
        };
        let batch = AnalysisBatch::new(results, summary).unwrap();
        assert!(check_summary(&batch).is_empty());
    }
}
