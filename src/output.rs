//! Output channel: the ordered, append-only emission log of one run.
//!
//! Rule actions write here only through the engine's [`ActionContext`]
//! capability; nothing else appends. Order is firing order — the engine
//! never re-sorts, and any presentation ordering (e.g. by confidence rank)
//! is the caller's concern.
//!
//! [`ActionContext`]: crate::engine::ActionContext

use serde::{Deserialize, Serialize};

use crate::fact::{Confidence, Diagnosis};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A diagnosis emitted by a rule firing. Mirrors the `Diagnosis` fact the
/// same firing asserted; the two are produced as a pair and stay one-to-one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub disease: String,
    pub confidence: Confidence,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl From<&Diagnosis> for DiagnosisRecord {
    fn from(d: &Diagnosis) -> Self {
        Self {
            disease: d.disease.clone(),
            confidence: d.confidence,
            reason: d.reason.clone(),
            severity: d.severity.clone(),
            recommendation: d.recommendation.clone(),
        }
    }
}

/// Class of an emitted recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    /// Danger sign: act now (referral, IV rehydration, surgery).
    Urgent,
    /// Differential note steering further workup.
    Differential,
}

/// A recommendation emitted by a rule firing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
}

/// One entry in the emission log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emission {
    Diagnosis(DiagnosisRecord),
    Recommendation(Recommendation),
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// Append-only log of everything the run emitted, in firing order.
#[derive(Debug, Default)]
pub struct OutputChannel {
    log: Vec<Emission>,
}

impl OutputChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_diagnosis(&mut self, record: DiagnosisRecord) {
        self.log.push(Emission::Diagnosis(record));
    }

    pub(crate) fn push_recommendation(&mut self, rec: Recommendation) {
        self.log.push(Emission::Recommendation(rec));
    }

    /// Emitted diagnoses, in firing order.
    pub fn diagnoses(&self) -> impl Iterator<Item = &DiagnosisRecord> {
        self.log.iter().filter_map(|e| match e {
            Emission::Diagnosis(d) => Some(d),
            Emission::Recommendation(_) => None,
        })
    }

    /// Emitted recommendations, in firing order.
    pub fn recommendations(&self) -> impl Iterator<Item = &Recommendation> {
        self.log.iter().filter_map(|e| match e {
            Emission::Recommendation(r) => Some(r),
            Emission::Diagnosis(_) => None,
        })
    }

    /// The raw interleaved log.
    pub fn log(&self) -> &[Emission] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_preserves_interleaving() {
        let mut out = OutputChannel::new();
        out.push_diagnosis(DiagnosisRecord {
            disease: "cholera".into(),
            confidence: Confidence::Confirmed,
            reason: "culture".into(),
            severity: None,
            recommendation: None,
        });
        out.push_recommendation(Recommendation {
            kind: RecommendationKind::Urgent,
            message: "refer".into(),
        });
        out.push_diagnosis(DiagnosisRecord {
            disease: "cholera".into(),
            confidence: Confidence::Confident,
            reason: "rice-water".into(),
            severity: Some("severe".into()),
            recommendation: None,
        });

        assert_eq!(out.len(), 3);
        let diagnoses: Vec<_> = out.diagnoses().collect();
        assert_eq!(diagnoses.len(), 2);
        assert_eq!(diagnoses[0].confidence, Confidence::Confirmed);
        assert_eq!(diagnoses[1].confidence, Confidence::Confident);
        assert_eq!(out.recommendations().count(), 1);
    }

    #[test]
    fn record_serialization_shape() {
        let record = DiagnosisRecord {
            disease: "malaria".into(),
            confidence: Confidence::Suspect,
            reason: "fever in endemic area".into(),
            severity: None,
            recommendation: Some("confirm with blood smear".into()),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["confidence"], "suspect");
        assert!(json.get("severity").is_none());
        assert_eq!(json["recommendation"], "confirm with blood smear");
    }
}
