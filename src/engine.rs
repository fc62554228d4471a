//! One evaluation pass: detections in, per-person reports and a site summary out.

use serde::{Deserialize, Serialize};

use crate::assoc::{resolve, Evidence};
use crate::compliance::{PersonAssessment, SiteSummary};
use crate::config::EngineConfig;
use crate::detect::{BoundingBox, Detection};
use crate::render::Annotation;

/// Result for one detected person.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonReport {
    /// Position among the person detections of the input, starting at 0.
    pub index: usize,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub assessment: PersonAssessment,
    pub annotation: Annotation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Ordered by [`PersonReport::index`].
    pub persons: Vec<PersonReport>,
    pub summary: SiteSummary,
}

impl Evaluation {
    pub fn assessments(&self) -> Vec<PersonAssessment> {
        self.persons.iter().map(|p| p.assessment).collect()
    }
}

/// Stateless compliance engine. Evaluating the same detections twice gives
/// the same result.
#[derive(Clone, Debug, Default)]
pub struct ComplianceEngine {
    config: EngineConfig,
}

impl ComplianceEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate every person in one image.
    ///
    /// Detections with unrecognized labels are ignored. Confidence is not
    /// consulted here; filter before calling if needed.
    pub fn evaluate(&self, detections: &[Detection]) -> Evaluation {
        let evidence = Evidence::partition(detections, &self.config.labels);
        let params = self.config.association_params();

        if evidence.ignored > 0 {
            let labels: Vec<&str> = evidence.ignored_labels.iter().map(String::as_str).collect();
            log::warn!(
                "ignoring {} detection(s) with unrecognized labels: {}",
                evidence.ignored,
                labels.join(", ")
            );
        }

        let persons: Vec<PersonReport> = evidence
            .persons
            .iter()
            .enumerate()
            .map(|(index, bbox)| {
                let association = resolve(bbox, &evidence, &params);
                let assessment = PersonAssessment::from_association(&association);
                log::debug!(
                    "person {}: helmet={} vest={} mask={:?} -> {} ({}%)",
                    index,
                    assessment.has_helmet,
                    assessment.has_vest,
                    assessment.mask_state,
                    assessment.verdict.as_str(),
                    assessment.confidence
                );
                PersonReport {
                    index,
                    bbox: *bbox,
                    annotation: Annotation::for_person(*bbox, &assessment),
                    assessment,
                }
            })
            .collect();

        let assessments: Vec<PersonAssessment> = persons.iter().map(|p| p.assessment).collect();
        let summary = SiteSummary::aggregate(&assessments);
        log::info!(
            "evaluated {} person(s): compliance {}% risk {}",
            summary.total_persons,
            summary.compliance_score,
            summary.risk_tier.as_str()
        );

        Evaluation { persons, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::{RiskTier, Verdict};

    fn det(label: &str, b: [i32; 4]) -> Detection {
        Detection::new(label, b.into(), 0.8)
    }

    #[test]
    fn reports_follow_person_input_order() {
        let dets = vec![
            det("hardhat", [240, 10, 260, 30]),
            det("person", [200, 0, 300, 200]),
            det("safetyvest", [0, 50, 100, 150]),
            det("person", [0, 0, 100, 200]),
        ];
        let eval = ComplianceEngine::default().evaluate(&dets);
        assert_eq!(eval.persons.len(), 2);
        assert_eq!(eval.persons[0].index, 0);
        assert_eq!(eval.persons[0].bbox, BoundingBox::new(200, 0, 300, 200));
        assert!(eval.persons[0].assessment.has_helmet);
        assert!(!eval.persons[0].assessment.has_vest);
        assert_eq!(eval.persons[1].index, 1);
        assert!(!eval.persons[1].assessment.has_helmet);
        assert!(eval.persons[1].assessment.has_vest);
    }

    #[test]
    fn people_without_ppe_score_zero() {
        let dets = vec![det("person", [0, 0, 50, 100]), det("person", [60, 0, 110, 100])];
        let eval = ComplianceEngine::default().evaluate(&dets);
        for p in &eval.persons {
            assert_eq!(p.assessment.confidence, 0);
            assert_eq!(p.assessment.verdict, Verdict::Unsafe);
        }
        assert_eq!(eval.summary.compliance_score, 0);
        assert_eq!(eval.summary.risk_tier, RiskTier::High);
    }

    #[test]
    fn unrecognized_labels_change_nothing() {
        let base = vec![det("person", [0, 0, 100, 200]), det("hardhat", [40, 10, 60, 30])];
        let mut noisy = base.clone();
        noisy.push(det("forklift", [0, 0, 100, 200]));
        noisy.push(det("gloves", [10, 100, 30, 120]));

        let engine = ComplianceEngine::default();
        assert_eq!(engine.evaluate(&base), engine.evaluate(&noisy));
    }
}
