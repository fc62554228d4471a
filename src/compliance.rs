//! Per-person verdicts and the site-level summary.

use serde::{Deserialize, Serialize};

use crate::assoc::Association;
pub use crate::assoc::MaskState;

/// Number of equally weighted PPE categories per person.
pub const CATEGORIES_PER_PERSON: u32 = 3;

/// Inclusive lower bound of the LOW tier.
pub const LOW_RISK_MIN_SCORE: u8 = 85;
/// Inclusive lower bound of the MEDIUM tier.
pub const MEDIUM_RISK_MIN_SCORE: u8 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Safe,
    Unsafe,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Safe => "SAFE",
            Verdict::Unsafe => "UNSAFE",
        }
    }
}

/// Compliance result for one person in one evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAssessment {
    pub has_helmet: bool,
    pub has_vest: bool,
    pub mask_state: MaskState,
    /// Share of satisfied categories, 0..=100.
    pub confidence: u8,
    pub verdict: Verdict,
}

impl PersonAssessment {
    /// Score an association. Only a person satisfying all three categories
    /// is [`Verdict::Safe`].
    pub fn from_association(assoc: &Association) -> Self {
        let has_mask = assoc.mask_state == MaskState::Mask;
        let matched = u32::from(assoc.has_helmet) + u32::from(assoc.has_vest) + u32::from(has_mask);
        let verdict = if matched == CATEGORIES_PER_PERSON {
            Verdict::Safe
        } else {
            Verdict::Unsafe
        };
        Self {
            has_helmet: assoc.has_helmet,
            has_vest: assoc.has_vest,
            mask_state: assoc.mask_state,
            confidence: percent(matched, CATEGORIES_PER_PERSON),
            verdict,
        }
    }

    pub fn has_mask(&self) -> bool {
        self.mask_state == MaskState::Mask
    }
}

/// Rounded percentage, half away from zero. `total == 0` yields 0.
fn percent(part: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (100.0 * f64::from(part) / f64::from(total)).round();
    pct.clamp(0.0, 100.0) as u8
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub yes: u32,
    pub no: u32,
}

impl CategoryCounts {
    fn record(&mut self, present: bool) {
        if present {
            self.yes += 1;
        } else {
            self.no += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.yes + self.no
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_score(score: u8) -> Self {
        if score >= LOW_RISK_MIN_SCORE {
            RiskTier::Low
        } else if score >= MEDIUM_RISK_MIN_SCORE {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            RiskTier::Low => "Site is compliant. Maintain existing safety protocols.",
            RiskTier::Medium => {
                "Partial compliance detected. Increase supervision and PPE enforcement."
            }
            RiskTier::High => {
                "Critical safety risk identified. Immediate corrective action required."
            }
        }
    }
}

/// Site-level roll-up of one evaluation. Holds no history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSummary {
    pub total_persons: u32,
    pub helmet_counts: CategoryCounts,
    pub vest_counts: CategoryCounts,
    pub mask_counts: CategoryCounts,
    /// Share of passed category checks across all persons, 0..=100.
    pub compliance_score: u8,
    pub risk_tier: RiskTier,
    pub recommendation: String,
}

impl SiteSummary {
    /// Fold per-person assessments into a summary. An empty scene scores 0.
    pub fn aggregate(assessments: &[PersonAssessment]) -> Self {
        let mut helmet_counts = CategoryCounts::default();
        let mut vest_counts = CategoryCounts::default();
        let mut mask_counts = CategoryCounts::default();
        for a in assessments {
            helmet_counts.record(a.has_helmet);
            vest_counts.record(a.has_vest);
            mask_counts.record(a.has_mask());
        }

        let total_persons = u32::try_from(assessments.len()).unwrap_or(u32::MAX);
        let passed = helmet_counts.yes + vest_counts.yes + mask_counts.yes;
        let compliance_score = percent(passed, total_persons.saturating_mul(CATEGORIES_PER_PERSON));
        let risk_tier = RiskTier::from_score(compliance_score);

        Self {
            total_persons,
            helmet_counts,
            vest_counts,
            mask_counts,
            compliance_score,
            risk_tier,
            recommendation: risk_tier.recommendation().to_string(),
        }
    }
}
