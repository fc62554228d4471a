//! Report emission for the reporting layer.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::compliance::SiteSummary;
use crate::config::EngineConfig;
use crate::engine::{Evaluation, PersonReport};

/// Serialized evaluation, bound to the rule set that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub generated_by: String,
    pub ruleset_hash: String,
    pub mask_policy: String,
    pub persons: Vec<PersonReport>,
    pub summary: SiteSummary,
}

impl Report {
    pub fn new(config: &EngineConfig, evaluation: Evaluation) -> Self {
        Self {
            generated_by: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            ruleset_hash: config.ruleset_hash(),
            mask_policy: config.mask_policy.as_str().to_string(),
            persons: evaluation.persons,
            summary: evaluation.summary,
        }
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Human-readable site summary followed by one line per person.
pub fn render_text(evaluation: &Evaluation) -> String {
    let s = &evaluation.summary;
    let mut out = String::new();
    let _ = writeln!(out, "Workforce:   {}", s.total_persons);
    let _ = writeln!(
        out,
        "Helmet OK:   {} (missing {})",
        s.helmet_counts.yes, s.helmet_counts.no
    );
    let _ = writeln!(
        out,
        "Vest OK:     {} (missing {})",
        s.vest_counts.yes, s.vest_counts.no
    );
    let _ = writeln!(
        out,
        "Mask OK:     {} (missing {})",
        s.mask_counts.yes, s.mask_counts.no
    );
    let _ = writeln!(out, "Compliance:  {}%", s.compliance_score);
    let _ = writeln!(out, "Risk:        {}", s.risk_tier.as_str());
    let _ = writeln!(out, "Advice:      {}", s.recommendation);
    for p in &evaluation.persons {
        let b = p.bbox;
        let _ = writeln!(
            out,
            "  #{} [{}, {}, {}, {}] {}",
            p.index, b.x1, b.y1, b.x2, b.y2, p.annotation.label_text
        );
    }
    out
}
