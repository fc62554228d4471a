use anyhow::{anyhow, Result};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::assoc::{
    AssociationParams, MaskPolicy, DEFAULT_HEAD_BAND_FRACTION, DEFAULT_OVERLAP_THRESHOLD,
};
use crate::detect::{Category, LabelMap};
use crate::ingest::normalize_label;

const DEFAULT_MIN_CONFIDENCE: f32 = 0.35;

#[derive(Debug, Deserialize, Default)]
struct EngineConfigFile {
    head_band_fraction: Option<f64>,
    overlap_threshold: Option<f64>,
    mask_policy: Option<MaskPolicy>,
    min_confidence: Option<f32>,
    labels: Option<LabelConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct LabelConfigFile {
    person: Option<Vec<String>>,
    helmet: Option<Vec<String>>,
    vest: Option<Vec<String>>,
    mask: Option<Vec<String>>,
    no_mask: Option<Vec<String>>,
}

/// Calibration and vocabulary for one engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub head_band_fraction: f64,
    pub overlap_threshold: f64,
    pub mask_policy: MaskPolicy,
    /// Detections below this confidence are dropped at ingest.
    pub min_confidence: f32,
    pub labels: LabelMap,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            head_band_fraction: DEFAULT_HEAD_BAND_FRACTION,
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            mask_policy: MaskPolicy::default(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            labels: LabelMap::default(),
        }
    }
}

impl EngineConfig {
    /// Load from `PPE_CONFIG` (if set), then apply `PPE_*` overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("PPE_CONFIG").ok();
        Self::load_from(config_path.as_deref().map(Path::new))
    }

    /// Load from an explicit file (if any), then apply `PPE_*` overrides.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: EngineConfigFile) -> Self {
        let defaults = Self::default();
        let mut labels = defaults.labels;
        if let Some(file_labels) = file.labels {
            for (category, tokens) in [
                (Category::Person, file_labels.person),
                (Category::Helmet, file_labels.helmet),
                (Category::Vest, file_labels.vest),
                (Category::Mask, file_labels.mask),
                (Category::NoMask, file_labels.no_mask),
            ] {
                if let Some(tokens) = tokens {
                    *labels.tokens_mut(category) = tokens;
                }
            }
        }
        Self {
            head_band_fraction: file
                .head_band_fraction
                .unwrap_or(defaults.head_band_fraction),
            overlap_threshold: file.overlap_threshold.unwrap_or(defaults.overlap_threshold),
            mask_policy: file.mask_policy.unwrap_or(defaults.mask_policy),
            min_confidence: file.min_confidence.unwrap_or(defaults.min_confidence),
            labels,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(fraction) = std::env::var("PPE_HEAD_BAND_FRACTION") {
            self.head_band_fraction = fraction
                .trim()
                .parse()
                .map_err(|_| anyhow!("PPE_HEAD_BAND_FRACTION must be a number"))?;
        }
        if let Ok(threshold) = std::env::var("PPE_OVERLAP_THRESHOLD") {
            self.overlap_threshold = threshold
                .trim()
                .parse()
                .map_err(|_| anyhow!("PPE_OVERLAP_THRESHOLD must be a number"))?;
        }
        if let Ok(policy) = std::env::var("PPE_MASK_POLICY") {
            if !policy.trim().is_empty() {
                self.mask_policy = policy.parse()?;
            }
        }
        if let Ok(min_confidence) = std::env::var("PPE_MIN_CONFIDENCE") {
            self.min_confidence = min_confidence
                .trim()
                .parse()
                .map_err(|_| anyhow!("PPE_MIN_CONFIDENCE must be a number"))?;
        }
        Ok(())
    }

    /// Check ranges and normalize the label vocabulary.
    pub fn validate(&mut self) -> Result<()> {
        if !(self.head_band_fraction > 0.0 && self.head_band_fraction <= 1.0) {
            return Err(anyhow!(
                "head_band_fraction must be in (0, 1], got {}",
                self.head_band_fraction
            ));
        }
        if !(0.0..1.0).contains(&self.overlap_threshold) {
            return Err(anyhow!(
                "overlap_threshold must be in [0, 1), got {}",
                self.overlap_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(anyhow!(
                "min_confidence must be in [0, 1], got {}",
                self.min_confidence
            ));
        }

        let mut owners: HashMap<String, Category> = HashMap::new();
        for category in Category::ALL {
            let tokens = self.labels.tokens_mut(category);
            let mut seen = HashSet::new();
            let normalized: Vec<String> = tokens
                .iter()
                .map(|t| normalize_label(t))
                .filter(|t| !t.is_empty() && seen.insert(t.clone()))
                .collect();
            if normalized.is_empty() && category != Category::Mask {
                return Err(anyhow!(
                    "label vocabulary for {} must not be empty",
                    category.as_str()
                ));
            }
            for token in &normalized {
                if let Some(prev) = owners.insert(token.clone(), category) {
                    if prev != category {
                        return Err(anyhow!(
                            "label '{}' assigned to both {} and {}",
                            token,
                            prev.as_str(),
                            category.as_str()
                        ));
                    }
                }
            }
            *tokens = normalized;
        }

        // Tri-state needs a positive mask class; without one nobody could be SAFE.
        if self.labels.mask.is_empty() && self.mask_policy == MaskPolicy::TriState {
            log::warn!("no mask labels configured; using negative_only mask policy");
            self.mask_policy = MaskPolicy::NegativeOnly;
        }
        Ok(())
    }

    pub fn association_params(&self) -> AssociationParams {
        AssociationParams {
            head_band_fraction: self.head_band_fraction,
            overlap_threshold: self.overlap_threshold,
            mask_policy: self.mask_policy,
        }
    }

    /// Canonical text form of every parameter that affects verdicts.
    pub fn canonical(&self) -> String {
        let mut out = format!(
            "head_band_fraction={};overlap_threshold={};mask_policy={};min_confidence={}",
            self.head_band_fraction,
            self.overlap_threshold,
            self.mask_policy.as_str(),
            self.min_confidence
        );
        for category in Category::ALL {
            out.push_str(&format!(
                ";{}={}",
                category.as_str(),
                self.labels.tokens(category).join(",")
            ));
        }
        out
    }

    /// SHA-256 over [`Self::canonical`], hex encoded.
    pub fn ruleset_hash(&self) -> String {
        let digest: [u8; 32] = Sha256::digest(self.canonical().as_bytes()).into();
        hex::encode(digest)
    }
}

fn read_config_file(path: &Path) -> Result<EngineConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::{MaskState, Verdict};
    use crate::detect::Detection;
    use crate::engine::ComplianceEngine;

    #[test]
    fn defaults_validate() {
        let mut cfg = EngineConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn label_tokens_are_normalized() {
        let mut cfg = EngineConfig::default();
        cfg.labels.helmet = vec!["Hard-Hat".to_string(), "Safety Helmet".to_string()];
        cfg.validate().unwrap();
        assert_eq!(cfg.labels.helmet, vec!["hardhat", "safetyhelmet"]);
    }

    #[test]
    fn shared_token_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.labels.mask = vec!["nomask".to_string()];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_mask_vocabulary_is_allowed() {
        let mut cfg = EngineConfig::default();
        cfg.labels.mask.clear();
        cfg.validate().unwrap();
        cfg.labels.person.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_mask_vocabulary_falls_back_to_negative_only() {
        let mut cfg = EngineConfig::default();
        cfg.labels.mask.clear();
        cfg.validate().unwrap();
        assert_eq!(cfg.mask_policy, MaskPolicy::NegativeOnly);

        let dets = vec![
            Detection::new("person", [0, 0, 100, 200].into(), 0.9),
            Detection::new("hardhat", [40, 10, 60, 30].into(), 0.9),
            Detection::new("safetyvest", [0, 50, 100, 150].into(), 0.9),
            Detection::new("mask", [0, 0, 40, 100].into(), 0.9),
        ];
        let eval = ComplianceEngine::new(cfg).evaluate(&dets);
        let a = eval.persons[0].assessment;
        assert_eq!(a.mask_state, MaskState::Mask);
        assert_eq!(a.verdict, Verdict::Safe);
        assert_eq!(eval.summary.compliance_score, 100);
    }

    #[test]
    fn duplicate_tokens_are_removed_anywhere_in_the_list() {
        let mut cfg = EngineConfig::default();
        cfg.labels.helmet = vec![
            "helmet".to_string(),
            "hardhat".to_string(),
            "Helmet".to_string(),
        ];
        cfg.validate().unwrap();
        assert_eq!(cfg.labels.helmet, vec!["helmet", "hardhat"]);
    }

    #[test]
    fn out_of_range_thresholds_are_rejected() {
        let mut cfg = EngineConfig {
            head_band_fraction: 0.0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());

        let mut cfg = EngineConfig {
            overlap_threshold: 1.0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());

        let mut cfg = EngineConfig {
            min_confidence: 1.5,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn ruleset_hash_tracks_calibration() {
        let base = EngineConfig::default();
        assert_eq!(base.ruleset_hash(), EngineConfig::default().ruleset_hash());
        assert_eq!(base.ruleset_hash().len(), 64);

        let tuned = EngineConfig {
            overlap_threshold: 0.2,
            ..EngineConfig::default()
        };
        assert_ne!(base.ruleset_hash(), tuned.ruleset_hash());

        let binary = EngineConfig {
            mask_policy: MaskPolicy::NegativeOnly,
            ..EngineConfig::default()
        };
        assert_ne!(base.ruleset_hash(), binary.ruleset_hash());
    }
}
