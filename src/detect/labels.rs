use serde::{Deserialize, Serialize};

/// Detection classes the compliance engine understands.
///
/// The set is closed. Any other label is ignored by association.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Person,
    Helmet,
    Vest,
    Mask,
    /// Explicit violation marker emitted by the detector.
    NoMask,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Person,
        Category::Helmet,
        Category::Vest,
        Category::Mask,
        Category::NoMask,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Person => "person",
            Category::Helmet => "helmet",
            Category::Vest => "vest",
            Category::Mask => "mask",
            Category::NoMask => "no_mask",
        }
    }
}

/// Normalized label tokens recognized for each category.
///
/// Fixed at configuration time; lookups never allocate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMap {
    pub person: Vec<String>,
    pub helmet: Vec<String>,
    pub vest: Vec<String>,
    pub mask: Vec<String>,
    pub no_mask: Vec<String>,
}

impl Default for LabelMap {
    fn default() -> Self {
        Self {
            person: vec!["person".to_string()],
            helmet: vec!["hardhat".to_string(), "helmet".to_string()],
            vest: vec!["safetyvest".to_string(), "vest".to_string()],
            mask: vec!["mask".to_string()],
            no_mask: vec!["nomask".to_string()],
        }
    }
}

impl LabelMap {
    pub fn tokens(&self, category: Category) -> &[String] {
        match category {
            Category::Person => &self.person,
            Category::Helmet => &self.helmet,
            Category::Vest => &self.vest,
            Category::Mask => &self.mask,
            Category::NoMask => &self.no_mask,
        }
    }

    pub(crate) fn tokens_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Person => &mut self.person,
            Category::Helmet => &mut self.helmet,
            Category::Vest => &mut self.vest,
            Category::Mask => &mut self.mask,
            Category::NoMask => &mut self.no_mask,
        }
    }

    /// Map a normalized label to its category, if recognized.
    pub fn classify(&self, label: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|&category| self.tokens(category).iter().any(|t| t == label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_matches_detector_tokens() {
        let map = LabelMap::default();
        assert_eq!(map.classify("person"), Some(Category::Person));
        assert_eq!(map.classify("hardhat"), Some(Category::Helmet));
        assert_eq!(map.classify("safetyvest"), Some(Category::Vest));
        assert_eq!(map.classify("mask"), Some(Category::Mask));
        assert_eq!(map.classify("nomask"), Some(Category::NoMask));
    }

    #[test]
    fn unknown_labels_are_unclassified() {
        let map = LabelMap::default();
        assert_eq!(map.classify("forklift"), None);
        // Lookups are exact; normalization happens upstream.
        assert_eq!(map.classify("Hard-Hat"), None);
    }
}
