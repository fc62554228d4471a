/// Case-fold a detector label and strip spaces and hyphens.
///
/// Other punctuation is kept so distinct tokens never collapse together.
pub fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}
