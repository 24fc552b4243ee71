//! Keyword normalization utilities.
//!
//! Every searchable tag in the system passes through these functions, so the
//! search layer can rely on tags being trimmed, lower-cased, deduplicated and
//! sorted no matter where they came from (template fields, override fields,
//! or the user's free-form comma-separated keyword string).

use std::collections::BTreeSet;

/// Trims and lower-cases a raw tag.
///
/// # Examples
///
/// ```
/// use wyrdsheet_domain::common::normalize_tag;
///
/// assert_eq!(normalize_tag("  Observe "), "observe");
/// assert_eq!(normalize_tag("GOAL ROLL"), "goal roll");
/// ```
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Folds a plural category label into its singular form.
///
/// Intended for display-group labels like "Natural Skills" or "Lores", which
/// are plural in the UI but singular as search tags. Strips a single trailing
/// `s` unless the word ends in a double `s` ("Chess" stays "Chess").
pub fn singularize(label: &str) -> String {
    if label.len() > 1 && label.ends_with('s') && !label.ends_with("ss") {
        label[..label.len() - 1].to_string()
    } else {
        label.to_string()
    }
}

/// Splits a user-supplied comma-separated keyword string into normalized
/// tags, dropping empty segments.
///
/// # Examples
///
/// ```
/// use wyrdsheet_domain::common::split_tags;
///
/// assert_eq!(
///     split_tags("Psi, combat,, Ranged "),
///     vec!["psi".to_string(), "combat".to_string(), "ranged".to_string()],
/// );
/// ```
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(normalize_tag)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Merges tag sources into a sorted, deduplicated tag set.
///
/// Inputs are assumed to already be normalized; empty strings are dropped.
pub fn merge_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let set: BTreeSet<String> = tags.into_iter().filter(|tag| !tag.is_empty()).collect();
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("  Observe "), "observe");
        assert_eq!(normalize_tag("GOAL ROLL"), "goal roll");
        assert_eq!(normalize_tag(""), "");
        assert_eq!(normalize_tag("   "), "");
    }

    #[test]
    fn test_singularize_plural_labels() {
        assert_eq!(singularize("natural skills"), "natural skill");
        assert_eq!(singularize("lores"), "lore");
        assert_eq!(singularize("tongues"), "tongue");
    }

    #[test]
    fn test_singularize_leaves_singular_alone() {
        assert_eq!(singularize("occult"), "occult");
        assert_eq!(singularize("body"), "body");
    }

    #[test]
    fn test_singularize_double_s_is_not_a_plural() {
        assert_eq!(singularize("chess"), "chess");
    }

    #[test]
    fn test_singularize_single_letter() {
        assert_eq!(singularize("s"), "s");
    }

    #[test]
    fn test_split_tags_drops_empty_segments() {
        assert_eq!(
            split_tags("Psi, combat,, Ranged "),
            vec!["psi", "combat", "ranged"]
        );
        assert_eq!(split_tags(""), Vec::<String>::new());
        assert_eq!(split_tags(" , , "), Vec::<String>::new());
    }

    #[test]
    fn test_merge_tags_sorted_and_deduplicated() {
        let merged = merge_tags(vec![
            "psi".to_string(),
            "combat".to_string(),
            "psi".to_string(),
            String::new(),
            "aim".to_string(),
        ]);
        assert_eq!(merged, vec!["aim", "combat", "psi"]);
    }

    #[test]
    fn test_merge_tags_invariant_under_input_order() {
        let a = merge_tags(split_tags("ranged, psi, combat"));
        let b = merge_tags(split_tags("combat, ranged, psi"));
        assert_eq!(a, b);
    }
}
