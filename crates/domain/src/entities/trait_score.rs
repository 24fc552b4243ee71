//! TraitScore entity - a character's base numeric values
//!
//! Traits are the numbers everything else derives from: attributes grouped
//! into Body/Mind/Spirit/Occult, and natural skills in their fixed group.
//! Characters are seeded with the built-in set (not deletable); players can
//! add their own on top.

use serde::{Deserialize, Serialize};

use crate::value_objects::{minimum_value, TraitCategory, TraitKind};
use wyrdsheet_domain::TraitId;

/// A user-set base value on a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitScore {
    pub id: TraitId,
    pub kind: TraitKind,
    pub category: TraitCategory,
    pub name: String,
    /// Invariant: `value >= minimum_value(kind, category)`. The UI writes
    /// freely and calls [`TraitScore::clamp_to_minimum`] after decrements.
    pub value: i32,
    /// Position within the category group.
    pub display_order: u32,
    /// Built-in traits are not deletable.
    pub deletable: bool,
}

impl TraitScore {
    /// Create a user-added trait, starting at the category minimum.
    pub fn new(kind: TraitKind, category: TraitCategory, name: impl Into<String>) -> Self {
        Self {
            id: TraitId::new(),
            kind,
            category,
            name: name.into(),
            value: minimum_value(kind, category),
            display_order: 0,
            deletable: true,
        }
    }

    /// Create one of the built-in traits every character is seeded with.
    pub fn built_in(kind: TraitKind, category: TraitCategory, name: impl Into<String>) -> Self {
        let mut score = Self::new(kind, category, name);
        score.deletable = false;
        score
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self.clamp_to_minimum();
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.display_order = order;
        self
    }

    /// The lowest value this trait may hold, from its kind and category.
    pub fn minimum_value(&self) -> i32 {
        minimum_value(self.kind, self.category)
    }

    /// Raise the value to the minimum if it has fallen below.
    pub fn clamp_to_minimum(&mut self) {
        let minimum = self.minimum_value();
        if self.value < minimum {
            self.value = minimum;
        }
    }

    /// Case-insensitive name match, used by formula resolution.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// The built-in trait set every new character starts with.
pub fn default_traits() -> Vec<TraitScore> {
    use TraitCategory::*;
    use TraitKind::*;

    vec![
        // Body
        TraitScore::built_in(Attribute, Body, "Strength").with_order(1),
        TraitScore::built_in(Attribute, Body, "Dexterity").with_order(2),
        TraitScore::built_in(Attribute, Body, "Endurance").with_order(3),
        // Mind
        TraitScore::built_in(Attribute, Mind, "Wits").with_order(4),
        TraitScore::built_in(Attribute, Mind, "Perception").with_order(5),
        TraitScore::built_in(Attribute, Mind, "Tech").with_order(6),
        // Spirit (paired attributes)
        TraitScore::built_in(Attribute, Spirit, "Extrovert").with_order(7),
        TraitScore::built_in(Attribute, Spirit, "Introvert").with_order(8),
        TraitScore::built_in(Attribute, Spirit, "Passion").with_order(9),
        TraitScore::built_in(Attribute, Spirit, "Calm").with_order(10),
        TraitScore::built_in(Attribute, Spirit, "Faith").with_order(11),
        TraitScore::built_in(Attribute, Spirit, "Ego").with_order(12),
        // Occult (start at zero; most characters have none)
        TraitScore::built_in(Attribute, Occult, "Psi").with_order(13),
        TraitScore::built_in(Attribute, Occult, "Urge").with_order(14),
        TraitScore::built_in(Attribute, Occult, "Theurgy").with_order(15),
        TraitScore::built_in(Attribute, Occult, "Hubris").with_order(16),
        // Natural skills
        TraitScore::built_in(NaturalSkill, NaturalSkills, "Charm").with_order(17),
        TraitScore::built_in(NaturalSkill, NaturalSkills, "Dodge").with_order(18),
        TraitScore::built_in(NaturalSkill, NaturalSkills, "Fight").with_order(19),
        TraitScore::built_in(NaturalSkill, NaturalSkills, "Impress").with_order(20),
        TraitScore::built_in(NaturalSkill, NaturalSkills, "Melee").with_order(21),
        TraitScore::built_in(NaturalSkill, NaturalSkills, "Observe").with_order(22),
        TraitScore::built_in(NaturalSkill, NaturalSkills, "Shoot").with_order(23),
        TraitScore::built_in(NaturalSkill, NaturalSkills, "Sneak").with_order(24),
        TraitScore::built_in(NaturalSkill, NaturalSkills, "Vigor").with_order(25),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trait_starts_at_minimum() {
        let body = TraitScore::new(TraitKind::Attribute, TraitCategory::Body, "Strength");
        assert_eq!(body.value, 1);

        let occult = TraitScore::new(TraitKind::Attribute, TraitCategory::Occult, "Psi");
        assert_eq!(occult.value, 0);

        let natural = TraitScore::new(
            TraitKind::NaturalSkill,
            TraitCategory::NaturalSkills,
            "Dodge",
        );
        assert_eq!(natural.value, 1);
    }

    #[test]
    fn test_clamp_to_minimum() {
        let mut score = TraitScore::new(TraitKind::Attribute, TraitCategory::Body, "Strength");
        score.value = -3;
        score.clamp_to_minimum();
        assert_eq!(score.value, 1);

        score.value = 7;
        score.clamp_to_minimum();
        assert_eq!(score.value, 7);
    }

    #[test]
    fn test_with_value_clamps() {
        let score = TraitScore::new(TraitKind::Attribute, TraitCategory::Mind, "Wits")
            .with_value(-5);
        assert_eq!(score.value, 1);
    }

    #[test]
    fn test_built_in_is_not_deletable() {
        let score = TraitScore::built_in(TraitKind::Attribute, TraitCategory::Body, "Strength");
        assert!(!score.deletable);
        let custom = TraitScore::new(TraitKind::Attribute, TraitCategory::Occult, "Sixth Sense");
        assert!(custom.deletable);
    }

    #[test]
    fn test_matches_name_is_case_insensitive() {
        let score = TraitScore::new(TraitKind::Attribute, TraitCategory::Body, "Strength");
        assert!(score.matches_name("strength"));
        assert!(score.matches_name("STRENGTH"));
        assert!(!score.matches_name("dexterity"));
    }

    #[test]
    fn test_default_traits_shape() {
        let traits = default_traits();
        assert_eq!(traits.len(), 25);
        assert!(traits.iter().all(|t| !t.deletable));
        assert!(traits
            .iter()
            .filter(|t| t.category == TraitCategory::Occult)
            .all(|t| t.value == 0));
        assert!(traits
            .iter()
            .filter(|t| t.kind == TraitKind::NaturalSkill)
            .all(|t| t.value == 1 && t.category == TraitCategory::NaturalSkills));
        // Orders are unique
        let mut orders: Vec<u32> = traits.iter().map(|t| t.display_order).collect();
        orders.sort_unstable();
        orders.dedup();
        assert_eq!(orders.len(), traits.len());
    }

    #[test]
    fn test_wyrd_inputs_are_seeded() {
        let traits = default_traits();
        for name in ["Psi", "Theurgy", "Introvert", "Faith"] {
            assert!(
                traits.iter().any(|t| t.matches_name(name)),
                "missing {name}"
            );
        }
    }
}
