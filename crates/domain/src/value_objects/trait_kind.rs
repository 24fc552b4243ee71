//! Trait kind and category value objects.
//!
//! Provides type safety for trait classification instead of using magic
//! strings like "attribute" or "Natural Skills".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a trait fundamentally is: a core attribute or a natural skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TraitKind {
    /// A core attribute (Strength, Wits, Faith, ...).
    Attribute,
    /// A skill every character has untrained (Dodge, Observe, ...).
    NaturalSkill,
}

impl TraitKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Attribute => "Attribute",
            Self::NaturalSkill => "Natural Skill",
        }
    }
}

impl fmt::Display for TraitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The display group a trait belongs to.
///
/// Attributes live in Body/Mind/Spirit/Occult; natural skills live in the
/// fixed "Natural Skills" group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TraitCategory {
    #[default]
    Body,
    Mind,
    Spirit,
    Occult,
    NaturalSkills,
}

impl TraitCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Body => "Body",
            Self::Mind => "Mind",
            Self::Spirit => "Spirit",
            Self::Occult => "Occult",
            Self::NaturalSkills => "Natural Skills",
        }
    }

    /// The categories an attribute may belong to, in display order.
    pub fn attribute_categories() -> [TraitCategory; 4] {
        [Self::Body, Self::Mind, Self::Spirit, Self::Occult]
    }
}

impl fmt::Display for TraitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for TraitCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "body" => Ok(Self::Body),
            "mind" => Ok(Self::Mind),
            "spirit" => Ok(Self::Spirit),
            "occult" => Ok(Self::Occult),
            "natural skills" | "natural skill" => Ok(Self::NaturalSkills),
            _ => Err(()),
        }
    }
}

/// The lowest value a trait of the given kind and category may hold.
///
/// Attributes bottom out at 1 so a character always has a body and a mind to
/// roll with; Occult attributes are the exception since most characters have
/// no occult power at all. Natural skills in the standard group start at 1
/// (everyone can dodge, badly); natural skills moved to any other group may
/// drop to 0.
///
/// This is a pure function of classification, never stored per trait.
pub fn minimum_value(kind: TraitKind, category: TraitCategory) -> i32 {
    match (kind, category) {
        (TraitKind::Attribute, TraitCategory::Occult) => 0,
        (TraitKind::Attribute, _) => 1,
        (TraitKind::NaturalSkill, TraitCategory::NaturalSkills) => 1,
        (TraitKind::NaturalSkill, _) => 0,
    }
}
