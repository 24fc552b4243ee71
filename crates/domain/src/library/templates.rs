//! Shared template definitions.
//!
//! Templates are the reusable half of the template/instance split: one
//! library-owned definition that any number of character-owned instances
//! reference. Editing a template is immediately visible to every
//! non-branched instance pointing at it.

use serde::{Deserialize, Serialize};

use crate::library::Library;
use crate::resolve::{EffectiveCombatMetric, EffectiveGoalRoll, EffectiveSkill};
use crate::value_objects::{MetricFormula, TraitCategory};
use wyrdsheet_domain::{CombatMetricTemplateId, GoalRollTemplateId, SkillTemplateId};

/// How a learned skill was acquired, for display grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillType {
    #[default]
    Learned,
    Lore,
    Tongue,
}

impl SkillType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Learned => "Learned",
            Self::Lore => "Lore",
            Self::Tongue => "Tongue",
        }
    }

    /// The plural label the UI groups these skills under.
    pub fn group_label(&self) -> &'static str {
        match self {
            Self::Learned => "Learned Skills",
            Self::Lore => "Lores",
            Self::Tongue => "Tongues",
        }
    }
}

/// The skill half of a goal roll: either a natural skill looked up by name
/// on the owning character, or a learned skill matched by template identity
/// against the character's skill instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillRef {
    Natural { name: String },
    Learned { template: Option<SkillTemplateId> },
}

impl SkillRef {
    pub fn natural(name: impl Into<String>) -> Self {
        Self::Natural { name: name.into() }
    }

    pub fn learned(template: SkillTemplateId) -> Self {
        Self::Learned {
            template: Some(template),
        }
    }
}

impl Default for SkillRef {
    fn default() -> Self {
        Self::Natural {
            name: String::new(),
        }
    }
}

/// A reusable learned-skill definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillTemplate {
    pub id: SkillTemplateId,
    pub name: String,
    pub description: String,
    /// Raw comma-separated user keywords.
    pub keywords: String,
    /// Starting rating for instances that follow this template.
    pub modifier: i32,
    pub skill_type: SkillType,
}

impl SkillTemplate {
    pub fn new(name: impl Into<String>, skill_type: SkillType) -> Self {
        Self {
            id: SkillTemplateId::new(),
            name: name.into(),
            description: String::new(),
            keywords: String::new(),
            modifier: 0,
            skill_type,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    /// The template's fields as an effective view, the same shape a
    /// non-branched instance resolves to.
    pub fn to_effective(&self) -> EffectiveSkill {
        EffectiveSkill {
            name: self.name.clone(),
            description: self.description.clone(),
            modifier: self.modifier,
            keywords: self.keywords.clone(),
            skill_type: self.skill_type,
        }
    }

    /// Searchable tags for the library browser.
    pub fn search_keywords(&self) -> Vec<String> {
        self.to_effective().search_keywords()
    }
}

/// A reusable goal-roll definition: which attribute and skill to combine,
/// and a flat modifier on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRollTemplate {
    pub id: GoalRollTemplateId,
    pub name: String,
    pub description: String,
    /// Raw comma-separated user keywords.
    pub keywords: String,
    pub modifier: i32,
    /// Attribute reference, resolved by name against the owning character.
    pub attribute_name: String,
    pub attribute_category: TraitCategory,
    pub skill: SkillRef,
}

impl GoalRollTemplate {
    pub fn new(
        name: impl Into<String>,
        attribute_name: impl Into<String>,
        attribute_category: TraitCategory,
    ) -> Self {
        Self {
            id: GoalRollTemplateId::new(),
            name: name.into(),
            description: String::new(),
            keywords: String::new(),
            modifier: 0,
            attribute_name: attribute_name.into(),
            attribute_category,
            skill: SkillRef::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn with_skill(mut self, skill: SkillRef) -> Self {
        self.skill = skill;
        self
    }

    pub fn to_effective(&self) -> EffectiveGoalRoll {
        EffectiveGoalRoll {
            name: self.name.clone(),
            description: self.description.clone(),
            modifier: self.modifier,
            keywords: self.keywords.clone(),
            attribute_name: self.attribute_name.clone(),
            attribute_category: self.attribute_category,
            attribute_trait: None,
            skill: self.skill.clone(),
            natural_skill_trait: None,
        }
    }

    /// Searchable tags for the library browser.
    pub fn search_keywords(&self, library: &Library) -> Vec<String> {
        self.to_effective().search_keywords(library)
    }
}

/// A reusable combat-metric definition built around a parsed formula.
///
/// The formula is parsed once here, at authoring time, rather than on every
/// read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatMetricTemplate {
    pub id: CombatMetricTemplateId,
    pub name: String,
    pub description: String,
    /// Raw comma-separated user keywords.
    pub keywords: String,
    pub modifier: i32,
    pub formula: MetricFormula,
}

impl CombatMetricTemplate {
    pub fn new(name: impl Into<String>, formula_text: &str) -> Self {
        Self {
            id: CombatMetricTemplateId::new(),
            name: name.into(),
            description: String::new(),
            keywords: String::new(),
            modifier: 0,
            formula: MetricFormula::parse(formula_text),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    /// Replace the formula from authoring text.
    pub fn set_formula(&mut self, formula_text: &str) {
        self.formula = MetricFormula::parse(formula_text);
    }

    pub fn to_effective(&self) -> EffectiveCombatMetric {
        EffectiveCombatMetric {
            name: self.name.clone(),
            description: self.description.clone(),
            modifier: self.modifier,
            keywords: self.keywords.clone(),
            formula: self.formula.clone(),
        }
    }

    /// Searchable tags for the library browser.
    pub fn search_keywords(&self) -> Vec<String> {
        self.to_effective().search_keywords()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_template_builder() {
        let template = SkillTemplate::new("Archery", SkillType::Learned)
            .with_description("Bows and crossbows")
            .with_keywords("ranged, combat")
            .with_modifier(2);
        assert_eq!(template.name, "Archery");
        assert_eq!(template.modifier, 2);
        assert_eq!(template.skill_type, SkillType::Learned);
    }

    #[test]
    fn test_goal_roll_template_defaults_to_empty_natural_skill() {
        let template = GoalRollTemplate::new("Shoot", "Dexterity", TraitCategory::Body);
        assert_eq!(
            template.skill,
            SkillRef::Natural {
                name: String::new()
            }
        );
        assert_eq!(template.modifier, 0);
    }

    #[test]
    fn test_combat_metric_template_parses_formula_at_edit_time() {
        let mut template = CombatMetricTemplate::new("Vitality", "5 + Endurance");
        assert_eq!(
            template.formula,
            MetricFormula::ConstantPlusTrait {
                base: 5,
                trait_name: "Endurance".to_string(),
            }
        );

        template.set_formula("Endurance / 2");
        assert_eq!(
            template.formula,
            MetricFormula::TraitDividedBy {
                trait_name: "Endurance".to_string(),
                divisor: 2,
            }
        );
    }

    #[test]
    fn test_skill_type_group_labels() {
        assert_eq!(SkillType::Learned.group_label(), "Learned Skills");
        assert_eq!(SkillType::Lore.group_label(), "Lores");
        assert_eq!(SkillType::Tongue.group_label(), "Tongues");
    }
}
