//! Goal roll instance entity
//!
//! A goal roll is the target number for a task: one attribute plus one
//! skill (natural or learned) plus a flat modifier. The instance only holds
//! the references; the owning character computes the number (see
//! `Character::goal_value`), because the referenced traits live there.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::library::{Library, SkillRef};
use crate::resolve::{EffectiveGoalRoll, Resolvable};
use crate::value_objects::TraitCategory;
use wyrdsheet_domain::{GoalRollCategoryId, GoalRollInstanceId, GoalRollTemplateId, TraitId};

/// Override slots for a goal roll instance, authoritative only while
/// branched.
///
/// The captured trait ids are filled in by `Character::branch_goal_roll`
/// when the referenced traits can be resolved at branch time; evaluation
/// prefers them over name lookup so a branched roll survives a trait
/// rename.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRollOverrides {
    pub name: String,
    pub description: String,
    pub modifier: i32,
    pub keywords: String,
    pub attribute_name: String,
    pub attribute_category: TraitCategory,
    pub attribute_trait: Option<TraitId>,
    pub skill: SkillRef,
    pub natural_skill_trait: Option<TraitId>,
}

/// A character's goal roll, referencing a shared template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRollInstance {
    pub id: GoalRollInstanceId,
    /// Provenance and revert target. May dangle after template deletion.
    pub template: GoalRollTemplateId,
    pub is_branched: bool,
    pub branched_at: Option<DateTime<Utc>>,
    pub overrides: GoalRollOverrides,
    /// Display bucket on the owning character; not part of the calculation.
    pub category: Option<GoalRollCategoryId>,
}

impl GoalRollInstance {
    pub fn from_template(template: GoalRollTemplateId) -> Self {
        Self {
            id: GoalRollInstanceId::new(),
            template,
            is_branched: false,
            branched_at: None,
            overrides: GoalRollOverrides::default(),
            category: None,
        }
    }

    pub fn in_category(mut self, category: GoalRollCategoryId) -> Self {
        self.category = Some(category);
        self
    }

    /// Searchable tags for this instance's effective values.
    pub fn search_keywords(&self, library: &Library) -> Vec<String> {
        self.resolve(library).search_keywords(library)
    }

    fn effective_from_overrides(&self) -> EffectiveGoalRoll {
        EffectiveGoalRoll {
            name: self.overrides.name.clone(),
            description: self.overrides.description.clone(),
            modifier: self.overrides.modifier,
            keywords: self.overrides.keywords.clone(),
            attribute_name: self.overrides.attribute_name.clone(),
            attribute_category: self.overrides.attribute_category,
            attribute_trait: self.overrides.attribute_trait,
            skill: self.overrides.skill.clone(),
            natural_skill_trait: self.overrides.natural_skill_trait,
        }
    }
}

impl Resolvable for GoalRollInstance {
    type Effective = EffectiveGoalRoll;

    fn is_branched(&self) -> bool {
        self.is_branched
    }

    fn resolve(&self, library: &Library) -> EffectiveGoalRoll {
        if self.is_branched {
            return self.effective_from_overrides();
        }
        match library.goal_roll(self.template) {
            Some(template) => template.to_effective(),
            None => self.effective_from_overrides(),
        }
    }

    fn branch(&mut self, library: &Library) {
        if self.is_branched {
            return;
        }
        let effective = self.resolve(library);
        self.overrides = GoalRollOverrides {
            name: effective.name,
            description: effective.description,
            modifier: effective.modifier,
            keywords: effective.keywords,
            attribute_name: effective.attribute_name,
            attribute_category: effective.attribute_category,
            attribute_trait: None,
            skill: effective.skill,
            natural_skill_trait: None,
        };
        self.is_branched = true;
        self.branched_at = Some(Utc::now());
        debug!(instance = %self.id, template = %self.template, "branched goal roll instance");
    }

    fn revert_to_template(&mut self) {
        if !self.is_branched {
            return;
        }
        self.overrides = GoalRollOverrides::default();
        self.is_branched = false;
        self.branched_at = None;
        debug!(instance = %self.id, template = %self.template, "reverted goal roll instance");
    }
}

/// Victory points earned by a successful roll against a goal value.
///
/// One point per full three the roll clears above 8; rolls below 8 go
/// negative. Floor division, so `victory_points(7) == -1`, not 0.
///
/// Exposed for the roll-resolution surface; deliberately not folded into any
/// modifier computed by this crate.
pub fn victory_points(roll_value: i32) -> i32 {
    (roll_value - 8).div_euclid(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::GoalRollTemplate;

    fn library_with_shoot() -> (Library, GoalRollTemplateId) {
        let mut library = Library::new();
        let id = library.add_goal_roll(
            GoalRollTemplate::new("Shoot", "Dexterity", TraitCategory::Body)
                .with_skill(SkillRef::natural("Shoot"))
                .with_modifier(2),
        );
        (library, id)
    }

    #[test]
    fn test_victory_points() {
        assert_eq!(victory_points(8), 0);
        assert_eq!(victory_points(11), 1);
        assert_eq!(victory_points(14), 2);
        assert_eq!(victory_points(7), -1);
    }

    #[test]
    fn test_linked_instance_follows_template() {
        let (mut library, id) = library_with_shoot();
        let instance = GoalRollInstance::from_template(id);

        let effective = instance.resolve(&library);
        assert_eq!(effective.attribute_name, "Dexterity");
        assert_eq!(effective.modifier, 2);
        assert_eq!(effective.attribute_trait, None);

        if let Some(template) = library.goal_roll_mut(id) {
            template.attribute_name = "Perception".to_string();
        }
        assert_eq!(instance.resolve(&library).attribute_name, "Perception");
    }

    #[test]
    fn test_branch_revert_round_trip() {
        let (library, id) = library_with_shoot();
        let mut instance = GoalRollInstance::from_template(id);
        let before = instance.resolve(&library);

        instance.branch(&library);
        assert!(instance.is_branched);
        assert_eq!(instance.overrides.attribute_name, "Dexterity");

        instance.revert_to_template();
        assert!(!instance.is_branched);
        assert_eq!(instance.resolve(&library), before);
        assert_eq!(instance.overrides, GoalRollOverrides::default());
    }

    #[test]
    fn test_branch_twice_keeps_edited_overrides() {
        let (library, id) = library_with_shoot();
        let mut instance = GoalRollInstance::from_template(id);
        instance.branch(&library);
        instance.overrides.modifier = 9;
        let branched_at = instance.branched_at;

        instance.branch(&library);
        assert_eq!(instance.overrides.modifier, 9);
        assert_eq!(instance.branched_at, branched_at);
    }

    #[test]
    fn test_dangling_template_resolves_to_overrides() {
        let (mut library, id) = library_with_shoot();
        let instance = GoalRollInstance::from_template(id);
        library.remove_goal_roll(id);

        let effective = instance.resolve(&library);
        assert_eq!(effective.name, "");
        assert_eq!(effective.attribute_name, "");
        assert_eq!(effective.modifier, 0);
    }

    #[test]
    fn test_category_is_not_part_of_resolution() {
        let (library, id) = library_with_shoot();
        let bucket = GoalRollCategoryId::new();
        let instance = GoalRollInstance::from_template(id).in_category(bucket);
        assert_eq!(instance.category, Some(bucket));

        let mut branched = instance.clone();
        branched.branch(&library);
        branched.revert_to_template();
        assert_eq!(branched.category, Some(bucket));
    }
}
