//! The shared template library.
//!
//! One `Library` per installation holds every template, partitioned by kind.
//! The library owns templates by value; characters and instances refer to
//! them only by id, so every mutation path goes through `&mut Library` and
//! the borrow checker provides the single-writer guarantee.
//!
//! Removing a template never touches the instances referencing it: a
//! dangling reference resolves to the instance's override slots (empty until
//! a branch happened), by design.

mod templates;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use templates::{CombatMetricTemplate, GoalRollTemplate, SkillRef, SkillTemplate, SkillType};
use wyrdsheet_domain::{CombatMetricTemplateId, GoalRollTemplateId, SkillTemplateId};

/// The shared catalog of reusable definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    skills: Vec<SkillTemplate>,
    goal_rolls: Vec<GoalRollTemplate>,
    combat_metrics: Vec<CombatMetricTemplate>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Skill templates ─────────────────────────────────────────────────

    pub fn add_skill(&mut self, template: SkillTemplate) -> SkillTemplateId {
        let id = template.id;
        debug!(template = %template.name, %id, "adding skill template");
        self.skills.push(template);
        id
    }

    pub fn skill(&self, id: SkillTemplateId) -> Option<&SkillTemplate> {
        self.skills.iter().find(|t| t.id == id)
    }

    pub fn skill_mut(&mut self, id: SkillTemplateId) -> Option<&mut SkillTemplate> {
        self.skills.iter_mut().find(|t| t.id == id)
    }

    /// Remove a skill template. Instances referencing it keep their dangling
    /// id and degrade to override values on resolution.
    pub fn remove_skill(&mut self, id: SkillTemplateId) -> Option<SkillTemplate> {
        let index = self.skills.iter().position(|t| t.id == id)?;
        let removed = self.skills.remove(index);
        debug!(template = %removed.name, %id, "removed skill template");
        Some(removed)
    }

    pub fn skills(&self) -> &[SkillTemplate] {
        &self.skills
    }

    /// Skill templates sorted by name for the library browser.
    pub fn skills_by_name(&self) -> Vec<&SkillTemplate> {
        let mut sorted: Vec<&SkillTemplate> = self.skills.iter().collect();
        sorted.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        sorted
    }

    /// Case-insensitive name lookup, first match wins. Used to reuse an
    /// existing template when a character adds a same-named custom skill.
    pub fn find_skill_by_name(&self, name: &str) -> Option<&SkillTemplate> {
        self.skills
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    // ── Goal roll templates ─────────────────────────────────────────────

    pub fn add_goal_roll(&mut self, template: GoalRollTemplate) -> GoalRollTemplateId {
        let id = template.id;
        debug!(template = %template.name, %id, "adding goal roll template");
        self.goal_rolls.push(template);
        id
    }

    pub fn goal_roll(&self, id: GoalRollTemplateId) -> Option<&GoalRollTemplate> {
        self.goal_rolls.iter().find(|t| t.id == id)
    }

    pub fn goal_roll_mut(&mut self, id: GoalRollTemplateId) -> Option<&mut GoalRollTemplate> {
        self.goal_rolls.iter_mut().find(|t| t.id == id)
    }

    pub fn remove_goal_roll(&mut self, id: GoalRollTemplateId) -> Option<GoalRollTemplate> {
        let index = self.goal_rolls.iter().position(|t| t.id == id)?;
        let removed = self.goal_rolls.remove(index);
        debug!(template = %removed.name, %id, "removed goal roll template");
        Some(removed)
    }

    pub fn goal_rolls(&self) -> &[GoalRollTemplate] {
        &self.goal_rolls
    }

    pub fn goal_rolls_by_name(&self) -> Vec<&GoalRollTemplate> {
        let mut sorted: Vec<&GoalRollTemplate> = self.goal_rolls.iter().collect();
        sorted.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        sorted
    }

    pub fn find_goal_roll_by_name(&self, name: &str) -> Option<&GoalRollTemplate> {
        self.goal_rolls
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    // ── Combat metric templates ─────────────────────────────────────────

    pub fn add_combat_metric(&mut self, template: CombatMetricTemplate) -> CombatMetricTemplateId {
        let id = template.id;
        debug!(template = %template.name, %id, "adding combat metric template");
        self.combat_metrics.push(template);
        id
    }

    pub fn combat_metric(&self, id: CombatMetricTemplateId) -> Option<&CombatMetricTemplate> {
        self.combat_metrics.iter().find(|t| t.id == id)
    }

    pub fn combat_metric_mut(
        &mut self,
        id: CombatMetricTemplateId,
    ) -> Option<&mut CombatMetricTemplate> {
        self.combat_metrics.iter_mut().find(|t| t.id == id)
    }

    pub fn remove_combat_metric(
        &mut self,
        id: CombatMetricTemplateId,
    ) -> Option<CombatMetricTemplate> {
        let index = self.combat_metrics.iter().position(|t| t.id == id)?;
        let removed = self.combat_metrics.remove(index);
        debug!(template = %removed.name, %id, "removed combat metric template");
        Some(removed)
    }

    pub fn combat_metrics(&self) -> &[CombatMetricTemplate] {
        &self.combat_metrics
    }

    pub fn combat_metrics_by_name(&self) -> Vec<&CombatMetricTemplate> {
        let mut sorted: Vec<&CombatMetricTemplate> = self.combat_metrics.iter().collect();
        sorted.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        sorted
    }

    pub fn find_combat_metric_by_name(&self, name: &str) -> Option<&CombatMetricTemplate> {
        self.combat_metrics
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::TraitCategory;

    #[test]
    fn test_add_and_lookup_skill() {
        let mut library = Library::new();
        let id = library.add_skill(SkillTemplate::new("Archery", SkillType::Learned));
        assert_eq!(library.skill(id).map(|t| t.name.as_str()), Some("Archery"));
        assert_eq!(library.skill(SkillTemplateId::new()), None);
    }

    #[test]
    fn test_edit_skill_in_place() {
        let mut library = Library::new();
        let id = library.add_skill(SkillTemplate::new("Archery", SkillType::Learned));
        if let Some(template) = library.skill_mut(id) {
            template.description = "Bows and crossbows".to_string();
        }
        assert_eq!(
            library.skill(id).map(|t| t.description.as_str()),
            Some("Bows and crossbows")
        );
    }

    #[test]
    fn test_remove_skill() {
        let mut library = Library::new();
        let id = library.add_skill(SkillTemplate::new("Archery", SkillType::Learned));
        let removed = library.remove_skill(id);
        assert_eq!(removed.map(|t| t.name), Some("Archery".to_string()));
        assert!(library.skill(id).is_none());
        assert!(library.remove_skill(id).is_none());
    }

    #[test]
    fn test_find_skill_by_name_is_case_insensitive() {
        let mut library = Library::new();
        library.add_skill(SkillTemplate::new("Archery", SkillType::Learned));
        assert!(library.find_skill_by_name("archery").is_some());
        assert!(library.find_skill_by_name("ARCHERY").is_some());
        assert!(library.find_skill_by_name("fencing").is_none());
    }

    #[test]
    fn test_duplicate_names_are_permitted() {
        let mut library = Library::new();
        let first = library.add_skill(SkillTemplate::new("Etiquette", SkillType::Learned));
        let second = library.add_skill(SkillTemplate::new("Etiquette", SkillType::Learned));
        assert_ne!(first, second);
        assert_eq!(library.skills().len(), 2);
        // First match wins on name lookup
        assert_eq!(library.find_skill_by_name("etiquette").map(|t| t.id), Some(first));
    }

    #[test]
    fn test_browse_sorted_by_name() {
        let mut library = Library::new();
        library.add_goal_roll(GoalRollTemplate::new("Shoot", "Dexterity", TraitCategory::Body));
        library.add_goal_roll(GoalRollTemplate::new(
            "charm",
            "Extrovert",
            TraitCategory::Spirit,
        ));
        library.add_goal_roll(GoalRollTemplate::new("Melee", "Dexterity", TraitCategory::Body));
        let names: Vec<&str> = library
            .goal_rolls_by_name()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["charm", "Melee", "Shoot"]);
    }
}
