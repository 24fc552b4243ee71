//! Skill instance entity - a character's learned skills
//!
//! Skills on a character are either:
//! - Linked to a shared library template (edits to the template show up
//!   everywhere)
//! - Branched into private overrides for this character only

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::library::{Library, SkillType};
use crate::resolve::{EffectiveSkill, Resolvable};
use wyrdsheet_domain::{SkillInstanceId, SkillTemplateId};

/// Override slots for a skill instance, authoritative only while branched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillOverrides {
    pub name: String,
    pub description: String,
    pub modifier: i32,
    pub keywords: String,
    pub skill_type: SkillType,
}

/// A character's learned skill, referencing a shared template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillInstance {
    pub id: SkillInstanceId,
    /// Provenance and revert target. May dangle after template deletion;
    /// resolution then degrades to the override slots.
    pub template: SkillTemplateId,
    pub is_branched: bool,
    pub branched_at: Option<DateTime<Utc>>,
    pub overrides: SkillOverrides,
}

impl SkillInstance {
    pub fn from_template(template: SkillTemplateId) -> Self {
        Self {
            id: SkillInstanceId::new(),
            template,
            is_branched: false,
            branched_at: None,
            overrides: SkillOverrides::default(),
        }
    }

    /// Searchable tags for this instance's effective values.
    pub fn search_keywords(&self, library: &Library) -> Vec<String> {
        self.resolve(library).search_keywords()
    }

    fn effective_from_overrides(&self) -> EffectiveSkill {
        EffectiveSkill {
            name: self.overrides.name.clone(),
            description: self.overrides.description.clone(),
            modifier: self.overrides.modifier,
            keywords: self.overrides.keywords.clone(),
            skill_type: self.overrides.skill_type,
        }
    }
}

impl Resolvable for SkillInstance {
    type Effective = EffectiveSkill;

    fn is_branched(&self) -> bool {
        self.is_branched
    }

    fn resolve(&self, library: &Library) -> EffectiveSkill {
        if self.is_branched {
            return self.effective_from_overrides();
        }
        match library.skill(self.template) {
            Some(template) => template.to_effective(),
            None => self.effective_from_overrides(),
        }
    }

    fn branch(&mut self, library: &Library) {
        if self.is_branched {
            return;
        }
        let effective = self.resolve(library);
        self.overrides = SkillOverrides {
            name: effective.name,
            description: effective.description,
            modifier: effective.modifier,
            keywords: effective.keywords,
            skill_type: effective.skill_type,
        };
        self.is_branched = true;
        self.branched_at = Some(Utc::now());
        debug!(instance = %self.id, template = %self.template, "branched skill instance");
    }

    fn revert_to_template(&mut self) {
        if !self.is_branched {
            return;
        }
        self.overrides = SkillOverrides::default();
        self.is_branched = false;
        self.branched_at = None;
        debug!(instance = %self.id, template = %self.template, "reverted skill instance");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::SkillTemplate;

    fn library_with_archery() -> (Library, SkillTemplateId) {
        let mut library = Library::new();
        let id = library.add_skill(
            SkillTemplate::new("Archery", SkillType::Learned)
                .with_description("Bows and crossbows")
                .with_keywords("ranged, combat")
                .with_modifier(3),
        );
        (library, id)
    }

    #[test]
    fn test_linked_instance_follows_template() {
        let (mut library, id) = library_with_archery();
        let instance = SkillInstance::from_template(id);

        let effective = instance.resolve(&library);
        assert_eq!(effective.name, "Archery");
        assert_eq!(effective.modifier, 3);

        // Template edits are visible on next read
        if let Some(template) = library.skill_mut(id) {
            template.modifier = 5;
        }
        assert_eq!(instance.resolve(&library).modifier, 5);
    }

    #[test]
    fn test_dangling_template_degrades_to_empty() {
        let (mut library, id) = library_with_archery();
        let instance = SkillInstance::from_template(id);
        library.remove_skill(id);

        let effective = instance.resolve(&library);
        assert_eq!(effective.name, "");
        assert_eq!(effective.modifier, 0);
    }

    #[test]
    fn test_branch_copies_effective_values() {
        let (library, id) = library_with_archery();
        let mut instance = SkillInstance::from_template(id);
        instance.branch(&library);

        assert!(instance.is_branched);
        assert!(instance.branched_at.is_some());
        assert_eq!(instance.overrides.name, "Archery");
        assert_eq!(instance.overrides.modifier, 3);
        assert_eq!(instance.resolve(&library).name, "Archery");
    }

    #[test]
    fn test_branched_instance_ignores_template_edits() {
        let (mut library, id) = library_with_archery();
        let mut instance = SkillInstance::from_template(id);
        instance.branch(&library);

        if let Some(template) = library.skill_mut(id) {
            template.name = "Marksmanship".to_string();
            template.modifier = 9;
        }
        let effective = instance.resolve(&library);
        assert_eq!(effective.name, "Archery");
        assert_eq!(effective.modifier, 3);
    }

    #[test]
    fn test_branch_twice_is_a_noop() {
        let (library, id) = library_with_archery();
        let mut instance = SkillInstance::from_template(id);
        instance.branch(&library);
        let first_branched_at = instance.branched_at;

        instance.overrides.modifier = 7;
        instance.branch(&library);

        assert_eq!(instance.overrides.modifier, 7);
        assert_eq!(instance.branched_at, first_branched_at);
    }

    #[test]
    fn test_branch_revert_round_trip() {
        let (library, id) = library_with_archery();
        let mut instance = SkillInstance::from_template(id);
        let before = instance.resolve(&library);

        instance.branch(&library);
        instance.revert_to_template();

        assert!(!instance.is_branched);
        assert!(instance.branched_at.is_none());
        assert_eq!(instance.resolve(&library), before);
        assert_eq!(instance.overrides, SkillOverrides::default());
    }

    #[test]
    fn test_revert_when_linked_is_a_noop() {
        let (library, id) = library_with_archery();
        let mut instance = SkillInstance::from_template(id);
        instance.revert_to_template();
        assert!(!instance.is_branched);
        assert_eq!(instance.resolve(&library).name, "Archery");
    }

    #[test]
    fn test_branch_dangling_template_keeps_empty_overrides() {
        let (mut library, id) = library_with_archery();
        let mut instance = SkillInstance::from_template(id);
        library.remove_skill(id);

        instance.branch(&library);
        assert!(instance.is_branched);
        assert_eq!(instance.overrides.name, "");
        assert_eq!(instance.resolve(&library).modifier, 0);
    }

    #[test]
    fn test_search_keywords_follow_effective_values() {
        let (mut library, id) = library_with_archery();
        let mut instance = SkillInstance::from_template(id);
        assert!(instance
            .search_keywords(&library)
            .contains(&"archery".to_string()));

        instance.branch(&library);
        instance.overrides.name = "Marksmanship".to_string();
        if let Some(template) = library.skill_mut(id) {
            template.name = "Renamed".to_string();
        }
        let tags = instance.search_keywords(&library);
        assert!(tags.contains(&"marksmanship".to_string()));
        assert!(!tags.contains(&"renamed".to_string()));
    }
}
