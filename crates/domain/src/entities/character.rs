//! Character aggregate - the root that owns traits, instances, and groupings
//!
//! The character owns every trait and instance outright, so dropping a
//! character drops everything it owns. All derived values (goal values,
//! combat metrics, breakdowns) are computed here because the referenced
//! traits and skill instances live in these collections: every computation
//! is a pure, synchronous read over current state, recomputed on every call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::{
    default_traits, CombatMetricInstance, GoalRollCategory, GoalRollInstance, SkillInstance,
    TraitScore,
};
use crate::error::DomainError;
use crate::library::{
    CombatMetricTemplate, GoalRollTemplate, Library, SkillRef, SkillTemplate, SkillType,
};
use crate::resolve::{EffectiveGoalRoll, Resolvable};
use crate::value_objects::{FormulaTerm, TraitCategory, TraitKind};
use wyrdsheet_domain::{
    CharacterId, CombatMetricInstanceId, CombatMetricTemplateId, GoalRollCategoryId,
    GoalRollInstanceId, GoalRollTemplateId, SkillInstanceId, SkillTemplateId, TraitId,
};

/// The three metrics every new character starts with.
const DEFAULT_METRICS: [(&str, &str); 3] = [
    ("Vitality", "5 + Endurance"),
    ("Revivals", "Endurance / 2"),
    ("Wyrd", "Wyrd"),
];

/// A player character and everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub traits: Vec<TraitScore>,
    pub skills: Vec<SkillInstance>,
    pub goal_rolls: Vec<GoalRollInstance>,
    pub combat_metrics: Vec<CombatMetricInstance>,
    pub goal_roll_categories: Vec<GoalRollCategory>,
}

impl Character {
    /// Create a character seeded with the built-in trait set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            created_at: Utc::now(),
            traits: default_traits(),
            skills: Vec::new(),
            goal_rolls: Vec::new(),
            combat_metrics: Vec::new(),
            goal_roll_categories: Vec::new(),
        }
    }

    /// Add the stock combat metrics, creating (or reusing) their library
    /// templates by name.
    pub fn add_default_metrics(&mut self, library: &mut Library) -> Result<(), DomainError> {
        for (name, formula) in DEFAULT_METRICS {
            self.add_custom_metric(library, name, formula)?;
        }
        Ok(())
    }

    // ── Traits ──────────────────────────────────────────────────────────

    pub fn trait_by_id(&self, id: TraitId) -> Option<&TraitScore> {
        self.traits.iter().find(|t| t.id == id)
    }

    pub fn trait_by_id_mut(&mut self, id: TraitId) -> Option<&mut TraitScore> {
        self.traits.iter_mut().find(|t| t.id == id)
    }

    /// Case-insensitive lookup by classification and name.
    pub fn find_trait(
        &self,
        kind: TraitKind,
        category: TraitCategory,
        name: &str,
    ) -> Option<&TraitScore> {
        self.traits
            .iter()
            .find(|t| t.kind == kind && t.category == category && t.matches_name(name))
    }

    pub fn find_trait_mut(
        &mut self,
        kind: TraitKind,
        category: TraitCategory,
        name: &str,
    ) -> Option<&mut TraitScore> {
        self.traits
            .iter_mut()
            .find(|t| t.kind == kind && t.category == category && t.matches_name(name))
    }

    /// The trait's value, or 0 when the character has no such trait.
    pub fn trait_value(&self, kind: TraitKind, category: TraitCategory, name: &str) -> i32 {
        self.find_trait(kind, category, name).map_or(0, |t| t.value)
    }

    /// Value of the first trait matching the name regardless of kind or
    /// category, or 0. Combat-metric formulas reference traits this way.
    /// First match in storage order wins (attributes are seeded before
    /// natural skills).
    pub fn named_trait_value(&self, name: &str) -> i32 {
        self.traits
            .iter()
            .find(|t| t.matches_name(name))
            .map_or(0, |t| t.value)
    }

    /// Add a user-defined trait, starting at its category minimum.
    pub fn add_trait(
        &mut self,
        kind: TraitKind,
        category: TraitCategory,
        name: &str,
    ) -> Result<TraitId, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Trait name cannot be empty"));
        }
        let order = self
            .traits
            .iter()
            .map(|t| t.display_order)
            .max()
            .unwrap_or(0)
            + 1;
        let score = TraitScore::new(kind, category, name).with_order(order);
        let id = score.id;
        self.traits.push(score);
        Ok(id)
    }

    /// Remove a user-added trait. Built-in traits are not deletable.
    ///
    /// Goal rolls and metrics referencing the removed trait by name degrade
    /// to a zero contribution; nothing is cascaded or rewritten.
    pub fn remove_trait(&mut self, id: TraitId) -> Result<TraitScore, DomainError> {
        let index = self
            .traits
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| DomainError::not_found("TraitScore", id.to_string()))?;
        if !self.traits[index].deletable {
            return Err(DomainError::constraint("built-in traits cannot be deleted"));
        }
        Ok(self.traits.remove(index))
    }

    // ── Skills ──────────────────────────────────────────────────────────

    pub fn skill_by_id(&self, id: SkillInstanceId) -> Option<&SkillInstance> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn skill_by_id_mut(&mut self, id: SkillInstanceId) -> Option<&mut SkillInstance> {
        self.skills.iter_mut().find(|s| s.id == id)
    }

    /// The character's instance of the given skill template, matched by
    /// template identity (never by name).
    pub fn skill_for_template(&self, template: SkillTemplateId) -> Option<&SkillInstance> {
        self.skills.iter().find(|s| s.template == template)
    }

    pub fn add_skill_from_template(&mut self, template: SkillTemplateId) -> SkillInstanceId {
        let instance = SkillInstance::from_template(template);
        let id = instance.id;
        self.skills.push(instance);
        id
    }

    /// Add a from-scratch skill. Reuses a same-named library template when
    /// one exists, otherwise creates one, so custom entries stay shareable.
    pub fn add_custom_skill(
        &mut self,
        library: &mut Library,
        name: &str,
        skill_type: SkillType,
    ) -> Result<SkillInstanceId, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Skill name cannot be empty"));
        }
        let template = match library.find_skill_by_name(name) {
            Some(existing) => {
                debug!(template = %existing.name, id = %existing.id, "reusing skill template");
                existing.id
            }
            None => library.add_skill(SkillTemplate::new(name, skill_type)),
        };
        Ok(self.add_skill_from_template(template))
    }

    pub fn remove_skill(&mut self, id: SkillInstanceId) -> Result<SkillInstance, DomainError> {
        let index = self
            .skills
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found("SkillInstance", id.to_string()))?;
        Ok(self.skills.remove(index))
    }

    // ── Goal rolls ──────────────────────────────────────────────────────

    pub fn goal_roll_by_id(&self, id: GoalRollInstanceId) -> Option<&GoalRollInstance> {
        self.goal_rolls.iter().find(|r| r.id == id)
    }

    pub fn goal_roll_by_id_mut(&mut self, id: GoalRollInstanceId) -> Option<&mut GoalRollInstance> {
        self.goal_rolls.iter_mut().find(|r| r.id == id)
    }

    pub fn add_goal_roll_from_template(
        &mut self,
        template: GoalRollTemplateId,
    ) -> GoalRollInstanceId {
        let instance = GoalRollInstance::from_template(template);
        let id = instance.id;
        self.goal_rolls.push(instance);
        id
    }

    /// Add a from-scratch goal roll, creating (or reusing) its library
    /// template by name.
    pub fn add_custom_goal_roll(
        &mut self,
        library: &mut Library,
        name: &str,
        attribute_name: &str,
        attribute_category: TraitCategory,
        skill: SkillRef,
    ) -> Result<GoalRollInstanceId, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Goal roll name cannot be empty"));
        }
        let template = match library.find_goal_roll_by_name(name) {
            Some(existing) => {
                debug!(template = %existing.name, id = %existing.id, "reusing goal roll template");
                existing.id
            }
            None => library.add_goal_roll(
                GoalRollTemplate::new(name, attribute_name, attribute_category).with_skill(skill),
            ),
        };
        Ok(self.add_goal_roll_from_template(template))
    }

    pub fn remove_goal_roll(
        &mut self,
        id: GoalRollInstanceId,
    ) -> Result<GoalRollInstance, DomainError> {
        let index = self
            .goal_rolls
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DomainError::not_found("GoalRollInstance", id.to_string()))?;
        Ok(self.goal_rolls.remove(index))
    }

    /// Branch a goal roll, additionally capturing the identity of the traits
    /// its effective references currently resolve to. A branched roll then
    /// survives a trait rename that would orphan a name-based lookup.
    /// No-op when the roll is already branched or not owned.
    pub fn branch_goal_roll(&mut self, id: GoalRollInstanceId, library: &Library) {
        let Some(index) = self.goal_rolls.iter().position(|r| r.id == id) else {
            return;
        };
        if self.goal_rolls[index].is_branched {
            return;
        }
        let effective = self.goal_rolls[index].resolve(library);
        let attribute_trait = self
            .find_trait(
                TraitKind::Attribute,
                effective.attribute_category,
                &effective.attribute_name,
            )
            .map(|t| t.id);
        let natural_skill_trait = match &effective.skill {
            SkillRef::Natural { name } => self
                .find_trait(TraitKind::NaturalSkill, TraitCategory::NaturalSkills, name)
                .map(|t| t.id),
            SkillRef::Learned { .. } => None,
        };

        let roll = &mut self.goal_rolls[index];
        roll.branch(library);
        roll.overrides.attribute_trait = attribute_trait;
        roll.overrides.natural_skill_trait = natural_skill_trait;
    }

    /// The goal roll's target number: attribute + skill + modifier.
    pub fn goal_value(&self, roll: &GoalRollInstance, library: &Library) -> i32 {
        self.goal_breakdown(roll, library)
            .iter()
            .map(|term| term.value)
            .sum()
    }

    /// The ordered display terms behind [`Character::goal_value`]; the terms
    /// always sum to it.
    pub fn goal_breakdown(&self, roll: &GoalRollInstance, library: &Library) -> Vec<FormulaTerm> {
        let effective = roll.resolve(library);
        let (attribute_label, attribute_value) = self.attribute_term(&effective);
        let (skill_label, skill_value) = self.skill_term(&effective, library);
        vec![
            FormulaTerm::new(attribute_label, attribute_value),
            FormulaTerm::new(skill_label, skill_value),
            FormulaTerm::new("Modifier", effective.modifier),
        ]
    }

    /// The attribute half of a goal roll, as a labelled term: captured
    /// identity first (branched rolls), then case-insensitive name lookup,
    /// then 0. The label is the resolved trait's current name when identity
    /// hits, so a rename shows through.
    fn attribute_term(&self, effective: &EffectiveGoalRoll) -> (String, i32) {
        if let Some(score) = effective.attribute_trait.and_then(|id| self.trait_by_id(id)) {
            return (score.name.clone(), score.value);
        }
        let label = if effective.attribute_name.is_empty() {
            "Attribute".to_string()
        } else {
            effective.attribute_name.clone()
        };
        let value = self.trait_value(
            TraitKind::Attribute,
            effective.attribute_category,
            &effective.attribute_name,
        );
        (label, value)
    }

    /// The skill half of a goal roll, as a labelled term.
    fn skill_term(&self, effective: &EffectiveGoalRoll, library: &Library) -> (String, i32) {
        match &effective.skill {
            SkillRef::Natural { name } => {
                if let Some(score) = effective
                    .natural_skill_trait
                    .and_then(|id| self.trait_by_id(id))
                {
                    return (score.name.clone(), score.value);
                }
                let label = if name.is_empty() {
                    "Skill".to_string()
                } else {
                    name.clone()
                };
                let value = self.trait_value(
                    TraitKind::NaturalSkill,
                    TraitCategory::NaturalSkills,
                    name,
                );
                (label, value)
            }
            SkillRef::Learned { template } => {
                let Some(template) = *template else {
                    return ("Skill".to_string(), 0);
                };
                match self.skill_for_template(template) {
                    Some(instance) => {
                        let skill = instance.resolve(library);
                        let label = if skill.name.is_empty() {
                            "Skill".to_string()
                        } else {
                            skill.name
                        };
                        (label, skill.modifier)
                    }
                    // Referenced skill not picked up by this character yet
                    None => {
                        let label = library
                            .skill(template)
                            .map_or_else(|| "Skill".to_string(), |t| t.name.clone());
                        (label, 0)
                    }
                }
            }
        }
    }

    // ── Combat metrics ──────────────────────────────────────────────────

    pub fn metric_by_id(&self, id: CombatMetricInstanceId) -> Option<&CombatMetricInstance> {
        self.combat_metrics.iter().find(|m| m.id == id)
    }

    pub fn metric_by_id_mut(
        &mut self,
        id: CombatMetricInstanceId,
    ) -> Option<&mut CombatMetricInstance> {
        self.combat_metrics.iter_mut().find(|m| m.id == id)
    }

    pub fn add_metric_from_template(
        &mut self,
        template: CombatMetricTemplateId,
    ) -> CombatMetricInstanceId {
        let instance = CombatMetricInstance::from_template(template);
        let id = instance.id;
        self.combat_metrics.push(instance);
        id
    }

    /// Add a from-scratch combat metric, creating (or reusing) its library
    /// template by name. The formula text is parsed at this point.
    pub fn add_custom_metric(
        &mut self,
        library: &mut Library,
        name: &str,
        formula_text: &str,
    ) -> Result<CombatMetricInstanceId, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Combat metric name cannot be empty"));
        }
        let template = match library.find_combat_metric_by_name(name) {
            Some(existing) => {
                debug!(template = %existing.name, id = %existing.id, "reusing combat metric template");
                existing.id
            }
            None => library.add_combat_metric(CombatMetricTemplate::new(name, formula_text)),
        };
        Ok(self.add_metric_from_template(template))
    }

    pub fn remove_metric(
        &mut self,
        id: CombatMetricInstanceId,
    ) -> Result<CombatMetricInstance, DomainError> {
        let index = self
            .combat_metrics
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| DomainError::not_found("CombatMetricInstance", id.to_string()))?;
        Ok(self.combat_metrics.remove(index))
    }

    /// The metric's calculated base value: its effective formula evaluated
    /// against this character's traits.
    pub fn metric_value(&self, metric: &CombatMetricInstance, library: &Library) -> i32 {
        metric
            .resolve(library)
            .formula
            .evaluate(|name| self.named_trait_value(name))
    }

    /// The ordered display terms behind [`Character::metric_value`]; the
    /// terms always sum to it.
    pub fn metric_breakdown(
        &self,
        metric: &CombatMetricInstance,
        library: &Library,
    ) -> Vec<FormulaTerm> {
        metric
            .resolve(library)
            .formula
            .breakdown(|name| self.named_trait_value(name))
    }

    // ── Goal roll categories ────────────────────────────────────────────

    pub fn add_goal_roll_category(&mut self, name: &str) -> Result<GoalRollCategoryId, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Category name cannot be empty"));
        }
        let order = self
            .goal_roll_categories
            .iter()
            .map(|c| c.display_order)
            .max()
            .unwrap_or(0)
            + 1;
        let category = GoalRollCategory::new(name).with_order(order);
        let id = category.id;
        self.goal_roll_categories.push(category);
        Ok(id)
    }

    /// Remove a display bucket and unfile the goal rolls in it.
    pub fn remove_goal_roll_category(
        &mut self,
        id: GoalRollCategoryId,
    ) -> Result<GoalRollCategory, DomainError> {
        let index = self
            .goal_roll_categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| DomainError::not_found("GoalRollCategory", id.to_string()))?;
        for roll in self.goal_rolls.iter_mut().filter(|r| r.category == Some(id)) {
            roll.category = None;
        }
        Ok(self.goal_roll_categories.remove(index))
    }

    /// The goal rolls filed under the given bucket (`None` = unfiled).
    pub fn goal_rolls_in_category(
        &self,
        category: Option<GoalRollCategoryId>,
    ) -> Vec<&GoalRollInstance> {
        self.goal_rolls
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }
}
