//! Template/override resolution.
//!
//! Every character-owned instance that references a library template can be
//! in one of two states:
//!
//! - **Linked** (`is_branched == false`): the template's fields are
//!   authoritative; the instance's override slots are ignored and empty.
//! - **Branched** (`is_branched == true`): the override slots are
//!   authoritative; the template reference is retained only as provenance
//!   and as the revert target.
//!
//! Resolution for each field is
//! `is_branched ? override : (template?.field ?? override)`; the override
//! is also the fallback when the template has been deleted, so a dangling
//! reference degrades to empty-string/zero values instead of failing.
//!
//! Exactly one of the two sources determines each effective field at any
//! time; the per-kind implementations return the whole effective bundle from
//! a single source so the two can never mix within one field.

use serde::{Deserialize, Serialize};

use crate::common::{merge_tags, none_if_empty, normalize_tag, singularize, split_tags};
use crate::library::{Library, SkillRef, SkillType};
use crate::value_objects::{MetricFormula, TraitCategory};
use wyrdsheet_domain::TraitId;

/// Two-state template/override resolution, implemented by each instance
/// kind.
pub trait Resolvable {
    /// The effective-field bundle this kind resolves to.
    type Effective;

    fn is_branched(&self) -> bool;

    /// The current effective view, from whichever source is authoritative.
    fn resolve(&self, library: &Library) -> Self::Effective;

    /// Copy every current effective value into the override slots and stop
    /// following the template. No-op when already branched: a second branch
    /// must never clobber overrides the user has since edited.
    fn branch(&mut self, library: &Library);

    /// Discard all overrides and follow the template again. No-op when
    /// already linked.
    fn revert_to_template(&mut self);
}

/// Effective view of a skill instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveSkill {
    pub name: String,
    pub description: String,
    /// The skill's rating, added into goal rolls that use it.
    pub modifier: i32,
    /// Raw comma-separated user keywords.
    pub keywords: String,
    pub skill_type: SkillType,
}

impl EffectiveSkill {
    /// Searchable tags: the name, a kind tag, the singularized group label,
    /// and the user's keywords.
    pub fn search_keywords(&self) -> Vec<String> {
        let mut tags = vec![
            normalize_tag("skill"),
            singularize(&normalize_tag(self.skill_type.group_label())),
        ];
        if let Some(name) = none_if_empty(&self.name) {
            tags.push(normalize_tag(name));
        }
        tags.extend(split_tags(&self.keywords));
        merge_tags(tags)
    }
}

/// Effective view of a goal roll instance.
///
/// The captured trait ids are only ever populated while branched (they are
/// filled in at branch time and cleared on revert); linked instances resolve
/// their references by name at read time so shared templates keep working
/// across characters with differently-named trait sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveGoalRoll {
    pub name: String,
    pub description: String,
    /// Flat modifier added on top of attribute + skill.
    pub modifier: i32,
    /// Raw comma-separated user keywords.
    pub keywords: String,
    pub attribute_name: String,
    pub attribute_category: TraitCategory,
    /// Identity of the attribute trait, captured at branch time.
    pub attribute_trait: Option<TraitId>,
    pub skill: SkillRef,
    /// Identity of the natural-skill trait, captured at branch time.
    pub natural_skill_trait: Option<TraitId>,
}

impl EffectiveGoalRoll {
    /// Searchable tags: the name, a kind tag, the resolved references (the
    /// attribute and skill actually used, not the template's raw defaults),
    /// and the user's keywords.
    pub fn search_keywords(&self, library: &Library) -> Vec<String> {
        let mut tags = vec![normalize_tag("goal roll")];
        if let Some(name) = none_if_empty(&self.name) {
            tags.push(normalize_tag(name));
        }
        if let Some(attribute) = none_if_empty(&self.attribute_name) {
            tags.push(normalize_tag(attribute));
        }
        match &self.skill {
            SkillRef::Natural { name } => {
                tags.push(singularize(&normalize_tag(
                    TraitCategory::NaturalSkills.display_name(),
                )));
                if let Some(name) = none_if_empty(name) {
                    tags.push(normalize_tag(name));
                }
            }
            SkillRef::Learned { template } => {
                if let Some(template) = template.and_then(|id| library.skill(id)) {
                    tags.push(normalize_tag(&template.name));
                    tags.push(singularize(&normalize_tag(
                        template.skill_type.group_label(),
                    )));
                }
            }
        }
        tags.extend(split_tags(&self.keywords));
        merge_tags(tags)
    }
}

/// Effective view of a combat metric instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveCombatMetric {
    pub name: String,
    pub description: String,
    /// Flat adjustment on top of the calculated base value; not part of the
    /// base-value calculation itself.
    pub modifier: i32,
    /// Raw comma-separated user keywords.
    pub keywords: String,
    pub formula: MetricFormula,
}

impl EffectiveCombatMetric {
    /// Searchable tags: the name, a kind tag, the trait the formula reads
    /// (if any), and the user's keywords.
    pub fn search_keywords(&self) -> Vec<String> {
        let mut tags = vec![normalize_tag("combat metric")];
        if let Some(name) = none_if_empty(&self.name) {
            tags.push(normalize_tag(name));
        }
        if let Some(trait_name) = self.formula.referenced_trait() {
            tags.push(normalize_tag(trait_name));
        }
        tags.extend(split_tags(&self.keywords));
        merge_tags(tags)
    }
}
