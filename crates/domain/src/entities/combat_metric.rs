//! Combat metric instance entity
//!
//! A combat metric is a number derived from the character's traits through a
//! small formula (see `MetricFormula`). The instance resolves which formula
//! applies; the owning character evaluates it (see `Character::metric_value`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::library::Library;
use crate::resolve::{EffectiveCombatMetric, Resolvable};
use crate::value_objects::MetricFormula;
use wyrdsheet_domain::{CombatMetricInstanceId, CombatMetricTemplateId};

/// Override slots for a combat metric instance, authoritative only while
/// branched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatMetricOverrides {
    pub name: String,
    pub description: String,
    pub modifier: i32,
    pub keywords: String,
    pub formula: MetricFormula,
}

/// A character's combat metric, referencing a shared template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatMetricInstance {
    pub id: CombatMetricInstanceId,
    /// Provenance and revert target. May dangle after template deletion.
    pub template: CombatMetricTemplateId,
    pub is_branched: bool,
    pub branched_at: Option<DateTime<Utc>>,
    pub overrides: CombatMetricOverrides,
}

impl CombatMetricInstance {
    pub fn from_template(template: CombatMetricTemplateId) -> Self {
        Self {
            id: CombatMetricInstanceId::new(),
            template,
            is_branched: false,
            branched_at: None,
            overrides: CombatMetricOverrides::default(),
        }
    }

    /// Replace the override formula from authoring text. Only meaningful on
    /// a branched instance; linked instances follow the template's formula.
    pub fn set_override_formula(&mut self, formula_text: &str) {
        self.overrides.formula = MetricFormula::parse(formula_text);
    }

    /// Searchable tags for this instance's effective values.
    pub fn search_keywords(&self, library: &Library) -> Vec<String> {
        self.resolve(library).search_keywords()
    }

    fn effective_from_overrides(&self) -> EffectiveCombatMetric {
        EffectiveCombatMetric {
            name: self.overrides.name.clone(),
            description: self.overrides.description.clone(),
            modifier: self.overrides.modifier,
            keywords: self.overrides.keywords.clone(),
            formula: self.overrides.formula.clone(),
        }
    }
}

impl Resolvable for CombatMetricInstance {
    type Effective = EffectiveCombatMetric;

    fn is_branched(&self) -> bool {
        self.is_branched
    }

    fn resolve(&self, library: &Library) -> EffectiveCombatMetric {
        if self.is_branched {
            return self.effective_from_overrides();
        }
        match library.combat_metric(self.template) {
            Some(template) => template.to_effective(),
            None => self.effective_from_overrides(),
        }
    }

    fn branch(&mut self, library: &Library) {
        if self.is_branched {
            return;
        }
        let effective = self.resolve(library);
        self.overrides = CombatMetricOverrides {
            name: effective.name,
            description: effective.description,
            modifier: effective.modifier,
            keywords: effective.keywords,
            formula: effective.formula,
        };
        self.is_branched = true;
        self.branched_at = Some(Utc::now());
        debug!(instance = %self.id, template = %self.template, "branched combat metric instance");
    }

    fn revert_to_template(&mut self) {
        if !self.is_branched {
            return;
        }
        self.overrides = CombatMetricOverrides::default();
        self.is_branched = false;
        self.branched_at = None;
        debug!(instance = %self.id, template = %self.template, "reverted combat metric instance");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::CombatMetricTemplate;

    fn library_with_vitality() -> (Library, CombatMetricTemplateId) {
        let mut library = Library::new();
        let id = library.add_combat_metric(CombatMetricTemplate::new("Vitality", "5 + Endurance"));
        (library, id)
    }

    #[test]
    fn test_linked_instance_follows_template_formula() {
        let (mut library, id) = library_with_vitality();
        let instance = CombatMetricInstance::from_template(id);

        assert_eq!(
            instance.resolve(&library).formula,
            MetricFormula::parse("5 + Endurance")
        );

        if let Some(template) = library.combat_metric_mut(id) {
            template.set_formula("10 + Endurance");
        }
        assert_eq!(
            instance.resolve(&library).formula,
            MetricFormula::parse("10 + Endurance")
        );
    }

    #[test]
    fn test_branch_freezes_formula() {
        let (mut library, id) = library_with_vitality();
        let mut instance = CombatMetricInstance::from_template(id);
        instance.branch(&library);

        if let Some(template) = library.combat_metric_mut(id) {
            template.set_formula("99");
        }
        assert_eq!(
            instance.resolve(&library).formula,
            MetricFormula::parse("5 + Endurance")
        );
    }

    #[test]
    fn test_branch_revert_round_trip() {
        let (library, id) = library_with_vitality();
        let mut instance = CombatMetricInstance::from_template(id);
        let before = instance.resolve(&library);

        instance.branch(&library);
        instance.set_override_formula("Wyrd");
        instance.revert_to_template();

        assert!(!instance.is_branched);
        assert_eq!(instance.resolve(&library), before);
    }

    #[test]
    fn test_dangling_template_resolves_to_overrides() {
        let (mut library, id) = library_with_vitality();
        let instance = CombatMetricInstance::from_template(id);
        library.remove_combat_metric(id);

        let effective = instance.resolve(&library);
        assert_eq!(effective.name, "");
        assert_eq!(effective.formula, MetricFormula::default());
    }
}
