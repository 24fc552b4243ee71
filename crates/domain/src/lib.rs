extern crate self as wyrdsheet_domain;

pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod library;
pub mod resolve;
pub mod value_objects;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    default_traits, victory_points, Character, CombatMetricInstance, CombatMetricOverrides,
    GoalRollCategory, GoalRollInstance, GoalRollOverrides, SkillInstance, SkillOverrides,
    TraitScore,
};

pub use error::DomainError;

// Re-export the shared library and template types
pub use library::{
    CombatMetricTemplate, GoalRollTemplate, Library, SkillRef, SkillTemplate, SkillType,
};

// Re-export resolution types
pub use resolve::{EffectiveCombatMetric, EffectiveGoalRoll, EffectiveSkill, Resolvable};

// Re-export value objects
pub use value_objects::{minimum_value, FormulaTerm, MetricFormula, TraitCategory, TraitKind};

// Re-export ID types
pub use ids::{
    CharacterId, CombatMetricInstanceId, CombatMetricTemplateId, GoalRollCategoryId,
    GoalRollInstanceId, GoalRollTemplateId, SkillInstanceId, SkillTemplateId, TraitId,
};
