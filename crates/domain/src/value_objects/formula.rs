//! Combat-metric formula parsing and evaluation.
//!
//! Metric formulas come from a small closed vocabulary: a flat constant
//! ("5"), a constant plus a named trait ("5 + Endurance"), a named trait
//! divided by a constant ("Endurance / 2"), and the special "Wyrd" rule.
//! Formula text is parsed once when a template is authored or edited; the
//! parsed form is what gets stored and evaluated, so evaluation and the
//! display breakdown can never disagree about which terms were used.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical trait names consumed by the Wyrd rule.
const WYRD_PSI: &str = "Psi";
const WYRD_THEURGY: &str = "Theurgy";
const WYRD_INTROVERT: &str = "Introvert";
const WYRD_FAITH: &str = "Faith";

/// A parsed combat-metric formula.
///
/// Unrecognized text is not an error: it is carried verbatim and evaluates
/// to zero, so a half-typed formula in the authoring UI degrades instead of
/// failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricFormula {
    /// A flat constant, e.g. `"5"`.
    Constant(i32),
    /// A constant plus a named trait's value, e.g. `"5 + Endurance"`.
    ConstantPlusTrait { base: i32, trait_name: String },
    /// A named trait's value divided by a constant, e.g. `"Endurance / 2"`.
    /// Division truncates toward zero.
    TraitDividedBy { trait_name: String, divisor: i32 },
    /// The multi-branch Wyrd rule over Psi/Theurgy/Introvert/Faith.
    Wyrd,
    /// Anything else; evaluates to zero.
    Unrecognized(String),
}

impl MetricFormula {
    /// Parse formula text into its structured form.
    ///
    /// Supported shapes:
    /// - `"<N>"` - integer constant
    /// - `"<N> + <TraitName>"` - constant plus trait
    /// - `"<TraitName> / <N>"` - trait divided by a non-zero constant
    /// - `"Wyrd"` (case-insensitive)
    ///
    /// Any other input yields [`MetricFormula::Unrecognized`] carrying the
    /// trimmed original text.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if input.eq_ignore_ascii_case("wyrd") {
            return Self::Wyrd;
        }

        if let Ok(value) = input.parse::<i32>() {
            return Self::Constant(value);
        }

        if let Some((left, right)) = input.split_once('+') {
            let base = left.trim().parse::<i32>();
            let trait_name = right.trim();
            if let (Ok(base), false) = (base, trait_name.is_empty()) {
                return Self::ConstantPlusTrait {
                    base,
                    trait_name: trait_name.to_string(),
                };
            }
            return Self::Unrecognized(input.to_string());
        }

        if let Some((left, right)) = input.split_once('/') {
            let trait_name = left.trim();
            let divisor = right.trim().parse::<i32>();
            // A zero divisor would make evaluation undefined, so it falls
            // through to Unrecognized like any other malformed text.
            if let (false, Ok(divisor)) = (trait_name.is_empty(), divisor) {
                if divisor != 0 {
                    return Self::TraitDividedBy {
                        trait_name: trait_name.to_string(),
                        divisor,
                    };
                }
            }
            return Self::Unrecognized(input.to_string());
        }

        Self::Unrecognized(input.to_string())
    }

    /// Evaluate the formula against trait values supplied by the given
    /// lookup. The lookup receives a trait name and returns its value, or 0
    /// when the character has no such trait.
    pub fn evaluate<F>(&self, trait_value: F) -> i32
    where
        F: Fn(&str) -> i32,
    {
        self.breakdown(trait_value).iter().map(|term| term.value).sum()
    }

    /// The ordered display terms behind [`MetricFormula::evaluate`].
    ///
    /// The terms always sum to the evaluated value; evaluation is defined as
    /// that sum, so the two cannot drift apart.
    pub fn breakdown<F>(&self, trait_value: F) -> Vec<FormulaTerm>
    where
        F: Fn(&str) -> i32,
    {
        match self {
            Self::Constant(value) => vec![FormulaTerm::new("Base", *value)],
            Self::ConstantPlusTrait { base, trait_name } => vec![
                FormulaTerm::new("Base", *base),
                FormulaTerm::new(trait_name, trait_value(trait_name)),
            ],
            Self::TraitDividedBy {
                trait_name,
                divisor,
            } => {
                let value = trait_value(trait_name) / divisor;
                vec![FormulaTerm::new(
                    format!("{} / {}", trait_name, divisor),
                    value,
                )]
            }
            Self::Wyrd => {
                let psi = trait_value(WYRD_PSI);
                let theurgy = trait_value(WYRD_THEURGY);
                let introvert = trait_value(WYRD_INTROVERT);
                let faith = trait_value(WYRD_FAITH);
                match (psi > 0, theurgy > 0) {
                    (true, false) => vec![FormulaTerm::new(WYRD_INTROVERT, introvert)],
                    (false, true) => vec![FormulaTerm::new(WYRD_FAITH, faith)],
                    (true, true) => {
                        if faith > introvert {
                            vec![FormulaTerm::new(WYRD_FAITH, faith)]
                        } else {
                            vec![FormulaTerm::new(WYRD_INTROVERT, introvert)]
                        }
                    }
                    (false, false) => vec![FormulaTerm::new("Base", 1)],
                }
            }
            Self::Unrecognized(_) => vec![],
        }
    }

    /// The trait name this formula reads, if it reads exactly one.
    ///
    /// Used by keyword aggregation so a metric built on "Endurance" is
    /// findable under "endurance".
    pub fn referenced_trait(&self) -> Option<&str> {
        match self {
            Self::ConstantPlusTrait { trait_name, .. }
            | Self::TraitDividedBy { trait_name, .. } => Some(trait_name),
            _ => None,
        }
    }

    /// Format as the authoring text (e.g. `"5 + Endurance"`).
    pub fn display(&self) -> String {
        match self {
            Self::Constant(value) => value.to_string(),
            Self::ConstantPlusTrait { base, trait_name } => {
                format!("{} + {}", base, trait_name)
            }
            Self::TraitDividedBy {
                trait_name,
                divisor,
            } => format!("{} / {}", trait_name, divisor),
            Self::Wyrd => "Wyrd".to_string(),
            Self::Unrecognized(text) => text.clone(),
        }
    }
}

impl Default for MetricFormula {
    fn default() -> Self {
        // An empty override slot: displays as nothing, evaluates to zero.
        Self::Unrecognized(String::new())
    }
}

impl fmt::Display for MetricFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// One labelled term of a formula or goal-roll breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaTerm {
    /// Display label, e.g. "Base" or the trait name.
    pub label: String,
    /// The term's contribution to the total.
    pub value: i32,
}

impl FormulaTerm {
    pub fn new(label: impl Into<String>, value: i32) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}
