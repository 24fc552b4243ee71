//! Goal roll category entity - display buckets for a character's goal rolls

use serde::{Deserialize, Serialize};

use wyrdsheet_domain::GoalRollCategoryId;

/// A named, ordered bucket a character groups goal rolls under.
///
/// Purely organizational; never consulted by any calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRollCategory {
    pub id: GoalRollCategoryId,
    pub name: String,
    pub display_order: u32,
}

impl GoalRollCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GoalRollCategoryId::new(),
            name: name.into(),
            display_order: 0,
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.display_order = order;
        self
    }
}
