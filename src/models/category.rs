use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Topic shared by challenges and goal-based habit suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Health,
    Productivity,
    Learning,
    Fitness,
    Mindfulness,
    Social,
    Other,
}

impl Category {
    pub fn all() -> Vec<Category> {
        vec![
            Category::Health,
            Category::Productivity,
            Category::Learning,
            Category::Fitness,
            Category::Mindfulness,
            Category::Social,
            Category::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Productivity => "productivity",
            Category::Learning => "learning",
            Category::Fitness => "fitness",
            Category::Mindfulness => "mindfulness",
            Category::Social => "social",
            Category::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Health => "Health",
            Category::Productivity => "Productivity",
            Category::Learning => "Learning",
            Category::Fitness => "Fitness",
            Category::Mindfulness => "Mindfulness",
            Category::Social => "Social",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "health" => Ok(Category::Health),
            "productivity" => Ok(Category::Productivity),
            "learning" => Ok(Category::Learning),
            "fitness" => Ok(Category::Fitness),
            "mindfulness" => Ok(Category::Mindfulness),
            "social" => Ok(Category::Social),
            "other" => Ok(Category::Other),
            _ => Err(anyhow::anyhow!("Unknown category: {}", s)),
        }
    }
}
