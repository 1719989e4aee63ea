//! Quick Prompts
//!
//! Short, categorized text snippets offered as one-click inputs. The list is
//! user-editable and persisted as a single record.

pub mod store;

pub use store::QuickPromptStore;

use serde::{Deserialize, Serialize};

/// Fixed set of prompt categories
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PromptCategory {
    #[default]
    Product,
    Platform,
    Strategy,
    Seasonal,
}

impl std::fmt::Display for PromptCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for PromptCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| {
            format!(
                "unknown category '{}', expected one of: product, platform, strategy, seasonal",
                s
            )
        })
    }
}

impl PromptCategory {
    pub const ALL: [PromptCategory; 4] = [
        PromptCategory::Product,
        PromptCategory::Platform,
        PromptCategory::Strategy,
        PromptCategory::Seasonal,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PromptCategory::Product => "product",
            PromptCategory::Platform => "platform",
            PromptCategory::Strategy => "strategy",
            PromptCategory::Seasonal => "seasonal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PromptCategory::Product => "Products",
            PromptCategory::Platform => "Platforms",
            PromptCategory::Strategy => "Strategy & Tips",
            PromptCategory::Seasonal => "Holidays & Events",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuickPrompt {
    pub id: String,
    pub text: String,
    pub category: PromptCategory,
}

impl QuickPrompt {
    fn seed(id: &str, text: &str, category: PromptCategory) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            category,
        }
    }
}

/// Prompts a fresh installation starts with
pub fn default_prompts() -> Vec<QuickPrompt> {
    use PromptCategory::*;

    vec![
        QuickPrompt::seed("1", "How to create eye-catching e-commerce images for electronics", Product),
        QuickPrompt::seed("2", "Best social media promotion styles for apparel", Product),
        QuickPrompt::seed("3", "Lighting and composition tips for food photography", Product),
        QuickPrompt::seed("4", "Write product showcase copy suited to Instagram", Platform),
        QuickPrompt::seed("5", "How to optimize product descriptions for higher conversion", Strategy),
        QuickPrompt::seed("6", "Visual design ideas for holiday promotions", Seasonal),
        QuickPrompt::seed("7", "How to stage lifestyle scenes for home goods", Product),
        QuickPrompt::seed("8", "Techniques for writing compelling product titles", Strategy),
        QuickPrompt::seed("9", "Product showcase tips for TikTok short videos", Platform),
        QuickPrompt::seed("10", "How to highlight a product's core selling points", Strategy),
    ]
}
