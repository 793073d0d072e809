use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Card footprint classes the column renderer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WidgetSize {
    Small,
    Medium,
    Large,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WidgetCategory {
    Contact,
    Conversation,
    Intelligence,
    Productivity,
}

/// Display metadata for one widget type. Catalog entries are immutable at
/// runtime; instances carry a snapshot copy of the entry they were added from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub size: WidgetSize,
    pub icon: String,
    pub category: WidgetCategory,
    pub enabled: bool,
    pub default_order: u32,
}

/// Static registry of widget types. Pure lookup; an unknown id is a `None`,
/// never an error, and callers treat it as a no-op trigger.
#[derive(Debug, Clone)]
pub struct WidgetCatalog {
    configs: FxHashMap<String, WidgetConfig>,
}

impl WidgetCatalog {
    pub fn new(configs: impl IntoIterator<Item = WidgetConfig>) -> Self {
        Self {
            configs: configs.into_iter().map(|config| (config.id.clone(), config)).collect(),
        }
    }

    /// The widget set shipped with the conversation-detail panel.
    pub fn builtin() -> &'static WidgetCatalog {
        static BUILTIN: Lazy<WidgetCatalog> =
            Lazy::new(|| WidgetCatalog::new(builtin_configs()));
        &BUILTIN
    }

    pub fn get(&self, widget_id: &str) -> Option<&WidgetConfig> {
        self.configs.get(widget_id)
    }

    pub fn contains(&self, widget_id: &str) -> bool {
        self.configs.contains_key(widget_id)
    }

    /// All entries in default-order, for the widget toolbox.
    pub fn all(&self) -> Vec<&WidgetConfig> {
        let mut configs: Vec<_> = self.configs.values().collect();
        configs.sort_by_key(|config| config.default_order);
        configs
    }

    pub fn len(&self) -> usize { self.configs.len() }

    pub fn is_empty(&self) -> bool { self.configs.is_empty() }
}

fn builtin_configs() -> Vec<WidgetConfig> {
    fn config(
        id: &str,
        name: &str,
        description: &str,
        size: WidgetSize,
        icon: &str,
        category: WidgetCategory,
        enabled: bool,
        default_order: u32,
    ) -> WidgetConfig {
        WidgetConfig {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            size,
            icon: icon.to_string(),
            category,
            enabled,
            default_order,
        }
    }

    vec![
        config(
            "contact",
            "Contact Details",
            "Name, phone, email and lead source for the open conversation",
            WidgetSize::Medium,
            "user",
            WidgetCategory::Contact,
            true,
            0,
        ),
        config(
            "ai-insights",
            "AI Insights",
            "Suggested replies and conversation summary",
            WidgetSize::Full,
            "sparkles",
            WidgetCategory::Intelligence,
            true,
            1,
        ),
        config(
            "notes",
            "Notes",
            "Private notes shared with your team",
            WidgetSize::Medium,
            "notebook",
            WidgetCategory::Productivity,
            true,
            2,
        ),
        config(
            "activity",
            "Activity Timeline",
            "Calls, messages and status changes in order",
            WidgetSize::Large,
            "clock",
            WidgetCategory::Conversation,
            true,
            3,
        ),
        config(
            "tags",
            "Tags",
            "Labels applied to this lead",
            WidgetSize::Small,
            "tag",
            WidgetCategory::Contact,
            true,
            4,
        ),
        config(
            "appointments",
            "Appointments",
            "Upcoming bookings tied to this lead",
            WidgetSize::Medium,
            "calendar",
            WidgetCategory::Productivity,
            true,
            5,
        ),
        // Behind a rollout flag; listed so stored instances keep resolving.
        config(
            "call-log",
            "Call Log",
            "Recordings and transcripts of past calls",
            WidgetSize::Large,
            "phone",
            WidgetCategory::Conversation,
            false,
            6,
        ),
    ]
}
