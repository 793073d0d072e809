use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::WidgetConfig;

/// Identifies one widget instance for the lifetime of the collection.
/// Ids are allocated monotonically and never reused, so a stale id held by a
/// renderer callback can only miss, never alias a different widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(u64);

impl InstanceId {
    pub fn new(raw: u64) -> Self { Self(raw) }

    pub fn as_u64(self) -> u64 { self.0 }
}

/// While docked, `x` is always `0.0` and `y` is the widget's column rank.
/// While floating, both coordinates are literal screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }

    /// Docked position at the given column rank.
    pub fn rank(rank: usize) -> Self { Self { x: 0.0, y: rank as f64 } }
}

/// One widget occurrence in the user's layout. Owned exclusively by
/// [`LayoutManager`](crate::engine::LayoutManager); renderers only ever see
/// borrowed views of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetInstance {
    pub instance_id: InstanceId,
    pub widget_id: String,
    /// Snapshot of the catalog entry at add time. `name` is re-synced from
    /// the live catalog on every load; stored drift is never kept.
    pub config: WidgetConfig,
    pub position: Point,
    pub is_visible: bool,
    pub is_floating: bool,
    /// Instance-specific options, shallow-merged on update.
    pub settings: Map<String, Value>,
}

/// The loose shape read back from persistence. Fields that can be absent in
/// older or hand-edited records default instead of failing the whole array;
/// the stored `config` snapshot is ignored entirely and rebuilt from the
/// catalog during [`sanitize`](crate::engine::sanitize).
#[derive(Debug, Clone, Deserialize)]
pub struct StoredWidget {
    #[serde(default)]
    pub instance_id: Option<InstanceId>,
    pub widget_id: String,
    #[serde(default)]
    pub position: Point,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_floating: bool,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

fn default_visible() -> bool { true }
