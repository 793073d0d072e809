use rustc_hash::FxHashSet;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::catalog::WidgetCatalog;
use crate::model::{InstanceId, Point, StoredWidget, WidgetInstance};
use crate::store::LayoutStore;

/// Widget types populated by [`LayoutManager::reset_to_default`], top to
/// bottom.
const DEFAULT_LAYOUT: &[&str] = &["contact", "ai-insights", "notes", "activity"];

/// Converts stored records into valid instances. Records whose `widget_id`
/// no longer resolves in the catalog are dropped; surviving records get
/// their `config` rebuilt from the live catalog so stored name drift never
/// outlives a load. Records with a missing or duplicate `instance_id` are
/// assigned a fresh one past the highest id seen in the batch.
///
/// Returns the valid instances and how many records were dropped.
pub fn sanitize(
    raw: Vec<StoredWidget>,
    catalog: &WidgetCatalog,
) -> (Vec<WidgetInstance>, usize) {
    let mut next_fresh = raw
        .iter()
        .filter_map(|record| record.instance_id)
        .map(InstanceId::as_u64)
        .max()
        .map_or(0, |max| max + 1);
    let mut seen: FxHashSet<InstanceId> = FxHashSet::default();
    let mut valid = Vec::with_capacity(raw.len());
    let mut dropped = 0;

    for record in raw {
        let Some(config) = catalog.get(&record.widget_id) else {
            dropped += 1;
            continue;
        };
        let instance_id = match record.instance_id {
            Some(id) if seen.insert(id) => id,
            _ => {
                let id = InstanceId::new(next_fresh);
                next_fresh += 1;
                seen.insert(id);
                id
            }
        };
        valid.push(WidgetInstance {
            instance_id,
            widget_id: record.widget_id,
            config: config.clone(),
            position: record.position,
            is_visible: record.is_visible,
            is_floating: record.is_floating,
            settings: record.settings,
        });
    }

    (valid, dropped)
}

/// Authoritative owner of the conversation panel's widget collection.
///
/// Every mutation applies to memory first and then rewrites the full
/// collection through the injected store; a failed write never rolls the
/// mutation back. Operations aimed at an id that does not resolve are
/// silent no-ops, so callers never need a failure path.
pub struct LayoutManager {
    catalog: WidgetCatalog,
    store: Box<dyn LayoutStore>,
    widgets: Vec<WidgetInstance>,
    next_id: u64,
}

impl LayoutManager {
    /// Loads and repairs whatever the store holds. An empty or corrupt
    /// store starts an empty collection; defaults are only populated by an
    /// explicit [`reset_to_default`](Self::reset_to_default).
    pub fn new(catalog: WidgetCatalog, store: impl LayoutStore + 'static) -> Self {
        let (widgets, dropped) = sanitize(store.load(), &catalog);
        if dropped > 0 {
            debug!(dropped, "dropped stored widgets with unknown widget ids");
        }
        let next_id = widgets
            .iter()
            .map(|widget| widget.instance_id.as_u64())
            .max()
            .map_or(0, |max| max + 1);
        Self {
            catalog,
            store: Box::new(store),
            widgets,
            next_id,
        }
    }

    pub fn catalog(&self) -> &WidgetCatalog { &self.catalog }

    pub fn len(&self) -> usize { self.widgets.len() }

    pub fn is_empty(&self) -> bool { self.widgets.is_empty() }

    pub fn widget(&self, instance_id: InstanceId) -> Option<&WidgetInstance> {
        self.widgets.iter().find(|widget| widget.instance_id == instance_id)
    }

    /// Docked subset in column order, hidden widgets included; the column
    /// renderer decides display from `is_visible`. Ranks left stale by
    /// `remove_widget` or `return_widget_to_column` sort stably here, so
    /// collisions degrade to insertion order until the next reorder.
    pub fn column_widgets(&self) -> Vec<&WidgetInstance> {
        let mut docked: Vec<&WidgetInstance> =
            self.widgets.iter().filter(|widget| !widget.is_floating).collect();
        docked.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
        docked
    }

    /// Detached subset for the floating renderer: floating AND visible,
    /// each at its literal pixel position.
    pub fn floating_widgets(&self) -> Vec<&WidgetInstance> {
        self.widgets
            .iter()
            .filter(|widget| widget.is_floating && widget.is_visible)
            .collect()
    }

    /// Appends a fresh docked, visible instance of the given widget type.
    /// Unknown types are a no-op.
    pub fn add_widget(&mut self, widget_id: &str) -> Option<InstanceId> {
        let config = self.catalog.get(widget_id)?.clone();
        let instance_id = self.allocate_id();
        let rank = self.docked_count();
        debug!(widget_id, id = instance_id.as_u64(), rank, size = %config.size, "adding widget");
        self.widgets.push(WidgetInstance {
            instance_id,
            widget_id: widget_id.to_string(),
            config,
            position: Point::rank(rank),
            is_visible: true,
            is_floating: false,
            settings: Map::new(),
        });
        self.persist();
        Some(instance_id)
    }

    /// Removes the instance entirely. Remaining ranks are not renumbered;
    /// the gap persists until the next `reorder_column_widgets`.
    pub fn remove_widget(&mut self, instance_id: InstanceId) {
        let before = self.widgets.len();
        self.widgets.retain(|widget| widget.instance_id != instance_id);
        if self.widgets.len() == before {
            return;
        }
        debug!(id = instance_id.as_u64(), "removed widget");
        self.persist();
    }

    /// Flips visibility only; floating status and position are untouched,
    /// in both directions.
    pub fn toggle_widget_visibility(&mut self, instance_id: InstanceId) {
        let Some(widget) = self.widget_mut(instance_id) else { return };
        widget.is_visible = !widget.is_visible;
        self.persist();
    }

    /// Shallow-merges `partial` into the instance's settings. Existing keys
    /// not named in `partial` survive.
    pub fn update_widget_settings(&mut self, instance_id: InstanceId, partial: Map<String, Value>) {
        let Some(widget) = self.widget_mut(instance_id) else { return };
        for (key, value) in partial {
            widget.settings.insert(key, value);
        }
        self.persist();
    }

    /// Docks the instance at a caller-supplied rank. This trusts the given
    /// `y` as-is and does not re-rank the rest of the column; drag-reorder
    /// paths should use `reorder_column_widgets` instead.
    pub fn move_widget(&mut self, instance_id: InstanceId, new_position: Point) {
        let Some(widget) = self.widget_mut(instance_id) else { return };
        widget.position = Point::new(0.0, new_position.y);
        widget.is_floating = false;
        self.persist();
    }

    /// Detaches the instance to a free screen position. Visibility is
    /// preserved: floating a hidden widget does not reveal it.
    pub fn make_widget_float(&mut self, instance_id: InstanceId, screen_position: Point) {
        let Some(widget) = self.widget_mut(instance_id) else { return };
        widget.is_floating = true;
        widget.position = screen_position;
        self.persist();
    }

    /// Re-docks a floating instance. The instance keeps whatever `y` it
    /// last held while docked, which may collide with another rank until
    /// the next reorder; visibility is preserved.
    pub fn return_widget_to_column(&mut self, instance_id: InstanceId) {
        let Some(widget) = self.widget_mut(instance_id) else { return };
        widget.is_floating = false;
        self.persist();
    }

    /// Stable splice-move of one docked widget to `target_index`, then a
    /// dense re-rank of the whole column. Floating instances are untouched.
    /// An unknown or floating dragged id is a no-op; an out-of-range target
    /// clamps to the end of the column.
    pub fn reorder_column_widgets(&mut self, dragged: InstanceId, target_index: usize) {
        let mut order: Vec<InstanceId> =
            self.column_widgets().iter().map(|widget| widget.instance_id).collect();
        let Some(from) = order.iter().position(|id| *id == dragged) else { return };

        order.remove(from);
        // Removing the dragged element shifts everything after it left by
        // one, so a forward move lands one short of the raw target.
        let insert_at = if from < target_index { target_index - 1 } else { target_index };
        let insert_at = insert_at.min(order.len());
        order.insert(insert_at, dragged);

        debug!(id = dragged.as_u64(), from, to = insert_at, "reordered column");
        for (rank, id) in order.iter().enumerate() {
            if let Some(widget) = self.widget_mut(*id) {
                widget.position = Point::rank(rank);
            }
        }
        self.persist();
    }

    /// Discards the collection and rebuilds the default column: each entry
    /// of the default list as a fresh docked, visible instance, ranked by
    /// list position.
    pub fn reset_to_default(&mut self) {
        info!("resetting widget layout to defaults");
        self.widgets.clear();
        for widget_id in DEFAULT_LAYOUT {
            let Some(config) = self.catalog.get(widget_id) else { continue };
            let config = config.clone();
            let instance_id = self.allocate_id();
            let rank = self.widgets.len();
            self.widgets.push(WidgetInstance {
                instance_id,
                widget_id: widget_id.to_string(),
                config,
                position: Point::rank(rank),
                is_visible: true,
                is_floating: false,
                settings: Map::new(),
            });
        }
        self.persist();
    }

    pub fn clear_all_widgets(&mut self) {
        self.widgets.clear();
        self.persist();
    }

    /// Recovery hatch for a persisted record the repair pass cannot make
    /// sense of: erase it outright, then repopulate the defaults.
    pub fn clear_corrupted_data(&mut self) {
        info!("erasing stored layout and repopulating defaults");
        self.store.clear();
        self.reset_to_default();
    }

    fn allocate_id(&mut self) -> InstanceId {
        let id = InstanceId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn docked_count(&self) -> usize {
        self.widgets.iter().filter(|widget| !widget.is_floating).count()
    }

    fn widget_mut(&mut self, instance_id: InstanceId) -> Option<&mut WidgetInstance> {
        self.widgets.iter_mut().find(|widget| widget.instance_id == instance_id)
    }

    fn persist(&self) {
        self.store.save(&self.widgets);
    }
}
