//! Layout engine for the customizable widget panel in the conversation
//! detail view.
//!
//! The engine owns the ordered collection of widget instances (docked rank,
//! visibility, floating position), validates and repairs whatever the store
//! hands back at load time, and rewrites the full collection after every
//! mutation. Rendering, data fetch, and the widget toolbox live elsewhere
//! and only talk to [`engine::LayoutManager`] through its operations and
//! the two renderer feeds.

pub mod catalog;
pub mod engine;
pub mod model;
pub mod store;

pub use catalog::{WidgetCatalog, WidgetCategory, WidgetConfig, WidgetSize};
pub use engine::{LayoutManager, sanitize};
pub use model::{InstanceId, Point, StoredWidget, WidgetInstance};
pub use store::{FileLayoutStore, LayoutStore, MemoryLayoutStore, StoreError};
