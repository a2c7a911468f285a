//! Floorplan Core Library
//!
//! Platform-agnostic document model and editing logic for the floorplan
//! editor: viewport transform, grid snapping, selection, gestures, undo/redo
//! and clipboard. Drawing and widgets live outside this crate; it hands out
//! render descriptors and accepts pointer events and commands.

pub mod bounds;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod editor;
pub mod elements;
pub mod history;
pub mod input;
pub mod properties;
pub mod render;
pub mod selection;
pub mod snap;
pub mod storage;
pub mod tools;
pub mod viewport;

pub use bounds::{compute_bounding_box, initial_view};
pub use clipboard::Clipboard;
pub use config::{ConfigError, EditorConfig};
pub use document::{DocumentError, FloorplanDocument};
pub use editor::{Editor, Response};
pub use elements::{Coord, Element, ElementId, ElementKind};
pub use history::History;
pub use input::{Buttons, Command, Modifiers, MouseButton, PointerEvent};
pub use properties::{FieldPath, PropertyError, PropertySheet};
pub use render::{Geometry, RenderItem, Scene};
pub use selection::Selection;
pub use snap::{DEFAULT_GRID_SIZE, GridSettings, snap_element, snap_to_grid, snap_value};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use tools::{EditMode, LineTool};
pub use viewport::Viewport;
