//! The editor state: document, view, selection, gestures, history and
//! clipboard, driven by pointer events and commands.

use crate::bounds::initial_view;
use crate::clipboard::{Clipboard, paste_offset};
use crate::config::EditorConfig;
use crate::document::FloorplanDocument;
use crate::elements::{Element, ElementId, ElementKind};
use crate::history::History;
use crate::input::{Buttons, Command, Modifiers, MouseButton, PointerEvent};
use crate::properties::{FieldPath, PropertyError, PropertySheet, apply_edit};
use crate::render::{LinePreview, Scene};
use crate::selection::Selection;
use crate::snap::{GridSettings, snap_element};
use crate::storage::{Storage, StorageResult};
use crate::tools::{EditMode, LineEvent, LineTool, MoveDrag, PanDrag};
use crate::viewport::Viewport;
use kurbo::{Point, Size, Vec2};

/// Pick radius around the pointer, in pixels.
pub const HIT_TOLERANCE_PX: f64 = 4.0;

/// What the caller should do after an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Response {
    /// The scene changed and should be redrawn.
    pub redraw: bool,
    /// The selection changed; the properties panel should refresh.
    pub selection_changed: bool,
    /// The command did nothing and the user should be told (bell).
    pub alert: bool,
}

impl Response {
    pub const NONE: Response = Response {
        redraw: false,
        selection_changed: false,
        alert: false,
    };

    pub const REDRAW: Response = Response {
        redraw: true,
        ..Response::NONE
    };

    pub const ALERT: Response = Response {
        alert: true,
        ..Response::NONE
    };

    fn redraw_if(changed: bool) -> Self {
        Response {
            redraw: changed,
            ..Response::NONE
        }
    }

    fn selection(changed: bool) -> Self {
        Response {
            redraw: changed,
            selection_changed: changed,
            alert: false,
        }
    }

    /// A document edit that also replaced the selection.
    fn edited(selection_changed: bool) -> Self {
        Response {
            redraw: true,
            selection_changed,
            alert: false,
        }
    }
}

/// Floorplan editor state.
///
/// All mutation of the document goes through this type so that every user
/// action takes exactly one history snapshot before it changes anything.
#[derive(Debug, Clone)]
pub struct Editor {
    document: FloorplanDocument,
    viewport: Viewport,
    grid: GridSettings,
    selection: Selection,
    history: History,
    clipboard: Clipboard,
    mode: EditMode,
    line_tool: LineTool,
    drag: Option<MoveDrag>,
    pan: Option<PanDrag>,
    show_lamps: bool,
    /// Where the document was loaded from or last saved to.
    location: Option<String>,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// An editor with an empty document.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            document: FloorplanDocument::new(),
            viewport: config.viewport(),
            grid: config.grid(),
            selection: Selection::new(),
            history: History::new(config.max_undo),
            clipboard: Clipboard::new(),
            mode: EditMode::Select,
            line_tool: LineTool::new(),
            drag: None,
            pan: None,
            show_lamps: config.show_lamps,
            location: None,
            config,
        }
    }

    /// An editor showing `document`, framed by [`initial_view`].
    pub fn with_document(config: EditorConfig, document: FloorplanDocument) -> Self {
        let mut editor = Self::new(config);
        editor.set_document(document);
        editor
    }

    pub fn document(&self) -> &FloorplanDocument {
        &self.document
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn line_tool(&self) -> &LineTool {
        &self.line_tool
    }

    pub fn show_lamps(&self) -> bool {
        self.show_lamps
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Replace the document, dropping history, selection and gestures, and
    /// frame the new content.
    pub fn set_document(&mut self, document: FloorplanDocument) {
        self.document = document;
        self.history.clear();
        self.selection.clear();
        self.cancel_gesture();
        self.reset_view();
    }

    /// Canvas resized. The world rectangle is kept, so the aspect may change.
    pub fn set_canvas_size(&mut self, size: Size) -> Response {
        self.viewport.set_size(size);
        Response::REDRAW
    }

    /// Switch mode, discarding any gesture in progress.
    pub fn set_mode(&mut self, mode: EditMode) -> Response {
        if mode == self.mode {
            return Response::NONE;
        }
        let had_preview = self.cancel_gesture();
        log::debug!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        Response::redraw_if(had_preview)
    }

    /// Drop the pending line, move drag and pan without committing them.
    /// Returns true if a line preview was visible.
    pub fn cancel_gesture(&mut self) -> bool {
        self.drag = None;
        self.pan = None;
        self.line_tool.cancel() == LineEvent::Cancelled
    }

    fn hit_tolerance(&self) -> f64 {
        HIT_TOLERANCE_PX * self.viewport.world_per_pixel()
    }

    fn snapped_world(&self, position: Point) -> Point {
        self.grid.snap_point(self.viewport.screen_to_world(position))
    }

    /// Feed a pointer event (canvas pixel coordinates).
    pub fn pointer_event(&mut self, event: PointerEvent) -> Response {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
                modifiers,
            } => self.left_down(position, modifiers),
            PointerEvent::Down { position, .. } => self.start_pan(position),
            PointerEvent::Move { position, buttons } => self.pointer_move(position, buttons),
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => self.left_up(position),
            PointerEvent::Up { .. } => {
                self.pan = None;
                Response::NONE
            }
            PointerEvent::Scroll { position, notches } => {
                Response::redraw_if(self.viewport.zoom_wheel(notches, position))
            }
        }
    }

    fn left_down(&mut self, position: Point, modifiers: Modifiers) -> Response {
        match self.mode {
            EditMode::Select => self.select_at(position, modifiers),
            EditMode::AddCubicle | EditMode::AddSpawn => self.add_point_element(position),
            EditMode::AddWall | EditMode::AddDoor | EditMode::AddWindow => {
                let event = self.line_tool.pointer_down(self.snapped_world(position));
                self.handle_line_event(event)
            }
        }
    }

    fn select_at(&mut self, position: Point, modifiers: Modifiers) -> Response {
        let world = self.viewport.screen_to_world(position);
        let hit = self.document.element_at(world, self.hit_tolerance());
        let changed = if modifiers.command() {
            match hit {
                Some(id) => {
                    self.selection.toggle(id);
                    true
                }
                None => false,
            }
        } else {
            self.selection.select_single(hit)
        };
        self.drag = (hit.is_some() && !self.selection.is_empty()).then(|| MoveDrag::new(position));
        Response::selection(changed)
    }

    fn add_point_element(&mut self, position: Point) -> Response {
        let at = self.snapped_world(position);
        self.history.save_state(&self.document);
        let element = if self.mode == EditMode::AddSpawn {
            let removed = self
                .document
                .remove_where(|e| e.kind() == ElementKind::SpawnPoint);
            if removed > 0 {
                log::debug!("Replacing {} existing spawn point(s)", removed);
            }
            Element::spawn_at(at)
        } else {
            Element::cubicle_at(at)
        };
        let id = self.document.add(element);
        self.selection.select_single(Some(id));
        Response::edited(true)
    }

    fn start_pan(&mut self, position: Point) -> Response {
        let had_preview = self.line_tool.cancel() == LineEvent::Cancelled;
        self.pan = Some(PanDrag {
            last_screen: position,
        });
        Response::redraw_if(had_preview)
    }

    fn pointer_move(&mut self, position: Point, buttons: Buttons) -> Response {
        if let Some(pan) = self.pan.as_mut() {
            if buttons.middle || buttons.right {
                let delta = position - pan.last_screen;
                pan.last_screen = position;
                return Response::redraw_if(self.viewport.pan_by(delta));
            }
            self.pan = None;
        }

        if self.mode.line_kind().is_some() {
            let event = self
                .line_tool
                .pointer_move(self.snapped_world(position), buttons.left);
            return self.handle_line_event(event);
        }

        if buttons.left {
            self.drag_to(position)
        } else {
            Response::NONE
        }
    }

    /// Translate the selection by the world delta since the previous move.
    fn drag_to(&mut self, position: Point) -> Response {
        let Some(drag) = self.drag.as_mut() else {
            return Response::NONE;
        };
        let delta = self.viewport.screen_to_world(position)
            - self.viewport.screen_to_world(drag.last_screen);
        drag.last_screen = position;
        if delta.hypot() == 0.0 {
            return Response::NONE;
        }
        if !drag.history_saved {
            self.history.save_state(&self.document);
            drag.history_saved = true;
        }
        for &id in self.selection.ids() {
            if let Some(element) = self.document.get_mut(id) {
                element.translate(delta);
            }
        }
        Response::REDRAW
    }

    fn left_up(&mut self, position: Point) -> Response {
        if self.mode.line_kind().is_some() {
            let event = self.line_tool.pointer_up(self.snapped_world(position));
            return self.handle_line_event(event);
        }

        let Some(drag) = self.drag.take() else {
            return Response::NONE;
        };
        if !drag.history_saved {
            // Click without movement.
            return Response::NONE;
        }
        let mut snapped = 0;
        for &id in self.selection.ids() {
            if let Some(element) = self.document.get_mut(id) {
                if snap_element(element, &self.grid) {
                    snapped += 1;
                }
            }
        }
        log::debug!("Move finished, {} element(s) snapped", snapped);
        Response::REDRAW
    }

    fn handle_line_event(&mut self, event: LineEvent) -> Response {
        match event {
            LineEvent::None => Response::NONE,
            LineEvent::Preview | LineEvent::Cancelled => Response::REDRAW,
            LineEvent::Commit { start, end } => self.commit_line(start, end),
        }
    }

    fn commit_line(&mut self, start: Point, end: Point) -> Response {
        let Some(kind) = self.mode.line_kind() else {
            return Response::NONE;
        };
        let Some(mut element) = Element::segment(kind, start, end) else {
            return Response::NONE;
        };
        self.history.save_state(&self.document);
        snap_element(&mut element, &self.grid);
        let id = self.document.add(element);
        self.selection.select_single(Some(id));
        log::debug!("Created {:?} from {:?} to {:?}", kind, start, end);
        Response::edited(true)
    }

    /// Map a key press through the default bindings and run the command.
    pub fn key_press(&mut self, key: &str, modifiers: Modifiers) -> Response {
        match Command::from_key(key, modifiers) {
            Some(command) => self.execute(command),
            None => Response::NONE,
        }
    }

    /// Run a discrete command.
    pub fn execute(&mut self, command: Command) -> Response {
        match command {
            Command::SetMode(mode) => self.set_mode(mode),
            Command::Rotate(delta) => self.rotate_selection(delta),
            Command::ZoomIn => Response::redraw_if(self.viewport.zoom_in()),
            Command::ZoomOut => Response::redraw_if(self.viewport.zoom_out()),
            Command::ZoomAt { scale, center } => self.zoom_at(scale, center),
            Command::Pan(delta) => self.pan_by(delta),
            Command::ResetView => {
                self.reset_view();
                Response::REDRAW
            }
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Copy => {
                let copied = self.clipboard.copy(&self.document, &self.selection);
                log::debug!("Copied {} element(s)", copied);
                Response::NONE
            }
            Command::Paste => self.paste(),
            Command::SelectAll => self.select_all(),
            Command::DeleteSelection => self.delete_selection(),
            Command::Cancel => Response::redraw_if(self.cancel_gesture()),
            Command::SetSnap(enabled) => {
                self.grid.snap_enabled = enabled;
                Response::NONE
            }
            Command::SetShowGrid(visible) => {
                self.grid.visible = visible;
                Response::REDRAW
            }
            Command::SetShowLamps(visible) => {
                self.show_lamps = visible;
                Response::REDRAW
            }
            Command::SetGridSize(size) => {
                self.grid.size = size;
                Response::redraw_if(self.grid.visible)
            }
        }
    }

    /// Zoom by `scale` keeping the world point under `center` (pixels) fixed.
    pub fn zoom_at(&mut self, scale: f64, center: Point) -> Response {
        Response::redraw_if(self.viewport.zoom_at(scale, center))
    }

    /// Pan the view by a pixel delta.
    pub fn pan_by(&mut self, delta: Vec2) -> Response {
        Response::redraw_if(self.viewport.pan_by(delta))
    }

    /// Rotate every selected element that has a `Yaw` by a quarter turn in
    /// the direction of `delta`.
    ///
    /// Only the sign of `delta` counts; zero or NaN does nothing. Signals an
    /// alert, without touching history, when nothing selected can rotate.
    pub fn rotate_selection(&mut self, delta: f64) -> Response {
        if self.selection.is_empty() || delta == 0.0 || delta.is_nan() {
            return Response::NONE;
        }
        let delta = 90.0_f64.copysign(delta);
        let targets: Vec<ElementId> = self
            .selection
            .ids()
            .iter()
            .copied()
            .filter(|&id| self.document.get(id).is_some_and(Element::can_rotate))
            .collect();
        if targets.is_empty() {
            log::debug!("Nothing in the selection can rotate");
            return Response::ALERT;
        }

        self.history.save_state(&self.document);
        for id in targets {
            if let Some(element) = self.document.get_mut(id) {
                element.rotate(delta);
                snap_element(element, &self.grid);
            }
        }
        Response::REDRAW
    }

    pub fn undo(&mut self) -> Response {
        self.cancel_gesture();
        if !self.history.undo(&mut self.document) {
            return Response::NONE;
        }
        Response::edited(self.selection.clear())
    }

    pub fn redo(&mut self) -> Response {
        self.cancel_gesture();
        if !self.history.redo(&mut self.document) {
            return Response::NONE;
        }
        Response::edited(self.selection.clear())
    }

    /// Paste the clipboard offset from where it was copied and select the
    /// pasted elements.
    pub fn paste(&mut self) -> Response {
        if self.clipboard.is_empty() {
            return Response::NONE;
        }
        self.history.save_state(&self.document);
        let items = self.clipboard.paste_items(paste_offset(&self.grid));
        let ids: Vec<ElementId> = items.into_iter().map(|e| self.document.add(e)).collect();
        log::debug!("Pasted {} element(s)", ids.len());
        self.selection.set(ids);
        Response::edited(true)
    }

    /// Select every element of a bulk-selectable kind (everything editable
    /// except the floor).
    pub fn select_all(&mut self) -> Response {
        let ids: Vec<ElementId> = self
            .document
            .iter()
            .filter(|(_, e)| e.kind().is_bulk_selectable())
            .map(|(id, _)| id)
            .collect();
        Response::selection(self.selection.set(ids))
    }

    pub fn delete_selection(&mut self) -> Response {
        if self.selection.is_empty() {
            return Response::NONE;
        }
        self.cancel_gesture();
        self.history.save_state(&self.document);
        for &id in self.selection.ids() {
            self.document.remove(id);
        }
        self.selection.clear();
        Response::edited(true)
    }

    /// Frame the document content (or the configured default view).
    pub fn reset_view(&mut self) {
        self.viewport
            .reset(initial_view(&self.document, self.config.default_view));
    }

    /// Editable fields of the primary element.
    pub fn properties(&self) -> Option<PropertySheet> {
        let id = self.selection.primary()?;
        self.document.get(id).map(PropertySheet::for_element)
    }

    /// Apply a properties-panel edit to the primary element.
    ///
    /// The edit is validated on a copy; history is only saved when the value
    /// actually changes, and a rejected edit changes nothing.
    pub fn set_property(&mut self, path: &str, text: &str) -> Result<Response, PropertyError> {
        let path: FieldPath = path.parse()?;
        let id = self.selection.primary().ok_or(PropertyError::NoSelection)?;
        let mut edited = self
            .document
            .get(id)
            .cloned()
            .ok_or(PropertyError::NoSelection)?;
        if !apply_edit(&mut edited, path, text)? {
            return Ok(Response::NONE);
        }
        self.history.save_state(&self.document);
        if let Some(element) = self.document.get_mut(id) {
            *element = edited;
        }
        Ok(Response::REDRAW)
    }

    /// Load a document from `storage`. On failure the current document stays.
    pub fn open(&mut self, storage: &dyn Storage, location: &str) -> StorageResult<()> {
        let document = storage.load(location)?;
        self.set_document(document);
        self.location = Some(location.to_string());
        Ok(())
    }

    /// Re-read the current location. Returns false if there is none.
    pub fn reload(&mut self, storage: &dyn Storage) -> StorageResult<bool> {
        let Some(location) = self.location.clone() else {
            return Ok(false);
        };
        self.open(storage, &location)?;
        Ok(true)
    }

    /// Save to the current location. Returns false if there is none.
    pub fn save(&self, storage: &dyn Storage) -> StorageResult<bool> {
        let Some(location) = self.location.as_deref() else {
            return Ok(false);
        };
        storage.save(location, &self.document)?;
        Ok(true)
    }

    pub fn save_as(&mut self, storage: &dyn Storage, location: &str) -> StorageResult<()> {
        storage.save(location, &self.document)?;
        self.location = Some(location.to_string());
        Ok(())
    }

    /// Describe the current frame for the drawing layer.
    pub fn scene(&self) -> Scene<'_> {
        let preview = self.mode.line_kind().and_then(|kind| {
            self.line_tool
                .preview()
                .map(|(start, end)| LinePreview { kind, start, end })
        });
        Scene::build(
            &self.document,
            &self.selection,
            &self.viewport,
            &self.grid,
            self.show_lamps,
            preview,
        )
    }
}
