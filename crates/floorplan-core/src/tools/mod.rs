//! Editing modes and the multi-event gesture state machines.

use crate::elements::{ElementKind, points_coincide};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available editing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EditMode {
    #[default]
    Select,
    AddCubicle,
    AddWall,
    AddDoor,
    AddWindow,
    AddSpawn,
}

impl EditMode {
    pub const ALL: [EditMode; 6] = [
        EditMode::Select,
        EditMode::AddCubicle,
        EditMode::AddWall,
        EditMode::AddDoor,
        EditMode::AddWindow,
        EditMode::AddSpawn,
    ];

    /// The element kind drawn by a line mode.
    pub fn line_kind(self) -> Option<ElementKind> {
        match self {
            EditMode::AddWall => Some(ElementKind::Wall),
            EditMode::AddDoor => Some(ElementKind::Door),
            EditMode::AddWindow => Some(ElementKind::Window),
            _ => None,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            EditMode::Select => "Select / Move",
            EditMode::AddCubicle => "Add Cubicle",
            EditMode::AddWall => "Add Wall",
            EditMode::AddDoor => "Add Door",
            EditMode::AddWindow => "Add Window",
            EditMode::AddSpawn => "Add Spawn",
        }
    }
}

/// State of a two-click-or-drag line gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LineState {
    /// Waiting for the first click.
    #[default]
    Idle,
    /// Start point placed, waiting for a second click or a drag release.
    Pending {
        /// Snapped start point.
        start: Point,
        /// Snapped end of the live preview.
        current: Point,
        /// Set once the pointer moved off `start` with the button held.
        dragged: bool,
    },
}

/// Outcome of feeding an event to the line tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineEvent {
    /// Nothing visible changed.
    None,
    /// A pending line started or its preview moved.
    Preview,
    /// A line from `start` to `end` should be created.
    Commit { start: Point, end: Point },
    /// The pending line was discarded.
    Cancelled,
}

/// Line drawing tool for walls, doors and windows.
///
/// All points fed in are expected to be snapped already.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineTool {
    pub state: LineState,
}

impl LineTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, LineState::Pending { .. })
    }

    /// Start and preview end of the pending line.
    pub fn preview(&self) -> Option<(Point, Point)> {
        match self.state {
            LineState::Pending { start, current, .. } => Some((start, current)),
            LineState::Idle => None,
        }
    }

    /// Pointer pressed at `point`.
    pub fn pointer_down(&mut self, point: Point) -> LineEvent {
        match self.state {
            LineState::Idle => {
                self.begin(point);
                LineEvent::Preview
            }
            LineState::Pending { dragged: true, .. } => {
                // The previous drag already ended; start a fresh line here.
                self.begin(point);
                LineEvent::Preview
            }
            LineState::Pending { start, .. } => {
                if points_coincide(start, point) {
                    log::debug!("Ignoring second click on the line start");
                    return LineEvent::None;
                }
                self.state = LineState::Idle;
                LineEvent::Commit { start, end: point }
            }
        }
    }

    /// Pointer moved to `point`. `button_held` tells a drag from a hover.
    pub fn pointer_move(&mut self, point: Point, button_held: bool) -> LineEvent {
        let LineState::Pending {
            start,
            current,
            dragged,
        } = &mut self.state
        else {
            return LineEvent::None;
        };
        if button_held && !points_coincide(*start, point) {
            *dragged = true;
        }
        if points_coincide(*current, point) {
            return LineEvent::None;
        }
        *current = point;
        LineEvent::Preview
    }

    /// Pointer released at `point`.
    ///
    /// After a drag this commits (or cancels if released on the start);
    /// after a plain click the line stays pending for a second click.
    pub fn pointer_up(&mut self, point: Point) -> LineEvent {
        let LineState::Pending {
            start,
            dragged: true,
            ..
        } = self.state
        else {
            return LineEvent::None;
        };
        self.state = LineState::Idle;
        if points_coincide(start, point) {
            return LineEvent::Cancelled;
        }
        LineEvent::Commit { start, end: point }
    }

    /// Discard any pending line.
    pub fn cancel(&mut self) -> LineEvent {
        if !self.is_pending() {
            return LineEvent::None;
        }
        self.state = LineState::Idle;
        LineEvent::Cancelled
    }

    fn begin(&mut self, start: Point) {
        self.state = LineState::Pending {
            start,
            current: start,
            dragged: false,
        };
    }
}

/// An armed select-mode drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveDrag {
    /// Pointer position (pixels) at the previous move event.
    pub last_screen: Point,
    /// Whether history was already saved for this gesture.
    pub history_saved: bool,
}

impl MoveDrag {
    pub fn new(start: Point) -> Self {
        Self {
            last_screen: start,
            history_saved: false,
        }
    }
}

/// An in-progress middle/right button pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanDrag {
    /// Pointer position (pixels) at the previous move event.
    pub last_screen: Point,
}
