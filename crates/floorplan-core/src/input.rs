//! Input vocabulary: pointer events, modifier keys and discrete commands.

use crate::tools::EditMode;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse buttons held during a move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl Buttons {
    pub const NONE: Buttons = Buttons {
        left: false,
        middle: false,
        right: false,
    };

    pub const LEFT: Buttons = Buttons {
        left: true,
        ..Buttons::NONE
    };
}

/// Pointer event in canvas pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        buttons: Buttons,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    /// Wheel scroll; positive notches are towards the user.
    Scroll {
        position: Point,
        notches: i32,
    },
}

/// Discrete editor commands (toolbar buttons and keyboard shortcuts).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    SetMode(EditMode),
    /// Rotate the selection by the given degrees (±90).
    Rotate(f64),
    ZoomIn,
    ZoomOut,
    /// Rescale the view by `scale` about a pixel position.
    ZoomAt { scale: f64, center: Point },
    /// Pan by a pixel delta.
    Pan(Vec2),
    ResetView,
    Undo,
    Redo,
    Copy,
    Paste,
    SelectAll,
    DeleteSelection,
    /// Cancel in-progress gestures (pending line, drag, pan).
    Cancel,
    SetSnap(bool),
    SetShowGrid(bool),
    SetShowLamps(bool),
    SetGridSize(f64),
}

impl Command {
    /// Map a key press to its default command.
    ///
    /// `key` is the logical key name: a single character (case-sensitive) or
    /// a named key such as `"Escape"`.
    pub fn from_key(key: &str, modifiers: Modifiers) -> Option<Command> {
        if modifiers.command() {
            return match key.to_ascii_lowercase().as_str() {
                "c" => Some(Command::Copy),
                "v" => Some(Command::Paste),
                "a" => Some(Command::SelectAll),
                "z" => Some(Command::Undo),
                "y" => Some(Command::Redo),
                _ => None,
            };
        }
        match key {
            "Escape" => Some(Command::Cancel),
            "Delete" | "Backspace" => Some(Command::DeleteSelection),
            "r" if modifiers.shift => Some(Command::Rotate(-90.0)),
            "r" => Some(Command::Rotate(90.0)),
            "R" => Some(Command::Rotate(-90.0)),
            _ => None,
        }
    }
}
