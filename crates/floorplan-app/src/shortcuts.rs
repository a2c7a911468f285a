//! Keyboard shortcut registry and documentation.

use floorplan_core::input::{Command, Modifiers};
use floorplan_core::tools::EditMode;

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl,
            shift: self.shift,
            ..Modifiers::NONE
        }
    }

    /// The command the core binds to this key.
    pub fn command(&self) -> Option<Command> {
        Command::from_key(self.key, self.modifiers())
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("a", true, false, "Select all (except the floor)"),
            Shortcut::new("c", true, false, "Copy selection"),
            Shortcut::new("v", true, false, "Paste"),
            Shortcut::new("z", true, false, "Undo"),
            Shortcut::new("y", true, false, "Redo"),
            Shortcut::new("r", false, false, "Rotate selection +90°"),
            Shortcut::new("r", false, true, "Rotate selection -90°"),
            Shortcut::new("Delete", false, false, "Delete selection"),
            Shortcut::new("Backspace", false, false, "Delete selection"),
            Shortcut::new("Escape", false, false, "Cancel current action"),
        ]
    }

    /// Render the shortcut table.
    pub fn table() -> String {
        let mut out = String::from("=== Keyboard Shortcuts ===\n");
        for shortcut in Self::all() {
            out.push_str(&format!("  {:20} {}\n", shortcut.format(), shortcut.description));
        }
        out.push_str(&format!("  {:20} {}\n", "Ctrl+Click", "Toggle element in selection"));
        out.push_str(&format!("  {:20} {}\n", "Middle/Right drag", "Pan"));
        out.push_str(&format!("  {:20} {}\n", "Wheel", "Zoom at pointer"));
        out.push_str("\n=== Modes ===\n");
        for mode in EditMode::ALL {
            out.push_str(&format!("  {}\n", mode.name()));
        }
        out
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n{}", Self::table());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shortcut_is_bound() {
        for shortcut in ShortcutRegistry::all() {
            assert!(shortcut.command().is_some(), "{} is not bound", shortcut.format());
        }
    }

    #[test]
    fn test_rotate_directions() {
        let all = ShortcutRegistry::all();
        let plain = all.iter().find(|s| s.key == "r" && !s.shift).unwrap();
        let shifted = all.iter().find(|s| s.key == "r" && s.shift).unwrap();
        assert_eq!(plain.command(), Some(Command::Rotate(90.0)));
        assert_eq!(shifted.command(), Some(Command::Rotate(-90.0)));
    }

    #[test]
    fn test_format() {
        assert_eq!(Shortcut::new("z", true, false, "Undo").format(), "Ctrl+z");
        let table = ShortcutRegistry::table();
        assert!(table.contains("Escape"));
        assert!(table.contains("Select / Move"));
        assert!(table.contains("Add Window"));
    }
}
