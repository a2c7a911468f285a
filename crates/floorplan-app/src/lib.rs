//! Floorplan command-line shell.
//!
//! Loads documents through the core engine and reports on them. Windowing
//! and drawing are not part of this crate.

mod report;
mod shortcuts;

pub use report::inspect;
pub use shortcuts::{Shortcut, ShortcutRegistry};

use clap::{Parser, Subcommand};
use floorplan_core::bounds::{PADDING_ABSOLUTE, PADDING_RATIO};
use floorplan_core::storage::StorageError;
use floorplan_core::{
    ConfigError, Editor, EditorConfig, FileStorage, Storage, compute_bounding_box,
};
use kurbo::Rect;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Parser, Debug)]
#[command(name = "floorplan", about = "Floorplan layout tool")]
pub struct Cli {
    /// Editor configuration file (JSON).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Summarise a layout: element counts and per-type details.
    Inspect { file: PathBuf },
    /// Print the initial view and content bounds of a layout.
    Frame { file: PathBuf },
    /// Load and save a layout, normalising its formatting.
    Resave {
        file: PathBuf,
        /// Write here instead of overwriting the input.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List keyboard shortcuts.
    Shortcuts,
}

fn format_rect(rect: Rect) -> String {
    format!("({}, {}) - ({}, {})", rect.x0, rect.y0, rect.x1, rect.y1)
}

fn open(config: EditorConfig, file: &Path) -> Result<Editor, AppError> {
    let storage = FileStorage::new();
    let mut editor = Editor::new(config);
    editor.open(&storage, &file.to_string_lossy())?;
    Ok(editor)
}

/// Run a parsed command and return what it prints.
pub fn execute(cli: Cli) -> Result<String, AppError> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    match cli.command {
        CliCommand::Inspect { file } => {
            let editor = open(config, &file)?;
            Ok(inspect(editor.document()))
        }
        CliCommand::Frame { file } => {
            let editor = open(config, &file)?;
            let mut out = format!("view   {}\n", format_rect(editor.viewport().world));
            match compute_bounding_box(editor.document().elements(), PADDING_RATIO, PADDING_ABSOLUTE) {
                Some(bounds) => out.push_str(&format!("bounds {}\n", format_rect(bounds))),
                None => out.push_str("bounds none\n"),
            }
            Ok(out)
        }
        CliCommand::Resave { file, output } => {
            let editor = open(config, &file)?;
            let target = output.unwrap_or(file);
            FileStorage::new().save(&target.to_string_lossy(), editor.document())?;
            Ok(format!(
                "Saved {} elements to {}\n",
                editor.document().len(),
                target.display()
            ))
        }
        CliCommand::Shortcuts => Ok(ShortcutRegistry::table()),
    }
}

/// Parse the process arguments and run.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    log::debug!("Running {:?}", cli.command);
    print!("{}", execute(cli)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("floorplan").chain(args.iter().copied())).unwrap()
    }

    const LAYOUT: &str = r#"{
        "Name": "Test",
        "Elements": [
            {"Type": "Wall", "Start": {"X": 0, "Y": 0}, "End": {"X": 100, "Y": 100}},
            {"Type": "Elevator", "Start": {"X": 50, "Y": 50}}
        ]
    }"#;

    #[test]
    fn test_inspect_command() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.json");
        fs::write(&path, LAYOUT).unwrap();

        let out = execute(parse(&["inspect", path.to_str().unwrap()])).unwrap();
        assert!(out.starts_with("2 elements"));
        assert!(out.contains("Elevator"));
    }

    #[test]
    fn test_frame_command() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.json");
        fs::write(&path, LAYOUT).unwrap();

        let out = execute(parse(&["frame", path.to_str().unwrap()])).unwrap();
        assert!(out.contains("bounds (-100, -100) - (200, 200)"));
    }

    #[test]
    fn test_resave_keeps_wrapper() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.json");
        let output = dir.path().join("out.json");
        fs::write(&path, LAYOUT).unwrap();

        execute(parse(&[
            "resave",
            path.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]))
        .unwrap();
        let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(saved["Name"], "Test");
        assert_eq!(saved["Elements"][1]["Type"], "Elevator");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let result = execute(parse(&["inspect", path.to_str().unwrap()]));
        assert!(matches!(result, Err(AppError::Storage(StorageError::NotFound(_)))));
    }

    #[test]
    fn test_bad_config() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.json");
        fs::write(&config, "{").unwrap();
        let result = execute(parse(&["--config", config.to_str().unwrap(), "shortcuts"]));
        assert!(matches!(result, Err(AppError::Config(ConfigError::Json(_)))));
    }
}
