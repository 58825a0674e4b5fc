//! Interactive editing support
//!
//! Opens $EDITOR with a record form and prompts for confirmation.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

use arsip_core::{ArchiveInput, ArchiveRecord};

/// Open content in the user's preferred editor
///
/// Uses $EDITOR, $VISUAL, or falls back to common editors.
pub fn edit_text(initial_content: &str) -> Result<String> {
    let editor = find_editor()?;

    let temp_path = env::temp_dir().join(format!("arsip_edit_{}.txt", std::process::id()));

    fs::write(&temp_path, initial_content)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;

    if !status.success() {
        let _ = fs::remove_file(&temp_path);
        bail!(
            "Editor '{}' exited with non-zero status. Check that your editor is configured correctly.",
            editor
        );
    }

    let content = fs::read_to_string(&temp_path)
        .with_context(|| format!("Failed to read edited file: {:?}", temp_path))?;

    let _ = fs::remove_file(&temp_path);

    Ok(content)
}

/// Find the user's preferred editor
fn find_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    let common_editors = ["nano", "vim", "vi", "emacs", "notepad"];

    for editor in common_editors {
        if command_exists(editor) {
            return Ok(editor.to_string());
        }
    }

    bail!(
        "No editor found. Set $EDITOR environment variable.\n\
         Example: export EDITOR=nano"
    )
}

/// Check if a command exists in PATH
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

/// Form shown in the editor when adding or editing a record
///
/// `deskripsi` comes last and runs to the end of the file, so it may
/// span several lines.
pub fn record_template(record: Option<&ArchiveRecord>) -> String {
    let heading = match record {
        Some(record) => format!("# Edit arsip {}", record.id),
        None => "# New arsip".to_string(),
    };
    let (nama, tanggal, deskripsi) = match record {
        Some(record) => (
            record.nama.as_str(),
            record.tanggal.to_string(),
            record.deskripsi.as_str(),
        ),
        None => ("", String::new(), ""),
    };

    format!(
        "{}\n\
         # Lines starting with # above the fields are ignored. Date format: YYYY-MM-DD\n\
         # Everything below deskripsi: is the description.\n\
         # Leave every field empty to cancel.\n\n\
         nama: {}\n\
         tanggal: {}\n\
         deskripsi:\n\
         {}\n",
        heading, nama, tanggal, deskripsi
    )
}

/// Parse an edited record form
///
/// Returns `Ok(None)` when every field was left empty (cancelled).
pub fn parse_record_form(content: &str) -> Result<Option<ArchiveInput>> {
    let mut nama = String::new();
    let mut tanggal = String::new();
    let mut deskripsi: Option<Vec<&str>> = None;

    for raw in content.lines() {
        // Once deskripsi starts, every following line belongs to it
        if let Some(lines) = deskripsi.as_mut() {
            lines.push(raw);
            continue;
        }

        let line = raw.trim();
        if line.starts_with('#') || line.is_empty() {
            continue;
        }

        if let Some(value) = line.strip_prefix("nama:") {
            nama = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("tanggal:") {
            tanggal = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("deskripsi:") {
            deskripsi = Some(vec![value]);
        }
    }

    let deskripsi = deskripsi
        .map(|lines| lines.join("\n").trim().to_string())
        .unwrap_or_default();

    if nama.is_empty() && deskripsi.is_empty() && tanggal.is_empty() {
        return Ok(None);
    }

    if tanggal.is_empty() {
        bail!("tanggal is required (YYYY-MM-DD)");
    }
    let tanggal = tanggal
        .parse()
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD.", tanggal))?;

    Ok(Some(ArchiveInput {
        nama,
        deskripsi,
        tanggal,
    }))
}
