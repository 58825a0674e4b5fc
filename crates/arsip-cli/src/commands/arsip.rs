//! Arsip command handlers

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use arsip_core::{ArchiveApi, ArchiveId, ArchiveInput, ArchiveRecord, ArchiveStore, ListView};

use crate::editor::confirm;
use crate::output::Output;

/// Field overrides given on the command line for `edit`
#[derive(Debug, Clone, Default)]
pub struct FieldChanges {
    pub nama: Option<String>,
    pub deskripsi: Option<String>,
    pub tanggal: Option<NaiveDate>,
}

impl FieldChanges {
    pub fn is_empty(&self) -> bool {
        self.nama.is_none() && self.deskripsi.is_none() && self.tanggal.is_none()
    }

    /// Build a full replacement without an existing record
    ///
    /// Only possible when every field was given.
    fn into_complete(self) -> Option<ArchiveInput> {
        Some(ArchiveInput {
            nama: self.nama?,
            deskripsi: self.deskripsi?,
            tanggal: self.tanggal?,
        })
    }

    /// Apply the overrides on top of an existing record
    fn apply_to(self, record: &ArchiveRecord) -> ArchiveInput {
        let current = record.to_input();
        ArchiveInput {
            nama: self.nama.unwrap_or(current.nama),
            deskripsi: self.deskripsi.unwrap_or(current.deskripsi),
            tanggal: self.tanggal.unwrap_or(current.tanggal),
        }
    }
}

/// Refresh the store and fail if the list could not be fetched
async fn load<A: ArchiveApi>(store: &ArchiveStore<A>) -> Result<()> {
    store.refresh().await;
    if let Some(error) = store.last_error() {
        bail!(error.message);
    }
    Ok(())
}

/// List records with client-side search and pagination
pub async fn list<A: ArchiveApi>(
    store: &ArchiveStore<A>,
    search: Option<String>,
    page: usize,
    per_page: usize,
    output: &Output,
) -> Result<()> {
    load(store).await?;
    let records = store.records();

    let mut view = ListView::new(per_page);
    if let Some(search) = search {
        view.set_search(search);
    }
    if page != 1 && !view.go_to(page, &records) {
        let total = view.page(&records).total_pages;
        bail!("Page {} is out of range (1-{})", page, total.max(1));
    }

    output.print_page(&view.page(&records), view.search());
    Ok(())
}

/// Show a single record
pub async fn show<A: ArchiveApi>(store: &ArchiveStore<A>, id: ArchiveId, output: &Output) -> Result<()> {
    load(store).await?;

    let record = store
        .find(id)
        .ok_or_else(|| anyhow::anyhow!("Arsip not found: {}", id))?;

    output.print_record(&record);
    Ok(())
}

/// Create a new record
pub async fn create<A: ArchiveApi>(
    store: &ArchiveStore<A>,
    nama: String,
    deskripsi: String,
    tanggal: NaiveDate,
    output: &Output,
) -> Result<()> {
    let input = ArchiveInput::new(nama, tanggal).with_deskripsi(deskripsi);

    let created = store
        .create(&input)
        .await
        .context("Failed to create arsip")?;

    output.success(&format!("Created arsip: {}", created.id));
    output.print_record(&created);
    Ok(())
}

/// Edit a record (full replacement)
pub async fn edit<A: ArchiveApi>(
    store: &ArchiveStore<A>,
    id: ArchiveId,
    changes: FieldChanges,
    output: &Output,
) -> Result<()> {
    load(store).await?;

    let input = match store.find(id) {
        Some(record) if changes.is_empty() => prompt_for_changes(&record)?,
        Some(record) => changes.apply_to(&record),
        // Not in the list: only a complete replacement can be sent
        None => match changes.into_complete() {
            Some(input) => input,
            None => bail!("Arsip not found: {}", id),
        },
    };

    let updated = store
        .update(id, &input)
        .await
        .with_context(|| format!("Failed to update arsip {}", id))?;

    output.success("Arsip updated");
    output.print_record(&updated);
    Ok(())
}

/// Delete a record
pub async fn delete<A: ArchiveApi>(
    store: &ArchiveStore<A>,
    id: ArchiveId,
    yes: bool,
    output: &Output,
) -> Result<()> {
    // Confirm deletion
    if !yes && output.should_prompt() {
        // Only fetched to name the record; a failed fetch doesn't block the delete
        store.refresh().await;
        match store.find(id) {
            Some(record) => println!("Delete arsip: {} - {}", record.id, record.nama),
            None => println!("Delete arsip: {}", id),
        }
        if !confirm("This cannot be undone. Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .delete(id)
        .await
        .with_context(|| format!("Failed to delete arsip {}", id))?;

    output.success(&format!("Deleted arsip: {}", id));
    Ok(())
}

/// Interactive editing of every field
fn prompt_for_changes(record: &ArchiveRecord) -> Result<ArchiveInput> {
    println!("Editing arsip: {}", record.id);
    println!("Press Enter to keep current value, or type new value.\n");

    let mut input = record.to_input();

    if let Some(nama) = prompt_with_default("Nama", &record.nama)? {
        input.nama = nama;
    }
    if let Some(deskripsi) = prompt_with_default("Deskripsi", &record.deskripsi)? {
        input.deskripsi = deskripsi;
    }
    if let Some(tanggal) = prompt_with_default("Tanggal (YYYY-MM-DD)", &record.tanggal.to_string())? {
        input.tanggal = tanggal
            .parse()
            .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD.", tanggal))?;
    }

    Ok(input)
}

/// Prompt with a default value, returns None if user keeps default
fn prompt_with_default(prompt: &str, default: &str) -> Result<Option<String>> {
    use std::io::{self, Write};

    if default.is_empty() {
        print!("{}: ", prompt);
    } else {
        print!("{} [{}]: ", prompt, default);
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.to_string()))
    }
}
