//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use arsip_core::{ArchiveRecord, Page};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single record
    pub fn print_record(&self, record: &ArchiveRecord) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", record.id);
                println!("Nama:      {}", record.nama);
                println!("Tanggal:   {}", record.tanggal);
                if !record.deskripsi.is_empty() {
                    println!("Deskripsi: {}", record.deskripsi);
                }
            }
            OutputFormat::Json => {
                println!("{:#}", serde_json::json!(record));
            }
            OutputFormat::Quiet => {
                println!("{}", record.id);
            }
        }
    }

    /// Print one page of records
    pub fn print_page(&self, page: &Page<'_>, search: &str) {
        match self.format {
            OutputFormat::Human => {
                if page.is_empty() {
                    println!("No arsip found.");
                    return;
                }
                println!(
                    "{:>4} | {:<6} | {:<30} | {:<10} | Deskripsi",
                    "No.", "ID", "Nama", "Tanggal"
                );
                for (index, record) in page.items.iter().enumerate() {
                    println!(
                        "{:>4} | {:<6} | {:<30} | {:<10} | {}",
                        page.row_number(index),
                        record.id.to_string(),
                        truncate(&record.nama, 30),
                        record.tanggal.to_string(),
                        truncate_line(&record.deskripsi, 40)
                    );
                }
                println!();
                if !search.is_empty() {
                    println!("{} match(es) for '{}'", page.total_matches, search);
                }
                if page.total_pages > 1 {
                    println!("Page {} of {}", page.number, page.total_pages);
                } else {
                    println!("{} arsip", page.total_matches);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{:#}",
                    serde_json::json!({
                        "page": page.number,
                        "total_pages": page.total_pages,
                        "total": page.total_matches,
                        "items": page.items,
                    })
                );
            }
            OutputFormat::Quiet => {
                for record in &page.items {
                    println!("{}", record.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// Truncate a string to max characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
pub fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        // Multi-byte characters are counted, not bytes
        assert_eq!(truncate("dokumen ñññññ", 10), "dokumen...");
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("single line", 20), "single line");
        assert_eq!(truncate_line("line one\nline two", 20), "line one");
        assert_eq!(truncate_line("", 20), "");
    }

    #[test]
    fn test_should_prompt_only_for_humans() {
        assert!(Output::new(OutputFormat::Human).should_prompt());
        assert!(!Output::new(OutputFormat::Json).should_prompt());
        assert!(!Output::new(OutputFormat::Quiet).should_prompt());
    }
}
