use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;

use crate::models::SavedDraft;

/// Get the default directory for storing draft files
pub fn get_default_drafts_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .context("Could not determine local data directory")?
        .join("creator-pulse")
        .join("drafts");

    fs::create_dir_all(&data_dir).context("Failed to create drafts directory")?;

    Ok(data_dir)
}

/// Save a draft to a timestamped JSON file in the drafts directory
pub fn save_draft(data: &SavedDraft) -> Result<PathBuf> {
    let drafts_dir = get_default_drafts_dir()?;
    let filename = format!("draft-{}.json", Utc::now().format("%Y-%m-%d-%H%M%S"));
    let filepath = drafts_dir.join(filename);

    save_draft_to(data, &filepath)?;

    Ok(filepath)
}

/// Save a draft to an explicit path
pub fn save_draft_to(data: &SavedDraft, filepath: &PathBuf) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize draft")?;

    fs::write(filepath, json)
        .with_context(|| format!("Failed to write draft file: {}", filepath.display()))?;

    Ok(())
}

/// Load a draft from a JSON file
pub fn load_draft(filepath: &PathBuf) -> Result<SavedDraft> {
    if !filepath.exists() {
        anyhow::bail!("Draft file not found: {}", filepath.display());
    }

    let content = fs::read_to_string(filepath)
        .with_context(|| format!("Failed to read draft file: {}", filepath.display()))?;

    let data: SavedDraft = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse draft JSON from {}. The file may be corrupted or not a draft file.",
            filepath.display()
        )
    })?;

    if data.version != "1.0" {
        anyhow::bail!(
            "Unsupported draft file version: {}. Expected 1.0. Please regenerate the draft with draft-newsletter.",
            data.version
        );
    }

    Ok(data)
}

/// List all available draft files with their contents, newest first
pub fn list_draft_files() -> Result<Vec<(PathBuf, SavedDraft)>> {
    let drafts_dir = get_default_drafts_dir()?;

    let mut files = Vec::new();

    if drafts_dir.exists() {
        for entry in fs::read_dir(&drafts_dir).context("Failed to read drafts directory")? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                match load_draft(&path) {
                    Ok(data) => {
                        files.push((path, data));
                    }
                    Err(e) => {
                        eprintln!("Warning: Could not load {}: {}", path.display(), e);
                    }
                }
            }
        }
    }

    // Sort by creation date (newest first)
    files.sort_by(|a, b| {
        let time_a = DateTime::parse_from_rfc3339(&a.1.created_at).ok();
        let time_b = DateTime::parse_from_rfc3339(&b.1.created_at).ok();
        time_b.cmp(&time_a)
    });

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewsletterDraft;

    fn sample_saved_draft() -> SavedDraft {
        SavedDraft::new(
            NewsletterDraft {
                subject: "S".to_string(),
                introduction: "I".to_string(),
                curated_links: vec![],
                trends_to_watch: vec![],
            },
            vec![],
        )
    }

    #[test]
    fn test_save_draft_to_explicit_path_round_trips() {
        let filepath = std::env::temp_dir().join(format!(
            "creator-pulse-test-{}.json",
            std::process::id()
        ));

        let saved = sample_saved_draft();
        save_draft_to(&saved, &filepath).unwrap();

        let loaded = load_draft(&filepath).unwrap();
        assert_eq!(loaded.version, "1.0");
        assert_eq!(loaded.draft.subject, "S");
        assert_eq!(loaded.created_at, saved.created_at);

        let _ = fs::remove_file(&filepath);
    }

    #[test]
    fn test_load_draft_missing_file_fails() {
        let filepath = std::env::temp_dir().join("creator-pulse-test-missing.json");
        let err = load_draft(&filepath).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
