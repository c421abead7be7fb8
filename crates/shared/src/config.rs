use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::models::{Source, SourceKind};

const API_KEY_FILE: &str = "api-key";
const SOURCES_FILE: &str = "sources.json";
const STYLE_SAMPLES_FILE: &str = "style-samples.json";

/// All configuration a generation call reads, captured by value. Loaded once at
/// startup from three named slots in the config directory, saved back through
/// [`Settings::save`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub sources: Vec<Source>,
    pub style_samples: Vec<String>,
}

impl Settings {
    /// Load settings, filling missing slots with defaults. The credential slot
    /// falls back to the GEMINI_API_KEY environment variable (after probing
    /// the usual .env locations); an empty string means "not configured" and
    /// is reported by the orchestrator's guard, not here.
    pub fn load() -> Result<Self> {
        try_load_dotenv();

        let dir = config_dir()?;

        let api_key = match fs::read_to_string(dir.join(API_KEY_FILE)) {
            Ok(key) => key.trim().to_string(),
            Err(_) => env::var("GEMINI_API_KEY").unwrap_or_default(),
        };

        let sources = match fs::read_to_string(dir.join(SOURCES_FILE)) {
            Ok(text) => serde_json::from_str(&text).with_context(|| {
                format!(
                    "Failed to parse {}. Fix or delete the file to restore defaults.",
                    dir.join(SOURCES_FILE).display()
                )
            })?,
            Err(_) => Self::default_sources(),
        };

        let style_samples = match fs::read_to_string(dir.join(STYLE_SAMPLES_FILE)) {
            Ok(text) => serde_json::from_str(&text).with_context(|| {
                format!(
                    "Failed to parse {}. Fix or delete the file to restore defaults.",
                    dir.join(STYLE_SAMPLES_FILE).display()
                )
            })?,
            Err(_) => Self::default_style_samples(),
        };

        Ok(Self {
            api_key,
            sources,
            style_samples,
        })
    }

    /// Write all three slots back to the config directory.
    pub fn save(&self) -> Result<()> {
        let dir = config_dir()?;

        fs::write(dir.join(API_KEY_FILE), &self.api_key).context("Failed to write API key")?;

        let sources_json =
            serde_json::to_string_pretty(&self.sources).context("Failed to serialize sources")?;
        fs::write(dir.join(SOURCES_FILE), sources_json).context("Failed to write sources")?;

        let styles_json = serde_json::to_string_pretty(&self.style_samples)
            .context("Failed to serialize style samples")?;
        fs::write(dir.join(STYLE_SAMPLES_FILE), styles_json)
            .context("Failed to write style samples")?;

        Ok(())
    }

    pub fn default_sources() -> Vec<Source> {
        vec![
            Source::new(SourceKind::Twitter, "#ai"),
            Source::new(SourceKind::YouTube, "Marques Brownlee"),
            Source::new(SourceKind::Rss, "https://techcrunch.com/feed/"),
        ]
    }

    pub fn default_style_samples() -> Vec<String> {
        vec![
            "Example: \"Hey everyone! Welcome to this week's roundup of the most exciting news \
             in tech. We've got some amazing stories for you, so let's dive right in!\""
                .to_string(),
        ]
    }
}

/// Config directory for all settings slots, created on first use.
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("creator-pulse");

    fs::create_dir_all(&dir).context("Failed to create config directory")?;

    Ok(dir)
}

fn try_load_dotenv() {
    // Try locations in order of preference:

    // 1. Current directory (for development)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // 2. ~/.config/creator-pulse/.env (standard config location)
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("creator-pulse").join(".env");
        if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
            return;
        }
    }

    // 3. ~/.env (home directory)
    if let Some(home_dir) = dirs::home_dir() {
        let home_path = home_dir.join(".env");
        if home_path.exists() {
            let _ = dotenvy::from_path(&home_path);
        }
    }

    // If none found, that's okay - environment variables might be set system-wide
}
