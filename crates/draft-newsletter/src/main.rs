use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::{
    export, save_draft, save_draft_to, DraftGenerator, GeminiClient, SavedDraft, Settings, Source,
    SourceKind, Tone,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "draft-newsletter")]
#[command(about = "Generate a newsletter draft in your voice from configured sources")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a newsletter draft and save it to the drafts directory
    Generate {
        /// Tone override for this draft (default, professional, casual, enthusiastic, witty, urgent)
        #[arg(short, long, default_value = "default")]
        tone: String,

        /// Write the draft to this path instead of the drafts directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage content sources
    Sources {
        #[command(subcommand)]
        action: SourcesAction,
    },
    /// Manage writing style samples
    Styles {
        #[command(subcommand)]
        action: StylesAction,
    },
    /// Manage the Gemini API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand)]
enum SourcesAction {
    /// List configured sources
    List,
    /// Add a source (kind: twitter, youtube, rss)
    Add { kind: String, value: String },
    /// Remove a source by its list position (1-based)
    Remove { index: usize },
}

#[derive(Subcommand)]
enum StylesAction {
    /// List writing style samples
    List,
    /// Add a writing style sample
    Add { text: String },
    /// Remove a style sample by its list position (1-based)
    Remove { index: usize },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Store the API key in the config directory
    Set { value: String },
    /// Show the configured key, masked
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command.unwrap_or(Command::Generate {
        tone: "default".to_string(),
        output: None,
    }) {
        Command::Generate { tone, output } => generate(&tone, output).await,
        Command::Sources { action } => manage_sources(action),
        Command::Styles { action } => manage_styles(action),
        Command::Key { action } => manage_key(action),
    }
}

async fn generate(tone_slug: &str, output: Option<PathBuf>) -> Result<()> {
    let tone = Tone::from_slug(tone_slug).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid tone: {}. Use 'default', 'professional', 'casual', 'enthusiastic', 'witty' or 'urgent'",
            tone_slug
        )
    })?;

    let settings = Settings::load()?;

    println!("✓ {} sources, {} style samples", settings.sources.len(), settings.style_samples.len());
    if tone != Tone::Default {
        println!("✓ Tone override: {}", tone.label());
    }

    println!("\n🤖 Generating newsletter draft with Gemini...");
    println!("  (This may take a minute...)");

    let client = GeminiClient::new(settings.api_key.clone())?;
    let generator = DraftGenerator::new(client);

    let outcome = generator.generate(&settings, tone).await?;

    println!("✓ Draft generated\n");
    println!("{}", export::to_plain_text(&outcome.draft));

    if !outcome.citations.is_empty() {
        println!("\nSOURCES\n");
        for chunk in &outcome.citations {
            if chunk.web.title.is_empty() {
                println!("  - {}", chunk.web.uri);
            } else {
                println!("  - {} ({})", chunk.web.title, chunk.web.uri);
            }
        }
    }

    let saved = SavedDraft::new(outcome.draft, outcome.citations);
    let filepath = match output {
        Some(path) => {
            save_draft_to(&saved, &path).context("Failed to save draft file")?;
            path
        }
        None => save_draft(&saved).context("Failed to save draft file")?,
    };

    println!("\n✅ Draft saved to: {}", filepath.display());

    Ok(())
}

fn manage_sources(action: SourcesAction) -> Result<()> {
    let mut settings = Settings::load()?;

    match action {
        SourcesAction::List => {
            for (i, source) in settings.sources.iter().enumerate() {
                println!("  {}) [{}] {}", i + 1, source.kind.label(), source.value);
            }
            if settings.sources.is_empty() {
                println!("No sources configured.");
            }
            return Ok(());
        }
        SourcesAction::Add { kind, value } => {
            let kind = SourceKind::from_slug(&kind).ok_or_else(|| {
                anyhow::anyhow!("Invalid source kind: {}. Use 'twitter', 'youtube' or 'rss'", kind)
            })?;
            if value.trim().is_empty() {
                anyhow::bail!("Source value must not be empty");
            }
            settings.sources.push(Source::new(kind, value.trim()));
            settings.save()?;
            println!("✓ Added source ({} total)", settings.sources.len());
        }
        SourcesAction::Remove { index } => {
            if index == 0 || index > settings.sources.len() {
                anyhow::bail!(
                    "Index out of range. Use 1-{}",
                    settings.sources.len().max(1)
                );
            }
            let removed = settings.sources.remove(index - 1);
            settings.save()?;
            println!("✓ Removed [{}] {}", removed.kind.label(), removed.value);
        }
    }

    Ok(())
}

fn manage_styles(action: StylesAction) -> Result<()> {
    let mut settings = Settings::load()?;

    match action {
        StylesAction::List => {
            for (i, sample) in settings.style_samples.iter().enumerate() {
                println!("  {}) {}", i + 1, sample);
            }
            if settings.style_samples.is_empty() {
                println!("No style samples configured.");
            }
            return Ok(());
        }
        StylesAction::Add { text } => {
            if text.trim().is_empty() {
                anyhow::bail!("Style sample must not be empty");
            }
            settings.style_samples.push(text);
            settings.save()?;
            println!("✓ Added style sample ({} total)", settings.style_samples.len());
        }
        StylesAction::Remove { index } => {
            if index == 0 || index > settings.style_samples.len() {
                anyhow::bail!(
                    "Index out of range. Use 1-{}",
                    settings.style_samples.len().max(1)
                );
            }
            settings.style_samples.remove(index - 1);
            settings.save()?;
            println!("✓ Removed style sample");
        }
    }

    Ok(())
}

fn manage_key(action: KeyAction) -> Result<()> {
    let mut settings = Settings::load()?;

    match action {
        KeyAction::Set { value } => {
            if value.trim().is_empty() {
                anyhow::bail!("API key must not be empty");
            }
            settings.api_key = value.trim().to_string();
            settings.save()?;
            println!("✓ API key saved");
        }
        KeyAction::Show => {
            if settings.api_key.is_empty() {
                println!("No API key configured. Set one with `draft-newsletter key set <key>` or GEMINI_API_KEY.");
            } else {
                println!("{}", mask_key(&settings.api_key));
            }
        }
    }

    Ok(())
}

/// Mask all but the last 4 characters of the key. Counted in characters, not
/// bytes, so keys with multibyte characters never split mid-character.
fn mask_key(key: &str) -> String {
    let total = key.chars().count();
    let visible = total.saturating_sub(4);
    let tail: String = key.chars().skip(visible).collect();
    format!("{}{}", "*".repeat(visible), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key_shows_last_four_chars() {
        assert_eq!(mask_key("sk-1234567890"), "*********7890");
    }

    #[test]
    fn test_mask_key_short_key_unmasked() {
        assert_eq!(mask_key("abcd"), "abcd");
        assert_eq!(mask_key("ab"), "ab");
    }

    #[test]
    fn test_mask_key_multibyte_counts_chars_not_bytes() {
        // 4 characters but 12 bytes; byte-based slicing would panic.
        assert_eq!(mask_key("キーです"), "キーです");
        assert_eq!(mask_key("secret-キーです"), "*******キーです");
    }
}
